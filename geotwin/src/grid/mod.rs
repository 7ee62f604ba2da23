//! World tile grid.
//!
//! Partitions the globe into a fixed hierarchy of rectangular tiles and
//! provides the containment, overlap and enumeration predicates the tile
//! entities reason with. Everything here is a pure function over values.
//!
//! # Hierarchy
//!
//! ```text
//! zoom 0   1 tile   180° lat x 360° lng
//! zoom 1   2 tiles  split at the prime meridian, 180° x 180°
//! zoom 2   3 x 3    60° x 60°
//! zoom 3   3 x 3    20° x 20°
//! zoom 4+  2 x 2    10°, 5°, 2.5° ... down to zoom 18 (device tiles)
//! ```

mod key;
mod types;


pub use key::{key_of, region_of, KEY_PRECISION};
pub use types::{GridError, LatLng, Region, MAX_ZOOM, MIN_ZOOM};

/// The zoom 0 tile covering the whole world.
pub fn root() -> Region {
    Region {
        zoom: MIN_ZOOM,
        top_left: LatLng::new(90.0, -180.0),
        bot_right: LatLng::new(-90.0, 180.0),
    }
}

/// Returns the child tiles of a region.
///
/// The split depends only on the zoom level: zoom 0 halves longitude, zooms 1
/// and 2 split into a 3x3 grid, zooms 3 to 17 into a 2x2 grid, and device
/// tiles have no children. Children are ordered row-major, north to south and
/// then west to east.
pub fn subdivide(region: &Region) -> Vec<Region> {
    match region.zoom {
        0 => split(region, 1, 2),
        1 | 2 => split(region, 3, 3),
        zoom if zoom >= MAX_ZOOM => Vec::new(),
        _ => split(region, 2, 2),
    }
}

fn split(region: &Region, lat_splits: u32, lng_splits: u32) -> Vec<Region> {
    let lat_length = region.height() / f64::from(lat_splits);
    let lng_length = region.width() / f64::from(lng_splits);
    let zoom = region.zoom + 1;

    let mut children = Vec::with_capacity((lat_splits * lng_splits) as usize);
    for lat_index in 0..lat_splits {
        for lng_index in 0..lng_splits {
            let top = region.top_left.lat - f64::from(lat_index) * lat_length;
            let bottom = region.top_left.lat - f64::from(lat_index + 1) * lat_length;
            let left = region.top_left.lng + f64::from(lng_index) * lng_length;
            let right = region.top_left.lng + f64::from(lng_index + 1) * lng_length;
            children.push(Region {
                zoom,
                top_left: LatLng::new(top, left),
                bot_right: LatLng::new(bottom, right),
            });
        }
    }
    children
}

/// Finds the tile at `zoom` that contains `point`.
///
/// Descends from the root, taking the first child that contains the point at
/// each level, so points on a shared edge resolve to the north-west tile.
/// Returns `None` if the point is outside the world or the zoom is above
/// [`MAX_ZOOM`].
pub fn tile_at(zoom: u8, point: LatLng) -> Option<Region> {
    if zoom > MAX_ZOOM {
        return None;
    }
    let mut region = root();
    if !region.contains_point(point) {
        return None;
    }
    while region.zoom < zoom {
        region = subdivide(&region)
            .into_iter()
            .find(|child| child.contains_point(point))?;
    }
    Some(region)
}

/// Geometric centre of a region.
pub fn center(region: &Region) -> LatLng {
    LatLng::new(
        region.top_left.lat - region.height() / 2.0,
        region.top_left.lng + region.width() / 2.0,
    )
}

/// The tile one zoom level up that contains the centre of `region`.
///
/// Returns `None` for zoom 0.
pub fn parent(region: &Region) -> Option<Region> {
    let zoom = region.zoom.checked_sub(1)?;
    tile_at(zoom, center(region))
}

/// All tiles above `region` in the hierarchy, root first.
pub fn ancestors(region: &Region) -> Vec<Region> {
    let mut path = Vec::with_capacity(region.zoom as usize);
    let mut current = *region;
    while let Some(up) = parent(&current) {
        path.push(up);
        current = up;
    }
    path.reverse();
    path
}

/// Enumerates every tile at `area`'s zoom level that overlaps `area`.
///
/// Starts at the tile holding the area's top-left corner, walks east
/// collecting the first row, then walks south from each tile of that row.
/// Only tiles inside the overlapping block are visited.
///
/// Parts of the area outside the world are ignored. Areas crossing the
/// antimeridian are not wrapped.
pub fn tiles_intersecting(area: &Region) -> Vec<Region> {
    let world = root();
    let corner = LatLng::new(
        area.top_left.lat.min(world.top_left.lat),
        area.top_left.lng.max(world.top_left.lng),
    );
    let Some(mut start) = tile_at(area.zoom, corner) else {
        return Vec::new();
    };
    // The corner may sit on the east or south edge of the tile it resolved to.
    if start.bot_right.lng <= corner.lng {
        start = start.right_neighbour();
    }
    if start.bot_right.lat >= corner.lat {
        start = start.below_neighbour();
    }

    let row = walk(start, area, &world, Region::right_neighbour);
    let mut tiles = row.clone();
    for tile in &row {
        tiles.extend(walk(
            tile.below_neighbour(),
            area,
            &world,
            Region::below_neighbour,
        ));
    }
    tiles
}

fn walk(start: Region, area: &Region, world: &Region, step: fn(&Region) -> Region) -> Vec<Region> {
    let mut tiles = Vec::new();
    let mut next = start;
    while next.overlaps(area) && next.overlaps(world) {
        tiles.push(next);
        next = step(&next);
    }
    tiles
}
