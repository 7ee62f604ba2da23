//! Grid inspection commands: `key`, `decode` and `tiles`.
//!
//! These are pure computations over the tile hierarchy and touch neither the
//! journal nor the log file.

use geotwin::config::ConfigFile;
use geotwin::entity::tag_for;
use geotwin::grid::{
    key_of, parent, region_of, tile_at, tiles_intersecting, GridError, LatLng, Region,
};

use crate::error::CliError;

/// Resolve the tile at a point, or explain why there is none.
pub fn resolve_tile(zoom: u8, lat: f64, lng: f64) -> Result<Region, CliError> {
    let point = LatLng::new(lat, lng);
    tile_at(zoom, point).ok_or_else(|| {
        CliError::Grid(GridError::InvalidRegion(format!(
            "no tile at zoom {} contains {}",
            zoom, point
        )))
    })
}

/// Print the key and sharding tag of the tile at a point.
pub fn run_key(zoom: u8, lat: f64, lng: f64) -> Result<(), CliError> {
    let tile = resolve_tile(zoom, lat, lng)?;
    let key = key_of(&tile);
    let config = ConfigFile::load().unwrap_or_default();

    println!("Key:  {}", key);
    println!("Tile: {}", tile);
    println!("Tag:  {}", tag_for(&key, config.sharding.number_of_shards));
    Ok(())
}

/// Print the fields of a tile key.
pub fn run_decode(key: &str) -> Result<(), CliError> {
    let region = region_of(key)?;

    println!("Zoom:         {}", region.zoom());
    println!("Top left:     {}", region.top_left());
    println!("Bottom right: {}", region.bot_right());
    println!("Size:         {}° x {}°", region.height(), region.width());
    println!("Device tile:  {}", if region.is_device() { "yes" } else { "no" });
    match parent(&region) {
        Some(up) => println!("Parent:       {}", key_of(&up)),
        None => println!("Parent:       (root)"),
    }
    Ok(())
}

/// Print the keys of every tile overlapping an area.
pub fn run_tiles(zoom: u8, top: f64, left: f64, bottom: f64, right: f64) -> Result<(), CliError> {
    let area = Region::new(zoom, LatLng::new(top, left), LatLng::new(bottom, right))?;
    for tile in tiles_intersecting(&area) {
        println!("{}", key_of(&tile));
    }
    Ok(())
}
