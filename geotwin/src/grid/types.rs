//! Grid type definitions

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Coarsest zoom level: the whole world as a single tile.
pub const MIN_ZOOM: u8 = 0;

/// Finest zoom level. Tiles at this level are devices.
pub const MAX_ZOOM: u8 = 18;

/// A latitude/longitude pair in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LatLng {
    /// Latitude, positive north
    pub lat: f64,
    /// Longitude, positive east
    pub lng: f64,
}

impl LatLng {
    /// Creates a coordinate from latitude and longitude in degrees.
    #[inline]
    pub const fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }
}

impl fmt::Display for LatLng {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[lat {:.6}, lng {:.6}]", self.lat, self.lng)
    }
}

/// A rectangular area of the world at a zoom level.
///
/// The corners are validated on construction: the top-left corner is strictly
/// north and strictly west of the bottom-right corner, both corners are finite,
/// and the zoom is within `MIN_ZOOM..=MAX_ZOOM`. A region has no identity
/// beyond its fields.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", try_from = "RegionFields")]
pub struct Region {
    pub(super) zoom: u8,
    pub(super) top_left: LatLng,
    pub(super) bot_right: LatLng,
}

impl Region {
    /// Creates a validated region.
    ///
    /// # Errors
    ///
    /// Returns [`GridError::InvalidRegion`] when the zoom is out of range, a
    /// corner is not finite, or the corners do not span a positive area.
    pub fn new(zoom: u8, top_left: LatLng, bot_right: LatLng) -> Result<Self, GridError> {
        if zoom > MAX_ZOOM {
            return Err(GridError::InvalidRegion(format!(
                "zoom {} must be between {} and {}",
                zoom, MIN_ZOOM, MAX_ZOOM
            )));
        }
        let corners = [top_left.lat, top_left.lng, bot_right.lat, bot_right.lng];
        if corners.iter().any(|c| !c.is_finite()) {
            return Err(GridError::InvalidRegion(format!(
                "corners {} {} must be finite",
                top_left, bot_right
            )));
        }
        if top_left.lat <= bot_right.lat {
            return Err(GridError::InvalidRegion(format!(
                "top left latitude {} must be greater than bottom right latitude {}",
                top_left.lat, bot_right.lat
            )));
        }
        if top_left.lng >= bot_right.lng {
            return Err(GridError::InvalidRegion(format!(
                "top left longitude {} must be less than bottom right longitude {}",
                top_left.lng, bot_right.lng
            )));
        }
        Ok(Self {
            zoom,
            top_left,
            bot_right,
        })
    }

    /// Zoom level (0-18)
    #[inline]
    pub const fn zoom(&self) -> u8 {
        self.zoom
    }

    /// North-west corner
    #[inline]
    pub const fn top_left(&self) -> LatLng {
        self.top_left
    }

    /// South-east corner
    #[inline]
    pub const fn bot_right(&self) -> LatLng {
        self.bot_right
    }

    /// Extent in degrees of latitude.
    #[inline]
    pub fn height(&self) -> f64 {
        self.top_left.lat - self.bot_right.lat
    }

    /// Extent in degrees of longitude.
    #[inline]
    pub fn width(&self) -> f64 {
        self.bot_right.lng - self.top_left.lng
    }

    /// Returns true for tiles at the finest zoom level.
    #[inline]
    pub const fn is_device(&self) -> bool {
        self.zoom == MAX_ZOOM
    }

    /// Returns true if both corners of `other` lie inside this region.
    ///
    /// Edges are inclusive, so every region contains itself.
    pub fn contains(&self, other: &Region) -> bool {
        self.contains_point(other.top_left) && self.contains_point(other.bot_right)
    }

    /// Returns true if the point lies inside this region, edges included.
    pub fn contains_point(&self, point: LatLng) -> bool {
        self.top_left.lat >= point.lat
            && self.bot_right.lat <= point.lat
            && self.top_left.lng <= point.lng
            && self.bot_right.lng >= point.lng
    }

    /// Returns true if the two regions share some area.
    ///
    /// Regions that only touch along an edge or at a corner do not overlap.
    pub fn overlaps(&self, other: &Region) -> bool {
        !self.is_above(other)
            && !self.is_below(other)
            && !self.is_left_of(other)
            && !self.is_right_of(other)
    }

    fn is_above(&self, other: &Region) -> bool {
        self.bot_right.lat >= other.top_left.lat
    }

    fn is_below(&self, other: &Region) -> bool {
        self.top_left.lat <= other.bot_right.lat
    }

    fn is_left_of(&self, other: &Region) -> bool {
        self.bot_right.lng <= other.top_left.lng
    }

    fn is_right_of(&self, other: &Region) -> bool {
        self.top_left.lng >= other.bot_right.lng
    }

    /// The same-sized region immediately east of this one.
    ///
    /// No wraparound is applied at the antimeridian.
    pub fn right_neighbour(&self) -> Region {
        self.translated(0.0, self.width())
    }

    /// The same-sized region immediately south of this one.
    pub fn below_neighbour(&self) -> Region {
        self.translated(-self.height(), 0.0)
    }

    // Translation keeps both extents, so the corner invariants still hold.
    fn translated(&self, lat_delta: f64, lng_delta: f64) -> Region {
        Region {
            zoom: self.zoom,
            top_left: LatLng::new(self.top_left.lat + lat_delta, self.top_left.lng + lng_delta),
            bot_right: LatLng::new(
                self.bot_right.lat + lat_delta,
                self.bot_right.lng + lng_delta,
            ),
        }
    }
}

impl fmt::Display for Region {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Region[zoom {}, topLeft {}, botRight {}]",
            self.zoom, self.top_left, self.bot_right
        )
    }
}

/// Unvalidated wire shape of a [`Region`].
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RegionFields {
    zoom: u8,
    top_left: LatLng,
    bot_right: LatLng,
}

impl TryFrom<RegionFields> for Region {
    type Error = GridError;

    fn try_from(fields: RegionFields) -> Result<Self, Self::Error> {
        Region::new(fields.zoom, fields.top_left, fields.bot_right)
    }
}

/// Errors raised by grid construction and key decoding.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GridError {
    /// Region corners or zoom violate the region invariants
    #[error("Invalid region: {0}")]
    InvalidRegion(String),

    /// Entity key could not be decoded into a region
    #[error("Invalid region key '{key}': {reason}")]
    KeyFormat { key: String, reason: String },
}
