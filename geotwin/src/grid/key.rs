//! Canonical entity keys for grid tiles.
//!
//! A key is `zoom:topLeftLat:topLeftLng:botRightLat:botRightLng` with every
//! corner printed to [`KEY_PRECISION`] decimal places. Every corner produced by
//! subdivision is a multiple of 10/2^14 degrees, which needs at most 13
//! decimals, so keys of grid tiles decode to bit-identical regions.

use super::types::{GridError, LatLng, Region};

/// Decimal places used for each corner number in a key.
pub const KEY_PRECISION: usize = 13;

const FIELD_COUNT: usize = 5;

/// Encodes a region as its canonical key.
pub fn key_of(region: &Region) -> String {
    format!(
        "{}:{:.p$}:{:.p$}:{:.p$}:{:.p$}",
        region.zoom,
        unsigned_zero(region.top_left.lat),
        unsigned_zero(region.top_left.lng),
        unsigned_zero(region.bot_right.lat),
        unsigned_zero(region.bot_right.lng),
        p = KEY_PRECISION
    )
}

// -0.0 compares equal to 0.0 but prints with a sign
fn unsigned_zero(degrees: f64) -> f64 {
    if degrees == 0.0 {
        0.0
    } else {
        degrees
    }
}

/// Decodes a canonical key back into its region.
///
/// Only canonical keys are accepted: re-encoding the decoded region must give
/// back the same string, so every tile has exactly one key.
///
/// # Errors
///
/// Returns [`GridError::KeyFormat`] when the key has the wrong number of
/// fields, a field does not parse, the corners do not form a valid region, or
/// the key is not in canonical form.
pub fn region_of(key: &str) -> Result<Region, GridError> {
    let fields: Vec<&str> = key.split(':').collect();
    let [zoom, tl_lat, tl_lng, br_lat, br_lng] = fields.as_slice() else {
        return Err(key_error(
            key,
            format!("expected {} fields, found {}", FIELD_COUNT, fields.len()),
        ));
    };

    let zoom: u8 = zoom
        .parse()
        .map_err(|e| key_error(key, format!("zoom '{}': {}", zoom, e)))?;
    let top_left = LatLng::new(parse_degrees(key, tl_lat)?, parse_degrees(key, tl_lng)?);
    let bot_right = LatLng::new(parse_degrees(key, br_lat)?, parse_degrees(key, br_lng)?);

    let region =
        Region::new(zoom, top_left, bot_right).map_err(|e| key_error(key, e.to_string()))?;
    if key_of(&region) != key {
        return Err(key_error(key, "not in canonical form".to_string()));
    }
    Ok(region)
}

fn parse_degrees(key: &str, field: &str) -> Result<f64, GridError> {
    field
        .parse()
        .map_err(|e| key_error(key, format!("coordinate '{}': {}", field, e)))
}

fn key_error(key: &str, reason: String) -> GridError {
    GridError::KeyFormat {
        key: key.to_string(),
        reason,
    }
}
