//! Sharding tags for bulk event queries.
//!
//! Each entity tags its events with `region-{n}` where `n` is a stable hash
//! of its key modulo the configured number of shards. The hash is the
//! 31-multiplier string hash over UTF-16 code units, so tags are identical
//! across platforms, processes and releases.

/// Prefix of every sharding tag.
pub const TAG_PREFIX: &str = "region-";

/// Shard number of an entity key, in `0..number_of_shards`.
///
/// A shard count of zero is treated as one.
pub fn shard_of(entity_id: &str, number_of_shards: u32) -> u32 {
    let hash = entity_id
        .encode_utf16()
        .fold(0i32, |h, unit| h.wrapping_mul(31).wrapping_add(i32::from(unit)));
    let shards = i64::from(number_of_shards.max(1));
    i64::from(hash).rem_euclid(shards) as u32
}

/// Sharding tag of an entity key.
pub fn tag_for(entity_id: &str, number_of_shards: u32) -> String {
    format!("{}{}", TAG_PREFIX, shard_of(entity_id, number_of_shards))
}
