use std::time::{SystemTime, UNIX_EPOCH};

/// Current unix timestamp in seconds.
/// A clock set before the epoch yields zero rather than panicking.
pub fn unix_timestamp() -> u64 {
  SystemTime::now()
    .duration_since(UNIX_EPOCH)
    .map(|d| d.as_secs())
    .unwrap_or_default()
}
