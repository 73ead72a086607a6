mod statistics;

pub use statistics::BatchStatistics;

pub type TransactionId = i64;
pub type AlertId = i64;
pub type UserId = i64;

/// Returns the calendar-day key of a timestamp: its first 10 characters.
///
/// Shorter timestamps are returned whole.
pub fn day_key(timestamp: &str) -> &str {
    match timestamp.char_indices().nth(10) {
        Some((index, _)) => &timestamp[..index],
        None => timestamp
    }
}
