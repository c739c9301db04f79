use thiserror::Error;

/// Errors surfaced by the availability core.
///
/// None of these are retried or swallowed here; the calling layer decides
/// what (if anything) to tell the end user.
#[derive(Debug, Error)]
pub enum SlotError {
    /// Weekday outside ISO range 1 (Monday) .. 7 (Sunday).
    #[error("weekday must be between 1 and 7 (inclusive), got {0}")]
    InvalidWeekday(u8),

    /// Hour-of-day outside 0 .. 23.
    #[error("hour must be between 0 and 23 (inclusive), got {0}")]
    InvalidHour(u32),

    /// Network-level failure, timeout, or a non-2xx response.
    #[error("booking API request failed: {0}")]
    Transport(String),

    /// Response body that is not JSON or does not have the expected shape.
    #[error("unexpected booking API response: {0}")]
    Parse(String),
}

impl From<reqwest::Error> for SlotError {
    fn from(err: reqwest::Error) -> Self {
        SlotError::Transport(err.to_string())
    }
}

impl From<serde_json::Error> for SlotError {
    fn from(err: serde_json::Error) -> Self {
        SlotError::Parse(err.to_string())
    }
}
