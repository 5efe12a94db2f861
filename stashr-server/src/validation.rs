//! Request checks shared by the HTTP and gRPC front-ends.

use std::time::Duration;
use thiserror::Error;

/// Maximum allowed key length (1 KB)
pub const MAX_KEY_LENGTH: usize = 1024;

/// Maximum allowed value length (1 MB)
pub const MAX_VALUE_LENGTH: usize = 1024 * 1024;

/// Longest key prefix written to logs
const MAX_LOG_LEN: usize = 16;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Key cannot be empty")]
    EmptyKey,

    #[error("Key exceeds maximum length of {} bytes", MAX_KEY_LENGTH)]
    KeyTooLong,

    #[error("Value exceeds maximum length of {} bytes", MAX_VALUE_LENGTH)]
    ValueTooLong,
}

/// Validates that a key is non-empty and within size limits
pub fn validate_key(key: &str) -> Result<(), ValidationError> {
    if key.is_empty() {
        return Err(ValidationError::EmptyKey);
    }
    if key.len() > MAX_KEY_LENGTH {
        return Err(ValidationError::KeyTooLong);
    }
    Ok(())
}

/// Validates that a value is within size limits
pub fn validate_value(value: &str) -> Result<(), ValidationError> {
    if value.len() > MAX_VALUE_LENGTH {
        return Err(ValidationError::ValueTooLong);
    }
    Ok(())
}

/// Converts a wire TTL in seconds into a store TTL. Zero and negative values
/// mean the key never expires.
pub fn ttl_from_seconds(ttl_seconds: i64) -> Option<Duration> {
    u64::try_from(ttl_seconds)
        .ok()
        .filter(|&secs| secs > 0)
        .map(Duration::from_secs)
}

/// Truncates a key for logging so that full keys never reach the logs
pub fn truncate_key_for_log(key: &str) -> String {
    if key.len() <= MAX_LOG_LEN {
        return key.to_string();
    }

    let mut end = MAX_LOG_LEN;
    while !key.is_char_boundary(end) {
        end -= 1;
    }
    format!("{}...", &key[..end])
}
