use std::time::Duration;

/// Default interval between active sweeps
pub const DEFAULT_SWEEP_INTERVAL: Duration = Duration::from_secs(1);

/// Configuration for the store's background sweeper
///
/// # Example
///
/// ```rust
/// use stashr_core::StoreConfig;
/// use std::time::Duration;
///
/// let config = StoreConfig::default()
///     .with_sweep_interval(Duration::from_millis(500));
/// ```
#[derive(Debug, Clone)]
pub struct StoreConfig {
    /// Interval between sweeps of expired entries (default: 1 second)
    pub sweep_interval: Duration,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            sweep_interval: DEFAULT_SWEEP_INTERVAL,
        }
    }
}

impl StoreConfig {
    /// Creates a new configuration with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the sweep interval
    ///
    /// This bounds how long an expired, never-accessed entry can keep
    /// occupying memory. A zero interval is replaced with one millisecond,
    /// since `tokio::time::interval` rejects zero periods.
    pub fn with_sweep_interval(mut self, interval: Duration) -> Self {
        self.sweep_interval = interval.max(Duration::from_millis(1));
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = StoreConfig::default();
        assert_eq!(config.sweep_interval, Duration::from_secs(1));
    }

    #[test]
    fn test_custom_sweep_interval() {
        let config = StoreConfig::new().with_sweep_interval(Duration::from_secs(30));
        assert_eq!(config.sweep_interval, Duration::from_secs(30));
    }

    #[test]
    fn test_zero_interval_is_clamped() {
        let config = StoreConfig::default().with_sweep_interval(Duration::ZERO);
        assert_eq!(config.sweep_interval, Duration::from_millis(1));
    }
}
