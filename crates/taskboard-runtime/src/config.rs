//! Runtime configuration.

use std::time::Duration;

/// Shortest period accepted for timer-driven loops.
pub const MIN_INTERVAL: Duration = Duration::from_millis(1);

/// Timing and capacity knobs for the runtime.
#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    /// How often poll-delivered views resample the board.
    pub poll_interval: Duration,
    /// How often idle task owners are swept offline.
    pub sweep_interval: Duration,
    /// Bound of the command queue. Submitters wait when it is full.
    pub queue_capacity: usize,
    /// Buffered board events per subscriber before it lags.
    pub event_capacity: usize,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            poll_interval: Duration::from_secs(1),
            sweep_interval: Duration::from_secs(60),
            queue_capacity: 256,
            event_capacity: 256,
        }
    }
}

impl RuntimeConfig {
    /// Creates a new config with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the poll interval, at least [`MIN_INTERVAL`].
    pub fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval.max(MIN_INTERVAL);
        self
    }

    /// Sets the offline sweep interval, at least [`MIN_INTERVAL`].
    pub fn with_sweep_interval(mut self, interval: Duration) -> Self {
        self.sweep_interval = interval.max(MIN_INTERVAL);
        self
    }

    /// Sets the command queue bound.
    pub fn with_queue_capacity(mut self, capacity: usize) -> Self {
        self.queue_capacity = capacity.max(1);
        self
    }

    /// Sets the event buffer size.
    pub fn with_event_capacity(mut self, capacity: usize) -> Self {
        self.event_capacity = capacity.max(1);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = RuntimeConfig::default();

        assert_eq!(config.poll_interval, Duration::from_secs(1));
        assert_eq!(config.sweep_interval, Duration::from_secs(60));
        assert_eq!(config.queue_capacity, 256);
        assert_eq!(config.event_capacity, 256);
    }

    #[test]
    fn test_config_builder() {
        let config = RuntimeConfig::new()
            .with_poll_interval(Duration::from_millis(100))
            .with_sweep_interval(Duration::from_secs(5))
            .with_queue_capacity(0)
            .with_event_capacity(8);

        assert_eq!(config.poll_interval, Duration::from_millis(100));
        assert_eq!(config.sweep_interval, Duration::from_secs(5));
        assert_eq!(config.queue_capacity, 1);
        assert_eq!(config.event_capacity, 8);
    }

    #[test]
    fn test_zero_intervals_are_clamped() {
        let config = RuntimeConfig::new()
            .with_poll_interval(Duration::ZERO)
            .with_sweep_interval(Duration::ZERO);

        assert_eq!(config.poll_interval, MIN_INTERVAL);
        assert_eq!(config.sweep_interval, MIN_INTERVAL);
    }
}
