// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! Log store configuration

/// Default capacity of the change notification channel
pub const DEFAULT_CHANNEL_CAPACITY: usize = 256;

/// Log store configuration
#[derive(Debug, Clone)]
pub struct LogStoreConfig {
    /// Maximum records to keep; the oldest are evicted first. `None` keeps everything.
    pub max_records: Option<usize>,
    /// Emit [`StoreEvent::Cleared`](super::StoreEvent::Cleared) when the store is cleared
    pub notify_on_clear: bool,
    /// Capacity of the broadcast channel handed out by `subscribe`
    pub channel_capacity: usize,
}

impl Default for LogStoreConfig {
    fn default() -> Self {
        Self {
            max_records: None,
            notify_on_clear: false,
            channel_capacity: DEFAULT_CHANNEL_CAPACITY,
        }
    }
}

impl LogStoreConfig {
    /// Create a new store config
    pub fn new() -> Self {
        Self::default()
    }

    /// Limit the number of retained records
    pub fn max_records(mut self, max: usize) -> Self {
        self.max_records = Some(max.max(1));
        self
    }

    /// Notify observers when the store is cleared
    pub fn notify_on_clear(mut self, notify: bool) -> Self {
        self.notify_on_clear = notify;
        self
    }

    /// Set broadcast channel capacity
    pub fn channel_capacity(mut self, capacity: usize) -> Self {
        self.channel_capacity = capacity.max(1);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_keep_everything_quietly() {
        let config = LogStoreConfig::default();
        assert_eq!(config.max_records, None);
        assert!(!config.notify_on_clear);
        assert_eq!(config.channel_capacity, DEFAULT_CHANNEL_CAPACITY);
    }

    #[test]
    fn test_zero_limits_are_clamped() {
        let config = LogStoreConfig::new().max_records(0).channel_capacity(0);
        assert_eq!(config.max_records, Some(1));
        assert_eq!(config.channel_capacity, 1);
    }
}
