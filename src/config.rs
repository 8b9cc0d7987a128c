//! Configuration for versionkv
//!
//! Centralized configuration with sensible defaults.

/// Default initial capacity of the pending map (matches the in-memory store)
pub const DEFAULT_PENDING_CAPACITY: usize = 1024;

/// Configuration for a [`VersionDb`](crate::VersionDb) overlay
#[derive(Debug, Clone)]
pub struct Config {
    // -------------------------------------------------------------------------
    // Pending Buffer Configuration
    // -------------------------------------------------------------------------
    /// Initial capacity of the pending map.
    /// Also the capacity the map is reset to after a successful commit.
    pub pending_capacity: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            pending_capacity: DEFAULT_PENDING_CAPACITY,
        }
    }
}

impl Config {
    /// Create a new config builder
    pub fn builder() -> ConfigBuilder {
        ConfigBuilder::default()
    }
}

/// Builder for Config
#[derive(Default)]
pub struct ConfigBuilder {
    config: Config,
}

impl ConfigBuilder {
    /// Set the initial capacity of the pending map
    pub fn pending_capacity(mut self, capacity: usize) -> Self {
        self.config.pending_capacity = capacity;
        self
    }

    pub fn build(self) -> Config {
        self.config
    }
}
