//! Dependency engine settings

/// Settings for a [`System`](crate::System)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SystemOptions {
    /// Run dependencies and actions when a column changes (default: true)
    pub dependencies_enabled: bool,
    /// How many times a propagation may re-enter a column that is already
    /// being propagated (default: 1, a single pass around any cycle)
    pub max_circle_count: u32,
}

impl Default for SystemOptions {
    fn default() -> Self {
        Self {
            dependencies_enabled: true,
            max_circle_count: 1,
        }
    }
}

impl SystemOptions {
    /// Options with the engine turned off, for bulk loading
    pub fn disabled() -> Self {
        Self {
            dependencies_enabled: false,
            ..Self::default()
        }
    }

    /// Set the circle bound
    pub fn with_max_circle_count(mut self, max_circle_count: u32) -> Self {
        self.max_circle_count = max_circle_count;
        self
    }
}
