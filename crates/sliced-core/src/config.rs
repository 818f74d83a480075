//! Slice configuration parameters.

use std::error::Error;
use std::fmt;

/// How a full container picks its next capacity.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum GrowthPolicy {
    /// `max(1, capacity * 2)` elements.
    #[default]
    Doubling,
    /// `(capacity + 1) * 2` elements.
    Legacy,
}

impl GrowthPolicy {
    /// Next capacity after `current`, or `None` on arithmetic overflow.
    pub fn next_capacity(self, current: usize) -> Option<usize> {
        match self {
            Self::Doubling => current.checked_mul(2).map(|c| c.max(1)),
            Self::Legacy => current.checked_add(1)?.checked_mul(2),
        }
    }
}

/// Configuration for a slice container.
///
/// Derived containers (sub-ranges, maps, filters) inherit `max_capacity`
/// and `growth` from their source; only the initial capacity differs.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SliceConfig {
    /// Element slots reserved at construction.
    pub initial_capacity: usize,

    /// Upper bound on capacity in elements. `None` means the container
    /// grows until the allocator refuses.
    pub max_capacity: Option<usize>,

    /// Capacity growth policy applied when an append finds the buffer full.
    pub growth: GrowthPolicy,
}

impl SliceConfig {
    /// Default initial capacity.
    pub const DEFAULT_INITIAL_CAPACITY: usize = 0;

    /// Create a config with the given initial capacity and default policy.
    pub fn new(initial_capacity: usize) -> Self {
        Self {
            initial_capacity,
            max_capacity: None,
            growth: GrowthPolicy::default(),
        }
    }

    /// Set the capacity ceiling.
    pub fn with_max_capacity(mut self, max_capacity: usize) -> Self {
        self.max_capacity = Some(max_capacity);
        self
    }

    /// Set the growth policy.
    pub fn with_growth(mut self, growth: GrowthPolicy) -> Self {
        self.growth = growth;
        self
    }

    /// Same policy and ceiling, different initial capacity.
    ///
    /// Clamps the initial capacity to `max_capacity` so that a derived
    /// container never fails construction over a sizing hint.
    pub fn derived(&self, initial_capacity: usize) -> Self {
        let initial_capacity = match self.max_capacity {
            Some(max) => initial_capacity.min(max),
            None => initial_capacity,
        };
        Self {
            initial_capacity,
            max_capacity: self.max_capacity,
            growth: self.growth,
        }
    }

    /// Check structural invariants.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if let Some(max) = self.max_capacity {
            if max == 0 {
                return Err(ConfigError::ZeroMaxCapacity);
            }
            if self.initial_capacity > max {
                return Err(ConfigError::InitialExceedsMax {
                    initial: self.initial_capacity,
                    max,
                });
            }
        }
        Ok(())
    }
}

impl Default for SliceConfig {
    fn default() -> Self {
        Self::new(Self::DEFAULT_INITIAL_CAPACITY)
    }
}

/// Errors detected by [`SliceConfig::validate`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ConfigError {
    /// `max_capacity` was set to zero.
    ZeroMaxCapacity,
    /// `initial_capacity` is larger than `max_capacity`.
    InitialExceedsMax {
        /// Configured initial capacity.
        initial: usize,
        /// Configured ceiling.
        max: usize,
    },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ZeroMaxCapacity => write!(f, "max_capacity must be at least 1"),
            Self::InitialExceedsMax { initial, max } => {
                write!(f, "initial capacity {initial} exceeds max_capacity {max}")
            }
        }
    }
}

impl Error for ConfigError {}
