//! Capture configuration
//!
//! The only tunable is how many stack frames a new error records. It is read
//! when an error is constructed; changing it afterwards does not touch errors
//! that already exist.

use std::sync::atomic::{AtomicUsize, Ordering};
use thiserror::Error;

/// Default maximum number of stack frames captured per error
pub const DEFAULT_MAX_STACK: usize = 10;

/// Environment variable read by [`CaptureConfig::from_env`]
pub const MAX_STACK_ENV: &str = "ERRCHAIN_MAX_STACK";

static GLOBAL_MAX_STACK: AtomicUsize = AtomicUsize::new(DEFAULT_MAX_STACK);

/// Errors raised while loading a [`CaptureConfig`]
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// The configured frame limit is not a non-negative integer
    #[error("invalid ERRCHAIN_MAX_STACK value '{value}': expected a non-negative integer")]
    InvalidMaxStack { value: String },
}

/// Controls how call sites are captured when an error is built.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CaptureConfig {
    /// Maximum number of frames recorded for each error
    pub max_stack: usize,
}

impl Default for CaptureConfig {
    fn default() -> Self {
        Self {
            max_stack: DEFAULT_MAX_STACK,
        }
    }
}

impl CaptureConfig {
    /// Create a config with the given frame limit
    pub fn new(max_stack: usize) -> Self {
        Self { max_stack }
    }

    /// Load from `ERRCHAIN_MAX_STACK`, falling back to the default when unset.
    pub fn from_env() -> Result<Self, ConfigError> {
        match std::env::var(MAX_STACK_ENV) {
            Ok(value) => Self::parse_max_stack(&value),
            Err(_) => Ok(Self::default()),
        }
    }

    fn parse_max_stack(value: &str) -> Result<Self, ConfigError> {
        value
            .trim()
            .parse::<usize>()
            .map(Self::new)
            .map_err(|_| ConfigError::InvalidMaxStack {
                value: value.to_string(),
            })
    }

    /// The process-wide config used by the plain constructors
    pub fn global() -> Self {
        Self::new(GLOBAL_MAX_STACK.load(Ordering::Relaxed))
    }

    /// Make this config the process-wide default
    pub fn install(self) {
        GLOBAL_MAX_STACK.store(self.max_stack, Ordering::Relaxed);
        tracing::debug!(max_stack = self.max_stack, "installed errchain capture config");
    }
}
