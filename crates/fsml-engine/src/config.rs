//! Compile and runtime switches for an [`Engine`](crate::Engine).
//!
//! | Setting | Default | Effect |
//! |---------|---------|--------|
//! | `strict` | `false` | mismatched closing tags, undeclared target/error states and state names that reuse a structural tag become validation errors |
//! | `fallback` | `true` | a failed hook sequence retries as `<event>_failed` when the event declares an `errorState` |
//!
//! The struct deserializes from any serde format with every field optional,
//! so it can be embedded in a larger TOML file.

use serde::Deserialize;

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub strict: bool,
    pub fallback: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self { strict: false, fallback: true }
    }
}

impl EngineConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_strict(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }

    pub fn with_fallback(mut self, fallback: bool) -> Self {
        self.fallback = fallback;
        self
    }
}
