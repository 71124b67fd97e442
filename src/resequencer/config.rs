/******************************************************************************
   Author: Joaquín Béjar García
   Email: jb@taunais.com
   Date: 16/10/26
******************************************************************************/

//! Resequencer configuration.
//!
//! Both configurations deserialize from JSON with every field optional;
//! missing fields take the defaults listed on each struct.

use super::error::{ResequencerError, ResequencerResult};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// Settings for the stream resequencer.
///
/// # Examples
///
/// ```
/// use resequencer_rs::resequencer::StreamResequencerConfig;
///
/// let config = StreamResequencerConfig::from_json_str(r#"{"capacity": 10}"#).unwrap();
/// assert_eq!(config.capacity, 10);
/// assert_eq!(config.timeout_ms, Some(1000));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StreamResequencerConfig {
    /// Maximum number of pending elements (default 1000).
    pub capacity: usize,

    /// How long a blocked head waits for its predecessor, in milliseconds.
    /// `None` waits forever (default 1000).
    pub timeout_ms: Option<u64>,

    /// Upper bound on how long the delivery loop idles between attempts, in
    /// milliseconds (default 1000).
    pub delivery_attempt_interval_ms: u64,

    /// Refuse elements ordering at or before the last delivered one
    /// (default false).
    pub reject_old: bool,

    /// Silently drop elements without a sequence key instead of failing
    /// (default false).
    pub ignore_invalid: bool,
}

impl Default for StreamResequencerConfig {
    fn default() -> Self {
        Self {
            capacity: 1000,
            timeout_ms: Some(1000),
            delivery_attempt_interval_ms: 1000,
            reject_old: false,
            ignore_invalid: false,
        }
    }
}

impl StreamResequencerConfig {
    /// Parses a configuration from a JSON document.
    ///
    /// # Errors
    ///
    /// Returns [`ResequencerError::Json`] for malformed input and
    /// [`ResequencerError::Config`] if validation fails.
    pub fn from_json_str(json: &str) -> ResequencerResult<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Loads a configuration from a JSON file.
    ///
    /// # Errors
    ///
    /// Returns [`ResequencerError::Io`] if the file cannot be read, otherwise
    /// the same errors as [`from_json_str`](Self::from_json_str).
    pub fn from_file(path: impl AsRef<Path>) -> ResequencerResult<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json_str(&content)
    }

    /// Validates the configuration.
    ///
    /// # Errors
    ///
    /// Returns [`ResequencerError::Config`] if `capacity` or
    /// `delivery_attempt_interval_ms` is zero.
    pub fn validate(&self) -> ResequencerResult<()> {
        if self.capacity == 0 {
            return Err(ResequencerError::config("capacity must be > 0"));
        }
        if self.delivery_attempt_interval_ms == 0 {
            return Err(ResequencerError::config(
                "delivery_attempt_interval_ms must be > 0",
            ));
        }
        Ok(())
    }

    /// The element timeout, or `None` if unlimited.
    #[must_use]
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_ms.map(Duration::from_millis)
    }

    /// The maximum idle time of the delivery loop.
    #[must_use]
    pub fn delivery_attempt_interval(&self) -> Duration {
        Duration::from_millis(self.delivery_attempt_interval_ms)
    }

    /// Sets the capacity.
    #[must_use]
    pub fn with_capacity(mut self, capacity: usize) -> Self {
        self.capacity = capacity;
        self
    }

    /// Sets the element timeout; `None` waits forever.
    #[must_use]
    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout_ms = timeout.map(|t| u64::try_from(t.as_millis()).unwrap_or(u64::MAX));
        self
    }

    /// Enables or disables rejection of old elements.
    #[must_use]
    pub fn with_reject_old(mut self, reject_old: bool) -> Self {
        self.reject_old = reject_old;
        self
    }

    /// Enables or disables silently ignoring invalid elements.
    #[must_use]
    pub fn with_ignore_invalid(mut self, ignore_invalid: bool) -> Self {
        self.ignore_invalid = ignore_invalid;
        self
    }
}

/// Settings for the batch resequencer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BatchResequencerConfig {
    /// Number of elements that completes a batch (default 100).
    pub batch_size: usize,

    /// Time after which a partial batch is emitted, in milliseconds
    /// (default 1000).
    pub batch_timeout_ms: u64,

    /// Keep elements that compare equal instead of keeping only the first
    /// (default false).
    pub allow_duplicates: bool,

    /// Emit batches in descending order (default false).
    pub reverse: bool,

    /// Silently drop elements without a sequence key instead of failing
    /// (default false).
    pub ignore_invalid: bool,
}

impl Default for BatchResequencerConfig {
    fn default() -> Self {
        Self {
            batch_size: 100,
            batch_timeout_ms: 1000,
            allow_duplicates: false,
            reverse: false,
            ignore_invalid: false,
        }
    }
}

impl BatchResequencerConfig {
    /// Parses a configuration from a JSON document.
    ///
    /// # Errors
    ///
    /// Returns [`ResequencerError::Json`] for malformed input and
    /// [`ResequencerError::Config`] if validation fails.
    pub fn from_json_str(json: &str) -> ResequencerResult<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Loads a configuration from a JSON file.
    ///
    /// # Errors
    ///
    /// Returns [`ResequencerError::Io`] if the file cannot be read, otherwise
    /// the same errors as [`from_json_str`](Self::from_json_str).
    pub fn from_file(path: impl AsRef<Path>) -> ResequencerResult<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json_str(&content)
    }

    /// Validates the configuration.
    ///
    /// # Errors
    ///
    /// Returns [`ResequencerError::Config`] if `batch_size` or
    /// `batch_timeout_ms` is zero.
    pub fn validate(&self) -> ResequencerResult<()> {
        if self.batch_size == 0 {
            return Err(ResequencerError::config("batch_size must be > 0"));
        }
        if self.batch_timeout_ms == 0 {
            return Err(ResequencerError::config("batch_timeout_ms must be > 0"));
        }
        Ok(())
    }

    /// The batch timeout.
    #[must_use]
    pub fn batch_timeout(&self) -> Duration {
        Duration::from_millis(self.batch_timeout_ms)
    }
}
