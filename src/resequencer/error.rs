/******************************************************************************
   Author: Joaquín Béjar García
   Email: jb@taunais.com
   Date: 16/10/26
******************************************************************************/

//! Error types for resequencer operations.

use thiserror::Error;

/// Result type returned by fallible resequencer operations.
pub type ResequencerResult<T> = Result<T, ResequencerError>;

/// Errors that can occur when interacting with a resequencer.
#[derive(Debug, Error)]
pub enum ResequencerError {
    /// The resequencer has been stopped or its task has exited.
    #[error("resequencer has been shut down")]
    Shutdown,

    /// The element orders at or before the last delivered element and
    /// `reject_old` is enabled.
    #[error("rejecting element {element}: it should have been sent before the last delivered element {last_delivered}")]
    RejectedOld {
        /// Debug rendering of the rejected element.
        element: String,
        /// Debug rendering of the last delivered element.
        last_delivered: String,
    },

    /// The comparator could not derive a sequence key from the element.
    #[error("invalid element {0}: no usable sequence key")]
    InvalidElement(String),

    /// The engine already holds `capacity` pending elements.
    #[error("capacity of {capacity} pending elements exceeded")]
    CapacityExceeded {
        /// The configured capacity.
        capacity: usize,
    },

    /// The downstream sender failed to accept an element.
    #[error("failed to send element downstream: {0}")]
    Send(String),

    /// Invalid configuration.
    #[error("configuration error: {0}")]
    Config(String),

    /// I/O error while loading configuration.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Malformed JSON configuration.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl ResequencerError {
    /// Creates a configuration error.
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Creates a send error.
    pub fn send(message: impl Into<String>) -> Self {
        Self::Send(message.into())
    }

    /// Returns `true` if the error was caused by the element itself rather
    /// than by the state of the resequencer.
    #[must_use]
    pub fn is_element_error(&self) -> bool {
        matches!(self, Self::RejectedOld { .. } | Self::InvalidElement(_))
    }
}
