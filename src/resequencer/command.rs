/******************************************************************************
   Author: Joaquín Béjar García
   Email: jb@taunais.com
   Date: 16/10/26
******************************************************************************/

//! Resequencer command types.
//!
//! This module defines the commands a [`ResequencerSubmitter`] sends to the
//! task that owns the engine. Each command carries the oneshot channel its
//! reply goes back on.
//!
//! [`ResequencerSubmitter`]: super::ResequencerSubmitter

use super::error::ResequencerResult;
use super::result::InsertOutcome;
use super::stats::ResequencerStats;
use tokio::sync::oneshot;

/// Commands processed by the resequencer task.
#[derive(Debug)]
pub enum ResequencerCommand<E> {
    /// Insert an element into the pending sequence.
    Insert {
        /// The element to resequence.
        element: E,
        /// Reply channel; held back while the engine is full.
        reply: oneshot::Sender<ResequencerResult<InsertOutcome>>,
    },

    /// Deliver every pending element, ignoring gaps.
    Flush {
        /// Receives the number of delivered elements.
        reply: oneshot::Sender<usize>,
    },

    /// Read the delivery counters.
    Stats {
        /// Receives the counter snapshot.
        reply: oneshot::Sender<ResequencerStats>,
    },
}
