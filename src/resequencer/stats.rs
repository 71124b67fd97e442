/******************************************************************************
   Author: Joaquín Béjar García
   Email: jb@taunais.com
   Date: 16/10/26
******************************************************************************/

//! Delivery statistics.

use serde::{Deserialize, Serialize};

/// Snapshot of an engine's counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResequencerStats {
    /// Elements accepted into the pending sequence.
    pub accepted: u64,
    /// Elements handed to the sender, forced ones included.
    pub delivered: u64,
    /// Elements delivered across a gap after timing out or on flush.
    pub forced: u64,
    /// Elements dropped because an equal element was already pending.
    pub duplicates: u64,
    /// Invalid elements dropped with `ignore_invalid`.
    pub ignored: u64,
    /// Elements refused with an error.
    pub rejected: u64,
    /// Deliveries the sender failed to accept.
    pub send_failures: u64,
}

impl ResequencerStats {
    /// Number of in-order deliveries, i.e. those that did not skip a gap.
    #[inline]
    #[must_use]
    pub fn in_order(&self) -> u64 {
        self.delivered.saturating_sub(self.forced)
    }
}
