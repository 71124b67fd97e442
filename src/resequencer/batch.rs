/******************************************************************************
   Author: Joaquín Béjar García
   Email: jb@taunais.com
   Date: 16/10/26
******************************************************************************/

//! Batch resequencing.
//!
//! [`BatchResequencer`] collects elements until the batch is full or the
//! batch timeout elapses, then emits the whole batch sorted by the
//! comparator. Unlike the stream engine it never waits for gaps to close:
//! ordering is only guaranteed within a batch.

use super::comparator::SequenceElementComparator;
use super::config::BatchResequencerConfig;
use super::error::{ResequencerError, ResequencerResult};
use super::result::InsertOutcome;
use super::sender::SequenceSender;
use super::stats::ResequencerStats;
use std::cmp::Ordering;
use std::fmt::Debug;
use tokio::sync::mpsc;
use tokio::time::Instant;
use tracing::{debug, warn};

/// Collects elements into batches and emits each batch in order.
///
/// # Examples
///
/// ```
/// use resequencer_rs::resequencer::{BatchResequencer, BatchResequencerConfig, NaturalComparator};
///
/// let mut batch = BatchResequencer::new(NaturalComparator, BatchResequencerConfig::default());
/// for e in [5u64, 3, 4, 3] {
///     batch.add(e).ok();
/// }
/// assert_eq!(batch.flush(), vec![3, 4, 5]);
/// ```
pub struct BatchResequencer<E, C> {
    buffer: Vec<E>,
    comparator: C,
    config: BatchResequencerConfig,
    batch_started: Instant,
    stats: ResequencerStats,
}

impl<E, C> BatchResequencer<E, C>
where
    E: Debug,
    C: SequenceElementComparator<E>,
{
    /// Creates a batch resequencer.
    #[must_use]
    pub fn new(comparator: C, config: BatchResequencerConfig) -> Self {
        Self {
            buffer: Vec::with_capacity(config.batch_size),
            comparator,
            config,
            batch_started: Instant::now(),
            stats: ResequencerStats::default(),
        }
    }

    /// Adds an element to the current batch.
    ///
    /// # Errors
    ///
    /// Returns [`ResequencerError::InvalidElement`] if the comparator rejects
    /// the element and `ignore_invalid` is off.
    pub fn add(&mut self, element: E) -> ResequencerResult<InsertOutcome> {
        if !self.comparator.is_valid(&element) {
            if self.config.ignore_invalid {
                self.stats.ignored = self.stats.ignored.saturating_add(1);
                warn!(element = ?element, "invalid element ignored");
                return Ok(InsertOutcome::Ignored);
            }
            self.stats.rejected = self.stats.rejected.saturating_add(1);
            return Err(ResequencerError::InvalidElement(format!("{element:?}")));
        }
        if self.buffer.is_empty() {
            self.batch_started = Instant::now();
        }
        self.buffer.push(element);
        self.stats.accepted = self.stats.accepted.saturating_add(1);
        Ok(InsertOutcome::Accepted)
    }

    /// Returns `true` once the batch is full or the batch timeout has
    /// elapsed since its first element arrived.
    #[must_use]
    pub fn should_flush(&self) -> bool {
        self.is_full()
            || (!self.is_empty() && self.batch_started.elapsed() >= self.config.batch_timeout())
    }

    /// Returns `true` if the batch holds `batch_size` elements.
    #[inline]
    #[must_use]
    pub fn is_full(&self) -> bool {
        self.buffer.len() >= self.config.batch_size
    }

    /// Number of buffered elements.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.buffer.len()
    }

    /// Returns `true` if nothing is buffered.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }

    /// Takes the current batch in comparator order.
    ///
    /// The sort is stable. Unless `allow_duplicates` is set, only the first
    /// of several equal elements is kept.
    pub fn flush(&mut self) -> Vec<E> {
        let mut batch = std::mem::take(&mut self.buffer);
        batch.sort_by(|a, b| self.comparator.compare(a, b));

        if !self.config.allow_duplicates {
            let before = batch.len();
            batch.dedup_by(|later, earlier| {
                self.comparator.compare(later, earlier) == Ordering::Equal
            });
            let removed = (before - batch.len()) as u64;
            self.stats.duplicates = self.stats.duplicates.saturating_add(removed);
        }

        if self.config.reverse {
            batch.reverse();
        }
        batch
    }

    /// Snapshot of the counters.
    #[must_use]
    pub fn stats(&self) -> ResequencerStats {
        self.stats
    }

    /// Flushes the current batch into `sender`.
    fn emit<S: SequenceSender<E>>(&mut self, sender: &mut S) {
        let batch = self.flush();
        if batch.is_empty() {
            return;
        }
        debug!(size = batch.len(), "emitting batch");
        for element in batch {
            self.stats.delivered = self.stats.delivered.saturating_add(1);
            if let Err(e) = sender.send_element(element) {
                self.stats.send_failures = self.stats.send_failures.saturating_add(1);
                warn!(error = %e, "sender failed to accept element");
            }
        }
    }

    /// Drains `receiver` into batches delivered to `sender`.
    ///
    /// A batch is emitted when it is full or its timeout elapses. The final
    /// partial batch is emitted once `receiver` closes. Returns the final
    /// counters.
    pub async fn run<S: SequenceSender<E>>(
        mut self,
        mut receiver: mpsc::Receiver<E>,
        mut sender: S,
    ) -> ResequencerStats {
        let batch_timeout = self.config.batch_timeout();
        loop {
            let flush_at = self.batch_started + batch_timeout;
            tokio::select! {
                element = receiver.recv() => match element {
                    Some(element) => {
                        if let Err(e) = self.add(element) {
                            warn!(error = %e, "element dropped from batch");
                        }
                        if self.is_full() {
                            self.emit(&mut sender);
                        }
                    }
                    None => break,
                },
                () = tokio::time::sleep_until(flush_at), if !self.is_empty() => {
                    self.emit(&mut sender);
                }
            }
        }
        self.emit(&mut sender);
        self.stats
    }
}
