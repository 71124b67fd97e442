/******************************************************************************
   Author: Joaquín Béjar García
   Email: jb@taunais.com
   Date: 16/10/26
******************************************************************************/

//! Stream resequencing engine.
//!
//! The engine holds out-of-order elements in a [`Sequence`] and hands them
//! to a [`SequenceSender`] in comparator order. An element is delivered as
//! soon as it is the immediate successor of the last delivered element. If
//! the head of the sequence is blocked by a gap for longer than the timeout,
//! it is delivered anyway and successor-chasing resumes from it.
//!
//! The engine itself has no timer: callers drive it through
//! [`deliver`](ResequencerEngine::deliver) and can sleep until
//! [`next_deadline`](ResequencerEngine::next_deadline).
//! [`StreamResequencer`](super::StreamResequencer) does exactly that on a
//! tokio task.

use super::comparator::SequenceElementComparator;
use super::config::StreamResequencerConfig;
use super::element::{Element, ElementComparator};
use super::error::{ResequencerError, ResequencerResult};
use super::result::InsertOutcome;
use super::sender::SequenceSender;
use super::sequence::Sequence;
use super::stats::ResequencerStats;
use std::cmp::Ordering;
use std::fmt::Debug;
use std::time::Duration;
use tokio::time::Instant;
use tracing::{debug, trace, warn};

/// Online, timeout-bounded resequencer.
///
/// # Examples
///
/// ```
/// use resequencer_rs::resequencer::{
///     NaturalComparator, ResequencerEngine, ResequencerResult, StreamResequencerConfig,
/// };
///
/// let mut out = Vec::new();
/// let config = StreamResequencerConfig::default().with_timeout(None);
/// let mut engine = ResequencerEngine::new(
///     NaturalComparator,
///     |e: u64| -> ResequencerResult<()> {
///         out.push(e);
///         Ok(())
///     },
///     &config,
/// );
///
/// for e in [3, 1, 2] {
///     engine.insert(e).ok();
/// }
/// engine.flush();
/// drop(engine);
/// assert_eq!(out, vec![1, 2, 3]);
/// ```
pub struct ResequencerEngine<E, C, S> {
    /// Pending elements in comparator order.
    sequence: Sequence<Element<E>, ElementComparator<C>>,

    /// Downstream receiver.
    sender: S,

    /// Last element handed to the sender.
    last_delivered: Option<E>,

    /// How long a blocked head waits; `None` waits forever.
    timeout: Option<Duration>,

    /// Maximum number of pending elements.
    capacity: usize,

    reject_old: bool,
    ignore_invalid: bool,
    stats: ResequencerStats,
    stopped: bool,
}

impl<E, C, S> ResequencerEngine<E, C, S>
where
    E: Clone + Debug,
    C: SequenceElementComparator<E>,
    S: SequenceSender<E>,
{
    /// Creates an engine ordering elements with `comparator` and delivering
    /// them to `sender`.
    #[must_use]
    pub fn new(comparator: C, sender: S, config: &StreamResequencerConfig) -> Self {
        Self {
            sequence: Sequence::new(ElementComparator::new(comparator)),
            sender,
            last_delivered: None,
            timeout: config.timeout(),
            capacity: config.capacity,
            reject_old: config.reject_old,
            ignore_invalid: config.ignore_invalid,
            stats: ResequencerStats::default(),
            stopped: false,
        }
    }

    /// Inserts an element, stamping it with the current instant.
    ///
    /// Delivery does not happen here; call [`deliver`](Self::deliver).
    ///
    /// # Errors
    ///
    /// - [`ResequencerError::Shutdown`] if the engine was stopped
    /// - [`ResequencerError::InvalidElement`] if the comparator rejects the
    ///   element and `ignore_invalid` is off
    /// - [`ResequencerError::RejectedOld`] if `reject_old` is on and the
    ///   element orders at or before the last delivered one
    /// - [`ResequencerError::CapacityExceeded`] if the engine is full
    pub fn insert(&mut self, element: E) -> ResequencerResult<InsertOutcome> {
        self.insert_at(element, Instant::now())
    }

    /// Inserts an element that arrived at `now`.
    ///
    /// # Errors
    ///
    /// Same as [`insert`](Self::insert).
    pub fn insert_at(&mut self, element: E, now: Instant) -> ResequencerResult<InsertOutcome> {
        if self.stopped {
            return Err(ResequencerError::Shutdown);
        }

        let comparator = self.sequence.comparator().inner();

        if !comparator.is_valid(&element) {
            if self.ignore_invalid {
                self.stats.ignored = self.stats.ignored.saturating_add(1);
                warn!(element = ?element, "invalid element ignored");
                return Ok(InsertOutcome::Ignored);
            }
            self.stats.rejected = self.stats.rejected.saturating_add(1);
            return Err(ResequencerError::InvalidElement(format!("{element:?}")));
        }

        if self.reject_old
            && let Some(last) = &self.last_delivered
            && comparator.compare(&element, last) != Ordering::Greater
        {
            self.stats.rejected = self.stats.rejected.saturating_add(1);
            warn!(element = ?element, last_delivered = ?last, "old element rejected");
            return Err(ResequencerError::RejectedOld {
                element: format!("{element:?}"),
                last_delivered: format!("{last:?}"),
            });
        }

        let element = Element::new(element, now);
        if self.sequence.contains(&element) {
            self.stats.duplicates = self.stats.duplicates.saturating_add(1);
            debug!(element = ?element.value(), "duplicate element dropped");
            return Ok(InsertOutcome::Duplicate);
        }

        if self.sequence.len() >= self.capacity {
            return Err(ResequencerError::CapacityExceeded {
                capacity: self.capacity,
            });
        }

        trace!(element = ?element.value(), pending = self.sequence.len() + 1, "element inserted");
        self.sequence.insert(element);
        self.stats.accepted = self.stats.accepted.saturating_add(1);
        Ok(InsertOutcome::Accepted)
    }

    /// Delivers every element that is deliverable now.
    ///
    /// Returns the number of delivered elements; `0` on an empty sequence.
    pub fn deliver(&mut self) -> usize {
        self.deliver_at(Instant::now())
    }

    /// Delivers every element that is deliverable at `now`.
    pub fn deliver_at(&mut self, now: Instant) -> usize {
        let mut delivered = 0;
        while self.deliver_next_at(now, false) {
            delivered += 1;
        }
        delivered
    }

    /// Delivers the head of the sequence if it is deliverable now.
    ///
    /// The head is deliverable when it is the immediate successor of the last
    /// delivered element or when it has waited at least the timeout.
    pub fn deliver_next(&mut self) -> bool {
        self.deliver_next_at(Instant::now(), false)
    }

    /// Delivers all pending elements in order, ignoring gaps and timeouts.
    ///
    /// Returns the number of delivered elements.
    pub fn flush(&mut self) -> usize {
        let now = Instant::now();
        let mut delivered = 0;
        while self.deliver_next_at(now, true) {
            delivered += 1;
        }
        if delivered > 0 {
            debug!(delivered, "pending elements flushed");
        }
        delivered
    }

    fn deliver_next_at(&mut self, now: Instant, force: bool) -> bool {
        if self.stopped {
            return false;
        }
        let Some(head) = self.sequence.first() else {
            return false;
        };

        let in_order = self.successor_of_last_delivered(head);
        if !in_order && !force && !head.is_timed_out(self.timeout, now) {
            return false;
        }

        let Some(element) = self.sequence.remove_first() else {
            return false;
        };
        let waited = now.saturating_duration_since(element.enqueued_at());
        let value = element.into_value();

        if in_order {
            trace!(element = ?value, "delivering element");
        } else {
            self.stats.forced = self.stats.forced.saturating_add(1);
            debug!(
                element = ?value,
                last_delivered = ?self.last_delivered,
                waited_ms = u64::try_from(waited.as_millis()).unwrap_or(u64::MAX),
                "delivering element across gap"
            );
        }

        self.last_delivered = Some(value.clone());
        self.stats.delivered = self.stats.delivered.saturating_add(1);

        // the element already left the sequence; a failed send is not retried
        if let Err(e) = self.sender.send_element(value) {
            self.stats.send_failures = self.stats.send_failures.saturating_add(1);
            warn!(error = %e, "sender failed to accept element");
        }

        true
    }

    fn successor_of_last_delivered(&self, element: &Element<E>) -> bool {
        self.last_delivered.as_ref().is_some_and(|last| {
            self.sequence
                .comparator()
                .inner()
                .successor(element.value(), last)
        })
    }

    /// The instant at which the head of the sequence becomes deliverable.
    ///
    /// Returns `None` if nothing is pending, the engine is stopped, or the
    /// timeout is unlimited and the head is blocked by a gap.
    #[must_use]
    pub fn next_deadline(&self) -> Option<Instant> {
        if self.stopped {
            return None;
        }
        let head = self.sequence.first()?;
        if self.successor_of_last_delivered(head) {
            return Some(head.enqueued_at());
        }
        head.deadline(self.timeout)
    }

    /// Stops the engine, discarding pending elements.
    ///
    /// Returns the number of discarded elements. Further inserts fail with
    /// [`ResequencerError::Shutdown`] and nothing more is delivered.
    pub fn stop(&mut self) -> usize {
        let discarded = self.sequence.len();
        self.sequence.clear();
        self.stopped = true;
        debug!(discarded, "resequencer engine stopped");
        discarded
    }

    /// Returns `true` once [`stop`](Self::stop) has been called.
    #[inline]
    #[must_use]
    pub fn is_stopped(&self) -> bool {
        self.stopped
    }

    /// The last element handed to the sender.
    #[must_use]
    pub fn last_delivered(&self) -> Option<&E> {
        self.last_delivered.as_ref()
    }

    /// Seeds the last delivered element, e.g. with the element just before
    /// the first one expected, so that the first element is delivered without
    /// waiting for a timeout.
    pub fn set_last_delivered(&mut self, element: E) {
        self.last_delivered = Some(element);
    }

    /// Number of pending elements.
    #[inline]
    #[must_use]
    pub fn size(&self) -> usize {
        self.sequence.len()
    }

    /// Maximum number of pending elements.
    #[inline]
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Returns `true` if no more elements can be inserted.
    #[inline]
    #[must_use]
    pub fn is_full(&self) -> bool {
        self.sequence.len() >= self.capacity
    }

    /// The element timeout, `None` if unlimited.
    #[must_use]
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout
    }

    /// Pending elements in ascending order.
    pub fn pending(&self) -> impl Iterator<Item = &E> + '_ {
        self.sequence.iter().map(Element::value)
    }

    /// Snapshot of the delivery counters.
    #[must_use]
    pub fn stats(&self) -> ResequencerStats {
        self.stats
    }
}
