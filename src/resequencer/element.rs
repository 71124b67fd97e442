/******************************************************************************
   Author: Joaquín Béjar García
   Email: jb@taunais.com
   Date: 16/10/26
******************************************************************************/

//! Pending element wrapper used inside the engine.

use super::comparator::SequenceElementComparator;
use std::cmp::Ordering;
use std::time::Duration;
use tokio::time::Instant;

/// An element waiting in the engine, stamped with its arrival instant.
#[derive(Debug, Clone)]
pub struct Element<E> {
    value: E,
    enqueued_at: Instant,
}

impl<E> Element<E> {
    /// Wraps `value`, stamping it with `enqueued_at`.
    #[must_use]
    pub fn new(value: E, enqueued_at: Instant) -> Self {
        Self { value, enqueued_at }
    }

    /// The wrapped element.
    #[inline]
    #[must_use]
    pub fn value(&self) -> &E {
        &self.value
    }

    /// Unwraps the element.
    #[inline]
    #[must_use]
    pub fn into_value(self) -> E {
        self.value
    }

    /// When the element entered the engine.
    #[inline]
    #[must_use]
    pub fn enqueued_at(&self) -> Instant {
        self.enqueued_at
    }

    /// The instant at which the element times out, or `None` if the timeout
    /// is unlimited or the deadline is unrepresentable.
    #[must_use]
    pub fn deadline(&self, timeout: Option<Duration>) -> Option<Instant> {
        timeout.and_then(|t| self.enqueued_at.checked_add(t))
    }

    /// Returns `true` if the element has waited at least `timeout` at `now`.
    #[must_use]
    pub fn is_timed_out(&self, timeout: Option<Duration>, now: Instant) -> bool {
        self.deadline(timeout).is_some_and(|deadline| now >= deadline)
    }
}

/// Lifts a comparator over `E` to one over [`Element<E>`], ignoring arrival
/// time.
#[derive(Debug, Clone)]
pub struct ElementComparator<C> {
    inner: C,
}

impl<C> ElementComparator<C> {
    /// Wraps an element comparator.
    #[must_use]
    pub fn new(inner: C) -> Self {
        Self { inner }
    }

    /// The wrapped comparator.
    #[must_use]
    pub fn inner(&self) -> &C {
        &self.inner
    }
}

impl<E, C: SequenceElementComparator<E>> SequenceElementComparator<Element<E>>
    for ElementComparator<C>
{
    fn predecessor(&self, o1: &Element<E>, o2: &Element<E>) -> bool {
        self.inner.predecessor(&o1.value, &o2.value)
    }

    fn successor(&self, o1: &Element<E>, o2: &Element<E>) -> bool {
        self.inner.successor(&o1.value, &o2.value)
    }

    fn compare(&self, o1: &Element<E>, o2: &Element<E>) -> Ordering {
        self.inner.compare(&o1.value, &o2.value)
    }

    fn is_valid(&self, o: &Element<E>) -> bool {
        self.inner.is_valid(&o.value)
    }
}
