/******************************************************************************
   Author: Joaquín Béjar García
   Email: jb@taunais.com
   Date: 16/10/26
******************************************************************************/

//! Comparators defining the sequence order of elements.
//!
//! A [`SequenceElementComparator`] is richer than [`Ord`]: besides a total
//! order it can tell whether two elements are *adjacent*, which is what lets
//! the engine deliver an element without waiting for a timeout.

use std::cmp::Ordering;

/// Defines the order of elements in a [`Sequence`](super::Sequence).
///
/// # Examples
///
/// ```
/// use resequencer_rs::resequencer::{NaturalComparator, SequenceElementComparator};
///
/// let cmp = NaturalComparator;
/// assert!(cmp.predecessor(&4, &5));
/// assert!(cmp.successor(&5, &4));
/// assert!(!cmp.successor(&6, &4));
/// ```
pub trait SequenceElementComparator<E>: Send + Sync {
    /// Returns `true` if `o1` is the immediate predecessor of `o2`.
    fn predecessor(&self, o1: &E, o2: &E) -> bool;

    /// Returns `true` if `o1` is the immediate successor of `o2`.
    fn successor(&self, o1: &E, o2: &E) -> bool;

    /// Total order over elements.
    fn compare(&self, o1: &E, o2: &E) -> Ordering;

    /// Returns `true` if `o` can be placed in the order at all.
    fn is_valid(&self, _o: &E) -> bool {
        true
    }
}

/// Orders elements by a `u64` sequence key extracted from each element.
///
/// Elements for which the extractor returns `None` are invalid. Two elements
/// are adjacent when their keys differ by exactly one.
///
/// # Examples
///
/// ```
/// use resequencer_rs::resequencer::{KeyComparator, SequenceElementComparator};
///
/// let cmp = KeyComparator::new(|s: &(u64, &str)| Some(s.0));
/// assert!(cmp.predecessor(&(1, "a"), &(2, "b")));
/// ```
#[derive(Debug, Clone, Copy)]
pub struct KeyComparator<F> {
    key: F,
}

impl<F> KeyComparator<F> {
    /// Creates a comparator from a key extractor.
    #[must_use]
    pub fn new(key: F) -> Self {
        Self { key }
    }
}

impl<E, F> SequenceElementComparator<E> for KeyComparator<F>
where
    F: Fn(&E) -> Option<u64> + Send + Sync,
{
    fn predecessor(&self, o1: &E, o2: &E) -> bool {
        matches!(((self.key)(o1), (self.key)(o2)), (Some(k1), Some(k2)) if adjacent(k1, k2))
    }

    fn successor(&self, o1: &E, o2: &E) -> bool {
        matches!(((self.key)(o1), (self.key)(o2)), (Some(k1), Some(k2)) if adjacent(k2, k1))
    }

    fn compare(&self, o1: &E, o2: &E) -> Ordering {
        // invalid elements never reach a sequence; order them first for totality
        (self.key)(o1).cmp(&(self.key)(o2))
    }

    fn is_valid(&self, o: &E) -> bool {
        (self.key)(o).is_some()
    }
}

/// Comparator for plain `u64` sequence numbers.
#[derive(Debug, Clone, Copy, Default)]
pub struct NaturalComparator;

impl SequenceElementComparator<u64> for NaturalComparator {
    fn predecessor(&self, o1: &u64, o2: &u64) -> bool {
        adjacent(*o1, *o2)
    }

    fn successor(&self, o1: &u64, o2: &u64) -> bool {
        adjacent(*o2, *o1)
    }

    fn compare(&self, o1: &u64, o2: &u64) -> Ordering {
        o1.cmp(o2)
    }
}

/// Returns `true` if `next` immediately follows `prev`.
#[inline]
fn adjacent(prev: u64, next: u64) -> bool {
    prev.checked_add(1) == Some(next)
}
