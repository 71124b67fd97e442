/******************************************************************************
   Author: Joaquín Béjar García
   Email: jb@taunais.com
   Date: 16/10/26
******************************************************************************/

//! Ordered set of pending elements.
//!
//! [`Sequence`] keeps its elements sorted under an injected
//! [`SequenceElementComparator`] and answers immediate predecessor/successor
//! queries against the stored neighbours of an element.

use super::comparator::SequenceElementComparator;
use std::collections::VecDeque;

/// An ordered set of elements.
///
/// Elements comparing `Equal` are treated as duplicates: the one already
/// stored wins.
///
/// # Examples
///
/// ```
/// use resequencer_rs::resequencer::{NaturalComparator, Sequence};
///
/// let mut seq = Sequence::new(NaturalComparator);
/// seq.insert(3);
/// seq.insert(1);
/// seq.insert(2);
/// assert_eq!(seq.predecessor(&3), Some(&2));
/// assert_eq!(seq.remove_first(), Some(1));
/// ```
#[derive(Debug, Clone)]
pub struct Sequence<E, C> {
    elements: VecDeque<E>,
    comparator: C,
}

impl<E, C: SequenceElementComparator<E>> Sequence<E, C> {
    /// Creates an empty sequence ordered by `comparator`.
    #[must_use]
    pub fn new(comparator: C) -> Self {
        Self {
            elements: VecDeque::new(),
            comparator,
        }
    }

    /// Returns the comparator defining this sequence's order.
    #[must_use]
    pub fn comparator(&self) -> &C {
        &self.comparator
    }

    /// Inserts `element` at its ordered position.
    ///
    /// Returns `false` if an equal element is already stored. The position
    /// is found by binary search, but shifting the deque makes an insert
    /// O(n) in the number of stored elements. Mostly in-order input lands
    /// near the back and stays cheap.
    pub fn insert(&mut self, element: E) -> bool {
        match self.search(&element) {
            Ok(_) => false,
            Err(index) => {
                self.elements.insert(index, element);
                true
            }
        }
    }

    /// Returns `true` if an element equal to `element` is stored.
    #[must_use]
    pub fn contains(&self, element: &E) -> bool {
        self.search(element).is_ok()
    }

    /// Returns the stored element directly before `element`'s position if it
    /// is `element`'s immediate predecessor.
    #[must_use]
    pub fn predecessor(&self, element: &E) -> Option<&E> {
        let index = match self.search(element) {
            Ok(index) | Err(index) => index,
        };
        let lower = self.elements.get(index.checked_sub(1)?)?;
        self.comparator
            .predecessor(lower, element)
            .then_some(lower)
    }

    /// Returns the stored element directly after `element`'s position if it
    /// is `element`'s immediate successor.
    #[must_use]
    pub fn successor(&self, element: &E) -> Option<&E> {
        let index = match self.search(element) {
            Ok(index) => index + 1,
            Err(index) => index,
        };
        let higher = self.elements.get(index)?;
        self.comparator
            .successor(higher, element)
            .then_some(higher)
    }

    /// Returns the minimum element.
    #[inline]
    #[must_use]
    pub fn first(&self) -> Option<&E> {
        self.elements.front()
    }

    /// Returns the maximum element.
    #[inline]
    #[must_use]
    pub fn last(&self) -> Option<&E> {
        self.elements.back()
    }

    /// Removes and returns the minimum element.
    pub fn remove_first(&mut self) -> Option<E> {
        self.elements.pop_front()
    }

    /// Number of stored elements.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.elements.len()
    }

    /// Returns `true` if nothing is stored.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    /// Removes all elements.
    pub fn clear(&mut self) {
        self.elements.clear();
    }

    /// Iterates over the elements in ascending order.
    pub fn iter(&self) -> impl Iterator<Item = &E> + '_ {
        self.elements.iter()
    }

    fn search(&self, element: &E) -> Result<usize, usize> {
        self.elements
            .binary_search_by(|probe| self.comparator.compare(probe, element))
    }
}
