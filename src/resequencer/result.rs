/******************************************************************************
   Author: Joaquín Béjar García
   Email: jb@taunais.com
   Date: 16/10/26
******************************************************************************/

//! Insert outcome types.
//!
//! Outcomes that leave the element out of the sequence without being an
//! error are reported here; refusals are reported as
//! [`ResequencerError`](super::ResequencerError).

/// Outcome of inserting an element into a resequencer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InsertOutcome {
    /// The element is pending delivery.
    Accepted,

    /// An equal element was already pending; the new one was dropped.
    Duplicate,

    /// The element had no usable sequence key and was dropped.
    Ignored,
}

impl InsertOutcome {
    /// Returns `true` if the element will be delivered.
    #[inline]
    #[must_use]
    pub fn is_accepted(&self) -> bool {
        matches!(self, Self::Accepted)
    }

    /// Returns `true` if the element was dropped.
    #[inline]
    #[must_use]
    pub fn is_dropped(&self) -> bool {
        !self.is_accepted()
    }
}
