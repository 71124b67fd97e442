/******************************************************************************
   Author: Joaquín Béjar García
   Email: jb@taunais.com
   Date: 16/10/26
******************************************************************************/

//! Message envelope carrying a sequence header.

use super::comparator::KeyComparator;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Key extractor reading the sequence header of a [`SequencedMessage`].
pub type SequenceHeader<T> = fn(&SequencedMessage<T>) -> Option<u64>;

/// A message to be resequenced.
///
/// The `sequence` header drives the order; a message without one is invalid
/// for [`SequencedMessage::comparator`].
///
/// # Examples
///
/// ```
/// use resequencer_rs::resequencer::{SequenceElementComparator, SequencedMessage};
///
/// let cmp = SequencedMessage::<&str>::comparator();
/// let a = SequencedMessage::new(1, "a");
/// let b = SequencedMessage::new(2, "b");
/// assert!(cmp.predecessor(&a, &b));
/// assert!(!cmp.is_valid(&SequencedMessage::without_sequence("c")));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SequencedMessage<T> {
    /// Unique message id.
    pub id: Uuid,

    /// Position of the message in its stream.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sequence: Option<u64>,

    /// Message body.
    pub payload: T,
}

impl<T> SequencedMessage<T> {
    /// Creates a message with a fresh id and the given sequence number.
    #[must_use]
    pub fn new(sequence: u64, payload: T) -> Self {
        Self {
            id: Uuid::new_v4(),
            sequence: Some(sequence),
            payload,
        }
    }

    /// Creates a message that carries no sequence header.
    #[must_use]
    pub fn without_sequence(payload: T) -> Self {
        Self {
            id: Uuid::new_v4(),
            sequence: None,
            payload,
        }
    }

    /// The comparator ordering messages by their sequence header.
    #[must_use]
    pub fn comparator() -> KeyComparator<SequenceHeader<T>> {
        let key: SequenceHeader<T> = |message| message.sequence;
        KeyComparator::new(key)
    }
}
