/******************************************************************************
   Author: Joaquín Béjar García
   Email: jb@taunais.com
   Date: 16/10/26
******************************************************************************/

//! Downstream receivers of resequenced elements.

use super::error::{ResequencerError, ResequencerResult};
use tokio::sync::mpsc;

/// Receives elements from the engine in their final order, one at a time.
///
/// Implemented for closures of the form `FnMut(E) -> ResequencerResult<()>`
/// and for [`ChannelSender`].
///
/// # Examples
///
/// ```
/// use resequencer_rs::resequencer::{ResequencerResult, SequenceSender};
///
/// let mut out = Vec::new();
/// let mut sender = |e: u64| -> ResequencerResult<()> {
///     out.push(e);
///     Ok(())
/// };
/// sender.send_element(7).ok();
/// ```
pub trait SequenceSender<E>: Send {
    /// Delivers `element` downstream.
    ///
    /// # Errors
    ///
    /// Returns an error if the downstream rejected the element. The element
    /// is not retried.
    fn send_element(&mut self, element: E) -> ResequencerResult<()>;
}

impl<E, F> SequenceSender<E> for F
where
    F: FnMut(E) -> ResequencerResult<()> + Send,
{
    fn send_element(&mut self, element: E) -> ResequencerResult<()> {
        self(element)
    }
}

/// Sender forwarding elements into an unbounded tokio channel.
///
/// # Examples
///
/// ```
/// use resequencer_rs::resequencer::{ChannelSender, SequenceSender};
///
/// let (mut sender, mut rx) = ChannelSender::<u64>::channel();
/// sender.send_element(1).ok();
/// assert_eq!(rx.try_recv().ok(), Some(1));
/// ```
#[derive(Debug, Clone)]
pub struct ChannelSender<E> {
    tx: mpsc::UnboundedSender<E>,
}

impl<E> ChannelSender<E> {
    /// Wraps an existing channel sender.
    #[must_use]
    pub fn new(tx: mpsc::UnboundedSender<E>) -> Self {
        Self { tx }
    }

    /// Creates a channel and returns the sender half plus the receiver.
    #[must_use]
    pub fn channel() -> (Self, mpsc::UnboundedReceiver<E>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self::new(tx), rx)
    }
}

impl<E: Send> SequenceSender<E> for ChannelSender<E> {
    fn send_element(&mut self, element: E) -> ResequencerResult<()> {
        self.tx
            .send(element)
            .map_err(|_| ResequencerError::send("downstream channel closed"))
    }
}
