/******************************************************************************
   Author: Joaquín Béjar García
   Email: jb@taunais.com
   Date: 16/10/26
******************************************************************************/

//! Resequencer module for restoring the order of out-of-order streams.
//!
//! Elements arrive in arbitrary order and leave in the order defined by a
//! [`SequenceElementComparator`]. Two strategies are provided:
//!
//! - **Stream**: [`ResequencerEngine`] delivers each element as soon as its
//!   immediate predecessor has been delivered. A gap that persists past the
//!   timeout is skipped, so delivery never stalls forever.
//! - **Batch**: [`BatchResequencer`] collects elements for a size or time
//!   window and emits each window sorted.
//!
//! # Architecture
//!
//! - The engine is plain synchronous state; it has no timer of its own
//! - [`StreamResequencer`] moves the engine onto a single tokio task
//! - Elements are submitted via an async channel with oneshot replies
//! - The task sleeps until the engine's next timeout deadline
//! - Delivered elements are handed to a [`SequenceSender`] one at a time
//!
//! # Examples
//!
//! ```no_run
//! use resequencer_rs::resequencer::{
//!     ChannelSender, NaturalComparator, StreamResequencer, StreamResequencerConfig,
//! };
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let (sender, mut delivered) = ChannelSender::channel();
//! let resequencer =
//!     StreamResequencer::new(NaturalComparator, sender, &StreamResequencerConfig::default())?;
//!
//! // Submit elements (from any task)
//! let submitter = resequencer.submitter();
//! let handle = resequencer.spawn();
//! for e in [3u64, 1, 2] {
//!     submitter.insert(e).await?;
//! }
//!
//! // 1 waits for its timeout since nothing was delivered before it, then
//! // 2 and 3 follow immediately
//! for _ in 0..3 {
//!     if let Some(e) = delivered.recv().await {
//!         println!("delivered {e}");
//!     }
//! }
//!
//! handle.stop().await?;
//! # Ok(())
//! # }
//! ```

pub mod batch;
pub mod command;
pub mod comparator;
pub mod config;
pub mod core;
pub mod element;
pub mod engine;
pub mod error;
pub mod message;
pub mod result;
pub mod sender;
pub mod sequence;
pub mod stats;

#[cfg(test)]
mod tests;

// Re-export main types
pub use batch::BatchResequencer;
pub use command::ResequencerCommand;
pub use comparator::{KeyComparator, NaturalComparator, SequenceElementComparator};
pub use config::{BatchResequencerConfig, StreamResequencerConfig};
pub use self::core::{ResequencerHandle, ResequencerSubmitter, StreamResequencer};
pub use engine::ResequencerEngine;
pub use error::{ResequencerError, ResequencerResult};
pub use message::SequencedMessage;
pub use result::InsertOutcome;
pub use sender::{ChannelSender, SequenceSender};
pub use sequence::Sequence;
pub use stats::ResequencerStats;
