/******************************************************************************
   Author: Joaquín Béjar García
   Email: jb@taunais.com
   Date: 16/10/26
******************************************************************************/

//! # Resequencer
//!
//! An online, timeout-bounded resequencer. Elements that arrive out of order
//! are re-emitted in the order defined by an injected comparator, without
//! waiting forever for a missing predecessor.
//!
//! ## Features
//!
//! - **Stream resequencing**: gap-free runs are delivered immediately; a head
//!   blocked by a gap is force-delivered once it has waited for the timeout
//! - **Batch resequencing**: size- or time-bounded batches emitted sorted
//! - **Single-owner runtime**: one tokio task owns each engine, with
//!   backpressure once the configured capacity is reached
//! - **Pluggable ordering**: any [`SequenceElementComparator`], with ready-made
//!   comparators for numeric keys
//!
//! ## Quick Start
//!
//! ```
//! use resequencer_rs::{NaturalComparator, ResequencerEngine, ResequencerResult, StreamResequencerConfig};
//!
//! let mut out = Vec::new();
//! let config = StreamResequencerConfig::default();
//! let mut engine = ResequencerEngine::new(
//!     NaturalComparator,
//!     |e: u64| -> ResequencerResult<()> {
//!         out.push(e);
//!         Ok(())
//!     },
//!     &config,
//! );
//!
//! engine.set_last_delivered(0);
//! engine.insert(2).ok();
//! assert_eq!(engine.deliver(), 0); // 1 is missing
//! engine.insert(1).ok();
//! assert_eq!(engine.deliver(), 2);
//! drop(engine);
//! assert_eq!(out, vec![1, 2]);
//! ```

pub mod resequencer;

pub use resequencer::{
    BatchResequencer, BatchResequencerConfig, ChannelSender, InsertOutcome, KeyComparator,
    NaturalComparator, ResequencerEngine, ResequencerError, ResequencerHandle, ResequencerResult,
    ResequencerStats, ResequencerSubmitter, SequenceElementComparator, SequenceSender,
    SequencedMessage, StreamResequencer, StreamResequencerConfig,
};
