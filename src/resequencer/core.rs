/******************************************************************************
   Author: Joaquín Béjar García
   Email: jb@taunais.com
   Date: 16/10/26
******************************************************************************/

//! Core stream resequencer runtime.
//!
//! This module provides [`StreamResequencer`], which moves a
//! [`ResequencerEngine`] onto a single tokio task. That task is the only
//! owner of the engine. It processes submitted commands and wakes up on the
//! engine's next timeout deadline to force delivery across gaps.

use super::command::ResequencerCommand;
use super::comparator::SequenceElementComparator;
use super::config::StreamResequencerConfig;
use super::engine::ResequencerEngine;
use super::error::{ResequencerError, ResequencerResult};
use super::result::InsertOutcome;
use super::sender::SequenceSender;
use super::stats::ResequencerStats;
use std::collections::VecDeque;
use std::fmt::Debug;
use std::time::Duration;
use tokio::sync::{mpsc, oneshot};
use tokio::time::Instant;
use tracing::debug;

/// Default buffer size of the command channel.
const DEFAULT_CHANNEL_CAPACITY: usize = 1024;

/// Insert commands parked while the engine is full.
type Backlog<E> = VecDeque<(E, oneshot::Sender<ResequencerResult<InsertOutcome>>)>;

/// A stream resequencer driven by its own tokio task.
///
/// # Examples
///
/// ```no_run
/// use resequencer_rs::resequencer::{
///     ChannelSender, NaturalComparator, StreamResequencer, StreamResequencerConfig,
/// };
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let (sender, mut delivered) = ChannelSender::channel();
/// let resequencer =
///     StreamResequencer::new(NaturalComparator, sender, &StreamResequencerConfig::default())?;
/// let submitter = resequencer.submitter();
/// let handle = resequencer.spawn();
///
/// submitter.insert(2u64).await?;
/// submitter.insert(1u64).await?;
/// submitter.flush().await?;
/// assert_eq!(delivered.recv().await, Some(1));
///
/// handle.stop().await?;
/// # Ok(())
/// # }
/// ```
pub struct StreamResequencer<E, C, S> {
    /// The engine, owned by the task once spawned.
    engine: ResequencerEngine<E, C, S>,

    /// Maximum idle time between delivery attempts.
    delivery_attempt_interval: Duration,

    /// Sender half cloned into submitters, dropped on spawn.
    command_tx: mpsc::Sender<ResequencerCommand<E>>,

    /// Receiver half used by the event loop.
    command_rx: mpsc::Receiver<ResequencerCommand<E>>,
}

impl<E, C, S> StreamResequencer<E, C, S>
where
    E: Clone + Debug + Send + 'static,
    C: SequenceElementComparator<E> + 'static,
    S: SequenceSender<E> + 'static,
{
    /// Creates a stream resequencer.
    ///
    /// # Errors
    ///
    /// Returns [`ResequencerError::Config`] if `config` is invalid.
    pub fn new(
        comparator: C,
        sender: S,
        config: &StreamResequencerConfig,
    ) -> ResequencerResult<Self> {
        config.validate()?;
        Ok(Self::from_engine(
            ResequencerEngine::new(comparator, sender, config),
            config.delivery_attempt_interval(),
        ))
    }

    /// Wraps an existing engine, e.g. one seeded with
    /// [`set_last_delivered`](ResequencerEngine::set_last_delivered).
    #[must_use]
    pub fn from_engine(
        engine: ResequencerEngine<E, C, S>,
        delivery_attempt_interval: Duration,
    ) -> Self {
        let (command_tx, command_rx) = mpsc::channel(DEFAULT_CHANNEL_CAPACITY);
        Self {
            engine,
            delivery_attempt_interval,
            command_tx,
            command_rx,
        }
    }

    /// Mutable access to the engine before it is spawned.
    pub fn engine_mut(&mut self) -> &mut ResequencerEngine<E, C, S> {
        &mut self.engine
    }

    /// Returns a new submission handle.
    ///
    /// The task keeps running while any submitter is alive. Once all are
    /// dropped it drains the pending elements and exits.
    #[must_use]
    pub fn submitter(&self) -> ResequencerSubmitter<E> {
        ResequencerSubmitter {
            tx: self.command_tx.clone(),
        }
    }

    /// Spawns the event loop on a new task.
    #[must_use]
    pub fn spawn(self) -> ResequencerHandle {
        let Self {
            engine,
            delivery_attempt_interval,
            command_tx,
            command_rx,
        } = self;
        // the loop must see the channel close once every submitter is gone
        drop(command_tx);

        let (shutdown_tx, shutdown_rx) = oneshot::channel();
        let handle = tokio::spawn(async move {
            Self::run_loop(engine, delivery_attempt_interval, command_rx, shutdown_rx).await
        });

        ResequencerHandle {
            handle,
            shutdown_tx: Some(shutdown_tx),
        }
    }

    /// Runs the main event loop.
    ///
    /// Each iteration waits for a command, the engine's next deadline, the
    /// delivery attempt interval, or shutdown, then delivers whatever is
    /// deliverable.
    async fn run_loop(
        mut engine: ResequencerEngine<E, C, S>,
        delivery_attempt_interval: Duration,
        mut command_rx: mpsc::Receiver<ResequencerCommand<E>>,
        mut shutdown_rx: oneshot::Receiver<()>,
    ) -> ResequencerStats {
        let mut backlog: Backlog<E> = VecDeque::new();
        let mut accepting = true;
        let mut shutdown_armed = true;

        loop {
            let idle_until = Instant::now() + delivery_attempt_interval;
            let wake_at = engine
                .next_deadline()
                .map_or(idle_until, |deadline| deadline.min(idle_until));

            tokio::select! {
                biased;
                signal = &mut shutdown_rx, if shutdown_armed => match signal {
                    Ok(()) => {
                        debug!("resequencer shutdown requested");
                        break;
                    }
                    // handle dropped without stop: keep running
                    Err(_) => shutdown_armed = false,
                },
                command = command_rx.recv(), if accepting => match command {
                    Some(command) => Self::handle_command(&mut engine, command, &mut backlog),
                    None => {
                        accepting = false;
                        debug!(pending = engine.size(), "all submitters dropped, draining");
                    }
                },
                () = tokio::time::sleep_until(wake_at) => {}
            }

            // admitted elements may be deliverable right away, freeing more room
            loop {
                if !accepting && engine.timeout().is_none() {
                    // no timer will ever close the remaining gaps
                    engine.flush();
                } else {
                    engine.deliver();
                }
                if Self::admit_backlog(&mut engine, &mut backlog) == 0 {
                    break;
                }
            }

            if !accepting && engine.size() == 0 && backlog.is_empty() {
                break;
            }
        }

        for (_, reply) in backlog.drain(..) {
            let _ = reply.send(Err(ResequencerError::Shutdown));
        }
        engine.stop();
        engine.stats()
    }

    fn handle_command(
        engine: &mut ResequencerEngine<E, C, S>,
        command: ResequencerCommand<E>,
        backlog: &mut Backlog<E>,
    ) {
        match command {
            ResequencerCommand::Insert { element, reply } => {
                if engine.is_full() || !backlog.is_empty() {
                    backlog.push_back((element, reply));
                } else {
                    let _ = reply.send(engine.insert(element));
                }
            }
            ResequencerCommand::Flush { reply } => {
                let _ = reply.send(engine.flush());
            }
            ResequencerCommand::Stats { reply } => {
                let _ = reply.send(engine.stats());
            }
        }
    }

    /// Admits parked inserts while the engine has room.
    ///
    /// Returns the number of admitted inserts.
    fn admit_backlog(engine: &mut ResequencerEngine<E, C, S>, backlog: &mut Backlog<E>) -> usize {
        let mut admitted = 0;
        while !engine.is_full() {
            let Some((element, reply)) = backlog.pop_front() else {
                break;
            };
            let _ = reply.send(engine.insert(element));
            admitted += 1;
        }
        admitted
    }
}

/// Cloneable handle for submitting elements to a spawned [`StreamResequencer`].
pub struct ResequencerSubmitter<E> {
    tx: mpsc::Sender<ResequencerCommand<E>>,
}

impl<E> Clone for ResequencerSubmitter<E> {
    fn clone(&self) -> Self {
        Self {
            tx: self.tx.clone(),
        }
    }
}

impl<E> ResequencerSubmitter<E> {
    /// Submits an element.
    ///
    /// Resolves once the element has been admitted to the engine, which is
    /// delayed while the engine is at capacity.
    ///
    /// # Errors
    ///
    /// Returns [`ResequencerError::Shutdown`] if the task has exited, or the
    /// engine's insert error.
    pub async fn insert(&self, element: E) -> ResequencerResult<InsertOutcome> {
        let (reply, rx) = oneshot::channel();
        self.tx
            .send(ResequencerCommand::Insert { element, reply })
            .await
            .map_err(|_| ResequencerError::Shutdown)?;
        rx.await.map_err(|_| ResequencerError::Shutdown)?
    }

    /// Delivers every pending element, ignoring gaps.
    ///
    /// # Errors
    ///
    /// Returns [`ResequencerError::Shutdown`] if the task has exited.
    pub async fn flush(&self) -> ResequencerResult<usize> {
        let (reply, rx) = oneshot::channel();
        self.tx
            .send(ResequencerCommand::Flush { reply })
            .await
            .map_err(|_| ResequencerError::Shutdown)?;
        rx.await.map_err(|_| ResequencerError::Shutdown)
    }

    /// Reads the delivery counters.
    ///
    /// # Errors
    ///
    /// Returns [`ResequencerError::Shutdown`] if the task has exited.
    pub async fn stats(&self) -> ResequencerResult<ResequencerStats> {
        let (reply, rx) = oneshot::channel();
        self.tx
            .send(ResequencerCommand::Stats { reply })
            .await
            .map_err(|_| ResequencerError::Shutdown)?;
        rx.await.map_err(|_| ResequencerError::Shutdown)
    }

    /// Returns `true` if the task has exited.
    #[must_use]
    pub fn is_closed(&self) -> bool {
        self.tx.is_closed()
    }
}

/// Handle to a spawned resequencer task.
pub struct ResequencerHandle {
    handle: tokio::task::JoinHandle<ResequencerStats>,
    shutdown_tx: Option<oneshot::Sender<()>>,
}

impl ResequencerHandle {
    /// Stops the task. Pending elements are discarded.
    ///
    /// Returns the final delivery counters.
    pub async fn stop(mut self) -> Result<ResequencerStats, tokio::task::JoinError> {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
        }
        self.handle.await
    }

    /// Waits for the task to exit on its own, which happens once every
    /// submitter is dropped and the pending elements have drained.
    pub async fn wait(self) -> Result<ResequencerStats, tokio::task::JoinError> {
        self.handle.await
    }

    /// Returns `true` if the task has exited.
    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }
}
