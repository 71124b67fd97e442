/******************************************************************************
   Author: Joaquín Béjar García
   Email: jb@taunais.com
   Date: 16/10/26
******************************************************************************/

//! Tests for batch resequencing.

#[cfg(test)]
mod tests {
    use crate::resequencer::{
        BatchResequencer, BatchResequencerConfig, ChannelSender, InsertOutcome, KeyComparator,
        NaturalComparator, ResequencerError,
    };
    use std::time::Duration;
    use tokio::sync::mpsc;
    use tokio::time::{Instant, advance};

    fn config(batch_size: usize) -> BatchResequencerConfig {
        BatchResequencerConfig {
            batch_size,
            batch_timeout_ms: 100,
            ..BatchResequencerConfig::default()
        }
    }

    #[test]
    fn test_flush_sorts_and_drops_duplicates() {
        let mut batch = BatchResequencer::new(NaturalComparator, config(10));
        for e in [4u64, 1, 3, 1, 2, 4] {
            batch.add(e).ok();
        }
        assert_eq!(batch.flush(), vec![1, 2, 3, 4]);
        assert_eq!(batch.stats().duplicates, 2);
        assert!(batch.is_empty());
    }

    #[test]
    fn test_allow_duplicates_keeps_arrival_order() {
        let cfg = BatchResequencerConfig {
            allow_duplicates: true,
            ..config(10)
        };
        let comparator = KeyComparator::new(|e: &(u64, char)| Some(e.0));
        let mut batch = BatchResequencer::new(comparator, cfg);
        for e in [(2, 'a'), (1, 'b'), (2, 'c'), (1, 'd')] {
            batch.add(e).ok();
        }
        assert_eq!(batch.flush(), vec![(1, 'b'), (1, 'd'), (2, 'a'), (2, 'c')]);
    }

    #[test]
    fn test_reverse_order() {
        let cfg = BatchResequencerConfig {
            reverse: true,
            ..config(10)
        };
        let mut batch = BatchResequencer::new(NaturalComparator, cfg);
        for e in [2u64, 3, 1] {
            batch.add(e).ok();
        }
        assert_eq!(batch.flush(), vec![3, 2, 1]);
    }

    #[test]
    fn test_should_flush_on_size() {
        let mut batch = BatchResequencer::new(NaturalComparator, config(3));
        batch.add(1u64).ok();
        batch.add(2).ok();
        assert!(!batch.should_flush());
        batch.add(3).ok();
        assert!(batch.should_flush());
        assert_eq!(batch.flush().len(), 3);
        assert!(!batch.should_flush());
    }

    #[tokio::test(start_paused = true)]
    async fn test_should_flush_on_timeout() {
        let mut batch = BatchResequencer::new(NaturalComparator, config(10));
        assert!(!batch.should_flush());

        advance(Duration::from_millis(500)).await;
        // the window starts with the first element, not at creation
        batch.add(1u64).ok();
        assert!(!batch.should_flush());

        advance(Duration::from_millis(100)).await;
        assert!(batch.should_flush());
    }

    #[test]
    fn test_invalid_elements() {
        let comparator = KeyComparator::new(|e: &Option<u64>| *e);
        let mut batch = BatchResequencer::new(comparator, config(10));
        assert!(matches!(
            batch.add(None),
            Err(ResequencerError::InvalidElement(_))
        ));

        let cfg = BatchResequencerConfig {
            ignore_invalid: true,
            ..config(10)
        };
        let mut batch = BatchResequencer::new(comparator, cfg);
        assert_eq!(batch.add(None).ok(), Some(InsertOutcome::Ignored));
        assert_eq!(batch.add(Some(1)).ok(), Some(InsertOutcome::Accepted));
        assert_eq!(batch.len(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_run_emits_on_size_timeout_and_close() {
        let (tx, rx) = mpsc::channel(16);
        let (sender, mut out) = ChannelSender::channel();
        let batch = BatchResequencer::new(NaturalComparator, config(3));
        let runner = tokio::spawn(batch.run(rx, sender));

        // full batch
        for e in [3u64, 1, 2] {
            tx.send(e).await.unwrap();
        }
        assert_eq!(out.recv().await, Some(1));
        assert_eq!(out.recv().await, Some(2));
        assert_eq!(out.recv().await, Some(3));

        // partial batch emitted by the timer
        let start = Instant::now();
        tx.send(6).await.unwrap();
        tx.send(5).await.unwrap();
        assert_eq!(out.recv().await, Some(5));
        assert!(start.elapsed() >= Duration::from_millis(100));
        assert_eq!(out.recv().await, Some(6));

        // final batch emitted on close
        tx.send(9).await.unwrap();
        tx.send(8).await.unwrap();
        drop(tx);
        let stats = runner.await.unwrap();
        assert_eq!(out.recv().await, Some(8));
        assert_eq!(out.recv().await, Some(9));
        assert_eq!(stats.delivered, 7);
    }
}
