use resequencer_rs::{
    ChannelSender, ResequencerEngine, SequencedMessage, StreamResequencer,
    StreamResequencerConfig,
};
use std::time::Duration;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::init_tracing;

    #[tokio::test(start_paused = true)]
    async fn test_out_of_order_stream_with_lost_message() {
        init_tracing();

        let config = StreamResequencerConfig::default()
            .with_timeout(Some(Duration::from_millis(50)))
            .with_reject_old(true);
        let (sender, mut out) = ChannelSender::channel();
        let mut engine = ResequencerEngine::new(SequencedMessage::comparator(), sender, &config);
        engine.set_last_delivered(SequencedMessage::new(0, String::new()));
        let resequencer =
            StreamResequencer::from_engine(engine, config.delivery_attempt_interval());
        let submitter = resequencer.submitter();
        let handle = resequencer.spawn();

        // 3 is lost in transit
        for seq in [2u64, 5, 1, 4, 6] {
            submitter
                .insert(SequencedMessage::new(seq, format!("m{seq}")))
                .await
                .unwrap();
        }

        let mut received = Vec::new();
        for _ in 0..5 {
            let message = out.recv().await.unwrap();
            received.push(message.sequence.unwrap());
        }
        assert_eq!(received, vec![1, 2, 4, 5, 6]);

        // 3 arrives after the gap was skipped
        let late = submitter.insert(SequencedMessage::new(3, "m3".to_string())).await;
        assert!(late.is_err());

        let stats = handle.stop().await.unwrap();
        assert_eq!(stats.delivered, 5);
        assert_eq!(stats.forced, 1);
        assert_eq!(stats.rejected, 1);
    }

    #[tokio::test]
    async fn test_many_submitters_one_stream() {
        init_tracing();

        let config = StreamResequencerConfig::default().with_timeout(None);
        let (sender, mut out) = ChannelSender::channel();
        let mut engine = ResequencerEngine::new(SequencedMessage::comparator(), sender, &config);
        engine.set_last_delivered(SequencedMessage::new(0, 0u64));
        let resequencer =
            StreamResequencer::from_engine(engine, config.delivery_attempt_interval());

        let mut tasks = Vec::new();
        for worker in 0..4u64 {
            let submitter = resequencer.submitter();
            tasks.push(tokio::spawn(async move {
                for seq in (1..=200u64).filter(|s| s % 4 == worker).rev() {
                    submitter.insert(SequencedMessage::new(seq, seq)).await.ok();
                }
            }));
        }
        let handle = resequencer.spawn();

        for task in tasks {
            task.await.ok();
        }

        let mut received = Vec::new();
        while let Some(message) = out.recv().await {
            received.push(message.payload);
        }
        let expected: Vec<u64> = (1..=200).collect();
        assert_eq!(received, expected);

        let stats = handle.wait().await.unwrap();
        assert_eq!(stats.delivered, 200);
        assert_eq!(stats.forced, 0);
    }
}
