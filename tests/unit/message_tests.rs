use resequencer_rs::{
    BatchResequencer, BatchResequencerConfig, InsertOutcome, ResequencerEngine,
    ResequencerError, ResequencerResult, SequenceElementComparator, SequencedMessage,
    StreamResequencerConfig,
};
use std::sync::{Arc, Mutex};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_message_comparator() {
        let cmp = SequencedMessage::<String>::comparator();
        let a = SequencedMessage::new(7, "a".to_string());
        let b = SequencedMessage::new(8, "b".to_string());
        assert!(cmp.predecessor(&a, &b));
        assert!(cmp.successor(&b, &a));
        assert!(!cmp.is_valid(&SequencedMessage::without_sequence("c".to_string())));
    }

    #[test]
    fn test_message_serde() {
        let message = SequencedMessage::new(3, vec![1u8, 2, 3]);
        let json = serde_json::to_string(&message).unwrap();
        let back: SequencedMessage<Vec<u8>> = serde_json::from_str(&json).unwrap();
        assert_eq!(back, message);

        let unsequenced = SequencedMessage::without_sequence(0u8);
        let json = serde_json::to_string(&unsequenced).unwrap();
        assert!(!json.contains("sequence"));
    }

    #[test]
    fn test_messages_resequenced_by_header() {
        let payloads = Arc::new(Mutex::new(Vec::new()));
        let payloads_clone = payloads.clone();
        let sender = move |m: SequencedMessage<&'static str>| -> ResequencerResult<()> {
            payloads_clone.lock().unwrap().push(m.payload);
            Ok(())
        };

        let config = StreamResequencerConfig::default()
            .with_timeout(None)
            .with_ignore_invalid(true);
        let mut engine = ResequencerEngine::new(SequencedMessage::comparator(), sender, &config);
        engine.set_last_delivered(SequencedMessage::new(0, "seed"));

        engine.insert(SequencedMessage::new(2, "two")).ok();
        engine.insert(SequencedMessage::new(3, "three")).ok();
        assert_eq!(
            engine.insert(SequencedMessage::without_sequence("none")).ok(),
            Some(InsertOutcome::Ignored)
        );
        assert_eq!(engine.deliver(), 0);

        engine.insert(SequencedMessage::new(1, "one")).ok();
        assert_eq!(engine.deliver(), 3);
        assert_eq!(*payloads.lock().unwrap(), vec!["one", "two", "three"]);
    }

    #[test]
    fn test_message_duplicate_by_sequence() {
        let config = StreamResequencerConfig::default().with_timeout(None);
        let mut engine = ResequencerEngine::new(
            SequencedMessage::comparator(),
            |_m: SequencedMessage<u8>| -> ResequencerResult<()> { Ok(()) },
            &config,
        );
        // different ids, same sequence header
        engine.insert(SequencedMessage::new(1, 1u8)).ok();
        assert_eq!(
            engine.insert(SequencedMessage::new(1, 2u8)).ok(),
            Some(InsertOutcome::Duplicate)
        );
    }

    #[test]
    fn test_batch_of_messages() {
        let mut batch =
            BatchResequencer::new(SequencedMessage::comparator(), BatchResequencerConfig::default());
        batch.add(SequencedMessage::new(2, 'b')).ok();
        batch.add(SequencedMessage::new(1, 'a')).ok();
        let result = batch.add(SequencedMessage::without_sequence('x'));
        assert!(matches!(result, Err(ResequencerError::InvalidElement(_))));

        let payloads: Vec<char> = batch.flush().into_iter().map(|m| m.payload).collect();
        assert_eq!(payloads, vec!['a', 'b']);
    }
}
