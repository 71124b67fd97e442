use resequencer_rs::{BatchResequencerConfig, ResequencerError, StreamResequencerConfig};
use std::io::Write;
use std::time::Duration;

#[cfg(test)]
mod tests {
    use super::*;

    // --- defaults ---

    #[test]
    fn test_stream_defaults() {
        let config = StreamResequencerConfig::default();
        assert_eq!(config.capacity, 1000);
        assert_eq!(config.timeout(), Some(Duration::from_secs(1)));
        assert_eq!(config.delivery_attempt_interval(), Duration::from_secs(1));
        assert!(!config.reject_old);
        assert!(!config.ignore_invalid);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_batch_defaults() {
        let config = BatchResequencerConfig::default();
        assert_eq!(config.batch_size, 100);
        assert_eq!(config.batch_timeout(), Duration::from_secs(1));
        assert!(!config.allow_duplicates);
        assert!(!config.reverse);
        assert!(config.validate().is_ok());
    }

    // --- JSON loading ---

    #[test]
    fn test_stream_partial_json_uses_defaults() {
        let config =
            StreamResequencerConfig::from_json_str(r#"{"timeout_ms": 250, "reject_old": true}"#)
                .unwrap();
        assert_eq!(config.timeout(), Some(Duration::from_millis(250)));
        assert!(config.reject_old);
        assert_eq!(config.capacity, 1000);
    }

    #[test]
    fn test_stream_null_timeout_is_unlimited() {
        let config = StreamResequencerConfig::from_json_str(r#"{"timeout_ms": null}"#).unwrap();
        assert_eq!(config.timeout(), None);
    }

    #[test]
    fn test_malformed_json_rejected() {
        let result = StreamResequencerConfig::from_json_str("{capacity: 1");
        assert!(matches!(result, Err(ResequencerError::Json(_))));
    }

    #[test]
    fn test_batch_json_roundtrip_fields() {
        let config = BatchResequencerConfig::from_json_str(
            r#"{"batch_size": 5, "allow_duplicates": true, "reverse": true}"#,
        )
        .unwrap();
        assert_eq!(config.batch_size, 5);
        assert!(config.allow_duplicates);
        assert!(config.reverse);
        assert_eq!(config.batch_timeout_ms, 1000);
    }

    // --- validation ---

    #[test]
    fn test_zero_capacity_rejected() {
        let result = StreamResequencerConfig::from_json_str(r#"{"capacity": 0}"#);
        assert!(matches!(result, Err(ResequencerError::Config(_))));
    }

    #[test]
    fn test_zero_delivery_interval_rejected() {
        let config = StreamResequencerConfig {
            delivery_attempt_interval_ms: 0,
            ..StreamResequencerConfig::default()
        };
        assert!(matches!(config.validate(), Err(ResequencerError::Config(_))));
    }

    #[test]
    fn test_zero_batch_size_rejected() {
        let result = BatchResequencerConfig::from_json_str(r#"{"batch_size": 0}"#);
        assert!(matches!(result, Err(ResequencerError::Config(_))));
    }

    #[test]
    fn test_zero_batch_timeout_rejected() {
        let result = BatchResequencerConfig::from_json_str(r#"{"batch_timeout_ms": 0}"#);
        assert!(matches!(result, Err(ResequencerError::Config(_))));
    }

    // --- builders ---

    #[test]
    fn test_builders() {
        let config = StreamResequencerConfig::default()
            .with_capacity(7)
            .with_timeout(Some(Duration::from_millis(20)))
            .with_reject_old(true)
            .with_ignore_invalid(true);
        assert_eq!(config.capacity, 7);
        assert_eq!(config.timeout_ms, Some(20));
        assert!(config.reject_old);
        assert!(config.ignore_invalid);

        let config = config.with_timeout(None);
        assert_eq!(config.timeout(), None);
    }

    // --- files ---

    #[test]
    fn test_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"capacity": 42, "timeout_ms": 10}}"#).unwrap();

        let config = StreamResequencerConfig::from_file(file.path()).unwrap();
        assert_eq!(config.capacity, 42);
        assert_eq!(config.timeout(), Some(Duration::from_millis(10)));
    }

    #[test]
    fn test_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let result = BatchResequencerConfig::from_file(dir.path().join("missing.json"));
        assert!(matches!(result, Err(ResequencerError::Io(_))));
    }
}
