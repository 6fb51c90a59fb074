//! Snapshot keys and snapshot encoding.
//!
//! A snapshot is the full filtered alert set as of one run, stored under a
//! key derived from the feed-level `lastUpdated` timestamp. Keys are UTC epoch
//! milliseconds zero-padded to [`KEY_WIDTH`] digits, so lexicographic listing
//! order is chronological order and "last listed" means "most recent".

use std::fmt;

use chrono::{DateTime, TimeZone, Utc};

use super::alert::Alert;
use super::error::DomainError;

/// Number of digits in every snapshot key.
pub const KEY_WIDTH: usize = 20;

/// Monotonically sortable snapshot key.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SnapshotKey(String);

impl SnapshotKey {
    /// Derive the key from the feed's `lastUpdated` value.
    ///
    /// # Errors
    /// Returns [`DomainError::InvalidTimestamp`] if the value is not RFC 3339
    /// or predates the epoch.
    pub fn from_feed_timestamp(value: &str) -> Result<Self, DomainError> {
        let parsed = DateTime::parse_from_rfc3339(value.trim()).map_err(|e| {
            DomainError::InvalidTimestamp {
                value: value.to_string(),
                reason: e.to_string(),
            }
        })?;
        let millis = parsed.timestamp_millis();
        let millis = u64::try_from(millis).map_err(|_| DomainError::InvalidTimestamp {
            value: value.to_string(),
            reason: "before 1970-01-01".to_string(),
        })?;
        Ok(Self::from_millis(millis))
    }

    #[must_use]
    pub fn from_millis(millis: u64) -> Self {
        Self(format!("{millis:0width$}", width = KEY_WIDTH))
    }

    /// Validate a key read back from a store.
    ///
    /// # Errors
    /// Returns [`DomainError::MalformedKey`] unless the value is exactly
    /// [`KEY_WIDTH`] ASCII digits.
    pub fn parse(value: &str) -> Result<Self, DomainError> {
        if value.len() == KEY_WIDTH && value.bytes().all(|b| b.is_ascii_digit()) {
            Ok(Self(value.to_string()))
        } else {
            Err(DomainError::MalformedKey(value.to_string()))
        }
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The instant this key encodes.
    #[must_use]
    pub fn timestamp(&self) -> Option<DateTime<Utc>> {
        let millis: i64 = self.0.parse().ok()?;
        Utc.timestamp_millis_opt(millis).single()
    }
}

impl fmt::Display for SnapshotKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// An ordered alert set plus the key that produced it. Written once, never mutated.
#[derive(Debug, Clone, PartialEq)]
pub struct AlertSnapshot {
    pub key: SnapshotKey,
    pub alerts: Vec<Alert>,
}

impl AlertSnapshot {
    #[must_use]
    pub fn new(key: SnapshotKey, alerts: Vec<Alert>) -> Self {
        Self { key, alerts }
    }

    /// Encode the alerts as the JSON array stored in the cache.
    ///
    /// # Errors
    /// Returns an error if serialization fails.
    pub fn encode(&self) -> serde_json::Result<String> {
        serde_json::to_string(&self.alerts)
    }
}

/// Decode a cached snapshot value.
///
/// Accepts a JSON array of alerts, or a JSON string whose contents are such
/// an array (double-encoded values written by older deployments).
///
/// # Errors
/// Returns the array parse error when neither form matches.
pub fn decode_alerts(raw: &str) -> serde_json::Result<Vec<Alert>> {
    match serde_json::from_str::<Vec<Alert>>(raw) {
        Ok(alerts) => Ok(alerts),
        Err(err) => match serde_json::from_str::<String>(raw) {
            Ok(inner) => serde_json::from_str(&inner),
            Err(_) => Err(err),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn key_from_feed_timestamp_is_padded_millis() {
        let key = SnapshotKey::from_feed_timestamp("2024-06-19T15:40:10.94Z").unwrap();
        assert_eq!(key.as_str(), "00000001718811610940");
        assert_eq!(key.as_str().len(), KEY_WIDTH);
    }

    #[test]
    fn offsets_normalize_to_utc() {
        let utc = SnapshotKey::from_feed_timestamp("2024-06-19T15:40:10Z").unwrap();
        let toronto = SnapshotKey::from_feed_timestamp("2024-06-19T11:40:10-04:00").unwrap();
        assert_eq!(utc, toronto);
    }

    #[test]
    fn lexicographic_order_is_chronological() {
        let earlier = SnapshotKey::from_feed_timestamp("2001-09-09T01:46:39Z").unwrap();
        let later = SnapshotKey::from_feed_timestamp("2001-09-09T01:46:40Z").unwrap();
        // Crosses a digit-count boundary in unpadded millis (999_999_999_000 -> 1_000_000_000_000).
        assert!(earlier.as_str() < later.as_str());
        assert!(earlier < later);
    }

    #[test]
    fn rejects_unparsable_timestamp() {
        let err = SnapshotKey::from_feed_timestamp("last tuesday").unwrap_err();
        assert!(matches!(err, DomainError::InvalidTimestamp { .. }));
    }

    #[test]
    fn rejects_pre_epoch_timestamp() {
        assert!(SnapshotKey::from_feed_timestamp("1969-12-31T23:59:59Z").is_err());
    }

    #[test]
    fn parse_validates_width_and_digits() {
        assert!(SnapshotKey::parse("00000001718811610940").is_ok());
        assert!(SnapshotKey::parse("1718811610940").is_err());
        assert!(SnapshotKey::parse("2024-06-19T15:40:10Z").is_err());
    }

    #[test]
    fn key_timestamp_matches_source() {
        let key = SnapshotKey::from_feed_timestamp("2024-06-19T15:40:10Z").unwrap();
        assert_eq!(key.timestamp().unwrap().to_rfc3339(), "2024-06-19T15:40:10+00:00");
    }

    #[test]
    fn decodes_plain_array() {
        let alerts = decode_alerts(r#"[{"id":"1","headerText":"a"}]"#).unwrap();
        assert_eq!(alerts.len(), 1);
        assert_eq!(alerts[0].header_text, "a");
    }

    #[test]
    fn decodes_double_encoded_array() {
        let inner = r#"[{"id":"1","headerText":"a"},{"id":"2","headerText":"b"}]"#;
        let raw = serde_json::to_string(inner).unwrap();
        let alerts = decode_alerts(&raw).unwrap();
        assert_eq!(alerts.len(), 2);
    }

    #[test]
    fn garbage_fails_to_decode() {
        assert!(decode_alerts("not json").is_err());
        assert!(decode_alerts(r#"{"id":"1"}"#).is_err());
    }

    #[test]
    fn encode_writes_alert_array() {
        let key = SnapshotKey::from_millis(1);
        let snapshot = AlertSnapshot::new(key, vec![Alert::new("1", "a")]);
        let raw = snapshot.encode().unwrap();
        assert!(raw.starts_with('['));
        assert_eq!(decode_alerts(&raw).unwrap(), snapshot.alerts);
    }
}
