//! Call-log records as supplied by the call-history source.

use std::collections::HashSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::call_type::CallType;
use crate::types::{CallId, ValidationError};

/// A call-log entry suitable for grouping.
///
/// This trait allows grouping to work with different record representations
/// (e.g., rows read from a call-history provider, or test fixtures).
pub trait CallLogEntry {
    /// Returns the row identifier.
    fn id(&self) -> CallId;

    /// Returns the dialed or received number, or SIP address.
    fn number(&self) -> Option<&str>;

    /// Returns digits dialed after the call connected (empty if none).
    fn post_dial_digits(&self) -> &str;

    /// Returns the number the call was routed through (empty if none).
    fn via_number(&self) -> &str;

    fn call_type(&self) -> CallType;

    /// Returns the component name of the account that handled the call.
    fn account_component_name(&self) -> Option<&str>;

    /// Returns the id of the account that handled the call.
    fn account_id(&self) -> Option<&str>;

    /// Returns the call's start time in milliseconds since the epoch.
    fn timestamp_ms(&self) -> i64;
}

/// A single call from the call history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CallRecord {
    pub id: CallId,

    /// Empty or absent for hidden numbers.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub number: Option<String>,

    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub post_dial_digits: String,

    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub via_number: String,

    pub call_type: CallType,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub account_component_name: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub account_id: Option<String>,

    /// Start time in milliseconds since the epoch.
    pub timestamp: i64,
}

impl CallRecord {
    /// Creates a record with no account and no number annotations.
    pub fn new(id: i64, number: Option<&str>, call_type: CallType, timestamp: i64) -> Self {
        Self {
            id: CallId::new(id),
            number: number.map(str::to_string),
            post_dial_digits: String::new(),
            via_number: String::new(),
            call_type,
            account_component_name: None,
            account_id: None,
            timestamp,
        }
    }

    #[must_use]
    pub fn with_account(mut self, component_name: &str, account_id: &str) -> Self {
        self.account_component_name = Some(component_name.to_string());
        self.account_id = Some(account_id.to_string());
        self
    }

    #[must_use]
    pub fn with_post_dial_digits(mut self, digits: &str) -> Self {
        self.post_dial_digits = digits.to_string();
        self
    }

    #[must_use]
    pub fn with_via_number(mut self, via: &str) -> Self {
        self.via_number = via.to_string();
        self
    }

    /// The start time as a `DateTime`, if representable.
    pub fn started_at(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp_millis(self.timestamp)
    }
}

impl CallLogEntry for CallRecord {
    fn id(&self) -> CallId {
        self.id
    }

    fn number(&self) -> Option<&str> {
        self.number.as_deref()
    }

    fn post_dial_digits(&self) -> &str {
        &self.post_dial_digits
    }

    fn via_number(&self) -> &str {
        &self.via_number
    }

    fn call_type(&self) -> CallType {
        self.call_type
    }

    fn account_component_name(&self) -> Option<&str> {
        self.account_component_name.as_deref()
    }

    fn account_id(&self) -> Option<&str> {
        self.account_id.as_deref()
    }

    fn timestamp_ms(&self) -> i64 {
        self.timestamp
    }
}

/// Checks that entries are ordered most recent first and ids are unique.
///
/// Grouping never re-sorts, so callers can use this to catch a bad source
/// before a pass. Equal timestamps are allowed.
pub fn validate_entries<E: CallLogEntry>(entries: &[E]) -> Result<(), ValidationError> {
    let mut seen = HashSet::with_capacity(entries.len());
    let mut previous: Option<i64> = None;

    for (position, entry) in entries.iter().enumerate() {
        let id = entry.id();
        if !seen.insert(id) {
            return Err(ValidationError::DuplicateId { position, id });
        }
        let timestamp = entry.timestamp_ms();
        if previous.is_some_and(|prev| timestamp > prev) {
            return Err(ValidationError::OutOfOrder { position, id });
        }
        previous = Some(timestamp);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn record_deserializes_with_defaults() {
        let json = r#"{"id": 7, "number": "555-1234", "call_type": 2, "timestamp": 1700000000000}"#;
        let record: CallRecord = serde_json::from_str(json).unwrap();

        assert_eq!(record.id, CallId::new(7));
        assert_eq!(record.number.as_deref(), Some("555-1234"));
        assert_eq!(record.call_type, CallType::Outgoing);
        assert_eq!(record.post_dial_digits, "");
        assert_eq!(record.via_number, "");
        assert!(record.account_component_name.is_none());
        assert!(record.account_id.is_none());
    }

    #[test]
    fn record_requires_call_type() {
        let json = r#"{"id": 7, "number": "555-1234", "timestamp": 1700000000000}"#;
        let result: Result<CallRecord, _> = serde_json::from_str(json);
        assert!(result.is_err());
    }

    #[test]
    fn started_at_converts_millis() {
        let record = CallRecord::new(1, None, CallType::Missed, 1_700_000_000_123);
        let started = record.started_at().unwrap();
        assert_eq!(started.timestamp_millis(), 1_700_000_000_123);
    }

    #[test]
    fn validate_accepts_descending_and_ties() {
        let records = [
            CallRecord::new(3, Some("1"), CallType::Incoming, 300),
            CallRecord::new(2, Some("1"), CallType::Incoming, 300),
            CallRecord::new(1, Some("1"), CallType::Incoming, 100),
        ];
        assert!(validate_entries(&records).is_ok());
        assert!(validate_entries::<CallRecord>(&[]).is_ok());
    }

    #[test]
    fn validate_rejects_ascending() {
        let records = [
            CallRecord::new(1, Some("1"), CallType::Incoming, 100),
            CallRecord::new(2, Some("1"), CallType::Incoming, 200),
        ];
        assert_eq!(
            validate_entries(&records),
            Err(ValidationError::OutOfOrder {
                position: 1,
                id: CallId::new(2)
            })
        );
    }

    #[test]
    fn validate_rejects_duplicate_ids() {
        let records = [
            CallRecord::new(1, Some("1"), CallType::Incoming, 200),
            CallRecord::new(1, Some("2"), CallType::Incoming, 100),
        ];
        assert_eq!(
            validate_entries(&records),
            Err(ValidationError::DuplicateId {
                position: 1,
                id: CallId::new(1)
            })
        );
    }
}
