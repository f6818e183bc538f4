// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! Immutable point-in-time view of the log store

use std::ops::Deref;
use std::path::Path;
use std::sync::Arc;

use serde::{Serialize, Serializer};

use crate::error::Result;
use crate::network::LogRecord;

/// Immutable copy of the store's records, oldest first.
///
/// Cloning is cheap. Later appends or clears never show up in a snapshot
/// that has already been taken; use [`to_vec`](Self::to_vec) for a mutable copy.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Snapshot {
    records: Arc<Vec<LogRecord>>,
}

impl Snapshot {
    pub(crate) fn new(records: Arc<Vec<LogRecord>>) -> Self {
        Self { records }
    }

    /// Number of records
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Check if the snapshot has no records
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Records as a slice
    pub fn as_slice(&self) -> &[LogRecord] {
        &self.records
    }

    /// Records passing a display-time filter, in store order
    pub fn filtered<F>(&self, predicate: F) -> Vec<&LogRecord>
    where
        F: Fn(&LogRecord) -> bool,
    {
        self.records.iter().filter(|r| predicate(r)).collect()
    }

    /// Find a record by its id
    pub fn find(&self, id: u64) -> Option<&LogRecord> {
        self.records.iter().find(|r| r.id == id)
    }

    /// Owned copy of the records
    pub fn to_vec(&self) -> Vec<LogRecord> {
        self.records.as_ref().clone()
    }

    /// Owned records, avoiding a copy when this is the only reference
    pub fn into_vec(self) -> Vec<LogRecord> {
        Arc::try_unwrap(self.records).unwrap_or_else(|shared| shared.as_ref().clone())
    }

    /// Export records as JSON
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    /// Export records as pretty-printed JSON
    pub fn to_json_pretty(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Write a pretty-printed JSON export to `path`
    pub fn write_json(&self, path: impl AsRef<Path>) -> Result<()> {
        std::fs::write(path, self.to_json_pretty()?)?;
        Ok(())
    }
}

impl Deref for Snapshot {
    type Target = [LogRecord];

    fn deref(&self) -> &[LogRecord] {
        &self.records
    }
}

impl<'a> IntoIterator for &'a Snapshot {
    type Item = &'a LogRecord;
    type IntoIter = std::slice::Iter<'a, LogRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}

impl Serialize for Snapshot {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        self.records.serialize(serializer)
    }
}

impl From<Vec<LogRecord>> for Snapshot {
    fn from(records: Vec<LogRecord>) -> Self {
        Self::new(Arc::new(records))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::network::{RequestInfo, ResponseInfo};

    fn records() -> Vec<LogRecord> {
        vec![
            LogRecord::new(1, RequestInfo::new("GET", "https://a.example.com/"))
                .with_response(ResponseInfo::new(200, "https://a.example.com/")),
            LogRecord::new(2, RequestInfo::new("GET", "https://b.example.com/"))
                .with_error("timed out"),
            LogRecord::new(3, RequestInfo::new("POST", "https://a.example.com/form"))
                .with_response(ResponseInfo::new(500, "https://a.example.com/form")),
        ]
    }

    #[test]
    fn test_filtered_keeps_order() {
        let snapshot = Snapshot::from(records());

        let from_a = snapshot.filtered(|r| r.host().as_deref() == Some("a.example.com"));
        let ids: Vec<u64> = from_a.iter().map(|r| r.id).collect();
        assert_eq!(ids, vec![1, 3]);

        assert_eq!(snapshot.filtered(|r| r.is_success()).len(), 1);
        assert_eq!(snapshot.filtered(|_| true).len(), snapshot.len());
    }

    #[test]
    fn test_copies_are_independent() {
        let snapshot = Snapshot::from(records());
        let other = snapshot.clone();

        let mut owned = snapshot.to_vec();
        owned.clear();

        assert_eq!(snapshot.len(), 3);
        assert_eq!(other.len(), 3);
        assert_eq!(snapshot.find(2).and_then(|r| r.error.as_deref()), Some("timed out"));
    }

    #[test]
    fn test_write_json() {
        let snapshot = Snapshot::from(records());
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("logs.json");

        snapshot.write_json(&path).unwrap();

        let written: Vec<LogRecord> =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(written, snapshot.to_vec());
    }
}
