#![forbid(unsafe_code)]

//! A batch of records produced by one scan.

use std::collections::HashSet;

use crate::record::{Category, OpportunityRecord, RawRecord, RecordError};

/// Records produced by a single scan. Identifiers are unique within a batch.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScanBatch {
    records: Vec<OpportunityRecord>,
}

impl ScanBatch {
    /// Build a batch, rejecting duplicate identifiers.
    pub fn new(records: Vec<OpportunityRecord>) -> Result<Self, RecordError> {
        let mut seen = HashSet::with_capacity(records.len());
        for record in &records {
            if !seen.insert(record.id.as_str()) {
                return Err(RecordError::DuplicateId(record.id.clone()));
            }
        }
        Ok(Self { records })
    }

    /// Type a list of raw records and build a batch from them.
    pub fn from_raw(raw: Vec<RawRecord>) -> Result<Self, RecordError> {
        let records = raw
            .into_iter()
            .map(OpportunityRecord::try_from)
            .collect::<Result<Vec<_>, _>>()?;
        Self::new(records)
    }

    pub fn records(&self) -> &[OpportunityRecord] {
        &self.records
    }

    pub fn into_records(self) -> Vec<OpportunityRecord> {
        self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// The constant three-record batch returned by the mock scan.
pub fn mock_batch() -> ScanBatch {
    ScanBatch {
        records: vec![
            OpportunityRecord {
                id: "1".into(),
                title: "Legacy Github: core-v1-archive".into(),
                description: "Found abandoned branch with critical auth logic not present in v2."
                    .into(),
                price: "$15,000 - $25,000".into(),
                revenue: "High Potential".into(),
                category: Category::GithubZombie,
                details: "Codebase contains trade-secret logic for legacy auth flow. \
                          Re-monetization possible via licensing to legacy users."
                    .into(),
            },
            OpportunityRecord {
                id: "2".into(),
                title: "Shadow API: /v1/internal/admin".into(),
                description: "Undocumented admin endpoint accessible via specific header injection."
                    .into(),
                price: "$50,000+".into(),
                revenue: "Critical Vulnerability".into(),
                category: Category::ChromeGhost,
                details: "Direct access to admin table detected. \
                          Bounty program applicable or immediate patch required."
                    .into(),
            },
            OpportunityRecord {
                id: "3".into(),
                title: "Deprecated Service: ImageOptimizer".into(),
                description: "Service running on AWS instance labeled 'do-not-delete' but unlinked."
                    .into(),
                price: "$200/mo cost".into(),
                revenue: "Cost Saver".into(),
                category: Category::GithubZombie,
                details: "Zombie infrastructure. Shutting down saves $2400/yr immediately.".into(),
            },
        ],
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mock_batch_has_three_complete_records() {
        let batch = mock_batch();
        assert_eq!(batch.len(), 3);
        for record in batch.records() {
            assert!(!record.title.is_empty());
            assert!(!record.price.is_empty());
            assert!(!record.revenue.is_empty());
            assert!(Category::ALL.contains(&record.category));
        }
    }

    #[test]
    fn mock_batch_ids_are_unique() {
        let batch = mock_batch();
        assert!(ScanBatch::new(batch.into_records()).is_ok());
    }

    #[test]
    fn mock_batch_details_keep_sentence_spacing() {
        let batch = mock_batch();
        assert_eq!(
            batch.records()[1].details,
            "Direct access to admin table detected. Bounty program applicable or immediate patch required."
        );
    }

    #[test]
    fn duplicate_ids_are_rejected() {
        let mut records = mock_batch().into_records();
        records[2].id = "1".into();
        assert_eq!(
            ScanBatch::new(records),
            Err(RecordError::DuplicateId("1".into()))
        );
    }

    #[test]
    fn from_raw_stops_at_first_bad_record() {
        let raw = vec![
            RawRecord {
                id: "a".into(),
                title: "ok".into(),
                category: "github_zombie".into(),
                ..RawRecord::default()
            },
            RawRecord {
                id: "b".into(),
                title: "bad".into(),
                category: "firefox_ghost".into(),
                ..RawRecord::default()
            },
        ];
        assert_eq!(
            ScanBatch::from_raw(raw),
            Err(RecordError::UnknownCategory("firefox_ghost".into()))
        );
    }
}
