use crate::model::{StatisticsRecord, Subject};
use anyhow::Result;
use std::collections::HashMap;

/// Destination for computed statistics. `put` replaces whatever the subject
/// had before; records are never merged.
pub trait StatisticsStore {
    fn put(&mut self, record: StatisticsRecord) -> Result<()>;
    fn get(&self, subject: &Subject) -> Result<Option<StatisticsRecord>>;
    /// Drop the subject's record, if any.
    fn clear(&mut self, subject: &Subject) -> Result<()>;
}

#[derive(Debug, Default)]
pub struct MemoryStore {
    records: HashMap<Subject, StatisticsRecord>,
}

impl MemoryStore {
    pub fn new() -> Self { Self::default() }

    pub fn len(&self) -> usize { self.records.len() }

    pub fn is_empty(&self) -> bool { self.records.is_empty() }

    /// All records ordered by subject.
    pub fn records(&self) -> Vec<&StatisticsRecord> {
        let mut out: Vec<&StatisticsRecord> = self.records.values().collect();
        out.sort_by(|a, b| a.subject.cmp(&b.subject));
        out
    }
}

impl StatisticsStore for MemoryStore {
    fn put(&mut self, record: StatisticsRecord) -> Result<()> {
        self.records.insert(record.subject.clone(), record);
        Ok(())
    }

    fn get(&self, subject: &Subject) -> Result<Option<StatisticsRecord>> {
        Ok(self.records.get(subject).cloned())
    }

    fn clear(&mut self, subject: &Subject) -> Result<()> {
        self.records.remove(subject);
        Ok(())
    }
}
