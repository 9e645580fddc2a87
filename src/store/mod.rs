pub mod payload;
pub mod storage;

pub use storage::{MemoryStorage, StorageBackend};

use crate::errors::AppResult;
use crate::models::{MeasurementDate, MeasurementRecord};
use std::fmt;
use std::sync::Arc;

pub const MEASUREMENTS_SLOT: &str = "measurements";

/// Sole owner of the measurement collection and its durable mirror.
///
/// Records stay strictly ascending by date with at most one record per date.
/// Every mutation rewrites the whole slot before returning.
pub struct MeasurementStore {
    backend: Arc<dyn StorageBackend>,
    slot: String,
    records: Vec<MeasurementRecord>,
    synced: bool,
}

impl MeasurementStore {
    pub fn load(backend: Arc<dyn StorageBackend>) -> AppResult<Self> {
        Self::load_slot(backend, MEASUREMENTS_SLOT)
    }

    pub fn load_slot(backend: Arc<dyn StorageBackend>, slot: &str) -> AppResult<Self> {
        let records = match backend.read_slot(slot)? {
            Some(raw) if !raw.trim().is_empty() => {
                let decoded = payload::decode(&raw)?;
                if decoded.schema_version < payload::SCHEMA_VERSION {
                    tracing::warn!(
                        slot,
                        from = decoded.schema_version,
                        to = payload::SCHEMA_VERSION,
                        "migrating persisted measurements"
                    );
                }
                let mut records = Vec::with_capacity(decoded.records.len());
                for record in decoded.records {
                    let date = record.date;
                    if merge_into(&mut records, record.normalize()?).1 {
                        tracing::warn!(slot, date = %date, "merged duplicate persisted measurement");
                    }
                }
                records
            }
            _ => Vec::new(),
        };

        tracing::info!(slot, count = records.len(), "loaded measurements");
        Ok(Self {
            backend,
            slot: slot.to_string(),
            records,
            synced: true,
        })
    }

    pub fn upsert(&mut self, record: MeasurementRecord) -> AppResult<&MeasurementRecord> {
        let record = record.normalize()?;
        let date = record.date;
        let (index, merged) = merge_into(&mut self.records, record);
        tracing::debug!(date = %date, merged, "upserted measurement");
        self.persist()?;
        Ok(&self.records[index])
    }

    pub fn upsert_many(&mut self, records: Vec<MeasurementRecord>) -> AppResult<usize> {
        let records = records
            .into_iter()
            .map(MeasurementRecord::normalize)
            .collect::<AppResult<Vec<_>>>()?;
        let count = records.len();
        let mut merged = 0usize;
        for record in records {
            if merge_into(&mut self.records, record).1 {
                merged += 1;
            }
        }
        tracing::info!(count, merged, "merged measurement batch");
        self.persist()?;
        Ok(count)
    }

    pub fn delete(&mut self, date: MeasurementDate) -> AppResult<bool> {
        let removed = match self.position(date) {
            Ok(index) => {
                self.records.remove(index);
                true
            }
            Err(_) => false,
        };
        tracing::debug!(date = %date, removed, "deleted measurement");
        self.persist()?;
        Ok(removed)
    }

    pub fn get(&self, date: MeasurementDate) -> Option<&MeasurementRecord> {
        self.position(date).ok().map(|index| &self.records[index])
    }

    pub fn all(&self) -> &[MeasurementRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn recent(&self, limit: usize) -> Vec<&MeasurementRecord> {
        self.records.iter().rev().take(limit).collect()
    }

    pub fn clear_all(&mut self) -> AppResult<()> {
        let cleared = self.records.len();
        self.records.clear();
        tracing::info!(cleared, "cleared all measurements");
        self.persist()
    }

    pub fn is_synced(&self) -> bool {
        self.synced
    }

    fn position(&self, date: MeasurementDate) -> Result<usize, usize> {
        self.records.binary_search_by_key(&date, |record| record.date)
    }

    fn persist(&mut self) -> AppResult<()> {
        let result = payload::encode(&self.records)
            .and_then(|encoded| self.backend.write_slot(&self.slot, &encoded));
        match result {
            Ok(()) => {
                self.synced = true;
                Ok(())
            }
            Err(error) => {
                self.synced = false;
                tracing::warn!(slot = %self.slot, error = %error, "failed to persist measurements");
                Err(error)
            }
        }
    }
}

impl fmt::Debug for MeasurementStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MeasurementStore")
            .field("slot", &self.slot)
            .field("records", &self.records.len())
            .field("synced", &self.synced)
            .finish()
    }
}

fn merge_into(records: &mut Vec<MeasurementRecord>, record: MeasurementRecord) -> (usize, bool) {
    match records.binary_search_by_key(&record.date, |existing| existing.date) {
        Ok(index) => {
            records[index].merge_from(record);
            (index, true)
        }
        Err(index) => {
            records.insert(index, record);
            (index, false)
        }
    }
}
