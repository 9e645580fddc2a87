use crate::errors::{AppError, AppResult};
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;

pub trait StorageBackend: Send + Sync {
    fn read_slot(&self, key: &str) -> AppResult<Option<String>>;
    fn write_slot(&self, key: &str, value: &str) -> AppResult<()>;
}

#[derive(Debug, Default)]
pub struct MemoryStorage {
    slots: Mutex<HashMap<String, String>>,
    read_only: AtomicBool,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_slot(key: &str, value: impl Into<String>) -> Self {
        let storage = Self::default();
        if let Ok(mut slots) = storage.slots.lock() {
            slots.insert(key.to_string(), value.into());
        }
        storage
    }

    pub fn set_read_only(&self, read_only: bool) {
        self.read_only.store(read_only, Ordering::SeqCst);
    }
}

impl StorageBackend for MemoryStorage {
    fn read_slot(&self, key: &str) -> AppResult<Option<String>> {
        let slots = self
            .slots
            .lock()
            .map_err(|_| AppError::Internal("storage mutex poisoned".to_string()))?;
        Ok(slots.get(key).cloned())
    }

    fn write_slot(&self, key: &str, value: &str) -> AppResult<()> {
        if self.read_only.load(Ordering::SeqCst) {
            return Err(AppError::Persistence(format!("slot {} is read-only", key)));
        }
        let mut slots = self
            .slots
            .lock()
            .map_err(|_| AppError::Internal("storage mutex poisoned".to_string()))?;
        slots.insert(key.to_string(), value.to_string());
        Ok(())
    }
}
