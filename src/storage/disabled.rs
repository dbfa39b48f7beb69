//! Disabled storage

use super::{CartStorage, StorageError};

/// Storage that refuses every operation, as when the user has turned persistence off.
#[derive(Debug, Clone, Copy, Default)]
pub struct DisabledStorage;

impl CartStorage for DisabledStorage {
    fn read(&self, _key: &str) -> Result<Option<String>, StorageError> {
        Err(StorageError::Unavailable)
    }

    fn write(&mut self, _key: &str, _value: &str) -> Result<(), StorageError> {
        Err(StorageError::Unavailable)
    }
}
