//! Storage
//!
//! Durable key-value substrate used by the cart store. The whole cart is read once when the
//! store opens and written in full after every mutation.

use std::io;

use thiserror::Error;

pub mod disabled;
pub mod file;
pub mod memory;

pub use disabled::DisabledStorage;
pub use file::FileStorage;
pub use memory::MemoryStorage;

/// Errors raised by a storage backend.
#[derive(Debug, Error)]
pub enum StorageError {
    /// The backend is switched off or otherwise not usable.
    #[error("storage is unavailable")]
    Unavailable,

    /// The key cannot be used by this backend.
    #[error("invalid storage key: {0:?}")]
    InvalidKey(String),

    /// Reading or writing the underlying medium failed.
    #[error("storage I/O failed: {0}")]
    Io(#[from] io::Error),
}

/// A string key-value store.
pub trait CartStorage {
    /// Read the value stored under `key`, if any.
    ///
    /// # Errors
    ///
    /// Returns a [`StorageError`] if the backend cannot be read.
    fn read(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Replace the value stored under `key`.
    ///
    /// # Errors
    ///
    /// Returns a [`StorageError`] if the backend cannot be written.
    fn write(&mut self, key: &str, value: &str) -> Result<(), StorageError>;
}

impl<S: CartStorage + ?Sized> CartStorage for &mut S {
    fn read(&self, key: &str) -> Result<Option<String>, StorageError> {
        (**self).read(key)
    }

    fn write(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        (**self).write(key, value)
    }
}

impl<S: CartStorage + ?Sized> CartStorage for Box<S> {
    fn read(&self, key: &str) -> Result<Option<String>, StorageError> {
        (**self).read(key)
    }

    fn write(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        (**self).write(key, value)
    }
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use super::*;

    fn write_through(storage: &mut impl CartStorage) -> Result<(), StorageError> {
        storage.write("cart-items", "[]")
    }

    #[test]
    fn mutable_reference_delegates() -> TestResult {
        let mut storage = MemoryStorage::new();

        write_through(&mut &mut storage)?;

        assert_eq!(storage.read("cart-items")?.as_deref(), Some("[]"));

        Ok(())
    }

    #[test]
    fn boxed_backend_delegates() -> TestResult {
        let mut storage: Box<dyn CartStorage> = Box::new(MemoryStorage::new());

        write_through(&mut storage)?;

        assert_eq!(storage.read("cart-items")?.as_deref(), Some("[]"));

        Ok(())
    }
}
