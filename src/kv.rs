//! String key-value storage the configuration is persisted into.

use std::cell::RefCell;
use std::collections::BTreeMap;
use std::rc::Rc;

use snafu::Snafu;

#[derive(Debug, Snafu)]
#[snafu(visibility(pub))]
pub enum StorageError {
    #[snafu(display("StorageError: Storage is not available: {message}"))]
    Unavailable { message: String },

    #[snafu(display("StorageError: Could not read '{key}': {message}"))]
    Get { key: String, message: String },

    #[snafu(display("StorageError: Could not write '{key}': {message}"))]
    Set { key: String, message: String },

    #[snafu(display("StorageError: Could not remove '{key}': {message}"))]
    Remove { key: String, message: String },
}

/// Asynchronous string store, e.g. the platform's preferences API.
///
/// Reading a key that was never written is not an error and yields `None`.
#[allow(async_fn_in_trait)]
pub trait KeyValueStore {
    async fn get(&self, key: &str) -> Result<Option<String>, StorageError>;

    async fn set(&self, key: &str, value: String) -> Result<(), StorageError>;

    async fn remove(&self, key: &str) -> Result<(), StorageError>;
}

impl<T: KeyValueStore> KeyValueStore for Rc<T> {
    async fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        (**self).get(key).await
    }

    async fn set(&self, key: &str, value: String) -> Result<(), StorageError> {
        (**self).set(key, value).await
    }

    async fn remove(&self, key: &str) -> Result<(), StorageError> {
        (**self).remove(key).await
    }
}

/// Volatile store. Used on platforms without persistent storage and in tests.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: RefCell<BTreeMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Synchronous peek at an entry, bypassing the async interface.
    pub fn entry(&self, key: &str) -> Option<String> {
        self.entries.borrow().get(key).cloned()
    }

    pub fn len(&self) -> usize {
        self.entries.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.borrow().is_empty()
    }
}

impl KeyValueStore for MemoryStore {
    async fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.entry(key))
    }

    async fn set(&self, key: &str, value: String) -> Result<(), StorageError> {
        self.entries.borrow_mut().insert(key.to_owned(), value);
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<(), StorageError> {
        self.entries.borrow_mut().remove(key);
        Ok(())
    }
}

/// Which browser storage area a `WebStorage` writes to.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum WebStorageArea {
    /// Survives tab closes and browser restarts.
    #[default]
    Local,

    /// Dropped when the tab is closed.
    Session,
}

/// Browser `localStorage` / `sessionStorage`.
///
/// Only usable inside a browser. Every operation fails with `StorageError::Unavailable` elsewhere.
#[derive(Debug, Default, Clone, Copy)]
pub struct WebStorage {
    area: WebStorageArea,
}

impl WebStorage {
    pub fn new(area: WebStorageArea) -> Self {
        Self { area }
    }

    fn storage(&self) -> Result<web_sys::Storage, StorageError> {
        if !cfg!(target_arch = "wasm32") {
            return Err(StorageError::Unavailable {
                message: "not running in a browser".to_owned(),
            });
        }
        let window = web_sys::window().ok_or_else(|| StorageError::Unavailable {
            message: "no global window".to_owned(),
        })?;
        let storage = match self.area {
            WebStorageArea::Local => window.local_storage(),
            WebStorageArea::Session => window.session_storage(),
        };
        match storage {
            Ok(Some(storage)) => Ok(storage),
            Ok(None) => Err(StorageError::Unavailable {
                message: format!("{:?} storage is disabled", self.area),
            }),
            Err(err) => Err(StorageError::Unavailable {
                message: format!("{err:?}"),
            }),
        }
    }
}

impl KeyValueStore for WebStorage {
    async fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        self.storage()?
            .get_item(key)
            .map_err(|err| StorageError::Get {
                key: key.to_owned(),
                message: format!("{err:?}"),
            })
    }

    async fn set(&self, key: &str, value: String) -> Result<(), StorageError> {
        self.storage()?
            .set_item(key, &value)
            .map_err(|err| StorageError::Set {
                key: key.to_owned(),
                message: format!("{err:?}"),
            })
    }

    async fn remove(&self, key: &str) -> Result<(), StorageError> {
        self.storage()?
            .remove_item(key)
            .map_err(|err| StorageError::Remove {
                key: key.to_owned(),
                message: format!("{err:?}"),
            })
    }
}
