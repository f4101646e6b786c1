// erutcurts: Minecraft Bedrock structure converter for Discord
//
// SPDX-FileCopyrightText: 2023 Risu
// SPDX-License-Identifier: MIT

//! Named JSON documents behind a write-back cache.
//!
//! ```text
//!  get<T>(name) ----> cache hit? --yes--> T
//!                        | no
//!                        v
//!                 backend.load(name) --> parse (invalid => absent)
//!
//!  put<T>(name) ----> cache (dirty, no write)
//!
//!  sweeper tick / flush()
//!        |
//!        v
//!  expired or all entries --> dirty? --> backend.save(name, pretty json)
//!                                            | ok: evict   | err: keep dirty
//!
//!  Backends:  LocalBackend  <dir>/<name>.json
//!             ForumBackend  one forum post per document (bot::forum)
//! ```

mod cache;
mod local;

pub use cache::{DEFAULT_EXPIRE_AFTER_ACCESS, ExpiringCache};
pub use local::LocalBackend;

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tokio::time::{MissedTickBehavior, interval};
use tokio_util::sync::CancellationToken;

use crate::error::{BotError, BotResult, StoreError};
use crate::logging::LogReason;

/// Storage for raw JSON documents.
#[async_trait]
pub trait DocumentBackend: Send + Sync {
    /// Latest stored text of `name`, if any.
    async fn load(&self, name: &str) -> BotResult<Option<String>>;

    /// Store `json` as the latest version of `name`.
    async fn save(&self, name: &str, json: &str) -> BotResult<()>;
}

/// Document names double as file and thread names.
pub(crate) fn check_document_name(name: &str) -> Result<(), StoreError> {
    let valid = !name.is_empty()
        && name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '-'));
    if valid {
        Ok(())
    } else {
        Err(StoreError::Backend {
            name: name.to_string(),
            message: "document names may only contain ASCII letters, digits, '_' and '-'"
                .to_string(),
        })
    }
}

#[derive(Debug, Clone)]
struct Slot {
    value: Option<Value>,
    dirty: bool,
    generation: u64,
}

type Documents = ExpiringCache<String, Slot>;

/// Typed access to documents with deferred writes.
///
/// The cache lock is never held across backend I/O. A dirty entry leaves the
/// cache only after its save succeeds.
pub struct DocumentStore {
    backend: Arc<dyn DocumentBackend>,
    cache: Mutex<Documents>,
    generation: AtomicU64,
}

impl DocumentStore {
    #[must_use]
    pub fn new(backend: Arc<dyn DocumentBackend>, expire_after_access: Duration) -> Self {
        Self {
            backend,
            cache: Mutex::new(ExpiringCache::new(expire_after_access)),
            generation: AtomicU64::new(0),
        }
    }

    /// Read `name`, loading it from the backend on a cache miss.
    ///
    /// A stored document that is not valid JSON for `T` counts as absent.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend fails.
    pub async fn get<T: DeserializeOwned>(&self, name: &str) -> BotResult<Option<T>> {
        let value = self.current(name).await?;
        Ok(value.and_then(|value| decode(name, value)))
    }

    /// Like [`DocumentStore::get`], falling back to `T::default()`.
    ///
    /// # Errors
    ///
    /// See [`DocumentStore::get`].
    pub async fn get_or_default<T: DeserializeOwned + Default>(&self, name: &str) -> BotResult<T> {
        Ok(self.get(name).await?.unwrap_or_default())
    }

    /// Replace `name` in the cache. The backend is written on expiry or flush.
    ///
    /// # Errors
    ///
    /// Returns an error if `value` cannot be converted to JSON.
    pub async fn put<T: Serialize>(&self, name: &str, value: &T) -> BotResult<()> {
        check_document_name(name)?;
        let value = to_value(name, value)?;
        let slot = self.dirty_slot(value);
        self.cache.lock().await.insert(name.to_string(), slot);
        Ok(())
    }

    /// Read, modify and put back `name` without another writer in between.
    ///
    /// Nothing is marked for writing when `f` leaves the value unchanged.
    ///
    /// # Errors
    ///
    /// See [`DocumentStore::get`] and [`DocumentStore::put`].
    pub async fn update<T, R>(&self, name: &str, f: impl FnOnce(&mut T) -> R + Send) -> BotResult<R>
    where
        T: DeserializeOwned + Serialize + Default + Send,
        R: Send,
    {
        check_document_name(name)?;
        let key = name.to_string();

        let mut cache = self.cache.lock().await;
        let current = match cached(&mut cache, &key) {
            Some(value) => value,
            None => {
                drop(cache);
                let loaded = self.load(name).await?;
                cache = self.cache.lock().await;
                match cached(&mut cache, &key) {
                    Some(value) => value,
                    None => {
                        let slot = self.clean_slot(loaded.clone());
                        cache.insert(key.clone(), slot);
                        loaded
                    }
                }
            }
        };

        let mut value: T = current
            .and_then(|value| decode(name, value))
            .unwrap_or_default();
        let before = to_value(name, &value)?;
        let result = f(&mut value);
        let after = to_value(name, &value)?;
        if after != before {
            let slot = self.dirty_slot(after);
            cache.insert(key, slot);
        }
        Ok(result)
    }

    /// Write back and evict expired entries. Returns how many expired.
    ///
    /// # Errors
    ///
    /// Returns the first backend error; other entries are still written.
    /// Entries that failed stay cached and are retried later.
    pub async fn sweep(&self) -> BotResult<usize> {
        let (count, pending) = {
            let mut cache = self.cache.lock().await;
            let expired = cache.drain_expired();
            let count = expired.len();
            (count, keep_dirty(&mut cache, expired))
        };
        self.write_back(pending).await?;
        Ok(count)
    }

    /// Write back and evict every entry.
    ///
    /// # Errors
    ///
    /// Returns the first backend error; other entries are still written.
    /// Entries that failed stay cached and are retried later.
    pub async fn flush(&self) -> BotResult<()> {
        let pending = {
            let mut cache = self.cache.lock().await;
            let all = cache.drain_all();
            tracing::debug!(reason = %LogReason::Store, entries = all.len(), "Flushing documents");
            keep_dirty(&mut cache, all)
        };
        self.write_back(pending).await
    }

    /// Sweep every `period` until `cancel` fires.
    pub fn spawn_sweeper(self: &Arc<Self>, period: Duration, cancel: CancellationToken) -> JoinHandle<()> {
        let store = Arc::clone(self);
        tokio::spawn(async move {
            let mut ticker = interval(period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                tokio::select! {
                    () = cancel.cancelled() => break,
                    _ = ticker.tick() => {
                        if let Err(e) = store.sweep().await {
                            tracing::warn!(reason = %LogReason::Store, error = %e, "Failed to write back documents");
                        }
                    }
                }
            }
        })
    }

    async fn current(&self, name: &str) -> BotResult<Option<Value>> {
        let key = name.to_string();
        if let Some(value) = cached(&mut *self.cache.lock().await, &key) {
            return Ok(value);
        }

        let loaded = self.load(name).await?;
        let mut cache = self.cache.lock().await;
        // a put may have landed while loading
        if let Some(value) = cached(&mut cache, &key) {
            return Ok(value);
        }
        let slot = self.clean_slot(loaded.clone());
        cache.insert(key, slot);
        Ok(loaded)
    }

    async fn load(&self, name: &str) -> BotResult<Option<Value>> {
        let value = match self.backend.load(name).await? {
            Some(text) => match serde_json::from_str::<Value>(&text) {
                Ok(value) => Some(value),
                Err(e) => {
                    tracing::warn!(reason = %LogReason::Store, document = name, error = %e, "Ignoring invalid document");
                    None
                }
            },
            None => None,
        };
        tracing::debug!(reason = %LogReason::Store, document = name, found = value.is_some(), "Loaded document");
        Ok(value)
    }

    async fn write_back(&self, pending: Vec<(String, Slot)>) -> BotResult<()> {
        let mut first_error: Option<BotError> = None;
        for (name, slot) in pending {
            let Some(value) = slot.value else {
                continue;
            };
            let result = match serde_json::to_string_pretty(&value) {
                Ok(json) => self.backend.save(&name, &json).await,
                Err(source) => Err(StoreError::Serialize {
                    name: name.clone(),
                    source,
                }
                .into()),
            };
            match result {
                Ok(()) => {
                    tracing::info!(reason = %LogReason::Store, document = %name, "Saved document");
                    let mut cache = self.cache.lock().await;
                    let unchanged = cache
                        .peek_mut(&name)
                        .is_some_and(|current| current.generation == slot.generation);
                    if unchanged {
                        cache.remove(&name);
                    }
                }
                Err(e) => {
                    tracing::error!(reason = %LogReason::Store, document = %name, error = %e, "Failed to save document");
                    first_error.get_or_insert(e);
                }
            }
        }
        first_error.map_or(Ok(()), Err)
    }

    fn clean_slot(&self, value: Option<Value>) -> Slot {
        Slot {
            value,
            dirty: false,
            generation: self.generation.fetch_add(1, Ordering::Relaxed),
        }
    }

    fn dirty_slot(&self, value: Value) -> Slot {
        Slot {
            value: Some(value),
            dirty: true,
            generation: self.generation.fetch_add(1, Ordering::Relaxed),
        }
    }
}

/// Live value of `key`. An expired entry that was never saved stays
/// readable; an expired clean one is dropped.
fn cached(cache: &mut Documents, key: &String) -> Option<Option<Value>> {
    if let Some(slot) = cache.get(key) {
        return Some(slot.value.clone());
    }
    let slot = cache.remove(key)?;
    if !slot.dirty {
        return None;
    }
    let value = slot.value.clone();
    cache.insert(key.clone(), slot);
    Some(value)
}

/// Put dirty entries back until their save succeeds and return them.
fn keep_dirty(cache: &mut Documents, entries: Vec<(String, Slot)>) -> Vec<(String, Slot)> {
    entries
        .into_iter()
        .filter(|(_, slot)| slot.dirty)
        .inspect(|(name, slot)| {
            cache.insert(name.clone(), slot.clone());
        })
        .collect()
}

fn to_value<T: Serialize>(name: &str, value: &T) -> Result<Value, StoreError> {
    serde_json::to_value(value).map_err(|source| StoreError::Serialize {
        name: name.to_string(),
        source,
    })
}

fn decode<T: DeserializeOwned>(name: &str, value: Value) -> Option<T> {
    serde_json::from_value(value)
        .inspect_err(|e| {
            tracing::warn!(reason = %LogReason::Store, document = name, error = %e, "Document has an unexpected shape");
        })
        .ok()
}
