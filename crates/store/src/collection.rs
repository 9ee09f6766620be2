use std::marker::PhantomData;
use std::sync::Arc;

use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::error::StoreResult;
use crate::kv::KeyValueStore;

/// A record that lives in a named JSON collection.
pub trait StoredRecord: Serialize + DeserializeOwned + Clone {
    type Id: Copy + PartialEq + core::fmt::Debug;

    /// Fixed key the collection is persisted under.
    const KEY: &'static str;

    fn record_id(&self) -> Self::Id;
}

/// A single configuration object that lives under its own key.
pub trait StoredSingleton: Serialize + DeserializeOwned {
    const KEY: &'static str;
}

/// A flat JSON array of records under a fixed key.
///
/// This is the persisted shape the original application wrote; `save` is an
/// upsert by record id and the last write wins.
pub struct JsonCollection<T: StoredRecord> {
    store: Arc<dyn KeyValueStore>,
    _record: PhantomData<T>,
}

impl<T: StoredRecord> JsonCollection<T> {
    pub fn open(store: Arc<dyn KeyValueStore>) -> Self {
        Self {
            store,
            _record: PhantomData,
        }
    }

    /// All records in stored order. A missing key reads as an empty
    /// collection.
    pub fn list(&self) -> StoreResult<Vec<T>> {
        match self.store.get(T::KEY)? {
            Some(raw) => Ok(serde_json::from_str(&raw)?),
            None => Ok(Vec::new()),
        }
    }

    pub fn find(&self, id: T::Id) -> StoreResult<Option<T>> {
        Ok(self.list()?.into_iter().find(|r| r.record_id() == id))
    }

    /// Insert or replace the record with the same id.
    pub fn save(&self, record: &T) -> StoreResult<()> {
        let mut records = self.list()?;
        match records
            .iter_mut()
            .find(|r| r.record_id() == record.record_id())
        {
            Some(existing) => *existing = record.clone(),
            None => records.push(record.clone()),
        }
        self.write_all(&records)?;
        debug!(key = T::KEY, id = ?record.record_id(), "record saved");
        Ok(())
    }

    /// Remove the record with this id. Removing an id that is not present is
    /// a no-op, matching the engine's removal semantics.
    pub fn delete(&self, id: T::Id) -> StoreResult<()> {
        let records: Vec<T> = self
            .list()?
            .into_iter()
            .filter(|r| r.record_id() != id)
            .collect();
        self.write_all(&records)?;
        debug!(key = T::KEY, id = ?id, "record deleted");
        Ok(())
    }

    fn write_all(&self, records: &[T]) -> StoreResult<()> {
        let raw = serde_json::to_string(records)?;
        self.store.set(T::KEY, raw)
    }
}

/// A single JSON object under a fixed key (e.g. the business settings).
pub struct JsonDocument<T: StoredSingleton> {
    store: Arc<dyn KeyValueStore>,
    _record: PhantomData<T>,
}

impl<T: StoredSingleton> JsonDocument<T> {
    pub fn open(store: Arc<dyn KeyValueStore>) -> Self {
        Self {
            store,
            _record: PhantomData,
        }
    }

    pub fn load(&self) -> StoreResult<Option<T>> {
        match self.store.get(T::KEY)? {
            Some(raw) => Ok(Some(serde_json::from_str(&raw)?)),
            None => Ok(None),
        }
    }

    pub fn save(&self, value: &T) -> StoreResult<()> {
        let raw = serde_json::to_string(value)?;
        self.store.set(T::KEY, raw)?;
        debug!(key = T::KEY, "settings saved");
        Ok(())
    }
}
