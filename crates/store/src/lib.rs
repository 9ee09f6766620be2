//! Persistence boundary: a key-value blob store with JSON collections on top.
//!
//! The engine never reaches in here; documents are handed across this
//! boundary by the calling layer. The persisted shape — flat JSON arrays of
//! records under the fixed keys `"quotes"` and `"invoices"` — is the
//! compatibility surface with previously stored data.

pub mod collection;
pub mod error;
pub mod kv;
pub mod records;

pub use collection::{JsonCollection, JsonDocument, StoredRecord, StoredSingleton};
pub use error::{StoreError, StoreResult};
pub use kv::{FileStore, KeyValueStore, MemoryStore};
