//! Product/service library.
//!
//! The catalog is an external collaborator: document builders read it to
//! pre-populate line items, nothing in the engine writes to it.

pub mod product;

pub use product::{InMemoryCatalog, Product, ProductCatalog, ProductId};
