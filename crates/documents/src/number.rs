//! Human-legible document numbers.

use std::sync::atomic::{AtomicU32, Ordering};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use quoteflow_core::{DomainError, DomainResult};

/// Document number prefix for quotes.
pub const QUOTE_PREFIX: &str = "QUO";

/// Document number prefix for invoices.
pub const INVOICE_PREFIX: &str = "INV";

/// Document label of shape `PREFIX-YEAR-NNN`, e.g. `QUO-2024-001`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DocumentNumber(String);

impl DocumentNumber {
    pub fn new(prefix: &str, year: i32, sequence: u32) -> Self {
        Self(format!("{prefix}-{year}-{sequence:03}"))
    }

    /// Accept a user-supplied override.
    pub fn custom(label: impl Into<String>) -> DomainResult<Self> {
        let label = label.into();
        if label.trim().is_empty() {
            return Err(DomainError::validation(
                "document number must not be empty",
            ));
        }
        Ok(Self(label))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl core::fmt::Display for DocumentNumber {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Best-effort generator of sequential document numbers.
///
/// Uniqueness holds within one generator instance only; concurrent
/// generators can collide. Good enough while the store is single-user; a
/// store-assigned sequence is the production replacement.
#[derive(Debug)]
pub struct NumberGenerator {
    prefix: String,
    counter: AtomicU32,
}

impl NumberGenerator {
    pub fn new(prefix: impl Into<String>) -> Self {
        Self::starting_at(prefix, 1)
    }

    pub fn starting_at(prefix: impl Into<String>, first: u32) -> Self {
        Self {
            prefix: prefix.into(),
            counter: AtomicU32::new(first),
        }
    }

    /// Seed the suffix from a caller-supplied timestamp, mirroring the
    /// time-derived labels carried by previously stored documents.
    pub fn seeded_from(prefix: impl Into<String>, at: DateTime<Utc>) -> Self {
        let seed = (at.timestamp_millis().unsigned_abs() % 1_000) as u32;
        Self::starting_at(prefix, seed.max(1))
    }

    /// Next number for the given calendar year.
    pub fn next(&self, year: i32) -> DocumentNumber {
        let sequence = self.counter.fetch_add(1, Ordering::Relaxed);
        DocumentNumber::new(&self.prefix, year, sequence)
    }
}
