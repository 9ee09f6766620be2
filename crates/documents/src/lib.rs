//! The ledger document engine: line-item calculation, document aggregates,
//! and the status lifecycle of quotes and invoices.
//!
//! Pure domain logic only: no IO, no clock reads, no persistence concerns.
//! "Today" is always a parameter, and every operation takes a snapshot and
//! returns a new one.

mod document;

pub mod invoice;
pub mod line_item;
pub mod number;
pub mod quote;

pub use invoice::{DEFAULT_DUE_DAYS, Invoice, InvoiceId, InvoiceStatus};
pub use line_item::{
    LineItem, LineItemId, LineItemPatch, Totals, add_item, compute_aggregates, remove_item,
    update_item,
};
pub use number::{DocumentNumber, INVOICE_PREFIX, NumberGenerator, QUOTE_PREFIX};
pub use quote::{DEFAULT_EXPIRY_DAYS, Quote, QuoteId, QuoteStatus};
