//! Business reporting.
//!
//! Pure reductions over stored documents; no I/O and no clock reads. The
//! caller loads documents from the store and passes "today" in, the same way
//! the document engine derives lateness.

pub mod revenue;

pub use revenue::{
    ClientRevenue, MonthlyRevenue, QuotePipeline, monthly_revenue, outstanding_total,
    quote_pipeline, revenue_by_client,
};
