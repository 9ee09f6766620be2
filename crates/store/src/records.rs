//! Bindings of domain records to their persisted collections.

use quoteflow_documents::{Invoice, InvoiceId, Quote, QuoteId};
use quoteflow_jobs::{Job, JobId};
use quoteflow_settings::BusinessSettings;

use crate::collection::{StoredRecord, StoredSingleton};

impl StoredRecord for Quote {
    type Id = QuoteId;

    const KEY: &'static str = "quotes";

    fn record_id(&self) -> QuoteId {
        self.id()
    }
}

impl StoredRecord for Invoice {
    type Id = InvoiceId;

    const KEY: &'static str = "invoices";

    fn record_id(&self) -> InvoiceId {
        self.id()
    }
}

impl StoredRecord for Job {
    type Id = JobId;

    const KEY: &'static str = "jobs";

    fn record_id(&self) -> JobId {
        self.id()
    }
}

impl StoredSingleton for BusinessSettings {
    const KEY: &'static str = "businessSettings";
}
