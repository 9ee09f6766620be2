use chrono::{Days, NaiveDate};
use serde::{Deserialize, Serialize};

use quoteflow_catalog::Product;
use quoteflow_clients::{ClientId, JobSite, JobSiteId};
use quoteflow_core::{DomainError, DomainResult, EntityId, Money, TaxRate};

use crate::document::DocumentCore;
use crate::line_item::{LineItem, LineItemId, LineItemPatch};
use crate::number::DocumentNumber;
use crate::quote::{Quote, QuoteId, QuoteStatus};

/// Invoice identifier.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct InvoiceId(pub EntityId);

impl InvoiceId {
    pub fn new(id: EntityId) -> Self {
        Self(id)
    }
}

impl core::fmt::Display for InvoiceId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        core::fmt::Display::fmt(&self.0, f)
    }
}

/// Days until a new invoice falls due.
pub const DEFAULT_DUE_DAYS: u64 = 7;

/// Invoice status lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InvoiceStatus {
    Draft,
    Sent,
    Paid,
    Overdue,
}

impl core::fmt::Display for InvoiceStatus {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let s = match self {
            InvoiceStatus::Draft => "draft",
            InvoiceStatus::Sent => "sent",
            InvoiceStatus::Paid => "paid",
            InvoiceStatus::Overdue => "overdue",
        };
        f.write_str(s)
    }
}

/// Actions that move an invoice through its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum InvoiceAction {
    Send,
    RecordPayment,
}

impl core::fmt::Display for InvoiceAction {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let s = match self {
            InvoiceAction::Send => "send",
            InvoiceAction::RecordPayment => "record payment on",
        };
        f.write_str(s)
    }
}

/// The legal-transition table, in one place.
///
/// Lateness is not a transition: it is derived at read time by
/// [`Invoice::effective_status`]. A stored `overdue` status (written by an
/// earlier version of the data) still accepts a payment.
fn transition(from: InvoiceStatus, action: InvoiceAction) -> DomainResult<InvoiceStatus> {
    use InvoiceAction::*;
    use InvoiceStatus::*;

    match (from, action) {
        (Draft, Send) => Ok(Sent),
        (Sent | Overdue, RecordPayment) => Ok(Paid),
        (from, action) => Err(DomainError::invalid_transition(format!(
            "cannot {action} a {from} invoice"
        ))),
    }
}

/// A bill for work done, optionally derived from an accepted quote.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Invoice {
    id: InvoiceId,
    document_number: DocumentNumber,
    status: InvoiceStatus,
    issue_date: NaiveDate,
    due_date: NaiveDate,
    source_quote_id: Option<QuoteId>,
    #[serde(flatten)]
    core: DocumentCore,
}

impl Invoice {
    /// New draft invoice issued today, due after the default window.
    pub fn new(id: InvoiceId, document_number: DocumentNumber, today: NaiveDate) -> Self {
        Self {
            id,
            document_number,
            status: InvoiceStatus::Draft,
            issue_date: today,
            due_date: today
                .checked_add_days(Days::new(DEFAULT_DUE_DAYS))
                .unwrap_or(today),
            source_quote_id: None,
            core: DocumentCore::empty(),
        }
    }

    /// Derive a draft invoice from an accepted quote.
    ///
    /// Copies the client, job site, items, totals, and notes. Line items get
    /// freshly generated identities so the invoice never shares line ids with
    /// its source. The invoice gets its own document number, a fresh issue
    /// date, and a due date after the default window.
    pub fn from_accepted_quote(
        quote: &Quote,
        id: InvoiceId,
        document_number: DocumentNumber,
        today: NaiveDate,
    ) -> DomainResult<Self> {
        if quote.status() != QuoteStatus::Accepted {
            return Err(DomainError::invalid_source(format!(
                "cannot invoice a {} quote",
                quote.status()
            )));
        }
        Ok(Self {
            id,
            document_number,
            status: InvoiceStatus::Draft,
            issue_date: today,
            due_date: today
                .checked_add_days(Days::new(DEFAULT_DUE_DAYS))
                .unwrap_or(today),
            source_quote_id: Some(quote.id()),
            core: quote.derived_core(),
        })
    }

    pub fn id(&self) -> InvoiceId {
        self.id
    }

    pub fn document_number(&self) -> &DocumentNumber {
        &self.document_number
    }

    pub fn status(&self) -> InvoiceStatus {
        self.status
    }

    pub fn issue_date(&self) -> NaiveDate {
        self.issue_date
    }

    pub fn due_date(&self) -> NaiveDate {
        self.due_date
    }

    /// Which quote, if any, this invoice was derived from.
    pub fn source_quote_id(&self) -> Option<QuoteId> {
        self.source_quote_id
    }

    pub fn client_id(&self) -> Option<ClientId> {
        self.core.client_id()
    }

    pub fn job_site_id(&self) -> Option<JobSiteId> {
        self.core.job_site_id()
    }

    pub fn items(&self) -> &[LineItem] {
        self.core.items()
    }

    pub fn subtotal(&self) -> Money {
        self.core.subtotal()
    }

    pub fn tax(&self) -> Money {
        self.core.tax()
    }

    pub fn total(&self) -> Money {
        self.core.total()
    }

    pub fn notes(&self) -> Option<&str> {
        self.core.notes()
    }

    /// Override the generated document number with a user-supplied one.
    pub fn with_number(&self, document_number: DocumentNumber) -> Self {
        Self {
            document_number,
            ..self.clone()
        }
    }

    pub fn with_issue_date(&self, issue_date: NaiveDate) -> Self {
        Self {
            issue_date,
            ..self.clone()
        }
    }

    pub fn with_due_date(&self, due_date: NaiveDate) -> Self {
        Self {
            due_date,
            ..self.clone()
        }
    }

    /// Selecting a client clears any job site chosen for the previous one.
    pub fn with_client(&self, client_id: ClientId) -> Self {
        Self {
            core: self.core.with_client(client_id),
            ..self.clone()
        }
    }

    pub fn with_job_site(&self, site: &JobSite) -> DomainResult<Self> {
        Ok(Self {
            core: self.core.with_job_site(site)?,
            ..self.clone()
        })
    }

    pub fn without_job_site(&self) -> Self {
        Self {
            core: self.core.without_job_site(),
            ..self.clone()
        }
    }

    pub fn with_notes(&self, notes: impl Into<String>) -> Self {
        Self {
            core: self.core.with_notes(notes),
            ..self.clone()
        }
    }

    pub fn add_item(
        &self,
        id: LineItemId,
        description: &str,
        quantity: i64,
        unit_price: Money,
        tax_applicable: bool,
        rate: TaxRate,
    ) -> DomainResult<Self> {
        Ok(Self {
            core: self
                .core
                .with_item_added(id, description, quantity, unit_price, tax_applicable, rate)?,
            ..self.clone()
        })
    }

    /// Add a line pre-populated from a catalog product.
    pub fn add_product(
        &self,
        id: LineItemId,
        product: &Product,
        rate: TaxRate,
    ) -> DomainResult<Self> {
        let line = LineItem::from_product(id, product)?;
        Ok(Self {
            core: self.core.with_line(line, rate),
            ..self.clone()
        })
    }

    pub fn update_item(
        &self,
        id: LineItemId,
        patch: &LineItemPatch,
        rate: TaxRate,
    ) -> DomainResult<Self> {
        Ok(Self {
            core: self.core.with_item_updated(id, patch, rate)?,
            ..self.clone()
        })
    }

    pub fn remove_item(&self, id: LineItemId, rate: TaxRate) -> Self {
        Self {
            core: self.core.with_item_removed(id, rate),
            ..self.clone()
        }
    }

    /// An invoice is persistable only with a client and at least one item.
    pub fn validate_for_save(&self) -> DomainResult<()> {
        self.core.validate_for_save()
    }

    /// Send to the client. Legal only from `draft`.
    pub fn mark_sent(&self) -> DomainResult<Self> {
        Ok(Self {
            status: transition(self.status, InvoiceAction::Send)?,
            ..self.clone()
        })
    }

    /// Record payment, whether manual or via a completed payment link.
    /// Legal from `sent`, including after the due date has passed.
    pub fn mark_paid(&self) -> DomainResult<Self> {
        Ok(Self {
            status: transition(self.status, InvoiceAction::RecordPayment)?,
            ..self.clone()
        })
    }

    /// Status as it should be displayed: a sent invoice whose due date has
    /// passed reads as overdue, while the stored status stays `sent` until
    /// an explicit action changes it.
    pub fn effective_status(&self, today: NaiveDate) -> InvoiceStatus {
        if self.status == InvoiceStatus::Sent && today > self.due_date {
            InvoiceStatus::Overdue
        } else {
            self.status
        }
    }

    /// Days past due as of `today`; zero when not yet due or not sent.
    pub fn days_overdue(&self, today: NaiveDate) -> i64 {
        if self.effective_status(today) == InvoiceStatus::Overdue {
            (today - self.due_date).num_days()
        } else {
            0
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::number::DocumentNumber;
    use std::collections::HashSet;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, 15).unwrap()
    }

    fn test_invoice_id() -> InvoiceId {
        InvoiceId::new(EntityId::new())
    }

    fn test_client_id() -> ClientId {
        ClientId::new(EntityId::new())
    }

    fn accepted_quote() -> Quote {
        Quote::new(
            QuoteId::new(EntityId::new()),
            DocumentNumber::new("QUO", 2024, 7),
            today(),
        )
        .with_client(test_client_id())
        .with_notes("Includes site cleanup.")
        .add_item(
            LineItemId::generate(),
            "Tap installation",
            2,
            Money::from_dollars(50),
            true,
            TaxRate::DEFAULT_GST,
        )
        .unwrap()
        .mark_sent()
        .unwrap()
        .mark_accepted()
        .unwrap()
    }

    fn invoice_with_item() -> Invoice {
        Invoice::new(test_invoice_id(), DocumentNumber::new("INV", 2024, 1), today())
            .with_client(test_client_id())
            .add_item(
                LineItemId::generate(),
                "Labour",
                1,
                Money::from_dollars(95),
                true,
                TaxRate::DEFAULT_GST,
            )
            .unwrap()
    }

    #[test]
    fn new_invoice_is_due_in_seven_days() {
        let invoice = invoice_with_item();
        assert_eq!(invoice.status(), InvoiceStatus::Draft);
        assert_eq!(
            invoice.due_date(),
            NaiveDate::from_ymd_opt(2024, 1, 22).unwrap()
        );
    }

    #[test]
    fn derivation_from_a_non_accepted_quote_is_rejected() {
        let draft = Quote::new(
            QuoteId::new(EntityId::new()),
            DocumentNumber::new("QUO", 2024, 8),
            today(),
        );
        let err = Invoice::from_accepted_quote(
            &draft,
            test_invoice_id(),
            DocumentNumber::new("INV", 2024, 2),
            today(),
        )
        .unwrap_err();
        match err {
            DomainError::InvalidSource(msg) => assert!(msg.contains("draft")),
            _ => panic!("Expected InvalidSource"),
        }

        let declined = Quote::new(
            QuoteId::new(EntityId::new()),
            DocumentNumber::new("QUO", 2024, 9),
            today(),
        )
        .with_client(test_client_id())
        .add_item(
            LineItemId::generate(),
            "Labour",
            1,
            Money::from_dollars(95),
            true,
            TaxRate::DEFAULT_GST,
        )
        .unwrap()
        .mark_sent()
        .unwrap()
        .mark_declined()
        .unwrap();

        let err = Invoice::from_accepted_quote(
            &declined,
            test_invoice_id(),
            DocumentNumber::new("INV", 2024, 2),
            today(),
        )
        .unwrap_err();
        assert!(matches!(err, DomainError::InvalidSource(_)));
    }

    #[test]
    fn derived_invoice_copies_content_and_totals() {
        let quote = accepted_quote();
        let invoice = Invoice::from_accepted_quote(
            &quote,
            test_invoice_id(),
            DocumentNumber::new("INV", 2024, 3),
            today(),
        )
        .unwrap();

        assert_eq!(invoice.status(), InvoiceStatus::Draft);
        assert_eq!(invoice.source_quote_id(), Some(quote.id()));
        assert_eq!(invoice.client_id(), quote.client_id());
        assert_eq!(invoice.notes(), quote.notes());
        assert_eq!(invoice.subtotal(), Money::from_dollars(100));
        assert_eq!(invoice.tax(), Money::from_dollars(10));
        assert_eq!(invoice.total(), Money::from_dollars(110));
        assert_eq!(invoice.issue_date(), today());
        assert_eq!(
            invoice.due_date(),
            NaiveDate::from_ymd_opt(2024, 1, 22).unwrap()
        );
        assert_ne!(invoice.document_number(), quote.document_number());
    }

    #[test]
    fn derived_line_items_get_fresh_identities() {
        let quote = accepted_quote();
        let invoice = Invoice::from_accepted_quote(
            &quote,
            test_invoice_id(),
            DocumentNumber::new("INV", 2024, 4),
            today(),
        )
        .unwrap();

        let quote_ids: HashSet<_> = quote.items().iter().map(|i| i.id()).collect();
        let invoice_ids: HashSet<_> = invoice.items().iter().map(|i| i.id()).collect();
        assert_eq!(invoice.items().len(), quote.items().len());
        assert!(quote_ids.is_disjoint(&invoice_ids));
    }

    #[test]
    fn paying_a_draft_is_an_invalid_transition() {
        let err = invoice_with_item().mark_paid().unwrap_err();
        assert!(matches!(err, DomainError::InvalidTransition(_)));
    }

    #[test]
    fn sent_invoice_can_be_paid() {
        let paid = invoice_with_item()
            .mark_sent()
            .unwrap()
            .mark_paid()
            .unwrap();
        assert_eq!(paid.status(), InvoiceStatus::Paid);
        assert!(paid.mark_paid().is_err());
    }

    #[test]
    fn lateness_is_derived_at_read_time() {
        let invoice = invoice_with_item().mark_sent().unwrap();

        let on_due_day = invoice.due_date();
        assert_eq!(invoice.effective_status(on_due_day), InvoiceStatus::Sent);
        assert_eq!(invoice.days_overdue(on_due_day), 0);

        let late = invoice.due_date().checked_add_days(Days::new(3)).unwrap();
        assert_eq!(invoice.effective_status(late), InvoiceStatus::Overdue);
        assert_eq!(invoice.days_overdue(late), 3);
        assert_eq!(invoice.status(), InvoiceStatus::Sent);

        // Payment still lands after the due date.
        let paid = invoice.mark_paid().unwrap();
        assert_eq!(paid.status(), InvoiceStatus::Paid);
        assert_eq!(paid.effective_status(late), InvoiceStatus::Paid);
    }

    #[test]
    fn stored_overdue_status_still_accepts_payment() {
        // Data written by earlier versions carries a literal "overdue"
        // status; payment must still be recordable on it.
        let mut value = serde_json::to_value(invoice_with_item().mark_sent().unwrap()).unwrap();
        value["status"] = serde_json::json!("overdue");

        let stored: Invoice = serde_json::from_value(value).unwrap();
        assert_eq!(stored.status(), InvoiceStatus::Overdue);

        let paid = stored.mark_paid().unwrap();
        assert_eq!(paid.status(), InvoiceStatus::Paid);
        assert!(stored.mark_sent().is_err());
    }

    #[test]
    fn json_shape_records_the_source_quote() {
        let quote = accepted_quote();
        let invoice = Invoice::from_accepted_quote(
            &quote,
            test_invoice_id(),
            DocumentNumber::new("INV", 2024, 5),
            today(),
        )
        .unwrap();

        let value = serde_json::to_value(&invoice).unwrap();
        assert_eq!(
            value["sourceQuoteId"],
            serde_json::to_value(quote.id()).unwrap()
        );
        assert_eq!(value["status"], "draft");
        assert_eq!(value["documentNumber"], "INV-2024-005");

        let back: Invoice = serde_json::from_value(value).unwrap();
        assert_eq!(back, invoice);
    }
}
