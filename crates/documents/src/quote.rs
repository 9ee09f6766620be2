use chrono::{Days, NaiveDate};
use serde::{Deserialize, Serialize};

use quoteflow_catalog::Product;
use quoteflow_clients::{ClientId, JobSite, JobSiteId};
use quoteflow_core::{DomainError, DomainResult, EntityId, Money, TaxRate};

use crate::document::DocumentCore;
use crate::line_item::{LineItem, LineItemId, LineItemPatch};
use crate::number::DocumentNumber;

/// Quote identifier.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct QuoteId(pub EntityId);

impl QuoteId {
    pub fn new(id: EntityId) -> Self {
        Self(id)
    }
}

impl core::fmt::Display for QuoteId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        core::fmt::Display::fmt(&self.0, f)
    }
}

/// Days a new quote remains open before it counts as expired.
pub const DEFAULT_EXPIRY_DAYS: u64 = 30;

/// Quote status lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QuoteStatus {
    Draft,
    Sent,
    Accepted,
    Declined,
    Expired,
}

impl core::fmt::Display for QuoteStatus {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let s = match self {
            QuoteStatus::Draft => "draft",
            QuoteStatus::Sent => "sent",
            QuoteStatus::Accepted => "accepted",
            QuoteStatus::Declined => "declined",
            QuoteStatus::Expired => "expired",
        };
        f.write_str(s)
    }
}

/// Actions that move a quote through its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum QuoteAction {
    Send,
    Accept,
    Decline,
}

impl core::fmt::Display for QuoteAction {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let s = match self {
            QuoteAction::Send => "send",
            QuoteAction::Accept => "accept",
            QuoteAction::Decline => "decline",
        };
        f.write_str(s)
    }
}

/// The legal-transition table, in one place.
///
/// Time-based expiry is not a transition: it is derived at read time by
/// [`Quote::effective_status`]. A stored `expired` status (written by an
/// earlier version of the data) still accepts a late client response.
fn transition(from: QuoteStatus, action: QuoteAction) -> DomainResult<QuoteStatus> {
    use QuoteAction::*;
    use QuoteStatus::*;

    match (from, action) {
        (Draft, Send) => Ok(Sent),
        (Sent | Expired, Accept) => Ok(Accepted),
        (Sent | Expired, Decline) => Ok(Declined),
        (from, action) => Err(DomainError::invalid_transition(format!(
            "cannot {action} a {from} quote"
        ))),
    }
}

/// A priced proposal that a client accepts or declines.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Quote {
    id: QuoteId,
    document_number: DocumentNumber,
    status: QuoteStatus,
    issue_date: NaiveDate,
    expiry_date: NaiveDate,
    #[serde(flatten)]
    core: DocumentCore,
}

impl Quote {
    /// New draft quote issued today, open for the default expiry window.
    pub fn new(id: QuoteId, document_number: DocumentNumber, today: NaiveDate) -> Self {
        Self {
            id,
            document_number,
            status: QuoteStatus::Draft,
            issue_date: today,
            expiry_date: today
                .checked_add_days(Days::new(DEFAULT_EXPIRY_DAYS))
                .unwrap_or(today),
            core: DocumentCore::empty(),
        }
    }

    pub fn id(&self) -> QuoteId {
        self.id
    }

    pub fn document_number(&self) -> &DocumentNumber {
        &self.document_number
    }

    pub fn status(&self) -> QuoteStatus {
        self.status
    }

    pub fn issue_date(&self) -> NaiveDate {
        self.issue_date
    }

    pub fn expiry_date(&self) -> NaiveDate {
        self.expiry_date
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

    pub fn with_expiry_date(&self, expiry_date: NaiveDate) -> Self {
        Self {
            expiry_date,
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
    pub fn add_product(&self, id: LineItemId, product: &Product, rate: TaxRate) -> DomainResult<Self> {
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

    /// A quote is persistable only with a client and at least one item.
    pub fn validate_for_save(&self) -> DomainResult<()> {
        self.core.validate_for_save()
    }

    /// Send to the client. Legal only from `draft`.
    pub fn mark_sent(&self) -> DomainResult<Self> {
        Ok(Self {
            status: transition(self.status, QuoteAction::Send)?,
            ..self.clone()
        })
    }

    /// Record the client's acceptance. Legal from `sent`, including after
    /// the expiry date has passed.
    pub fn mark_accepted(&self) -> DomainResult<Self> {
        Ok(Self {
            status: transition(self.status, QuoteAction::Accept)?,
            ..self.clone()
        })
    }

    /// Record the client's refusal. Legal from `sent`, including after the
    /// expiry date has passed.
    pub fn mark_declined(&self) -> DomainResult<Self> {
        Ok(Self {
            status: transition(self.status, QuoteAction::Decline)?,
            ..self.clone()
        })
    }

    /// Status as it should be displayed: a sent quote whose expiry date has
    /// passed reads as expired, while the stored status stays `sent` until
    /// an explicit action changes it.
    pub fn effective_status(&self, today: NaiveDate) -> QuoteStatus {
        if self.status == QuoteStatus::Sent && today > self.expiry_date {
            QuoteStatus::Expired
        } else {
            self.status
        }
    }

    /// Content copy for invoice derivation, with fresh line identities.
    pub(crate) fn derived_core(&self) -> DocumentCore {
        self.core.with_fresh_item_ids()
    }
}
