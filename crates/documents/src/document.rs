use serde::{Deserialize, Serialize};

use quoteflow_clients::{ClientId, JobSite, JobSiteId};
use quoteflow_core::{DomainError, DomainResult, Money, TaxRate};

use crate::line_item::{self, LineItem, LineItemId, LineItemPatch};

/// Fields shared by quotes and invoices.
///
/// The two document types have the same shape and differ only in status
/// vocabulary and date semantics, so the shared half lives here and is
/// serde-flattened into each type to keep the persisted JSON flat.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct DocumentCore {
    client_id: Option<ClientId>,
    job_site_id: Option<JobSiteId>,
    items: Vec<LineItem>,
    subtotal: Money,
    tax: Money,
    total: Money,
    notes: Option<String>,
}

impl DocumentCore {
    pub(crate) fn empty() -> Self {
        Self {
            client_id: None,
            job_site_id: None,
            items: Vec::new(),
            subtotal: Money::ZERO,
            tax: Money::ZERO,
            total: Money::ZERO,
            notes: None,
        }
    }

    pub(crate) fn client_id(&self) -> Option<ClientId> {
        self.client_id
    }

    pub(crate) fn job_site_id(&self) -> Option<JobSiteId> {
        self.job_site_id
    }

    pub(crate) fn items(&self) -> &[LineItem] {
        &self.items
    }

    pub(crate) fn subtotal(&self) -> Money {
        self.subtotal
    }

    pub(crate) fn tax(&self) -> Money {
        self.tax
    }

    pub(crate) fn total(&self) -> Money {
        self.total
    }

    pub(crate) fn notes(&self) -> Option<&str> {
        self.notes.as_deref()
    }

    /// Selecting a client clears any job site chosen for the previous one.
    pub(crate) fn with_client(&self, client_id: ClientId) -> Self {
        let mut next = self.clone();
        if next.client_id != Some(client_id) {
            next.job_site_id = None;
        }
        next.client_id = Some(client_id);
        next
    }

    /// A job site may only be attached when it belongs to the selected client.
    pub(crate) fn with_job_site(&self, site: &JobSite) -> DomainResult<Self> {
        let client_id = self
            .client_id
            .ok_or_else(|| DomainError::validation("select a client before a job site"))?;
        if !site.belongs_to(client_id) {
            return Err(DomainError::invariant(
                "job site does not belong to the selected client",
            ));
        }
        let mut next = self.clone();
        next.job_site_id = Some(site.id);
        Ok(next)
    }

    pub(crate) fn without_job_site(&self) -> Self {
        let mut next = self.clone();
        next.job_site_id = None;
        next
    }

    /// Empty notes are stored as absent.
    pub(crate) fn with_notes(&self, notes: impl Into<String>) -> Self {
        let notes = notes.into();
        let mut next = self.clone();
        next.notes = if notes.trim().is_empty() {
            None
        } else {
            Some(notes)
        };
        next
    }

    pub(crate) fn with_item_added(
        &self,
        id: LineItemId,
        description: &str,
        quantity: i64,
        unit_price: Money,
        tax_applicable: bool,
        rate: TaxRate,
    ) -> DomainResult<Self> {
        let items = line_item::add_item(
            &self.items,
            id,
            description,
            quantity,
            unit_price,
            tax_applicable,
        )?;
        Ok(self.with_items(items, rate))
    }

    pub(crate) fn with_item_updated(
        &self,
        id: LineItemId,
        patch: &LineItemPatch,
        rate: TaxRate,
    ) -> DomainResult<Self> {
        let items = line_item::update_item(&self.items, id, patch)?;
        Ok(self.with_items(items, rate))
    }

    pub(crate) fn with_item_removed(&self, id: LineItemId, rate: TaxRate) -> Self {
        let items = line_item::remove_item(&self.items, id);
        self.with_items(items, rate)
    }

    pub(crate) fn with_line(&self, item: LineItem, rate: TaxRate) -> Self {
        let mut items = self.items.clone();
        items.push(item);
        self.with_items(items, rate)
    }

    /// Replace the item list and bring the aggregates back in step with it.
    /// Every item mutation funnels through here, so totals can never go
    /// stale against the list.
    pub(crate) fn with_items(&self, items: Vec<LineItem>, rate: TaxRate) -> Self {
        let totals = line_item::compute_aggregates(&items, rate);
        Self {
            client_id: self.client_id,
            job_site_id: self.job_site_id,
            items,
            subtotal: totals.subtotal,
            tax: totals.tax,
            total: totals.total,
            notes: self.notes.clone(),
        }
    }

    /// A document is persistable only with a client and at least one item.
    pub(crate) fn validate_for_save(&self) -> DomainResult<()> {
        if self.client_id.is_none() {
            return Err(DomainError::validation("select a client before saving"));
        }
        if self.items.is_empty() {
            return Err(DomainError::validation(
                "add at least one item before saving",
            ));
        }
        Ok(())
    }

    /// Copy for derivation: same content and totals, freshly generated line
    /// identities.
    pub(crate) fn with_fresh_item_ids(&self) -> Self {
        let items = self
            .items
            .iter()
            .map(|i| i.with_id(LineItemId::generate()))
            .collect();
        Self {
            items,
            ..self.clone()
        }
    }
}
