use serde::{Deserialize, Serialize};

use quoteflow_catalog::Product;
use quoteflow_core::{DomainError, DomainResult, EntityId, Money, TaxRate};

/// Line-item identifier.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LineItemId(pub EntityId);

impl LineItemId {
    pub fn new(id: EntityId) -> Self {
        Self(id)
    }

    /// Freshly generated identity.
    pub fn generate() -> Self {
        Self(EntityId::new())
    }
}

impl core::fmt::Display for LineItemId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        core::fmt::Display::fmt(&self.0, f)
    }
}

const DEFAULT_QUANTITY: u32 = 1;

/// Coerce a raw quantity to a positive integer.
///
/// Out-of-range input (zero, negative, absurdly large) falls back to the
/// default of 1 instead of being rejected. This soft validation keeps an
/// editing surface renderable mid-keystroke; a stricter policy can replace
/// this function without touching aggregation.
pub fn normalize_quantity(quantity: i64) -> u32 {
    if (1..=i64::from(u32::MAX)).contains(&quantity) {
        quantity as u32
    } else {
        DEFAULT_QUANTITY
    }
}

/// Coerce a raw unit price: negative input falls back to zero.
pub fn normalize_unit_price(unit_price: Money) -> Money {
    if unit_price.is_negative() {
        Money::ZERO
    } else {
        unit_price
    }
}

/// One line of a quote or invoice.
///
/// Fields are private so `line_total` can only change together with the
/// quantity and unit price it is derived from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LineItem {
    id: LineItemId,
    description: String,
    quantity: u32,
    unit_price: Money,
    tax_applicable: bool,
    line_total: Money,
}

impl LineItem {
    pub fn new(
        id: LineItemId,
        description: impl Into<String>,
        quantity: i64,
        unit_price: Money,
        tax_applicable: bool,
    ) -> DomainResult<Self> {
        let description = description.into();
        if description.trim().is_empty() {
            return Err(DomainError::validation(
                "line item description must not be empty",
            ));
        }
        let quantity = normalize_quantity(quantity);
        let unit_price = normalize_unit_price(unit_price);
        Ok(Self {
            id,
            description,
            quantity,
            unit_price,
            tax_applicable,
            line_total: line_total(quantity, unit_price)?,
        })
    }

    /// Pre-populate a line from a catalog product: quantity 1 at the listed
    /// price, description taken from the product name.
    pub fn from_product(id: LineItemId, product: &Product) -> DomainResult<Self> {
        Self::new(
            id,
            product.name.clone(),
            1,
            product.unit_price,
            product.tax_applicable,
        )
    }

    pub fn id(&self) -> LineItemId {
        self.id
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn quantity(&self) -> u32 {
        self.quantity
    }

    pub fn unit_price(&self) -> Money {
        self.unit_price
    }

    pub fn tax_applicable(&self) -> bool {
        self.tax_applicable
    }

    pub fn line_total(&self) -> Money {
        self.line_total
    }

    /// Copy with a freshly assigned identity. Used when deriving an invoice
    /// from a quote, so the two documents never share line identities.
    pub(crate) fn with_id(&self, id: LineItemId) -> LineItem {
        LineItem {
            id,
            ..self.clone()
        }
    }

    fn patched(&self, patch: &LineItemPatch) -> DomainResult<LineItem> {
        let description = match &patch.description {
            Some(d) => {
                if d.trim().is_empty() {
                    return Err(DomainError::validation(
                        "line item description must not be empty",
                    ));
                }
                d.clone()
            }
            None => self.description.clone(),
        };
        let quantity = patch.quantity.map_or(self.quantity, normalize_quantity);
        let unit_price = patch.unit_price.map_or(self.unit_price, normalize_unit_price);
        let tax_applicable = patch.tax_applicable.unwrap_or(self.tax_applicable);
        Ok(LineItem {
            id: self.id,
            description,
            quantity,
            unit_price,
            tax_applicable,
            // Recomputed from the resulting quantity and price, not from the
            // patch alone: patching only the quantity must still use the
            // item's current unit price.
            line_total: line_total(quantity, unit_price)?,
        })
    }
}

fn line_total(quantity: u32, unit_price: Money) -> DomainResult<Money> {
    unit_price
        .checked_mul(quantity)
        .ok_or_else(|| DomainError::invariant("line total overflow"))
}

/// Partial update of a line item. `None` fields keep their current value.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LineItemPatch {
    pub description: Option<String>,
    pub quantity: Option<i64>,
    pub unit_price: Option<Money>,
    pub tax_applicable: Option<bool>,
}

/// Derived totals of a document.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Totals {
    pub subtotal: Money,
    pub tax: Money,
    pub total: Money,
}

impl Totals {
    pub const ZERO: Totals = Totals {
        subtotal: Money::ZERO,
        tax: Money::ZERO,
        total: Money::ZERO,
    };
}

/// Append a new line. The input slice is left untouched.
pub fn add_item(
    items: &[LineItem],
    id: LineItemId,
    description: &str,
    quantity: i64,
    unit_price: Money,
    tax_applicable: bool,
) -> DomainResult<Vec<LineItem>> {
    let item = LineItem::new(id, description, quantity, unit_price, tax_applicable)?;
    let mut next = items.to_vec();
    next.push(item);
    Ok(next)
}

/// Apply a partial update to the line matching `id`, preserving order.
pub fn update_item(
    items: &[LineItem],
    id: LineItemId,
    patch: &LineItemPatch,
) -> DomainResult<Vec<LineItem>> {
    if !items.iter().any(|i| i.id == id) {
        return Err(DomainError::not_found());
    }
    items
        .iter()
        .map(|i| if i.id == id { i.patched(patch) } else { Ok(i.clone()) })
        .collect()
}

/// Remove the line matching `id`.
///
/// Removing an id that is not present is a no-op, so duplicate delete events
/// from the UI are harmless.
pub fn remove_item(items: &[LineItem], id: LineItemId) -> Vec<LineItem> {
    items.iter().filter(|i| i.id != id).cloned().collect()
}

/// Compute the document aggregates for an item list.
///
/// The tax rate is always supplied by the caller (from business settings);
/// it is never hard-coded here.
pub fn compute_aggregates(items: &[LineItem], rate: TaxRate) -> Totals {
    let subtotal = Money::sum(items.iter().map(|i| i.line_total));
    let tax = rate.applied_to_sum(
        items
            .iter()
            .filter(|i| i.tax_applicable)
            .map(|i| i.line_total),
    );
    Totals {
        subtotal,
        tax,
        total: Money::sum([subtotal, tax]),
    }
}
