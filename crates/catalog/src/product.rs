use serde::{Deserialize, Serialize};

use quoteflow_core::{DomainError, DomainResult, EntityId, Money};

/// Product identifier.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProductId(pub EntityId);

impl ProductId {
    pub fn new(id: EntityId) -> Self {
        Self(id)
    }
}

impl core::fmt::Display for ProductId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        core::fmt::Display::fmt(&self.0, f)
    }
}

/// A product or service offered by the business.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    pub description: String,
    pub unit_price: Money,
    pub tax_applicable: bool,
    pub category: Option<String>,
}

impl Product {
    pub fn new(
        id: ProductId,
        name: impl Into<String>,
        description: impl Into<String>,
        unit_price: Money,
        tax_applicable: bool,
        category: Option<String>,
    ) -> DomainResult<Self> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(DomainError::validation("product name must not be empty"));
        }
        if unit_price.is_negative() {
            return Err(DomainError::validation(
                "product unit price must not be negative",
            ));
        }
        Ok(Self {
            id,
            name,
            description: description.into(),
            unit_price,
            tax_applicable,
            category,
        })
    }
}

/// Read contract of the external product catalog.
pub trait ProductCatalog {
    fn list_products(&self) -> Vec<Product>;
}

/// In-memory catalog, the shape of the mock data layer the app ships with.
#[derive(Debug, Clone, Default)]
pub struct InMemoryCatalog {
    products: Vec<Product>,
}

impl InMemoryCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_products(products: Vec<Product>) -> Self {
        Self { products }
    }

    pub fn add(&mut self, product: Product) {
        self.products.push(product);
    }
}

impl ProductCatalog for InMemoryCatalog {
    fn list_products(&self) -> Vec<Product> {
        self.products.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_product_id() -> ProductId {
        ProductId::new(EntityId::new())
    }

    #[test]
    fn blank_name_is_rejected() {
        let err = Product::new(
            test_product_id(),
            " ",
            "Standard call-out fee for service visits",
            Money::from_dollars(85),
            true,
            Some("Service".to_string()),
        )
        .unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));
    }

    #[test]
    fn negative_price_is_rejected() {
        let err = Product::new(
            test_product_id(),
            "Call-Out Fee",
            "",
            Money::from_cents(-1),
            true,
            None,
        )
        .unwrap_err();
        match err {
            DomainError::Validation(msg) => assert!(msg.contains("price")),
            _ => panic!("Expected Validation error"),
        }
    }

    #[test]
    fn catalog_lists_everything_it_holds() {
        let mut catalog = InMemoryCatalog::new();
        catalog.add(
            Product::new(
                test_product_id(),
                "Copper Pipe 15mm",
                "Type B copper pipe, 15mm diameter, per metre",
                Money::from_cents(1_250),
                true,
                Some("Materials".to_string()),
            )
            .unwrap(),
        );
        assert_eq!(catalog.list_products().len(), 1);
    }
}
