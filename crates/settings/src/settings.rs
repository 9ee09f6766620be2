use serde::{Deserialize, Serialize};

use quoteflow_core::{DomainError, DomainResult, TaxRate};

/// Settings for the business, persisted as a single JSON object.
///
/// Notification preferences and logo upload live outside this record; they
/// belong to surfaces this engine does not own.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BusinessSettings {
    pub business_name: String,
    pub abn: String,
    pub address: String,
    pub phone: String,
    pub email: String,
    pub website: String,
    pub bank_account_name: String,
    pub bsb: String,
    pub account_number: String,
    /// GST percentage applied to taxable lines (`10.0` == 10%).
    pub gst_rate: f64,
}

impl Default for BusinessSettings {
    fn default() -> Self {
        Self {
            business_name: "Your Business Name".to_string(),
            abn: String::new(),
            address: String::new(),
            phone: String::new(),
            email: String::new(),
            website: String::new(),
            bank_account_name: String::new(),
            bsb: String::new(),
            account_number: String::new(),
            gst_rate: 10.0,
        }
    }
}

impl BusinessSettings {
    /// Settings are saveable with a business name and a usable GST rate.
    pub fn validate(&self) -> DomainResult<()> {
        if self.business_name.trim().is_empty() {
            return Err(DomainError::validation("business name must not be empty"));
        }
        self.tax_rate()?;
        Ok(())
    }

    /// The engine's tax rate for this business.
    pub fn tax_rate(&self) -> DomainResult<TaxRate> {
        TaxRate::from_percent(self.gst_rate)
    }
}
