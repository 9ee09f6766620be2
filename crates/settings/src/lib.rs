//! Business settings.
//!
//! One record per business: identity, contact, banking, and the GST
//! percentage the document engine turns into its tax rate.

pub mod settings;

pub use settings::BusinessSettings;
