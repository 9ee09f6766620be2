//! Client and job-site records.
//!
//! The registries here are external collaborators of the document engine:
//! the engine consumes them through the read contracts and never owns their
//! persistence.

pub mod client;
pub mod job_site;

pub use client::{Client, ClientId, ClientRegistry, InMemoryClientRegistry};
pub use job_site::{InMemoryJobSiteRegistry, JobSite, JobSiteId, JobSiteRegistry};
