use serde::{Deserialize, Serialize};

use quoteflow_core::{DomainError, DomainResult, EntityId};

use crate::client::ClientId;

/// Job-site identifier.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct JobSiteId(pub EntityId);

impl JobSiteId {
    pub fn new(id: EntityId) -> Self {
        Self(id)
    }
}

impl core::fmt::Display for JobSiteId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        core::fmt::Display::fmt(&self.0, f)
    }
}

/// A work location belonging to a client.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobSite {
    pub id: JobSiteId,
    pub site_name: String,
    pub address: String,
    pub access_details: Option<String>,
    pub client_id: ClientId,
}

impl JobSite {
    pub fn new(
        id: JobSiteId,
        client_id: ClientId,
        site_name: impl Into<String>,
        address: impl Into<String>,
        access_details: Option<String>,
    ) -> DomainResult<Self> {
        let site_name = site_name.into();
        if site_name.trim().is_empty() {
            return Err(DomainError::validation("site name must not be empty"));
        }
        Ok(Self {
            id,
            site_name,
            address: address.into(),
            access_details,
            client_id,
        })
    }

    /// Whether this site may be attached to a document for `client_id`.
    pub fn belongs_to(&self, client_id: ClientId) -> bool {
        self.client_id == client_id
    }
}

/// Read contract of the external job-site registry.
pub trait JobSiteRegistry {
    fn list_job_sites(&self, client_id: ClientId) -> Vec<JobSite>;
}

/// In-memory registry, the shape of the mock data layer the app ships with.
#[derive(Debug, Clone, Default)]
pub struct InMemoryJobSiteRegistry {
    sites: Vec<JobSite>,
}

impl InMemoryJobSiteRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_sites(sites: Vec<JobSite>) -> Self {
        Self { sites }
    }

    pub fn add(&mut self, site: JobSite) {
        self.sites.push(site);
    }
}

impl JobSiteRegistry for InMemoryJobSiteRegistry {
    fn list_job_sites(&self, client_id: ClientId) -> Vec<JobSite> {
        self.sites
            .iter()
            .filter(|s| s.client_id == client_id)
            .cloned()
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_client_id() -> ClientId {
        ClientId::new(EntityId::new())
    }

    fn test_site(client_id: ClientId, name: &str) -> JobSite {
        JobSite::new(
            JobSiteId::new(EntityId::new()),
            client_id,
            name,
            "456 Beach Rd, Byron Bay NSW 2481",
            Some("Lockbox code: 1234".to_string()),
        )
        .unwrap()
    }

    #[test]
    fn blank_site_name_is_rejected() {
        let err = JobSite::new(
            JobSiteId::new(EntityId::new()),
            test_client_id(),
            "",
            "somewhere",
            None,
        )
        .unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));
    }

    #[test]
    fn listing_is_scoped_to_the_client() {
        let client_a = test_client_id();
        let client_b = test_client_id();
        let registry = InMemoryJobSiteRegistry::with_sites(vec![
            test_site(client_a, "Main Residence"),
            test_site(client_a, "Holiday Home"),
            test_site(client_b, "Office Building"),
        ]);

        let sites = registry.list_job_sites(client_a);
        assert_eq!(sites.len(), 2);
        assert!(sites.iter().all(|s| s.belongs_to(client_a)));
    }
}
