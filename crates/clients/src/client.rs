use serde::{Deserialize, Serialize};

use quoteflow_core::{DomainError, DomainResult, EntityId, UserId};

/// Client identifier.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ClientId(pub EntityId);

impl ClientId {
    pub fn new(id: EntityId) -> Self {
        Self(id)
    }
}

impl core::fmt::Display for ClientId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        core::fmt::Display::fmt(&self.0, f)
    }
}

/// A client of the business.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Client {
    pub id: ClientId,
    /// Owner of the record, as supplied by the external identity provider.
    pub user_id: UserId,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub address: String,
}

impl Client {
    pub fn new(
        id: ClientId,
        user_id: UserId,
        name: impl Into<String>,
        email: impl Into<String>,
        phone: impl Into<String>,
        address: impl Into<String>,
    ) -> DomainResult<Self> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(DomainError::validation("client name must not be empty"));
        }
        Ok(Self {
            id,
            user_id,
            name,
            email: email.into(),
            phone: phone.into(),
            address: address.into(),
        })
    }
}

/// Read contract of the external client registry.
pub trait ClientRegistry {
    fn list_clients(&self, owner: UserId) -> Vec<Client>;
    fn get_client(&self, id: ClientId) -> DomainResult<Client>;
}

/// In-memory registry, the shape of the mock data layer the app ships with.
#[derive(Debug, Clone, Default)]
pub struct InMemoryClientRegistry {
    clients: Vec<Client>,
}

impl InMemoryClientRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_clients(clients: Vec<Client>) -> Self {
        Self { clients }
    }

    pub fn add(&mut self, client: Client) {
        self.clients.push(client);
    }
}

impl ClientRegistry for InMemoryClientRegistry {
    fn list_clients(&self, owner: UserId) -> Vec<Client> {
        self.clients
            .iter()
            .filter(|c| c.user_id == owner)
            .cloned()
            .collect()
    }

    fn get_client(&self, id: ClientId) -> DomainResult<Client> {
        self.clients
            .iter()
            .find(|c| c.id == id)
            .cloned()
            .ok_or_else(DomainError::not_found)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_client_id() -> ClientId {
        ClientId::new(EntityId::new())
    }

    fn test_client(owner: UserId, name: &str) -> Client {
        Client::new(
            test_client_id(),
            owner,
            name,
            "john.smith@email.com",
            "0412 345 678",
            "123 Main St, Sydney NSW 2000",
        )
        .unwrap()
    }

    #[test]
    fn blank_name_is_rejected() {
        let err = Client::new(test_client_id(), UserId::new(), "   ", "", "", "").unwrap_err();
        match err {
            DomainError::Validation(msg) => assert!(msg.contains("name")),
            _ => panic!("Expected Validation error"),
        }
    }

    #[test]
    fn listing_is_scoped_to_the_owner() {
        let owner = UserId::new();
        let other = UserId::new();
        let registry = InMemoryClientRegistry::with_clients(vec![
            test_client(owner, "Smith Residence"),
            test_client(other, "Johnson Property Group"),
        ]);

        let listed = registry.list_clients(owner);
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].name, "Smith Residence");
    }

    #[test]
    fn unknown_client_lookup_is_not_found() {
        let registry = InMemoryClientRegistry::new();
        assert_eq!(
            registry.get_client(test_client_id()).unwrap_err(),
            DomainError::NotFound
        );
    }
}
