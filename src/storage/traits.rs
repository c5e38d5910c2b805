//! Storage trait definitions for provisioned clients and registered scopes.
//!
//! Defines async storage interfaces that can be implemented by various
//! backend providers.

use crate::errors::StorageError;
use crate::oauth::types::*;
use async_trait::async_trait;

pub type Result<T> = std::result::Result<T, StorageError>;

/// Trait for storing and retrieving OAuth clients
#[async_trait]
pub trait OAuthClientStore: Send + Sync {
    /// Store a new OAuth client.
    ///
    /// Fails with [`StorageError::DuplicateKey`] when the client ID is already taken.
    async fn store_client(&self, client: &OAuthClient) -> Result<()>;

    /// Retrieve a client by ID
    async fn get_client(&self, client_id: &str) -> Result<Option<OAuthClient>>;
}

/// Trait for the registry of known scopes
#[async_trait]
pub trait ScopeRegistry: Send + Sync {
    /// Look up a scope by name
    async fn lookup_scope(&self, scope: &str) -> Result<Option<OAuthScope>>;

    /// Register a new scope
    async fn store_scope(&self, scope: &OAuthScope) -> Result<()>;

    /// List all registered scopes, ordered by name
    async fn list_scopes(&self) -> Result<Vec<OAuthScope>>;
}

/// Combined storage trait used by the provisioning CLI
pub trait ProvisioningStorage: OAuthClientStore + ScopeRegistry {}

// Blanket implementation for any type that implements both traits
impl<T> ProvisioningStorage for T where T: OAuthClientStore + ScopeRegistry {}
