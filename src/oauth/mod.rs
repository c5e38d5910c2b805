//! OAuth 2.0 client provisioning with registry-backed scope validation.

pub mod clients;
pub mod scope_validation;
pub mod types;

// Re-export frequently used items from each module
pub use crate::storage::{
    inmemory::MemoryOAuthStorage,
    traits::{OAuthClientStore, ProvisioningStorage, ScopeRegistry},
};
pub use clients::ClientProvisioner;
pub use scope_validation::{RegistryScopeValidator, ScopeValidator};
pub use types::{
    ClientType, CreateClientRequest, OAuthClient, OAuthScope, generate_client_secret,
    parse_delimited,
};
