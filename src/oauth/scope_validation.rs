//! Scope existence checks backed by the scope registry.

use crate::errors::StorageError;
use crate::storage::traits::ScopeRegistry;
use async_trait::async_trait;
use std::sync::Arc;

/// Reports whether a scope name is registered.
///
/// Implementations must not cache answers across calls: a scope removed
/// from the registry has to be reported as unknown on the next lookup.
#[async_trait]
pub trait ScopeValidator: Send + Sync {
    async fn exists(&self, scope: &str) -> Result<bool, StorageError>;
}

/// Scope validator that asks the scope registry on every call
pub struct RegistryScopeValidator {
    registry: Arc<dyn ScopeRegistry>,
}

impl RegistryScopeValidator {
    pub fn new(registry: Arc<dyn ScopeRegistry>) -> Self {
        Self { registry }
    }
}

#[async_trait]
impl ScopeValidator for RegistryScopeValidator {
    async fn exists(&self, scope: &str) -> Result<bool, StorageError> {
        let found = self.registry.lookup_scope(scope).await?.is_some();
        tracing::debug!(scope, found, "scope lookup");
        Ok(found)
    }
}
