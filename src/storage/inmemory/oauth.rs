//! In-memory OAuth storage implementation
//!
//! This module provides in-memory implementations for client and scope storage.

use crate::errors::StorageError;
use crate::oauth::types::*;
use crate::storage::traits::*;
use async_trait::async_trait;
use std::collections::{BTreeMap, HashMap};
use std::sync::Mutex;

/// In-memory implementation for client and scope storage
#[derive(Default)]
pub struct MemoryOAuthStorage {
    clients: Mutex<HashMap<String, OAuthClient>>,
    scopes: Mutex<BTreeMap<String, OAuthScope>>,
}

impl MemoryOAuthStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create storage with the given scopes already registered
    pub fn with_scopes<I, S>(scopes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let scopes = scopes
            .into_iter()
            .map(|scope| {
                let scope = OAuthScope::new(scope);
                (scope.scope.clone(), scope)
            })
            .collect();
        Self {
            clients: Mutex::default(),
            scopes: Mutex::new(scopes),
        }
    }
}

#[async_trait]
impl OAuthClientStore for MemoryOAuthStorage {
    async fn store_client(&self, client: &OAuthClient) -> Result<()> {
        let mut clients = self
            .clients
            .lock()
            .map_err(|e| StorageError::SerializationFailed(format!("Lock error: {}", e)))?;
        // Check and insert under the same lock so racing callers cannot both win
        if clients.contains_key(&client.client_id) {
            return Err(StorageError::DuplicateKey(client.client_id.clone()));
        }
        clients.insert(client.client_id.clone(), client.clone());
        Ok(())
    }

    async fn get_client(&self, client_id: &str) -> Result<Option<OAuthClient>> {
        let clients = self
            .clients
            .lock()
            .map_err(|e| StorageError::SerializationFailed(format!("Lock error: {}", e)))?;
        Ok(clients.get(client_id).cloned())
    }
}

#[async_trait]
impl ScopeRegistry for MemoryOAuthStorage {
    async fn lookup_scope(&self, scope: &str) -> Result<Option<OAuthScope>> {
        let scopes = self
            .scopes
            .lock()
            .map_err(|e| StorageError::SerializationFailed(format!("Lock error: {}", e)))?;
        Ok(scopes.get(scope).cloned())
    }

    async fn store_scope(&self, scope: &OAuthScope) -> Result<()> {
        let mut scopes = self
            .scopes
            .lock()
            .map_err(|e| StorageError::SerializationFailed(format!("Lock error: {}", e)))?;
        if scopes.contains_key(&scope.scope) {
            return Err(StorageError::DuplicateKey(scope.scope.clone()));
        }
        scopes.insert(scope.scope.clone(), scope.clone());
        Ok(())
    }

    async fn list_scopes(&self) -> Result<Vec<OAuthScope>> {
        let scopes = self
            .scopes
            .lock()
            .map_err(|e| StorageError::SerializationFailed(format!("Lock error: {}", e)))?;
        Ok(scopes.values().cloned().collect())
    }
}
