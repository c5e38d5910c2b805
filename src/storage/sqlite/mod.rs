//! SQLite storage implementations
//!
//! This module provides SQLite-based implementations of all storage traits.
//! SQLite is suitable for single-instance deployments and development.

mod oauth_clients;
mod scopes;

use crate::errors::StorageError;
use crate::oauth::types::{OAuthClient, OAuthScope};
use crate::storage::traits::*;
use async_trait::async_trait;
use sqlx::sqlite::SqlitePool;
use std::sync::Arc;

pub use oauth_clients::SqliteOAuthClientStore;
pub use scopes::SqliteScopeRegistry;

/// Comprehensive SQLite storage implementation
pub struct SqliteOAuthStorage {
    pool: SqlitePool,
    client_store: Arc<SqliteOAuthClientStore>,
    scope_registry: Arc<SqliteScopeRegistry>,
}

impl SqliteOAuthStorage {
    /// Create a new SQLite storage instance
    pub fn new(pool: SqlitePool) -> Self {
        let client_store = Arc::new(SqliteOAuthClientStore::new(pool.clone()));
        let scope_registry = Arc::new(SqliteScopeRegistry::new(pool.clone()));

        Self {
            pool,
            client_store,
            scope_registry,
        }
    }

    /// Run database migrations
    pub async fn migrate(&self) -> Result<()> {
        sqlx::migrate!("./migrations/sqlite")
            .run(&self.pool)
            .await
            .map_err(|e| StorageError::DatabaseError(format!("Migration failed: {}", e)))?;
        Ok(())
    }
}

#[async_trait]
impl OAuthClientStore for SqliteOAuthStorage {
    async fn store_client(&self, client: &OAuthClient) -> Result<()> {
        self.client_store.store_client(client).await
    }

    async fn get_client(&self, client_id: &str) -> Result<Option<OAuthClient>> {
        self.client_store.get_client(client_id).await
    }
}

#[async_trait]
impl ScopeRegistry for SqliteOAuthStorage {
    async fn lookup_scope(&self, scope: &str) -> Result<Option<OAuthScope>> {
        self.scope_registry.lookup_scope(scope).await
    }

    async fn store_scope(&self, scope: &OAuthScope) -> Result<()> {
        self.scope_registry.store_scope(scope).await
    }

    async fn list_scopes(&self) -> Result<Vec<OAuthScope>> {
        self.scope_registry.list_scopes().await
    }
}
