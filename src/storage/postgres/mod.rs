//! PostgreSQL storage implementations
//!
//! This module provides PostgreSQL-based implementations of all storage traits.
//! PostgreSQL is suitable for production deployments with high availability requirements.

mod oauth_clients;
mod scopes;

use crate::errors::StorageError;
use crate::oauth::types::{OAuthClient, OAuthScope};
use crate::storage::traits::*;
use async_trait::async_trait;
use sqlx::postgres::PgPool;
use std::sync::Arc;

pub use oauth_clients::PostgresOAuthClientStore;
pub use scopes::PostgresScopeRegistry;

/// Comprehensive PostgreSQL storage implementation
pub struct PostgresOAuthStorage {
    pool: PgPool,
    client_store: Arc<PostgresOAuthClientStore>,
    scope_registry: Arc<PostgresScopeRegistry>,
}

impl PostgresOAuthStorage {
    /// Create a new PostgreSQL storage instance
    pub fn new(pool: PgPool) -> Self {
        let client_store = Arc::new(PostgresOAuthClientStore::new(pool.clone()));
        let scope_registry = Arc::new(PostgresScopeRegistry::new(pool.clone()));

        Self {
            pool,
            client_store,
            scope_registry,
        }
    }

    /// Run database migrations
    pub async fn migrate(&self) -> Result<()> {
        sqlx::migrate!("./migrations/postgres")
            .run(&self.pool)
            .await
            .map_err(|e| StorageError::DatabaseError(format!("Migration failed: {}", e)))?;
        Ok(())
    }
}

#[async_trait]
impl OAuthClientStore for PostgresOAuthStorage {
    async fn store_client(&self, client: &OAuthClient) -> Result<()> {
        self.client_store.store_client(client).await
    }

    async fn get_client(&self, client_id: &str) -> Result<Option<OAuthClient>> {
        self.client_store.get_client(client_id).await
    }
}

#[async_trait]
impl ScopeRegistry for PostgresOAuthStorage {
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
