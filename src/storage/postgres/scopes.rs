//! PostgreSQL implementation for the scope registry

use crate::errors::StorageError;
use crate::oauth::types::OAuthScope;
use crate::storage::map_insert_error;
use crate::storage::traits::{Result, ScopeRegistry};
use async_trait::async_trait;
use sqlx::Row;
use sqlx::postgres::{PgPool, PgRow};

/// PostgreSQL implementation of the scope registry
pub struct PostgresScopeRegistry {
    pool: PgPool,
}

impl PostgresScopeRegistry {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    fn row_to_scope(row: &PgRow) -> Result<OAuthScope> {
        let scope: String = row
            .try_get("scope")
            .map_err(|e| StorageError::DatabaseError(format!("Failed to get scope: {}", e)))?;
        let description: Option<String> = row.try_get("description").map_err(|e| {
            StorageError::DatabaseError(format!("Failed to get description: {}", e))
        })?;
        Ok(OAuthScope { scope, description })
    }
}

#[async_trait]
impl ScopeRegistry for PostgresScopeRegistry {
    async fn lookup_scope(&self, scope: &str) -> Result<Option<OAuthScope>> {
        let row = sqlx::query("SELECT scope, description FROM oauth_scopes WHERE scope = $1")
            .bind(scope)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| StorageError::DatabaseError(e.to_string()))?;

        row.as_ref().map(Self::row_to_scope).transpose()
    }

    async fn store_scope(&self, scope: &OAuthScope) -> Result<()> {
        sqlx::query("INSERT INTO oauth_scopes (scope, description) VALUES ($1, $2)")
            .bind(&scope.scope)
            .bind(&scope.description)
            .execute(&self.pool)
            .await
            .map_err(|e| map_insert_error(e, &scope.scope))?;
        Ok(())
    }

    async fn list_scopes(&self) -> Result<Vec<OAuthScope>> {
        let rows = sqlx::query("SELECT scope, description FROM oauth_scopes ORDER BY scope")
            .fetch_all(&self.pool)
            .await
            .map_err(|e| StorageError::DatabaseError(e.to_string()))?;

        rows.iter().map(Self::row_to_scope).collect()
    }
}
