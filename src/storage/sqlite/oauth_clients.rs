//! SQLite implementation for OAuth client storage

use crate::errors::StorageError;
use crate::oauth::types::*;
use crate::storage::map_insert_error;
use crate::storage::traits::{OAuthClientStore, Result};
use async_trait::async_trait;
use chrono::Utc;
use serde::de::DeserializeOwned;
use sqlx::Row;
use sqlx::sqlite::{SqlitePool, SqliteRow};

/// SQLite implementation of OAuth client storage
pub struct SqliteOAuthClientStore {
    pool: SqlitePool,
}

impl SqliteOAuthClientStore {
    /// Create a new SQLite OAuth client store
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Convert ClientType enum to string representation
    fn client_type_to_string(client_type: &ClientType) -> &'static str {
        match client_type {
            ClientType::Public => "public",
            ClientType::Confidential => "confidential",
        }
    }

    /// Convert string to ClientType enum
    fn string_to_client_type(s: &str) -> Result<ClientType> {
        match s {
            "public" => Ok(ClientType::Public),
            "confidential" => Ok(ClientType::Confidential),
            _ => Err(StorageError::InvalidData(format!(
                "Unknown client type: {}",
                s
            ))),
        }
    }

    /// Read a JSON encoded text column
    fn json_column<T: DeserializeOwned>(row: &SqliteRow, column: &str) -> Result<T> {
        let json: String = row.try_get(column).map_err(|e| {
            StorageError::DatabaseError(format!("Failed to get {}: {}", column, e))
        })?;
        serde_json::from_str(&json).map_err(|e| StorageError::SerializationFailed(e.to_string()))
    }

    /// Convert SQLite row to OAuthClient
    fn row_to_oauth_client(row: &SqliteRow) -> Result<OAuthClient> {
        let client_id: String = row
            .try_get("client_id")
            .map_err(|e| StorageError::DatabaseError(format!("Failed to get client_id: {}", e)))?;
        let client_secret: Option<String> = row.try_get("client_secret").map_err(|e| {
            StorageError::DatabaseError(format!("Failed to get client_secret: {}", e))
        })?;

        let redirect_uris = Self::json_column(row, "redirect_uris")?;
        let grant_types = Self::json_column(row, "grant_types")?;
        let scopes = Self::json_column(row, "scopes")?;

        let client_type_str: String = row.try_get("client_type").map_err(|e| {
            StorageError::DatabaseError(format!("Failed to get client_type: {}", e))
        })?;
        let client_type = Self::string_to_client_type(&client_type_str)?;

        let created_at_str: String = row
            .try_get("created_at")
            .map_err(|e| StorageError::DatabaseError(format!("Failed to get created_at: {}", e)))?;
        let created_at = chrono::DateTime::parse_from_rfc3339(&created_at_str)
            .map_err(|e| StorageError::InvalidData(format!("Invalid created_at timestamp: {}", e)))?
            .with_timezone(&Utc);

        Ok(OAuthClient {
            client_id,
            client_secret,
            redirect_uris,
            grant_types,
            scopes,
            client_type,
            created_at,
        })
    }
}

#[async_trait]
impl OAuthClientStore for SqliteOAuthClientStore {
    async fn store_client(&self, client: &OAuthClient) -> Result<()> {
        let redirect_uris_json = serde_json::to_string(&client.redirect_uris)
            .map_err(|e| StorageError::SerializationFailed(e.to_string()))?;
        let grant_types_json = serde_json::to_string(&client.grant_types)
            .map_err(|e| StorageError::SerializationFailed(e.to_string()))?;
        let scopes_json = serde_json::to_string(&client.scopes)
            .map_err(|e| StorageError::SerializationFailed(e.to_string()))?;
        let client_type_str = Self::client_type_to_string(&client.client_type);
        let created_at_str = client.created_at.to_rfc3339();

        // Plain INSERT so the primary key rejects concurrent duplicates
        sqlx::query(
            r#"
            INSERT INTO oauth_clients (
                client_id, client_secret, redirect_uris, grant_types, scopes,
                client_type, created_at
            ) VALUES (?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&client.client_id)
        .bind(&client.client_secret)
        .bind(&redirect_uris_json)
        .bind(&grant_types_json)
        .bind(&scopes_json)
        .bind(client_type_str)
        .bind(&created_at_str)
        .execute(&self.pool)
        .await
        .map_err(|e| map_insert_error(e, &client.client_id))?;

        Ok(())
    }

    async fn get_client(&self, client_id: &str) -> Result<Option<OAuthClient>> {
        let row = sqlx::query("SELECT * FROM oauth_clients WHERE client_id = ?")
            .bind(client_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| StorageError::DatabaseError(e.to_string()))?;

        match row {
            Some(row) => {
                let client = Self::row_to_oauth_client(&row)?;
                Ok(Some(client))
            }
            None => Ok(None),
        }
    }
}
