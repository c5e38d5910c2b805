//! OAuth client provisioning.
//!
//! Validates a creation request, generates the client secret for
//! confidential clients, checks every requested scope against the scope
//! registry and stores the resulting client.

use crate::errors::{ProvisionError, StorageError};
use crate::oauth::scope_validation::ScopeValidator;
use crate::oauth::types::*;
use crate::storage::traits::OAuthClientStore;
use chrono::{SubsecRound, Utc};
use std::sync::Arc;

/// Client Provisioning Service
pub struct ClientProvisioner {
    storage: Arc<dyn OAuthClientStore>,
    scope_validator: Arc<dyn ScopeValidator>,
    /// Number of random bytes in generated client secrets
    secret_length: usize,
}

impl ClientProvisioner {
    /// Create a new client provisioner
    pub fn new(
        storage: Arc<dyn OAuthClientStore>,
        scope_validator: Arc<dyn ScopeValidator>,
    ) -> Self {
        Self {
            storage,
            scope_validator,
            secret_length: DEFAULT_CLIENT_SECRET_BYTES,
        }
    }

    /// Override the number of random bytes used for client secrets
    pub fn with_secret_length(mut self, secret_length: usize) -> Self {
        self.secret_length = secret_length.max(MIN_CLIENT_SECRET_BYTES);
        self
    }

    /// Create a new OAuth client.
    ///
    /// The returned client carries the plaintext secret of a confidential
    /// client. It is not kept anywhere else by the provisioner.
    pub async fn create_client(
        &self,
        request: CreateClientRequest,
    ) -> Result<OAuthClient, ProvisionError> {
        let client_id = request.client_id.trim().to_string();
        if client_id.is_empty() {
            return Err(ProvisionError::InvalidIdentifier(request.client_id));
        }

        let redirect_uris = normalize_list(request.redirect_uris);
        let grant_types = normalize_set(request.grant_types);
        let scopes = normalize_set(request.scopes);

        let client_type = ClientType::from_public_flag(request.is_public);
        let client_secret = match client_type {
            ClientType::Confidential => Some(generate_client_secret(self.secret_length)),
            ClientType::Public => None,
        };

        // Every scope must be known before anything is written
        for scope in &scopes {
            let known = self
                .scope_validator
                .exists(scope)
                .await
                .map_err(ProvisionError::ScopeRegistry)?;
            if !known {
                tracing::warn!(client_id = %client_id, scope = %scope, "scope not found");
                return Err(ProvisionError::ScopeNotFound(scope.clone()));
            }
        }

        let client = OAuthClient {
            client_id,
            client_secret,
            redirect_uris,
            grant_types,
            scopes,
            client_type,
            // SQL timestamp columns keep microseconds
            created_at: Utc::now().trunc_subsecs(6),
        };

        self.storage
            .store_client(&client)
            .await
            .map_err(|e| match e {
                StorageError::DuplicateKey(_) => {
                    ProvisionError::DuplicateClient(client.client_id.clone())
                }
                other => {
                    tracing::error!(
                        client_id = %client.client_id,
                        error = ?other,
                        "failed to store client"
                    );
                    ProvisionError::Persistence(other)
                }
            })?;

        tracing::info!(
            client_id = %client.client_id,
            client_type = ?client.client_type,
            scopes = client.scopes.len(),
            "client created"
        );

        Ok(client)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::inmemory::MemoryOAuthStorage;
    use async_trait::async_trait;
    use std::collections::BTreeSet;
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Records every store call and fails on demand
    #[derive(Default)]
    struct SpyClientStore {
        stored: Mutex<Vec<OAuthClient>>,
        fail_with: Mutex<Option<StorageError>>,
    }

    impl SpyClientStore {
        fn failing(error: StorageError) -> Self {
            Self {
                stored: Mutex::default(),
                fail_with: Mutex::new(Some(error)),
            }
        }

        fn store_calls(&self) -> usize {
            self.stored.lock().unwrap().len()
        }
    }

    #[async_trait]
    impl OAuthClientStore for SpyClientStore {
        async fn store_client(&self, client: &OAuthClient) -> crate::storage::traits::Result<()> {
            self.stored.lock().unwrap().push(client.clone());
            match self.fail_with.lock().unwrap().take() {
                Some(error) => Err(error),
                None => Ok(()),
            }
        }

        async fn get_client(
            &self,
            client_id: &str,
        ) -> crate::storage::traits::Result<Option<OAuthClient>> {
            Ok(self
                .stored
                .lock()
                .unwrap()
                .iter()
                .find(|c| c.client_id == client_id)
                .cloned())
        }
    }

    /// Knows a fixed set of scopes and counts lookups
    struct StaticScopes {
        known: BTreeSet<String>,
        lookups: AtomicUsize,
    }

    impl StaticScopes {
        fn new(known: &[&str]) -> Self {
            Self {
                known: known.iter().map(|s| s.to_string()).collect(),
                lookups: AtomicUsize::new(0),
            }
        }
    }

    #[async_trait]
    impl ScopeValidator for StaticScopes {
        async fn exists(&self, scope: &str) -> Result<bool, StorageError> {
            self.lookups.fetch_add(1, Ordering::SeqCst);
            Ok(self.known.contains(scope))
        }
    }

    struct BrokenScopes;

    #[async_trait]
    impl ScopeValidator for BrokenScopes {
        async fn exists(&self, _scope: &str) -> Result<bool, StorageError> {
            Err(StorageError::ConnectionFailed("registry offline".to_string()))
        }
    }

    fn web_app_request(scopes: &[&str], is_public: bool) -> CreateClientRequest {
        CreateClientRequest {
            client_id: "web-app".to_string(),
            redirect_uris: vec!["http://example.com/cb".to_string()],
            grant_types: vec!["authorization_code".to_string()],
            scopes: scopes.iter().map(|s| s.to_string()).collect(),
            is_public,
        }
    }

    #[tokio::test]
    async fn test_confidential_client_gets_secret() {
        let store = Arc::new(SpyClientStore::default());
        let provisioner =
            ClientProvisioner::new(store.clone(), Arc::new(StaticScopes::new(&["read", "write"])));

        let client = provisioner
            .create_client(web_app_request(&["read", "write"], false))
            .await
            .unwrap();

        assert_eq!(client.client_id, "web-app");
        assert!(!client.is_public());
        assert!(client.client_secret.as_deref().is_some_and(|s| !s.is_empty()));
        assert_eq!(client.redirect_uris, vec!["http://example.com/cb"]);
        assert_eq!(
            client.scopes.iter().map(String::as_str).collect::<Vec<_>>(),
            vec!["read", "write"]
        );
        assert_eq!(store.store_calls(), 1);
    }

    #[tokio::test]
    async fn test_public_client_has_no_secret() {
        let store = Arc::new(SpyClientStore::default());
        let provisioner =
            ClientProvisioner::new(store.clone(), Arc::new(StaticScopes::new(&["read", "write"])));

        let client = provisioner
            .create_client(web_app_request(&["read", "write"], true))
            .await
            .unwrap();

        assert!(client.is_public());
        assert!(client.client_secret.is_none());
        assert_eq!(store.store_calls(), 1);
    }

    #[tokio::test]
    async fn test_unknown_scope_fails_before_store() {
        let store = Arc::new(SpyClientStore::default());
        let provisioner =
            ClientProvisioner::new(store.clone(), Arc::new(StaticScopes::new(&["read"])));

        let result = provisioner
            .create_client(web_app_request(&["read", "nonexistent"], false))
            .await;

        assert!(matches!(
            result,
            Err(ProvisionError::ScopeNotFound(scope)) if scope == "nonexistent"
        ));
        assert_eq!(store.store_calls(), 0);
    }

    #[tokio::test]
    async fn test_empty_scopes_skip_validation() {
        let store = Arc::new(SpyClientStore::default());
        let scopes = Arc::new(StaticScopes::new(&[]));
        let provisioner = ClientProvisioner::new(store.clone(), scopes.clone());

        let request = CreateClientRequest::from_delimited("cli-tool", "", "", "", true);
        let client = provisioner.create_client(request).await.unwrap();

        assert!(client.redirect_uris.is_empty());
        assert!(client.grant_types.is_empty());
        assert!(client.scopes.is_empty());
        assert_eq!(scopes.lookups.load(Ordering::SeqCst), 0);
        assert_eq!(store.store_calls(), 1);
    }

    #[tokio::test]
    async fn test_scopes_are_checked_on_every_call() {
        let scopes = Arc::new(StaticScopes::new(&["read"]));
        let provisioner =
            ClientProvisioner::new(Arc::new(MemoryOAuthStorage::new()), scopes.clone());

        for client_id in ["one", "two"] {
            let mut request = web_app_request(&["read"], false);
            request.client_id = client_id.to_string();
            provisioner.create_client(request).await.unwrap();
        }

        assert_eq!(scopes.lookups.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_duplicate_identifier() {
        let storage = Arc::new(MemoryOAuthStorage::new());
        let provisioner =
            ClientProvisioner::new(storage.clone(), Arc::new(StaticScopes::new(&["read"])));

        let first = provisioner
            .create_client(web_app_request(&["read"], false))
            .await
            .unwrap();
        let second = provisioner
            .create_client(web_app_request(&["read"], false))
            .await;

        assert!(matches!(second, Err(ProvisionError::DuplicateClient(id)) if id == "web-app"));
        let stored = storage.get_client("web-app").await.unwrap().unwrap();
        assert_eq!(stored, first);
    }

    #[tokio::test]
    async fn test_storage_failure_is_wrapped() {
        let store = Arc::new(SpyClientStore::failing(StorageError::DatabaseError(
            "disk full".to_string(),
        )));
        let provisioner = ClientProvisioner::new(store, Arc::new(StaticScopes::new(&["read"])));

        let result = provisioner
            .create_client(web_app_request(&["read"], false))
            .await;

        match result {
            Err(ProvisionError::Persistence(StorageError::DatabaseError(message))) => {
                assert_eq!(message, "disk full");
            }
            other => panic!("expected persistence error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_registry_failure_is_reported() {
        let store = Arc::new(SpyClientStore::default());
        let provisioner = ClientProvisioner::new(store.clone(), Arc::new(BrokenScopes));

        let result = provisioner
            .create_client(web_app_request(&["read"], false))
            .await;

        assert!(matches!(result, Err(ProvisionError::ScopeRegistry(_))));
        assert_eq!(store.store_calls(), 0);
    }

    #[tokio::test]
    async fn test_empty_identifier_is_rejected() {
        let store = Arc::new(SpyClientStore::default());
        let provisioner = ClientProvisioner::new(store.clone(), Arc::new(StaticScopes::new(&[])));

        let request = CreateClientRequest::from_delimited("   ", "", "", "", false);
        let result = provisioner.create_client(request).await;

        assert!(matches!(result, Err(ProvisionError::InvalidIdentifier(_))));
        assert_eq!(store.store_calls(), 0);
    }

    #[tokio::test]
    async fn test_input_is_normalized() {
        let provisioner = ClientProvisioner::new(
            Arc::new(SpyClientStore::default()),
            Arc::new(StaticScopes::new(&["read", "write"])),
        );

        let request = CreateClientRequest {
            client_id: "  web-app ".to_string(),
            redirect_uris: vec![" https://example.com/cb ".to_string(), String::new()],
            grant_types: vec![
                "refresh_token".to_string(),
                "authorization_code".to_string(),
                "refresh_token".to_string(),
            ],
            scopes: vec!["write".to_string(), " read".to_string(), "write".to_string()],
            is_public: false,
        };
        let client = provisioner.create_client(request).await.unwrap();

        assert_eq!(client.client_id, "web-app");
        assert_eq!(client.redirect_uris, vec!["https://example.com/cb"]);
        assert_eq!(client.grant_types.len(), 2);
        assert_eq!(client.scopes.len(), 2);
    }

    #[tokio::test]
    async fn test_secret_length_is_configurable() {
        let provisioner = ClientProvisioner::new(
            Arc::new(SpyClientStore::default()),
            Arc::new(StaticScopes::new(&[])),
        )
        .with_secret_length(64);

        let client = provisioner
            .create_client(CreateClientRequest::from_delimited("svc", "", "", "", false))
            .await
            .unwrap();

        // 64 bytes encode to 86 unpadded base64 characters
        assert_eq!(client.client_secret.map(|s| s.len()), Some(86));
    }

    #[tokio::test]
    async fn test_only_confidential_clients_get_secrets() {
        let provisioner = ClientProvisioner::new(
            Arc::new(MemoryOAuthStorage::new()),
            Arc::new(StaticScopes::new(&[])),
        );

        for index in 0..20 {
            let is_public = index % 2 == 0;
            let request = CreateClientRequest::from_delimited(
                &format!("client-{index}"),
                "",
                "",
                "",
                is_public,
            );
            let client = provisioner.create_client(request).await.unwrap();
            assert_eq!(client.is_public(), is_public);
            assert_eq!(client.client_secret.is_none(), is_public);
        }
    }

    #[tokio::test]
    async fn test_created_at_has_microsecond_precision() {
        let storage = Arc::new(MemoryOAuthStorage::new());
        let provisioner =
            ClientProvisioner::new(storage.clone(), Arc::new(StaticScopes::new(&[])));

        for index in 0..20 {
            let request =
                CreateClientRequest::from_delimited(&format!("client-{index}"), "", "", "", true);
            let client = provisioner.create_client(request).await.unwrap();
            assert_eq!(client.created_at.timestamp_subsec_nanos() % 1000, 0);

            let stored = storage.get_client(&client.client_id).await.unwrap().unwrap();
            assert_eq!(stored.created_at, client.created_at);
        }
    }
}
