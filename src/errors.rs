//! Standardized error types following the `error-provisioner-<domain>-<number>` format.

use thiserror::Error;

/// Configuration errors that occur during application startup
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Error when version information is not available
    #[error("error-provisioner-config-1 One of GIT_HASH or CARGO_PKG_VERSION must be set")]
    VersionNotSet,

    /// Error when CLIENT_SECRET_BYTES cannot be parsed
    #[error("error-provisioner-config-2 Parsing CLIENT_SECRET_BYTES into usize failed: {0:?}")]
    SecretLengthParsingFailed(std::num::ParseIntError),

    /// Error when CLIENT_SECRET_BYTES is below the accepted minimum
    #[error("error-provisioner-config-3 CLIENT_SECRET_BYTES below minimum {minimum}: {actual}")]
    SecretLengthTooShort { minimum: usize, actual: usize },
}

/// Client provisioning errors
#[derive(Debug, Error)]
pub enum ProvisionError {
    /// A requested scope is not registered
    #[error("error-provisioner-client-1 Scope not found: {0}")]
    ScopeNotFound(String),

    /// A client with the same identifier already exists
    #[error("error-provisioner-client-2 Client already exists: {0}")]
    DuplicateClient(String),

    /// The storage backend failed to persist the client
    #[error("error-provisioner-client-3 Failed to store client: {0}")]
    Persistence(#[source] StorageError),

    /// The client identifier is empty
    #[error("error-provisioner-client-4 Invalid client identifier: {0:?}")]
    InvalidIdentifier(String),

    /// The scope registry could not be consulted
    #[error("error-provisioner-client-5 Scope lookup failed: {0}")]
    ScopeRegistry(#[source] StorageError),
}

/// Database/storage errors
#[derive(Debug, Error)]
pub enum StorageError {
    /// Error when database connection fails
    #[error("error-provisioner-storage-1 Database connection failed: {0}")]
    ConnectionFailed(String),

    /// Error when query execution fails
    #[error("error-provisioner-storage-2 Query execution failed: {0}")]
    QueryFailed(String),

    /// Error when data serialization fails
    #[error("error-provisioner-storage-3 Data serialization failed: {0}")]
    SerializationFailed(String),

    /// Error when database operation fails
    #[error("error-provisioner-storage-4 Database error: {0}")]
    DatabaseError(String),

    /// Error when data validation fails
    #[error("error-provisioner-storage-5 Invalid data: {0}")]
    InvalidData(String),

    /// Error when a record violates a uniqueness constraint
    #[error("error-provisioner-storage-6 Duplicate key: {0}")]
    DuplicateKey(String),
}
