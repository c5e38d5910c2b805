//! OAuth client provisioning types and helpers.
//!
//! Defines the client and scope records, the creation request, delimited
//! list parsing and client secret generation.

use base64::prelude::*;
use chrono::{DateTime, Utc};
use rand::RngCore;
use rand::rngs::OsRng;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Default number of random bytes in a generated client secret
pub const DEFAULT_CLIENT_SECRET_BYTES: usize = 32;

/// Smallest accepted number of random bytes in a client secret
pub const MIN_CLIENT_SECRET_BYTES: usize = 16;

/// Separator used by the textual list form of redirect URIs, grant types and scopes
pub const LIST_DELIMITER: char = ',';

/// Client Type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClientType {
    Public,
    Confidential,
}

impl ClientType {
    pub fn from_public_flag(is_public: bool) -> Self {
        if is_public {
            ClientType::Public
        } else {
            ClientType::Confidential
        }
    }
}

/// Provisioned OAuth client
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OAuthClient {
    /// Unique client identifier
    pub client_id: String,
    /// Client secret, present only for confidential clients
    pub client_secret: Option<String>,
    /// Redirect URIs in the order they were supplied
    pub redirect_uris: Vec<String>,
    /// Grant types allowed for this client
    pub grant_types: BTreeSet<String>,
    /// Scopes this client is restricted to
    pub scopes: BTreeSet<String>,
    /// Client type (public or confidential)
    pub client_type: ClientType,
    /// Registration timestamp
    pub created_at: DateTime<Utc>,
}

impl OAuthClient {
    pub fn is_public(&self) -> bool {
        self.client_type == ClientType::Public
    }
}

/// Registered scope
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OAuthScope {
    /// Scope name as requested by clients
    pub scope: String,
    /// Human readable description
    pub description: Option<String>,
}

impl OAuthScope {
    pub fn new(scope: impl Into<String>) -> Self {
        Self {
            scope: scope.into(),
            description: None,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

/// Raw input for creating a client
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CreateClientRequest {
    /// Caller assigned client identifier
    pub client_id: String,
    /// Redirect URIs
    #[serde(default)]
    pub redirect_uris: Vec<String>,
    /// Grant types
    #[serde(default)]
    pub grant_types: Vec<String>,
    /// Scopes
    #[serde(default)]
    pub scopes: Vec<String>,
    /// Whether the client is public (no secret is generated)
    #[serde(default)]
    pub is_public: bool,
}

impl CreateClientRequest {
    /// Build a request from the comma separated textual form of each list.
    pub fn from_delimited(
        client_id: &str,
        redirect_uris: &str,
        grant_types: &str,
        scopes: &str,
        is_public: bool,
    ) -> Self {
        Self {
            client_id: client_id.to_string(),
            redirect_uris: parse_delimited(redirect_uris),
            grant_types: parse_delimited(grant_types),
            scopes: parse_delimited(scopes),
            is_public,
        }
    }
}

/// Split a comma separated list, trimming entries and dropping empty ones.
///
/// An empty input yields an empty list, never `[""]`.
pub fn parse_delimited(value: &str) -> Vec<String> {
    value
        .split(LIST_DELIMITER)
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .map(str::to_string)
        .collect()
}

/// Trim list entries and drop empty ones, keeping order and duplicates.
pub(crate) fn normalize_list(values: Vec<String>) -> Vec<String> {
    values
        .into_iter()
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
        .collect()
}

/// Trim entries, drop empty ones and collapse duplicates.
pub(crate) fn normalize_set(values: Vec<String>) -> BTreeSet<String> {
    normalize_list(values).into_iter().collect()
}

/// Generate a client secret from `length` bytes of operating system randomness.
///
/// The bytes are rendered as unpadded base64url.
pub fn generate_client_secret(length: usize) -> String {
    let mut bytes = vec![0u8; length];
    OsRng.fill_bytes(&mut bytes);
    BASE64_URL_SAFE_NO_PAD.encode(bytes)
}
