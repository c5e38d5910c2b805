//! OAuth 2.0 client provisioning library crate.
//!
//! Creates confidential and public OAuth clients, generating client secrets
//! from the operating system CSPRNG and refusing clients bound to scopes
//! missing from the scope registry.

pub mod config;
pub mod errors;
pub mod oauth;
pub mod storage;
