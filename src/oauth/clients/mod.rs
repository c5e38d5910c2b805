//! OAuth client provisioning.
//!
//! Creates confidential and public clients on top of the storage traits.

pub mod provisioning;

// Re-export main types and services
pub use provisioning::ClientProvisioner;
