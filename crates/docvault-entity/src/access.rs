//! Access-list entries carried in folder and document metadata.
//!
//! The lists are persisted as given; no operation consults them.

use serde::{Deserialize, Serialize};

use docvault_core::types::OwnerKey;

/// Level of access granted by an [`AccessEntry`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AccessLevel {
    /// Read-only.
    Read,
    /// Read and write.
    Write,
    /// Full control.
    Admin,
}

/// A single grant in an access list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessEntry {
    /// Grantee.
    pub owner_key: OwnerKey,
    /// Granted level.
    pub level: AccessLevel,
}
