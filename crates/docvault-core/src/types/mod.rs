//! Core type definitions used across the DocVault workspace.

pub mod id;
pub mod key;

pub use id::*;
pub use key::{BlobId, OwnerKey};
