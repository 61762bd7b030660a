//! # docvault-entity
//!
//! Domain entity models for DocVault. Every struct in this crate
//! represents a database table row or a domain value object. All entities
//! derive `Debug`, `Clone`, `Serialize`, `Deserialize`, and table rows
//! additionally derive `sqlx::FromRow`.

pub mod access;
pub mod document;
pub mod folder;
pub mod lifecycle;
pub mod workspace;

pub use lifecycle::SoftDelete;
