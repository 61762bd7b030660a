//! Workspace domain entities.

pub mod model;

pub use model::Workspace;
