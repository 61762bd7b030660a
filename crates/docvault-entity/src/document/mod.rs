//! Document domain entities.

pub mod kind;
pub mod metadata;
pub mod model;
pub mod version;

pub use kind::DocumentType;
pub use metadata::DocumentMetadata;
pub use model::Document;
pub use version::DocumentVersion;
