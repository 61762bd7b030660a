//! Core traits defined in `docvault-core` and implemented by other crates.

pub mod blob_store;
pub mod owner;

pub use blob_store::{BlobMetadata, BlobStore, ByteStream, bytes_stream};
pub use owner::OwnerResolver;
