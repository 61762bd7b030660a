//! Document storage: inline and uploaded content, version ledger, search.

pub mod search;
pub mod service;
pub mod upload;
pub mod version;

pub use search::{DateRange, DocumentSearch};
pub use service::{CreateDocumentRequest, DocumentService, UpdateDocumentRequest};
pub use upload::{UploadFile, UploadRequest, UploadService};
pub use version::VersionService;
