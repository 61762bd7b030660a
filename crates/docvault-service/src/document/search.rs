//! Document search over live and recycled documents.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Duration, NaiveTime, Utc};
use serde::{Deserialize, Serialize};

use docvault_core::error::AppError;
use docvault_core::result::AppResult;
use docvault_core::types::{FolderId, WorkspaceId};
use docvault_database::{DocumentFilter, FolderScope};
use docvault_entity::document::{Document, DocumentType};

use super::service::DocumentService;
use crate::context::RequestContext;

/// Relative date bucket used to narrow searches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DateRange {
    /// Since 00:00 UTC today.
    Today,
    /// The last 7 days.
    Week,
    /// The last 30 days.
    Month,
    /// The last 365 days.
    Year,
}

impl DateRange {
    /// Start of the bucket relative to `now`.
    pub fn since(self, now: DateTime<Utc>) -> DateTime<Utc> {
        match self {
            Self::Today => now.date_naive().and_time(NaiveTime::MIN).and_utc(),
            Self::Week => now - Duration::days(7),
            Self::Month => now - Duration::days(30),
            Self::Year => now - Duration::days(365),
        }
    }
}

impl fmt::Display for DateRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Today => "today",
            Self::Week => "week",
            Self::Month => "month",
            Self::Year => "year",
        };
        f.write_str(label)
    }
}

impl FromStr for DateRange {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "today" => Ok(Self::Today),
            "week" => Ok(Self::Week),
            "month" => Ok(Self::Month),
            "year" => Ok(Self::Year),
            _ => Err(AppError::validation(format!("Unknown date range: {s}"))),
        }
    }
}

/// Search criteria. Unset fields do not constrain.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DocumentSearch {
    /// Case-insensitive name substring.
    pub name: Option<String>,
    /// Content category.
    pub doc_type: Option<DocumentType>,
    /// Workspace.
    pub workspace_id: Option<WorkspaceId>,
    /// Folder directly containing the document.
    pub folder_id: Option<FolderId>,
    /// Relative date bucket, applied to `updated_at` for live documents and
    /// `deleted_at` for recycled ones.
    pub date_range: Option<DateRange>,
}

impl DocumentSearch {
    fn base_filter(&self, mut filter: DocumentFilter) -> DocumentFilter {
        filter.name_contains = self.name.clone().filter(|n| !n.is_empty());
        filter.doc_type = self.doc_type;
        filter.workspace_id = self.workspace_id;
        filter.folder = self.folder_id.map(FolderScope::In).unwrap_or_default();
        filter
    }
}

impl DocumentService {
    /// Searches the caller's live documents, most recently updated first.
    pub async fn search_documents(
        &self,
        ctx: &RequestContext,
        search: &DocumentSearch,
    ) -> AppResult<Vec<Document>> {
        let owner = self.store().owner_of(ctx).await?;
        let mut filter = search.base_filter(DocumentFilter::live(owner));
        filter.updated_since = search.date_range.map(|r| r.since(ctx.request_time));

        let mut documents = self.store().documents.find(&filter).await?;
        documents.sort_by(|a, b| b.updated_at.cmp(&a.updated_at));
        Ok(documents)
    }

    /// Searches the caller's recycled documents, most recently deleted first.
    pub async fn search_deleted_documents(
        &self,
        ctx: &RequestContext,
        search: &DocumentSearch,
    ) -> AppResult<Vec<Document>> {
        let owner = self.store().owner_of(ctx).await?;
        let mut filter = search.base_filter(DocumentFilter::deleted(owner));
        filter.deleted_since = search.date_range.map(|r| r.since(ctx.request_time));

        let mut documents = self.store().documents.find(&filter).await?;
        documents.sort_by(|a, b| b.deleted_at.cmp(&a.deleted_at));
        Ok(documents)
    }
}
