//! Soft-delete lifecycle shared by folders and documents.
//!
//! Every recyclable record carries exactly two lifecycle fields, `deleted`
//! and `deleted_at`, and they only ever change together.

use chrono::{DateTime, Utc};

use docvault_core::error::AppError;
use docvault_core::result::AppResult;

/// A record that can sit in the recycle bin.
pub trait SoftDelete {
    /// Human-readable record kind used in error messages ("Folder", ...).
    const KIND: &'static str;

    /// Whether the record is soft-deleted.
    fn is_deleted(&self) -> bool;

    /// When the record was soft-deleted.
    fn deleted_at(&self) -> Option<DateTime<Utc>>;

    /// Set `deleted = true` and `deleted_at = at` together.
    fn mark_deleted(&mut self, at: DateTime<Utc>);

    /// Set `deleted = false` and clear `deleted_at` together.
    fn mark_restored(&mut self);

    /// Fail with `InvalidState` unless the record is in the recycle bin.
    fn ensure_deleted(&self) -> AppResult<()> {
        if self.is_deleted() {
            Ok(())
        } else {
            Err(AppError::invalid_state(format!(
                "{} is not in the recycle bin",
                Self::KIND
            )))
        }
    }

    /// Fail with `InvalidState` if the record is in the recycle bin.
    fn ensure_live(&self) -> AppResult<()> {
        if self.is_deleted() {
            Err(AppError::invalid_state(format!(
                "{} is in the recycle bin",
                Self::KIND
            )))
        } else {
            Ok(())
        }
    }
}

/// Implements [`SoftDelete`] for a struct with `deleted: bool`,
/// `deleted_at: Option<DateTime<Utc>>` and `updated_at` fields.
macro_rules! impl_soft_delete {
    ($ty:ty, $kind:literal) => {
        impl $crate::lifecycle::SoftDelete for $ty {
            const KIND: &'static str = $kind;

            fn is_deleted(&self) -> bool {
                self.deleted
            }

            fn deleted_at(&self) -> Option<chrono::DateTime<chrono::Utc>> {
                self.deleted_at
            }

            fn mark_deleted(&mut self, at: chrono::DateTime<chrono::Utc>) {
                self.deleted = true;
                self.deleted_at = Some(at);
                self.updated_at = at;
            }

            fn mark_restored(&mut self) {
                self.deleted = false;
                self.deleted_at = None;
                self.updated_at = chrono::Utc::now();
            }
        }
    };
}

pub(crate) use impl_soft_delete;
