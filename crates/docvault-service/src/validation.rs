//! Name rules shared by folders, documents and workspaces.

use docvault_core::error::AppError;
use docvault_core::result::AppResult;
use docvault_entity::folder::PATH_SEPARATOR;

/// Maximum length of a folder, document or workspace name.
pub const MAX_NAME_LEN: usize = 255;

/// Reject names that are blank, too long, or contain the path separator.
pub fn validate_name(kind: &str, name: &str) -> AppResult<()> {
    if name.trim().is_empty() {
        return Err(AppError::validation(format!("{kind} name cannot be empty")));
    }
    if name.chars().count() > MAX_NAME_LEN {
        return Err(AppError::validation(format!(
            "{kind} name cannot exceed {MAX_NAME_LEN} characters"
        )));
    }
    if name.contains(PATH_SEPARATOR) {
        return Err(AppError::validation(format!(
            "{kind} name cannot contain '{PATH_SEPARATOR}'"
        )));
    }
    Ok(())
}
