//! Display-name rules shared by folders, files and users.

use stowage_core::error::AppError;
use stowage_core::result::AppResult;

/// Longest accepted display name, in characters.
pub const MAX_NAME_CHARS: usize = 255;

/// Trim `raw` and reject empty or oversized names. `what` names the field in
/// error messages.
pub fn normalize_name(raw: &str, what: &str) -> AppResult<String> {
    let name = raw.trim();
    if name.is_empty() {
        return Err(AppError::validation(format!("{what} cannot be empty")));
    }
    if name.chars().count() > MAX_NAME_CHARS {
        return Err(AppError::validation(format!(
            "{what} cannot exceed {MAX_NAME_CHARS} characters"
        )));
    }
    Ok(name.to_string())
}
