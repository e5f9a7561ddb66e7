//! Typed path and query parameter helpers.

use uuid::Uuid;

use stowage_core::error::AppError;
use stowage_entity::ParentFilter;

/// Parses a UUID from a path segment or query value.
pub fn parse_uuid(s: &str) -> Result<Uuid, AppError> {
    Uuid::parse_str(s.trim()).map_err(|_| AppError::validation(format!("Invalid UUID: {s}")))
}

/// Parses a `parent`-style query value: a folder id or the literal `root`.
///
/// `absent` is used when the parameter is missing or blank.
pub fn parse_parent(raw: Option<&str>, absent: ParentFilter) -> Result<ParentFilter, AppError> {
    match raw.map(str::trim) {
        None | Some("") => Ok(absent),
        Some(value) if value.eq_ignore_ascii_case("root") => Ok(ParentFilter::Root),
        Some(value) => parse_uuid(value).map(ParentFilter::Folder),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use stowage_core::error::ErrorKind;

    #[test]
    fn test_parse_parent() {
        let id = Uuid::new_v4();
        assert_eq!(parse_parent(None, ParentFilter::Any).unwrap(), ParentFilter::Any);
        assert_eq!(parse_parent(Some(""), ParentFilter::Root).unwrap(), ParentFilter::Root);
        assert_eq!(
            parse_parent(Some("root"), ParentFilter::Any).unwrap(),
            ParentFilter::Root
        );
        assert_eq!(
            parse_parent(Some(&id.to_string()), ParentFilter::Any).unwrap(),
            ParentFilter::Folder(id)
        );
    }

    #[test]
    fn test_parse_parent_rejects_garbage() {
        let err = parse_parent(Some("not-a-folder"), ParentFilter::Any).unwrap_err();
        assert_eq!(err.kind, ErrorKind::Validation);
    }
}
