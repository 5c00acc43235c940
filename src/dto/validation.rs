//! Validation helpers for DTOs.

use validator::ValidationError;

const CLIENT_ID_MAX_LENGTH: usize = 64;

/// Validates a caller-supplied session identifier.
///
/// Client ids are opaque but must be non-empty, reasonably short, and free of
/// whitespace so they can be used as registry keys and log fields verbatim.
pub fn validate_client_id(id: &str) -> Result<(), ValidationError> {
    if id.is_empty() || id.len() > CLIENT_ID_MAX_LENGTH {
        let mut err = ValidationError::new("client_id_length");
        err.message = Some(
            format!(
                "client id must be between 1 and {CLIENT_ID_MAX_LENGTH} characters (got {})",
                id.len()
            )
            .into(),
        );
        return Err(err);
    }

    if !id.chars().all(|c| c.is_ascii_graphic()) {
        let mut err = ValidationError::new("client_id_format");
        err.message =
            Some("client id must contain only printable ASCII characters without spaces".into());
        return Err(err);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_opaque_session_ids() {
        assert!(validate_client_id("tab-1").is_ok());
        assert!(validate_client_id("9b2f3a7c-1d69-4a0e-8f33-5a1a2b3c4d5e").is_ok());
        assert!(validate_client_id("a").is_ok());
    }

    #[test]
    fn rejects_empty_and_oversized_ids() {
        assert!(validate_client_id("").is_err());
        assert!(validate_client_id(&"x".repeat(65)).is_err());
    }

    #[test]
    fn rejects_whitespace_and_control_characters() {
        assert!(validate_client_id("tab 1").is_err());
        assert!(validate_client_id("tab\n1").is_err());
        assert!(validate_client_id("caf\u{e9}").is_err());
    }
}
