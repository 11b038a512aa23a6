//! Frame validation rules.

use initiative_core::{AppError, AppResult};

/// Rejects frames that are blank or larger than `max_size` bytes.
pub fn validate_inbound(raw: &str, max_size: usize) -> AppResult<()> {
    if raw.len() > max_size {
        return Err(AppError::validation(format!(
            "Message exceeds maximum size of {max_size} bytes"
        )));
    }

    if raw.trim().is_empty() {
        return Err(AppError::validation("Empty message"));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_inbound() {
        assert!(validate_inbound(r#"{"type":"next"}"#, 64).is_ok());
        assert!(validate_inbound("  \n", 64).is_err());
        assert!(validate_inbound(&"x".repeat(65), 64).is_err());
    }
}
