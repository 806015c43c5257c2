//! Input validation for user-entered quantities and JSON files read from disk.

/// Validation errors with messages suitable for the terminal.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("'{input}' is not a whole number")]
    InvalidQuantity { input: String },

    #[error("File size exceeds limit ({limit} bytes)")]
    FileSizeExceeded { limit: usize },

    #[error("Invalid JSON: {reason}")]
    InvalidFormat { reason: String },

    #[error("Name cannot be empty")]
    EmptyName,
}

/// Parse a non-negative quantity. Thousands separators are accepted ("1,200").
pub fn parse_quantity(input: &str) -> Result<u64, ValidationError> {
    let cleaned: String = input.trim().chars().filter(|c| *c != ',').collect();
    cleaned.parse::<u64>().map_err(|_| ValidationError::InvalidQuantity {
        input: input.to_string(),
    })
}

/// Parse a boolean flag as typed on the command line.
pub fn parse_flag(input: &str) -> Result<bool, String> {
    match input.trim().to_ascii_lowercase().as_str() {
        "y" | "yes" | "true" | "1" | "on" => Ok(true),
        "n" | "no" | "false" | "0" | "off" => Ok(false),
        other => Err(format!("expected yes/no, got '{}'", other)),
    }
}

/// Item names are matched exactly; only surrounding whitespace is dropped.
pub fn normalize_name(input: &str) -> Result<String, ValidationError> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::EmptyName);
    }
    Ok(trimmed.to_string())
}

/// Parse JSON content with a size cap.
pub fn secure_json_parse<T>(content: &str, max_bytes: usize) -> Result<T, ValidationError>
where
    T: serde::de::DeserializeOwned,
{
    if content.len() > max_bytes {
        return Err(ValidationError::FileSizeExceeded { limit: max_bytes });
    }

    // Interrupted writes have been seen to leave leading NULs; valid JSON cannot start with one.
    let normalized = content.trim_start_matches('\0');

    serde_json::from_str(normalized).map_err(|e| ValidationError::InvalidFormat {
        reason: e.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quantities() {
        assert_eq!(parse_quantity("12"), Ok(12));
        assert_eq!(parse_quantity(" 1,200 "), Ok(1200));
        assert!(matches!(parse_quantity("-3"), Err(ValidationError::InvalidQuantity { .. })));
        assert!(parse_quantity("three").is_err());
        assert!(parse_quantity("").is_err());
    }

    #[test]
    fn flags() {
        assert_eq!(parse_flag("Yes"), Ok(true));
        assert_eq!(parse_flag("0"), Ok(false));
        assert!(parse_flag("maybe").is_err());
    }

    #[test]
    fn names() {
        assert_eq!(normalize_name("  Pine Wood "), Ok("Pine Wood".to_string()));
        assert_eq!(normalize_name("   "), Err(ValidationError::EmptyName));
    }

    #[test]
    fn json_parse_limits_and_nul_prefix() {
        let v: Vec<u32> = secure_json_parse("\0\0[1,2]", 64).unwrap();
        assert_eq!(v, vec![1, 2]);
        assert_eq!(
            secure_json_parse::<Vec<u32>>("[1,2,3]", 3),
            Err(ValidationError::FileSizeExceeded { limit: 3 })
        );
        assert!(matches!(
            secure_json_parse::<Vec<u32>>("{", 64),
            Err(ValidationError::InvalidFormat { .. })
        ));
    }
}
