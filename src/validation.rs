use thiserror::Error;

#[derive(Error, Debug)]
pub enum ValidationError {
    #[error("Missing required parameter: {0}")]
    MissingParameter(String),

    #[error("Invalid request body: {0}")]
    InvalidBody(String),
}

/// Addresses are accepted verbatim; only a blank value is rejected.
pub fn validate_address(address: Option<&str>) -> Result<&str, ValidationError> {
    require("address", address)
}

pub fn validate_hash(hash: Option<&str>) -> Result<&str, ValidationError> {
    require("hash", hash)
}

fn require<'a>(name: &str, value: Option<&'a str>) -> Result<&'a str, ValidationError> {
    match value {
        Some(value) if !value.trim().is_empty() => Ok(value),
        _ => Err(ValidationError::MissingParameter(name.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_values_are_missing() {
        assert!(validate_address(None).is_err());
        assert!(validate_address(Some("")).is_err());
        assert!(validate_hash(Some("   ")).is_err());
    }

    #[test]
    fn any_non_blank_address_is_accepted() {
        assert_eq!(validate_address(Some("not-an-address")).unwrap(), "not-an-address");
        assert_eq!(validate_address(Some("0xAbC")).unwrap(), "0xAbC");
    }
}
