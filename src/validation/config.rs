//! Configuration validation functions

use super::ValidationError;

/// Require a non-blank setting
pub fn validate_required(name: &str, value: &str) -> Result<(), ValidationError> {
	if value.trim().is_empty() {
		return Err(ValidationError::ConfigError(format!("{} must not be empty", name)));
	}
	Ok(())
}

/// Validate the SSH port of the tunnel endpoint
pub fn validate_port(port: u16) -> Result<(), ValidationError> {
	if port == 0 {
		return Err(ValidationError::ConfigError("port must be greater than 0".to_string()));
	}
	Ok(())
}

/// Validate an optional marker timeout in milliseconds
///
/// `None` means wait forever and is always valid.
pub fn validate_marker_timeout_ms(timeout_ms: Option<u64>) -> Result<(), ValidationError> {
	if timeout_ms == Some(0) {
		return Err(ValidationError::ConfigError(
			"marker_timeout_ms must be greater than 0 (omit it to wait forever)".to_string(),
		));
	}
	Ok(())
}


// vim: ts=4
