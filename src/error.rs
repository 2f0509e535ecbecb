//! Error types for relay operations

use std::error::Error;
use std::fmt;
use std::io;
use std::path::PathBuf;
use std::time::Duration;

use crate::protocol::Marker;
use crate::validation::ValidationError;

/// Main error type for relay operations
#[derive(Debug)]
pub enum RelayError {
	/// Writing a command to the engine failed
	Write { command: String, source: io::Error },

	/// Reading from the engine output failed
	Read { source: io::Error },

	/// Reading a local command failed
	Input { source: io::Error },

	/// Engine output ended while waiting for a marker
	OutputClosed { marker: Marker },

	/// Marker did not arrive in time
	MarkerTimeout { marker: Marker, waited: Duration },

	/// Transport error (nested)
	Transport(TransportError),
}

impl fmt::Display for RelayError {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			RelayError::Write { command, source } => {
				write!(f, "Failed to send '{}' to engine: {}", command, source)
			}
			RelayError::Read { source } => write!(f, "Failed to read engine output: {}", source),
			RelayError::Input { source } => write!(f, "Failed to read input: {}", source),
			RelayError::OutputClosed { marker } => {
				write!(f, "Engine output closed while waiting for '{}'", marker)
			}
			RelayError::MarkerTimeout { marker, waited } => {
				write!(f, "No '{}' from engine after {} ms", marker, waited.as_millis())
			}
			RelayError::Transport(e) => write!(f, "Transport error: {}", e),
		}
	}
}

impl Error for RelayError {}

impl From<TransportError> for RelayError {
	fn from(e: TransportError) -> Self {
		RelayError::Transport(e)
	}
}

/// Transport-specific errors
#[derive(Debug)]
pub enum TransportError {
	/// Tunnel process spawn failed
	SpawnFailed { cmd: String, source: io::Error },

	/// Stdio unavailable
	StdioUnavailable { what: String },
}

impl fmt::Display for TransportError {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			TransportError::SpawnFailed { cmd, source } => {
				write!(f, "Failed to spawn '{}': {}", cmd, source)
			}
			TransportError::StdioUnavailable { what } => {
				write!(f, "Stdio unavailable: {}", what)
			}
		}
	}
}

impl Error for TransportError {}

/// Configuration loading errors
#[derive(Debug)]
pub enum ConfigError {
	/// Configuration file could not be read
	NotFound { path: PathBuf, source: io::Error },

	/// Configuration file is malformed
	Parse { path: PathBuf, message: String },

	/// Configuration values failed validation
	Invalid(ValidationError),
}

impl fmt::Display for ConfigError {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			ConfigError::NotFound { path, source } => {
				write!(f, "Configuration file '{}' not found: {}", path.display(), source)
			}
			ConfigError::Parse { path, message } => {
				write!(f, "Error parsing configuration file '{}': {}", path.display(), message)
			}
			ConfigError::Invalid(e) => write!(f, "{}", e),
		}
	}
}

impl Error for ConfigError {}

impl From<ValidationError> for ConfigError {
	fn from(e: ValidationError) -> Self {
		ConfigError::Invalid(e)
	}
}


// vim: ts=4
