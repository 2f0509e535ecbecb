//! Relay configuration
//!
//! Settings are read from a JSON (or JSON5) file, by default `config.json`
//! next to the executable. Missing keys fall back to `Config::default()`;
//! the required connection settings are enforced by validation.
//!
//! ```json
//! {
//!     "plink_path": "C:/Program Files/PuTTY/plink.exe",
//!     "key_file": "engine.ppk",
//!     "host": "engine.example.com",
//!     "username": "chess",
//!     "stockfish_command": "/usr/local/bin/stockfish",
//!     "logging_enabled": true
//! }
//! ```

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use std::{env, fs};

use crate::error::ConfigError;
use crate::validation::{
	validate_marker_timeout_ms, validate_port, validate_required, ValidationError, Validator,
};

/// Default name of the configuration file
pub const CONFIG_FILE_NAME: &str = "config.json";

/// Port the tunnel endpoint listens on unless configured otherwise
pub const DEFAULT_PORT: u16 = 4242;

/// Configuration for a relay session
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
	// ========================================================================
	// TRANSPORT
	// ========================================================================
	/// Tunnel client used to reach the remote engine
	pub transport: TransportKind,

	/// Path to the plink executable (plink transport only)
	pub plink_path: PathBuf,

	/// Private key file, relative paths resolve against the config directory
	pub key_file: PathBuf,

	/// Remote host running the engine
	pub host: String,

	/// Remote user name
	pub username: String,

	/// SSH port of the remote host
	pub port: u16,

	/// Command line that starts the engine on the remote host
	pub stockfish_command: String,

	// ========================================================================
	// DIAGNOSTICS
	// ========================================================================
	/// Write a debug log file
	pub logging_enabled: bool,

	/// Log file path, appended to
	pub log_file: PathBuf,

	// ========================================================================
	// RELAY BEHAVIOR
	// ========================================================================
	/// Give up waiting for a response marker after this many milliseconds.
	/// Absent means wait forever.
	pub marker_timeout_ms: Option<u64>,

	/// Send a deferred command as soon as the interrupted analysis reports
	/// its best move, instead of after the next local command
	pub flush_pending_after_stop: bool,
}

impl Default for Config {
	fn default() -> Self {
		Config {
			transport: TransportKind::Plink,
			plink_path: PathBuf::from("plink"),
			key_file: PathBuf::new(),
			host: String::new(),
			username: String::new(),
			port: DEFAULT_PORT,
			stockfish_command: String::new(),
			logging_enabled: false,
			log_file: PathBuf::from("debug.log"),
			marker_timeout_ms: None,
			flush_pending_after_stop: false,
		}
	}
}

/// Tunnel client flavor
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum TransportKind {
	/// PuTTY plink in batch mode
	#[default]
	Plink,
	/// OpenSSH client
	Ssh,
}

impl Config {
	/// Load, resolve and validate the configuration file at `path`
	pub fn load(path: &Path) -> Result<Config, ConfigError> {
		let text = fs::read_to_string(path)
			.map_err(|source| ConfigError::NotFound { path: path.to_path_buf(), source })?;
		let mut config = Config::parse(&text)
			.map_err(|message| ConfigError::Parse { path: path.to_path_buf(), message })?;

		let base_dir = path.parent().unwrap_or_else(|| Path::new("."));
		config.resolve_paths(base_dir);
		config.validate()?;
		Ok(config)
	}

	/// Parse configuration text without touching the filesystem
	pub fn parse(text: &str) -> Result<Config, String> {
		json5::from_str(text).map_err(|e| e.to_string())
	}

	/// Make file paths absolute
	///
	/// The key file is looked up next to the configuration file. The plink
	/// path is only resolved when it names a path; a bare program name is
	/// left for the `PATH` lookup.
	pub fn resolve_paths(&mut self, base_dir: &Path) {
		if !self.key_file.as_os_str().is_empty() && self.key_file.is_relative() {
			self.key_file = absolute(&base_dir.join(&self.key_file));
		}
		if self.plink_path.components().count() > 1 && self.plink_path.is_relative() {
			self.plink_path = absolute(&self.plink_path);
		}
	}

	/// Marker timeout as a duration
	pub fn marker_timeout(&self) -> Option<Duration> {
		self.marker_timeout_ms.map(Duration::from_millis)
	}
}

impl Validator for Config {
	fn validate(&self) -> Result<(), ValidationError> {
		validate_required("host", &self.host)?;
		validate_required("username", &self.username)?;
		validate_required("stockfish_command", &self.stockfish_command)?;
		validate_required("key_file", &self.key_file.to_string_lossy())?;
		if self.transport == TransportKind::Plink {
			validate_required("plink_path", &self.plink_path.to_string_lossy())?;
		}
		validate_port(self.port)?;
		validate_marker_timeout_ms(self.marker_timeout_ms)?;
		Ok(())
	}
}

/// Location of `config.json` in the directory of the running executable
pub fn default_config_path() -> PathBuf {
	env::current_exe()
		.ok()
		.and_then(|exe| exe.parent().map(|dir| dir.join(CONFIG_FILE_NAME)))
		.unwrap_or_else(|| PathBuf::from(CONFIG_FILE_NAME))
}

fn absolute(path: &Path) -> PathBuf {
	if path.is_absolute() {
		return path.to_path_buf();
	}
	match env::current_dir() {
		Ok(cwd) => cwd.join(path),
		Err(_) => path.to_path_buf(),
	}
}


// vim: ts=4
