//! Tunnel to the remote engine
//!
//! The relay only needs a line sink for commands, a line source for engine
//! output and a way to tear the tunnel down. `ProcessTransport` provides
//! these by running plink or ssh with piped stdio.

use async_trait::async_trait;
use std::ffi::OsString;
use std::process::Stdio;
use tokio::io::{AsyncBufRead, AsyncWrite, BufReader};
use tokio::process::{Child, ChildStdin, ChildStdout, Command};
use tracing::{debug, info, warn};

use crate::config::{Config, TransportKind};
use crate::error::TransportError;

/// Bidirectional line channel to a remote engine
#[async_trait]
pub trait Transport: Send {
	type Sink: AsyncWrite + Unpin + Send + 'static;
	type Source: AsyncBufRead + Unpin + Send + 'static;

	/// Hand out the command sink and the output source (once)
	fn take_streams(&mut self) -> Result<(Self::Sink, Self::Source), TransportError>;

	/// Best-effort teardown, called once at shutdown
	async fn terminate(&mut self);
}

/// Engine reached through a spawned tunnel process
pub struct ProcessTransport {
	child: Child,
	command_line: String,
	sink: Option<ChildStdin>,
	source: Option<BufReader<ChildStdout>>,
}

impl std::fmt::Debug for ProcessTransport {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("ProcessTransport")
			.field("command_line", &self.command_line)
			.field("pid", &self.child.id())
			.finish()
	}
}

/// Program and arguments that open the tunnel and start the remote engine
pub fn tunnel_command(config: &Config) -> (OsString, Vec<OsString>) {
	let destination = format!("{}@{}", config.username, config.host);
	let port = config.port.to_string();
	match config.transport {
		TransportKind::Plink => (
			config.plink_path.clone().into_os_string(),
			vec![
				"-batch".into(),
				"-ssh".into(),
				"-i".into(),
				config.key_file.clone().into_os_string(),
				"-P".into(),
				port.into(),
				destination.into(),
				config.stockfish_command.clone().into(),
			],
		),
		TransportKind::Ssh => (
			"ssh".into(),
			vec![
				"-i".into(),
				config.key_file.clone().into_os_string(),
				"-p".into(),
				port.into(),
				"-o".into(),
				"BatchMode=yes".into(),
				destination.into(),
				config.stockfish_command.clone().into(),
			],
		),
	}
}

impl ProcessTransport {
	/// Spawn the tunnel process described by `config`
	pub fn open(config: &Config) -> Result<Self, TransportError> {
		let (program, args) = tunnel_command(config);
		let command_line = std::iter::once(&program)
			.chain(args.iter())
			.map(|arg| arg.to_string_lossy().into_owned())
			.collect::<Vec<_>>()
			.join(" ");
		info!("Tunnel command: {}", command_line);

		let mut child = Command::new(&program)
			.args(&args)
			.stdin(Stdio::piped())
			.stdout(Stdio::piped())
			.kill_on_drop(true)
			.spawn()
			.map_err(|source| TransportError::SpawnFailed { cmd: command_line.clone(), source })?;

		let sink = child
			.stdin
			.take()
			.ok_or(TransportError::StdioUnavailable { what: "stdin".to_string() })?;
		let stdout = child
			.stdout
			.take()
			.ok_or(TransportError::StdioUnavailable { what: "stdout".to_string() })?;

		debug!("Tunnel process started with pid {:?}", child.id());
		Ok(ProcessTransport {
			child,
			command_line,
			sink: Some(sink),
			source: Some(BufReader::new(stdout)),
		})
	}
}

#[async_trait]
impl Transport for ProcessTransport {
	type Sink = ChildStdin;
	type Source = BufReader<ChildStdout>;

	fn take_streams(&mut self) -> Result<(Self::Sink, Self::Source), TransportError> {
		let sink =
			self.sink.take().ok_or(TransportError::StdioUnavailable { what: "stdin".to_string() })?;
		let source = self
			.source
			.take()
			.ok_or(TransportError::StdioUnavailable { what: "stdout".to_string() })?;
		Ok((sink, source))
	}

	async fn terminate(&mut self) {
		if let Err(e) = self.child.start_kill() {
			debug!("Tunnel process already gone: {}", e);
		}
		match self.child.wait().await {
			Ok(status) => info!("Tunnel process terminated ({})", status),
			Err(e) => warn!("Failed to reap tunnel process: {}", e),
		}
	}
}


// vim: ts=4
