//! Command relay state machine
//!
//! Decides, for each local command, whether to forward it right away, to
//! interrupt a running analysis first, or to hold it back. Only one analysis
//! may run on the engine at a time and it must be stopped before any other
//! command is sent.
//!
//! A command that arrives during an analysis is held in a single pending
//! slot. By default it is sent after the *next* local command has been
//! handled, so it reaches the engine after that command. With
//! `flush_pending_after_stop` it is sent as soon as the interrupted search
//! reports its best move.

use std::time::Duration;
use tokio::io::{AsyncWrite, AsyncWriteExt};
use tracing::{debug, error, info, warn};

use crate::cancel::CancellationSignal;
use crate::config::Config;
use crate::error::RelayError;
use crate::marker::OutputQueue;
use crate::protocol::{Command, Marker};

/// Whether the engine is running an open-ended search
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnalysisState {
	Idle,
	Analyzing,
}

/// What the console loop should do after a command
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
	Continue,
	Quit,
}

/// Tunables for the relay
#[derive(Debug, Clone, Default)]
pub struct RelayOptions {
	/// Limit for each marker wait, `None` waits forever
	pub marker_timeout: Option<Duration>,

	/// Send the pending command right after an interruption completes
	pub flush_pending_after_stop: bool,
}

impl From<&Config> for RelayOptions {
	fn from(config: &Config) -> Self {
		RelayOptions {
			marker_timeout: config.marker_timeout(),
			flush_pending_after_stop: config.flush_pending_after_stop,
		}
	}
}

/// Relay between local commands and the engine's command sink
pub struct Relay<W> {
	sink: W,
	queue: OutputQueue,
	cancel: CancellationSignal,
	options: RelayOptions,
	state: AnalysisState,
	pending: Option<Command>,
}

impl<W: AsyncWrite + Unpin> Relay<W> {
	pub fn new(
		sink: W,
		queue: OutputQueue,
		cancel: CancellationSignal,
		options: RelayOptions,
	) -> Self {
		Relay { sink, queue, cancel, options, state: AnalysisState::Idle, pending: None }
	}

	pub fn state(&self) -> AnalysisState {
		self.state
	}

	/// Command held back until the engine is idle
	pub fn pending(&self) -> Option<&Command> {
		self.pending.as_ref()
	}

	pub fn sink(&self) -> &W {
		&self.sink
	}

	/// Ask the output reader to stop at its next read
	pub fn cancel(&self) {
		self.cancel.set();
	}

	/// Process one local command line
	pub async fn handle(&mut self, line: &str) -> Result<Flow, RelayError> {
		let command = Command::new(line);
		debug!("User input: {}", command.text().trim());

		if command.is_quit() {
			if let Err(e) = self.send(command.text()).await {
				error!("{}", e);
			}
			self.cancel.set();
			return Ok(Flow::Quit);
		}

		if self.state == AnalysisState::Analyzing && !command.is_stop() {
			return self.interrupt(command).await;
		}

		self.send(command.text()).await?;
		if command.starts_infinite_analysis() {
			self.state = AnalysisState::Analyzing;
		} else if command.is_stop() {
			self.state = AnalysisState::Idle;
		}

		if let Some(marker) = command.response_marker() {
			self.wait(marker).await?;
		}

		if self.state == AnalysisState::Idle {
			self.flush_pending().await?;
		}
		Ok(Flow::Continue)
	}

	/// Stop the running analysis and hold `command` back
	async fn interrupt(&mut self, command: Command) -> Result<Flow, RelayError> {
		info!("Engine is analyzing. Sending 'stop' command.");
		if let Some(dropped) = self.pending.replace(command) {
			warn!("Discarding unsent command: {}", dropped.text().trim());
		}

		self.send(Command::STOP).await?;
		let stopped = self.wait(Marker::BestMove).await;
		self.state = AnalysisState::Idle;
		stopped?;

		if self.options.flush_pending_after_stop {
			self.flush_pending().await?;
		}
		Ok(Flow::Continue)
	}

	async fn flush_pending(&mut self) -> Result<(), RelayError> {
		if let Some(command) = self.pending.take() {
			info!("Processing queued command: {}", command.text().trim());
			self.send(command.text()).await?;
		}
		Ok(())
	}

	async fn wait(&mut self, marker: Marker) -> Result<(), RelayError> {
		self.queue.wait_for(marker, self.options.marker_timeout).await
	}

	async fn send(&mut self, text: &str) -> Result<(), RelayError> {
		debug!("Sending to engine: {}", text);
		let to_error = |source| RelayError::Write { command: text.to_string(), source };
		self.sink.write_all(text.as_bytes()).await.map_err(to_error)?;
		self.sink.write_all(b"\n").await.map_err(to_error)?;
		self.sink.flush().await.map_err(to_error)
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::marker::{output_queue, QueueSender};

	fn new_relay(options: RelayOptions) -> (Relay<Vec<u8>>, QueueSender, CancellationSignal) {
		let (tx, queue) = output_queue();
		let cancel = CancellationSignal::new();
		(Relay::new(Vec::new(), queue, cancel.clone(), options), tx, cancel)
	}

	fn engine_says(tx: &QueueSender, lines: &[&str]) {
		for line in lines {
			tx.send(line.to_string()).unwrap();
		}
	}

	fn sent(relay: &Relay<Vec<u8>>) -> Vec<String> {
		String::from_utf8_lossy(relay.sink()).lines().map(str::to_string).collect()
	}

	#[tokio::test]
	async fn test_uci_waits_for_uciok() {
		let (mut relay, tx, _) = new_relay(RelayOptions::default());
		engine_says(&tx, &["id name X", "uciok", "readyok"]);

		assert_eq!(relay.handle("uci").await.unwrap(), Flow::Continue);

		assert_eq!(sent(&relay), vec!["uci"]);
		assert_eq!(relay.queue.try_next().as_deref(), Some("readyok"));
	}

	#[tokio::test]
	async fn test_plain_commands_are_forwarded_without_waiting() {
		let (mut relay, _tx, _) = new_relay(RelayOptions::default());

		relay.handle("ucinewgame").await.unwrap();
		relay.handle("position startpos moves e2e4").await.unwrap();

		assert_eq!(sent(&relay), vec!["ucinewgame", "position startpos moves e2e4"]);
		assert_eq!(relay.state(), AnalysisState::Idle);
	}

	#[tokio::test]
	async fn test_go_infinite_does_not_block() {
		let (mut relay, _tx, _) = new_relay(RelayOptions::default());

		relay.handle("go infinite").await.unwrap();

		assert_eq!(sent(&relay), vec!["go infinite"]);
		assert_eq!(relay.state(), AnalysisState::Analyzing);
	}

	#[tokio::test]
	async fn test_infinite_token_does_not_wait() {
		let (mut relay, _tx, _) = new_relay(RelayOptions::default());

		for cmd in ["go searchmoves e2e4 infinite", "go  infinite"] {
			let flow = tokio::time::timeout(Duration::from_millis(200), relay.handle(cmd))
				.await
				.expect("handle blocked on bestmove")
				.unwrap();
			assert_eq!(flow, Flow::Continue);
		}

		assert_eq!(sent(&relay), vec!["go searchmoves e2e4 infinite", "go  infinite"]);
		assert_eq!(relay.state(), AnalysisState::Idle);
	}

	#[tokio::test]
	async fn test_stop_while_analyzing_is_forwarded() {
		let (mut relay, _tx, _) = new_relay(RelayOptions::default());

		relay.handle("go infinite").await.unwrap();
		relay.handle("stop").await.unwrap();

		assert_eq!(sent(&relay), vec!["go infinite", "stop"]);
		assert_eq!(relay.state(), AnalysisState::Idle);
		assert!(relay.pending().is_none());
	}

	#[tokio::test]
	async fn test_interruption_defers_command_until_next_input() {
		let (mut relay, tx, _) = new_relay(RelayOptions::default());

		relay.handle("go infinite").await.unwrap();
		engine_says(&tx, &["info depth 30 score cp 20", "bestmove e2e4 ponder e7e5"]);
		relay.handle("go movetime 1000").await.unwrap();

		assert_eq!(sent(&relay), vec!["go infinite", "stop"]);
		assert_eq!(relay.state(), AnalysisState::Idle);
		assert_eq!(relay.pending().map(Command::text), Some("go movetime 1000"));

		engine_says(&tx, &["readyok"]);
		relay.handle("isready").await.unwrap();

		assert_eq!(sent(&relay), vec!["go infinite", "stop", "isready", "go movetime 1000"]);
		assert!(relay.pending().is_none());
	}

	#[tokio::test]
	async fn test_pending_slot_keeps_last_command() {
		let (mut relay, tx, _) = new_relay(RelayOptions::default());

		relay.handle("go infinite").await.unwrap();
		engine_says(&tx, &["bestmove d2d4"]);
		relay.handle("position startpos").await.unwrap();

		// Engine is idle again: a second "go infinite" re-enters analysis
		// while the first pending command is still unsent.
		relay.handle("go infinite").await.unwrap();
		assert_eq!(relay.state(), AnalysisState::Analyzing);
		engine_says(&tx, &["bestmove e2e4"]);
		relay.handle("ucinewgame").await.unwrap();

		assert_eq!(relay.pending().map(Command::text), Some("ucinewgame"));
		assert_eq!(sent(&relay), vec!["go infinite", "stop", "go infinite", "stop"]);
	}

	#[tokio::test]
	async fn test_flush_pending_after_stop() {
		let options = RelayOptions { flush_pending_after_stop: true, ..RelayOptions::default() };
		let (mut relay, tx, _) = new_relay(options);

		relay.handle("go infinite").await.unwrap();
		engine_says(&tx, &["bestmove e2e4"]);
		relay.handle("position startpos moves e2e4").await.unwrap();

		assert_eq!(sent(&relay), vec!["go infinite", "stop", "position startpos moves e2e4"]);
		assert!(relay.pending().is_none());
	}

	#[tokio::test]
	async fn test_quit_in_every_state() {
		for warm_up in &[None, Some("go infinite")] {
			let (mut relay, _tx, cancel) = new_relay(RelayOptions::default());
			if let Some(cmd) = warm_up {
				relay.handle(cmd).await.unwrap();
			}

			assert_eq!(relay.handle(" QUIT").await.unwrap(), Flow::Quit);
			assert_eq!(sent(&relay).last().map(String::as_str), Some(" QUIT"));
			assert!(cancel.is_set());
		}
	}

	#[tokio::test]
	async fn test_marker_timeout_is_reported() {
		let options = RelayOptions {
			marker_timeout: Some(Duration::from_millis(20)),
			..RelayOptions::default()
		};
		let (mut relay, _tx, _) = new_relay(options);

		let err = relay.handle("isready").await.unwrap_err();
		assert!(matches!(err, RelayError::MarkerTimeout { marker: Marker::ReadyOk, .. }));
		assert_eq!(sent(&relay), vec!["isready"]);
	}
}

// vim: ts=4
