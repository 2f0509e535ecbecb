//! Relay session lifecycle
//!
//! Wires the transport, the output reader, the output queue and the relay
//! together, runs the console loop and tears everything down in order:
//! cancel, close the command sink, join the reader, terminate the transport.

use std::future::Future;
use tokio::io::{AsyncBufRead, AsyncWrite};
use tracing::{error, info};

use crate::cancel::CancellationSignal;
use crate::console::{run_console, ExitReason};
use crate::error::RelayError;
use crate::marker::output_queue;
use crate::reader::spawn_output_reader;
use crate::relay::{Relay, RelayOptions};
use crate::transport::Transport;

/// Run one relay session over `transport`
///
/// `input` supplies local commands, `echo` receives every engine output line
/// and `interrupt` ends the session early when it completes. Joining the
/// output reader waits until the engine closes its output if it is still
/// mid-read when the session ends.
pub async fn run_session<T, I, E, F>(
	transport: &mut T,
	input: I,
	echo: E,
	options: RelayOptions,
	interrupt: F,
) -> Result<ExitReason, RelayError>
where
	T: Transport,
	I: AsyncBufRead + Unpin,
	E: AsyncWrite + Unpin + Send + 'static,
	F: Future<Output = ()>,
{
	let (sink, source) = transport.take_streams()?;
	let cancel = CancellationSignal::new();
	let (queue_tx, queue) = output_queue();
	let reader = spawn_output_reader(source, echo, queue_tx, cancel.clone());

	let mut relay = Relay::new(sink, queue, cancel, options);
	let reason = run_console(input, &mut relay, interrupt).await;
	info!("Console loop ended: {:?}", reason);

	// Closing the sink lets the engine see end of input.
	drop(relay);
	if let Err(e) = reader.await {
		error!("Output reader task failed: {}", e);
	}

	transport.terminate().await;
	info!("Relay session terminated.");
	Ok(reason)
}

// vim: ts=4
