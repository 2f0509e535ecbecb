//! Console loop feeding local command lines to the relay

use std::future::Future;
use std::io::ErrorKind;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, Lines};
use tracing::{error, info, warn};

use crate::error::RelayError;
use crate::relay::{Flow, Relay};

/// Why the console loop ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitReason {
	/// `quit` was relayed to the engine
	Quit,
	/// Local input was closed
	EndOfInput,
	/// Local interrupt (Ctrl-C)
	Interrupted,
}

enum Step {
	Next,
	Done(ExitReason),
}

/// Read commands from `input` until quit, end of input or `interrupt` fires
///
/// The interrupt is honored while waiting for input and while a command is
/// being relayed, including a pending marker wait. Cancellation is requested
/// on every exit path.
pub async fn run_console<I, W, F>(input: I, relay: &mut Relay<W>, interrupt: F) -> ExitReason
where
	I: AsyncBufRead + Unpin,
	W: AsyncWrite + Unpin,
	F: Future<Output = ()>,
{
	tokio::pin!(interrupt);
	let mut lines = input.lines();
	let reason = loop {
		let step = tokio::select! {
			_ = &mut interrupt => {
				info!("Interrupted, exiting...");
				Step::Done(ExitReason::Interrupted)
			}
			step = next_command(&mut lines, relay) => step,
		};
		if let Step::Done(reason) = step {
			break reason;
		}
	};
	relay.cancel();
	reason
}

async fn next_command<I, W>(lines: &mut Lines<I>, relay: &mut Relay<W>) -> Step
where
	I: AsyncBufRead + Unpin,
	W: AsyncWrite + Unpin,
{
	match lines.next_line().await {
		Ok(Some(line)) => match relay.handle(&line).await {
			Ok(Flow::Quit) => Step::Done(ExitReason::Quit),
			Ok(Flow::Continue) => Step::Next,
			Err(e) => {
				error!("Error processing input: {}", e);
				Step::Next
			}
		},
		Ok(None) => {
			warn!("Input closed");
			Step::Done(ExitReason::EndOfInput)
		}
		Err(e) if e.kind() == ErrorKind::InvalidData => {
			error!("{}", RelayError::Input { source: e });
			Step::Next
		}
		Err(e) => {
			error!("{}", RelayError::Input { source: e });
			Step::Done(ExitReason::EndOfInput)
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::cancel::CancellationSignal;
	use crate::marker::output_queue;
	use crate::relay::RelayOptions;
	use std::future::pending;
	use std::io;
	use std::pin::Pin;
	use std::task::{Context, Poll};

	/// Sink whose first write fails with a broken pipe
	struct FlakySink {
		fail_next: bool,
		written: Vec<u8>,
	}

	impl AsyncWrite for FlakySink {
		fn poll_write(
			mut self: Pin<&mut Self>,
			_cx: &mut Context<'_>,
			buf: &[u8],
		) -> Poll<io::Result<usize>> {
			if self.fail_next {
				self.fail_next = false;
				return Poll::Ready(Err(io::Error::new(ErrorKind::BrokenPipe, "engine gone")));
			}
			self.written.extend_from_slice(buf);
			Poll::Ready(Ok(buf.len()))
		}

		fn poll_flush(self: Pin<&mut Self>, _cx: &mut Context<'_>) -> Poll<io::Result<()>> {
			Poll::Ready(Ok(()))
		}

		fn poll_shutdown(self: Pin<&mut Self>, _cx: &mut Context<'_>) -> Poll<io::Result<()>> {
			Poll::Ready(Ok(()))
		}
	}

	#[tokio::test]
	async fn test_end_of_input_cancels() {
		let (_tx, queue) = output_queue();
		let cancel = CancellationSignal::new();
		let mut relay = Relay::new(Vec::<u8>::new(), queue, cancel.clone(), RelayOptions::default());

		let reason = run_console(&b"ucinewgame\n"[..], &mut relay, pending()).await;

		assert_eq!(reason, ExitReason::EndOfInput);
		assert!(cancel.is_set());
		assert_eq!(relay.sink().as_slice(), b"ucinewgame\n");
	}

	#[tokio::test]
	async fn test_quit_stops_reading() {
		let (_tx, queue) = output_queue();
		let mut relay =
			Relay::new(Vec::<u8>::new(), queue, CancellationSignal::new(), RelayOptions::default());

		let reason = run_console(&b"quit\nisready\n"[..], &mut relay, pending()).await;

		assert_eq!(reason, ExitReason::Quit);
		assert_eq!(relay.sink().as_slice(), b"quit\n");
	}

	#[tokio::test]
	async fn test_interrupt_during_marker_wait() {
		let (_tx, queue) = output_queue();
		let cancel = CancellationSignal::new();
		let mut relay = Relay::new(Vec::<u8>::new(), queue, cancel.clone(), RelayOptions::default());
		let interrupt = tokio::time::sleep(std::time::Duration::from_millis(30));

		let reason = run_console(&b"isready\n"[..], &mut relay, interrupt).await;

		assert_eq!(reason, ExitReason::Interrupted);
		assert!(cancel.is_set());
	}

	#[tokio::test]
	async fn test_relay_errors_do_not_end_the_loop() {
		let (tx, queue) = output_queue();
		drop(tx);
		let mut relay =
			Relay::new(Vec::<u8>::new(), queue, CancellationSignal::new(), RelayOptions::default());

		let reason = run_console(&b"isready\nucinewgame\n"[..], &mut relay, pending()).await;

		assert_eq!(reason, ExitReason::EndOfInput);
		assert_eq!(relay.sink().as_slice(), b"isready\nucinewgame\n");
	}

	#[tokio::test]
	async fn test_write_failure_does_not_end_the_loop() {
		let (_tx, queue) = output_queue();
		let sink = FlakySink { fail_next: true, written: Vec::new() };
		let mut relay = Relay::new(sink, queue, CancellationSignal::new(), RelayOptions::default());

		let reason =
			run_console(&b"ucinewgame\nposition startpos\n"[..], &mut relay, pending()).await;

		assert_eq!(reason, ExitReason::EndOfInput);
		assert_eq!(relay.sink().written.as_slice(), b"position startpos\n");
	}
}

// vim: ts=4
