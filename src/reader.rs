//! Background reader draining engine output
//!
//! Every line the engine prints is pushed onto the output queue (for marker
//! waits) and echoed to local output, in the order the engine produced it.

use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};
use tokio::task::JoinHandle;
use tracing::{debug, error, warn};

use crate::cancel::CancellationSignal;
use crate::error::RelayError;
use crate::marker::QueueSender;

/// Spawn the output reader as a tokio task
pub fn spawn_output_reader<R, W>(
	source: R,
	echo: W,
	queue: QueueSender,
	cancel: CancellationSignal,
) -> JoinHandle<()>
where
	R: AsyncBufRead + Unpin + Send + 'static,
	W: AsyncWrite + Unpin + Send + 'static,
{
	tokio::spawn(read_output(source, echo, queue, cancel))
}

/// Drain `source` until end of stream, a read error, or cancellation
///
/// Cancellation is only checked between reads.
pub async fn read_output<R, W>(
	mut source: R,
	mut echo: W,
	queue: QueueSender,
	cancel: CancellationSignal,
) where
	R: AsyncBufRead + Unpin,
	W: AsyncWrite + Unpin,
{
	let mut buf = String::new();
	while !cancel.is_set() {
		buf.clear();
		match source.read_line(&mut buf).await {
			Ok(0) => {
				debug!("Engine output closed");
				break;
			}
			Ok(_) => {}
			Err(e) => {
				error!("{}", RelayError::Read { source: e });
				break;
			}
		}

		let line = buf.trim().to_string();
		debug!("Engine output: {}", line);
		if queue.send(line.clone()).is_err() {
			debug!("Output queue dropped, echoing only");
		}
		if let Err(e) = echo_line(&mut echo, &line).await {
			warn!("Failed to echo engine output: {}", e);
		}
	}
	debug!("Output reader finished");
}

async fn echo_line<W: AsyncWrite + Unpin>(echo: &mut W, line: &str) -> std::io::Result<()> {
	echo.write_all(line.as_bytes()).await?;
	echo.write_all(b"\n").await?;
	echo.flush().await
}


// vim: ts=4
