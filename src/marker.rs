//! Ordered output queue and marker synchronization
//!
//! The output reader is the single producer; the relay is the single
//! consumer. Waiting for a marker consumes every queued line up to and
//! including the first line that contains it.

use std::time::Duration;
use tokio::sync::mpsc;
use tracing::debug;

use crate::error::RelayError;
use crate::protocol::Marker;

/// Producer half of the output queue
pub type QueueSender = mpsc::UnboundedSender<String>;

/// Create a connected output queue
pub fn output_queue() -> (QueueSender, OutputQueue) {
	let (tx, rx) = mpsc::unbounded_channel();
	(tx, OutputQueue { rx })
}

/// Consumer half of the output queue
#[derive(Debug)]
pub struct OutputQueue {
	rx: mpsc::UnboundedReceiver<String>,
}

impl OutputQueue {
	/// Consume lines until one contains `marker`
	///
	/// With `timeout` set to `None` this waits as long as the engine keeps
	/// the stream open. Lines consumed before a timeout stay consumed.
	pub async fn wait_for(
		&mut self,
		marker: Marker,
		timeout: Option<Duration>,
	) -> Result<(), RelayError> {
		debug!("Waiting for marker '{}'", marker);
		match timeout {
			None => self.drain_until(marker).await,
			Some(limit) => match tokio::time::timeout(limit, self.drain_until(marker)).await {
				Ok(result) => result,
				Err(_) => Err(RelayError::MarkerTimeout { marker, waited: limit }),
			},
		}
	}

	async fn drain_until(&mut self, marker: Marker) -> Result<(), RelayError> {
		while let Some(line) = self.rx.recv().await {
			if marker.matches(&line) {
				debug!("Marker '{}' found in output", marker);
				return Ok(());
			}
		}
		Err(RelayError::OutputClosed { marker })
	}

	/// Pop the next queued line without waiting
	pub fn try_next(&mut self) -> Option<String> {
		self.rx.try_recv().ok()
	}
}


// vim: ts=4
