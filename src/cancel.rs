//! One-shot cancellation flag shared by the output reader and the control flow.
//!
//! Cancellation is cooperative: the reader checks the flag between reads and
//! is never interrupted while blocked on the engine.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Clone it to observe the same cancellation event
#[derive(Debug, Clone, Default)]
pub struct CancellationSignal {
	flag: Arc<AtomicBool>,
}

impl CancellationSignal {
	pub fn new() -> Self {
		Self::default()
	}

	/// Request cancellation. Setting it again has no further effect.
	pub fn set(&self) {
		self.flag.store(true, Ordering::SeqCst);
	}

	pub fn is_set(&self) -> bool {
		self.flag.load(Ordering::SeqCst)
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_set_is_seen_by_clones() {
		let signal = CancellationSignal::new();
		let observer = signal.clone();
		assert!(!observer.is_set());

		let handle = std::thread::spawn(move || signal.set());
		handle.join().unwrap();

		assert!(observer.is_set());
	}
}

// vim: ts=4
