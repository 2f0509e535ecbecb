//! Engine protocol vocabulary
//!
//! The relay does not parse UCI. It only needs to recognize the handful of
//! commands that change its own state or that end with a known response line.

use std::fmt;

/// Sentinel substring that ends a protocol response segment
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Marker {
	/// Reply to `uci`
	UciOk,
	/// Reply to `isready`
	ReadyOk,
	/// End of a search
	BestMove,
}

impl Marker {
	pub fn as_str(&self) -> &'static str {
		match self {
			Marker::UciOk => "uciok",
			Marker::ReadyOk => "readyok",
			Marker::BestMove => "bestmove",
		}
	}

	/// Check whether an output line carries this marker
	pub fn matches(&self, line: &str) -> bool {
		line.contains(self.as_str())
	}
}

impl fmt::Display for Marker {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}

/// A local command line, kept verbatim for forwarding
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Command {
	text: String,
}

impl Command {
	/// Literal command used to interrupt an analysis
	pub const STOP: &'static str = "stop";

	pub fn new(text: impl Into<String>) -> Self {
		Command { text: text.into() }
	}

	/// Text as received, sent downstream unchanged
	pub fn text(&self) -> &str {
		&self.text
	}

	fn trimmed(&self) -> &str {
		self.text.trim()
	}

	pub fn is_quit(&self) -> bool {
		self.trimmed().eq_ignore_ascii_case("quit")
	}

	pub fn is_stop(&self) -> bool {
		self.trimmed().eq_ignore_ascii_case(Self::STOP)
	}

	/// `go infinite` starts an open-ended search that only `stop` ends
	pub fn starts_infinite_analysis(&self) -> bool {
		self.trimmed().starts_with("go infinite")
	}

	fn is_go(&self) -> bool {
		self.trimmed().split_whitespace().next() == Some("go")
	}

	/// Any `infinite` token means the search runs until `stop`
	fn has_infinite(&self) -> bool {
		self.trimmed().split_whitespace().any(|token| token == "infinite")
	}

	/// Marker that ends the engine's response to this command, if any
	pub fn response_marker(&self) -> Option<Marker> {
		match self.trimmed() {
			"uci" => Some(Marker::UciOk),
			"isready" => Some(Marker::ReadyOk),
			_ if self.is_go() && !self.has_infinite() => Some(Marker::BestMove),
			_ => None,
		}
	}
}


// vim: ts=4
