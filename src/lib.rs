//! # UciRelay - Remote UCI Engine Relay
//!
//! UciRelay lets a local chess GUI drive an engine running on a remote host
//! as if it were local. Commands read from standard input are forwarded
//! through an SSH tunnel (plink or ssh) and every engine output line is
//! echoed to standard output.
//!
//! The relay enforces the rule that only one analysis runs at a time: a
//! command arriving during `go infinite` first stops the search and waits
//! for its `bestmove`.
//!
//! ## Embedding
//!
//! ```rust,ignore
//! use ucirelay::{run_session, Config, ProcessTransport, RelayOptions};
//! use tokio::io::{stdin, stdout, BufReader};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = Config::load("config.json".as_ref())?;
//!     let mut transport = ProcessTransport::open(&config)?;
//!     let interrupt = async {
//!         let _ = tokio::signal::ctrl_c().await;
//!     };
//!     run_session(&mut transport, BufReader::new(stdin()), stdout(), (&config).into(), interrupt)
//!         .await?;
//!     Ok(())
//! }
//! ```

pub mod cancel;
pub mod config;
pub mod console;
pub mod error;
pub mod logging;
pub mod marker;
pub mod protocol;
pub mod reader;
pub mod relay;
pub mod session;
pub mod transport;
pub mod validation;

// Re-export commonly used types and functions
pub use cancel::CancellationSignal;
pub use config::{Config, TransportKind};
pub use console::ExitReason;
pub use error::{ConfigError, RelayError, TransportError};
pub use protocol::{Command, Marker};
pub use relay::{AnalysisState, Flow, Relay, RelayOptions};
pub use session::run_session;
pub use transport::{ProcessTransport, Transport};

// vim: ts=4
