use clap::{Arg, ArgAction, Command};
use std::path::PathBuf;
use std::process;
use tokio::io::{stdin, stdout, BufReader};
use tracing::{error, info, warn};

use ucirelay::config::{default_config_path, Config};
use ucirelay::logging::init_tracing;
use ucirelay::{run_session, ProcessTransport, RelayOptions};

/// Completes on Ctrl-C; never completes if the handler cannot be installed
async fn interrupted() {
	if let Err(e) = tokio::signal::ctrl_c().await {
		warn!("Failed to setup Ctrl-C handler: {}. Interrupts will not be handled.", e);
		std::future::pending::<()>().await;
	}
}

async fn relay(config: Config) -> i32 {
	let mut transport = match ProcessTransport::open(&config) {
		Ok(transport) => transport,
		Err(e) => {
			error!("Error starting tunnel: {}", e);
			eprintln!("Error: {}", e);
			return 1;
		}
	};

	let options = RelayOptions::from(&config);
	match run_session(&mut transport, BufReader::new(stdin()), stdout(), options, interrupted())
		.await
	{
		Ok(reason) => {
			info!("Remote engine relay terminated ({:?}).", reason);
			0
		}
		Err(e) => {
			error!("Error running relay: {}", e);
			eprintln!("Error: {}", e);
			1
		}
	}
}

fn main() {
	let matches = Command::new("UciRelay")
		.version(env!("CARGO_PKG_VERSION"))
		.about("Relay a UCI engine running on a remote host")
		.arg(
			Arg::new("config")
				.short('c')
				.long("config")
				.value_name("FILE")
				.value_parser(clap::value_parser!(PathBuf))
				.help("Configuration file (default: config.json next to the executable)"),
		)
		.arg(
			Arg::new("check")
				.long("check")
				.action(ArgAction::SetTrue)
				.help("Validate the configuration, print it and exit"),
		)
		.get_matches();

	let config_path =
		matches.get_one::<PathBuf>("config").cloned().unwrap_or_else(default_config_path);
	let config = match Config::load(&config_path) {
		Ok(config) => config,
		Err(e) => {
			eprintln!("Error: {}", e);
			process::exit(1);
		}
	};

	if matches.get_flag("check") {
		match serde_json::to_string_pretty(&config) {
			Ok(json) => println!("{}", json),
			Err(e) => {
				eprintln!("Error: {}", e);
				process::exit(1);
			}
		}
		return;
	}

	if let Err(e) = init_tracing(&config) {
		eprintln!("Error: cannot open log file {}: {}", config.log_file.display(), e);
		process::exit(1);
	}
	info!("Starting remote engine relay.");

	let runtime = match tokio::runtime::Runtime::new() {
		Ok(runtime) => runtime,
		Err(e) => {
			eprintln!("Error: cannot start runtime: {}", e);
			process::exit(1);
		}
	};
	let code = runtime.block_on(relay(config));
	// Standard input is read on a blocking thread that may still be parked
	// in a read; do not wait for it.
	runtime.shutdown_background();
	process::exit(code);
}

// vim: ts=4
