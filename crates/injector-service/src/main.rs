//! Main entry point for the lottery injector.
//!
//! Injects the configured amount of funds into the current round of the
//! lottery contract on the selected network, reports the outcome once and
//! exits. Each invocation is a single attempt.

use clap::Parser;
use injector_config::Config;
use injector_core::InjectorEngine;
use injector_delivery::implementations::evm::alloy::AlloyLotteryChain;
use injector_delivery::LotteryChain;
use injector_types::SecretString;
use std::path::PathBuf;

/// Command-line arguments for the injector.
///
/// Every argument is optional; a bare invocation reads the network from
/// `INJECTOR_NETWORK`.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
	/// Path to configuration file
	#[arg(short, long, default_value = "config/injector.toml")]
	config: PathBuf,

	/// Network to inject funds on (testnet, mainnet)
	#[arg(short, long, env = "INJECTOR_NETWORK", default_value = "localhost")]
	network: String,

	/// Log level (trace, debug, info, warn, error)
	#[arg(short, long, default_value = "info")]
	log_level: String,
}

/// Main entry point for the injector.
///
/// This function:
/// 1. Parses command-line arguments
/// 2. Initializes logging infrastructure
/// 3. Loads configuration from file
/// 4. Runs one injection and reports it
///
/// Handled outcomes exit with status 0. Anything returned as an error
/// (unreadable config, missing key, zero contract address) exits non-zero.
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
	let args = Args::parse();

	use tracing_subscriber::{fmt, EnvFilter};

	let env_filter =
		EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&args.log_level));

	fmt()
		.with_env_filter(env_filter)
		.with_writer(std::io::stderr)
		.with_target(true)
		.init();

	let config = Config::from_file(&args.config).await?;
	tracing::debug!(
		config = %args.config.display(),
		audit_log = %config.logging.audit_log.display(),
		"Loaded configuration"
	);

	let private_key = SecretString::from_env(&config.injector.private_key_env);
	let engine = InjectorEngine::new(config);

	let report = engine
		.run(&args.network, private_key, |context| {
			let chain = AlloyLotteryChain::new(&context.rpc_url, context.signer.clone())?;
			Ok(Box::new(chain) as Box<dyn LotteryChain>)
		})
		.await
		.inspect_err(|e| tracing::error!(network = %args.network, "Injection aborted: {}", e))?;

	tracing::debug!(level = ?report.level(), "Run complete");
	Ok(())
}
