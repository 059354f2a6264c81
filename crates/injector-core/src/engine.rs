//! Drives a single injection run from preconditions to report.

use crate::injector::failure_report;
use crate::{prepare, FundInjector, InjectionContext, InjectorError, Preparation, Reporter};
use injector_config::Config;
use injector_delivery::{DeliveryError, LotteryChain};
use injector_types::{InjectionReport, SecretString};

/// Runs the injector once per invocation.
///
/// Handled outcomes (success, submission failure, unsupported network) are
/// reported and returned as `Ok`. Precondition failures are returned as `Err`
/// and must end the process with a failing status.
pub struct InjectorEngine {
	config: Config,
	reporter: Reporter,
}

impl InjectorEngine {
	pub fn new(config: Config) -> Self {
		let reporter = Reporter::new(config.logging.audit_log.clone());
		Self { config, reporter }
	}

	/// Builds an engine that writes to a specific reporter.
	pub fn with_reporter(config: Config, reporter: Reporter) -> Self {
		Self { config, reporter }
	}

	/// Executes one run against `network_name`.
	///
	/// `connect` builds the chain client and is only called once every
	/// precondition holds; a connection error is reported like any other
	/// submission failure.
	pub async fn run<F>(
		&self,
		network_name: &str,
		private_key: Option<SecretString>,
		connect: F,
	) -> Result<InjectionReport, InjectorError>
	where
		F: FnOnce(&InjectionContext) -> Result<Box<dyn LotteryChain>, DeliveryError>,
	{
		let report = match prepare(network_name, &self.config, private_key)? {
			Preparation::Unsupported { network } => InjectionReport::unsupported(network),
			Preparation::Ready(context) => {
				tracing::info!(
					network = %context.network,
					lottery = %context.lottery,
					signer = %context.signer_address(),
					"Injecting funds"
				);
				match connect(&context) {
					Ok(chain) => FundInjector::new(chain).run(&context).await,
					Err(e) => failure_report(&context, &e),
				}
			},
		};

		// Audit failures are logged only; the console line is already out.
		if let Err(e) = self.reporter.emit(&report).await {
			tracing::error!(network = %report.network(), "Failed to record outcome: {}", e);
		}
		Ok(report)
	}
}
