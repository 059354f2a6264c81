//! Output channels for run reports.
//!
//! Each report is written twice: once as a console line for the operator and
//! once as a JSON record appended to the audit log. Successes go to stdout,
//! everything else to stderr.

use crate::InjectorError;
use injector_types::{InjectionReport, ReportLevel};
use serde_json::json;
use std::path::PathBuf;
use tokio::io::AsyncWriteExt;

/// Writes reports to the console and the audit log.
pub struct Reporter {
	audit_log: PathBuf,
}

impl Reporter {
	pub fn new(audit_log: impl Into<PathBuf>) -> Self {
		Self {
			audit_log: audit_log.into(),
		}
	}

	/// Emits `report` on both channels.
	pub async fn emit(&self, report: &InjectionReport) -> Result<(), InjectorError> {
		let line = report.to_string();

		match report.level() {
			ReportLevel::Info => {
				println!("{}", line);
				tracing::info!(network = report.network(), "{}", report.message());
			},
			ReportLevel::Error => {
				eprintln!("{}", line);
				tracing::error!(network = report.network(), "{}", report.message());
			},
		}

		self.append(report, &line).await
	}

	async fn append(&self, report: &InjectionReport, line: &str) -> Result<(), InjectorError> {
		let record = json!({
			"level": report.level(),
			"message": line,
			"report": report,
		});
		let mut entry = serde_json::to_string(&record)
			.map_err(|e| InjectorError::Audit(format!("Failed to serialize report: {}", e)))?;
		entry.push('\n');

		if let Some(parent) = self
			.audit_log
			.parent()
			.filter(|p| !p.as_os_str().is_empty())
		{
			tokio::fs::create_dir_all(parent).await.map_err(|e| {
				InjectorError::Audit(format!("Cannot create {}: {}", parent.display(), e))
			})?;
		}

		let mut file = tokio::fs::OpenOptions::new()
			.create(true)
			.append(true)
			.open(&self.audit_log)
			.await
			.map_err(|e| {
				InjectorError::Audit(format!("Cannot open {}: {}", self.audit_log.display(), e))
			})?;

		file.write_all(entry.as_bytes()).await.map_err(|e| {
			InjectorError::Audit(format!("Cannot write {}: {}", self.audit_log.display(), e))
		})?;
		file.flush()
			.await
			.map_err(|e| InjectorError::Audit(format!("Cannot flush audit log: {}", e)))
	}
}
