use crate::cli::GlobalArgs;
use freight_ops::agents::{AgentOptions, AgentRuntime, GeneratorSource};
use freight_ops::config::{AppConfig, ModelTier};
use freight_ops::domain::DutyStatus;
use freight_ops::error::AppError;
use freight_ops::telemetry;
use serde::de::DeserializeOwned;
use std::path::{Path, PathBuf};
use tracing::info;

const RULE_WIDTH: usize = 80;

/// Loaded configuration plus the flags every command shares.
pub(crate) struct Session {
    pub(crate) config: AppConfig,
    pub(crate) options: AgentOptions,
    export_decisions: Option<PathBuf>,
}

impl Session {
    pub(crate) fn start(args: &GlobalArgs) -> Result<Self, AppError> {
        let config = AppConfig::load()?;
        telemetry::init(&config.telemetry)?;

        let options = AgentOptions {
            tier: if args.fallback_model {
                ModelTier::Fallback
            } else {
                ModelTier::Primary
            },
            generator: if args.offline {
                GeneratorSource::Offline
            } else {
                GeneratorSource::Configured
            },
        };

        info!(
            environment = ?config.environment,
            offline = args.offline,
            fallback_model = args.fallback_model,
            "freight_ops_started"
        );

        Ok(Self {
            config,
            options,
            export_decisions: args.export_decisions.clone(),
        })
    }

    /// Write one agent's decisions to the `--export-decisions` path, if set.
    pub(crate) fn export(&self, runtime: &AgentRuntime) -> Result<(), AppError> {
        if let Some(path) = &self.export_decisions {
            write_decisions(runtime, path)?;
        }
        Ok(())
    }

    /// Like [`Session::export`] for runs with several agents: each log goes
    /// to `<stem>_<agent>.json` next to the requested path.
    pub(crate) fn export_each(&self, runtimes: &[&AgentRuntime]) -> Result<(), AppError> {
        let Some(path) = &self.export_decisions else {
            return Ok(());
        };
        let stem = path
            .file_stem()
            .and_then(|stem| stem.to_str())
            .unwrap_or("decisions");
        for runtime in runtimes {
            let target = path.with_file_name(format!("{stem}_{}.json", runtime.name()));
            write_decisions(runtime, &target)?;
        }
        Ok(())
    }
}

fn write_decisions(runtime: &AgentRuntime, path: &Path) -> Result<(), AppError> {
    let written = runtime.export_decisions(path)?;
    println!(
        "Exported {written} {} decisions to {}",
        runtime.name(),
        path.display()
    );
    Ok(())
}

pub(crate) fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T, AppError> {
    let raw = std::fs::read_to_string(path)?;
    Ok(serde_json::from_str(&raw)?)
}

pub(crate) fn parse_duty_status(raw: &str) -> Result<DutyStatus, String> {
    match raw.trim().to_ascii_lowercase().replace('-', "_").as_str() {
        "driving" => Ok(DutyStatus::Driving),
        "on_duty" => Ok(DutyStatus::OnDuty),
        "off_duty" => Ok(DutyStatus::OffDuty),
        "sleeper" => Ok(DutyStatus::Sleeper),
        other => Err(format!(
            "unknown duty status '{other}' (expected driving, on_duty, off_duty or sleeper)"
        )),
    }
}

pub(crate) fn banner(title: &str) {
    println!("\n{}", "=".repeat(RULE_WIDTH));
    println!("{title}");
    println!("{}", "=".repeat(RULE_WIDTH));
}

pub(crate) fn closing_rule() {
    println!("{}", "=".repeat(RULE_WIDTH));
}

pub(crate) fn bullet_list(heading: &str, items: &[String]) {
    if items.is_empty() {
        return;
    }
    println!("{heading}:");
    for item in items {
        println!("  - {item}");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn duty_status_accepts_dashes_and_case() {
        assert_eq!(parse_duty_status("On-Duty"), Ok(DutyStatus::OnDuty));
        assert_eq!(parse_duty_status("driving"), Ok(DutyStatus::Driving));
        assert!(parse_duty_status("resting").is_err());
    }

    #[test]
    fn read_json_reports_malformed_input() {
        let dir = tempfile::tempdir().expect("temp dir");
        let path = dir.path().join("loads.json");
        std::fs::write(&path, "[{").expect("write");

        let result: Result<Vec<serde_json::Value>, AppError> = read_json(&path);
        assert!(matches!(result, Err(AppError::Input(_))));
    }
}
