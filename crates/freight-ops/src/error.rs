use crate::agents::AgentError;
use crate::config::ConfigError;
use crate::decisions::DecisionExportError;
use crate::domain::LoadError;
use crate::imports::RecordImportError;
use crate::telemetry::TelemetryError;
use std::fmt;

/// Everything an entry point can fail with.
#[derive(Debug)]
pub enum AppError {
    Config(ConfigError),
    Telemetry(TelemetryError),
    Io(std::io::Error),
    Agent(AgentError),
    Load(LoadError),
    Import(RecordImportError),
    Export(DecisionExportError),
    Input(serde_json::Error),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::Config(err) => write!(f, "configuration error: {}", err),
            AppError::Telemetry(err) => write!(f, "telemetry error: {}", err),
            AppError::Io(err) => write!(f, "io error: {}", err),
            AppError::Agent(err) => write!(f, "agent error: {}", err),
            AppError::Load(err) => write!(f, "invalid load: {}", err),
            AppError::Import(err) => write!(f, "import error: {}", err),
            AppError::Export(err) => write!(f, "export error: {}", err),
            AppError::Input(err) => write!(f, "invalid input: {}", err),
        }
    }
}

impl std::error::Error for AppError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            AppError::Config(err) => Some(err),
            AppError::Telemetry(err) => Some(err),
            AppError::Io(err) => Some(err),
            AppError::Agent(err) => Some(err),
            AppError::Load(err) => Some(err),
            AppError::Import(err) => Some(err),
            AppError::Export(err) => Some(err),
            AppError::Input(err) => Some(err),
        }
    }
}

impl From<ConfigError> for AppError {
    fn from(value: ConfigError) -> Self {
        Self::Config(value)
    }
}

impl From<TelemetryError> for AppError {
    fn from(value: TelemetryError) -> Self {
        Self::Telemetry(value)
    }
}

impl From<std::io::Error> for AppError {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value)
    }
}

impl From<AgentError> for AppError {
    fn from(value: AgentError) -> Self {
        Self::Agent(value)
    }
}

impl From<LoadError> for AppError {
    fn from(value: LoadError) -> Self {
        Self::Load(value)
    }
}

impl From<RecordImportError> for AppError {
    fn from(value: RecordImportError) -> Self {
        Self::Import(value)
    }
}

impl From<DecisionExportError> for AppError {
    fn from(value: DecisionExportError) -> Self {
        Self::Export(value)
    }
}

impl From<serde_json::Error> for AppError {
    fn from(value: serde_json::Error) -> Self {
        Self::Input(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error;

    #[test]
    fn wraps_config_errors_with_source() {
        let err = AppError::from(ConfigError::MissingAgentAssignment("dispatch".to_string()));
        assert_eq!(
            err.to_string(),
            "configuration error: no LLM configuration found for agent: dispatch"
        );
        assert!(err.source().is_some());
    }

    #[test]
    fn load_errors_name_the_load() {
        let err = AppError::from(LoadError::NonPositiveWeight {
            load_id: "LOAD-9".to_string(),
        });
        assert!(err.to_string().contains("LOAD-9"));
    }
}
