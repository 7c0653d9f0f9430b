mod business;
mod llm;

pub use business::{
    BusinessConfig, CompanyInfo, Coordinates, EquipmentConfig, HomeBase, IftaSettings,
    OperatingCosts, RateThresholds, TrailerSpec, TruckSpec,
};
pub use llm::{AgentModelConfig, Credentials, LlmConfig, ModelConfig, ModelTier, Provider};

use std::env;
use std::fmt;
use std::path::{Path, PathBuf};

const BUSINESS_CONFIG_FILE: &str = "config.yaml";
const LLM_CONFIG_FILE: &str = "llms.json";

/// Distinguishes runtime behavior for different stages of the deployment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEnvironment {
    Development,
    Test,
    Production,
}

impl AppEnvironment {
    fn from_str(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "prod" | "production" => Self::Production,
            "test" | "ci" => Self::Test,
            _ => Self::Development,
        }
    }
}

/// Top-level configuration, built once at startup and handed to each agent.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub environment: AppEnvironment,
    pub telemetry: TelemetryConfig,
    pub config_dir: PathBuf,
    pub business: BusinessConfig,
    pub llm: LlmConfig,
    pub credentials: Credentials,
}

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let environment = AppEnvironment::from_str(
            &env::var("APP_ENV").unwrap_or_else(|_| "development".to_string()),
        );

        let log_level = env::var("APP_LOG_LEVEL").unwrap_or_else(|_| "info".to_string());
        let log_format = match env::var("APP_LOG_FORMAT") {
            Ok(raw) => LogFormat::parse(&raw)?,
            Err(_) => LogFormat::Compact,
        };

        let config_dir =
            PathBuf::from(env::var("FREIGHT_CONFIG_DIR").unwrap_or_else(|_| "config".to_string()));
        let business = read_business_config(&config_dir.join(BUSINESS_CONFIG_FILE))?;
        let llm = read_llm_config(&config_dir.join(LLM_CONFIG_FILE))?;

        Ok(Self {
            environment,
            telemetry: TelemetryConfig {
                log_level,
                format: log_format,
            },
            config_dir,
            business,
            llm,
            credentials: Credentials::from_env(),
        })
    }

    /// Assemble a configuration without touching the environment or filesystem.
    pub fn from_parts(business: BusinessConfig, llm: LlmConfig, credentials: Credentials) -> Self {
        Self {
            environment: AppEnvironment::Test,
            telemetry: TelemetryConfig::default(),
            config_dir: PathBuf::from("config"),
            business,
            llm,
            credentials,
        }
    }
}

fn read_business_config(path: &Path) -> Result<BusinessConfig, ConfigError> {
    let raw = read_config_file(path)?;
    BusinessConfig::from_yaml_str(&raw).map_err(|source| ConfigError::InvalidYaml {
        path: path.to_path_buf(),
        source,
    })
}

fn read_llm_config(path: &Path) -> Result<LlmConfig, ConfigError> {
    let raw = read_config_file(path)?;
    LlmConfig::from_json_str(&raw).map_err(|source| ConfigError::InvalidJson {
        path: path.to_path_buf(),
        source,
    })
}

fn read_config_file(path: &Path) -> Result<String, ConfigError> {
    std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })
}

/// Tracing controls.
#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    pub log_level: String,
    pub format: LogFormat,
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            format: LogFormat::Compact,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Compact,
    Json,
}

impl LogFormat {
    fn parse(value: &str) -> Result<Self, ConfigError> {
        match value.trim().to_ascii_lowercase().as_str() {
            "compact" | "text" => Ok(Self::Compact),
            "json" => Ok(Self::Json),
            _ => Err(ConfigError::InvalidLogFormat(value.to_string())),
        }
    }
}

#[derive(Debug)]
pub enum ConfigError {
    InvalidLogFormat(String),
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    InvalidYaml {
        path: PathBuf,
        source: serde_yml::Error,
    },
    InvalidJson {
        path: PathBuf,
        source: serde_json::Error,
    },
    MissingAgentAssignment(String),
    MissingApiKey(Provider),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidLogFormat(value) => {
                write!(f, "APP_LOG_FORMAT must be 'compact' or 'json' (found '{value}')")
            }
            ConfigError::Read { path, .. } => {
                write!(f, "unable to read config file {}", path.display())
            }
            ConfigError::InvalidYaml { path, .. } | ConfigError::InvalidJson { path, .. } => {
                write!(f, "config file {} is malformed", path.display())
            }
            ConfigError::MissingAgentAssignment(agent) => {
                write!(f, "no LLM configuration found for agent: {agent}")
            }
            ConfigError::MissingApiKey(provider) => {
                write!(f, "API key for provider '{provider}' is not set")
            }
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::Read { source, .. } => Some(source),
            ConfigError::InvalidYaml { source, .. } => Some(source),
            ConfigError::InvalidJson { source, .. } => Some(source),
            ConfigError::InvalidLogFormat(_)
            | ConfigError::MissingAgentAssignment(_)
            | ConfigError::MissingApiKey(_) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;
    use std::sync::{Mutex, OnceLock};

    fn env_guard() -> &'static Mutex<()> {
        static GUARD: OnceLock<Mutex<()>> = OnceLock::new();
        GUARD.get_or_init(|| Mutex::new(()))
    }

    fn reset_env() {
        env::remove_var("APP_ENV");
        env::remove_var("APP_LOG_LEVEL");
        env::remove_var("APP_LOG_FORMAT");
        env::remove_var("FREIGHT_CONFIG_DIR");
        env::remove_var("ANTHROPIC_API_KEY");
        env::remove_var("OPENAI_API_KEY");
    }

    fn write_config_dir() -> tempfile::TempDir {
        let dir = tempfile::tempdir().expect("temp dir");
        std::fs::write(
            dir.path().join(BUSINESS_CONFIG_FILE),
            "rates:\n  target_rate_per_mile: 2.75\n",
        )
        .expect("write business config");
        std::fs::write(
            dir.path().join(LLM_CONFIG_FILE),
            r#"{"agent_assignments": {"dispatch": {
                "primary_model": {"provider": "anthropic", "model": "claude-sonnet"},
                "system_prompt_template": "You are a dispatcher."}}}"#,
        )
        .expect("write llm config");
        dir
    }

    #[test]
    fn load_reads_config_dir_and_defaults() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        let dir = write_config_dir();
        env::set_var("FREIGHT_CONFIG_DIR", dir.path());

        let config = AppConfig::load().expect("config loads");
        assert_eq!(config.environment, AppEnvironment::Development);
        assert_eq!(config.telemetry.log_level, "info");
        assert_eq!(config.telemetry.format, LogFormat::Compact);
        assert_eq!(
            config.business.rates.target_rate_per_mile,
            rust_decimal_macros::dec!(2.75)
        );
        assert!(config.llm.agent("dispatch").is_ok());
        assert_eq!(config.credentials, Credentials::default());
    }

    #[test]
    fn load_picks_up_environment_overrides() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        let dir = write_config_dir();
        env::set_var("FREIGHT_CONFIG_DIR", dir.path());
        env::set_var("APP_ENV", "prod");
        env::set_var("APP_LOG_FORMAT", "json");
        env::set_var("OPENAI_API_KEY", "sk-openai");

        let config = AppConfig::load().expect("config loads");
        assert_eq!(config.environment, AppEnvironment::Production);
        assert_eq!(config.telemetry.format, LogFormat::Json);
        assert_eq!(config.credentials.openai_api_key.as_deref(), Some("sk-openai"));
        reset_env();
    }

    #[test]
    fn rejects_unknown_log_format() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        let dir = write_config_dir();
        env::set_var("FREIGHT_CONFIG_DIR", dir.path());
        env::set_var("APP_LOG_FORMAT", "xml");

        assert!(matches!(
            AppConfig::load(),
            Err(ConfigError::InvalidLogFormat(_))
        ));
        reset_env();
    }

    #[test]
    fn missing_config_dir_fails_with_path() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        env::set_var("FREIGHT_CONFIG_DIR", "/nonexistent/freight-config");

        match AppConfig::load() {
            Err(err @ ConfigError::Read { .. }) => {
                assert!(err.to_string().contains("config.yaml"));
            }
            other => panic!("expected read error, got {other:?}"),
        }
        reset_env();
    }
}
