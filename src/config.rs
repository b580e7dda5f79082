//! Service configuration from environment variables

use std::env;
use std::path::PathBuf;

fn env_str(name: &str, default: &str) -> String {
    env::var(name)
        .ok()
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .unwrap_or_else(|| default.to_string())
}

fn env_u16(name: &str, default: u16) -> u16 {
    env::var(name)
        .ok()
        .and_then(|s| s.trim().parse().ok())
        .unwrap_or(default)
}

fn env_path(name: &str, default: &str) -> PathBuf {
    PathBuf::from(env_str(name, default))
}

/// Prediction service configuration.
///
/// Environment variables override the defaults; CLI flags override both.
#[derive(Debug, Clone)]
pub struct ServiceConfig {
    pub bind: String,
    pub port: u16,
    /// Directory holding the fitted model artifacts.
    pub model_dir: PathBuf,
}

impl ServiceConfig {
    pub fn from_env() -> Self {
        Self {
            bind: env_str("ANOMALY_BIND", "127.0.0.1"),
            port: env_u16("ANOMALY_PORT", 3000),
            model_dir: env_path("ANOMALY_MODEL_DIR", "models"),
        }
    }
}
