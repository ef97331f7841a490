use anyhow::{anyhow, Context};
use serde::Deserialize;
use std::{
    fs,
    path::{Path, PathBuf},
};

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub bind: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: "0.0.0.0:8000".to_string(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub file: String,
    pub level: Option<String>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            file: "logs/analytics.log".to_string(),
            level: Some("info".to_string()),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub logging: LoggingConfig,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        let explicit_path = std::env::var("CONFIG_FILE").ok();
        let config = if let Some(path) = explicit_path {
            let path = PathBuf::from(path);
            if !path.exists() {
                return Err(anyhow!("config file {:?} not found", path));
            }
            Self::load_from_file(&path)?
        } else {
            let path = locate_default_config();
            if let Some(path) = path {
                Self::load_from_file(&path)?
            } else {
                AppConfig::default()
            }
        };

        Ok(Self::apply_env_overrides(config))
    }

    fn load_from_file(path: &Path) -> anyhow::Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("failed to read config file {:?}", path))?;
        let config: AppConfig = serde_yaml::from_str(&contents)
            .with_context(|| format!("failed to parse config file {:?}", path))?;
        Ok(config)
    }

    fn apply_env_overrides(mut config: AppConfig) -> AppConfig {
        if let Ok(bind) = std::env::var("SERVER_BIND") {
            config.server.bind = bind;
        }

        if let Ok(log_file) = std::env::var("LOG_FILE_PATH") {
            config.logging.file = log_file;
        }

        if let Ok(log_level) = std::env::var("LOG_LEVEL") {
            config.logging.level = Some(log_level);
        }

        config
    }
}

fn locate_default_config() -> Option<PathBuf> {
    let candidates = [
        PathBuf::from("config/config.yaml"),
        PathBuf::from("../config/config.yaml"),
    ];

    for path in candidates {
        if path.exists() {
            return Some(path);
        }
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_entry_point_contract() {
        let config = AppConfig::default();
        assert_eq!(config.server.bind, "0.0.0.0:8000");
        assert_eq!(config.logging.file, "logs/analytics.log");
        assert_eq!(config.logging.level.as_deref(), Some("info"));
    }

    #[test]
    fn yaml_sections_override_defaults() {
        let yaml = "server:\n  bind: 127.0.0.1:9000\nlogging:\n  level: debug\n";
        let config: AppConfig = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(config.server.bind, "127.0.0.1:9000");
        assert_eq!(config.logging.level.as_deref(), Some("debug"));
        // untouched section keeps its default
        assert_eq!(config.logging.file, "logs/analytics.log");
    }

    #[test]
    fn empty_yaml_yields_defaults() {
        let config: AppConfig = serde_yaml::from_str("{}").unwrap();
        assert_eq!(config.server.bind, "0.0.0.0:8000");
    }
}
