use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use anyhow::{Context, Result, anyhow};

pub const API_URL_ENV: &str = "AROMA_CHAT_API_URL";

#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
pub struct Config {
    /// Completion endpoint, including any key query parameter it needs.
    pub api_url: Option<String>,
    /// File whose contents replace the built-in shop context.
    pub context_file: Option<PathBuf>,
    /// Default tracing filter when `RUST_LOG` is unset.
    pub log_level: Option<String>,
}

impl Config {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn load() -> Result<Self> {
        Self::load_from(&Self::get_config_path()?)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::new());
        }

        let config_content = fs::read_to_string(path)
            .with_context(|| format!("reading {}", path.display()))?;
        let config: Config = serde_json::from_str(&config_content)
            .with_context(|| format!("parsing {}", path.display()))?;
        Ok(config)
    }

    /// Endpoint URL: environment first, then the config file.
    pub fn api_url(&self) -> Result<String> {
        Self::resolve_api_url(std::env::var(API_URL_ENV).ok(), self.api_url.clone())
    }

    fn resolve_api_url(from_env: Option<String>, from_file: Option<String>) -> Result<String> {
        from_env
            .filter(|u| !u.trim().is_empty())
            .or(from_file.filter(|u| !u.trim().is_empty()))
            .ok_or_else(|| {
                anyhow!(
                    "No completion endpoint configured. Set {} or \"api_url\" in {}",
                    API_URL_ENV,
                    Self::get_config_path()
                        .map(|p| p.display().to_string())
                        .unwrap_or_else(|_| "config.json".to_string())
                )
            })
    }

    /// The hidden context message for a new session.
    pub fn seed_context(&self) -> Result<String> {
        match &self.context_file {
            Some(path) => fs::read_to_string(path)
                .with_context(|| format!("reading context file {}", path.display())),
            None => Ok(crate::content::SHOP_CONTEXT.to_string()),
        }
    }

    pub fn get_config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| anyhow!("Could not determine config directory"))?;

        Ok(config_dir.join("aroma-chat").join("config.json"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn missing_file_gives_defaults() {
        let dir = tempdir().unwrap();
        let config = Config::load_from(&dir.path().join("nope.json")).unwrap();
        assert_eq!(config, Config::new());
    }

    #[test]
    fn written_file_loads_every_field() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.json");
        let config = Config {
            api_url: Some("http://localhost:9999/generate".to_string()),
            context_file: None,
            log_level: Some("debug".to_string()),
        };

        fs::write(&path, serde_json::to_string_pretty(&config).unwrap()).unwrap();
        assert_eq!(Config::load_from(&path).unwrap(), config);
    }

    #[test]
    fn partial_file_fills_missing_fields() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.json");
        fs::write(&path, r#"{"api_url": "http://x"}"#).unwrap();

        let config = Config::load_from(&path).unwrap();
        assert_eq!(config.api_url.as_deref(), Some("http://x"));
        assert_eq!(config.log_level, None);
    }

    #[test]
    fn invalid_json_is_an_error() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.json");
        fs::write(&path, "{not json").unwrap();
        assert!(Config::load_from(&path).is_err());
    }

    #[test]
    fn env_url_wins_over_file() {
        let url = Config::resolve_api_url(Some("http://env".into()), Some("http://file".into()));
        assert_eq!(url.unwrap(), "http://env");

        let url = Config::resolve_api_url(Some("  ".into()), Some("http://file".into()));
        assert_eq!(url.unwrap(), "http://file");

        assert!(Config::resolve_api_url(None, None).is_err());
    }

    #[test]
    fn context_file_replaces_builtin_seed() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("context.txt");
        fs::write(&path, "Somos uma cafeteria de teste.").unwrap();

        let config = Config {
            context_file: Some(path),
            ..Config::new()
        };
        assert_eq!(config.seed_context().unwrap(), "Somos uma cafeteria de teste.");
        assert_eq!(Config::new().seed_context().unwrap(), crate::content::SHOP_CONTEXT);
    }
}
