//! Configuration management

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use crate::application::errors::ConfigError;
use crate::infrastructure::llm::LLMConfig;

/// Bot configuration
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct Config {
    pub bot: BotConfig,
    pub storage: StorageConfig,
    pub llm: LLMConfig,
    pub server: ServerConfig,
    pub adapters: AdaptersConfig,
}

/// Identity shown by `.info` and `.alive`
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct BotConfig {
    pub name: String,
    pub owner: String,
    pub user: String,
    pub mode: String,
    pub version: String,
    pub total_users: u32,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct StorageConfig {
    pub variables_file: PathBuf,
}

/// Liveness endpoint
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct ServerConfig {
    pub enabled: bool,
    pub port: u16,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct AdaptersConfig {
    pub telegram: Option<TelegramConfig>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct TelegramConfig {
    pub enabled: bool,
    pub token: Option<String>,
}

impl Default for BotConfig {
    fn default() -> Self {
        Self {
            name: "Prick".to_string(),
            owner: "Iyii".to_string(),
            user: "iyii".to_string(),
            mode: "private".to_string(),
            version: "6.2.4".to_string(),
            total_users: 3,
        }
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            variables_file: PathBuf::from("./variables.json"),
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            port: 3000,
        }
    }
}

impl Config {
    pub fn load(path: impl Into<PathBuf>) -> Result<Self, ConfigError> {
        let path = path.into();
        let content = std::fs::read_to_string(&path)
            .map_err(|e| ConfigError::Parse(format!("Failed to read config: {}", e)))?;

        Self::from_yaml(&content)
    }

    pub fn from_yaml(content: &str) -> Result<Self, ConfigError> {
        serde_yaml::from_str(content)
            .map_err(|e| ConfigError::Parse(format!("Failed to parse config: {}", e)))
    }

    pub fn load_env() -> Self {
        let mut config = Config::default();
        if let Err(e) = config.apply_env() {
            tracing::warn!("Ignoring environment override: {}", e);
        }
        config
    }

    /// Overlay process environment variables on top of this config
    pub fn apply_env(&mut self) -> Result<(), ConfigError> {
        self.apply_overrides(|name| std::env::var(name).ok())
    }

    pub fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) -> Result<(), ConfigError> {
        self.llm.apply_overrides(&lookup);

        if let Some(token) = lookup("BOT_TOKEN").filter(|t| !t.is_empty()) {
            let telegram = self.adapters.telegram.get_or_insert_with(TelegramConfig::default);
            telegram.token = Some(token);
            telegram.enabled = true;
        }

        if let Some(path) = lookup("VARIABLES_FILE") {
            self.storage.variables_file = PathBuf::from(path);
        }

        if let Some(port) = lookup("PORT") {
            self.server.port = port
                .parse()
                .map_err(|_| ConfigError::InvalidValue(format!("PORT must be a port number, got {:?}", port)))?;
        }

        Ok(())
    }

    /// Telegram token, if the adapter is enabled
    pub fn telegram_token(&self) -> Option<&str> {
        self.adapters.telegram
            .as_ref()
            .filter(|t| t.enabled)
            .and_then(|t| t.token.as_deref())
    }
}

/// Load `KEY=value` lines from `path` into the process environment.
///
/// Variables already set in the process win. Returns `Ok(false)` when the file does not exist.
pub fn load_dotenv(path: &Path) -> Result<bool, ConfigError> {
    match dotenvy::from_path(path) {
        Ok(()) => Ok(true),
        Err(e) if e.not_found() => Ok(false),
        Err(e) => Err(ConfigError::Parse(format!("Failed to load {}: {}", path.display(), e))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup<'a>(vars: &'a HashMap<&'a str, &'a str>) -> impl Fn(&str) -> Option<String> + 'a {
        move |name| vars.get(name).map(|v| v.to_string())
    }

    #[test]
    fn test_partial_yaml_keeps_defaults() {
        let config = Config::from_yaml("bot:\n  owner: Someone\nserver:\n  port: 8080\n").unwrap();
        assert_eq!(config.bot.owner, "Someone");
        assert_eq!(config.bot.name, "Prick");
        assert_eq!(config.server.port, 8080);
        assert!(config.server.enabled);
        assert_eq!(config.storage.variables_file, PathBuf::from("./variables.json"));
        assert_eq!(config.llm.max_tokens, 500);
    }

    #[test]
    fn test_invalid_yaml() {
        let result = Config::from_yaml("bot: [unclosed");
        assert!(matches!(result, Err(ConfigError::Parse(_))));
    }

    #[test]
    fn test_env_overrides() {
        let vars: HashMap<&str, &str> = [
            ("PORT", "8081"),
            ("BOT_TOKEN", "123:abc"),
            ("OPENAI_API_KEY", "sk-test"),
            ("VARIABLES_FILE", "/tmp/vars.json"),
        ]
        .into_iter()
        .collect();

        let mut config = Config::default();
        config.apply_overrides(lookup(&vars)).unwrap();

        assert_eq!(config.server.port, 8081);
        assert_eq!(config.telegram_token(), Some("123:abc"));
        assert_eq!(config.llm.api_key(), Some("sk-test"));
        assert_eq!(config.storage.variables_file, PathBuf::from("/tmp/vars.json"));
    }

    #[test]
    fn test_invalid_port_is_rejected() {
        let vars: HashMap<&str, &str> = [("PORT", "http")].into_iter().collect();
        let mut config = Config::default();
        let result = config.apply_overrides(lookup(&vars));
        assert!(matches!(result, Err(ConfigError::InvalidValue(_))));
        assert_eq!(config.server.port, 3000);
    }

    #[test]
    fn test_disabled_telegram_has_no_token() {
        let config = Config::from_yaml("adapters:\n  telegram:\n    enabled: false\n    token: \"1:x\"\n").unwrap();
        assert_eq!(config.telegram_token(), None);
    }

    #[test]
    fn test_dotenv_missing_file_is_skipped() {
        let dir = tempfile::tempdir().unwrap();
        assert!(!load_dotenv(&dir.path().join(".env")).unwrap());
    }

    #[test]
    fn test_dotenv_fills_process_env() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(".env");
        std::fs::write(&path, "PRICK_DOTENV_FRESH=from-file\nPRICK_DOTENV_KEPT=from-file\n").unwrap();
        std::env::set_var("PRICK_DOTENV_KEPT", "from-process");

        assert!(load_dotenv(&path).unwrap());
        assert_eq!(std::env::var("PRICK_DOTENV_FRESH").unwrap(), "from-file");
        assert_eq!(std::env::var("PRICK_DOTENV_KEPT").unwrap(), "from-process");
    }
}
