//! Configuration management

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use crate::application::errors::ConfigError;

/// Bot configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct Config {
    pub bot: BotConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
    pub adapters: AdaptersConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct BotConfig {
    pub name: String,
    pub prefix: String,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct LoggingConfig {
    pub level: String,
    pub prefix: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            prefix: "Main".to_string(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct AdaptersConfig {
    pub telegram: Option<TelegramConfig>,
    pub console: Option<ConsoleConfig>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct TelegramConfig {
    pub enabled: bool,
    pub token: Option<String>,
    #[serde(default = "default_poll_timeout")]
    pub poll_timeout_secs: u64,
}

fn default_poll_timeout() -> u64 {
    30
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct ConsoleConfig {
    pub enabled: bool,
}

/// Transport a bot is served over
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Transport {
    Telegram { token: String, poll_timeout_secs: u64 },
    Console,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            bot: BotConfig {
                name: "xgram".to_string(),
                prefix: "/".to_string(),
            },
            logging: LoggingConfig::default(),
            adapters: AdaptersConfig {
                telegram: Some(TelegramConfig {
                    enabled: false,
                    token: None,
                    poll_timeout_secs: default_poll_timeout(),
                }),
                console: Some(ConsoleConfig {
                    enabled: true,
                }),
            },
        }
    }
}

impl Config {
    pub fn load(path: impl Into<PathBuf>) -> Result<Self, ConfigError> {
        let path = path.into();
        let content = std::fs::read_to_string(&path)
            .map_err(|e| ConfigError::Parse(format!("Failed to read config: {}", e)))?;

        Self::parse(&content)
    }

    pub fn parse(content: &str) -> Result<Self, ConfigError> {
        serde_yaml::from_str(content)
            .map_err(|e| ConfigError::Parse(format!("Failed to parse config: {}", e)))
    }

    pub fn load_env() -> Self {
        // Load from environment variables
        let mut config = Config::default();

        if let Ok(token) = std::env::var("BOT_TOKEN") {
            if let Some(ref mut tg) = config.adapters.telegram {
                tg.token = Some(token);
                tg.enabled = true;
            }
        }

        if let Ok(prefix) = std::env::var("BOT_PREFIX") {
            config.bot.prefix = prefix;
        }

        if let Ok(level) = std::env::var("BOT_LOG_LEVEL") {
            config.logging.level = level;
        }

        config
    }

    /// The command prefix, which must be a single character
    pub fn command_prefix(&self) -> Result<char, ConfigError> {
        let mut chars = self.bot.prefix.chars();
        match (chars.next(), chars.next()) {
            (Some(prefix), None) if !prefix.is_whitespace() => Ok(prefix),
            _ => Err(ConfigError::InvalidValue(format!(
                "prefix must be a single character, got {:?}",
                self.bot.prefix
            ))),
        }
    }

    /// Telegram token, if the adapter is enabled and has one
    pub fn telegram_token(&self) -> Option<&str> {
        self.adapters
            .telegram
            .as_ref()
            .filter(|tg| tg.enabled)
            .and_then(|tg| tg.token.as_deref())
    }

    /// Telegram when a token is given or configured, otherwise the console
    /// adapter unless it is disabled. A missing `console` section counts as
    /// enabled.
    pub fn transport(&self, token_override: Option<String>) -> Result<Transport, ConfigError> {
        if let Some(token) = token_override.or_else(|| self.telegram_token().map(str::to_string)) {
            let poll_timeout_secs = self
                .adapters
                .telegram
                .as_ref()
                .map(|tg| tg.poll_timeout_secs)
                .unwrap_or_else(default_poll_timeout);
            return Ok(Transport::Telegram {
                token,
                poll_timeout_secs,
            });
        }

        let console_enabled = self
            .adapters
            .console
            .as_ref()
            .map_or(true, |console| console.enabled);
        if console_enabled {
            Ok(Transport::Console)
        } else {
            Err(ConfigError::MissingField(
                "adapters.telegram.token (the console adapter is disabled)".to_string(),
            ))
        }
    }

    pub fn to_yaml(&self) -> Result<String, ConfigError> {
        serde_yaml::to_string(self).map_err(|e| ConfigError::Parse(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_yaml() {
        let config = Config::parse(
            r#"
bot:
  name: test-bot
  prefix: "!"
adapters:
  telegram:
    enabled: true
    token: "123:abc"
"#,
        )
        .unwrap();

        assert_eq!(config.bot.name, "test-bot");
        assert_eq!(config.command_prefix().unwrap(), '!');
        assert_eq!(config.logging.level, "info");
        assert_eq!(config.telegram_token(), Some("123:abc"));
        assert_eq!(config.adapters.telegram.unwrap().poll_timeout_secs, 30);
        assert!(config.adapters.console.is_none());
    }

    #[test]
    fn test_prefix_must_be_one_character() {
        let mut config = Config::default();
        assert_eq!(config.command_prefix().unwrap(), '/');

        config.bot.prefix = "//".to_string();
        assert!(matches!(config.command_prefix(), Err(ConfigError::InvalidValue(_))));

        config.bot.prefix = String::new();
        assert!(config.command_prefix().is_err());
    }

    #[test]
    fn test_transport_selection() {
        let mut config = Config::default();
        assert_eq!(config.transport(None).unwrap(), Transport::Console);
        assert_eq!(
            config.transport(Some("123:abc".to_string())).unwrap(),
            Transport::Telegram {
                token: "123:abc".to_string(),
                poll_timeout_secs: 30,
            }
        );

        if let Some(console) = config.adapters.console.as_mut() {
            console.enabled = false;
        }
        assert!(matches!(config.transport(None), Err(ConfigError::MissingField(_))));

        // A token for a disabled Telegram adapter is ignored
        if let Some(tg) = config.adapters.telegram.as_mut() {
            tg.token = Some("123:abc".to_string());
        }
        assert!(config.transport(None).is_err());

        if let Some(tg) = config.adapters.telegram.as_mut() {
            tg.enabled = true;
            tg.poll_timeout_secs = 5;
        }
        assert_eq!(
            config.transport(None).unwrap(),
            Transport::Telegram {
                token: "123:abc".to_string(),
                poll_timeout_secs: 5,
            }
        );
    }

    #[test]
    fn test_default_round_trips_through_yaml() {
        let yaml = Config::default().to_yaml().unwrap();
        let config = Config::parse(&yaml).unwrap();
        assert_eq!(config.bot.name, "xgram");
        assert!(config.telegram_token().is_none());
    }
}
