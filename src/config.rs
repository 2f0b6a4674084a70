use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Placeholder values written to a freshly created config file
pub const PLACEHOLDER_TOKEN: &str = "set_me";
pub const PLACEHOLDER_CHAT: &str = "@set_me";

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct Config {
    pub telegram: TelegramConfig,
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct TelegramConfig {
    pub bot_token: String,
    /// Username of the moderated chat, with or without the leading `@`
    pub chat_username: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            telegram: TelegramConfig {
                bot_token: PLACEHOLDER_TOKEN.to_string(),
                chat_username: PLACEHOLDER_CHAT.to_string(),
            },
        }
    }
}

impl TelegramConfig {
    /// Configured chat username without the `@` prefix.
    pub fn chat_name(&self) -> &str {
        self.chat_username.trim_start_matches('@')
    }

    /// Configured chat username in `@name` form, for logs.
    pub fn chat_handle(&self) -> String {
        format!("@{}", self.chat_name())
    }

    /// Telegram usernames are case-insensitive.
    pub fn chat_matches(&self, username: &str) -> bool {
        self.chat_name()
            .eq_ignore_ascii_case(username.trim_start_matches('@'))
    }
}

impl Config {
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))
    }

    /// Create (or overwrite) the config file with placeholder settings.
    pub fn write_default(path: &Path) -> Result<()> {
        let content = toml::to_string_pretty(&Config::default())
            .context("Failed to serialize default config")?;

        std::fs::write(path, content)
            .with_context(|| format!("Failed to write config file: {}", path.display()))
    }

    /// Reject configs that still carry the placeholder values.
    pub fn validate(&self) -> Result<()> {
        let tg = &self.telegram;

        if tg.bot_token.trim().is_empty() || tg.bot_token == PLACEHOLDER_TOKEN {
            bail!("telegram.bot_token is not set");
        }
        if tg.chat_name().trim().is_empty() || tg.chat_username == PLACEHOLDER_CHAT {
            bail!("telegram.chat_username is not set");
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(token: &str, chat: &str) -> Config {
        Config {
            telegram: TelegramConfig {
                bot_token: token.to_string(),
                chat_username: chat.to_string(),
            },
        }
    }

    #[test]
    fn test_default_file_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");

        Config::write_default(&path).unwrap();
        let content = std::fs::read_to_string(&path).unwrap();
        assert!(content.contains("[telegram]"));
        assert!(content.contains(r#"bot_token = "set_me""#));
        assert!(content.contains(r#"chat_username = "@set_me""#));

        let loaded = Config::load(&path).unwrap();
        assert_eq!(loaded, Config::default());
    }

    #[test]
    fn test_default_config_is_invalid() {
        assert!(Config::default().validate().is_err());
    }

    #[test]
    fn test_placeholder_token_is_invalid() {
        let err = config("set_me", "@k_3_d").validate().unwrap_err();
        assert!(err.to_string().contains("bot_token"));
    }

    #[test]
    fn test_placeholder_chat_is_invalid() {
        let err = config("123:abc", "@set_me").validate().unwrap_err();
        assert!(err.to_string().contains("chat_username"));
    }

    #[test]
    fn test_empty_values_are_invalid() {
        assert!(config("", "@k_3_d").validate().is_err());
        assert!(config("123:abc", "@").validate().is_err());
    }

    #[test]
    fn test_real_values_are_valid() {
        assert!(config("123:abc", "@k_3_d").validate().is_ok());
    }

    #[test]
    fn test_load_missing_file_fails() {
        let dir = tempfile::tempdir().unwrap();
        let err = Config::load(&dir.path().join("missing.toml")).unwrap_err();
        assert!(err.to_string().contains("Failed to read config file"));
    }

    #[test]
    fn test_load_rejects_missing_section() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[bot]\ntoken = \"x\"\n").unwrap();
        assert!(Config::load(&path).is_err());
    }

    #[test]
    fn test_chat_matching_ignores_prefix_and_case() {
        let tg = config("t", "@K_3_D").telegram;
        assert!(tg.chat_matches("k_3_d"));
        assert!(tg.chat_matches("@k_3_d"));
        assert!(!tg.chat_matches("other_chat"));
        assert_eq!(tg.chat_handle(), "@K_3_D");

        let bare = config("t", "k_3_d").telegram;
        assert_eq!(bare.chat_handle(), "@k_3_d");
        assert!(bare.chat_matches("K_3_D"));
    }
}
