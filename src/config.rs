use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::Path;

#[derive(Debug, Deserialize, Clone, Default)]
pub struct Config {
    #[serde(default)]
    pub telegram: TelegramConfig,
    #[serde(default)]
    pub server: ServerConfig,
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct TelegramConfig {
    #[serde(default)]
    pub bot_token: String,
    /// Username without the leading `@`, used to accept `/start@username`.
    /// Looked up with `getMe` at startup when left empty.
    #[serde(default)]
    pub bot_username: Option<String>,
    /// Public base URL of this service (e.g. "https://bot.example.org").
    /// When set, the webhook is registered with Telegram at startup.
    #[serde(default)]
    pub public_url: Option<String>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    #[serde(default = "default_bind_address")]
    pub bind_address: String,
    #[serde(default = "default_webhook_path")]
    pub webhook_path: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_address: default_bind_address(),
            webhook_path: default_webhook_path(),
        }
    }
}

fn default_bind_address() -> String {
    "0.0.0.0:3000".to_string()
}

fn default_webhook_path() -> String {
    "/api/webhook".to_string()
}

impl Config {
    /// Load the optional TOML file at `path`, apply environment overrides and
    /// validate. A missing file is not an error; a missing bot token is.
    pub fn load(path: &Path) -> Result<Self> {
        let mut config: Config = if path.exists() {
            let content = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read config file: {}", path.display()))?;
            toml::from_str(&content)
                .with_context(|| format!("Failed to parse config file: {}", path.display()))?
        } else {
            Config::default()
        };

        config.apply_env(|key| std::env::var(key).ok());
        config.validate()?;
        Ok(config)
    }

    /// Environment variables win over the file. `lookup` is injected so tests
    /// don't have to mutate the process environment.
    pub fn apply_env<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(token) = non_empty("BOT_TOKEN") {
            self.telegram.bot_token = token;
        }
        if let Some(username) = non_empty("BOT_USERNAME") {
            self.telegram.bot_username = Some(username);
        }
        if let Some(url) = non_empty("PUBLIC_URL") {
            self.telegram.public_url = Some(url);
        }
        if let Some(port) = non_empty("PORT") {
            self.server.bind_address = format!("0.0.0.0:{}", port.trim());
        }
        // An explicit address beats PORT.
        if let Some(addr) = non_empty("BIND_ADDRESS") {
            self.server.bind_address = addr;
        }
        if let Some(path) = non_empty("WEBHOOK_PATH") {
            self.server.webhook_path = path;
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.telegram.bot_token.trim().is_empty() {
            anyhow::bail!("BOT_TOKEN must be provided (env or [telegram] bot_token)");
        }
        if !self.server.webhook_path.starts_with('/') {
            anyhow::bail!(
                "webhook_path must start with '/', got {:?}",
                self.server.webhook_path
            );
        }
        if self.server.webhook_path == "/" {
            anyhow::bail!("webhook_path cannot be '/', the root path serves the liveness check");
        }
        if let Some(url) = &self.telegram.public_url {
            reqwest::Url::parse(url)
                .with_context(|| format!("Invalid public_url: {}", url))?;
        }
        Ok(())
    }

    /// Full URL Telegram should deliver updates to, if a public URL is set.
    pub fn webhook_url(&self) -> Result<Option<reqwest::Url>> {
        let Some(base) = &self.telegram.public_url else {
            return Ok(None);
        };
        let full = format!(
            "{}{}",
            base.trim_end_matches('/'),
            self.server.webhook_path
        );
        let url = reqwest::Url::parse(&full)
            .with_context(|| format!("Invalid webhook URL: {}", full))?;
        Ok(Some(url))
    }

    /// Bot username with any leading `@` stripped.
    pub fn bot_username(&self) -> Option<&str> {
        self.telegram
            .bot_username
            .as_deref()
            .map(|name| name.trim_start_matches('@'))
            .filter(|name| !name.is_empty())
    }
}

/// Mask a secret for logging: first 7 chars + `***` + last 4.
/// Anything of 11 chars or fewer is masked completely.
pub fn mask_token(token: &str) -> String {
    let chars: Vec<char> = token.chars().collect();
    if chars.len() <= 11 {
        return "***".to_string();
    }
    let head: String = chars[..7].iter().collect();
    let tail: String = chars[chars.len() - 4..].iter().collect();
    format!("{}***{}", head, tail)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.server.bind_address, "0.0.0.0:3000");
        assert_eq!(config.server.webhook_path, "/api/webhook");
        assert!(config.telegram.public_url.is_none());
    }

    #[test]
    fn test_missing_token_fails_validation() {
        let config = Config::default();
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("BOT_TOKEN"));
    }

    #[test]
    fn test_whitespace_token_fails_validation() {
        let mut config = Config::default();
        config.telegram.bot_token = "   ".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_parse_toml_sections() {
        let config: Config = toml::from_str(
            r#"
[telegram]
bot_token = "123:abc"
bot_username = "@recovery_helper_bot"
public_url = "https://bot.example.org/"

[server]
bind_address = "127.0.0.1:8080"
webhook_path = "/hook"
"#,
        )
        .unwrap();
        assert_eq!(config.telegram.bot_token, "123:abc");
        assert_eq!(config.bot_username(), Some("recovery_helper_bot"));
        assert_eq!(config.server.bind_address, "127.0.0.1:8080");
        assert!(config.validate().is_ok());
        assert_eq!(
            config.webhook_url().unwrap().unwrap().as_str(),
            "https://bot.example.org/hook"
        );
    }

    #[test]
    fn test_partial_toml_uses_defaults() {
        let config: Config = toml::from_str("[telegram]\nbot_token = \"t\"\n").unwrap();
        assert_eq!(config.server.webhook_path, "/api/webhook");
        assert!(config.webhook_url().unwrap().is_none());
    }

    #[test]
    fn test_env_overrides_file() {
        let mut config = Config::default();
        config.telegram.bot_token = "from-file".to_string();
        config.apply_env(env(&[
            ("BOT_TOKEN", "from-env"),
            ("PORT", "8443"),
            ("WEBHOOK_PATH", "/api/index"),
        ]));
        assert_eq!(config.telegram.bot_token, "from-env");
        assert_eq!(config.server.bind_address, "0.0.0.0:8443");
        assert_eq!(config.server.webhook_path, "/api/index");
    }

    #[test]
    fn test_bind_address_beats_port() {
        let mut config = Config::default();
        config.apply_env(env(&[("PORT", "8443"), ("BIND_ADDRESS", "127.0.0.1:9000")]));
        assert_eq!(config.server.bind_address, "127.0.0.1:9000");
    }

    #[test]
    fn test_empty_env_values_are_ignored() {
        let mut config = Config::default();
        config.telegram.bot_token = "keep".to_string();
        config.apply_env(env(&[("BOT_TOKEN", ""), ("WEBHOOK_PATH", " ")]));
        assert_eq!(config.telegram.bot_token, "keep");
        assert_eq!(config.server.webhook_path, "/api/webhook");
    }

    #[test]
    fn test_webhook_path_must_be_absolute() {
        let mut config = Config::default();
        config.telegram.bot_token = "t".to_string();
        config.server.webhook_path = "api/webhook".to_string();
        assert!(config.validate().is_err());
        config.server.webhook_path = "/".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_invalid_public_url_rejected() {
        let mut config = Config::default();
        config.telegram.bot_token = "t".to_string();
        config.telegram.public_url = Some("not a url".to_string());
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_load_missing_file_without_token_fails() {
        // Only meaningful when the test environment doesn't export BOT_TOKEN.
        if std::env::var("BOT_TOKEN").is_ok() {
            return;
        }
        let result = Config::load(Path::new("/nonexistent/recovery-bot.toml"));
        assert!(result.is_err());
    }

    #[test]
    fn test_mask_token() {
        assert_eq!(mask_token(""), "***");
        assert_eq!(mask_token("12345:abcde"), "***");
        assert_eq!(
            mask_token("1234567890:AAHdqTcvCH1vGWJxfSeofSAs0K5PALDsaw"),
            "1234567***Dsaw"
        );
    }
}
