//! Runtime configuration read from the process environment (and `.env` via `dotenv`).

use std::env;
use std::path::PathBuf;
use std::str::FromStr;
use thiserror::Error;
use tracing::{debug, warn};

pub const DEFAULT_PREFIX: &str = "!";
pub const DEFAULT_AI_API_URL: &str = "https://api.openai.com/v1/chat/completions";
pub const DEFAULT_AI_MODEL: &str = "gpt-4o-mini";
pub const DEFAULT_DATABASE_PATH: &str = "dogbot.db";
pub const DEFAULT_HEALTH_PORT: u16 = 8080;

/// Errors raised while reading configuration.
#[derive(Error, Debug, PartialEq)]
pub enum ConfigError {
    #[error("Missing required environment variable {0}")]
    Missing(&'static str),

    #[error("Invalid value for {key}: {value:?}")]
    Invalid { key: &'static str, value: String },
}

/// Settings for the hosted completion API.
#[derive(Debug, Clone, PartialEq)]
pub struct AiSettings {
    pub api_url: String,
    pub api_key: Option<String>,
    pub model: String,
    pub max_tokens: u32,
    pub temperature: f32,
}

impl Default for AiSettings {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_AI_API_URL.to_string(),
            api_key: None,
            model: DEFAULT_AI_MODEL.to_string(),
            max_tokens: 500,
            temperature: 0.7,
        }
    }
}

/// Names of the roles the bot hands out and the roles allowed to moderate them.
#[derive(Debug, Clone, PartialEq)]
pub struct RoleSettings {
    pub dogs_role: String,
    pub cats_role: String,
    pub moderator_roles: Vec<String>,
}

impl Default for RoleSettings {
    fn default() -> Self {
        Self {
            dogs_role: "Dogs".to_string(),
            cats_role: "Cats".to_string(),
            moderator_roles: vec!["Admin".to_string(), "Moderator".to_string()],
        }
    }
}

#[derive(Debug, Clone)]
pub struct BotConfig {
    pub discord_token: String,
    pub prefix: String,
    pub database_path: PathBuf,
    pub health_port: u16,
    pub ai: AiSettings,
    pub roles: RoleSettings,
}

impl BotConfig {
    /// Reads the configuration from the process environment.
    ///
    /// Only `DISCORD_TOKEN` is mandatory; every other setting has a default.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the configuration from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let discord_token = get("DISCORD_TOKEN").ok_or(ConfigError::Missing("DISCORD_TOKEN"))?;

        let api_key = get("AI_API_KEY");
        if api_key.is_none() {
            warn!("AI_API_KEY is not set; AI commands will reply with an error");
        }

        let defaults = AiSettings::default();
        let ai = AiSettings {
            api_url: get("AI_API_URL").unwrap_or(defaults.api_url),
            api_key,
            model: get("AI_MODEL").unwrap_or(defaults.model),
            max_tokens: parse_or("AI_MAX_TOKENS", get("AI_MAX_TOKENS"), defaults.max_tokens)?,
            temperature: parse_or(
                "AI_TEMPERATURE",
                get("AI_TEMPERATURE"),
                defaults.temperature,
            )?,
        };

        let role_defaults = RoleSettings::default();
        let roles = RoleSettings {
            dogs_role: get("DOGS_ROLE").unwrap_or(role_defaults.dogs_role),
            cats_role: get("CATS_ROLE").unwrap_or(role_defaults.cats_role),
            moderator_roles: get("MODERATOR_ROLES")
                .map(|raw| split_list(&raw))
                .unwrap_or(role_defaults.moderator_roles),
        };

        let config = Self {
            discord_token,
            prefix: get("COMMAND_PREFIX").unwrap_or_else(|| DEFAULT_PREFIX.to_string()),
            database_path: get("DATABASE_PATH")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_DATABASE_PATH)),
            health_port: parse_or("PORT", get("PORT"), DEFAULT_HEALTH_PORT)?,
            ai,
            roles,
        };

        debug!(
            "Loaded configuration: prefix={:?}, database={:?}, port={}, model={}",
            config.prefix, config.database_path, config.health_port, config.ai.model
        );

        Ok(config)
    }
}

fn parse_or<T: FromStr>(key: &'static str, raw: Option<String>, default: T) -> Result<T, ConfigError> {
    match raw {
        Some(value) => value
            .trim()
            .parse()
            .map_err(|_| ConfigError::Invalid { key, value }),
        None => Ok(default),
    }
}

fn split_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}
