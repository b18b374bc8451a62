//! Application configuration loaded from a TOML file and environment variables.

use anyhow::{bail, Context, Result};
use secrecy::{ExposeSecret, SecretString};
use serde::de::{self, SeqAccess, Visitor};
use serde::{Deserialize, Deserializer};
use std::fmt;
use std::path::Path;
use std::time::Duration;

/// Default configuration file name.
pub const DEFAULT_CONFIG_FILE: &str = "cerebot_config.toml";

/// Prefix for environment overrides, e.g. `CEREBOT__DISCORD__TOKEN`.
const ENV_PREFIX: &str = "CEREBOT";

/// Application configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    /// Bot configuration
    #[serde(default)]
    pub bot: BotConfig,

    /// Discord configuration
    pub discord: DiscordConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct BotConfig {
    /// Log level
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DiscordConfig {
    /// Bot token
    pub token: SecretString,

    /// Users allowed to run admin commands (account name or id)
    #[serde(default, deserialize_with = "string_list")]
    pub admins: Vec<String>,

    /// Users whose commands are silently ignored (account name or id)
    #[serde(default, deserialize_with = "string_list")]
    pub ignored_users: Vec<String>,

    /// Command prefix character
    #[serde(default = "default_command_prefix")]
    pub command_prefix: char,

    /// Rate limit window
    #[serde(default = "default_command_period", with = "humantime_serde")]
    pub command_period: Duration,

    /// Max rate-limited commands per window
    #[serde(default = "default_command_limit")]
    pub command_limit: usize,

    /// How long a channel source stays cached without activity
    #[serde(default = "default_source_idle_timeout", with = "humantime_serde")]
    pub source_idle_timeout: Duration,

    /// Run without connecting to Discord
    #[serde(default)]
    pub fake_connect: bool,

    /// Enable the animated commands
    #[serde(default = "default_true")]
    pub animations: bool,

    /// Enable the role commands
    #[serde(default = "default_true")]
    pub roles: bool,
}

/// The subset of the configuration re-read while running.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AccessConfig {
    #[serde(default)]
    pub discord: AccessLists,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct AccessLists {
    #[serde(default, deserialize_with = "string_list")]
    pub admins: Vec<String>,

    #[serde(default, deserialize_with = "string_list")]
    pub ignored_users: Vec<String>,
}

impl Default for BotConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
        }
    }
}

// Default value functions
fn default_log_level() -> String {
    "info".into()
}

fn default_command_prefix() -> char {
    '!'
}

fn default_command_period() -> Duration {
    Duration::from_secs(60)
}

fn default_command_limit() -> usize {
    10
}

fn default_source_idle_timeout() -> Duration {
    Duration::from_secs(30 * 60) // 30 minutes
}

fn default_true() -> bool {
    true
}

/// Accept a TOML array or a comma-separated string, as environment
/// overrides only carry strings.
fn string_list<'de, D>(deserializer: D) -> std::result::Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    struct StringList;

    impl<'de> Visitor<'de> for StringList {
        type Value = Vec<String>;

        fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
            f.write_str("a list of names or a comma-separated string")
        }

        fn visit_str<E: de::Error>(self, value: &str) -> std::result::Result<Self::Value, E> {
            Ok(value
                .split(',')
                .map(str::trim)
                .filter(|item| !item.is_empty())
                .map(String::from)
                .collect())
        }

        fn visit_seq<A: SeqAccess<'de>>(
            self,
            mut seq: A,
        ) -> std::result::Result<Self::Value, A::Error> {
            let mut items = Vec::new();
            while let Some(item) = seq.next_element::<String>()? {
                items.push(item);
            }
            Ok(items)
        }
    }

    deserializer.deserialize_any(StringList)
}

/// The config file layered under `CEREBOT__` environment overrides.
/// `env` stands in for the process environment when given.
fn sources(path: &Path, env: Option<config::Map<String, String>>) -> Result<config::Config> {
    config::Config::builder()
        .add_source(config::File::from(path).format(config::FileFormat::Toml))
        .add_source(
            // No value parsing: numeric ids must stay strings
            config::Environment::with_prefix(ENV_PREFIX)
                .separator("__")
                .try_parsing(false)
                .source(env),
        )
        .build()
        .with_context(|| format!("Failed to read {}", path.display()))
}

impl Config {
    /// Load configuration from a TOML file, with environment overrides.
    pub fn load(path: &Path) -> Result<Self> {
        // Load .env file if present
        dotenvy::dotenv().ok();

        Self::load_with_env(path, None)
    }

    fn load_with_env(path: &Path, env: Option<config::Map<String, String>>) -> Result<Self> {
        let config: Self = sources(path, env)?
            .try_deserialize()
            .context("Failed to deserialize configuration")?;

        config.validate()?;
        Ok(config)
    }

    /// Check values serde can't.
    pub fn validate(&self) -> Result<()> {
        if self.discord.token.expose_secret().trim().is_empty() {
            bail!("The discord token is undefined");
        }
        if self.discord.command_limit == 0 {
            bail!("discord.command_limit must be at least 1");
        }
        if self.discord.command_prefix.is_whitespace() {
            bail!("discord.command_prefix can't be whitespace");
        }
        Ok(())
    }
}

impl AccessConfig {
    /// Read just the admin and ignored-user lists, with the same
    /// environment overrides as [`Config::load`].
    pub fn load(path: &Path) -> Result<Self> {
        Self::load_with_env(path, None)
    }

    fn load_with_env(path: &Path, env: Option<config::Map<String, String>>) -> Result<Self> {
        sources(path, env)?
            .try_deserialize()
            .context("Failed to deserialize access lists")
    }
}
