//! Runtime configuration, loaded from `comparendos.toml` and `COMPARENDOS_*` variables.

use figment::Figment;
use figment::providers::{Env, Format, Toml};
use fundu::{DurationParser, TimeUnit};
use serde::{Deserialize, Deserializer};
use std::path::PathBuf;
use std::time::Duration;

use crate::portal::IdleCondition;

pub const CONFIG_FILE: &str = "comparendos.toml";
pub const ENV_PREFIX: &str = "COMPARENDOS_";

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    /// Level for this crate's events; `RUST_LOG` overrides it entirely.
    #[serde(default = "default_log_level")]
    pub log_level: String,
    #[serde(default = "default_true")]
    pub headless: bool,
    #[serde(default = "default_true")]
    pub sandbox: bool,
    #[serde(default)]
    pub chrome_executable: Option<PathBuf>,
    /// Bound on each navigation (including its idle wait) and page operation.
    #[serde(
        default = "default_navigation_timeout",
        deserialize_with = "deserialize_duration"
    )]
    pub navigation_timeout: Duration,
    /// Quiet period the network must hold before a page counts as settled.
    #[serde(
        default = "default_idle_window",
        deserialize_with = "deserialize_duration"
    )]
    pub idle_window: Duration,
    #[serde(default = "default_idle_max_inflight")]
    pub idle_max_inflight: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            headless: true,
            sandbox: true,
            chrome_executable: None,
            navigation_timeout: default_navigation_timeout(),
            idle_window: default_idle_window(),
            idle_max_inflight: default_idle_max_inflight(),
        }
    }
}

impl Config {
    pub fn figment() -> Figment {
        Figment::new()
            .merge(Toml::file(CONFIG_FILE))
            .merge(Env::prefixed(ENV_PREFIX))
    }

    pub fn load() -> Result<Self, figment::Error> {
        Self::figment().extract()
    }

    pub fn idle_condition(&self) -> IdleCondition {
        IdleCondition {
            window: self.idle_window,
            max_inflight: self.idle_max_inflight,
            timeout: self.navigation_timeout,
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_true() -> bool {
    true
}

fn default_navigation_timeout() -> Duration {
    Duration::from_secs(30)
}

fn default_idle_window() -> Duration {
    Duration::from_millis(500)
}

fn default_idle_max_inflight() -> usize {
    2
}

/// Accepts either whole seconds (`30`) or a unit-suffixed string (`"30s"`, `"500ms"`, `"2m"`).
fn deserialize_duration<'de, D>(deserializer: D) -> Result<Duration, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Seconds(u64),
        Text(String),
    }

    match Raw::deserialize(deserializer)? {
        Raw::Seconds(secs) => Ok(Duration::from_secs(secs)),
        Raw::Text(text) => parse_duration(&text).map_err(serde::de::Error::custom),
    }
}

fn parse_duration(text: &str) -> Result<Duration, String> {
    let parser =
        DurationParser::with_time_units(&[TimeUnit::MilliSecond, TimeUnit::Second, TimeUnit::Minute]);
    let parsed = parser
        .parse(text.trim())
        .map_err(|e| format!("invalid duration {text:?}: {e}"))?;
    Duration::try_from(parsed).map_err(|e| format!("invalid duration {text:?}: {e}"))
}
