use log::warn;
use std::fmt;
use std::time::Duration;

pub const DEFAULT_BASE_URL: &str = "https://financialmodelingprep.com";

/// Reporting period requested from the provider. Only the latest entry is ever used.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Period {
    #[default]
    Annual,
    Quarter,
}

impl Period {
    pub fn as_str(&self) -> &'static str {
        match self {
            Period::Annual => "annual",
            Period::Quarter => "quarter",
        }
    }
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(thiserror::Error, Debug, PartialEq, Eq)]
pub enum ConfigError {
    #[error("invalid value for {key}: \"{value}\"")]
    Invalid { key: &'static str, value: String },
}

/// Settings for talking to the data provider.
///
/// | variable               | default                              |
/// |------------------------|--------------------------------------|
/// | `FMP_API_KEY`          | empty (requests will be rejected)    |
/// | `FMP_BASE_URL`         | `https://financialmodelingprep.com`  |
/// | `USER_AGENT`           | reqwest's                            |
/// | `REVSEG_TIMEOUT_SECS`  | none                                 |
/// | `REVSEG_IGNORE_STATUS` | `false`                              |
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub api_key: String,
    pub base_url: String,
    pub user_agent: Option<String>,
    pub timeout: Option<Duration>,
    /// Treat non-2xx responses as failures rather than handing the body to the mapper.
    pub check_status: bool,
    pub period: Period,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            base_url: DEFAULT_BASE_URL.to_string(),
            user_agent: None,
            timeout: None,
            check_status: true,
            period: Period::Annual,
        }
    }
}

impl Config {
    /// Read the settings from the environment, loading `.env` first.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| dotenv::var(key).ok())
    }

    /// Build the settings from any `key -> value` lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());
        let mut config = Config::default();

        match non_empty("FMP_API_KEY") {
            Some(key) => config.api_key = key.trim().to_string(),
            None => warn!("FMP_API_KEY is not set; the provider will reject every request"),
        }

        if let Some(base_url) = non_empty("FMP_BASE_URL") {
            config.base_url = base_url.trim().trim_end_matches('/').to_string();
        }

        config.user_agent = non_empty("USER_AGENT");

        if let Some(secs) = non_empty("REVSEG_TIMEOUT_SECS") {
            let secs = secs.trim().parse::<u64>().map_err(|_| ConfigError::Invalid {
                key: "REVSEG_TIMEOUT_SECS",
                value: secs.clone(),
            })?;
            config.timeout = Some(Duration::from_secs(secs));
        }

        if let Some(flag) = non_empty("REVSEG_IGNORE_STATUS") {
            config.check_status = !parse_flag("REVSEG_IGNORE_STATUS", &flag)?;
        }

        Ok(config)
    }
}

fn parse_flag(key: &'static str, value: &str) -> Result<bool, ConfigError> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(ConfigError::Invalid {
            key,
            value: value.to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_from(pairs: &[(&str, &str)]) -> Result<Config, ConfigError> {
        let env: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|key| env.get(key).cloned())
    }

    #[test]
    fn defaults_when_nothing_is_set() {
        let config = config_from(&[]).unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.base_url, DEFAULT_BASE_URL);
        assert!(config.check_status);
    }

    #[test]
    fn reads_every_key() {
        let config = config_from(&[
            ("FMP_API_KEY", " abc123 "),
            ("FMP_BASE_URL", "http://127.0.0.1:9000/"),
            ("USER_AGENT", "revseg/0.1"),
            ("REVSEG_TIMEOUT_SECS", "15"),
            ("REVSEG_IGNORE_STATUS", "true"),
        ])
        .unwrap();

        assert_eq!(config.api_key, "abc123");
        assert_eq!(config.base_url, "http://127.0.0.1:9000");
        assert_eq!(config.user_agent.as_deref(), Some("revseg/0.1"));
        assert_eq!(config.timeout, Some(Duration::from_secs(15)));
        assert!(!config.check_status);
    }

    #[test]
    fn empty_values_count_as_unset() {
        let config = config_from(&[("FMP_API_KEY", ""), ("FMP_BASE_URL", "  ")]).unwrap();
        assert_eq!(config.api_key, "");
        assert_eq!(config.base_url, DEFAULT_BASE_URL);
    }

    #[test]
    fn bad_values_are_rejected() {
        assert_eq!(
            config_from(&[("REVSEG_TIMEOUT_SECS", "soon")]),
            Err(ConfigError::Invalid {
                key: "REVSEG_TIMEOUT_SECS",
                value: "soon".to_string()
            })
        );
        assert!(config_from(&[("REVSEG_IGNORE_STATUS", "maybe")]).is_err());
    }

    #[test]
    fn period_wire_names() {
        assert_eq!(Period::Annual.to_string(), "annual");
        assert_eq!(Period::Quarter.as_str(), "quarter");
    }
}
