//! Process configuration, read from the environment.

use std::net::SocketAddr;

use factory_routers::RouterConfig;
use thiserror::Error;

pub const BIND_ADDR_VAR: &str = "FACTORY_BIND_ADDR";
pub const TRAILING_SLASH_VAR: &str = "FACTORY_TRAILING_SLASH";
pub const ROOT_VIEW_VAR: &str = "FACTORY_ROOT_VIEW";

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{key} has an invalid value: {value:?}")]
    Invalid { key: &'static str, value: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiConfig {
    pub bind_addr: SocketAddr,
    pub router: RouterConfig,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            bind_addr: SocketAddr::from(([0, 0, 0, 0], 8080)),
            router: RouterConfig::default(),
        }
    }
}

impl ApiConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from any key/value source; unset keys fall back to defaults.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let bind_addr = lookup(BIND_ADDR_VAR).unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string());
        let bind_addr = bind_addr.parse().map_err(|_| ConfigError::Invalid {
            key: BIND_ADDR_VAR,
            value: bind_addr.clone(),
        })?;

        let defaults = RouterConfig::default();
        let router = RouterConfig {
            trailing_slash: flag(&lookup, TRAILING_SLASH_VAR, defaults.trailing_slash)?,
            include_root_view: flag(&lookup, ROOT_VIEW_VAR, defaults.include_root_view)?,
        };

        Ok(Self { bind_addr, router })
    }
}

fn flag(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &'static str,
    default: bool,
) -> Result<bool, ConfigError> {
    let Some(raw) = lookup(key) else {
        return Ok(default);
    };
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(ConfigError::Invalid { key, value: raw }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn from(pairs: &[(&str, &str)]) -> Result<ApiConfig, ConfigError> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        ApiConfig::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn defaults_when_unset() {
        assert_eq!(from(&[]).unwrap(), ApiConfig::default());
    }

    #[test]
    fn reads_overrides() {
        let cfg = from(&[
            (BIND_ADDR_VAR, "127.0.0.1:9000"),
            (TRAILING_SLASH_VAR, "false"),
            (ROOT_VIEW_VAR, "0"),
        ])
        .unwrap();

        assert_eq!(cfg.bind_addr, "127.0.0.1:9000".parse().unwrap());
        assert!(!cfg.router.trailing_slash);
        assert!(!cfg.router.include_root_view);
    }

    #[test]
    fn rejects_malformed_values() {
        assert_eq!(
            from(&[(BIND_ADDR_VAR, "nowhere")]).unwrap_err(),
            ConfigError::Invalid {
                key: BIND_ADDR_VAR,
                value: "nowhere".to_string()
            }
        );
        assert!(from(&[(TRAILING_SLASH_VAR, "maybe")]).is_err());
    }
}
