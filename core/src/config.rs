//! Client configuration.

use serde::Deserialize;

use crate::codec::KeyConvention;
use crate::error::{ApiError, Result};

pub const BASE_URL_ENV: &str = "API_BASE_URL";
pub const KEY_CONVENTION_ENV: &str = "API_KEY_CONVENTION";

/// Settings an `ApiClient` is built from. Deserializable so it can sit inside
/// a larger application config.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ClientConfig {
    /// Origin every request path is appended to, verbatim.
    pub base_url: String,
    #[serde(default)]
    pub key_convention: KeyConvention,
}

impl ClientConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            key_convention: KeyConvention::default(),
        }
    }

    pub fn with_key_convention(mut self, convention: KeyConvention) -> Self {
        self.key_convention = convention;
        self
    }

    /// Read `API_BASE_URL` and the optional `API_KEY_CONVENTION`
    /// (`snake_case` or `verbatim`).
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let base_url = lookup(BASE_URL_ENV)
            .filter(|url| !url.is_empty())
            .ok_or_else(|| ApiError::construction(format!("{BASE_URL_ENV} is not set")))?;
        let key_convention = match lookup(KEY_CONVENTION_ENV).as_deref() {
            None | Some("") | Some("snake_case") => KeyConvention::SnakeCase,
            Some("verbatim") => KeyConvention::Verbatim,
            Some(other) => {
                return Err(ApiError::construction(format!(
                    "unknown {KEY_CONVENTION_ENV}: {other}"
                )))
            }
        };
        Ok(Self {
            base_url,
            key_convention,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn from_lookup_reads_base_url_and_defaults_to_snake_case() {
        let config = ClientConfig::from_lookup(lookup(&[(BASE_URL_ENV, "https://api.test")]))
            .unwrap();
        assert_eq!(config, ClientConfig::new("https://api.test"));
        assert_eq!(config.key_convention, KeyConvention::SnakeCase);
    }

    #[test]
    fn from_lookup_reads_verbatim_convention() {
        let config = ClientConfig::from_lookup(lookup(&[
            (BASE_URL_ENV, "https://api.test"),
            (KEY_CONVENTION_ENV, "verbatim"),
        ]))
        .unwrap();
        assert_eq!(config.key_convention, KeyConvention::Verbatim);
    }

    #[test]
    fn missing_base_url_is_an_error() {
        let err = ClientConfig::from_lookup(lookup(&[])).unwrap_err();
        assert!(matches!(err, ApiError::Construction { .. }));
    }

    #[test]
    fn unknown_convention_is_an_error() {
        let err = ClientConfig::from_lookup(lookup(&[
            (BASE_URL_ENV, "https://api.test"),
            (KEY_CONVENTION_ENV, "kebab"),
        ]))
        .unwrap_err();
        assert!(err.to_string().contains("kebab"));
    }

    #[test]
    fn deserializes_with_default_convention() {
        let config: ClientConfig =
            serde_json::from_str(r#"{"base_url":"https://api.test"}"#).unwrap();
        assert_eq!(config.key_convention, KeyConvention::SnakeCase);

        let config: ClientConfig = serde_json::from_str(
            r#"{"base_url":"https://api.test","key_convention":"verbatim"}"#,
        )
        .unwrap();
        assert_eq!(config.key_convention, KeyConvention::Verbatim);
    }
}
