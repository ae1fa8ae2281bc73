use crate::cache::DEFAULT_TTL_SECS;
use chrono::Duration;
use serde::Deserialize;
use std::net::SocketAddr;

/// Prefix of the environment variables read by the server, e.g.
/// `JOURNAL_PDF_ADDR` and `JOURNAL_PDF_CACHE_TTL_SECS`.
pub const ENV_PREFIX: &str = "JOURNAL_PDF";
pub const DEFAULT_ADDR: &str = "0.0.0.0:3000";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error(transparent)]
    Load(#[from] config::ConfigError),
    #[error("cache_ttl_secs must be a positive number of seconds, got {0}")]
    InvalidTtl(i64),
}

/// Server settings, layered from built-in defaults and the environment.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ServerConfig {
    pub addr: SocketAddr,
    pub cache_ttl_secs: i64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            addr: SocketAddr::from(([0, 0, 0, 0], 3000)),
            cache_ttl_secs: DEFAULT_TTL_SECS,
        }
    }
}

impl ServerConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::load(environment())
    }

    /// Loads the config from an explicit set of variables instead of the
    /// process environment. Names carry the usual `JOURNAL_PDF_` prefix.
    pub fn from_vars<I, K, V>(vars: I) -> Result<Self, ConfigError>
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let vars: config::Map<String, String> = vars
            .into_iter()
            .map(|(key, value)| (key.into(), value.into()))
            .collect();
        Self::load(environment().source(Some(vars)))
    }

    fn load(environment: config::Environment) -> Result<Self, ConfigError> {
        let settings: Self = config::Config::builder()
            .set_default("addr", DEFAULT_ADDR)?
            .set_default("cache_ttl_secs", DEFAULT_TTL_SECS)?
            .add_source(environment)
            .build()?
            .try_deserialize()?;

        if settings.cache_ttl_secs <= 0 || Duration::try_seconds(settings.cache_ttl_secs).is_none() {
            return Err(ConfigError::InvalidTtl(settings.cache_ttl_secs));
        }
        Ok(settings)
    }

    pub fn cache_ttl(&self) -> Duration {
        Duration::try_seconds(self.cache_ttl_secs)
            .unwrap_or_else(|| Duration::seconds(DEFAULT_TTL_SECS))
    }
}

fn environment() -> config::Environment {
    config::Environment::with_prefix(ENV_PREFIX).separator("__")
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_defaults() {
        let config = ServerConfig::from_vars(Vec::<(String, String)>::new()).unwrap();
        assert_eq!(config, ServerConfig::default());
        assert_eq!(config.addr.to_string(), DEFAULT_ADDR);
        assert_eq!(config.cache_ttl().num_seconds(), 86_400);
    }

    #[test]
    fn test_overrides() {
        let config = ServerConfig::from_vars([
            ("JOURNAL_PDF_ADDR", "127.0.0.1:8080"),
            ("JOURNAL_PDF_CACHE_TTL_SECS", "600"),
        ])
        .unwrap();
        assert_eq!(config.addr.to_string(), "127.0.0.1:8080");
        assert_eq!(config.cache_ttl_secs, 600);
        assert_eq!(config.cache_ttl().num_seconds(), 600);
    }

    #[test]
    fn test_unprefixed_variables_are_ignored() {
        let config = ServerConfig::from_vars([("ADDR", "127.0.0.1:1")]).unwrap();
        assert_eq!(config, ServerConfig::default());
    }

    #[test]
    fn test_invalid_address() {
        let err = ServerConfig::from_vars([("JOURNAL_PDF_ADDR", "nowhere")]).unwrap_err();
        assert!(matches!(err, ConfigError::Load(_)));
    }

    #[test]
    fn test_invalid_ttl() {
        for ttl in ["0", "-5"] {
            let err = ServerConfig::from_vars([("JOURNAL_PDF_CACHE_TTL_SECS", ttl)]).unwrap_err();
            assert!(matches!(err, ConfigError::InvalidTtl(_)), "{ttl}");
        }

        let err = ServerConfig::from_vars([("JOURNAL_PDF_CACHE_TTL_SECS", "soon")]).unwrap_err();
        assert!(matches!(err, ConfigError::Load(_)));
    }
}
