use academy_core::search::{DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE};

/// Errors raised while reading configuration from the environment.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),

    #[error("{name} must be {expected}, got '{value}'")]
    Invalid {
        name: &'static str,
        expected: &'static str,
        value: String,
    },
}

/// Output format of the log subscriber.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Text,
    Json,
}

/// Catalog configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct CatalogConfig {
    /// PostgreSQL connection string.
    pub database_url: String,
    /// Upper bound of the connection pool (default: `20`).
    pub db_max_connections: u32,
    /// Page size when the caller does not pass one (default: `12`).
    pub default_page_size: i64,
    /// `text` or `json` (default: `text`).
    pub log_format: LogFormat,
}

impl CatalogConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var              | Default  |
    /// |----------------------|----------|
    /// | `DATABASE_URL`       | required |
    /// | `DB_MAX_CONNECTIONS` | `20`     |
    /// | `DEFAULT_PAGE_SIZE`  | `12`     |
    /// | `LOG_FORMAT`         | `text`   |
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let database_url = lookup("DATABASE_URL")
            .filter(|v| !v.trim().is_empty())
            .ok_or(ConfigError::Missing("DATABASE_URL"))?;

        let db_max_connections = match lookup("DB_MAX_CONNECTIONS") {
            None => 20,
            Some(value) => value
                .trim()
                .parse::<u32>()
                .ok()
                .filter(|n| *n > 0)
                .ok_or(ConfigError::Invalid {
                    name: "DB_MAX_CONNECTIONS",
                    expected: "a positive integer",
                    value,
                })?,
        };

        let default_page_size = match lookup("DEFAULT_PAGE_SIZE") {
            None => DEFAULT_PAGE_SIZE,
            Some(value) => value
                .trim()
                .parse::<i64>()
                .ok()
                .filter(|n| (1..=MAX_PAGE_SIZE).contains(n))
                .ok_or(ConfigError::Invalid {
                    name: "DEFAULT_PAGE_SIZE",
                    expected: "an integer between 1 and 100",
                    value,
                })?,
        };

        let log_format = match lookup("LOG_FORMAT").as_deref().map(str::trim) {
            None | Some("") | Some("text") => LogFormat::Text,
            Some("json") => LogFormat::Json,
            Some(other) => {
                return Err(ConfigError::Invalid {
                    name: "LOG_FORMAT",
                    expected: "`text` or `json`",
                    value: other.to_string(),
                })
            }
        };

        Ok(Self {
            database_url,
            db_max_connections,
            default_page_size,
            log_format,
        })
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use assert_matches::assert_matches;

    use super::*;

    fn load(vars: &[(&str, &str)]) -> Result<CatalogConfig, ConfigError> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        CatalogConfig::from_lookup(|name| map.get(name).cloned())
    }

    #[test]
    fn defaults_apply() {
        let config = load(&[("DATABASE_URL", "postgres://localhost/academy")]).unwrap();
        assert_eq!(config.db_max_connections, 20);
        assert_eq!(config.default_page_size, 12);
        assert_eq!(config.log_format, LogFormat::Text);
    }

    #[test]
    fn database_url_required() {
        assert_matches!(load(&[]), Err(ConfigError::Missing("DATABASE_URL")));
        assert_matches!(
            load(&[("DATABASE_URL", "  ")]),
            Err(ConfigError::Missing("DATABASE_URL"))
        );
    }

    #[test]
    fn overrides_parsed() {
        let config = load(&[
            ("DATABASE_URL", "postgres://db/academy"),
            ("DB_MAX_CONNECTIONS", "5"),
            ("DEFAULT_PAGE_SIZE", "24"),
            ("LOG_FORMAT", "json"),
        ])
        .unwrap();
        assert_eq!(config.db_max_connections, 5);
        assert_eq!(config.default_page_size, 24);
        assert_eq!(config.log_format, LogFormat::Json);
    }

    #[test]
    fn invalid_values_rejected() {
        assert_matches!(
            load(&[("DATABASE_URL", "x"), ("DB_MAX_CONNECTIONS", "0")]),
            Err(ConfigError::Invalid {
                name: "DB_MAX_CONNECTIONS",
                ..
            })
        );
        assert_matches!(
            load(&[("DATABASE_URL", "x"), ("DEFAULT_PAGE_SIZE", "500")]),
            Err(ConfigError::Invalid {
                name: "DEFAULT_PAGE_SIZE",
                ..
            })
        );
        assert_matches!(
            load(&[("DATABASE_URL", "x"), ("LOG_FORMAT", "xml")]),
            Err(ConfigError::Invalid {
                name: "LOG_FORMAT",
                ..
            })
        );
    }
}
