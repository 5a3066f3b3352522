//! Server configuration management.
//!
//! Consolidates all environment variable reads and provides validated configuration.

use knockout::bracket::MIN_PLAYERS;
use knockout::db::DatabaseConfig;
use std::net::SocketAddr;
use std::str::FromStr;

/// Default bind address when neither `--bind` nor `SERVER_BIND` is set
pub const DEFAULT_BIND: SocketAddr =
    SocketAddr::V4(std::net::SocketAddrV4::new(std::net::Ipv4Addr::LOCALHOST, 6969));

/// Complete server configuration loaded from environment variables
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Server bind address
    pub bind: SocketAddr,
    /// Where live tournaments are kept
    pub store: StoreBackend,
    /// Database configuration, used by the postgres backend and match history
    pub database: DatabaseConfig,
    /// Accepted player counts for new tournaments
    pub limits: PlayerLimits,
    /// Fixed seed for reproducible brackets
    pub seed: Option<u64>,
    /// Champion ledger, if notarization is enabled
    pub ledger: Option<LedgerConfig>,
    /// Prometheus exporter listen address
    pub metrics_bind: Option<SocketAddr>,
}

/// Tournament store backend
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreBackend {
    Memory,
    Postgres,
}

impl FromStr for StoreBackend {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "memory" | "mem" => Ok(StoreBackend::Memory),
            "postgres" | "postgresql" | "pg" => Ok(StoreBackend::Postgres),
            other => Err(ConfigError::Invalid {
                var: "STORE_BACKEND".to_string(),
                reason: format!("Unknown backend '{other}' (expected memory or postgres)"),
            }),
        }
    }
}

/// Request limits for tournament size
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlayerLimits {
    pub min_players: usize,
    pub max_players: usize,
}

impl PlayerLimits {
    pub fn contains(&self, player_count: usize) -> bool {
        (self.min_players..=self.max_players).contains(&player_count)
    }
}

impl Default for PlayerLimits {
    fn default() -> Self {
        Self {
            min_players: MIN_PLAYERS,
            max_players: 16,
        }
    }
}

/// Champion ledger endpoint
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LedgerConfig {
    pub url: String,
    pub timeout_secs: u64,
}

impl ServerConfig {
    /// Load configuration from environment variables
    ///
    /// # Arguments
    ///
    /// * `bind_override` - Optional bind address override (from CLI args)
    /// * `database_url_override` - Optional database URL override (from CLI args)
    /// * `store_override` - Optional store backend override (from CLI args)
    /// * `seed_override` - Optional seeding override (from CLI args)
    ///
    /// # Returns
    ///
    /// * `Result<ServerConfig, ConfigError>` - Loaded configuration or error
    ///
    /// # Errors
    ///
    /// Returns error if a variable is set to something unparseable
    pub fn from_env(
        bind_override: Option<SocketAddr>,
        database_url_override: Option<String>,
        store_override: Option<StoreBackend>,
        seed_override: Option<u64>,
    ) -> Result<Self, ConfigError> {
        // Bind address
        let bind = match bind_override {
            Some(bind) => bind,
            None => parse_env_opt("SERVER_BIND")?.unwrap_or(DEFAULT_BIND),
        };

        let store = match store_override {
            Some(store) => store,
            None => std::env::var("STORE_BACKEND")
                .ok()
                .map(|v| v.parse())
                .transpose()?
                .unwrap_or(StoreBackend::Memory),
        };

        // Database configuration
        let mut database = DatabaseConfig::from_env();
        if let Some(url) = database_url_override {
            database.database_url = url;
        }

        let defaults = PlayerLimits::default();
        let limits = PlayerLimits {
            min_players: parse_env_or("MIN_PLAYERS", defaults.min_players),
            max_players: parse_env_or("MAX_PLAYERS", defaults.max_players),
        };

        let seed = match seed_override {
            Some(seed) => Some(seed),
            None => parse_env_opt("SEED")?,
        };

        let ledger = std::env::var("LEDGER_URL")
            .ok()
            .filter(|url| !url.trim().is_empty())
            .map(|url| LedgerConfig {
                url,
                timeout_secs: parse_env_or("LEDGER_TIMEOUT_SECS", 10),
            });

        let metrics_bind = parse_env_opt("METRICS_BIND")?;

        Ok(ServerConfig {
            bind,
            store,
            database,
            limits,
            seed,
            ledger,
            metrics_bind,
        })
    }

    /// Validate configuration after loading
    ///
    /// # Returns
    ///
    /// * `Result<(), ConfigError>` - Success or validation error
    pub fn validate(&self) -> Result<(), ConfigError> {
        // Validate player limits
        if self.limits.min_players < MIN_PLAYERS {
            return Err(ConfigError::Invalid {
                var: "MIN_PLAYERS".to_string(),
                reason: format!("Must be at least {MIN_PLAYERS}"),
            });
        }

        if self.limits.max_players < self.limits.min_players {
            return Err(ConfigError::Invalid {
                var: "MAX_PLAYERS".to_string(),
                reason: format!(
                    "Must be at least min players ({})",
                    self.limits.min_players
                ),
            });
        }

        if self.store == StoreBackend::Postgres && self.database.database_url.is_empty() {
            return Err(ConfigError::MissingRequired {
                var: "DATABASE_URL".to_string(),
                hint: "Required when STORE_BACKEND=postgres".to_string(),
            });
        }

        if let Some(ledger) = &self.ledger {
            if !(ledger.url.starts_with("http://") || ledger.url.starts_with("https://")) {
                return Err(ConfigError::Invalid {
                    var: "LEDGER_URL".to_string(),
                    reason: "Must be an http(s) URL".to_string(),
                });
            }

            if ledger.timeout_secs == 0 {
                return Err(ConfigError::Invalid {
                    var: "LEDGER_TIMEOUT_SECS".to_string(),
                    reason: "Must be greater than 0".to_string(),
                });
            }
        }

        Ok(())
    }
}

/// Configuration error types
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {var}\nHint: {hint}")]
    MissingRequired { var: String, hint: String },

    #[error("Invalid configuration for {var}: {reason}")]
    Invalid { var: String, reason: String },
}

/// Helper to parse environment variable with default fallback
fn parse_env_or<T>(key: &str, default: T) -> T
where
    T: FromStr,
{
    std::env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

/// Parse an optional environment variable; set-but-invalid is an error
fn parse_env_opt<T>(key: &str) -> Result<Option<T>, ConfigError>
where
    T: FromStr,
{
    match std::env::var(key) {
        Ok(v) if !v.trim().is_empty() => {
            v.trim()
                .parse()
                .map(Some)
                .map_err(|_| ConfigError::Invalid {
                    var: key.to_string(),
                    reason: format!("Cannot parse '{v}'"),
                })
        }
        _ => Ok(None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    const VARS: [&str; 9] = [
        "SERVER_BIND",
        "STORE_BACKEND",
        "DATABASE_URL",
        "MIN_PLAYERS",
        "MAX_PLAYERS",
        "SEED",
        "LEDGER_URL",
        "LEDGER_TIMEOUT_SECS",
        "METRICS_BIND",
    ];

    fn clear_env() {
        for var in VARS {
            unsafe { std::env::remove_var(var) };
        }
    }

    fn base_config() -> ServerConfig {
        ServerConfig {
            bind: "127.0.0.1:8080".parse().unwrap(),
            store: StoreBackend::Memory,
            database: DatabaseConfig {
                database_url: "test".to_string(),
                max_connections: 10,
                min_connections: 1,
                connection_timeout_secs: 5,
                idle_timeout_secs: 300,
                max_lifetime_secs: 1800,
            },
            limits: PlayerLimits::default(),
            seed: None,
            ledger: None,
            metrics_bind: None,
        }
    }

    #[test]
    fn test_config_error_display() {
        let err = ConfigError::MissingRequired {
            var: "DATABASE_URL".to_string(),
            hint: "Set it".to_string(),
        };
        let msg = err.to_string();
        assert!(msg.contains("DATABASE_URL"));
        assert!(msg.contains("Set it"));
    }

    #[test]
    fn test_store_backend_parsing() {
        assert_eq!("memory".parse::<StoreBackend>().unwrap(), StoreBackend::Memory);
        assert_eq!("Postgres".parse::<StoreBackend>().unwrap(), StoreBackend::Postgres);
        assert!("redis".parse::<StoreBackend>().is_err());
    }

    #[test]
    #[serial]
    fn test_defaults_from_empty_env() {
        clear_env();
        let config = ServerConfig::from_env(None, None, None, None).unwrap();

        assert_eq!(config.bind, DEFAULT_BIND);
        assert_eq!(config.store, StoreBackend::Memory);
        assert_eq!(config.limits, PlayerLimits::default());
        assert!(config.seed.is_none());
        assert!(config.ledger.is_none());
        assert!(config.metrics_bind.is_none());
        assert!(config.validate().is_ok());
    }

    #[test]
    #[serial]
    fn test_env_values_and_overrides() {
        clear_env();
        unsafe {
            std::env::set_var("SERVER_BIND", "0.0.0.0:7000");
            std::env::set_var("STORE_BACKEND", "postgres");
            std::env::set_var("MAX_PLAYERS", "64");
            std::env::set_var("SEED", "42");
            std::env::set_var("LEDGER_URL", "http://ledger.local/api");
        }

        let config = ServerConfig::from_env(None, None, None, None).unwrap();
        assert_eq!(config.bind, "0.0.0.0:7000".parse().unwrap());
        assert_eq!(config.store, StoreBackend::Postgres);
        assert_eq!(config.limits.max_players, 64);
        assert_eq!(config.seed, Some(42));
        assert_eq!(
            config.ledger,
            Some(LedgerConfig {
                url: "http://ledger.local/api".to_string(),
                timeout_secs: 10
            })
        );

        let overridden = ServerConfig::from_env(
            Some("127.0.0.1:9000".parse().unwrap()),
            Some("postgres://elsewhere/db".to_string()),
            Some(StoreBackend::Memory),
            Some(7),
        )
        .unwrap();
        assert_eq!(overridden.bind.port(), 9000);
        assert_eq!(overridden.database.database_url, "postgres://elsewhere/db");
        assert_eq!(overridden.store, StoreBackend::Memory);
        assert_eq!(overridden.seed, Some(7));

        clear_env();
    }

    #[test]
    #[serial]
    fn test_unparseable_env_is_error() {
        clear_env();
        unsafe { std::env::set_var("SEED", "not-a-number") };

        let err = ServerConfig::from_env(None, None, None, None).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { ref var, .. } if var == "SEED"));

        clear_env();
    }

    #[test]
    fn test_validation_player_limits() {
        let mut config = base_config();
        config.limits.min_players = 1;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::Invalid { ref var, .. }) if var == "MIN_PLAYERS"
        ));

        let mut config = base_config();
        config.limits = PlayerLimits {
            min_players: 8,
            max_players: 4,
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::Invalid { ref var, .. }) if var == "MAX_PLAYERS"
        ));
    }

    #[test]
    fn test_validation_ledger() {
        let mut config = base_config();
        config.ledger = Some(LedgerConfig {
            url: "ftp://ledger".to_string(),
            timeout_secs: 5,
        });
        assert!(config.validate().is_err());

        config.ledger = Some(LedgerConfig {
            url: "https://ledger".to_string(),
            timeout_secs: 0,
        });
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validation_postgres_needs_url() {
        let mut config = base_config();
        config.store = StoreBackend::Postgres;
        config.database.database_url = String::new();
        assert!(matches!(
            config.validate(),
            Err(ConfigError::MissingRequired { .. })
        ));
    }

    #[test]
    fn test_player_limits_contains() {
        let limits = PlayerLimits::default();
        assert!(!limits.contains(1));
        assert!(limits.contains(2));
        assert!(limits.contains(16));
        assert!(!limits.contains(17));
    }
}
