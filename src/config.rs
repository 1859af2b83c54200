use anyhow::{Context, Result};

/// Minimum length accepted for either signing secret.
const MIN_SECRET_LEN: usize = 32;

#[derive(Debug, Clone)]
pub struct Config {
    pub general: GeneralConfig,

    pub server: ServerConfig,

    pub database: DatabaseConfig,

    pub auth: AuthConfig,

    pub observability: ObservabilityConfig,
}

#[derive(Debug, Clone)]
pub struct GeneralConfig {
    pub log_level: String,
}

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub port: u16,

    pub cors_allowed_origins: Vec<String>,
}

#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    pub url: String,

    pub max_connections: u32,

    pub min_connections: u32,
}

/// Token signing secrets. Loaded once at startup; absence is startup-fatal,
/// they are never derived from user input.
#[derive(Debug, Clone)]
pub struct AuthConfig {
    pub access_token_secret: String,

    pub refresh_token_secret: String,
}

#[derive(Debug, Clone)]
pub struct ObservabilityConfig {
    pub metrics_enabled: bool,
}

fn env_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

fn env_parse_or<T: std::str::FromStr>(key: &str, default: T) -> T {
    std::env::var(key)
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or(default)
}

impl Config {
    /// Loads configuration from the environment (a `.env` file is honored
    /// when present).
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();

        let access_token_secret = std::env::var("PIZZARR_ACCESS_TOKEN_SECRET")
            .context("PIZZARR_ACCESS_TOKEN_SECRET must be set")?;
        let refresh_token_secret = std::env::var("PIZZARR_REFRESH_TOKEN_SECRET")
            .context("PIZZARR_REFRESH_TOKEN_SECRET must be set")?;

        let cors_allowed_origins = env_or("PIZZARR_CORS_ALLOWED_ORIGINS", "*")
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        Ok(Self {
            general: GeneralConfig {
                log_level: env_or("PIZZARR_LOG_LEVEL", "info"),
            },
            server: ServerConfig {
                port: env_parse_or("PIZZARR_PORT", 8000),
                cors_allowed_origins,
            },
            database: DatabaseConfig {
                url: env_or("DATABASE_URL", "sqlite:data/pizzarr.db"),
                max_connections: env_parse_or("PIZZARR_MAX_DB_CONNECTIONS", 5),
                min_connections: env_parse_or("PIZZARR_MIN_DB_CONNECTIONS", 1),
            },
            auth: AuthConfig {
                access_token_secret,
                refresh_token_secret,
            },
            observability: ObservabilityConfig {
                metrics_enabled: env_parse_or("PIZZARR_METRICS_ENABLED", true),
            },
        })
    }

    pub fn validate(&self) -> Result<()> {
        if self.auth.access_token_secret.len() < MIN_SECRET_LEN {
            anyhow::bail!(
                "PIZZARR_ACCESS_TOKEN_SECRET must be at least {MIN_SECRET_LEN} characters"
            );
        }

        if self.auth.refresh_token_secret.len() < MIN_SECRET_LEN {
            anyhow::bail!(
                "PIZZARR_REFRESH_TOKEN_SECRET must be at least {MIN_SECRET_LEN} characters"
            );
        }

        // One secret per token kind is what keeps access and refresh tokens
        // from being interchangeable.
        if self.auth.access_token_secret == self.auth.refresh_token_secret {
            anyhow::bail!("Access and refresh token secrets must differ");
        }

        if self.database.url.is_empty() {
            anyhow::bail!("DATABASE_URL cannot be empty");
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_config() -> Config {
        Config {
            general: GeneralConfig {
                log_level: "info".to_string(),
            },
            server: ServerConfig {
                port: 8000,
                cors_allowed_origins: vec!["*".to_string()],
            },
            database: DatabaseConfig {
                url: "sqlite::memory:".to_string(),
                max_connections: 5,
                min_connections: 1,
            },
            auth: AuthConfig {
                access_token_secret: "access-secret-for-tests-0123456789ab".to_string(),
                refresh_token_secret: "refresh-secret-for-tests-0123456789a".to_string(),
            },
            observability: ObservabilityConfig {
                metrics_enabled: false,
            },
        }
    }

    #[test]
    fn valid_config_passes() {
        assert!(test_config().validate().is_ok());
    }

    #[test]
    fn short_secret_rejected() {
        let mut config = test_config();
        config.auth.access_token_secret = "short".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn identical_secrets_rejected() {
        let mut config = test_config();
        config.auth.refresh_token_secret = config.auth.access_token_secret.clone();
        assert!(config.validate().is_err());
    }
}
