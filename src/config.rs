use anyhow::{Context, Result};
use dotenvy::dotenv;
use std::env;

/// Runtime settings, read once at startup.
#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub bind_addr: String,
    pub max_connections: u32,
    pub auth: AuthSettings,
}

/// Settings the auth handlers and middleware need on every request.
#[derive(Debug, Clone, Copy)]
pub struct AuthSettings {
    pub session_ttl: chrono::Duration,
    pub bcrypt_cost: u32,
}

impl Default for AuthSettings {
    fn default() -> Self {
        Self {
            session_ttl: chrono::Duration::hours(720),
            bcrypt_cost: bcrypt::DEFAULT_COST,
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self> {
        // a missing .env file is fine, the variables may come from the environment
        if let Err(e) = dotenv() {
            tracing::debug!("No .env file loaded: {}", e);
        }

        let defaults = AuthSettings::default();

        let database_url =
            env::var("DATABASE_URL").unwrap_or_else(|_| "sqlite://social_network.db".to_string());
        let bind_addr = env::var("BIND_ADDR").unwrap_or_else(|_| "0.0.0.0:3000".to_string());

        let max_connections = parse_var("DB_MAX_CONNECTIONS", 20)?;
        let session_ttl_hours = parse_var("SESSION_TTL_HOURS", 720)?;
        let bcrypt_cost = parse_var("BCRYPT_COST", defaults.bcrypt_cost)?;

        Ok(Self {
            database_url,
            bind_addr,
            max_connections,
            auth: AuthSettings {
                session_ttl: chrono::Duration::hours(session_ttl_hours),
                bcrypt_cost,
            },
        })
    }
}

fn parse_var<T>(name: &str, default: T) -> Result<T>
where
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match env::var(name) {
        Ok(raw) => raw
            .trim()
            .parse::<T>()
            .with_context(|| format!("{} must be a valid number, got {:?}", name, raw)),
        Err(_) => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_var_falls_back_to_default_when_unset() {
        let value: u32 = parse_var("SOCIAL_NETWORK_TEST_UNSET_VAR", 42).unwrap();
        assert_eq!(value, 42);
    }

    #[test]
    fn parse_var_rejects_garbage() {
        env::set_var("SOCIAL_NETWORK_TEST_BAD_VAR", "not-a-number");
        let result: Result<u32> = parse_var("SOCIAL_NETWORK_TEST_BAD_VAR", 1);
        assert!(result.is_err());
    }
}
