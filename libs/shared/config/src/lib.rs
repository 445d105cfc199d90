use std::env;
use std::net::SocketAddr;
use tracing::warn;

pub const DEFAULT_PORT: u16 = 5001;
pub const DEFAULT_MAX_CONNECTIONS: u32 = 10;
pub const DEFAULT_SESSION_TTL_HOURS: i64 = 12;

#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Empty means the in-memory store is used.
    pub database_url: String,
    pub database_max_connections: u32,
    pub session_secret: String,
    pub session_ttl_hours: i64,
    pub admin_username: String,
    pub admin_password: String,
    pub port: u16,
}

impl AppConfig {
    pub fn from_env() -> Self {
        let config = Self {
            database_url: env::var("DATABASE_URL")
                .unwrap_or_else(|_| {
                    warn!("DATABASE_URL not set, falling back to the in-memory store");
                    String::new()
                }),
            database_max_connections: parse_or_default(
                "DATABASE_MAX_CONNECTIONS",
                DEFAULT_MAX_CONNECTIONS,
            ),
            session_secret: env::var("SESSION_SECRET")
                .unwrap_or_else(|_| {
                    warn!("SESSION_SECRET not set, using empty value");
                    String::new()
                }),
            session_ttl_hours: parse_or_default("SESSION_TTL_HOURS", DEFAULT_SESSION_TTL_HOURS),
            admin_username: env::var("ADMIN_USERNAME")
                .unwrap_or_else(|_| {
                    warn!("ADMIN_USERNAME not set, admin login disabled");
                    String::new()
                }),
            admin_password: env::var("ADMIN_PASSWORD")
                .unwrap_or_else(|_| {
                    warn!("ADMIN_PASSWORD not set, admin login disabled");
                    String::new()
                }),
            port: parse_or_default("PORT", DEFAULT_PORT),
        };

        if !config.is_configured() {
            warn!("Application not fully configured - missing environment variables");
        }

        config
    }

    /// Sessions cannot be issued or checked without a secret.
    pub fn is_configured(&self) -> bool {
        !self.session_secret.is_empty()
    }

    pub fn uses_in_memory_store(&self) -> bool {
        self.database_url.is_empty()
    }

    pub fn is_admin_login_enabled(&self) -> bool {
        !self.admin_username.is_empty() && !self.admin_password.is_empty()
    }

    pub fn bind_address(&self) -> SocketAddr {
        SocketAddr::from(([0, 0, 0, 0], self.port))
    }
}

fn parse_or_default<T>(key: &str, default: T) -> T
where
    T: std::str::FromStr + std::fmt::Display + Copy,
{
    match env::var(key) {
        Ok(raw) => raw.trim().parse().unwrap_or_else(|_| {
            warn!("{} has invalid value {:?}, using default {}", key, raw, default);
            default
        }),
        Err(_) => default,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> AppConfig {
        AppConfig {
            database_url: String::new(),
            database_max_connections: DEFAULT_MAX_CONNECTIONS,
            session_secret: "secret".to_string(),
            session_ttl_hours: DEFAULT_SESSION_TTL_HOURS,
            admin_username: String::new(),
            admin_password: String::new(),
            port: DEFAULT_PORT,
        }
    }

    #[test]
    fn empty_database_url_selects_memory_store() {
        let config = config();
        assert!(config.uses_in_memory_store());
        assert!(config.is_configured());
        assert!(!config.is_admin_login_enabled());
    }

    #[test]
    fn bind_address_uses_port() {
        let mut config = config();
        config.port = 8080;
        assert_eq!(config.bind_address().port(), 8080);
    }
}
