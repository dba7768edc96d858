use std::env;
use tracing::warn;

#[derive(Debug, Clone)]
pub struct AppConfig {
    /// HS256 secret the external auth service signs bearer tokens with.
    pub jwt_secret: String,
    pub port: u16,
    /// Upper bound on concurrently open store transactions.
    pub store_max_transactions: usize,
    /// How long a caller may queue for a transaction permit before the
    /// request fails with a resource-exhaustion error.
    pub store_acquire_timeout_ms: u64,
    /// When true, reschedule requests re-run the same availability and
    /// conflict checks as booking. Off by default to preserve the
    /// historical reschedule behavior.
    pub validate_on_reschedule: bool,
}

impl AppConfig {
    pub fn from_env() -> Self {
        let config = Self {
            jwt_secret: env::var("JWT_SECRET").unwrap_or_else(|_| {
                warn!("JWT_SECRET not set, using empty value");
                String::new()
            }),
            port: parse_env("PORT", 3000),
            store_max_transactions: parse_env("STORE_MAX_TRANSACTIONS", 32),
            store_acquire_timeout_ms: parse_env("STORE_ACQUIRE_TIMEOUT_MS", 5_000),
            validate_on_reschedule: parse_env("VALIDATE_ON_RESCHEDULE", false),
        };

        if !config.is_configured() {
            warn!("Application not fully configured - missing environment variables");
        }

        config
    }

    pub fn is_configured(&self) -> bool {
        !self.jwt_secret.is_empty()
    }
}

fn parse_env<T>(name: &str, default: T) -> T
where
    T: std::str::FromStr + std::fmt::Display + Copy,
{
    match env::var(name) {
        Ok(raw) => raw.parse().unwrap_or_else(|_| {
            warn!("{} has invalid value {:?}, using default {}", name, raw, default);
            default
        }),
        Err(_) => default,
    }
}
