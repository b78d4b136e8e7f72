// API configuration loaded from environment variables.
// Decision: defaults are tuned for local development; production values
// come from the environment

use std::time::Duration;

/// Complete API configuration
#[derive(Debug, Clone)]
pub struct ApiConfig {
    /// Postgres connection string (required)
    pub database_url: String,
    /// Listen address
    pub bind_addr: String,
    /// Secret key for signing JWTs
    pub jwt_secret: String,
    /// Access token lifetime
    pub token_lifetime: Duration,
    /// CORS allowed origins; empty means same-origin only
    pub cors_allowed_origins: Vec<String>,
}

impl ApiConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> anyhow::Result<Self> {
        use anyhow::Context;

        let database_url =
            std::env::var("DATABASE_URL").context("DATABASE_URL environment variable required")?;

        let bind_addr =
            std::env::var("BIND_ADDR").unwrap_or_else(|_| "0.0.0.0:9000".to_string());

        let jwt_secret = std::env::var("JWT_SECRET").unwrap_or_else(|_| {
            tracing::warn!("JWT_SECRET not set, using insecure default");
            "insecure-dev-secret-change-me".to_string()
        });

        let token_lifetime = std::env::var("JWT_TOKEN_LIFETIME_HOURS")
            .ok()
            .and_then(|s| s.parse().ok())
            .map(|hours: u64| Duration::from_secs(hours * 60 * 60))
            .unwrap_or_else(|| Duration::from_secs(24 * 60 * 60));

        let cors_allowed_origins = std::env::var("CORS_ALLOWED_ORIGINS")
            .ok()
            .filter(|s| !s.is_empty())
            .map(|s| s.split(',').map(|s| s.trim().to_string()).collect())
            .unwrap_or_default();

        Ok(Self {
            database_url,
            bind_addr,
            jwt_secret,
            token_lifetime,
            cors_allowed_origins,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_token_lifetime_parsing() {
        let lifetime = "12"
            .parse()
            .ok()
            .map(|hours: u64| Duration::from_secs(hours * 60 * 60))
            .unwrap();
        assert_eq!(lifetime, Duration::from_secs(12 * 60 * 60));
    }

    #[test]
    fn test_cors_origin_splitting() {
        let origins: Vec<String> = "https://a.example.com, https://b.example.com"
            .split(',')
            .map(|s| s.trim().to_string())
            .collect();
        assert_eq!(
            origins,
            vec!["https://a.example.com", "https://b.example.com"]
        );
    }
}
