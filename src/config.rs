use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct JwtConfig {
    pub secret: String,
    pub ttl_minutes: i64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub database_url: String,
    pub host: String,
    pub port: u16,
    pub jwt: JwtConfig,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        let database_url = std::env::var("DATABASE_URL")?;
        let host = std::env::var("APP_HOST").unwrap_or_else(|_| "0.0.0.0".into());
        let port = std::env::var("APP_PORT")
            .ok()
            .and_then(|v| v.parse::<u16>().ok())
            .unwrap_or(3000);
        let ttl_minutes = std::env::var("JWT_TTL_MINUTES")
            .ok()
            .and_then(|v| v.parse::<i64>().ok())
            .unwrap_or(60 * 24);
        anyhow::ensure!(ttl_minutes > 0, "JWT_TTL_MINUTES must be positive");
        let jwt = JwtConfig {
            secret: std::env::var("JWT_SECRET")?,
            ttl_minutes,
        };
        Ok(Self {
            database_url,
            host,
            port,
            jwt,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // Env vars are process-global; this is the only test touching them.
    #[test]
    fn from_env_rejects_non_positive_ttl() {
        std::env::set_var("DATABASE_URL", "postgres://localhost/blog");
        std::env::set_var("JWT_SECRET", "test-secret");

        std::env::set_var("JWT_TTL_MINUTES", "-5");
        let err = AppConfig::from_env().unwrap_err();
        assert!(err.to_string().contains("JWT_TTL_MINUTES"));

        std::env::set_var("JWT_TTL_MINUTES", "0");
        assert!(AppConfig::from_env().is_err());

        std::env::remove_var("JWT_TTL_MINUTES");
        let config = AppConfig::from_env().expect("default ttl is valid");
        assert_eq!(config.jwt.ttl_minutes, 60 * 24);
    }
}
