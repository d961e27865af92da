use crate::auth::jwt::JwtConfig;

/// Server configuration loaded from environment variables.
///
/// All fields have sensible defaults suitable for local development, except
/// the secrets (`JWT_SECRET`, `GOOGLE_PLACES_API_KEY`) which must be set.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address (default: `0.0.0.0`).
    pub host: String,
    /// Bind port (default: `3000`).
    pub port: u16,
    /// Allowed CORS origins, parsed from comma-separated `CORS_ORIGINS` env var.
    pub cors_origins: Vec<String>,
    /// HTTP request timeout in seconds (default: `30`).
    pub request_timeout_secs: u64,
    /// JWT token configuration (secret, expiry duration).
    pub jwt: JwtConfig,
    /// API key for the external places provider.
    pub places_api_key: String,
    /// Override for the places provider base URL (used by tests / proxies).
    pub places_base_url: Option<String>,
}

impl ServerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                  | Required | Default                 |
    /// |--------------------------|----------|-------------------------|
    /// | `HOST`                   | no       | `0.0.0.0`               |
    /// | `PORT`                   | no       | `3000`                  |
    /// | `CORS_ORIGINS`           | no       | `http://localhost:3001` |
    /// | `REQUEST_TIMEOUT_SECS`   | no       | `30`                    |
    /// | `GOOGLE_PLACES_API_KEY`  | **yes**  | --                      |
    /// | `GOOGLE_PLACES_BASE_URL` | no       | provider default        |
    ///
    /// # Panics
    ///
    /// Panics if a required variable is missing or a numeric variable fails
    /// to parse. Startup is the one place where failing fast beats
    /// propagating errors.
    pub fn from_env() -> Self {
        let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".into());

        let port: u16 = std::env::var("PORT")
            .unwrap_or_else(|_| "3000".into())
            .parse()
            .expect("PORT must be a valid u16");

        let cors_origins: Vec<String> = std::env::var("CORS_ORIGINS")
            .unwrap_or_else(|_| "http://localhost:3001".into())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let request_timeout_secs: u64 = std::env::var("REQUEST_TIMEOUT_SECS")
            .unwrap_or_else(|_| "30".into())
            .parse()
            .expect("REQUEST_TIMEOUT_SECS must be a valid u64");

        let places_api_key = std::env::var("GOOGLE_PLACES_API_KEY")
            .expect("GOOGLE_PLACES_API_KEY must be set in the environment");

        let places_base_url = std::env::var("GOOGLE_PLACES_BASE_URL").ok();

        let jwt = JwtConfig::from_env();

        Self {
            host,
            port,
            cors_origins,
            request_timeout_secs,
            jwt,
            places_api_key,
            places_base_url,
        }
    }
}
