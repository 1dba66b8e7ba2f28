//! Application settings loaded from environment variables.

use std::env;

use super::constants::{
    DEFAULT_CHAT_API_BASE, DEFAULT_CHAT_TIMEOUT_SECS, DEFAULT_DATABASE_URL, DEFAULT_SERVER_HOST,
    DEFAULT_SERVER_PORT, DEFAULT_JWT_EXPIRATION_HOURS, DEFAULT_XRAY_DIR, MIN_JWT_SECRET_LENGTH,
};

/// Application configuration
#[derive(Clone)]
pub struct Config {
    pub database_url: String,
    jwt_secret: String,
    pub jwt_expiration_hours: i64,
    pub server_host: String,
    pub server_port: u16,
    pub xray_dir: String,
    /// Key for the OpenAI-compatible chat upstream; absent outside production
    /// triggers the canned stub reply.
    pub chat_api_key: Option<String>,
    pub chat_api_base: String,
    pub chat_timeout_secs: u64,
    /// True when APP_ENV=production; gates the chat stub behavior.
    pub production: bool,
    /// Allowed CORS origin for the frontend
    pub frontend_origin: Option<String>,
}

impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("database_url", &"[REDACTED]")
            .field("jwt_secret", &"[REDACTED]")
            .field("jwt_expiration_hours", &self.jwt_expiration_hours)
            .field("server_host", &self.server_host)
            .field("server_port", &self.server_port)
            .field("xray_dir", &self.xray_dir)
            .field("chat_api_key", &self.chat_api_key.as_ref().map(|_| "[REDACTED]"))
            .field("chat_api_base", &self.chat_api_base)
            .field("chat_timeout_secs", &self.chat_timeout_secs)
            .field("production", &self.production)
            .field("frontend_origin", &self.frontend_origin)
            .finish()
    }
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// # Panics
    /// Panics if JWT_SECRET is not set or is too short (security requirement).
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();

        let production = env::var("APP_ENV")
            .map(|v| v.eq_ignore_ascii_case("production"))
            .unwrap_or(false);

        let jwt_secret = env::var("JWT_SECRET").unwrap_or_else(|_| {
            if production {
                panic!("JWT_SECRET environment variable must be set in production");
            }
            tracing::warn!("JWT_SECRET not set, using insecure default for development");
            "dev-secret-key-minimum-32-chars!!".to_string()
        });

        // Validate JWT secret length
        if jwt_secret.len() < MIN_JWT_SECRET_LENGTH {
            panic!(
                "JWT_SECRET must be at least {} characters long",
                MIN_JWT_SECRET_LENGTH
            );
        }

        Self {
            database_url: env::var("DATABASE_URL")
                .unwrap_or_else(|_| DEFAULT_DATABASE_URL.to_string()),
            jwt_secret,
            jwt_expiration_hours: env::var("JWT_EXPIRATION_HOURS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(DEFAULT_JWT_EXPIRATION_HOURS),
            server_host: env::var("SERVER_HOST")
                .unwrap_or_else(|_| DEFAULT_SERVER_HOST.to_string()),
            server_port: env::var("SERVER_PORT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(DEFAULT_SERVER_PORT),
            xray_dir: env::var("XRAY_DIR").unwrap_or_else(|_| DEFAULT_XRAY_DIR.to_string()),
            chat_api_key: env::var("CHAT_API_KEY")
                .ok()
                .map(|k| k.trim().to_string())
                .filter(|k| !k.is_empty()),
            chat_api_base: env::var("CHAT_API_BASE")
                .unwrap_or_else(|_| DEFAULT_CHAT_API_BASE.to_string()),
            chat_timeout_secs: env::var("CHAT_TIMEOUT_SECS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(DEFAULT_CHAT_TIMEOUT_SECS),
            production,
            frontend_origin: env::var("PUBLIC_APP_URL").ok(),
        }
    }

    /// Fixed configuration for unit tests; no environment access.
    #[cfg(any(test, feature = "test-utils"))]
    pub fn for_tests() -> Self {
        Self {
            database_url: "postgres://localhost/test".to_string(),
            jwt_secret: "test-secret-key-minimum-32-chars!".to_string(),
            jwt_expiration_hours: DEFAULT_JWT_EXPIRATION_HOURS,
            server_host: DEFAULT_SERVER_HOST.to_string(),
            server_port: DEFAULT_SERVER_PORT,
            xray_dir: DEFAULT_XRAY_DIR.to_string(),
            chat_api_key: None,
            chat_api_base: DEFAULT_CHAT_API_BASE.to_string(),
            chat_timeout_secs: DEFAULT_CHAT_TIMEOUT_SECS,
            production: false,
            frontend_origin: None,
        }
    }

    /// Get JWT secret bytes for token signing/verification.
    pub fn jwt_secret_bytes(&self) -> &[u8] {
        self.jwt_secret.as_bytes()
    }

    /// Get the full server address.
    pub fn server_addr(&self) -> String {
        format!("{}:{}", self.server_host, self.server_port)
    }
}
