use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::env;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub environment: Environment,
    pub database: DatabaseConfig,
    pub security: SecurityConfig,
    pub media: MediaConfig,
    pub api: ApiConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Environment {
    Development,
    Staging,
    Production,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    pub max_connections: u32,
    pub connect_timeout_secs: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SecurityConfig {
    /// HS256 signing secret. Empty means token issuance/verification fails.
    pub jwt_secret: String,
    pub access_token_ttl_mins: i64,
    pub refresh_token_ttl_days: i64,
    pub enable_audit_logging: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MediaConfig {
    /// Upload endpoint of the external media host.
    pub upload_url: String,
    pub api_key: Option<String>,
    /// Client-side cap on a single upload call, so a stalled collaborator
    /// cannot hang a handler.
    pub timeout_secs: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    pub max_upload_size_bytes: usize,
}

impl AppConfig {
    pub fn from_env() -> Self {
        let environment = match env::var("APP_ENV").as_deref() {
            Ok("production") | Ok("prod") => Environment::Production,
            Ok("staging") | Ok("stage") => Environment::Staging,
            _ => Environment::Development,
        };

        // Set defaults based on environment, then override with specific env vars
        match environment {
            Environment::Production => Self::production(),
            Environment::Staging => Self::staging(),
            Environment::Development => Self::development(),
        }
        .with_env_overrides()
    }

    fn with_env_overrides(mut self) -> Self {
        // Database overrides
        if let Ok(v) = env::var("DATABASE_MAX_CONNECTIONS") {
            self.database.max_connections = v.parse().unwrap_or(self.database.max_connections);
        }
        if let Ok(v) = env::var("DATABASE_CONNECT_TIMEOUT") {
            self.database.connect_timeout_secs = v.parse().unwrap_or(self.database.connect_timeout_secs);
        }

        // Security overrides
        if let Ok(v) = env::var("JWT_SECRET") {
            self.security.jwt_secret = v;
        }
        if let Ok(v) = env::var("SECURITY_ACCESS_TOKEN_TTL_MINS") {
            self.security.access_token_ttl_mins = v.parse().unwrap_or(self.security.access_token_ttl_mins);
        }
        if let Ok(v) = env::var("SECURITY_REFRESH_TOKEN_TTL_DAYS") {
            self.security.refresh_token_ttl_days = v.parse().unwrap_or(self.security.refresh_token_ttl_days);
        }
        if let Ok(v) = env::var("SECURITY_ENABLE_AUDIT_LOGGING") {
            self.security.enable_audit_logging = v.parse().unwrap_or(self.security.enable_audit_logging);
        }

        // Media collaborator overrides
        if let Ok(v) = env::var("MEDIA_UPLOAD_URL") {
            self.media.upload_url = v;
        }
        if let Ok(v) = env::var("MEDIA_API_KEY") {
            self.media.api_key = Some(v);
        }
        if let Ok(v) = env::var("MEDIA_TIMEOUT_SECS") {
            self.media.timeout_secs = v.parse().unwrap_or(self.media.timeout_secs);
        }

        // API overrides
        if let Ok(v) = env::var("API_MAX_UPLOAD_SIZE_BYTES") {
            self.api.max_upload_size_bytes = v.parse().unwrap_or(self.api.max_upload_size_bytes);
        }

        self
    }

    fn development() -> Self {
        Self {
            environment: Environment::Development,
            database: DatabaseConfig {
                max_connections: 10,
                connect_timeout_secs: 30,
            },
            security: SecurityConfig {
                jwt_secret: "dev-secret-change-in-production".to_string(),
                access_token_ttl_mins: 30,
                refresh_token_ttl_days: 30,
                enable_audit_logging: false,
            },
            media: MediaConfig {
                upload_url: "http://localhost:9000/upload".to_string(),
                api_key: None,
                timeout_secs: 30,
            },
            api: ApiConfig {
                max_upload_size_bytes: 20 * 1024 * 1024, // 20MB
            },
        }
    }

    fn staging() -> Self {
        Self {
            environment: Environment::Staging,
            database: DatabaseConfig {
                max_connections: 20,
                connect_timeout_secs: 10,
            },
            security: SecurityConfig {
                jwt_secret: String::new(), // must come from JWT_SECRET
                access_token_ttl_mins: 30,
                refresh_token_ttl_days: 30,
                enable_audit_logging: true,
            },
            media: MediaConfig {
                upload_url: String::new(), // must come from MEDIA_UPLOAD_URL
                api_key: None,
                timeout_secs: 30,
            },
            api: ApiConfig {
                max_upload_size_bytes: 10 * 1024 * 1024, // 10MB
            },
        }
    }

    fn production() -> Self {
        Self {
            environment: Environment::Production,
            database: DatabaseConfig {
                max_connections: 50,
                connect_timeout_secs: 5,
            },
            security: SecurityConfig {
                jwt_secret: String::new(), // must come from JWT_SECRET
                access_token_ttl_mins: 30,
                refresh_token_ttl_days: 30,
                enable_audit_logging: true,
            },
            media: MediaConfig {
                upload_url: String::new(), // must come from MEDIA_UPLOAD_URL
                api_key: None,
                timeout_secs: 15,
            },
            api: ApiConfig {
                max_upload_size_bytes: 5 * 1024 * 1024, // 5MB
            },
        }
    }
}

// Global singleton config - initialized once at startup
pub static CONFIG: Lazy<AppConfig> = Lazy::new(AppConfig::from_env);

// Convenience function for accessing config
pub fn config() -> &'static AppConfig {
    &CONFIG
}
