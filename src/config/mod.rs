use once_cell::sync::Lazy;
use std::env;

/// Runtime configuration, resolved once at startup from the environment.
/// `.env` is loaded by `main` before the first access.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub security: SecurityConfig,
    pub database: DatabaseConfig,
    pub files: FilesConfig,
}

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone)]
pub struct SecurityConfig {
    /// HMAC-SHA256 secret for signing and verifying access tokens
    pub jwt_secret: String,
    /// Access token lifetime in minutes
    pub jwt_expiry_mins: i64,
    /// Seed credentials, created at startup when missing from the store
    pub seed_admin_password: String,
    pub seed_user_password: String,
}

#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    /// When set, the service runs against Postgres; otherwise in memory
    pub url: Option<String>,
    pub max_connections: u32,
}

#[derive(Debug, Clone)]
pub struct FilesConfig {
    /// Path served by GET /files/sample
    pub sample_path: String,
}

impl AppConfig {
    pub fn from_env() -> Self {
        let host = env::var("MOVIES_API_HOST").unwrap_or_else(|_| "0.0.0.0".to_string());
        let port = env::var("MOVIES_API_PORT")
            .ok()
            .or_else(|| env::var("PORT").ok())
            .and_then(|s| s.parse::<u16>().ok())
            .unwrap_or(3000);

        // A fixed fallback secret keeps the demo runnable out of the box;
        // deployments override it via env.
        let jwt_secret =
            env::var("JWT_SECRET").unwrap_or_else(|_| "movies-api-dev-secret".to_string());
        let jwt_expiry_mins = env::var("JWT_EXPIRY_MINS")
            .ok()
            .and_then(|s| s.parse::<i64>().ok())
            .unwrap_or(60);

        let seed_admin_password =
            env::var("SEED_ADMIN_PASSWORD").unwrap_or_else(|_| "admin-password".to_string());
        let seed_user_password =
            env::var("SEED_USER_PASSWORD").unwrap_or_else(|_| "user-password".to_string());

        let database_url = env::var("DATABASE_URL").ok().filter(|s| !s.is_empty());
        let max_connections = env::var("DATABASE_MAX_CONNECTIONS")
            .ok()
            .and_then(|s| s.parse::<u32>().ok())
            .unwrap_or(10);

        let sample_path =
            env::var("SAMPLE_FILE_PATH").unwrap_or_else(|_| "files/sample.txt".to_string());

        Self {
            server: ServerConfig { host, port },
            security: SecurityConfig {
                jwt_secret,
                jwt_expiry_mins,
                seed_admin_password,
                seed_user_password,
            },
            database: DatabaseConfig {
                url: database_url,
                max_connections,
            },
            files: FilesConfig { sample_path },
        }
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}

// Global singleton config - initialized once at startup
pub static CONFIG: Lazy<AppConfig> = Lazy::new(AppConfig::from_env);

// Convenience function for accessing config
pub fn config() -> &'static AppConfig {
    &CONFIG
}
