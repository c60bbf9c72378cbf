use crate::error::app_error::AppError;
use rocket::figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};

pub const DEFAULT_API_BASE_PATH: &str = "/api/v1";

const SSL_MODES: [&str; 6] = ["disable", "allow", "prefer", "require", "verify-ca", "verify-full"];

#[derive(Debug, Deserialize, Serialize, Clone, Default)]
pub struct Config {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub jwt: JwtConfig,
    pub cors: CorsConfig,
    pub api: ApiConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct ServerConfig {
    pub address: String,
    pub port: u16,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct DatabaseConfig {
    pub host: String,
    pub port: u16,
    pub user: String,
    pub password: String,
    pub dbname: String,
    pub sslmode: String,
    pub max_connections: u32,
    pub min_connections: u32,
    pub acquire_timeout: u64,
    /// Apply pending migrations when the server ignites.
    pub auto_migrate: bool,
}

/// How bearer tokens presented to protected routes are checked.
#[derive(Debug, Deserialize, Serialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum TokenVerification {
    /// Any non-empty token is accepted and mapped to a fixed identity.
    #[default]
    Placeholder,
    /// HS256-signed JWT checked against `jwt.secret`.
    Hmac,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct JwtConfig {
    pub secret: String,
    pub verification: TokenVerification,
    pub token_ttl_seconds: u64,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct CorsConfig {
    pub allowed_origin: String,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct ApiConfig {
    pub base_path: String,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct LoggingConfig {
    pub level: String,
    pub json_format: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            address: "127.0.0.1".to_string(),
            port: 8080,
        }
    }
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            host: "localhost".to_string(),
            port: 5432,
            user: "postgres".to_string(),
            password: String::new(),
            dbname: "apacks".to_string(),
            sslmode: "disable".to_string(),
            max_connections: 16,
            min_connections: 0,
            acquire_timeout: 5,
            auto_migrate: true,
        }
    }
}

impl Default for JwtConfig {
    fn default() -> Self {
        Self {
            secret: String::new(),
            verification: TokenVerification::Placeholder,
            token_ttl_seconds: 3600,
        }
    }
}

impl Default for CorsConfig {
    fn default() -> Self {
        Self {
            allowed_origin: "http://localhost:3000".to_string(),
        }
    }
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_path: DEFAULT_API_BASE_PATH.to_string(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json_format: false,
        }
    }
}

impl Config {
    /// Load configuration from multiple sources in priority order:
    /// 1. Built-in defaults
    /// 2. Apacks.toml (base configuration file)
    /// 3. Environment variables prefixed with APACKS_, nested with `__`
    ///    (e.g. APACKS_DATABASE__HOST)
    /// 4. JWT_SECRET environment variable
    ///
    /// The merged result is validated before it is returned.
    pub fn load() -> Result<Self, AppError> {
        let config: Config = Self::figment().extract()?;
        config.validate()?;
        Ok(config)
    }

    pub fn figment() -> Figment {
        Figment::from(Serialized::defaults(Config::default()))
            .merge(Toml::file("Apacks.toml").nested())
            .merge(Env::prefixed("APACKS_").split("__"))
            .merge(Env::raw().only(&["JWT_SECRET"]).map(|_| "jwt.secret".into()))
    }

    pub fn validate(&self) -> Result<(), AppError> {
        if self.server.port == 0 {
            return Err(AppError::InvalidConfiguration("server.port must be non-zero".to_string()));
        }

        if !SSL_MODES.contains(&self.database.sslmode.as_str()) {
            return Err(AppError::InvalidConfiguration(format!(
                "database.sslmode '{}' is not one of {}",
                self.database.sslmode,
                SSL_MODES.join(", ")
            )));
        }

        if self.database.min_connections > self.database.max_connections {
            return Err(AppError::InvalidConfiguration(
                "database.min_connections cannot exceed database.max_connections".to_string(),
            ));
        }

        if self.jwt.verification == TokenVerification::Hmac && self.jwt.secret.trim().is_empty() {
            return Err(AppError::InvalidConfiguration(
                "jwt.secret is required when jwt.verification is 'hmac'".to_string(),
            ));
        }

        if self.cors.allowed_origin.trim().is_empty() {
            return Err(AppError::InvalidConfiguration("cors.allowed_origin cannot be empty".to_string()));
        }

        Ok(())
    }
}
