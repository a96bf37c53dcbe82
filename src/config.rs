use std::env;
use std::str::FromStr;

use secrecy::SecretString;

use crate::services::scoring::ResultPolicy;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StorageBackend {
    Mongo,
    Memory,
}

impl FromStr for StorageBackend {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_lowercase().as_str() {
            "mongo" | "mongodb" => Ok(StorageBackend::Mongo),
            "memory" | "in-memory" => Ok(StorageBackend::Memory),
            other => Err(format!("unknown storage backend '{}'", other)),
        }
    }
}

#[derive(Clone, Debug)]
pub struct Config {
    pub mongo_conn_string: String,
    pub mongo_db_name: String,
    pub storage_backend: StorageBackend,
    pub web_server_host: String,
    pub web_server_port: u16,
    pub jwt_secret: SecretString,
    pub jwt_expiration_hours: i64,
    pub default_time_limit_secs: i32,
    pub leaderboard_limit: i64,
    pub result_policy: ResultPolicy,
    pub cors_allowed_origin: Option<String>,
    pub seed_teacher_username: Option<String>,
    pub seed_teacher_password: Option<SecretString>,
    pub production: bool,
}

impl Config {
    pub fn from_env() -> Self {
        Self {
            mongo_conn_string: env::var("MONGO_CONN_STRING")
                .unwrap_or_else(|_| "mongodb://localhost:27017".to_string()),
            mongo_db_name: env::var("MONGO_DB_NAME")
                .unwrap_or_else(|_| "classquiz-local".to_string()),
            storage_backend: env::var("STORAGE_BACKEND")
                .ok()
                .and_then(|b| b.parse().ok())
                .unwrap_or(StorageBackend::Mongo),
            web_server_host: env::var("WEB_SERVER_HOST")
                .unwrap_or_else(|_| "localhost".to_string()),
            web_server_port: env::var("WEB_SERVER_PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(8080),
            jwt_secret: SecretString::from(
                env::var("JWT_SECRET")
                    .unwrap_or_else(|_| "dev_secret_key_change_in_production".to_string()),
            ),
            jwt_expiration_hours: env::var("JWT_EXPIRATION_HOURS")
                .ok()
                .and_then(|h| h.parse().ok())
                .unwrap_or(24),
            default_time_limit_secs: env::var("DEFAULT_TIME_LIMIT_SECS")
                .ok()
                .and_then(|t| t.parse().ok())
                .filter(|t: &i32| *t > 0)
                .unwrap_or(300),
            leaderboard_limit: env::var("LEADERBOARD_LIMIT")
                .ok()
                .and_then(|l| l.parse().ok())
                .filter(|l: &i64| *l > 0)
                .unwrap_or(10),
            result_policy: env::var("LEADERBOARD_RESULT_POLICY")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or_default(),
            cors_allowed_origin: env::var("CORS_ALLOWED_ORIGIN")
                .ok()
                .filter(|o| !o.trim().is_empty()),
            seed_teacher_username: env::var("SEED_TEACHER_USERNAME")
                .ok()
                .filter(|u| !u.trim().is_empty()),
            seed_teacher_password: env::var("SEED_TEACHER_PASSWORD")
                .ok()
                .filter(|p| !p.is_empty())
                .map(SecretString::from),
            production: env::var("APP_ENV")
                .map(|e| e.eq_ignore_ascii_case("production"))
                .unwrap_or(false),
        }
    }

    /// Validate that production-critical configuration is set
    /// Panics if required secrets are using default values
    pub fn validate_for_production(&self) {
        use secrecy::ExposeSecret;

        let jwt_secret = self.jwt_secret.expose_secret();

        if jwt_secret == "dev_secret_key_change_in_production" {
            panic!(
                "FATAL: JWT_SECRET is using default value! Set JWT_SECRET environment variable to a secure random string."
            );
        }

        if jwt_secret.len() < 32 {
            panic!(
                "FATAL: JWT_SECRET is too short ({}). Must be at least 32 characters for security.",
                jwt_secret.len()
            );
        }

        if self.storage_backend == StorageBackend::Memory {
            panic!("FATAL: STORAGE_BACKEND=memory loses all data on restart. Use mongo in production.");
        }
    }

    #[cfg(test)]
    pub fn test_config() -> Self {
        Self {
            mongo_conn_string: "mongodb://localhost:27017".to_string(),
            mongo_db_name: "classquiz-test".to_string(),
            storage_backend: StorageBackend::Memory,
            web_server_host: "127.0.0.1".to_string(),
            web_server_port: 8080,
            jwt_secret: SecretString::from("test_jwt_secret_key".to_string()),
            jwt_expiration_hours: 1,
            default_time_limit_secs: 300,
            leaderboard_limit: 10,
            result_policy: ResultPolicy::SumAll,
            cors_allowed_origin: None,
            seed_teacher_username: None,
            seed_teacher_password: None,
            production: false,
        }
    }
}
