use std::path::PathBuf;

use crate::auth::jwt::JwtConfig;

/// Which entity store backs the server. Chosen once at startup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreBackend {
    Postgres { database_url: String },
    Memory,
}

impl StoreBackend {
    /// Resolve the backend from `STORE_BACKEND` and `DATABASE_URL`.
    ///
    /// Without an explicit choice, PostgreSQL is used when a database URL is
    /// present and the in-memory store otherwise.
    pub fn resolve(backend: Option<&str>, database_url: Option<String>) -> Result<Self, String> {
        let database_url = database_url.filter(|url| !url.trim().is_empty());
        match backend.map(str::trim) {
            None | Some("") => Ok(match database_url {
                Some(database_url) => Self::Postgres { database_url },
                None => Self::Memory,
            }),
            Some("postgres") => database_url
                .map(|database_url| Self::Postgres { database_url })
                .ok_or_else(|| "STORE_BACKEND=postgres requires DATABASE_URL".to_string()),
            Some("memory") => Ok(Self::Memory),
            Some(other) => Err(format!(
                "Unknown STORE_BACKEND '{other}'. Must be one of: postgres, memory"
            )),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Postgres { .. } => "postgres",
            Self::Memory => "memory",
        }
    }
}

/// Server configuration loaded from environment variables.
///
/// All fields except the JWT secret have defaults suitable for local
/// development.
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
    pub store: StoreBackend,
    /// Seed demo characters into the in-memory store (default: `false`).
    pub seed_demo_data: bool,
    /// Directory uploaded files are written to (default: `./uploads`).
    pub upload_dir: PathBuf,
    /// Public URL prefix the upload directory is served under.
    pub public_upload_base_url: String,
    /// JWT token configuration.
    pub jwt: JwtConfig,
}

impl ServerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                  | Default                           |
    /// |--------------------------|-----------------------------------|
    /// | `HOST`                   | `0.0.0.0`                         |
    /// | `PORT`                   | `3000`                            |
    /// | `CORS_ORIGINS`           | `http://localhost:5173`           |
    /// | `REQUEST_TIMEOUT_SECS`   | `30`                              |
    /// | `STORE_BACKEND`          | `postgres` if `DATABASE_URL` set  |
    /// | `DATABASE_URL`           | --                                |
    /// | `SEED_DEMO_DATA`         | `false`                           |
    /// | `UPLOAD_DIR`             | `./uploads`                       |
    /// | `PUBLIC_UPLOAD_BASE_URL` | `http://localhost:3000/uploads`   |
    ///
    /// # Panics
    ///
    /// Panics on malformed values so misconfiguration fails at startup.
    pub fn from_env() -> Self {
        let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".into());

        let port: u16 = std::env::var("PORT")
            .unwrap_or_else(|_| "3000".into())
            .parse()
            .expect("PORT must be a valid u16");

        let cors_origins: Vec<String> = std::env::var("CORS_ORIGINS")
            .unwrap_or_else(|_| "http://localhost:5173".into())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let request_timeout_secs: u64 = std::env::var("REQUEST_TIMEOUT_SECS")
            .unwrap_or_else(|_| "30".into())
            .parse()
            .expect("REQUEST_TIMEOUT_SECS must be a valid u64");

        let store = StoreBackend::resolve(
            std::env::var("STORE_BACKEND").ok().as_deref(),
            std::env::var("DATABASE_URL").ok(),
        )
        .unwrap_or_else(|e| panic!("{e}"));

        let seed_demo_data = std::env::var("SEED_DEMO_DATA")
            .map(|v| parse_flag(&v))
            .unwrap_or(false);

        let upload_dir = std::env::var("UPLOAD_DIR")
            .unwrap_or_else(|_| "./uploads".into())
            .into();

        let public_upload_base_url = std::env::var("PUBLIC_UPLOAD_BASE_URL")
            .unwrap_or_else(|_| "http://localhost:3000/uploads".into());

        let jwt = JwtConfig::from_env();

        Self {
            host,
            port,
            cors_origins,
            request_timeout_secs,
            store,
            seed_demo_data,
            upload_dir,
            public_upload_base_url,
            jwt,
        }
    }
}

fn parse_flag(value: &str) -> bool {
    matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "1" | "true" | "yes" | "on"
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_to_postgres_when_url_present() {
        let backend = StoreBackend::resolve(None, Some("postgres://localhost/gallery".into()));
        assert_eq!(
            backend.unwrap(),
            StoreBackend::Postgres {
                database_url: "postgres://localhost/gallery".into()
            }
        );
    }

    #[test]
    fn defaults_to_memory_without_url() {
        assert_eq!(StoreBackend::resolve(None, None).unwrap(), StoreBackend::Memory);
        assert_eq!(
            StoreBackend::resolve(None, Some("  ".into())).unwrap(),
            StoreBackend::Memory
        );
    }

    #[test]
    fn explicit_memory_ignores_url() {
        let backend = StoreBackend::resolve(Some("memory"), Some("postgres://x".into()));
        assert_eq!(backend.unwrap(), StoreBackend::Memory);
    }

    #[test]
    fn postgres_without_url_is_an_error() {
        assert!(StoreBackend::resolve(Some("postgres"), None).is_err());
    }

    #[test]
    fn unknown_backend_is_an_error() {
        let err = StoreBackend::resolve(Some("sqlite"), None).unwrap_err();
        assert!(err.contains("sqlite"));
    }

    #[test]
    fn flag_parsing() {
        assert!(parse_flag("true"));
        assert!(parse_flag(" 1 "));
        assert!(parse_flag("YES"));
        assert!(!parse_flag("false"));
        assert!(!parse_flag(""));
    }
}
