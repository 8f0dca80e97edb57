//! Configuration loading and management
//!
//! Configuration comes from three layers, later ones winning:
//!
//! 1. built-in defaults
//! 2. an optional YAML file named by `AUTOSTACK_CONFIG`
//! 3. environment variables (a `.env` file is loaded first when present)
//!
//! ```yaml
//! server:
//!   host: 127.0.0.1
//!   port: 5000
//! database:
//!   backend: postgres
//!   host: localhost
//!   user: postgres
//!   password: secret
//!   name: example_db
//! ```

use crate::core::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Storage backend selected at startup
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Backend {
    /// Process-local maps, lost on restart
    #[default]
    #[serde(rename = "memory", alias = "in-memory")]
    InMemory,
    #[serde(rename = "mongodb", alias = "mongo")]
    MongoDb,
    #[serde(rename = "postgres", alias = "postgresql")]
    Postgres,
    #[serde(rename = "mysql")]
    MySql,
}

impl Backend {
    /// Name used in configuration
    pub fn as_str(&self) -> &'static str {
        match self {
            Backend::InMemory => "memory",
            Backend::MongoDb => "mongodb",
            Backend::Postgres => "postgres",
            Backend::MySql => "mysql",
        }
    }

    /// Product name shown to API clients
    pub fn display_name(&self) -> &'static str {
        match self {
            Backend::InMemory => "In-Memory",
            Backend::MongoDb => "MongoDB",
            Backend::Postgres => "PostgreSQL",
            Backend::MySql => "MySQL",
        }
    }

    /// Document stores validate identifier syntax before any lookup
    pub fn is_document_store(&self) -> bool {
        matches!(self, Backend::MongoDb)
    }

    pub fn default_port(&self) -> Option<u16> {
        match self {
            Backend::InMemory => None,
            Backend::MongoDb => Some(27017),
            Backend::Postgres => Some(5432),
            Backend::MySql => Some(3306),
        }
    }

    fn default_user(&self) -> Option<&'static str> {
        match self {
            Backend::Postgres => Some("postgres"),
            Backend::MySql => Some("root"),
            Backend::InMemory | Backend::MongoDb => None,
        }
    }
}

impl fmt::Display for Backend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Backend {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "memory" | "in-memory" => Ok(Backend::InMemory),
            "mongodb" | "mongo" => Ok(Backend::MongoDb),
            "postgres" | "postgresql" => Ok(Backend::Postgres),
            "mysql" => Ok(Backend::MySql),
            _ => Err(ConfigError::InvalidValue {
                field: "DB_BACKEND".to_string(),
                value: s.to_string(),
                message: "expected one of memory, mongodb, postgres, mysql".to_string(),
            }),
        }
    }
}

/// HTTP listener settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 5000,
        }
    }
}

/// Database connection settings
///
/// Either a full `url` or the individual components; the components are
/// only used when no URL is given.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DatabaseConfig {
    pub backend: Backend,
    pub url: Option<String>,
    pub host: String,
    pub port: Option<u16>,
    pub user: Option<String>,
    pub password: String,
    /// Database name (MongoDB database, SQL schema)
    pub name: String,
    pub max_connections: u32,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            backend: Backend::InMemory,
            url: None,
            host: "localhost".to_string(),
            port: None,
            user: None,
            password: String::new(),
            name: "example_db".to_string(),
            max_connections: 5,
        }
    }
}

impl DatabaseConfig {
    /// Effective port, falling back to the backend's default
    pub fn port(&self) -> Option<u16> {
        self.port.or(self.backend.default_port())
    }

    /// Effective user, falling back to the backend's default
    pub fn user(&self) -> Option<&str> {
        self.user
            .as_deref()
            .filter(|u| !u.is_empty())
            .or(self.backend.default_user())
    }

    /// Connection string for the configured backend
    ///
    /// Returns `None` for the in-memory backend. Credentials are inserted
    /// as given; set `url` directly when they need escaping.
    pub fn connection_url(&self) -> Option<String> {
        if self.backend == Backend::InMemory {
            return None;
        }
        if let Some(url) = self.url.as_ref().filter(|u| !u.is_empty()) {
            return Some(url.clone());
        }

        let credentials = match self.user() {
            Some(user) if self.password.is_empty() => format!("{}@", user),
            Some(user) => format!("{}:{}@", user, self.password),
            None => String::new(),
        };
        let port = self.port().unwrap_or_default();

        let url = match self.backend {
            Backend::MongoDb => format!("mongodb://{}{}:{}", credentials, self.host, port),
            Backend::Postgres => format!(
                "postgres://{}{}:{}/{}",
                credentials, self.host, port, self.name
            ),
            Backend::MySql => format!(
                "mysql://{}{}:{}/{}",
                credentials, self.host, port, self.name
            ),
            Backend::InMemory => return None,
        };
        Some(url)
    }
}

/// Complete application configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
}

impl AppConfig {
    /// Load configuration from a YAML string
    pub fn from_yaml_str(yaml: &str) -> Result<Self, ConfigError> {
        serde_yaml::from_str(yaml).map_err(|e| ConfigError::ParseError {
            file: "<inline>".to_string(),
            message: e.to_string(),
        })
    }

    /// Load configuration from a YAML file
    pub fn from_yaml_file(path: &str) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| match e.kind() {
            std::io::ErrorKind::NotFound => ConfigError::FileNotFound {
                path: path.to_string(),
            },
            _ => ConfigError::ParseError {
                file: path.to_string(),
                message: e.to_string(),
            },
        })?;
        serde_yaml::from_str(&content).map_err(|e| ConfigError::ParseError {
            file: path.to_string(),
            message: e.to_string(),
        })
    }

    /// Load configuration from the process environment
    ///
    /// Reads `.env` first when one exists in the working directory.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration through an arbitrary variable lookup
    ///
    /// Recognized variables: `AUTOSTACK_CONFIG`, `APP_HOST`, `APP_PORT`,
    /// `DB_BACKEND`, `DATABASE_URL`, `MONGO_URI`, `DB_HOST`, `DB_PORT`,
    /// `DB_USER`, `DB_PASSWORD`, `DB_NAME`, `DB_MAX_CONNECTIONS`.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let mut config = match var("AUTOSTACK_CONFIG") {
            Some(path) => Self::from_yaml_file(&path)?,
            None => Self::default(),
        };

        if let Some(host) = var("APP_HOST") {
            config.server.host = host;
        }
        if let Some(port) = var("APP_PORT") {
            config.server.port = parse_number("APP_PORT", &port)?;
        }

        let db = &mut config.database;
        if let Some(backend) = var("DB_BACKEND") {
            db.backend = backend.parse()?;
        }
        let mongo_uri = match db.backend {
            Backend::MongoDb => var("MONGO_URI"),
            _ => None,
        };
        if let Some(url) = var("DATABASE_URL").or(mongo_uri) {
            db.url = Some(url);
        }
        if let Some(host) = var("DB_HOST") {
            db.host = host;
        }
        if let Some(port) = var("DB_PORT") {
            db.port = Some(parse_number("DB_PORT", &port)?);
        }
        if let Some(user) = var("DB_USER") {
            db.user = Some(user);
        }
        if let Some(password) = lookup("DB_PASSWORD") {
            db.password = password;
        }
        if let Some(name) = var("DB_NAME") {
            db.name = name;
        }
        if let Some(max) = var("DB_MAX_CONNECTIONS") {
            db.max_connections = parse_number("DB_MAX_CONNECTIONS", &max)?;
        }
        // Pool drivers treat 0 as unbounded or refuse to start
        if db.max_connections == 0 {
            return Err(ConfigError::InvalidValue {
                field: "DB_MAX_CONNECTIONS".to_string(),
                value: "0".to_string(),
                message: "expected a positive integer".to_string(),
            });
        }

        Ok(config)
    }

    /// Socket address to bind
    pub fn address(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}

fn parse_number<T: FromStr>(field: &str, value: &str) -> Result<T, ConfigError> {
    value.trim().parse().map_err(|_| ConfigError::InvalidValue {
        field: field.to_string(),
        value: value.to_string(),
        message: "expected a positive integer".to_string(),
    })
}
