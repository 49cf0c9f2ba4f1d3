use clap::Parser;
use std::path::PathBuf;
use thiserror::Error;

use crate::models::DatabaseInfo;

const DEFAULT_SCHEMA: &str = "public";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("missing required setting `{0}`")]
    Missing(&'static str),

    #[error("could not find a data directory for the metadata repository")]
    NoDataDir,

    #[error("invalid schema search path `{0}`, expected comma-separated unquoted identifiers")]
    InvalidSchema(String),
}

/// True for `name` or `a, b`: unquoted identifiers PostgreSQL would case-fold.
fn is_search_path(value: &str) -> bool {
    value.split(',').all(|part| {
        let mut chars = part.trim().chars();
        matches!(chars.next(), Some(c) if c.is_ascii_alphabetic() || c == '_')
            && chars.all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '$')
    })
}

/// Command-line settings. Every flag can also come from the environment.
#[derive(Debug, Clone, Parser)]
#[command(name = "db-dictionary")]
#[command(about = "Snapshot a PostgreSQL schema into a local metadata repository")]
#[command(version)]
pub struct Args {
    /// Port used for the HTTP server
    #[arg(long, env = "SERVER_PORT", default_value_t = 8080)]
    pub server_port: u16,

    /// Database user
    #[arg(long, env = "DB_USER", default_value = "")]
    pub db_user: String,

    /// Database password
    #[arg(long, env = "DB_PASSWORD", default_value = "", hide_env_values = true)]
    pub db_password: String,

    /// Database host
    #[arg(long, env = "DB_HOST", default_value = "")]
    pub db_host: String,

    /// Database port
    #[arg(long, env = "DB_PORT", default_value_t = 5432)]
    pub db_port: u16,

    /// Database name
    #[arg(long, env = "DB_NAME", default_value = "")]
    pub db_name: String,

    /// Database driver
    #[arg(long, env = "DB_DRIVER", default_value = "postgres")]
    pub db_driver: String,

    /// Schema search path set after connecting, e.g. `reporting` or
    /// `reporting,public`. Unquoted, so names fold to lower case
    #[arg(long, env = "DB_SCHEMA")]
    pub db_schema: Option<String>,

    /// Path of the JSON metadata repository
    #[arg(long, env = "DB_DICTIONARY_REPOSITORY")]
    pub repository: Option<PathBuf>,

    /// Append-only error log
    #[arg(long, env = "DB_DICTIONARY_LOG", default_value = "./error.log")]
    pub log_file: PathBuf,

    /// Store base column attributes only, without key/enum/unique lookups
    #[arg(long)]
    pub bare: bool,

    /// Exit after setup instead of serving the web page
    #[arg(long)]
    pub no_serve: bool,

    /// Remove everything from the repository before setup
    #[arg(long)]
    pub reset: bool,

    /// Set a table description after setup. Repeatable.
    #[arg(long = "describe-table", value_name = "TABLE=TEXT")]
    pub describe_tables: Vec<String>,

    /// Set a column description after setup. Repeatable.
    #[arg(long = "describe-column", value_name = "TABLE.COLUMN=TEXT")]
    pub describe_columns: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatabaseConnection {
    pub name: String,
    pub host: String,
    pub port: u16,
    pub user: String,
    pub password: String,
    pub driver: String,
    pub schema: Option<String>,
}

impl DatabaseConnection {
    pub fn from_args(args: &Args) -> Result<Self, ConfigError> {
        let required = [
            ("db_user", &args.db_user),
            ("db_host", &args.db_host),
            ("db_name", &args.db_name),
            ("db_driver", &args.db_driver),
        ];
        if let Some((field, _)) = required.iter().find(|(_, value)| value.trim().is_empty()) {
            return Err(ConfigError::Missing(*field));
        }

        let schema = args.db_schema.clone().filter(|s| !s.trim().is_empty());
        if let Some(schema) = &schema {
            if !is_search_path(schema) {
                return Err(ConfigError::InvalidSchema(schema.clone()));
            }
        }

        Ok(Self {
            name: args.db_name.clone(),
            host: args.db_host.clone(),
            port: args.db_port,
            user: args.db_user.clone(),
            password: args.db_password.clone(),
            driver: args.db_driver.clone(),
            schema,
        })
    }

    pub fn to_connection_string(&self) -> String {
        format!(
            "user={} password={} host={} port={} dbname={} sslmode=disable",
            self.user, self.password, self.host, self.port, self.name
        )
    }

    /// Schema that needs an explicit `SET search_path`, if any.
    pub fn search_path(&self) -> Option<&str> {
        self.schema
            .as_deref()
            .filter(|schema| *schema != DEFAULT_SCHEMA)
    }

    pub fn to_database_info(&self) -> DatabaseInfo {
        DatabaseInfo {
            name: self.name.clone(),
            user: self.user.clone(),
            host: self.host.clone(),
            port: self.port,
            password: self.password.clone(),
            driver: self.driver.clone(),
        }
    }
}

impl Args {
    pub fn repository_path(&self) -> Result<PathBuf, ConfigError> {
        if let Some(path) = &self.repository {
            return Ok(path.clone());
        }
        let data_dir = dirs::data_dir().ok_or(ConfigError::NoDataDir)?;
        Ok(data_dir.join("db-dictionary").join("metadata.json"))
    }
}
