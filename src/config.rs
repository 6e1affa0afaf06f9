//! Service configuration from the process environment.
//!
//! `main` loads an optional `.env` file with `dotenvy` first, then reads the
//! variables below. Names are matched case-insensitively and every other
//! variable in the environment is ignored.
//!
//! | Variable | Default | Meaning |
//! |---|---|---|
//! | `BIND_HOST` | `0.0.0.0` | address to bind |
//! | `PORT` | `3001` | port to bind |
//! | `DATABASE_URL` | `memory:` | contact store, see [`StoreLocation::parse`] |
//! | `STATIC_DIR` | `build` | frontend bundle served for unmatched `GET`s |
//! | `CORS` | `true` | permissive CORS headers |
//! | `LOG_LEVEL` | `info` | default log filter when `RUST_LOG` is unset |

use std::net::SocketAddr;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::error::Error;
use crate::store::StoreLocation;

/// Environment variables read, and the field each one sets.
const VARS: [(&str, &str); 6] = [
    ("BIND_HOST", "host"),
    ("PORT", "port"),
    ("DATABASE_URL", "database_url"),
    ("STATIC_DIR", "static_dir"),
    ("CORS", "cors"),
    ("LOG_LEVEL", "log_level"),
];

/// Service configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,

    /// Contact store connection string.
    #[serde(default = "default_database_url")]
    pub database_url: String,

    #[serde(default = "default_static_dir")]
    pub static_dir: PathBuf,

    #[serde(default = "default_true")]
    pub cors: bool,

    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            database_url: default_database_url(),
            static_dir: default_static_dir(),
            cors: default_true(),
            log_level: default_log_level(),
        }
    }
}

impl Config {
    /// Loads configuration from the process environment.
    pub fn from_env() -> Result<Self, Error> {
        let vars = std::env::vars_os()
            .filter_map(|(k, v)| Some((k.into_string().ok()?, v.into_string().ok()?)));
        Self::from_vars(vars)
    }

    /// Loads configuration from an explicit variable map instead of the
    /// process environment.
    pub fn from_vars<I, K, V>(vars: I) -> Result<Self, Error>
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let vars: config::Map<String, String> = vars
            .into_iter()
            .filter_map(|(k, v)| {
                let k: String = k.into();
                let (_, field) = VARS.iter().find(|(var, _)| var.eq_ignore_ascii_case(&k))?;
                Some(((*field).to_owned(), v.into()))
            })
            .collect();
        let env = config::Environment::default()
            .try_parsing(true)
            .source(Some(vars));
        let config: Config = config::Config::builder()
            .add_source(env)
            .build()?
            .try_deserialize()?;
        Ok(config)
    }

    /// The socket address to bind to.
    pub fn socket_addr(&self) -> Result<SocketAddr, Error> {
        let host = self.host.trim_start_matches('[').trim_end_matches(']');
        let addr = if host.contains(':') {
            format!("[{host}]:{}", self.port)
        } else {
            format!("{host}:{}", self.port)
        };
        Ok(addr.parse()?)
    }

    /// The contact store selected by `DATABASE_URL`.
    pub fn store_location(&self) -> Result<StoreLocation, Error> {
        StoreLocation::parse(&self.database_url).map_err(Error::Config)
    }
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    3001
}

fn default_database_url() -> String {
    "memory:".to_string()
}

fn default_static_dir() -> PathBuf {
    PathBuf::from("build")
}

fn default_true() -> bool {
    true
}

fn default_log_level() -> String {
    "info".to_string()
}
