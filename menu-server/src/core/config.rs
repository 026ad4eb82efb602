//! Server configuration
//!
//! All values come from the environment (a `.env` file is loaded first by
//! `main`).
//!
//! | Variable | Default | Meaning |
//! |----------|---------|---------|
//! | HTTP_PORT | 3000 | HTTP listen port |
//! | ENVIRONMENT | development | development / staging / production |
//! | STATIC_DIR | public | Directory served for the browser client |
//! | RETRY_DELAY_MS | 5000 | Delay between storage provisioning attempts |
//! | CASSANDRA_HOSTS | localhost | Comma separated contact points |
//! | CASSANDRA_DATACENTER | datacenter1 | Local data-center label |
//! | CASSANDRA_KEYSPACE | restaurant | Keyspace holding the menu table |
//! | CASSANDRA_REPLICATION_STRATEGY | SimpleStrategy | or NetworkTopologyStrategy |
//! | CASSANDRA_REPLICATION_FACTOR | 1 | Replicas per data-center |
//! | CASSANDRA_USERNAME / CASSANDRA_PASSWORD | unset | Optional credentials |
//! | CASSANDRA_TIMEOUT_MS | 30000 | Connect and request timeout |

use std::fmt;
use std::time::Duration;

use thiserror::Error;

/// Default CQL native protocol port, appended to bare host names
pub const DEFAULT_CQL_PORT: u16 = 9042;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{key} has an invalid value {value:?}: {reason}")]
    Invalid {
        key: &'static str,
        value: String,
        reason: String,
    },
}

impl ConfigError {
    fn invalid(key: &'static str, value: &str, reason: impl Into<String>) -> Self {
        Self::Invalid {
            key,
            value: value.to_string(),
            reason: reason.into(),
        }
    }
}

/// Keyspace replication policy
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Replication {
    /// Single data-center clusters and local development
    Simple { factor: u32 },
    /// Replicas placed in the named data-center
    NetworkTopology { datacenter: String, factor: u32 },
}

impl Replication {
    /// Render the `replication = {...}` map used by `CREATE KEYSPACE`
    pub fn to_cql(&self) -> String {
        match self {
            Replication::Simple { factor } => {
                format!("{{'class': 'SimpleStrategy', 'replication_factor': {factor}}}")
            }
            Replication::NetworkTopology { datacenter, factor } => {
                format!("{{'class': 'NetworkTopologyStrategy', '{datacenter}': {factor}}}")
            }
        }
    }
}

/// Storage connection settings
#[derive(Clone)]
pub struct CassandraConfig {
    /// Contact points, always `host:port`
    pub hosts: Vec<String>,
    /// Local data-center preferred by the load balancer
    pub datacenter: String,
    pub keyspace: String,
    pub replication: Replication,
    pub username: Option<String>,
    pub password: Option<String>,
    /// Bounds both connection setup and every request
    pub timeout: Duration,
}

impl fmt::Debug for CassandraConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CassandraConfig")
            .field("hosts", &self.hosts)
            .field("datacenter", &self.datacenter)
            .field("keyspace", &self.keyspace)
            .field("replication", &self.replication)
            .field("username", &self.username)
            .field("password", &self.password.as_ref().map(|_| "***"))
            .field("timeout", &self.timeout)
            .finish()
    }
}

/// Server configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// HTTP API port
    pub http_port: u16,
    /// Environment: development | staging | production
    pub environment: String,
    /// Directory with the static browser client
    pub static_dir: String,
    /// Fixed delay between storage provisioning attempts
    pub retry_delay: Duration,
    pub cassandra: CassandraConfig,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration through an arbitrary key lookup
    ///
    /// Empty values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        let datacenter = get("CASSANDRA_DATACENTER").unwrap_or_else(|| "datacenter1".into());

        let keyspace = get("CASSANDRA_KEYSPACE").unwrap_or_else(|| "restaurant".into());
        validate_identifier("CASSANDRA_KEYSPACE", &keyspace)?;

        let factor = parse_or("CASSANDRA_REPLICATION_FACTOR", get("CASSANDRA_REPLICATION_FACTOR"), 1u32)?;
        if factor == 0 {
            return Err(ConfigError::invalid(
                "CASSANDRA_REPLICATION_FACTOR",
                "0",
                "must be at least 1",
            ));
        }

        let replication = match get("CASSANDRA_REPLICATION_STRATEGY").as_deref() {
            None | Some("SimpleStrategy") => Replication::Simple { factor },
            Some("NetworkTopologyStrategy") => {
                validate_datacenter(&datacenter)?;
                Replication::NetworkTopology {
                    datacenter: datacenter.clone(),
                    factor,
                }
            }
            Some(other) => {
                return Err(ConfigError::invalid(
                    "CASSANDRA_REPLICATION_STRATEGY",
                    other,
                    "expected SimpleStrategy or NetworkTopologyStrategy",
                ));
            }
        };

        let hosts = parse_hosts(&get("CASSANDRA_HOSTS").unwrap_or_else(|| "localhost".into()))?;

        let timeout_ms = parse_or("CASSANDRA_TIMEOUT_MS", get("CASSANDRA_TIMEOUT_MS"), 30_000u64)?;
        let retry_delay_ms = parse_or("RETRY_DELAY_MS", get("RETRY_DELAY_MS"), 5_000u64)?;

        Ok(Self {
            http_port: parse_or("HTTP_PORT", get("HTTP_PORT"), 3000u16)?,
            environment: get("ENVIRONMENT").unwrap_or_else(|| "development".into()),
            static_dir: get("STATIC_DIR").unwrap_or_else(|| "public".into()),
            retry_delay: Duration::from_millis(retry_delay_ms),
            cassandra: CassandraConfig {
                hosts,
                datacenter,
                keyspace,
                replication,
                username: get("CASSANDRA_USERNAME"),
                password: get("CASSANDRA_PASSWORD"),
                timeout: Duration::from_millis(timeout_ms),
            },
        })
    }
}

fn parse_or<T>(key: &'static str, value: Option<String>, default: T) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
    T::Err: fmt::Display,
{
    match value {
        None => Ok(default),
        Some(v) => v
            .parse()
            .map_err(|e: T::Err| ConfigError::invalid(key, &v, e.to_string())),
    }
}

fn parse_hosts(raw: &str) -> Result<Vec<String>, ConfigError> {
    let hosts: Vec<String> = raw
        .split(',')
        .map(str::trim)
        .filter(|h| !h.is_empty())
        .map(|h| {
            if h.contains(':') {
                h.to_string()
            } else {
                format!("{h}:{DEFAULT_CQL_PORT}")
            }
        })
        .collect();

    if hosts.is_empty() {
        return Err(ConfigError::invalid(
            "CASSANDRA_HOSTS",
            raw,
            "at least one host is required",
        ));
    }
    Ok(hosts)
}

/// Keyspace names are spliced into DDL, so only plain CQL identifiers pass.
fn validate_identifier(key: &'static str, value: &str) -> Result<(), ConfigError> {
    let mut chars = value.chars();
    let starts_with_letter = chars.next().is_some_and(|c| c.is_ascii_alphabetic());
    let rest_ok = chars.all(|c| c.is_ascii_alphanumeric() || c == '_');

    if !starts_with_letter || !rest_ok || value.len() > 48 {
        return Err(ConfigError::invalid(
            key,
            value,
            "must start with a letter and contain only letters, digits and '_' (max 48)",
        ));
    }
    Ok(())
}

fn validate_datacenter(value: &str) -> Result<(), ConfigError> {
    if value.contains('\'') {
        return Err(ConfigError::invalid(
            "CASSANDRA_DATACENTER",
            value,
            "must not contain quotes",
        ));
    }
    Ok(())
}
