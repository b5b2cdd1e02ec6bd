use clap::{Parser, ValueEnum};
use hashlink_store::{EvictionPolicy, DEFAULT_CACHE_CAPACITY};
use std::fmt::{Display, Formatter};
use std::net::SocketAddr;

pub const LISTEN_ADDR_ENV: &str = "HASHLINK_LISTEN_ADDR";
pub const PUBLIC_BASE_URL_ENV: &str = "HASHLINK_PUBLIC_BASE_URL";
pub const CACHE_CAPACITY_ENV: &str = "HASHLINK_CACHE_CAPACITY";
pub const CACHE_EVICTION_ENV: &str = "HASHLINK_CACHE_EVICTION";
pub const STORAGE_BACKEND_ENV: &str = "HASHLINK_STORAGE_BACKEND";
pub const MYSQL_DSN_ENV: &str = "HASHLINK_MYSQL_DSN";
pub const LOG_FORMAT_ENV: &str = "HASHLINK_LOG_FORMAT";

pub const DEFAULT_LISTEN_ADDR: &str = "127.0.0.1:8080";
pub const DEFAULT_PUBLIC_BASE_URL: &str = "http://127.0.0.1:8080";

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum StorageBackendArg {
    #[value(name = "in-memory")]
    InMemory,
    #[value(name = "mysql")]
    Mysql,
    /// No durable table: every record lives in the cache only.
    #[value(name = "none")]
    None,
}

impl Display for StorageBackendArg {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            StorageBackendArg::InMemory => write!(f, "in-memory"),
            StorageBackendArg::Mysql => write!(f, "mysql"),
            StorageBackendArg::None => write!(f, "none"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum EvictionArg {
    #[value(name = "reject")]
    Reject,
    #[value(name = "evict")]
    Evict,
}

impl From<EvictionArg> for EvictionPolicy {
    fn from(value: EvictionArg) -> Self {
        match value {
            EvictionArg::Reject => EvictionPolicy::Reject,
            EvictionArg::Evict => EvictionPolicy::Evict,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogFormatArg {
    #[value(name = "text")]
    Text,
    #[value(name = "json")]
    Json,
}

#[derive(Debug, Parser)]
#[command(name = "hashlink-gateway")]
pub struct CLI {
    #[arg(long, env = LISTEN_ADDR_ENV, default_value = DEFAULT_LISTEN_ADDR)]
    pub listen_addr: SocketAddr,

    /// Prefix for the `short_url` returned by `/shorten`.
    #[arg(long, env = PUBLIC_BASE_URL_ENV, default_value = DEFAULT_PUBLIC_BASE_URL)]
    pub public_base_url: String,

    #[arg(long, env = CACHE_CAPACITY_ENV, default_value_t = DEFAULT_CACHE_CAPACITY)]
    pub cache_capacity: usize,

    #[arg(
        long,
        env = CACHE_EVICTION_ENV,
        value_enum,
        default_value_t = EvictionArg::Reject
    )]
    pub cache_eviction: EvictionArg,

    #[arg(
        long,
        env = STORAGE_BACKEND_ENV,
        value_enum,
        default_value_t = StorageBackendArg::InMemory
    )]
    pub storage: StorageBackendArg,

    #[arg(long, env = MYSQL_DSN_ENV, required_if_eq("storage", "mysql"))]
    pub mysql_dsn: Option<String>,

    #[arg(long, env = LOG_FORMAT_ENV, value_enum, default_value_t = LogFormatArg::Text)]
    pub log_format: LogFormatArg,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let cli = CLI::try_parse_from(["hashlink-gateway"]).unwrap();
        assert_eq!(cli.listen_addr, DEFAULT_LISTEN_ADDR.parse().unwrap());
        assert_eq!(cli.cache_capacity, DEFAULT_CACHE_CAPACITY);
        assert_eq!(cli.cache_eviction, EvictionArg::Reject);
        assert_eq!(cli.storage, StorageBackendArg::InMemory);
        assert_eq!(cli.log_format, LogFormatArg::Text);
    }

    #[test]
    fn mysql_requires_dsn() {
        assert!(CLI::try_parse_from(["hashlink-gateway", "--storage", "mysql"]).is_err());

        let cli = CLI::try_parse_from([
            "hashlink-gateway",
            "--storage",
            "mysql",
            "--mysql-dsn",
            "mysql://root@localhost/hashlink",
        ])
        .unwrap();
        assert_eq!(cli.mysql_dsn.as_deref(), Some("mysql://root@localhost/hashlink"));
    }

    #[test]
    fn eviction_maps_to_policy() {
        let cli =
            CLI::try_parse_from(["hashlink-gateway", "--cache-eviction", "evict"]).unwrap();
        assert_eq!(EvictionPolicy::from(cli.cache_eviction), EvictionPolicy::Evict);
    }
}
