use std::net::SocketAddr;

use clap::Parser;
use subway_core::repository::{SqliteStore, StorageError};

/// Database value selecting a throwaway in-memory store.
pub const IN_MEMORY_DATABASE: &str = ":memory:";

#[derive(Parser, Debug, Clone)]
#[command(
    name = "subway-server",
    version,
    about = "HTTP API for subway lines and the order of their stations"
)]
pub struct Config {
    /// Address to listen on
    #[arg(long, env = "SUBWAY_BIND", default_value = "127.0.0.1:8080")]
    pub bind: SocketAddr,

    /// SQLite database file, or `:memory:` for a store that lives as long as the process
    #[arg(long, env = "SUBWAY_DATABASE", default_value = "subway.db")]
    pub database: String,

    /// Tracing filter directives (e.g. `info,subway_core=debug`)
    #[arg(long, env = "RUST_LOG", default_value = "info")]
    pub log_filter: String,
}

impl Config {
    pub fn open_store(&self) -> Result<SqliteStore, StorageError> {
        if self.database == IN_MEMORY_DATABASE {
            SqliteStore::in_memory()
        } else {
            SqliteStore::open(&self.database)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_flags() {
        let config = Config::try_parse_from([
            "subway-server",
            "--bind",
            "0.0.0.0:9000",
            "--database",
            ":memory:",
            "--log-filter",
            "debug",
        ])
        .unwrap();

        assert_eq!(config.bind.port(), 9000);
        assert_eq!(config.database, IN_MEMORY_DATABASE);
        assert_eq!(config.log_filter, "debug");
        assert!(config.open_store().is_ok());
    }

    #[test]
    fn test_rejects_bad_bind_address() {
        assert!(Config::try_parse_from(["subway-server", "--bind", "nowhere"]).is_err());
    }
}
