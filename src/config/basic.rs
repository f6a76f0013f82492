use serde::{Deserialize, Serialize};
use std::net::{IpAddr, Ipv4Addr};
use std::path::PathBuf;

/// Basic (core) configuration managed by Figment.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct BasicConfig {
    /// HTTP server listen address (e.g., "0.0.0.0", "127.0.0.1").
    /// TOML: `basic.listen_addr`. Default: `0.0.0.0`.
    #[serde(default = "default_listen_ip")]
    pub listen_addr: IpAddr,

    /// HTTP server listen port.
    /// TOML: `basic.listen_port`, env: `PORT`. Default: `8486`.
    #[serde(default = "default_listen_port")]
    pub listen_port: u16,

    /// DuckDB target: `:memory:` or a database file path.
    /// TOML: `basic.database_path`. Default: `:memory:`.
    #[serde(default = "default_database_path")]
    pub database_path: String,

    /// Log level for tracing subscriber initialization (e.g., "error", "warn", "info", "debug", "trace").
    /// TOML: `basic.loglevel`. Default: `info`.
    #[serde(default = "default_loglevel")]
    pub loglevel: String,

    /// Static page served at `/`.
    /// TOML: `basic.index_file`. Default: `index.html`.
    #[serde(default = "default_index_file")]
    pub index_file: PathBuf,
}

impl Default for BasicConfig {
    fn default() -> Self {
        Self {
            listen_addr: default_listen_ip(),
            listen_port: default_listen_port(),
            database_path: default_database_path(),
            loglevel: default_loglevel(),
            index_file: default_index_file(),
        }
    }
}

/// Default IP address for the HTTP server listen address.
fn default_listen_ip() -> IpAddr {
    Ipv4Addr::new(0, 0, 0, 0).into()
}

/// Default port for the HTTP server.
fn default_listen_port() -> u16 {
    8486
}

fn default_database_path() -> String {
    crate::db::IN_MEMORY.to_string()
}

fn default_loglevel() -> String {
    "info".to_string()
}

fn default_index_file() -> PathBuf {
    PathBuf::from("index.html")
}
