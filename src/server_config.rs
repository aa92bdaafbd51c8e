use std::path::{Path, PathBuf};
use std::time::Duration;

/// Largest request read from a connection, matching the single 1 KiB read of
/// the classic implementation.
pub const DEFAULT_MAX_REQUEST_SIZE: usize = 1024;
pub const DEFAULT_MAX_WORKERS: usize = 64;
pub const DEFAULT_PORT: u16 = 4221;
/// How long a connection may stay silent before whatever it sent is answered.
pub const DEFAULT_READ_TIMEOUT: Duration = Duration::from_secs(1);

/// Built once before the listener starts and shared read-only with every worker.
#[derive(Debug, Clone, PartialEq)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub directory: Option<PathBuf>,
    pub max_request_size: usize,
    pub max_workers: usize,
    pub read_timeout: Option<Duration>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        ServerConfig {
            host: String::from("0.0.0.0"),
            port: DEFAULT_PORT,
            directory: None,
            max_request_size: DEFAULT_MAX_REQUEST_SIZE,
            max_workers: DEFAULT_MAX_WORKERS,
            read_timeout: Some(DEFAULT_READ_TIMEOUT),
        }
    }
}

impl ServerConfig {
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

pub struct ServerConfigBuilder {
    server_config: ServerConfig,
}

#[allow(clippy::new_without_default)]
impl ServerConfigBuilder {
    pub fn new() -> Self {
        ServerConfigBuilder {
            server_config: ServerConfig::default(),
        }
    }

    pub fn host(mut self, host: &str) -> Self {
        self.server_config.host = host.to_string();

        self
    }

    pub fn port(mut self, port: u16) -> Self {
        self.server_config.port = port;

        self
    }

    pub fn directory(mut self, directory: impl AsRef<Path>) -> Self {
        self.server_config.directory = Some(directory.as_ref().to_path_buf());

        self
    }

    pub fn max_request_size(mut self, max_request_size: usize) -> Self {
        self.server_config.max_request_size = max_request_size.max(1);

        self
    }

    pub fn max_workers(mut self, max_workers: usize) -> Self {
        self.server_config.max_workers = max_workers.max(1);

        self
    }

    /// `None` waits forever on a silent client.
    pub fn read_timeout(mut self, read_timeout: Option<Duration>) -> Self {
        self.server_config.read_timeout = read_timeout.filter(|timeout| !timeout.is_zero());

        self
    }

    pub fn get(self) -> ServerConfig {
        self.server_config
    }
}
