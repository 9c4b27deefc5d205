//! Registry client configuration.

use std::env;
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use thiserror::Error;

/// Group used when none is configured.
pub const DEFAULT_GROUP: &str = "DEFAULT_GROUP";

/// Environment variable consulted when no endpoint is configured.
pub const ENDPOINT_ENV: &str = "NACOS_ADDR";

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("registry endpoint is not configured and NACOS_ADDR is not set")]
    MissingEndpoint,
    #[error("malformed registry endpoint '{endpoint}', expected <host>:<port>")]
    MalformedEndpoint { endpoint: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegistryConfig {
    /// Registry server address, e.g. `127.0.0.1:8848`.
    ///
    /// When empty, [`ENDPOINT_ENV`] is used instead.
    pub endpoint: String,
    /// Name the service instance is registered under.
    pub app_name: String,
    /// Bind address of the service, e.g. `0.0.0.0:8080`.
    pub address: String,
    pub group: String,
    pub namespace: String,
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            endpoint: String::new(),
            app_name: String::new(),
            address: String::new(),
            group: DEFAULT_GROUP.to_string(),
            namespace: String::new(),
        }
    }
}

impl RegistryConfig {
    pub fn new(app_name: impl Into<String>, address: impl Into<String>) -> Self {
        Self {
            app_name: app_name.into(),
            address: address.into(),
            ..Self::default()
        }
    }

    /// The configured group, or [`DEFAULT_GROUP`] when left empty.
    pub fn group(&self) -> &str {
        if self.group.is_empty() {
            DEFAULT_GROUP
        } else {
            &self.group
        }
    }

    /// Resolves the registry server, falling back to the `NACOS_ADDR`
    /// environment variable.
    pub fn server_endpoint(&self) -> Result<ServerEndpoint, ConfigError> {
        self.server_endpoint_or(env::var(ENDPOINT_ENV).ok())
    }

    /// Same as [`server_endpoint`](Self::server_endpoint) with an explicit
    /// fallback instead of the environment.
    pub fn server_endpoint_or(&self, fallback: Option<String>) -> Result<ServerEndpoint, ConfigError> {
        if !self.endpoint.is_empty() {
            return self.endpoint.parse();
        }
        match fallback {
            Some(endpoint) if !endpoint.is_empty() => endpoint.parse(),
            _ => Err(ConfigError::MissingEndpoint),
        }
    }

    /// Builds the parameters handed to the registry SDK.
    ///
    /// `options` are applied after the defaults derived from this config.
    pub fn client_params(&self, options: Vec<ClientOption>) -> Result<ClientParams, ConfigError> {
        let server = self.server_endpoint()?;
        Ok(self.client_params_for(server, options))
    }

    pub fn client_params_for(&self, server: ServerEndpoint, options: Vec<ClientOption>) -> ClientParams {
        ClientParams {
            endpoint: server.to_string(),
            server,
            app_name: self.app_name.clone(),
            namespace: self.namespace.clone(),
            options,
        }
    }
}

/// Host and port of the registry server.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerEndpoint {
    pub host: String,
    pub port: u16,
}

impl FromStr for ServerEndpoint {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let malformed = || ConfigError::MalformedEndpoint {
            endpoint: s.to_string(),
        };

        let (host, port) = s.split_once(':').ok_or_else(malformed)?;
        if host.is_empty() {
            return Err(malformed());
        }
        let port = port.parse::<u16>().map_err(|_| malformed())?;

        Ok(Self {
            host: host.to_string(),
            port,
        })
    }
}

impl fmt::Display for ServerEndpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.host, self.port)
    }
}

/// Extra SDK settings supplied by the caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClientOption {
    CacheDir(PathBuf),
    LogDir(PathBuf),
    Timeout(Duration),
    Custom { key: String, value: String },
}

/// Everything a registry SDK needs to build its naming and config clients.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientParams {
    pub endpoint: String,
    pub server: ServerEndpoint,
    pub app_name: String,
    pub namespace: String,
    pub options: Vec<ClientOption>,
}
