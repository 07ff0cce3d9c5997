use std::net::{Ipv4Addr, SocketAddr};
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{ServerError, ServerResult};

pub const DEFAULT_PORT: u16 = 1102;

/// Everything the gateway needs, passed explicitly to [`crate::RcrtServer`].
///
/// Missing keys in a TOML file fall back to [`ServerConfig::default`].
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub bind_addr: SocketAddr,
    /// Store directory served under `/db` and edited through `/edit`.
    pub db_path: PathBuf,
    /// Client bundle served under `/app`.
    pub app_dir: PathBuf,
    /// Mount point such as `/rcrt`; empty mounts at the root.
    pub prefix: String,
    /// Whether the shell runs the client in editable mode and edits are accepted.
    pub editable: bool,
    pub max_body_bytes: usize,
    /// Create and seed the store when `db_path` does not exist.
    pub init_if_missing: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: SocketAddr::from((Ipv4Addr::LOCALHOST, DEFAULT_PORT)),
            db_path: PathBuf::from("db"),
            app_dir: PathBuf::from("app"),
            prefix: String::new(),
            editable: true,
            max_body_bytes: 16 * 1024 * 1024,
            init_if_missing: false,
        }
    }
}

impl ServerConfig {
    /// Load from a TOML file.
    pub fn from_toml_file(path: impl AsRef<Path>) -> ServerResult<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path)?;
        let config: Self = toml::from_str(&raw)
            .map_err(|e| ServerError::Config(format!("{}: {e}", path.display())))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> ServerResult<()> {
        if !self.prefix.is_empty() {
            if !self.prefix.starts_with('/') {
                return Err(ServerError::Config(format!(
                    "prefix {:?} must start with '/'",
                    self.prefix
                )));
            }
            if self.prefix.ends_with('/') {
                return Err(ServerError::Config(format!(
                    "prefix {:?} must not end with '/'",
                    self.prefix
                )));
            }
            let segments_ok = self.prefix[1..]
                .split('/')
                .all(|seg| !seg.is_empty() && seg != "." && seg != "..");
            let chars_ok = self
                .prefix
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || matches!(c, '/' | '-' | '_' | '.' | '~'));
            if !segments_ok || !chars_ok {
                return Err(ServerError::Config(format!(
                    "prefix {:?} may only hold path segments of ASCII letters, digits, '-', '_', '.' or '~'",
                    self.prefix
                )));
            }
        }
        if self.max_body_bytes == 0 {
            return Err(ServerError::Config("max_body_bytes must be positive".into()));
        }
        Ok(())
    }

    /// Mode flag handed to the client.
    pub fn mode(&self) -> &'static str {
        if self.editable {
            "editable"
        } else {
            "readonly"
        }
    }
}
