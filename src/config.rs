use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::bail;

/// Address used when `LISTEN` is not set.
pub const DEFAULT_LISTEN_ADDR: &str = "0.0.0.0:4221";

/// Server configuration, built once at startup and shared read-only
/// between connection tasks.
#[derive(Debug, Clone)]
pub struct Config {
    /// Socket address the listener binds to.
    pub listen_addr: String,
    /// Root directory for `/files/` downloads and uploads.
    pub directory: Option<PathBuf>,
    /// Deadline for each individual socket read.
    pub read_timeout: Duration,
    /// How long in-flight connections may run after shutdown is requested.
    pub shutdown_grace: Duration,
    /// Upper bound on the bytes buffered for a single request.
    pub max_request_bytes: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            listen_addr: DEFAULT_LISTEN_ADDR.to_string(),
            directory: None,
            read_timeout: Duration::from_secs(30),
            shutdown_grace: Duration::from_secs(5),
            max_request_bytes: 8 * 1024 * 1024,
        }
    }
}

impl Config {
    /// Builds the configuration from the process arguments and the
    /// `LISTEN` environment variable.
    pub fn load() -> anyhow::Result<Self> {
        let mut cfg = Self::from_args(std::env::args().skip(1))?;
        if let Ok(addr) = std::env::var("LISTEN") {
            cfg.listen_addr = addr;
        }
        Ok(cfg)
    }

    /// Parses command line flags. Only `--directory <path>` is understood.
    pub fn from_args<I, S>(args: I) -> anyhow::Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut cfg = Self::default();
        let mut args = args.into_iter().map(Into::into);

        while let Some(arg) = args.next() {
            if arg == "--directory" {
                match args.next() {
                    Some(dir) if !dir.is_empty() => cfg.directory = Some(PathBuf::from(dir)),
                    _ => bail!("--directory requires a path"),
                }
            } else if let Some(dir) = arg.strip_prefix("--directory=") {
                if dir.is_empty() {
                    bail!("--directory requires a path");
                }
                cfg.directory = Some(PathBuf::from(dir));
            } else {
                bail!("unrecognized argument: {}", arg);
            }
        }

        Ok(cfg)
    }

    pub fn with_directory(mut self, dir: impl AsRef<Path>) -> Self {
        self.directory = Some(dir.as_ref().to_path_buf());
        self
    }

    pub fn with_listen_addr(mut self, addr: impl Into<String>) -> Self {
        self.listen_addr = addr.into();
        self
    }
}
