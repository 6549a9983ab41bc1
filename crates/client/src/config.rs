//! Client configuration loaded from environment variables.

use std::path::PathBuf;
use std::time::Duration;

/// Configuration for one client instance.
///
/// All fields have defaults suitable for a locally running backend.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Backend base URL (default: `http://localhost:5000`).
    pub backend_url: String,
    /// Delay between task status queries (default: 1 s).
    pub poll_interval: Duration,
    /// Where the durable session id lives
    /// (default: `<os temp dir>/fotokadr/session_id`).
    pub session_file: PathBuf,
}

impl ClientConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var              | Default                          |
    /// |----------------------|----------------------------------|
    /// | `BACKEND_URL`        | `http://localhost:5000`          |
    /// | `POLL_INTERVAL_SECS` | `1`                              |
    /// | `SESSION_FILE`       | `<tmp>/fotokadr/session_id`      |
    pub fn from_env() -> Self {
        let backend_url =
            std::env::var("BACKEND_URL").unwrap_or_else(|_| "http://localhost:5000".into());

        let poll_interval_secs: u64 = std::env::var("POLL_INTERVAL_SECS")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(1);

        let session_file = std::env::var("SESSION_FILE")
            .map(PathBuf::from)
            .unwrap_or_else(|_| Self::default_session_file());

        Self {
            backend_url,
            poll_interval: Duration::from_secs(poll_interval_secs),
            session_file,
        }
    }

    fn default_session_file() -> PathBuf {
        std::env::temp_dir().join("fotokadr").join("session_id")
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            backend_url: "http://localhost:5000".into(),
            poll_interval: Duration::from_secs(1),
            session_file: Self::default_session_file(),
        }
    }
}
