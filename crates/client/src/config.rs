use std::path::PathBuf;

/// Default service URL for local development.
const DEFAULT_API_URL: &str = "http://localhost:3000";

/// Subdirectory of the per-user data dir holding client state.
const STATE_SUBDIR: &str = "careerkey";

/// Client configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Base URL of the API service, without the `/api/v1` prefix.
    pub base_url: String,
    /// Directory holding the persisted client state file.
    pub state_dir: PathBuf,
}

impl ClientConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var               | Default                          |
    /// |-----------------------|----------------------------------|
    /// | `CAREERKEY_API_URL`   | `http://localhost:3000`          |
    /// | `CAREERKEY_STATE_DIR` | `<user data dir>/careerkey`      |
    pub fn from_env() -> Self {
        let base_url =
            std::env::var("CAREERKEY_API_URL").unwrap_or_else(|_| DEFAULT_API_URL.into());

        let state_dir = std::env::var_os("CAREERKEY_STATE_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(default_state_dir);

        Self {
            base_url,
            state_dir,
        }
    }

    /// Path of the JSON file backing [`FileStore`](crate::store::FileStore).
    pub fn state_file(&self) -> PathBuf {
        self.state_dir.join("state.json")
    }
}

fn default_state_dir() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(STATE_SUBDIR)
}
