//! Process-wide configuration.

use std::path::PathBuf;

/// Immutable service configuration, loaded once at startup and injected
/// into the router state.
#[derive(Debug, Clone)]
pub struct Settings {
    /// Root of the managed directory tree. Extraction targets are always
    /// resolved under this directory.
    pub base_dir: PathBuf,
    /// Shared-secret token gating all PUT requests. `None` disables the
    /// check entirely.
    pub api_token: Option<String>,
    /// Directory for staged uploads. Defaults to the base directory.
    pub tmp_dir: PathBuf,
    /// Socket address the server binds to.
    pub bind_addr: String,
}

impl Settings {
    /// Loads settings from the environment.
    ///
    /// Recognized variables:
    /// - `HERMES_BASE_DIR` (required)
    /// - `HERMES_API_TOKEN` (optional; absent means unauthenticated)
    /// - `HERMES_TMP_DIR` (optional; defaults to the base directory)
    /// - `HERMES_ADDR` (optional; defaults to `0.0.0.0:8080`)
    ///
    /// # Errors
    ///
    /// Fails when `HERMES_BASE_DIR` is unset, which refuses process
    /// startup.
    pub fn from_env() -> anyhow::Result<Self> {
        let base_dir = std::env::var("HERMES_BASE_DIR")
            .map(PathBuf::from)
            .map_err(|_| anyhow::anyhow!("HERMES_BASE_DIR must be set"))?;
        let api_token = std::env::var("HERMES_API_TOKEN").ok().filter(|t| !t.is_empty());
        let tmp_dir = std::env::var("HERMES_TMP_DIR")
            .map_or_else(|_| base_dir.clone(), PathBuf::from);
        let bind_addr =
            std::env::var("HERMES_ADDR").unwrap_or_else(|_| "0.0.0.0:8080".to_string());

        Ok(Self {
            base_dir,
            api_token,
            tmp_dir,
            bind_addr,
        })
    }

    /// Settings for a given base directory with no token and the base
    /// directory doubling as temp storage.
    #[must_use]
    pub fn for_base_dir(base_dir: impl Into<PathBuf>) -> Self {
        let base_dir = base_dir.into();
        Self {
            tmp_dir: base_dir.clone(),
            base_dir,
            api_token: None,
            bind_addr: "127.0.0.1:0".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_for_base_dir_defaults() {
        let settings = Settings::for_base_dir("/srv/deploys");
        assert_eq!(settings.base_dir, PathBuf::from("/srv/deploys"));
        assert_eq!(settings.tmp_dir, PathBuf::from("/srv/deploys"));
        assert!(settings.api_token.is_none());
    }
}
