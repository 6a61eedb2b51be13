use crate::error::{ModuleError, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// File name of the optional config file inside the storage root.
pub const CONFIG_FILE: &str = "modulex.yaml";

pub const DEFAULT_SIGNALING_URL: &str = "http://127.0.0.1:3000";

fn default_signaling_url() -> String {
    DEFAULT_SIGNALING_URL.to_string()
}

fn default_storage_root() -> PathBuf {
    PathBuf::from(".")
}

// ---------------------------------------------------------------------------
// Config
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Base URL of the signaling endpoint that receives instructions and callbacks.
    #[serde(default = "default_signaling_url")]
    pub signaling_url: String,
    /// Directory holding `images/`, `videos/` and `modulex.yaml`.
    #[serde(default = "default_storage_root")]
    pub storage_root: PathBuf,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            signaling_url: default_signaling_url(),
            storage_root: default_storage_root(),
        }
    }
}

impl Config {
    pub fn path(root: &Path) -> PathBuf {
        root.join(CONFIG_FILE)
    }

    /// Load `modulex.yaml` from `root`, falling back to defaults when the file
    /// is absent. The storage root is always `root`, whatever the file says.
    pub fn load(root: &Path) -> Result<Self> {
        let path = Self::path(root);
        let mut cfg = if path.exists() {
            let data = std::fs::read_to_string(&path)?;
            serde_yaml::from_str::<Config>(&data)?
        } else {
            Config::default()
        };
        cfg.storage_root = root.to_path_buf();
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn save(&self, root: &Path) -> Result<()> {
        let data = serde_yaml::to_string(self)?;
        crate::io::atomic_write(&Self::path(root), data.as_bytes())
    }

    /// Apply a command-line or environment override of the signaling URL.
    pub fn with_signaling_url(mut self, url: Option<String>) -> Result<Self> {
        if let Some(url) = url {
            self.signaling_url = url;
        }
        self.validate()?;
        Ok(self)
    }

    pub fn validate(&self) -> Result<()> {
        let url = self.signaling_url.trim();
        if !(url.starts_with("http://") || url.starts_with("https://")) {
            return Err(ModuleError::InvalidSignalingUrl(self.signaling_url.clone()));
        }
        Ok(())
    }

    /// Signaling URL without a trailing slash, ready for path joins.
    pub fn signaling_base(&self) -> &str {
        self.signaling_url.trim().trim_end_matches('/')
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn load_without_file_uses_defaults() {
        let dir = TempDir::new().unwrap();
        let cfg = Config::load(dir.path()).unwrap();
        assert_eq!(cfg.signaling_url, DEFAULT_SIGNALING_URL);
        assert_eq!(cfg.storage_root, dir.path());
    }

    #[test]
    fn load_reads_signaling_url_from_yaml() {
        let dir = TempDir::new().unwrap();
        std::fs::write(
            dir.path().join(CONFIG_FILE),
            "signaling_url: http://192.168.1.9:3000\n",
        )
        .unwrap();
        let cfg = Config::load(dir.path()).unwrap();
        assert_eq!(cfg.signaling_url, "http://192.168.1.9:3000");
    }

    #[test]
    fn save_then_load_preserves_url() {
        let dir = TempDir::new().unwrap();
        let cfg = Config::default()
            .with_signaling_url(Some("https://signal.example.com".into()))
            .unwrap();
        cfg.save(dir.path()).unwrap();
        let loaded = Config::load(dir.path()).unwrap();
        assert_eq!(loaded.signaling_url, "https://signal.example.com");
    }

    #[test]
    fn override_replaces_file_value() {
        let cfg = Config::default()
            .with_signaling_url(Some("http://10.0.0.2:3000".into()))
            .unwrap();
        assert_eq!(cfg.signaling_url, "http://10.0.0.2:3000");

        let unchanged = Config::default().with_signaling_url(None).unwrap();
        assert_eq!(unchanged.signaling_url, DEFAULT_SIGNALING_URL);
    }

    #[test]
    fn non_http_url_is_rejected() {
        let err = Config::default()
            .with_signaling_url(Some("ftp://example.com".into()))
            .unwrap_err();
        assert!(matches!(err, ModuleError::InvalidSignalingUrl(_)));
    }

    #[test]
    fn signaling_base_strips_trailing_slash() {
        let cfg = Config::default()
            .with_signaling_url(Some("http://localhost:3000/".into()))
            .unwrap();
        assert_eq!(cfg.signaling_base(), "http://localhost:3000");
    }
}
