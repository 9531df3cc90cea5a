use std::path::{Path, PathBuf};

use log::{debug, info};
use serde::Deserialize;

use crate::error::{Result, ShellError};

/// Runtime settings. Every field has a default so an empty or missing file is valid.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ShellConfig {
    pub hostname: String,
    /// User name used when nothing is persisted yet.
    pub default_user: String,
    pub history_size: usize,
    /// First line a file must carry to be run as a script.
    pub shebang: String,
    /// Script run for `?blogpost=list`.
    pub blog_list_script: String,
    /// Directory holding the blog posts the `blogpost` parameter opens.
    pub blog_dir: String,
    /// Two completion presses closer than this count as a double press.
    pub double_tab_ms: u64,
    /// External filesystem seed (JSON). Bundled seed when absent.
    pub seed_path: Option<PathBuf>,
    /// External blog post records (JSON). Bundled posts when absent.
    pub posts_path: Option<PathBuf>,
    /// Where the native binary keeps session state.
    pub state_path: PathBuf,
}

impl Default for ShellConfig {
    fn default() -> Self {
        Self {
            hostname: "hera".to_string(),
            default_user: "earentir".to_string(),
            history_size: 100,
            shebang: "#!/bin/earsh".to_string(),
            blog_list_script: "/home/earentir/blog.sh".to_string(),
            blog_dir: "/home/earentir/blog".to_string(),
            double_tab_ms: 500,
            seed_path: None,
            posts_path: None,
            state_path: PathBuf::from(".earsh-state.json"),
        }
    }
}

impl ShellConfig {
    pub fn from_toml(text: &str) -> Result<Self> {
        let config: Self = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        if self.history_size == 0 {
            return Err(ShellError::Config("history_size must be at least 1".to_string()));
        }
        if !self.shebang.starts_with("#!") {
            return Err(ShellError::Config(format!("shebang '{}' must start with #!", self.shebang)));
        }
        Ok(())
    }

    /// Load from `path`; a missing file yields the defaults.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            debug!("no config at {}, using defaults", path.display());
            return Ok(Self::default());
        }
        let text = std::fs::read_to_string(path)?;
        let config = Self::from_toml(&text)?;
        info!("loaded config from {}", path.display());
        Ok(config)
    }
}
