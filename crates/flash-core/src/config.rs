use std::env;
use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::debounce::DEFAULT_QUIET_MS;

/// User-level settings, loaded from `<config dir>/flash/config.toml`.
///
/// Everything is optional; a missing file means defaults.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserConfig {
    /// Quiet period between keystrokes and an extraction pass.
    #[serde(default = "default_debounce_ms")]
    pub debounce_ms: u64,
    /// Where session state (the persisted draft) lives. Overridden by the
    /// `FLASH_SESSION_DIR` environment variable.
    #[serde(default)]
    pub session_dir: Option<PathBuf>,
    /// Extra example descriptions appended to the built-in suggestions.
    #[serde(default)]
    pub suggestions: Vec<String>,
}

impl Default for UserConfig {
    fn default() -> Self {
        Self {
            debounce_ms: default_debounce_ms(),
            session_dir: None,
            suggestions: Vec::new(),
        }
    }
}

impl UserConfig {
    #[must_use]
    pub const fn quiet_period(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }
}

const fn default_debounce_ms() -> u64 {
    DEFAULT_QUIET_MS
}

pub fn load_user_config() -> Result<UserConfig> {
    let Some(config_dir) = dirs::config_dir() else {
        return Ok(UserConfig::default());
    };

    let path = config_dir.join("flash/config.toml");
    if !path.exists() {
        return Ok(UserConfig::default());
    }

    let content = std::fs::read_to_string(&path)
        .with_context(|| format!("Failed to read {}", path.display()))?;

    toml::from_str::<UserConfig>(&content)
        .with_context(|| format!("Failed to parse {}", path.display()))
}

/// Resolve where the session store lives.
///
/// Precedence: `FLASH_SESSION_DIR` env var, then the config override, then
/// a `flash` directory under the OS temp dir. The draft is session state,
/// not long-term storage, so temp is the right default home.
#[must_use]
pub fn session_dir(config: &UserConfig) -> PathBuf {
    if let Some(dir) = env::var_os("FLASH_SESSION_DIR") {
        return PathBuf::from(dir);
    }
    if let Some(dir) = &config.session_dir {
        return dir.clone();
    }
    env::temp_dir().join("flash")
}
