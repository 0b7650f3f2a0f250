//! Config sources: user config file and `GPTWIKI_*` environment overrides.

use config::builder::DefaultState;
use config::ConfigBuilder;
use config::ConfigError;
use config::{Environment, File, FileFormat};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Path to the user config file.
/// Uses XDG_CONFIG_HOME when set, otherwise the platform config dir.
pub fn user_config_path() -> Option<PathBuf> {
    if let Ok(xdg) = std::env::var("XDG_CONFIG_HOME") {
        if !xdg.is_empty() {
            return Some(PathBuf::from(xdg).join("gptwiki").join("config.toml"));
        }
    }
    directories::BaseDirs::new().map(|dirs| dirs.config_dir().join("gptwiki").join("config.toml"))
}

/// Add the config file at `path` to the builder if it exists.
pub fn add_file(
    builder: ConfigBuilder<DefaultState>,
    path: &Path,
) -> Result<ConfigBuilder<DefaultState>, ConfigError> {
    if !path.exists() {
        debug!(config_path = %path.display(), "Config file not present, using defaults");
        return Ok(builder);
    }
    let path_str = path.to_str().ok_or_else(|| {
        ConfigError::Message(format!("Config path is not valid UTF-8: {:?}", path))
    })?;
    Ok(builder.add_source(File::new(path_str, FileFormat::Toml).required(false)))
}

/// Add environment overrides, e.g. `GPTWIKI_API_KEY`, `GPTWIKI_LOGGING__LEVEL`.
pub fn add_env(builder: ConfigBuilder<DefaultState>) -> ConfigBuilder<DefaultState> {
    builder.add_source(
        Environment::with_prefix("GPTWIKI")
            .prefix_separator("_")
            .separator("__"),
    )
}
