use super::{default_global_config_path, ConfigError, Settings};
use std::path::Path;

/// Loads settings from `path`, or from the global config file when it
/// exists, falling back to defaults.
pub fn load_settings(path: Option<&Path>) -> Result<Settings, ConfigError> {
    let settings = match path {
        Some(path) => Settings::from_path(path)?,
        None => {
            let global = default_global_config_path()?;
            if global.exists() {
                Settings::from_path(&global)?
            } else {
                Settings::default()
            }
        }
    };
    settings.validate()?;
    Ok(settings)
}
