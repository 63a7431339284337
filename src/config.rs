use crate::logging;
use crate::settings::{CfgDefaultKeymaps, Settings};
use eyre::Result;
use serde_json;
use std::{fs, path::PathBuf};

#[derive(Debug, Clone)]
pub struct Config {
    pub settings: Settings,
    pub keymap: CfgDefaultKeymaps,
    filepath: PathBuf,
}

impl Config {
    /// Load `configuration.json` from the application data directory,
    /// writing the defaults there the first time.
    pub fn new() -> Result<Self> {
        let prefix = get_app_data_prefix()?;
        let filepath = prefix.join("configuration.json");

        let config = Self::load_from(filepath)?;
        if !config.filepath.exists() {
            config.save()?;
        }
        Ok(config)
    }

    /// Get the configuration file path
    pub fn filepath(&self) -> &PathBuf {
        &self.filepath
    }

    /// Create a config with custom settings for testing
    #[cfg(test)]
    pub fn with_settings(settings: Settings, keymap: CfgDefaultKeymaps) -> Result<Self> {
        let prefix = get_app_data_prefix()?;
        let filepath = prefix.join("test_configuration.json");

        Ok(Self {
            settings,
            keymap,
            filepath,
        })
    }

    /// Save current configuration to file
    pub fn save(&self) -> Result<()> {
        let config_json = serde_json::json!({
            "Setting": self.settings,
            "Keymap": self.keymap,
        });

        let config_str = serde_json::to_string_pretty(&config_json)?;

        // Ensure directory exists before writing
        if let Some(parent) = self.filepath.parent() {
            fs::create_dir_all(parent)?;
        }

        fs::write(&self.filepath, config_str)?;
        Ok(())
    }

    /// Load configuration from a custom path. Missing files, unparsable JSON
    /// and malformed sections all fall back to the defaults.
    pub fn load_from(filepath: PathBuf) -> Result<Self> {
        let mut settings = Settings::default();
        let mut keymap = CfgDefaultKeymaps::default();

        if filepath.exists() {
            let config_str = fs::read_to_string(&filepath)?;
            match serde_json::from_str::<serde_json::Value>(&config_str) {
                Ok(user_config) => {
                    if let Some(section) = user_config.get("Setting") {
                        match serde_json::from_value::<Settings>(section.clone()) {
                            Ok(user_settings) => settings.merge(user_settings),
                            Err(err) => logging::warn(format!(
                                "ignoring Setting section of {}: {}",
                                filepath.display(),
                                err
                            )),
                        }
                    }
                    if let Some(section) = user_config.get("Keymap") {
                        match serde_json::from_value::<CfgDefaultKeymaps>(section.clone()) {
                            Ok(user_keymap) => keymap.merge(user_keymap),
                            Err(err) => logging::warn(format!(
                                "ignoring Keymap section of {}: {}",
                                filepath.display(),
                                err
                            )),
                        }
                    }
                }
                Err(err) => logging::warn(format!(
                    "could not parse {}, using defaults: {}",
                    filepath.display(),
                    err
                )),
            }
        }

        Ok(Self {
            settings,
            keymap,
            filepath,
        })
    }

    pub fn database_path(&self) -> PathBuf {
        PathBuf::from(&self.settings.database)
    }

    pub fn media_root(&self) -> PathBuf {
        PathBuf::from(&self.settings.media_root)
    }
}

pub fn get_app_data_prefix() -> Result<PathBuf> {
    if let Some(config_home) = std::env::var_os("XDG_CONFIG_HOME") {
        let path = PathBuf::from(config_home).join("ayaview");
        return Ok(path);
    } else if let Some(home) = std::env::var_os("HOME") {
        let path = PathBuf::from(home.clone()).join(".config").join("ayaview");
        if path.exists() {
            return Ok(path);
        } else {
            return Ok(PathBuf::from(home).join(".ayaview"));
        }
    } else if let Some(user_profile) = std::env::var_os("USERPROFILE") {
        return Ok(PathBuf::from(user_profile).join(".ayaview"));
    }

    Err(eyre::eyre!(
        "Could not determine application data directory"
    ))
}
