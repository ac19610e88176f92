//! Configuration file handling for the daemon

use std::collections::HashMap;
use std::error::Error;
use std::fs;
use std::path::PathBuf;
use std::time::Duration;

use directories::ProjectDirs;
use rgb_sync_core::{MouseKind, PoolConfig, Rgb};
use roccat_vulcan::handshake::HandshakeConfig;
use serde::{Deserialize, Serialize};
use tracing::info;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub general: GeneralConfig,
    pub devices: DevicesConfig,
    pub handshake: HandshakeSettings,
}

impl Config {
    /// Get the config file path for this platform
    pub fn path() -> Option<PathBuf> {
        ProjectDirs::from("", "", "rgb-sync").map(|dirs| dirs.config_dir().join("config.toml"))
    }

    /// Load config from file, or create default if it doesn't exist
    pub fn load_or_create() -> Result<Self, Box<dyn Error>> {
        let path = Self::path().ok_or("could not determine config directory")?;

        if path.exists() {
            Self::load()
        } else {
            let config = Config::default();
            config.save_with_header()?;
            info!("created default config at {}", path.display());
            Ok(config)
        }
    }

    /// Read the config file as it is now
    pub fn load() -> Result<Self, Box<dyn Error>> {
        let path = Self::path().ok_or("could not determine config directory")?;
        let contents = fs::read_to_string(&path)?;
        Self::parse(&contents)
    }

    pub fn parse(contents: &str) -> Result<Self, Box<dyn Error>> {
        let config: Config = toml::from_str(contents)?;
        config.general.fill_color()?;
        Ok(config)
    }

    /// Save config with header comments for new files
    pub fn save_with_header(&self) -> Result<(), Box<dyn Error>> {
        let path = Self::path().ok_or("could not determine config directory")?;

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let header = r#"# rgb-sync configuration file
# changes are picked up while the daemon runs

"#;
        let contents = toml::to_string_pretty(self)?;
        fs::write(&path, format!("{header}{contents}"))?;
        Ok(())
    }

    /// Snapshot handed to the device pool
    pub fn pool_config(&self) -> PoolConfig {
        PoolConfig {
            keyboard: self.devices.keyboard,
            mouse: self.devices.mouse,
            gpu: self.devices.gpu,
            other: self.devices.other,
            mouse_preference: self.devices.mouse_preference.into(),
            rates: self.devices.rates.clone(),
        }
    }

    pub fn handshake_config(&self) -> HandshakeConfig {
        HandshakeConfig {
            max_attempts: self.handshake.attempts,
            interval: self.handshake.interval,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    /// Frames published per second
    pub fps: f32,
    /// Color every key is filled with (hex)
    pub color: String,
    /// How often connected devices and timings are logged, 0s to disable
    #[serde(with = "humantime_serde")]
    pub status_interval: Duration,
    /// How often the config file is checked for changes
    #[serde(with = "humantime_serde")]
    pub config_poll: Duration,
}

impl GeneralConfig {
    pub fn fill_color(&self) -> Result<Rgb, String> {
        self.color.parse()
    }
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            fps: 30.0,
            color: "#ffffff".into(),
            status_interval: Duration::from_secs(60),
            config_poll: Duration::from_secs(5),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DevicesConfig {
    pub keyboard: bool,
    pub mouse: bool,
    pub gpu: bool,
    /// Light strips, headsets and anything else
    pub other: bool,
    /// Zone layout assumed for vendor mice
    pub mouse_preference: MousePreference,
    /// Updates per second by device name, overriding the driver default
    pub rates: HashMap<String, f32>,
}

impl Default for DevicesConfig {
    fn default() -> Self {
        Self {
            keyboard: true,
            mouse: true,
            gpu: true,
            other: true,
            mouse_preference: MousePreference::Standard,
            rates: HashMap::new(),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MousePreference {
    #[default]
    Standard,
    Pugio,
}

impl From<MousePreference> for MouseKind {
    fn from(value: MousePreference) -> Self {
        match value {
            MousePreference::Standard => MouseKind::Standard,
            MousePreference::Pugio => MouseKind::Pugio,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HandshakeSettings {
    /// Status polls before a keyboard is given up on
    pub attempts: u32,
    /// Wait before every status poll
    #[serde(with = "humantime_serde")]
    pub interval: Duration,
}

impl Default for HandshakeSettings {
    fn default() -> Self {
        let defaults = HandshakeConfig::default();
        Self {
            attempts: defaults.max_attempts,
            interval: defaults.interval,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_file_is_default() {
        assert_eq!(Config::parse("").unwrap(), Config::default());
    }

    #[test]
    fn default_survives_serialization() {
        let text = toml::to_string_pretty(&Config::default()).unwrap();
        assert!(text.contains("status_interval = \"1m\""));
        assert_eq!(Config::parse(&text).unwrap(), Config::default());
    }

    #[test]
    fn partial_sections_keep_defaults() {
        let config = Config::parse(
            r##"
            [general]
            color = "#f00"
            status_interval = "0s"

            [devices]
            gpu = false
            mouse_preference = "pugio"
            rates = { "Drevo Keyboard" = 10.0 }

            [handshake]
            interval = "20ms"
            "##,
        )
        .unwrap();

        assert_eq!(config.general.fill_color(), Ok(Rgb::new(255, 0, 0)));
        assert!(config.general.status_interval.is_zero());
        assert_eq!(config.general.fps, 30.0);

        let pool = config.pool_config();
        assert!(pool.keyboard && pool.mouse && pool.other);
        assert!(!pool.gpu);
        assert_eq!(pool.mouse_preference, MouseKind::Pugio);
        assert_eq!(pool.rates.get("Drevo Keyboard"), Some(&10.0));

        assert_eq!(config.handshake_config(), HandshakeConfig {
            max_attempts: 100,
            interval: Duration::from_millis(20),
        });
    }

    #[test]
    fn bad_color_is_rejected() {
        assert!(Config::parse("[general]\ncolor = \"#12\"").is_err());
        assert!(Config::parse("[devices]\nmouse_preference = \"ball\"").is_err());
    }
}
