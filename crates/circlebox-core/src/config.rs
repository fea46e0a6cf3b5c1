use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::render::Rgb;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub general: GeneralConfig,
    #[serde(default)]
    pub chain: ChainConfig,
    #[serde(default)]
    pub animation: AnimationConfig,
    #[serde(default)]
    pub stage: StageConfig,
    #[serde(default)]
    pub theme: ThemeConfig,
    #[serde(default)]
    pub keymap: KeymapConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneralConfig {
    /// Data directory path (log file lives here)
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,
    /// Log level
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            log_level: default_log_level(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChainConfig {
    /// Number of nodes in the chain
    #[serde(default = "default_node_count")]
    pub node_count: usize,
}

impl Default for ChainConfig {
    fn default() -> Self {
        Self {
            node_count: default_node_count(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnimationConfig {
    /// Period between animation ticks in milliseconds
    #[serde(default = "default_tick_ms")]
    pub tick_ms: u64,
    /// Idle UI tick rate in milliseconds
    #[serde(default = "default_idle_tick_ms")]
    pub idle_tick_ms: u64,
}

impl Default for AnimationConfig {
    fn default() -> Self {
        Self {
            tick_ms: default_tick_ms(),
            idle_tick_ms: default_idle_tick_ms(),
        }
    }
}

impl AnimationConfig {
    pub fn tick_period(&self) -> Duration {
        Duration::from_millis(self.tick_ms)
    }

    pub fn idle_tick_period(&self) -> Duration {
        Duration::from_millis(self.idle_tick_ms)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StageConfig {
    /// Node spacing divided by this gives the node size
    #[serde(default = "default_size_factor")]
    pub size_factor: f64,
    /// The smaller stage dimension divided by this gives the stroke width
    #[serde(default = "default_stroke_factor")]
    pub stroke_factor: f64,
    /// Stage width for headless rendering
    #[serde(default = "default_stage_width")]
    pub width: f64,
    /// Stage height for headless rendering
    #[serde(default = "default_stage_height")]
    pub height: f64,
}

impl Default for StageConfig {
    fn default() -> Self {
        Self {
            size_factor: default_size_factor(),
            stroke_factor: default_stroke_factor(),
            width: default_stage_width(),
            height: default_stage_height(),
        }
    }
}

/// Colors as hex strings (e.g., "#ff0000" or "ff0000")
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ThemeConfig {
    /// Stroke color of the shapes
    #[serde(default = "default_fore_color")]
    pub fore_color: String,
    /// Stage background
    #[serde(default = "default_back_color")]
    pub back_color: String,
}

impl Default for ThemeConfig {
    fn default() -> Self {
        Self {
            fore_color: default_fore_color(),
            back_color: default_back_color(),
        }
    }
}

/// Keymap configuration using Vim-style notation
/// Format: "q", "<C-j>" (Ctrl+j), "<S-g>" (Shift+g), "<CR>" (Enter), "<Space>"
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KeymapConfig {
    /// Start animating the current node
    #[serde(default = "default_key_tap")]
    pub tap: String,
    /// Quit the application
    #[serde(default = "default_key_quit")]
    pub quit: String,
}

impl Default for KeymapConfig {
    fn default() -> Self {
        Self {
            tap: default_key_tap(),
            quit: default_key_quit(),
        }
    }
}

fn default_key_tap() -> String { "<Space>".to_string() }
fn default_key_quit() -> String { "q".to_string() }

fn default_data_dir() -> PathBuf {
    dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("circlebox")
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_node_count() -> usize {
    5
}

fn default_tick_ms() -> u64 {
    50
}

fn default_idle_tick_ms() -> u64 {
    250
}

fn default_size_factor() -> f64 {
    2.9
}

fn default_stroke_factor() -> f64 {
    90.0
}

fn default_stage_width() -> f64 {
    800.0
}

fn default_stage_height() -> f64 {
    400.0
}

fn default_fore_color() -> String {
    "#673AB7".to_string()
}

fn default_back_color() -> String {
    "#BDBDBD".to_string()
}

/// Expand tilde (~) in path to user's home directory
fn expand_tilde(path: &Path) -> PathBuf {
    if let Some(path_str) = path.to_str() {
        if let Some(stripped) = path_str.strip_prefix("~/") {
            if let Some(home) = dirs::home_dir() {
                return home.join(stripped);
            }
        } else if path_str == "~" {
            if let Some(home) = dirs::home_dir() {
                return home;
            }
        }
    }
    path.to_path_buf()
}

impl AppConfig {
    /// Load configuration from the default path or return defaults
    pub fn load() -> crate::Result<Self> {
        Self::load_from(&Self::config_path())
    }

    /// Load configuration from `path`, falling back to defaults when the
    /// file does not exist. The result is validated either way.
    pub fn load_from(path: &Path) -> crate::Result<Self> {
        let config = if path.exists() {
            let content = std::fs::read_to_string(path)?;
            Self::from_toml(&content)?
        } else {
            Self::default()
        };
        config.validate()?;
        Ok(config)
    }

    pub fn from_toml(content: &str) -> crate::Result<Self> {
        Ok(toml::from_str(content)?)
    }

    pub fn to_toml(&self) -> crate::Result<String> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Save configuration to `path`
    pub fn save_to(&self, path: &Path) -> crate::Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, self.to_toml()?)?;
        Ok(())
    }

    /// Reject values the engine cannot run with
    pub fn validate(&self) -> crate::Result<()> {
        if self.chain.node_count == 0 {
            return Err(crate::Error::Config("chain.node_count must be at least 1".into()));
        }
        if self.animation.tick_ms == 0 {
            return Err(crate::Error::Config("animation.tick_ms must be positive".into()));
        }
        if self.animation.idle_tick_ms == 0 {
            return Err(crate::Error::Config("animation.idle_tick_ms must be positive".into()));
        }
        if !(self.stage.size_factor > 0.0) || !(self.stage.stroke_factor > 0.0) {
            return Err(crate::Error::Config(
                "stage.size_factor and stage.stroke_factor must be positive".into(),
            ));
        }
        if !(self.stage.width > 0.0) || !(self.stage.height > 0.0) {
            return Err(crate::Error::Config(
                "stage.width and stage.height must be positive".into(),
            ));
        }
        Rgb::parse(&self.theme.fore_color)?;
        Rgb::parse(&self.theme.back_color)?;
        Ok(())
    }

    /// Get the configuration file path
    /// Always uses ~/.config/circlebox/config.toml on all platforms
    pub fn config_path() -> PathBuf {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".config")
            .join("circlebox")
            .join("config.toml")
    }

    /// Get the data directory (with tilde expansion)
    pub fn data_dir(&self) -> PathBuf {
        expand_tilde(&self.general.data_dir)
    }

    /// Log file used while the TUI owns the terminal
    pub fn log_path(&self) -> PathBuf {
        self.data_dir().join("circlebox.log")
    }
}
