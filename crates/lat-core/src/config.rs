//! Configuration types for lat.
//!
//! [`Config::load`] reads `~/.config/lat/config.toml`, creating it with
//! hardcoded defaults if it does not yet exist. [`Config::defaults`] returns
//! the same defaults without touching the filesystem (useful in tests).

use serde::Deserialize;
use std::path::{Path, PathBuf};

// ---------------------------------------------------------------------------
// Embedded defaults
// ---------------------------------------------------------------------------

const DEFAULT_CONFIG: &str = r#"
[analysis]
default_depth            = 1
max_depth                = 20
exclude_message_patterns = ["http://erp-sys-apigateway:8765/error"]

[ui]
show_timestamps        = true
context_pane_width_pct = 25
stats_pane_height_pct  = 40

[export]
directory    = "."
records_file = "extracted_details.csv"
stats_file   = "statistics.csv"

[keybindings]
toggle_focus = "Tab"
filter_focus = "/"
depth_up     = "]"
depth_down   = "["
export       = "e"
"#;

// ---------------------------------------------------------------------------
// Public config types
// ---------------------------------------------------------------------------

/// Top-level application configuration, loaded from `~/.config/lat/config.toml`.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub analysis: AnalysisConfig,
    #[serde(default)]
    pub ui: UiConfig,
    #[serde(default)]
    pub export: ExportConfig,
    #[serde(default)]
    pub keybindings: KeybindingsConfig,
}

/// `[analysis]` section of `config.toml`.
#[derive(Debug, Clone, Deserialize)]
pub struct AnalysisConfig {
    #[serde(default = "default_depth")]
    pub default_depth: usize,
    #[serde(default = "default_max_depth")]
    pub max_depth: usize,
    /// Records whose message contains any of these literals are dropped at load time.
    #[serde(default = "default_exclude_message_patterns")]
    pub exclude_message_patterns: Vec<String>,
}

fn default_depth() -> usize { 1 }
fn default_max_depth() -> usize { 20 }
fn default_exclude_message_patterns() -> Vec<String> {
    vec!["http://erp-sys-apigateway:8765/error".to_string()]
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            default_depth: default_depth(),
            max_depth: default_max_depth(),
            exclude_message_patterns: default_exclude_message_patterns(),
        }
    }
}

/// `[ui]` section of `config.toml`.
#[derive(Debug, Clone, Deserialize)]
pub struct UiConfig {
    #[serde(default = "default_show_timestamps")]
    pub show_timestamps: bool,
    #[serde(default = "default_context_pane_width_pct")]
    pub context_pane_width_pct: u16,
    #[serde(default = "default_stats_pane_height_pct")]
    pub stats_pane_height_pct: u16,
}

fn default_show_timestamps() -> bool { true }
fn default_context_pane_width_pct() -> u16 { 25 }
fn default_stats_pane_height_pct() -> u16 { 40 }

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            show_timestamps: default_show_timestamps(),
            context_pane_width_pct: default_context_pane_width_pct(),
            stats_pane_height_pct: default_stats_pane_height_pct(),
        }
    }
}

/// `[export]` section of `config.toml`.
#[derive(Debug, Clone, Deserialize)]
pub struct ExportConfig {
    #[serde(default = "default_export_directory")]
    pub directory: PathBuf,
    #[serde(default = "default_records_file")]
    pub records_file: String,
    #[serde(default = "default_stats_file")]
    pub stats_file: String,
}

fn default_export_directory() -> PathBuf { PathBuf::from(".") }
fn default_records_file() -> String { "extracted_details.csv".to_string() }
fn default_stats_file() -> String { "statistics.csv".to_string() }

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            directory: default_export_directory(),
            records_file: default_records_file(),
            stats_file: default_stats_file(),
        }
    }
}

/// `[keybindings]` section of `config.toml`.
#[derive(Debug, Clone, Deserialize)]
pub struct KeybindingsConfig {
    #[serde(default = "default_toggle_focus")]
    pub toggle_focus: String,
    #[serde(default = "default_filter_focus")]
    pub filter_focus: String,
    #[serde(default = "default_depth_up")]
    pub depth_up: String,
    #[serde(default = "default_depth_down")]
    pub depth_down: String,
    #[serde(default = "default_export_key")]
    pub export: String,
}

fn default_toggle_focus() -> String { "Tab".to_string() }
fn default_filter_focus() -> String { "/".to_string() }
fn default_depth_up() -> String { "]".to_string() }
fn default_depth_down() -> String { "[".to_string() }
fn default_export_key() -> String { "e".to_string() }

impl Default for KeybindingsConfig {
    fn default() -> Self {
        Self {
            toggle_focus: default_toggle_focus(),
            filter_focus: default_filter_focus(),
            depth_up: default_depth_up(),
            depth_down: default_depth_down(),
            export: default_export_key(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::defaults()
    }
}

impl Config {
    /// Load from `~/.config/lat/config.toml`, layered on top of the built-in
    /// defaults. Creates the file with defaults if it does not exist.
    pub fn load() -> anyhow::Result<Self> {
        let path = config_path();

        if !path.exists() {
            if let Some(parent) = path.parent() {
                std::fs::create_dir_all(parent)?;
            }
            std::fs::write(&path, DEFAULT_CONFIG.trim_start())?;
        }

        Self::load_from(&path)
    }

    /// Load an explicit config file layered on top of the built-in defaults.
    /// A missing file is not an error.
    pub fn load_from(path: &Path) -> anyhow::Result<Self> {
        let cfg: Self = config::Config::builder()
            .add_source(config::File::from_str(DEFAULT_CONFIG, config::FileFormat::Toml))
            .add_source(config::File::from(path).required(false))
            .build()?
            .try_deserialize()?;
        Ok(cfg.clamped())
    }

    /// Return the built-in defaults without touching the filesystem.
    pub fn defaults() -> Self {
        config::Config::builder()
            .add_source(config::File::from_str(DEFAULT_CONFIG, config::FileFormat::Toml))
            .build()
            .expect("built-in default config must be valid TOML")
            .try_deserialize()
            .expect("built-in default config must deserialize correctly")
    }

    fn clamped(mut self) -> Self {
        if self.analysis.default_depth > self.analysis.max_depth {
            tracing::warn!(
                default_depth = self.analysis.default_depth,
                max_depth = self.analysis.max_depth,
                "default_depth exceeds max_depth; clamping"
            );
            self.analysis.default_depth = self.analysis.max_depth;
        }
        self
    }
}

// ---------------------------------------------------------------------------
// Path helpers
// ---------------------------------------------------------------------------

fn config_path() -> PathBuf {
    std::env::var("XDG_CONFIG_HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| {
            PathBuf::from(std::env::var("HOME").unwrap_or_else(|_| ".".to_string()))
                .join(".config")
        })
        .join("lat")
        .join("config.toml")
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
