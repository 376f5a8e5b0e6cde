//! Configuration module.
//!
//! Handles loading, validating, and merging `config.toml`. The file lives in
//! the base directory; every key is optional and falls back to the stock
//! defaults below.
//!
//! ## Configuration Options
//!
//! ```toml
//! # All options are optional - defaults shown below
//!
//! [layout]                       # Paths relative to the base directory
//! dump = "ADump"
//! archive = "ADump/Original Lot Sticker Images"
//! final_output = "ADump/Final Lot Sticker Images"
//! temp = "ADump/Temp Processing"
//! assets = "zBin"
//!
//! [naming]
//! lot_prefix = "Lot"
//! auction_prefix = "Auction"
//! width = 3                      # Zero-padding width
//! extension = "jpg"
//!
//! [convert]
//! landscape = [800, 600]         # Output size when width >= height
//! portrait = [600, 800]          # Output size when height > width
//! quality = 90                   # JPEG quality (1-100)
//!
//! [files]
//! extensions = ["jpg", "jpeg", "png"]
//!
//! [log]
//! enabled = true
//! file = "lot-builder.log"       # Relative to the base directory
//! ```
//!
//! Config files are sparse: override just the values you want. Unknown keys
//! are rejected to catch typos early.

use crate::imaging::{ConvertConfig, Quality};
use crate::naming::NamingTemplate;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use thiserror::Error;

/// Name of the config file inside the base directory.
pub const CONFIG_FILENAME: &str = "config.toml";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Config validation error: {0}")]
    Validation(String),
}

/// Tool configuration loaded from `config.toml`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LotConfig {
    /// Directory names, relative to the base directory.
    pub layout: LayoutConfig,
    /// Canonical filename templates.
    pub naming: NamingConfig,
    /// Fixed output sizes and quality for converted images.
    pub convert: ConvertSection,
    /// Which files count as images.
    pub files: FilesConfig,
    /// Persistent status log.
    pub log: LogConfig,
}

impl LotConfig {
    /// Validate config values are within acceptable ranges.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.naming.width == 0 {
            return Err(ConfigError::Validation(
                "naming.width must be at least 1".into(),
            ));
        }
        if self.naming.lot_prefix.is_empty() || self.naming.auction_prefix.is_empty() {
            return Err(ConfigError::Validation(
                "naming prefixes must not be empty".into(),
            ));
        }
        if self.naming.lot_prefix == self.naming.auction_prefix {
            return Err(ConfigError::Validation(
                "naming.lot_prefix and naming.auction_prefix must differ".into(),
            ));
        }
        if self.naming.extension.trim_start_matches('.').is_empty() {
            return Err(ConfigError::Validation(
                "naming.extension must not be empty".into(),
            ));
        }
        if !(1..=100).contains(&self.convert.quality) {
            return Err(ConfigError::Validation(
                "convert.quality must be 1-100".into(),
            ));
        }
        if self.convert.landscape.contains(&0) || self.convert.portrait.contains(&0) {
            return Err(ConfigError::Validation(
                "convert sizes must be non-zero".into(),
            ));
        }
        if crate::scan::normalize_extensions(&self.files.extensions).is_empty() {
            return Err(ConfigError::Validation(
                "files.extensions must not be empty".into(),
            ));
        }
        Ok(())
    }

    /// `Lot###.jpg` with the configured prefix, width, and extension.
    pub fn lot_template(&self) -> NamingTemplate {
        NamingTemplate::new(
            &self.naming.lot_prefix,
            self.naming.width,
            &self.naming.extension,
        )
    }

    /// `Auction###.jpg` with the configured prefix, width, and extension.
    pub fn auction_template(&self) -> NamingTemplate {
        NamingTemplate::new(
            &self.naming.auction_prefix,
            self.naming.width,
            &self.naming.extension,
        )
    }

    pub fn convert_config(&self) -> ConvertConfig {
        let [lw, lh] = self.convert.landscape;
        let [pw, ph] = self.convert.portrait;
        ConvertConfig {
            landscape: (lw, lh),
            portrait: (pw, ph),
            quality: Quality::new(self.convert.quality),
        }
    }

    /// Accepted extensions, normalized (lowercase, no dot).
    pub fn extensions(&self) -> Vec<String> {
        crate::scan::normalize_extensions(&self.files.extensions)
    }
}

/// Directory layout, relative to the base directory.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LayoutConfig {
    /// Where new images are dropped and canonical files are produced.
    pub dump: String,
    /// Originals, moved here after conversion.
    pub archive: String,
    /// Finalized lot images.
    pub final_output: String,
    /// Scratch space; stale canonical files are purged into it.
    pub temp: String,
    /// Optional decorative resources (logos, backgrounds).
    pub assets: String,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            dump: "ADump".to_string(),
            archive: "ADump/Original Lot Sticker Images".to_string(),
            final_output: "ADump/Final Lot Sticker Images".to_string(),
            temp: "ADump/Temp Processing".to_string(),
            assets: "zBin".to_string(),
        }
    }
}

/// Canonical naming settings shared by the lot and auction templates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct NamingConfig {
    pub lot_prefix: String,
    pub auction_prefix: String,
    /// Zero-padding width of the index.
    pub width: usize,
    /// Extension of canonical files, without the dot.
    pub extension: String,
}

impl Default for NamingConfig {
    fn default() -> Self {
        Self {
            lot_prefix: "Lot".to_string(),
            auction_prefix: "Auction".to_string(),
            width: 3,
            extension: "jpg".to_string(),
        }
    }
}

/// Conversion settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ConvertSection {
    /// `[width, height]` for sources with width >= height.
    pub landscape: [u32; 2],
    /// `[width, height]` for sources with height > width.
    pub portrait: [u32; 2],
    /// JPEG encoding quality (1 = worst, 100 = best).
    pub quality: u32,
}

impl Default for ConvertSection {
    fn default() -> Self {
        Self {
            landscape: [800, 600],
            portrait: [600, 800],
            quality: 90,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FilesConfig {
    /// Accepted image extensions, matched case-insensitively.
    pub extensions: Vec<String>,
}

impl Default for FilesConfig {
    fn default() -> Self {
        Self {
            extensions: crate::scan::DEFAULT_EXTENSIONS
                .iter()
                .map(|e| e.to_string())
                .collect(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LogConfig {
    /// Append status lines to `file`.
    pub enabled: bool,
    /// Log file, relative to the base directory.
    pub file: String,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            file: "lot-builder.log".to_string(),
        }
    }
}

// =============================================================================
// Config loading, merging, and validation
// =============================================================================

/// Returns the stock default config as a `toml::Value::Table`.
///
/// This is the canonical representation of all default values, used as the
/// base layer for merging user overrides on top.
pub fn stock_defaults_value() -> Result<toml::Value, ConfigError> {
    toml::Value::try_from(LotConfig::default())
        .map_err(|e| ConfigError::Validation(format!("default config must serialize: {e}")))
}

/// Recursively merge `overlay` on top of `base`.
///
/// - Tables are merged key-by-key (overlay keys override base keys).
/// - Non-table values in overlay replace base values entirely.
/// - Keys in base that are not in overlay are preserved.
pub fn merge_toml(base: toml::Value, overlay: toml::Value) -> toml::Value {
    match (base, overlay) {
        (toml::Value::Table(mut base_table), toml::Value::Table(overlay_table)) => {
            for (key, overlay_val) in overlay_table {
                let merged = match base_table.remove(&key) {
                    Some(base_val) => merge_toml(base_val, overlay_val),
                    None => overlay_val,
                };
                base_table.insert(key, merged);
            }
            toml::Value::Table(base_table)
        }
        (_, overlay) => overlay,
    }
}

/// Load `config.toml` from a directory as a raw TOML value.
///
/// Returns `Ok(None)` if no `config.toml` exists in the directory.
/// Returns `Err` if the file exists but contains invalid TOML.
pub fn load_raw_config(dir: &Path) -> Result<Option<toml::Value>, ConfigError> {
    let config_path = dir.join(CONFIG_FILENAME);
    if !config_path.exists() {
        return Ok(None);
    }
    let content = fs::read_to_string(&config_path)?;
    let value: toml::Value = toml::from_str(&content)?;
    Ok(Some(value))
}

/// Merge an optional overlay onto a base value, then deserialize and validate.
pub fn resolve_config(
    base: toml::Value,
    overlay: Option<toml::Value>,
) -> Result<LotConfig, ConfigError> {
    let merged = match overlay {
        Some(ov) => merge_toml(base, ov),
        None => base,
    };
    let config: LotConfig = merged.try_into()?;
    config.validate()?;
    Ok(config)
}

/// Load config from `config.toml` in the base directory.
///
/// Merges user values on top of stock defaults, rejects unknown keys,
/// and validates the result.
pub fn load_config(base: &Path) -> Result<LotConfig, ConfigError> {
    let defaults = stock_defaults_value()?;
    let overlay = load_raw_config(base)?;
    resolve_config(defaults, overlay)
}

/// Returns a fully-commented stock `config.toml` with all keys and explanations.
///
/// Used by the `gen-config` CLI command.
pub fn stock_config_toml() -> &'static str {
    r##"# Lot Builder Configuration
# =========================
# All settings are optional. Remove or comment out any you don't need.
# Values shown below are the defaults. Place this file in the base
# directory (the one passed with --base).
#
# Unknown keys will cause an error.

# ---------------------------------------------------------------------------
# Directory layout (relative to the base directory, created on startup)
# ---------------------------------------------------------------------------
[layout]
# New lot sticker images and auction photos are dropped here.
dump = "ADump"
# Originals are moved here after conversion.
archive = "ADump/Original Lot Sticker Images"
# Finalized lot images are moved here.
final_output = "ADump/Final Lot Sticker Images"
# Scratch space. Stale canonical files are moved here before a conversion.
temp = "ADump/Temp Processing"
# Optional decorative resources (logo.png, logo2.png).
assets = "zBin"

# ---------------------------------------------------------------------------
# Canonical names: <prefix><zero-padded index>.<extension>
# ---------------------------------------------------------------------------
[naming]
lot_prefix = "Lot"
auction_prefix = "Auction"
width = 3
extension = "jpg"

# ---------------------------------------------------------------------------
# Conversion
# ---------------------------------------------------------------------------
[convert]
# [width, height] for images at least as wide as they are tall.
landscape = [800, 600]
# [width, height] for images taller than they are wide.
portrait = [600, 800]
# JPEG quality (1 = worst, 100 = best).
quality = 90

# ---------------------------------------------------------------------------
# Accepted image files (case-insensitive extensions)
# ---------------------------------------------------------------------------
[files]
extensions = ["jpg", "jpeg", "png"]

# ---------------------------------------------------------------------------
# Status log
# ---------------------------------------------------------------------------
[log]
enabled = true
file = "lot-builder.log"
"##
}
