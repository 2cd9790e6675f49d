//! Configuration loading and root folder resolution
//!
//! MoodLens uses a single TOML bootstrap file. Every field has a compiled
//! default, so a missing or partial file never prevents startup:
//!
//! ```toml
//! root_folder = "/home/me/.local/share/moodlens"
//!
//! [logging]
//! level = "info"
//!
//! [fusion.weights]
//! questions = 0.3
//! journaling = 0.4
//! face = 0.2
//! voice = 0.1
//!
//! [patterns]
//! min_support = 3
//!
//! [recommendations]
//! max_recommendations = 5
//! ```
//!
//! # Root Folder Priority
//!
//! 1. Command-line argument (highest priority)
//! 2. `MOODLENS_ROOT_FOLDER` environment variable
//! 3. `MOODLENS_ROOT` environment variable
//! 4. TOML config file `root_folder`
//! 5. OS-dependent compiled default (fallback)

use crate::{Error, Modality, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Primary root folder environment variable
pub const ROOT_FOLDER_ENV: &str = "MOODLENS_ROOT_FOLDER";

/// Alternative root folder environment variable
pub const ROOT_ENV: &str = "MOODLENS_ROOT";

/// File name of the event journal inside the root folder
pub const EVENTS_FILE_NAME: &str = "events.jsonl";

/// Bootstrap configuration loaded from TOML
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TomlConfig {
    /// Root folder for the event journal (optional)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub root_folder: Option<PathBuf>,

    #[serde(default)]
    pub logging: LoggingConfig,

    #[serde(default)]
    pub fusion: FusionSettings,

    #[serde(default)]
    pub patterns: PatternSettings,

    #[serde(default)]
    pub recommendations: RecommendationSettings,
}

/// Logging configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Log file path (optional, logs to stderr if not specified)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file: Option<PathBuf>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            file: None,
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

/// Base weight per modality before renormalization
///
/// Weights do not need to sum to 1.0; the fusion engine renormalizes over the
/// modalities actually present. Each weight must be finite and positive.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ModalityWeights {
    #[serde(default = "default_questions_weight")]
    pub questions: f64,
    #[serde(default = "default_journaling_weight")]
    pub journaling: f64,
    #[serde(default = "default_face_weight")]
    pub face: f64,
    #[serde(default = "default_voice_weight")]
    pub voice: f64,
}

fn default_questions_weight() -> f64 {
    0.3
}

fn default_journaling_weight() -> f64 {
    0.4
}

fn default_face_weight() -> f64 {
    0.2
}

fn default_voice_weight() -> f64 {
    0.1
}

impl Default for ModalityWeights {
    fn default() -> Self {
        Self {
            questions: default_questions_weight(),
            journaling: default_journaling_weight(),
            face: default_face_weight(),
            voice: default_voice_weight(),
        }
    }
}

impl ModalityWeights {
    /// Base weight for a modality
    pub fn get(&self, modality: Modality) -> f64 {
        match modality {
            Modality::Questions => self.questions,
            Modality::Journaling => self.journaling,
            Modality::Face => self.face,
            Modality::Voice => self.voice,
        }
    }

    /// Reject weights that would break renormalization
    pub fn validate(&self) -> Result<()> {
        for modality in Modality::ALL {
            let weight = self.get(modality);
            if !weight.is_finite() || weight <= 0.0 {
                return Err(Error::Config(format!(
                    "Weight for {} must be a positive finite number, got {}",
                    modality, weight
                )));
            }
        }

        let total: f64 = Modality::ALL.iter().map(|m| self.get(*m)).sum();
        if !total.is_finite() {
            return Err(Error::Config(format!(
                "Modality weights must have a finite sum, got {}",
                total
            )));
        }
        Ok(())
    }
}

/// Fusion engine settings
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FusionSettings {
    #[serde(default)]
    pub weights: ModalityWeights,
}

/// Pattern/trigger engine settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PatternSettings {
    /// Minimum number of tagged records before a trigger is correlated
    #[serde(default = "default_min_support")]
    pub min_support: usize,

    /// Offset from UTC used to bucket records into times of day
    #[serde(default)]
    pub utc_offset_minutes: i32,
}

fn default_min_support() -> usize {
    3
}

impl Default for PatternSettings {
    fn default() -> Self {
        Self {
            min_support: default_min_support(),
            utc_offset_minutes: 0,
        }
    }
}

/// Recommendation selector settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecommendationSettings {
    #[serde(default = "default_max_recommendations")]
    pub max_recommendations: usize,

    /// Optional TOML action catalog replacing the built-in one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub catalog_path: Option<PathBuf>,
}

fn default_max_recommendations() -> usize {
    5
}

impl Default for RecommendationSettings {
    fn default() -> Self {
        Self {
            max_recommendations: default_max_recommendations(),
            catalog_path: None,
        }
    }
}

/// OS-dependent compiled defaults
#[derive(Debug, Clone)]
pub struct CompiledDefaults {
    pub root_folder: PathBuf,
    pub log_level: String,
    pub log_file: Option<PathBuf>,
}

impl CompiledDefaults {
    pub fn for_current_platform() -> Self {
        Self {
            root_folder: get_default_root_folder(),
            log_level: default_log_level(),
            log_file: None,
        }
    }
}

/// Get OS-dependent default root folder path
pub fn get_default_root_folder() -> PathBuf {
    if cfg!(target_os = "linux") {
        // ~/.local/share/moodlens
        dirs::data_local_dir()
            .map(|d| d.join("moodlens"))
            .unwrap_or_else(|| PathBuf::from("/var/lib/moodlens"))
    } else if cfg!(target_os = "macos") {
        // ~/Library/Application Support/moodlens
        dirs::data_dir()
            .map(|d| d.join("moodlens"))
            .unwrap_or_else(|| PathBuf::from("/Library/Application Support/moodlens"))
    } else if cfg!(target_os = "windows") {
        // %LOCALAPPDATA%\moodlens
        dirs::data_local_dir()
            .map(|d| d.join("moodlens"))
            .unwrap_or_else(|| PathBuf::from("C:\\ProgramData\\moodlens"))
    } else {
        PathBuf::from("./moodlens_data")
    }
}

/// Locate the default configuration file for the platform
///
/// Linux checks `~/.config/moodlens/config.toml` then `/etc/moodlens/config.toml`.
pub fn default_config_path() -> Option<PathBuf> {
    let user_config = dirs::config_dir().map(|d| d.join("moodlens").join("config.toml"));

    if let Some(path) = user_config.as_ref().filter(|p| p.exists()) {
        return Some(path.clone());
    }

    if cfg!(target_os = "linux") {
        let system_config = PathBuf::from("/etc/moodlens/config.toml");
        if system_config.exists() {
            return Some(system_config);
        }
    }

    None
}

/// Read and parse a TOML config file
pub fn load_toml_config(path: &Path) -> Result<TomlConfig> {
    let content = std::fs::read_to_string(path)
        .map_err(|e| Error::Config(format!("Failed to read config file {:?}: {}", path, e)))?;
    toml::from_str(&content)
        .map_err(|e| Error::Config(format!("Failed to parse TOML {:?}: {}", path, e)))
}

/// Where a loaded configuration came from
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigSource {
    /// Parsed from this file
    File(PathBuf),

    /// Compiled defaults, with the reason no file was used
    Defaults(String),
}

impl ConfigSource {
    /// Report the outcome; call once logging is initialized
    pub fn log(&self) {
        match self {
            ConfigSource::File(path) => info!("Loaded configuration from {:?}", path),
            ConfigSource::Defaults(reason) => warn!("{}; using compiled defaults", reason),
        }
    }
}

impl TomlConfig {
    /// Load configuration, degrading gracefully to compiled defaults
    ///
    /// An explicitly requested file must exist and parse. When no file is
    /// requested the platform default location is tried; if nothing is found
    /// a warning is logged and defaults are used.
    pub fn load_or_default(explicit: Option<&Path>) -> Result<Self> {
        let (config, source) = Self::load_with_source(explicit)?;
        source.log();
        Ok(config)
    }

    /// Same as [`TomlConfig::load_or_default`] without logging
    ///
    /// Binaries load configuration before their subscriber exists; they log
    /// the returned [`ConfigSource`] after initializing tracing.
    pub fn load_with_source(explicit: Option<&Path>) -> Result<(Self, ConfigSource)> {
        if let Some(path) = explicit {
            let config = load_toml_config(path)?;
            return Ok((config, ConfigSource::File(path.to_path_buf())));
        }

        match default_config_path() {
            Some(path) => match load_toml_config(&path) {
                Ok(config) => Ok((config, ConfigSource::File(path))),
                Err(e) => Ok((Self::default(), ConfigSource::Defaults(e.to_string()))),
            },
            None => Ok((
                Self::default(),
                ConfigSource::Defaults("No config file found".to_string()),
            )),
        }
    }
}

/// Write a TOML config file atomically (temp file + rename)
pub fn write_toml_config(config: &TomlConfig, target: &Path) -> Result<()> {
    let content = toml::to_string_pretty(config)
        .map_err(|e| Error::Config(format!("Failed to serialize config: {}", e)))?;

    let mut temp_name = target.as_os_str().to_owned();
    temp_name.push(".tmp");
    let temp_path = PathBuf::from(temp_name);

    std::fs::write(&temp_path, content)?;
    std::fs::rename(&temp_path, target)?;

    debug!("Wrote configuration to {:?}", target);
    Ok(())
}

/// Resolves the root folder following the documented priority order
#[derive(Debug, Clone)]
pub struct RootFolderResolver {
    module_name: String,
    cli_override: Option<PathBuf>,
    toml_root: Option<PathBuf>,
}

impl RootFolderResolver {
    pub fn new(module_name: &str) -> Self {
        Self {
            module_name: module_name.to_string(),
            cli_override: None,
            toml_root: None,
        }
    }

    pub fn with_cli_override(mut self, path: Option<PathBuf>) -> Self {
        self.cli_override = path;
        self
    }

    pub fn with_toml_root(mut self, path: Option<PathBuf>) -> Self {
        self.toml_root = path;
        self
    }

    pub fn resolve(&self) -> PathBuf {
        if let Some(path) = &self.cli_override {
            debug!("[{}] Root folder from command line: {:?}", self.module_name, path);
            return path.clone();
        }

        for var in [ROOT_FOLDER_ENV, ROOT_ENV] {
            if let Ok(path) = std::env::var(var) {
                if !path.is_empty() {
                    debug!("[{}] Root folder from {}: {}", self.module_name, var, path);
                    return PathBuf::from(path);
                }
            }
        }

        if let Some(path) = &self.toml_root {
            debug!("[{}] Root folder from config file: {:?}", self.module_name, path);
            return path.clone();
        }

        CompiledDefaults::for_current_platform().root_folder
    }
}

/// Creates the root folder and derives file paths within it
#[derive(Debug, Clone)]
pub struct RootFolderInitializer {
    root_folder: PathBuf,
}

impl RootFolderInitializer {
    pub fn new(root_folder: PathBuf) -> Self {
        Self { root_folder }
    }

    pub fn root_folder(&self) -> &Path {
        &self.root_folder
    }

    pub fn ensure_directory_exists(&self) -> Result<()> {
        if !self.root_folder.exists() {
            info!("Creating root folder {:?}", self.root_folder);
            std::fs::create_dir_all(&self.root_folder)?;
        }
        Ok(())
    }

    /// Path of the append-only event journal
    pub fn events_path(&self) -> PathBuf {
        self.root_folder.join(EVENTS_FILE_NAME)
    }
}
