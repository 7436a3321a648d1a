//! Static variant declarations (variants.toml)
//!
//! The declaration file carries everything the resolver needs that is not
//! supplied per invocation: application identity, SDK level pins, the
//! declared ABI list, packaging targets, split flags, and shrink flags.
//! Signing credentials are never declared here; they arrive through the
//! override/environment fallback chain.

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Error types for declaration-file operations
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    IoError(#[from] io::Error),

    #[error("Failed to parse TOML: {0}")]
    ParseError(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    ValidationError(String),
}

/// SDK level pins
///
/// Defaults: minimum level 23 (Android 6.0), compile and target at level 36.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SdkConfig {
    /// Minimum supported SDK level
    #[serde(default = "default_min_sdk")]
    pub min_sdk: u32,

    /// SDK level the application targets
    #[serde(default = "default_target_sdk")]
    pub target_sdk: u32,

    /// SDK level the application compiles against
    #[serde(default = "default_compile_sdk")]
    pub compile_sdk: u32,
}

fn default_min_sdk() -> u32 {
    23
}

fn default_target_sdk() -> u32 {
    36
}

fn default_compile_sdk() -> u32 {
    36
}

impl Default for SdkConfig {
    fn default() -> Self {
        Self {
            min_sdk: default_min_sdk(),
            target_sdk: default_target_sdk(),
            compile_sdk: default_compile_sdk(),
        }
    }
}

/// Which packaging formats the build should emit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TargetsConfig {
    /// Classic (multi-)APK output
    #[serde(default = "default_true")]
    pub apk: bool,

    /// App bundle output
    #[serde(default)]
    pub bundle: bool,
}

fn default_true() -> bool {
    true
}

impl Default for TargetsConfig {
    fn default() -> Self {
        Self {
            apk: true,
            bundle: false,
        }
    }
}

/// Split flags shared by the APK and bundle paths
///
/// The APK path interprets `abi` as "emit one artifact per ABI"; the bundle
/// path interprets it as "embed per-ABI slices in one container".
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SplitsConfig {
    /// Split by ABI
    #[serde(default)]
    pub abi: bool,

    /// Split by screen density
    #[serde(default)]
    pub density: bool,

    /// Split by language
    #[serde(default)]
    pub language: bool,

    /// Also emit a universal catch-all APK; independent of `abi`
    #[serde(default)]
    pub universal: bool,
}

/// Size-optimization flags; applied to release builds only
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShrinkConfig {
    /// Code minification
    #[serde(default)]
    pub minify: bool,

    /// Resource shrinking; most effective when minification also runs
    #[serde(default)]
    pub resources: bool,
}

/// Variant declarations from variants.toml
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VariantConfig {
    /// Application identifier (e.g., "com.example.app")
    pub application_id: String,

    /// Suffix appended to the application id on debug builds
    #[serde(default = "default_debug_suffix")]
    pub debug_suffix: String,

    /// Artifact file stem (e.g., "app" in app-release.apk)
    #[serde(default = "default_base_name")]
    pub base_name: String,

    /// Declared target ABIs
    #[serde(default)]
    pub abis: Vec<String>,

    /// SDK level pins
    #[serde(default)]
    pub sdk: SdkConfig,

    /// Packaging targets
    #[serde(default)]
    pub targets: TargetsConfig,

    /// Split flags
    #[serde(default)]
    pub splits: SplitsConfig,

    /// Shrink flags
    #[serde(default)]
    pub shrink: ShrinkConfig,

    /// Directory relative keystore paths resolve against; parent of the
    /// declaration file when loaded from disk
    #[serde(skip)]
    pub project_dir: PathBuf,

    /// SHA-256 digest of the raw declaration bytes, when loaded from disk
    #[serde(skip)]
    pub source_digest: Option<String>,

    /// Path the declaration was loaded from
    #[serde(skip)]
    pub source_path: Option<PathBuf>,
}

fn default_debug_suffix() -> String {
    ".debug".to_string()
}

fn default_base_name() -> String {
    "app".to_string()
}

impl VariantConfig {
    /// Load and parse declarations from a TOML file
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let bytes = fs::read(path)?;
        let contents = String::from_utf8(bytes.clone())
            .map_err(|e| ConfigError::ValidationError(format!("Invalid UTF-8: {}", e)))?;

        let mut config = Self::from_str(&contents)?;
        config.project_dir = path
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from("."));
        config.source_digest = Some(hex::encode(Sha256::digest(&bytes)));
        config.source_path = Some(path.to_path_buf());
        Ok(config)
    }

    /// Parse declarations from a TOML string
    pub fn from_str(s: &str) -> Result<Self, ConfigError> {
        let mut config: VariantConfig = toml::from_str(s)?;
        config.project_dir = PathBuf::from(".");
        config.validate()?;
        Ok(config)
    }

    /// Validate the declaration structure
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.application_id.is_empty() {
            return Err(ConfigError::ValidationError(
                "'application_id' must not be empty".to_string(),
            ));
        }

        if self.base_name.is_empty() {
            return Err(ConfigError::ValidationError(
                "'base_name' must not be empty".to_string(),
            ));
        }

        if self.sdk.min_sdk > self.sdk.target_sdk {
            return Err(ConfigError::ValidationError(format!(
                "min_sdk {} exceeds target_sdk {}",
                self.sdk.min_sdk, self.sdk.target_sdk
            )));
        }

        if self.sdk.target_sdk > self.sdk.compile_sdk {
            return Err(ConfigError::ValidationError(format!(
                "target_sdk {} exceeds compile_sdk {}",
                self.sdk.target_sdk, self.sdk.compile_sdk
            )));
        }

        Ok(())
    }

    /// True if at least one packaging format is requested
    pub fn has_target(&self) -> bool {
        self.targets.apk || self.targets.bundle
    }
}
