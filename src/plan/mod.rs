//! Variant resolution - from declarations to a validated packaging plan
//!
//! The resolver holds no state across invocations: every call composes a
//! fresh plan from the declarations, the supplied overrides, and an
//! environment snapshot, then validates it. A rejected plan is never
//! repaired; the caller corrects the input and resubmits.

mod errors;

pub use errors::{ExitCode, ValidationError};

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::abi::AbiSet;
use crate::config::VariantConfig;
use crate::signing::{resolve_signing, EnvSnapshot, SigningIdentity, SigningOverrides};

/// Build profile, selected per invocation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BuildType {
    Debug,
    Release,
}

impl BuildType {
    /// Lowercase name as used in artifact file names
    pub fn as_str(&self) -> &'static str {
        match self {
            BuildType::Debug => "debug",
            BuildType::Release => "release",
        }
    }
}

impl FromStr for BuildType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "debug" => Ok(BuildType::Debug),
            "release" => Ok(BuildType::Release),
            other => Err(format!("unknown build type '{}'; expected debug or release", other)),
        }
    }
}

impl fmt::Display for BuildType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Non-fatal findings attached to an otherwise valid plan
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PlanWarning {
    /// Resource shrinking without code minification; valid but suboptimal,
    /// since resource-usage analysis benefits from minification having run
    ShrinkWithoutMinify,
}

impl PlanWarning {
    /// Human-readable description
    pub fn description(&self) -> &'static str {
        match self {
            PlanWarning::ShrinkWithoutMinify => {
                "shrink.resources is enabled without shrink.minify; resource \
                 shrinking is most effective when minification has already run"
            }
        }
    }
}

/// The concrete artifact-generation plan for one build invocation
///
/// Constructed once, never mutated. Two plans built from identical inputs
/// compare field-wise equal.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PackagingPlan {
    /// Build profile
    pub build_type: BuildType,

    /// Effective application id; debug builds carry the declared suffix
    pub application_id: String,

    /// Artifact file stem
    pub base_name: String,

    /// Resolved signing identity
    pub signing: SigningIdentity,

    /// Target ABIs
    pub abis: AbiSet,

    /// Emit one APK per ABI on the classic path
    pub split_by_abi: bool,

    /// Split by screen density
    pub split_by_density: bool,

    /// Split by language
    pub split_by_language: bool,

    /// Remove unused resources
    pub shrink_resources: bool,

    /// Minify code
    pub minify_code: bool,

    /// Also emit a universal catch-all APK; independent of split_by_abi
    pub universal_artifact_requested: bool,

    /// Classic APK output requested
    pub emit_apks: bool,

    /// Bundle output requested
    pub emit_bundle: bool,

    /// Non-fatal findings
    pub warnings: Vec<PlanWarning>,
}

impl PackagingPlan {
    /// Validate the plan, stopping at the first failure
    ///
    /// Checks in order: non-empty ABI set, usable release keystore, at least
    /// one packaging format. All-or-nothing; no partial plan is ever handed
    /// downstream.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.abis.is_empty() {
            return Err(ValidationError::EmptyAbiSet);
        }

        if self.build_type == BuildType::Release {
            if self.signing.store_file.as_os_str().is_empty() {
                return Err(ValidationError::MissingCredential(
                    "no keystore path resolved".to_string(),
                ));
            }
            if !self.signing.store_file.exists() {
                return Err(ValidationError::MissingCredential(format!(
                    "keystore not found: {}",
                    self.signing.store_file.display()
                )));
            }
        }

        if !self.emit_apks && !self.emit_bundle {
            return Err(ValidationError::EmptyTarget);
        }

        Ok(())
    }
}

/// Compose a plan from resolved inputs; pure, no validation, no side effects
///
/// Shrink and minify policy follows the build type: debug builds force both
/// off, release builds take them from the declaration.
pub fn build_plan(
    build_type: BuildType,
    abis: AbiSet,
    signing: SigningIdentity,
    config: &VariantConfig,
) -> PackagingPlan {
    let (minify_code, shrink_resources) = match build_type {
        BuildType::Debug => (false, false),
        BuildType::Release => (config.shrink.minify, config.shrink.resources),
    };

    let application_id = match build_type {
        BuildType::Debug => format!("{}{}", config.application_id, config.debug_suffix),
        BuildType::Release => config.application_id.clone(),
    };

    let mut warnings = Vec::new();
    if shrink_resources && !minify_code {
        warnings.push(PlanWarning::ShrinkWithoutMinify);
    }

    PackagingPlan {
        build_type,
        application_id,
        base_name: config.base_name.clone(),
        signing,
        abis,
        split_by_abi: config.splits.abi,
        split_by_density: config.splits.density,
        split_by_language: config.splits.language,
        shrink_resources,
        minify_code,
        universal_artifact_requested: config.splits.universal,
        emit_apks: config.targets.apk,
        emit_bundle: config.targets.bundle,
        warnings,
    }
}

/// The variant resolver
///
/// Owns the static declarations and turns a requested build type plus
/// per-invocation inputs into a validated plan.
#[derive(Debug, Clone)]
pub struct Resolver {
    config: VariantConfig,
}

impl Resolver {
    /// Create a resolver over the given declarations
    pub fn new(config: VariantConfig) -> Self {
        Self { config }
    }

    /// Access the declarations
    pub fn config(&self) -> &VariantConfig {
        &self.config
    }

    /// Compose a plan without validating it
    ///
    /// Fails only on ABI resolution; used by explain to inspect plans that
    /// would be rejected.
    pub fn compose(
        &self,
        build_type: BuildType,
        overrides: &SigningOverrides,
        env: &EnvSnapshot,
    ) -> Result<PackagingPlan, ValidationError> {
        let abis = AbiSet::resolve(&self.config.abis)?;
        let signing = resolve_signing(build_type, overrides, env, &self.config.project_dir);
        Ok(build_plan(build_type, abis, signing, &self.config))
    }

    /// Resolve and validate a plan for one build invocation
    pub fn resolve(
        &self,
        build_type: BuildType,
        overrides: &SigningOverrides,
        env: &EnvSnapshot,
    ) -> Result<PackagingPlan, ValidationError> {
        let plan = self.compose(build_type, overrides, env)?;
        plan.validate()?;
        Ok(plan)
    }
}
