//! Resolution output surfaces
//!
//! A validated plan is rendered two ways: a `ResolutionReport` (the full
//! plan, its provenance, and the concrete artifact list, for the downstream
//! artifact generator) and an `ExplainOutput` (the decision plus how each
//! signing attribute was resolved, for diagnostics).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fs;
use std::io;
use std::path::Path;

use crate::abi::Abi;
use crate::plan::{BuildType, PackagingPlan, ValidationError};
use crate::signing::SigningOrigins;

/// Schema version for resolution reports
pub const SCHEMA_VERSION: u32 = 1;

/// Schema identifier
pub const SCHEMA_ID: &str = "apkplan/resolution@1";

/// Kind of output artifact
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ArtifactKind {
    /// Per-ABI or single APK
    Apk,
    /// Universal catch-all APK
    UniversalApk,
    /// App bundle embedding all ABI slices
    Bundle,
}

/// One concrete output of a validated plan
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Artifact {
    /// Kind of artifact
    pub kind: ArtifactKind,

    /// Output file name, Android naming conventions
    pub file_name: String,

    /// The ABI this artifact is restricted to, if any
    #[serde(skip_serializing_if = "Option::is_none")]
    pub abi: Option<Abi>,
}

/// Enumerate the artifacts a validated plan yields
///
/// The ABI set is interpreted differently per path: the classic split path
/// emits one APK per ABI, the bundle path embeds all slices in one container.
pub fn enumerate_artifacts(plan: &PackagingPlan) -> Vec<Artifact> {
    let mut artifacts = Vec::new();
    let build = plan.build_type.as_str();

    if plan.emit_apks {
        if plan.split_by_abi {
            for abi in plan.abis.iter() {
                artifacts.push(Artifact {
                    kind: ArtifactKind::Apk,
                    file_name: format!("{}-{}-{}.apk", plan.base_name, abi, build),
                    abi: Some(abi),
                });
            }
            if plan.universal_artifact_requested {
                artifacts.push(Artifact {
                    kind: ArtifactKind::UniversalApk,
                    file_name: format!("{}-universal-{}.apk", plan.base_name, build),
                    abi: None,
                });
            }
        } else {
            artifacts.push(Artifact {
                kind: ArtifactKind::Apk,
                file_name: format!("{}-{}.apk", plan.base_name, build),
                abi: None,
            });
        }
    }

    if plan.emit_bundle {
        artifacts.push(Artifact {
            kind: ArtifactKind::Bundle,
            file_name: format!("{}-{}.aab", plan.base_name, build),
            abi: None,
        });
    }

    artifacts
}

/// Full resolution report handed to the artifact-generation collaborator
#[derive(Debug, Clone, Serialize)]
pub struct ResolutionReport {
    /// Schema version
    pub schema_version: u32,

    /// Schema identifier
    pub schema_id: String,

    /// When this report was produced
    pub created_at: DateTime<Utc>,

    /// Path of the declaration file, when loaded from disk
    #[serde(skip_serializing_if = "Option::is_none")]
    pub config_path: Option<String>,

    /// SHA-256 digest of the raw declaration bytes
    #[serde(skip_serializing_if = "Option::is_none")]
    pub config_digest: Option<String>,

    /// The validated plan
    pub plan: PackagingPlan,

    /// Concrete outputs the plan yields
    pub artifacts: Vec<Artifact>,
}

impl ResolutionReport {
    /// Build a report for a validated plan
    pub fn new(plan: PackagingPlan, config_path: Option<String>, config_digest: Option<String>) -> Self {
        let artifacts = enumerate_artifacts(&plan);
        Self {
            schema_version: SCHEMA_VERSION,
            schema_id: SCHEMA_ID.to_string(),
            created_at: Utc::now(),
            config_path,
            config_digest,
            plan,
            artifacts,
        }
    }

    /// Serialize to pretty JSON
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Write the report to a file
    pub fn write_to_file(&self, path: &Path) -> io::Result<()> {
        let json = self.to_json().map_err(|e| {
            io::Error::new(
                io::ErrorKind::InvalidData,
                format!("JSON serialization failed: {}", e),
            )
        })?;
        fs::write(path, json)
    }

    /// Format as human-readable text
    pub fn to_human(&self) -> String {
        let mut lines = Vec::new();
        let plan = &self.plan;

        lines.push(format!("Variant: {}", plan.build_type));
        lines.push(format!("Application id: {}", plan.application_id));
        lines.push(format!(
            "ABIs: {}",
            plan.abis.iter().map(|a| a.as_str()).collect::<Vec<_>>().join(", ")
        ));
        lines.push(format!(
            "Signing: {} ({})",
            plan.signing.key_alias,
            plan.signing.store_file.display()
        ));
        lines.push(format!(
            "Splits: abi={} density={} language={} universal={}",
            plan.split_by_abi,
            plan.split_by_density,
            plan.split_by_language,
            plan.universal_artifact_requested
        ));
        lines.push(format!(
            "Shrink: minify={} resources={}",
            plan.minify_code, plan.shrink_resources
        ));

        lines.push(String::new());
        lines.push(format!("Artifacts ({} total):", self.artifacts.len()));
        for artifact in &self.artifacts {
            lines.push(format!("  {}", artifact.file_name));
        }

        if !plan.warnings.is_empty() {
            lines.push(String::new());
            lines.push("Warnings:".to_string());
            for warning in &plan.warnings {
                lines.push(format!("  - {}", warning.description()));
            }
        }

        lines.join("\n")
    }
}

/// Explanation of a resolution decision
#[derive(Debug, Clone, Serialize)]
pub struct ExplainOutput {
    /// Requested build type
    pub build_type: BuildType,

    /// Whether the plan validated
    pub valid: bool,

    /// Machine-readable rejection code, when invalid
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rejection_code: Option<String>,

    /// Rejection detail, when invalid
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rejection_reason: Option<String>,

    /// Where each signing attribute was resolved from, when a plan composed
    #[serde(skip_serializing_if = "Option::is_none")]
    pub signing_origins: Option<SigningOrigins>,

    /// Resolved keystore path, when a plan composed
    #[serde(skip_serializing_if = "Option::is_none")]
    pub store_file: Option<String>,

    /// Artifacts the plan would yield, when valid
    pub artifacts: Vec<Artifact>,

    /// Human-readable explanation
    pub explanation: String,
}

impl ExplainOutput {
    /// Explain the outcome of composing and validating a plan
    pub fn from_outcome(
        build_type: BuildType,
        outcome: &Result<PackagingPlan, ValidationError>,
    ) -> Self {
        match outcome {
            Ok(plan) => {
                let verdict = plan.validate();
                let artifacts = if verdict.is_ok() {
                    enumerate_artifacts(plan)
                } else {
                    Vec::new()
                };
                let explanation = Self::generate_explanation(build_type, Some(plan), &verdict);
                Self {
                    build_type,
                    valid: verdict.is_ok(),
                    rejection_code: verdict.as_ref().err().map(|e| e.code().to_string()),
                    rejection_reason: verdict.as_ref().err().map(ToString::to_string),
                    signing_origins: Some(plan.signing.origins),
                    store_file: Some(plan.signing.store_file.display().to_string()),
                    artifacts,
                    explanation,
                }
            }
            Err(err) => {
                let verdict = Err(err.clone());
                let explanation = Self::generate_explanation(build_type, None, &verdict);
                Self {
                    build_type,
                    valid: false,
                    rejection_code: Some(err.code().to_string()),
                    rejection_reason: Some(err.to_string()),
                    signing_origins: None,
                    store_file: None,
                    artifacts: Vec::new(),
                    explanation,
                }
            }
        }
    }

    fn generate_explanation(
        build_type: BuildType,
        plan: Option<&PackagingPlan>,
        verdict: &Result<(), ValidationError>,
    ) -> String {
        let mut lines = Vec::new();
        lines.push(format!("Build type: {}", build_type));

        if let Some(plan) = plan {
            let o = &plan.signing.origins;
            lines.push("Signing resolution:".to_string());
            lines.push(format!("  key_alias: {:?}", o.key_alias));
            lines.push(format!("  key_password: {:?}", o.key_password));
            lines.push(format!(
                "  store_file: {:?} ({})",
                o.store_file,
                plan.signing.store_file.display()
            ));
            lines.push(format!("  store_password: {:?}", o.store_password));
        }

        lines.push(String::new());
        match verdict {
            Ok(()) => lines.push("Decision: VALID".to_string()),
            Err(err) => {
                lines.push("Decision: REJECTED".to_string());
                lines.push(format!("Reason: [{}] {}", err.code(), err));
            }
        }

        lines.join("\n")
    }

    /// Serialize to pretty JSON
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Format as human-readable text
    pub fn to_human(&self) -> String {
        let mut output = self.explanation.clone();
        if self.valid && !self.artifacts.is_empty() {
            output.push_str("\n\nArtifacts:\n");
            for artifact in &self.artifacts {
                output.push_str(&format!("  {}\n", artifact.file_name));
            }
        }
        output
    }
}
