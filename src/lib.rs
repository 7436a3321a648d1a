//! apkplan - Android build-variant resolver
//!
//! This crate resolves a requested build type plus static variant
//! declarations into a deterministic, validated packaging plan: which ABIs
//! to include, which signing identity applies, and which split/shrink flags
//! shape the output artifacts. Compilation, signing, and packaging belong to
//! external collaborators; apkplan only decides what they should produce.

pub mod abi;
pub mod config;
pub mod plan;
pub mod report;
pub mod signing;

pub use abi::{Abi, AbiSet, ABI_UNIVERSE};
pub use config::{ConfigError, VariantConfig};
pub use plan::{build_plan, BuildType, ExitCode, PackagingPlan, PlanWarning, Resolver, ValidationError};
pub use report::{enumerate_artifacts, Artifact, ArtifactKind, ExplainOutput, ResolutionReport};
pub use signing::{resolve_signing, AttributeOrigin, EnvSnapshot, Secret, SigningIdentity, SigningOverrides};
