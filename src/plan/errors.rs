//! Plan validation errors and stable exit codes

use serde::{Deserialize, Serialize};

/// Deterministic validation failures
///
/// None of these are transient; a rejected plan must be corrected by the
/// caller and resubmitted.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("ABI set is empty; at least one target ABI must be declared")]
    EmptyAbiSet,

    #[error("ABI '{0}' is outside the supported universe")]
    UnsupportedAbi(String),

    #[error("Release build lacks a usable signing identity: {0}")]
    MissingCredential(String),

    #[error("No packaging format requested; enable the apk or bundle target")]
    EmptyTarget,
}

impl ValidationError {
    /// Machine-readable reason code
    pub fn code(&self) -> &'static str {
        match self {
            ValidationError::EmptyAbiSet => "EMPTY_ABI_SET",
            ValidationError::UnsupportedAbi(_) => "UNSUPPORTED_ABI",
            ValidationError::MissingCredential(_) => "MISSING_CREDENTIAL",
            ValidationError::EmptyTarget => "EMPTY_TARGET",
        }
    }

    /// Stable process exit code for this failure
    pub fn exit_code(&self) -> ExitCode {
        match self {
            ValidationError::EmptyAbiSet => ExitCode::EmptyAbiSet,
            ValidationError::UnsupportedAbi(_) => ExitCode::UnsupportedAbi,
            ValidationError::MissingCredential(_) => ExitCode::MissingCredential,
            ValidationError::EmptyTarget => ExitCode::EmptyTarget,
        }
    }
}

/// Stable exit codes surfaced by the CLI
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[repr(i32)]
pub enum ExitCode {
    /// Plan resolved and validated
    Success = 0,
    /// Declaration file missing, unreadable, or invalid
    Config = 10,
    /// Declared ABI outside the supported universe
    UnsupportedAbi = 20,
    /// Empty ABI declaration
    EmptyAbiSet = 21,
    /// Release build without a usable signing identity
    MissingCredential = 30,
    /// No packaging format requested
    EmptyTarget = 40,
}

impl ExitCode {
    /// Get the integer value of the exit code
    pub fn as_i32(&self) -> i32 {
        *self as i32
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reason_codes() {
        assert_eq!(ValidationError::EmptyAbiSet.code(), "EMPTY_ABI_SET");
        assert_eq!(
            ValidationError::UnsupportedAbi("mips".to_string()).code(),
            "UNSUPPORTED_ABI"
        );
        assert_eq!(
            ValidationError::MissingCredential("x".to_string()).code(),
            "MISSING_CREDENTIAL"
        );
        assert_eq!(ValidationError::EmptyTarget.code(), "EMPTY_TARGET");
    }

    #[test]
    fn test_exit_codes_are_stable() {
        assert_eq!(ExitCode::Success.as_i32(), 0);
        assert_eq!(ExitCode::Config.as_i32(), 10);
        assert_eq!(ValidationError::UnsupportedAbi("mips".to_string()).exit_code().as_i32(), 20);
        assert_eq!(ValidationError::EmptyAbiSet.exit_code().as_i32(), 21);
        assert_eq!(
            ValidationError::MissingCredential("x".to_string()).exit_code().as_i32(),
            30
        );
        assert_eq!(ValidationError::EmptyTarget.exit_code().as_i32(), 40);
    }
}
