//! Signing identity resolution
//!
//! Each signing attribute resolves through an ordered fallback chain:
//! explicit override → environment variable → literal default. Debug builds
//! bypass the chain entirely and always use the fixed development identity,
//! even when overrides are supplied.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::path::{Path, PathBuf};

use crate::plan::BuildType;

/// Environment variable names consulted by the fallback chain
pub const ENV_KEY_ALIAS: &str = "KEY_ALIAS";
pub const ENV_KEY_PASSWORD: &str = "KEY_PASSWORD";
pub const ENV_STORE_FILE: &str = "STORE_FILE";
pub const ENV_STORE_PASSWORD: &str = "STORE_PASSWORD";

/// Literal default for the keystore path; the only attribute with one
pub const DEFAULT_STORE_FILE: &str = "debug.keystore";

/// A secret string that redacts itself in debug and serialized output
#[derive(Clone, PartialEq, Eq, Default)]
pub struct Secret(String);

impl Secret {
    /// Wrap a secret value
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// Access the underlying value
    pub fn expose(&self) -> &str {
        &self.0
    }

    /// True if no value was resolved
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Debug for Secret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_empty() {
            write!(f, "Secret(\"\")")
        } else {
            write!(f, "Secret(\"[REDACTED]\")")
        }
    }
}

impl Serialize for Secret {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        if self.0.is_empty() {
            serializer.serialize_str("")
        } else {
            serializer.serialize_str("[REDACTED]")
        }
    }
}

/// Immutable snapshot of the process environment
///
/// Taken once per resolution call; resolving multiple variants in the same
/// process never shares a cached snapshot.
#[derive(Debug, Clone, Default)]
pub struct EnvSnapshot(HashMap<String, String>);

impl EnvSnapshot {
    /// Snapshot the current process environment
    pub fn from_process() -> Self {
        Self(std::env::vars().collect())
    }

    /// An empty environment, for tests and hermetic resolution
    pub fn empty() -> Self {
        Self::default()
    }

    /// Look up a variable
    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(String::as_str)
    }
}

impl FromIterator<(String, String)> for EnvSnapshot {
    fn from_iter<I: IntoIterator<Item = (String, String)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// Explicit override parameters for the four signing attributes
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SigningOverrides {
    pub key_alias: Option<String>,
    pub key_password: Option<String>,
    pub store_file: Option<String>,
    pub store_password: Option<String>,
}

impl SigningOverrides {
    /// True if no override was supplied
    pub fn is_empty(&self) -> bool {
        self.key_alias.is_none()
            && self.key_password.is_none()
            && self.store_file.is_none()
            && self.store_password.is_none()
    }
}

/// Where a resolved signing attribute came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AttributeOrigin {
    /// Explicit build parameter
    Override,
    /// Environment variable
    Environment,
    /// Literal default
    Default,
    /// Fixed development identity (debug builds)
    DebugFixed,
    /// No value resolved
    Unset,
}

/// Per-attribute provenance of a resolved identity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SigningOrigins {
    pub key_alias: AttributeOrigin,
    pub key_password: AttributeOrigin,
    pub store_file: AttributeOrigin,
    pub store_password: AttributeOrigin,
}

/// The credential set used to sign an artifact
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SigningIdentity {
    /// Key alias within the keystore
    pub key_alias: String,

    /// Key password
    pub key_password: Secret,

    /// Keystore path; relative paths are resolved against the project directory
    pub store_file: PathBuf,

    /// Keystore password
    pub store_password: Secret,

    /// Where each attribute was resolved from
    pub origins: SigningOrigins,
}

impl SigningIdentity {
    /// True if this identity resolved to the fixed development identity
    pub fn is_development(&self) -> bool {
        self.origins.key_alias == AttributeOrigin::DebugFixed
    }
}

/// Resolve one attribute through the fallback chain
///
/// Empty values do not satisfy a link in the chain; resolution falls through
/// to the next one.
fn resolve_attribute(
    override_value: Option<&str>,
    env: &EnvSnapshot,
    var: &str,
    default: Option<&str>,
) -> (String, AttributeOrigin) {
    if let Some(value) = override_value {
        if !value.is_empty() {
            return (value.to_string(), AttributeOrigin::Override);
        }
    }
    if let Some(value) = env.get(var) {
        if !value.is_empty() {
            return (value.to_string(), AttributeOrigin::Environment);
        }
    }
    match default {
        Some(value) => (value.to_string(), AttributeOrigin::Default),
        None => (String::new(), AttributeOrigin::Unset),
    }
}

/// Resolve the signing identity for a build type
///
/// Release builds run the fallback chain per attribute. Debug builds skip
/// override and environment lookup entirely and return the fixed development
/// identity; the asymmetry is deliberate.
pub fn resolve_signing(
    build_type: BuildType,
    overrides: &SigningOverrides,
    env: &EnvSnapshot,
    project_dir: &Path,
) -> SigningIdentity {
    match build_type {
        BuildType::Debug => development_identity(env),
        BuildType::Release => {
            let (key_alias, key_alias_origin) =
                resolve_attribute(overrides.key_alias.as_deref(), env, ENV_KEY_ALIAS, None);
            let (key_password, key_password_origin) =
                resolve_attribute(overrides.key_password.as_deref(), env, ENV_KEY_PASSWORD, None);
            let (store_file, store_file_origin) = resolve_attribute(
                overrides.store_file.as_deref(),
                env,
                ENV_STORE_FILE,
                Some(DEFAULT_STORE_FILE),
            );
            let (store_password, store_password_origin) = resolve_attribute(
                overrides.store_password.as_deref(),
                env,
                ENV_STORE_PASSWORD,
                None,
            );

            let store_path = PathBuf::from(store_file);
            let store_file = if store_path.is_relative() {
                project_dir.join(store_path)
            } else {
                store_path
            };

            SigningIdentity {
                key_alias,
                key_password: Secret::new(key_password),
                store_file,
                store_password: Secret::new(store_password),
                origins: SigningOrigins {
                    key_alias: key_alias_origin,
                    key_password: key_password_origin,
                    store_file: store_file_origin,
                    store_password: store_password_origin,
                },
            }
        }
    }
}

/// The fixed development identity used by every debug build
fn development_identity(env: &EnvSnapshot) -> SigningIdentity {
    let store_file = match env.get("HOME") {
        Some(home) => Path::new(home).join(".android").join("debug.keystore"),
        None => PathBuf::from(".android/debug.keystore"),
    };
    SigningIdentity {
        key_alias: "androiddebugkey".to_string(),
        key_password: Secret::new("android"),
        store_file,
        store_password: Secret::new("android"),
        origins: SigningOrigins {
            key_alias: AttributeOrigin::DebugFixed,
            key_password: AttributeOrigin::DebugFixed,
            store_file: AttributeOrigin::DebugFixed,
            store_password: AttributeOrigin::DebugFixed,
        },
    }
}
