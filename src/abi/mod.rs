//! Target ABI universe and inclusion sets
//!
//! The supported universe is fixed: 64-bit ARM, 32-bit ARM, and 64-bit x86.
//! Declared ABIs outside this universe are rejected before a plan is built.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

use crate::plan::ValidationError;

/// A target instruction-set architecture for compiled native code
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Abi {
    /// 64-bit ARM (arm64-v8a)
    #[serde(rename = "arm64-v8a")]
    Arm64V8a,
    /// 32-bit ARM (armeabi-v7a)
    #[serde(rename = "armeabi-v7a")]
    ArmeabiV7a,
    /// 64-bit x86 (x86_64)
    #[serde(rename = "x86_64")]
    X86_64,
}

/// The full supported ABI universe
pub const ABI_UNIVERSE: [Abi; 3] = [Abi::Arm64V8a, Abi::ArmeabiV7a, Abi::X86_64];

impl Abi {
    /// Returns the Android ABI name
    pub fn as_str(&self) -> &'static str {
        match self {
            Abi::Arm64V8a => "arm64-v8a",
            Abi::ArmeabiV7a => "armeabi-v7a",
            Abi::X86_64 => "x86_64",
        }
    }

    /// Parse an Android ABI name, returning None for anything outside the universe
    pub fn parse(name: &str) -> Option<Self> {
        match name {
            "arm64-v8a" => Some(Abi::Arm64V8a),
            "armeabi-v7a" => Some(Abi::ArmeabiV7a),
            "x86_64" => Some(Abi::X86_64),
            _ => None,
        }
    }
}

impl fmt::Display for Abi {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A non-empty set of target ABIs drawn from the supported universe
///
/// Declaration order is irrelevant; iteration order is deterministic.
/// Duplicates collapse silently (set semantics).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AbiSet(BTreeSet<Abi>);

impl AbiSet {
    /// Resolve a declared list of ABI names into an AbiSet
    ///
    /// Fails with `UnsupportedAbi` for any name outside the universe and
    /// with `EmptyAbiSet` for an empty declaration.
    pub fn resolve(declared: &[String]) -> Result<Self, ValidationError> {
        let mut abis = BTreeSet::new();
        for name in declared {
            let abi = Abi::parse(name)
                .ok_or_else(|| ValidationError::UnsupportedAbi(name.clone()))?;
            abis.insert(abi);
        }
        if abis.is_empty() {
            return Err(ValidationError::EmptyAbiSet);
        }
        Ok(Self(abis))
    }

    /// Iterate the ABIs in deterministic order
    pub fn iter(&self) -> impl Iterator<Item = Abi> + '_ {
        self.0.iter().copied()
    }

    /// Number of ABIs in the set
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// True if the set contains no ABIs
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// True if the set contains the given ABI
    pub fn contains(&self, abi: Abi) -> bool {
        self.0.contains(&abi)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_resolve_full_universe() {
        let set = AbiSet::resolve(&names(&["arm64-v8a", "armeabi-v7a", "x86_64"])).unwrap();
        assert_eq!(set.len(), 3);
        for abi in ABI_UNIVERSE {
            assert!(set.contains(abi));
        }
    }

    #[test]
    fn test_resolve_rejects_unknown_abi() {
        let err = AbiSet::resolve(&names(&["arm64-v8a", "mips"])).unwrap_err();
        assert_eq!(err, ValidationError::UnsupportedAbi("mips".to_string()));
    }

    #[test]
    fn test_resolve_rejects_empty_declaration() {
        let err = AbiSet::resolve(&[]).unwrap_err();
        assert_eq!(err, ValidationError::EmptyAbiSet);
    }

    #[test]
    fn test_declaration_order_is_irrelevant() {
        let a = AbiSet::resolve(&names(&["x86_64", "arm64-v8a"])).unwrap();
        let b = AbiSet::resolve(&names(&["arm64-v8a", "x86_64"])).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_duplicates_collapse() {
        let set = AbiSet::resolve(&names(&["arm64-v8a", "arm64-v8a"])).unwrap();
        assert_eq!(set.len(), 1);
    }

    #[test]
    fn test_abi_roundtrip_names() {
        for abi in ABI_UNIVERSE {
            assert_eq!(Abi::parse(abi.as_str()), Some(abi));
        }
        assert_eq!(Abi::parse("armeabi"), None);
    }
}
