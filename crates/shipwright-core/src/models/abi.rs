//! Native architecture (ABI) models.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize, Serializer};

use crate::error::ConfigError;

/// An Android native instruction set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Abi {
    #[serde(rename = "armeabi-v7a", alias = "arm")]
    ArmeabiV7a,
    #[serde(rename = "arm64-v8a", alias = "arm64")]
    Arm64V8a,
    #[serde(rename = "x86")]
    X86,
    #[serde(rename = "x86_64", alias = "x64", alias = "x86-64")]
    X86_64,
}

impl Abi {
    /// Every ABI the toolchain can package.
    pub const ALL: [Abi; 4] = [Abi::ArmeabiV7a, Abi::Arm64V8a, Abi::X86, Abi::X86_64];

    pub fn as_str(&self) -> &'static str {
        match self {
            Abi::ArmeabiV7a => "armeabi-v7a",
            Abi::Arm64V8a => "arm64-v8a",
            Abi::X86 => "x86",
            Abi::X86_64 => "x86_64",
        }
    }

    /// Name used by `flutter build --target-platform`.
    pub fn flutter_platform(&self) -> &'static str {
        match self {
            Abi::ArmeabiV7a => "android-arm",
            Abi::Arm64V8a => "android-arm64",
            Abi::X86 => "android-x86",
            Abi::X86_64 => "android-x64",
        }
    }
}

impl std::str::FromStr for Abi {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "armeabi-v7a" | "arm" | "android-arm" => Ok(Abi::ArmeabiV7a),
            "arm64-v8a" | "arm64" | "android-arm64" => Ok(Abi::Arm64V8a),
            "x86" | "android-x86" => Ok(Abi::X86),
            "x86_64" | "x86-64" | "x64" | "android-x64" => Ok(Abi::X86_64),
            _ => Err(ConfigError::UnknownArchitecture(s.to_string())),
        }
    }
}

impl std::fmt::Display for Abi {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Set of ABIs a variant packages native code for.
///
/// `All` is a deliberate policy, not a missing value: the toolchain builds
/// every supported ABI. A declared filter that is absent or empty maps to
/// `All`, so an empty `Only` set is never produced.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum ArchitectureFilter {
    #[default]
    All,
    Only(BTreeSet<Abi>),
}

impl ArchitectureFilter {
    /// Builds a filter from a declared list.
    pub fn from_declared(declared: Option<&[Abi]>) -> Self {
        match declared {
            Some(abis) if !abis.is_empty() => Self::Only(abis.iter().copied().collect()),
            _ => Self::All,
        }
    }

    pub fn is_all(&self) -> bool {
        matches!(self, Self::All)
    }

    pub fn contains(&self, abi: Abi) -> bool {
        match self {
            Self::All => true,
            Self::Only(set) => set.contains(&abi),
        }
    }

    /// Concrete ABIs covered by this filter, in stable order.
    pub fn abis(&self) -> Vec<Abi> {
        match self {
            Self::All => Abi::ALL.to_vec(),
            Self::Only(set) => set.iter().copied().collect(),
        }
    }
}

impl std::fmt::Display for ArchitectureFilter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::All => write!(f, "all"),
            Self::Only(set) => {
                let names: Vec<_> = set.iter().map(Abi::as_str).collect();
                write!(f, "{}", names.join(","))
            }
        }
    }
}

impl Serialize for ArchitectureFilter {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::All => serializer.serialize_str("all"),
            Self::Only(set) => serializer.collect_seq(set.iter()),
        }
    }
}
