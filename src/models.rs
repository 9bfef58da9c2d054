// src/models.rs

use semver::Version;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;

use crate::constants::GENERIC_DIR_NAME;

// --- PLATFORM MODELS ---

/// A platform axis (operating system or architecture) with a closed set of
/// recognized directory names.
pub trait PlatformKind: Copy + Eq + fmt::Debug + 'static {
    /// Human-readable label used in diagnostics ("operating system" / "architecture").
    const LABEL: &'static str;

    /// Every concrete member of the axis.
    fn all() -> &'static [Self];

    /// The exact directory name that represents this member.
    fn name(self) -> &'static str;

    /// Maps a directory name to a platform tag. Matching is exact and
    /// case-sensitive; unrecognized names return `None`.
    fn from_dir_name(name: &str) -> Option<PlatformTag<Self>> {
        if name == GENERIC_DIR_NAME {
            return Some(PlatformTag::Generic);
        }

        Self::all()
            .iter()
            .find(|member| member.name() == name)
            .map(|member| PlatformTag::Concrete(*member))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum OperatingSystem {
    Linux,
    MacOS,
    Windows,
}

impl PlatformKind for OperatingSystem {
    const LABEL: &'static str = "operating system";

    fn all() -> &'static [Self] {
        &[Self::Linux, Self::MacOS, Self::Windows]
    }

    fn name(self) -> &'static str {
        match self {
            Self::Linux => "Linux",
            Self::MacOS => "MacOS",
            Self::Windows => "Windows",
        }
    }
}

impl fmt::Display for OperatingSystem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
#[allow(non_camel_case_types)]
pub enum Architecture {
    x64,
    x86,
    ARM64,
    ARM,
}

impl PlatformKind for Architecture {
    const LABEL: &'static str = "architecture";

    fn all() -> &'static [Self] {
        &[Self::x64, Self::x86, Self::ARM64, Self::ARM]
    }

    fn name(self) -> &'static str {
        match self {
            Self::x64 => "x64",
            Self::x86 => "x86",
            Self::ARM64 => "ARM64",
            Self::ARM => "ARM",
        }
    }
}

impl fmt::Display for Architecture {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Either a concrete platform member or the `Generic` directory that matches
/// any member of the axis. An absent platform tier is modeled separately as
/// `Option<PlatformTag<T>>`; `Generic` is a real match, not an absence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlatformTag<T: PlatformKind> {
    Concrete(T),
    Generic,
}

impl<T: PlatformKind> PlatformTag<T> {
    /// The directory/suffix token for this tag (the member name, or the
    /// literal "Generic").
    pub fn name(&self) -> &'static str {
        match self {
            Self::Concrete(member) => member.name(),
            Self::Generic => GENERIC_DIR_NAME,
        }
    }
}

// --- RESOLUTION OUTPUT ---

/// One fully-resolved configuration of a tool.
///
/// `versioned_directory` is the most-specific directory selected after
/// version/OS/architecture narrowing; `binary_directory` is its `bin`
/// subdirectory when one exists, otherwise the directory itself.
/// `root_directory` is always an ancestor of (or equal to)
/// `versioned_directory`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolConfig {
    /// Name of the tool (its top-level directory basename).
    pub name: String,

    /// Version of the tool, if a versioned directory was encountered.
    pub version: Option<Version>,

    /// Operating system of the tool, if an OS-specific directory was encountered.
    pub operating_system: Option<PlatformTag<OperatingSystem>>,

    /// Architecture of the tool, if an architecture-specific directory was encountered.
    pub architecture: Option<PlatformTag<Architecture>>,

    /// Root of the tool; all versioned directories are subdirectories of this.
    pub root_directory: PathBuf,

    /// Root of a specific configuration of the tool.
    pub versioned_directory: PathBuf,

    /// Binary directory of a specific configuration of the tool.
    pub binary_directory: PathBuf,
}

// --- MANIFEST MODELS (YAML) ---

/// Complete manifest of all tools in a directory.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct ToolsManifest {
    pub tools: Vec<ToolManifestEntry>,
}

/// A tool with all its configurations, sorted by version in descending order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolManifestEntry {
    pub name: String,
    pub configurations: Vec<ManifestConfiguration>,
}

/// A specific configuration of a tool (version + OS + architecture combination),
/// with directories relative to the tools directory and forward-slash normalized.
///
/// `operating_system` and `architecture` carry the member name, the literal
/// "Generic", or null when the tier was absent; "Generic" and null are distinct.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ManifestConfiguration {
    pub version: Option<String>,
    pub operating_system: Option<String>,
    pub architecture: Option<String>,
    pub versioned_directory: String,
    pub binary_directory: String,
    pub env_files: ManifestEnvFiles,
}

/// Environment files of a configuration: either bare relative paths, or a
/// mapping from relative path to literal file content, depending on whether
/// content embedding was requested.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ManifestEnvFiles {
    Paths(Vec<String>),
    Contents(serde_yaml::Mapping),
}

impl Default for ManifestEnvFiles {
    fn default() -> Self {
        Self::Paths(Vec::new())
    }
}
