// src/core/selector.rs

use semver::Version;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::constants::BIN_DIR_NAME;
use crate::core::version;
use crate::models::{Architecture, OperatingSystem, PlatformKind, PlatformTag, ToolConfig};

#[derive(Error, Debug)]
pub enum ResolveError {
    #[error("No directory found for version '{version}' for the tool '{tool}' in '{}'.", .directory.display())]
    VersionNotFound {
        tool: String,
        version: Version,
        directory: PathBuf,
    },

    #[error("No directory found for '{requested}' for the tool '{tool}' in '{}'.", .directory.display())]
    PlatformNotFound {
        tool: String,
        requested: &'static str,
        directory: PathBuf,
    },

    #[error("No configurations found for the tool '{tool}'.")]
    NoConfigurations { tool: String },

    #[error("Failed to read the directory '{}'.", .directory.display())]
    DirectoryRead {
        directory: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Narrows version selection for a single tool.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VersionFilter {
    /// Use the highest version found.
    Latest,
    /// Use exactly this version; error if its directory does not exist.
    Exact(Version),
}

/// Filters applied while walking one tool's directory hierarchy. `None` on an
/// axis means fan out over every branch of that axis.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolFilters {
    pub version: Option<VersionFilter>,
    pub operating_system: Option<OperatingSystem>,
    pub architecture: Option<Architecture>,
    pub allow_generic_operating_system: bool,
    pub allow_generic_architecture: bool,
}

impl Default for ToolFilters {
    fn default() -> Self {
        Self {
            version: None,
            operating_system: None,
            architecture: None,
            allow_generic_operating_system: true,
            allow_generic_architecture: true,
        }
    }
}

/// Resolves every configuration of the tool rooted at `tool_directory`,
/// narrowing in the fixed order version, operating system, architecture.
///
/// Each tier is skipped silently when no subdirectory of the expected shape
/// exists; narrowing continues in the current directory. A requested value
/// that cannot be satisfied in a tier that does exist is an error.
pub fn resolve_tool(
    tool_directory: &Path,
    filters: &ToolFilters,
) -> Result<Vec<ToolConfig>, ResolveError> {
    let name = tool_directory
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();

    log::debug!("Resolving tool '{name}' in '{}'", tool_directory.display());

    let mut configs = Vec::new();

    for (version_dir, version) in
        version_branches(&name, tool_directory, filters.version.as_ref())?
    {
        for (os_dir, operating_system) in platform_branches(
            &name,
            &version_dir,
            filters.operating_system,
            filters.allow_generic_operating_system,
        )? {
            for (arch_dir, architecture) in platform_branches(
                &name,
                &os_dir,
                filters.architecture,
                filters.allow_generic_architecture,
            )? {
                let binary_directory = binary_directory_for(&arch_dir);

                configs.push(ToolConfig {
                    name: name.clone(),
                    version: version.clone(),
                    operating_system,
                    architecture,
                    root_directory: tool_directory.to_path_buf(),
                    versioned_directory: arch_dir,
                    binary_directory,
                });
            }
        }
    }

    Ok(configs)
}

/// Lists immediate subdirectories sorted by name, so resolution order is
/// stable across filesystems.
fn list_subdirectories(directory: &Path) -> Result<Vec<PathBuf>, ResolveError> {
    let entries = fs::read_dir(directory).map_err(|source| ResolveError::DirectoryRead {
        directory: directory.to_path_buf(),
        source,
    })?;

    let mut subdirectories: Vec<PathBuf> = entries
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .filter(|path| path.is_dir())
        .collect();

    subdirectories.sort();

    Ok(subdirectories)
}

/// The version tier. Returns the branch directories to continue narrowing in,
/// paired with the version each represents (or `None` when the tier is absent
/// and narrowing continues in `directory` itself).
fn version_branches(
    tool: &str,
    directory: &Path,
    filter: Option<&VersionFilter>,
) -> Result<Vec<(PathBuf, Option<Version>)>, ResolveError> {
    let mut candidates: Vec<(Version, PathBuf)> = Vec::new();

    for subdirectory in list_subdirectories(directory)? {
        if let Some(dir_name) = subdirectory.file_name().and_then(|n| n.to_str())
            && let Some(parsed) = version::coerce(dir_name)
        {
            candidates.push((parsed, subdirectory));
        }
    }

    if candidates.is_empty() {
        // No version tier; the tool lives directly in this directory.
        return Ok(vec![(directory.to_path_buf(), None)]);
    }

    // Descending by version. The sort is stable, so directories that coerce
    // to the same version keep their listing order and dedup keeps the first.
    candidates.sort_by(|a, b| b.0.cmp(&a.0));
    candidates.dedup_by(|current, previous| current.0 == previous.0);

    match filter {
        None => Ok(candidates
            .into_iter()
            .map(|(parsed, path)| (path, Some(parsed)))
            .collect()),
        Some(VersionFilter::Latest) => Ok(candidates
            .into_iter()
            .take(1)
            .map(|(parsed, path)| (path, Some(parsed)))
            .collect()),
        Some(VersionFilter::Exact(wanted)) => candidates
            .into_iter()
            .find(|(parsed, _)| parsed == wanted)
            .map(|(parsed, path)| vec![(path, Some(parsed))])
            .ok_or_else(|| ResolveError::VersionNotFound {
                tool: tool.to_string(),
                version: wanted.clone(),
                directory: directory.to_path_buf(),
            }),
    }
}

/// An operating-system or architecture tier, selected by the `PlatformKind`
/// type parameter. `Generic` is only eligible when a concrete value was
/// requested and `allow_generic` holds.
fn platform_branches<T: PlatformKind>(
    tool: &str,
    directory: &Path,
    filter: Option<T>,
    allow_generic: bool,
) -> Result<Vec<(PathBuf, Option<PlatformTag<T>>)>, ResolveError> {
    let mut recognized: Vec<(PlatformTag<T>, PathBuf)> = Vec::new();

    for subdirectory in list_subdirectories(directory)? {
        if let Some(dir_name) = subdirectory.file_name().and_then(|n| n.to_str())
            && let Some(tag) = T::from_dir_name(dir_name)
        {
            recognized.push((tag, subdirectory));
        }
    }

    if recognized.is_empty() {
        // No tier of this axis; keep narrowing in the current directory.
        return Ok(vec![(directory.to_path_buf(), None)]);
    }

    match filter {
        None => Ok(recognized
            .into_iter()
            .map(|(tag, path)| (path, Some(tag)))
            .collect()),
        Some(wanted) => {
            if let Some((tag, path)) = recognized
                .iter()
                .find(|(tag, _)| *tag == PlatformTag::Concrete(wanted))
            {
                return Ok(vec![(path.clone(), Some(*tag))]);
            }

            if allow_generic
                && let Some((tag, path)) = recognized
                    .iter()
                    .find(|(tag, _)| matches!(tag, PlatformTag::Generic))
            {
                return Ok(vec![(path.clone(), Some(*tag))]);
            }

            Err(ResolveError::PlatformNotFound {
                tool: tool.to_string(),
                requested: wanted.name(),
                directory: directory.to_path_buf(),
            })
        }
    }
}

/// The `bin` subdirectory when one exists, otherwise the directory itself.
fn binary_directory_for(versioned_directory: &Path) -> PathBuf {
    let bin = versioned_directory.join(BIN_DIR_NAME);
    if bin.is_dir() {
        bin
    } else {
        versioned_directory.to_path_buf()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn make_dirs(root: &Path, relative_paths: &[&str]) {
        for relative in relative_paths {
            fs::create_dir_all(root.join(relative)).expect("create test directories");
        }
    }

    fn exact(version: &str) -> ToolFilters {
        ToolFilters {
            version: version::coerce(version).map(VersionFilter::Exact),
            ..ToolFilters::default()
        }
    }

    #[test]
    fn test_bare_tool_directory() {
        let temp = TempDir::new().expect("temp dir");
        let tool = temp.path().join("Tool1");
        make_dirs(temp.path(), &["Tool1"]);

        let configs = resolve_tool(&tool, &ToolFilters::default()).expect("resolve");

        assert_eq!(configs.len(), 1);
        assert_eq!(configs[0].name, "Tool1");
        assert_eq!(configs[0].version, None);
        assert_eq!(configs[0].operating_system, None);
        assert_eq!(configs[0].architecture, None);
        assert_eq!(configs[0].versioned_directory, tool);
        assert_eq!(configs[0].binary_directory, tool);
    }

    #[test]
    fn test_bin_directory_is_preferred() {
        let temp = TempDir::new().expect("temp dir");
        make_dirs(temp.path(), &["Tool2/bin"]);
        let tool = temp.path().join("Tool2");

        let configs = resolve_tool(&tool, &ToolFilters::default()).expect("resolve");

        assert_eq!(configs.len(), 1);
        assert_eq!(configs[0].versioned_directory, tool);
        assert_eq!(configs[0].binary_directory, tool.join("bin"));
    }

    #[test]
    fn test_version_tier_with_v_prefix() {
        let temp = TempDir::new().expect("temp dir");
        make_dirs(temp.path(), &["Tool4/v2.3.4"]);
        let tool = temp.path().join("Tool4");

        let configs = resolve_tool(&tool, &ToolFilters::default()).expect("resolve");

        assert_eq!(configs.len(), 1);
        assert_eq!(configs[0].version, Some(Version::new(2, 3, 4)));
        assert_eq!(configs[0].versioned_directory, tool.join("v2.3.4"));
    }

    #[test]
    fn test_fan_out_over_versions_descending() {
        let temp = TempDir::new().expect("temp dir");
        make_dirs(temp.path(), &["Tool/1.0.0", "Tool/3.0.0", "Tool/2.0.0"]);
        let tool = temp.path().join("Tool");

        let configs = resolve_tool(&tool, &ToolFilters::default()).expect("resolve");

        let versions: Vec<String> = configs
            .iter()
            .filter_map(|c| c.version.as_ref().map(Version::to_string))
            .collect();
        assert_eq!(versions, ["3.0.0", "2.0.0", "1.0.0"]);
    }

    #[test]
    fn test_latest_selects_highest_version() {
        let temp = TempDir::new().expect("temp dir");
        make_dirs(temp.path(), &["Tool/1.0.0", "Tool/10.0.0", "Tool/9.0.0"]);
        let tool = temp.path().join("Tool");

        let filters = ToolFilters {
            version: Some(VersionFilter::Latest),
            ..ToolFilters::default()
        };
        let configs = resolve_tool(&tool, &filters).expect("resolve");

        assert_eq!(configs.len(), 1);
        assert_eq!(configs[0].version, Some(Version::new(10, 0, 0)));
    }

    #[test]
    fn test_exact_version_found_and_missing() {
        let temp = TempDir::new().expect("temp dir");
        make_dirs(temp.path(), &["Tool/1.0.0", "Tool/2.0.0"]);
        let tool = temp.path().join("Tool");

        let configs = resolve_tool(&tool, &exact("1.0.0")).expect("resolve");
        assert_eq!(configs.len(), 1);
        assert_eq!(configs[0].version, Some(Version::new(1, 0, 0)));

        let error = resolve_tool(&tool, &exact("4.0.0")).expect_err("missing version");
        let message = error.to_string();
        assert!(message.starts_with("No directory found for version '4.0.0' for the tool 'Tool' in '"));
        assert!(message.ends_with("'."));
    }

    #[test]
    fn test_non_version_directories_skip_the_tier() {
        let temp = TempDir::new().expect("temp dir");
        make_dirs(temp.path(), &["Tool/docs", "Tool/notes"]);
        let tool = temp.path().join("Tool");

        let configs = resolve_tool(&tool, &ToolFilters::default()).expect("resolve");

        // Nothing coerces to a version, so the tier is absent entirely.
        assert_eq!(configs.len(), 1);
        assert_eq!(configs[0].version, None);
        assert_eq!(configs[0].versioned_directory, tool);
    }

    #[test]
    fn test_equivalent_version_spellings_collapse() {
        let temp = TempDir::new().expect("temp dir");
        make_dirs(temp.path(), &["Tool/1.0", "Tool/1.0.0", "Tool/v1"]);
        let tool = temp.path().join("Tool");

        let configs = resolve_tool(&tool, &ToolFilters::default()).expect("resolve");

        // All three spellings coerce to 1.0.0; the first in listing order wins.
        assert_eq!(configs.len(), 1);
        assert_eq!(configs[0].version, Some(Version::new(1, 0, 0)));
        assert_eq!(configs[0].versioned_directory, tool.join("1.0"));
    }

    #[test]
    fn test_os_narrowing_prefers_concrete_match() {
        let temp = TempDir::new().expect("temp dir");
        make_dirs(
            temp.path(),
            &["Tool/1.0.0/Linux", "Tool/1.0.0/Windows", "Tool/1.0.0/Generic"],
        );
        let tool = temp.path().join("Tool");

        let filters = ToolFilters {
            operating_system: Some(OperatingSystem::Linux),
            ..ToolFilters::default()
        };
        let configs = resolve_tool(&tool, &filters).expect("resolve");

        assert_eq!(configs.len(), 1);
        assert_eq!(
            configs[0].operating_system,
            Some(PlatformTag::Concrete(OperatingSystem::Linux))
        );
        assert_eq!(
            configs[0].versioned_directory,
            tool.join("1.0.0").join("Linux")
        );
    }

    #[test]
    fn test_generic_fallback_when_allowed() {
        let temp = TempDir::new().expect("temp dir");
        make_dirs(temp.path(), &["Tool/Windows", "Tool/Generic"]);
        let tool = temp.path().join("Tool");

        let allowed = ToolFilters {
            operating_system: Some(OperatingSystem::Linux),
            ..ToolFilters::default()
        };
        let configs = resolve_tool(&tool, &allowed).expect("resolve");
        assert_eq!(configs.len(), 1);
        assert_eq!(configs[0].operating_system, Some(PlatformTag::Generic));

        let denied = ToolFilters {
            operating_system: Some(OperatingSystem::Linux),
            allow_generic_operating_system: false,
            ..ToolFilters::default()
        };
        let error = resolve_tool(&tool, &denied).expect_err("no Linux directory");
        assert!(
            error
                .to_string()
                .starts_with("No directory found for 'Linux' for the tool 'Tool' in '")
        );
    }

    #[test]
    fn test_case_sensitive_platform_names() {
        let temp = TempDir::new().expect("temp dir");
        make_dirs(temp.path(), &["Tool/linux"]);
        let tool = temp.path().join("Tool");

        let filters = ToolFilters {
            operating_system: Some(OperatingSystem::Linux),
            ..ToolFilters::default()
        };
        let configs = resolve_tool(&tool, &filters).expect("resolve");

        // "linux" is not recognized, so the OS tier is treated as absent.
        assert_eq!(configs.len(), 1);
        assert_eq!(configs[0].operating_system, None);
    }

    #[test]
    fn test_full_hierarchy_with_bin() {
        let temp = TempDir::new().expect("temp dir");
        make_dirs(temp.path(), &["Tool8/1.0.0/Linux/x64/bin"]);
        let tool = temp.path().join("Tool8");

        let filters = ToolFilters {
            version: Some(VersionFilter::Latest),
            operating_system: Some(OperatingSystem::Linux),
            architecture: Some(Architecture::x64),
            ..ToolFilters::default()
        };
        let configs = resolve_tool(&tool, &filters).expect("resolve");

        assert_eq!(configs.len(), 1);
        let expected = tool.join("1.0.0").join("Linux").join("x64");
        assert_eq!(configs[0].versioned_directory, expected);
        assert_eq!(configs[0].binary_directory, expected.join("bin"));
        assert_eq!(
            configs[0].architecture,
            Some(PlatformTag::Concrete(Architecture::x64))
        );
    }

    #[test]
    fn test_fan_out_across_all_axes() {
        let temp = TempDir::new().expect("temp dir");
        make_dirs(
            temp.path(),
            &[
                "Tool/1.0.0/Linux/x64",
                "Tool/1.0.0/Linux/ARM64",
                "Tool/1.0.0/Windows/x64",
                "Tool/2.0.0/Linux/x64",
            ],
        );
        let tool = temp.path().join("Tool");

        let configs = resolve_tool(&tool, &ToolFilters::default()).expect("resolve");

        assert_eq!(configs.len(), 4);
        // Versions descend; within a version, directories are in name order.
        assert_eq!(configs[0].version, Some(Version::new(2, 0, 0)));
        assert!(configs[1..].iter().all(|c| c.version == Some(Version::new(1, 0, 0))));
    }

    #[test]
    fn test_missing_directory_is_io_error() {
        let temp = TempDir::new().expect("temp dir");
        let missing = temp.path().join("NoSuchTool");

        let error = resolve_tool(&missing, &ToolFilters::default()).expect_err("missing dir");
        assert!(matches!(error, ResolveError::DirectoryRead { .. }));
    }
}
