// src/core/catalog.rs

use semver::Version;
use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;

use crate::core::selector::{self, ResolveError, ToolFilters, VersionFilter};
use crate::models::{Architecture, OperatingSystem, ToolConfig};

/// Tool-name filtering shared by activation and manifest generation.
/// Exclusion wins over inclusion; an empty include set admits every tool.
#[derive(Debug, Clone, Default)]
pub struct NameFilter {
    pub include: BTreeSet<String>,
    pub exclude: BTreeSet<String>,
}

impl NameFilter {
    pub fn new(include: impl IntoIterator<Item = String>, exclude: impl IntoIterator<Item = String>) -> Self {
        Self {
            include: include.into_iter().collect(),
            exclude: exclude.into_iter().collect(),
        }
    }

    pub fn admits(&self, tool_name: &str) -> bool {
        if self.exclude.contains(tool_name) {
            return false;
        }

        self.include.is_empty() || self.include.contains(tool_name)
    }
}

/// Selection criteria for resolving every tool to a single configuration
/// suited to the machine running the command.
#[derive(Debug, Clone)]
pub struct CurrentPlatformQuery {
    pub names: NameFilter,
    /// Version pins by tool name; unpinned tools use their latest version.
    pub tool_versions: BTreeMap<String, Version>,
    pub operating_system: OperatingSystem,
    pub architecture: Architecture,
    pub allow_generic_operating_system: bool,
    pub allow_generic_architecture: bool,
}

/// Result of walking a tools directory. Tools that failed to resolve are
/// collected rather than aborting the walk, so one broken tool does not hide
/// its siblings.
#[derive(Debug, Default)]
pub struct CatalogOutcome {
    pub configs: Vec<ToolConfig>,
    pub errors: Vec<ResolveError>,
}

/// Resolves each admitted tool under `tools_directory` to the single
/// configuration matching the current platform.
pub fn resolve_current(
    tools_directory: &Path,
    query: &CurrentPlatformQuery,
) -> Result<CatalogOutcome, ResolveError> {
    let mut outcome = CatalogOutcome::default();

    for (tool_name, tool_directory) in admitted_tools(tools_directory, &query.names)? {
        let filters = ToolFilters {
            version: Some(match query.tool_versions.get(&tool_name) {
                Some(pinned) => VersionFilter::Exact(pinned.clone()),
                None => VersionFilter::Latest,
            }),
            operating_system: Some(query.operating_system),
            architecture: Some(query.architecture),
            allow_generic_operating_system: query.allow_generic_operating_system,
            allow_generic_architecture: query.allow_generic_architecture,
        };

        match selector::resolve_tool(&tool_directory, &filters) {
            Ok(configs) if configs.is_empty() => {
                outcome
                    .errors
                    .push(ResolveError::NoConfigurations { tool: tool_name });
            }
            Ok(configs) => outcome.configs.extend(configs),
            Err(error) => outcome.errors.push(error),
        }
    }

    Ok(outcome)
}

/// One tool with every configuration it resolves to, unfiltered.
#[derive(Debug)]
pub struct ToolConfigurations {
    pub name: String,
    pub configs: Vec<ToolConfig>,
}

/// Resolves each admitted tool to all of its configurations, fanning out over
/// every version, operating system, and architecture branch. Tools are
/// returned in name order.
pub fn resolve_all(
    tools_directory: &Path,
    names: &NameFilter,
) -> Result<(Vec<ToolConfigurations>, Vec<ResolveError>), ResolveError> {
    let mut tools = Vec::new();
    let mut errors = Vec::new();

    for (tool_name, tool_directory) in admitted_tools(tools_directory, names)? {
        match selector::resolve_tool(&tool_directory, &ToolFilters::default()) {
            Ok(configs) if configs.is_empty() => {
                errors.push(ResolveError::NoConfigurations { tool: tool_name });
            }
            Ok(configs) => tools.push(ToolConfigurations {
                name: tool_name,
                configs,
            }),
            Err(error) => errors.push(error),
        }
    }

    Ok((tools, errors))
}

/// Immediate subdirectories of the tools directory that pass the name filter,
/// sorted by name.
fn admitted_tools(
    tools_directory: &Path,
    names: &NameFilter,
) -> Result<Vec<(String, std::path::PathBuf)>, ResolveError> {
    let entries =
        std::fs::read_dir(tools_directory).map_err(|source| ResolveError::DirectoryRead {
            directory: tools_directory.to_path_buf(),
            source,
        })?;

    let mut tools: Vec<(String, std::path::PathBuf)> = entries
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .filter(|path| path.is_dir())
        .filter_map(|path| {
            let tool_name = path.file_name()?.to_string_lossy().into_owned();
            names.admits(&tool_name).then_some((tool_name, path))
        })
        .collect();

    tools.sort();

    Ok(tools)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn current_query() -> CurrentPlatformQuery {
        CurrentPlatformQuery {
            names: NameFilter::default(),
            tool_versions: BTreeMap::new(),
            operating_system: OperatingSystem::Linux,
            architecture: Architecture::x64,
            allow_generic_operating_system: true,
            allow_generic_architecture: true,
        }
    }

    fn make_dirs(root: &Path, relative_paths: &[&str]) {
        for relative in relative_paths {
            fs::create_dir_all(root.join(relative)).expect("create test directories");
        }
    }

    #[test]
    fn test_name_filter_semantics() {
        let all = NameFilter::default();
        assert!(all.admits("Anything"));

        let included = NameFilter::new(["Tool1".to_string()], []);
        assert!(included.admits("Tool1"));
        assert!(!included.admits("Tool2"));

        // Exclusion wins even when the same name is included.
        let both = NameFilter::new(["Tool1".to_string()], ["Tool1".to_string()]);
        assert!(!both.admits("Tool1"));
    }

    #[test]
    fn test_resolve_current_across_layout_shapes() {
        let temp = TempDir::new().expect("temp dir");
        make_dirs(
            temp.path(),
            &["Tool1", "Tool2/bin", "Tool3/1.0.0", "Tool4/v2.3.4"],
        );

        let outcome = resolve_current(temp.path(), &current_query()).expect("resolve");

        assert!(outcome.errors.is_empty());
        assert_eq!(outcome.configs.len(), 4);

        let binaries: Vec<_> = outcome
            .configs
            .iter()
            .map(|c| c.binary_directory.clone())
            .collect();
        assert_eq!(
            binaries,
            [
                temp.path().join("Tool1"),
                temp.path().join("Tool2").join("bin"),
                temp.path().join("Tool3").join("1.0.0"),
                temp.path().join("Tool4").join("v2.3.4"),
            ]
        );
    }

    #[test]
    fn test_resolve_current_uses_latest_unless_pinned() {
        let temp = TempDir::new().expect("temp dir");
        make_dirs(temp.path(), &["Tool/1.0.0", "Tool/2.0.0"]);

        let outcome = resolve_current(temp.path(), &current_query()).expect("resolve");
        assert_eq!(outcome.configs.len(), 1);
        assert_eq!(outcome.configs[0].version, Some(Version::new(2, 0, 0)));

        let mut query = current_query();
        query
            .tool_versions
            .insert("Tool".to_string(), Version::new(1, 0, 0));
        let outcome = resolve_current(temp.path(), &query).expect("resolve");
        assert_eq!(outcome.configs[0].version, Some(Version::new(1, 0, 0)));
    }

    #[test]
    fn test_broken_tool_does_not_hide_siblings() {
        let temp = TempDir::new().expect("temp dir");
        make_dirs(temp.path(), &["Tool1", "Tool2/Windows", "Tool3"]);

        let mut query = current_query();
        query.allow_generic_operating_system = false;

        let outcome = resolve_current(temp.path(), &query).expect("resolve");

        // Tool2 only has a Windows directory; the Linux query fails for it.
        assert_eq!(outcome.configs.len(), 2);
        assert_eq!(outcome.errors.len(), 1);
        assert!(
            outcome.errors[0]
                .to_string()
                .contains("for the tool 'Tool2'")
        );
    }

    #[test]
    fn test_resolve_all_fans_out_and_sorts_by_name() {
        let temp = TempDir::new().expect("temp dir");
        make_dirs(
            temp.path(),
            &["Zeta/1.0.0", "Zeta/2.0.0", "Alpha/1.0.0/Linux", "Alpha/1.0.0/Windows"],
        );

        let (tools, errors) =
            resolve_all(temp.path(), &NameFilter::default()).expect("resolve");

        assert!(errors.is_empty());
        assert_eq!(tools.len(), 2);
        assert_eq!(tools[0].name, "Alpha");
        assert_eq!(tools[0].configs.len(), 2);
        assert_eq!(tools[1].name, "Zeta");
        assert_eq!(tools[1].configs.len(), 2);
    }

    #[test]
    fn test_exclude_wins_in_walk() {
        let temp = TempDir::new().expect("temp dir");
        make_dirs(temp.path(), &["Tool1", "Tool2"]);

        let mut query = current_query();
        query.names = NameFilter::new([], ["Tool2".to_string()]);

        let outcome = resolve_current(temp.path(), &query).expect("resolve");

        assert_eq!(outcome.configs.len(), 1);
        assert_eq!(outcome.configs[0].name, "Tool1");
    }
}
