// src/core/manifest.rs

use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::core::catalog::{self, NameFilter};
use crate::core::env_files::{self, EnvFileError};
use crate::core::selector::ResolveError;
use crate::models::{
    ManifestConfiguration, ManifestEnvFiles, ToolManifestEntry, ToolsManifest,
};

#[derive(Error, Debug)]
pub enum ManifestError {
    #[error(transparent)]
    Resolve(#[from] ResolveError),

    #[error("Failed to write the manifest to '{}'.", .path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to serialize the manifest.")]
    Serialize(#[from] serde_yaml::Error),
}

/// Problems encountered for individual tools while generating a manifest.
/// They are reported but do not abort generation.
#[derive(Error, Debug)]
pub enum ManifestIssue {
    #[error(transparent)]
    Resolve(#[from] ResolveError),

    #[error(transparent)]
    EnvFile(#[from] EnvFileError),
}

#[derive(Debug, Default)]
pub struct ManifestOutcome {
    pub manifest: ToolsManifest,
    pub issues: Vec<ManifestIssue>,
}

/// Generates a manifest of every configuration of every admitted tool under
/// `tools_directory`. Paths are relative to the tools directory with forward
/// slashes. With `embed_env_contents`, each environment file's literal text
/// is embedded instead of only its path.
pub fn generate_manifest(
    tools_directory: &Path,
    names: &NameFilter,
    env_file_extension: &str,
    embed_env_contents: bool,
) -> Result<ManifestOutcome, ManifestError> {
    let (tools, resolve_errors) = catalog::resolve_all(tools_directory, names)?;

    let mut outcome = ManifestOutcome::default();
    outcome
        .issues
        .extend(resolve_errors.into_iter().map(ManifestIssue::from));

    for tool in tools {
        let mut configurations = Vec::new();

        for config in &tool.configs {
            let existing = env_files::existing_env_files(config, env_file_extension);

            let manifest_env_files = if embed_env_contents {
                let mut contents = serde_yaml::Mapping::new();
                for path in existing {
                    match fs::read_to_string(&path) {
                        Ok(text) => {
                            contents.insert(
                                relative_display(&path, tools_directory).into(),
                                text.into(),
                            );
                        }
                        Err(source) => outcome
                            .issues
                            .push(EnvFileError::Read { path, source }.into()),
                    }
                }
                ManifestEnvFiles::Contents(contents)
            } else {
                ManifestEnvFiles::Paths(
                    existing
                        .iter()
                        .map(|path| relative_display(path, tools_directory))
                        .collect(),
                )
            };

            configurations.push(ManifestConfiguration {
                version: config.version.as_ref().map(ToString::to_string),
                operating_system: config.operating_system.map(|tag| tag.name().to_string()),
                architecture: config.architecture.map(|tag| tag.name().to_string()),
                versioned_directory: relative_display(&config.versioned_directory, tools_directory),
                binary_directory: relative_display(&config.binary_directory, tools_directory),
                env_files: manifest_env_files,
            });
        }

        outcome.manifest.tools.push(ToolManifestEntry {
            name: tool.name,
            configurations,
        });
    }

    Ok(outcome)
}

/// Serializes the manifest as YAML to `path`, creating parent directories as
/// needed.
pub fn write_manifest(manifest: &ToolsManifest, path: &Path) -> Result<(), ManifestError> {
    let yaml = serde_yaml::to_string(manifest)?;

    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent).map_err(|source| ManifestError::Write {
            path: path.to_path_buf(),
            source,
        })?;
    }

    fs::write(path, yaml).map_err(|source| ManifestError::Write {
        path: path.to_path_buf(),
        source,
    })
}

/// A path relative to `base`, rendered with forward slashes regardless of
/// platform. Paths outside `base` fall back to their absolute form.
fn relative_display(path: &Path, base: &Path) -> String {
    path.strip_prefix(base)
        .unwrap_or(path)
        .to_string_lossy()
        .replace('\\', "/")
}
