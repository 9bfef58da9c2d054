// src/core/env_files.rs

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::models::ToolConfig;

#[derive(Error, Debug)]
pub enum EnvFileError {
    #[error("Failed to read the environment file '{}'.", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("The entry at line {line} of '{}' is not in the form KEY=VALUE.", .path.display())]
    Malformed { path: PathBuf, line: usize },
}

/// Every location where an environment file may exist for `config`, ordered
/// least specific first so that later files override earlier ones.
///
/// Each tier directory of the configuration (tool root, then the version, OS,
/// and architecture directories that exist) is probed with the name suffixes
/// built from the attributes still unexpressed at that tier: at the root all
/// attributes apply, below a tier its own attribute no longer does.
pub fn potential_env_files(config: &ToolConfig, file_extension: &str) -> Vec<PathBuf> {
    let version_token = config.version.as_ref().map(|v| format!("-v{v}"));
    let os_token = config.operating_system.as_ref().map(|t| format!("-{}", t.name()));
    let arch_token = config.architecture.as_ref().map(|t| format!("-{}", t.name()));

    // Tier directories in root-to-leaf order. The versioned directory is an
    // ancestor chain below the root with at most one component per attribute.
    let mut tiers = vec![config.root_directory.clone()];
    if let Ok(relative) = config.versioned_directory.strip_prefix(&config.root_directory) {
        let mut current = config.root_directory.clone();
        for component in relative.components() {
            current.push(component);
            tiers.push(current.clone());
        }
    }

    let mut results = Vec::new();
    let mut tier_index = 0;

    let emit = |results: &mut Vec<PathBuf>, tier_index: usize, tokens: &[&Option<String>]| {
        let tier = tiers
            .get(tier_index)
            .cloned()
            .unwrap_or_else(|| config.root_directory.clone());

        let mut suffixes = vec![String::new()];
        for token in tokens.iter().filter_map(|t| t.as_deref()) {
            apply_suffix(&mut suffixes, token);
        }

        for suffix in &suffixes {
            results.push(tier.join(format!("{}{suffix}{file_extension}", config.name)));
        }
    };

    emit(&mut results, tier_index, &[&version_token, &os_token, &arch_token]);

    if version_token.is_some() {
        tier_index += 1;
        emit(&mut results, tier_index, &[&os_token, &arch_token]);
    }

    if os_token.is_some() {
        tier_index += 1;
        emit(&mut results, tier_index, &[&arch_token]);
    }

    if arch_token.is_some() {
        tier_index += 1;
        emit(&mut results, tier_index, &[]);
    }

    results
}

/// Folds one attribute token into the suffix list: combined forms built from
/// the existing non-empty suffixes come after the bare token, preserving the
/// least-to-most-specific order.
fn apply_suffix(suffixes: &mut Vec<String>, token: &str) {
    let combined: Vec<String> = suffixes
        .iter()
        .skip(1)
        .map(|existing| format!("{existing}{token}"))
        .collect();

    suffixes.push(token.to_string());
    suffixes.extend(combined);
}

/// Parses `KEY=VALUE` lines. Blank lines and `#` comments are skipped; a
/// non-comment line without `=` or with an empty key is an error.
pub fn parse_env_file(path: &Path, content: &str) -> Result<Vec<(String, String)>, EnvFileError> {
    let mut entries = Vec::new();

    for (index, raw_line) in content.lines().enumerate() {
        let line = raw_line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        let Some((key, value)) = line.split_once('=') else {
            return Err(EnvFileError::Malformed {
                path: path.to_path_buf(),
                line: index + 1,
            });
        };

        let key = key.trim();
        if key.is_empty() {
            return Err(EnvFileError::Malformed {
                path: path.to_path_buf(),
                line: index + 1,
            });
        }

        entries.push((key.to_string(), unquote(value.trim()).to_string()));
    }

    Ok(entries)
}

/// Strips one matching pair of surrounding quotes, if present.
fn unquote(value: &str) -> &str {
    for quote in ['"', '\''] {
        if value.len() >= 2 && value.starts_with(quote) && value.ends_with(quote) {
            return &value[1..value.len() - 1];
        }
    }

    value
}

/// Expands relative-path markers in a value. A `:` or `;` separated segment
/// beginning with `./` or `.\` is rewritten to the environment file's own
/// directory; a `\.`-escaped marker stays literal with the escape removed.
pub fn expand_relative_values(value: &str, env_file_directory: &Path) -> String {
    let directory = env_file_directory.to_string_lossy();
    let mut result = String::with_capacity(value.len());
    let mut rest = value;
    let mut at_segment_start = true;

    while let Some(ch) = rest.chars().next() {
        if at_segment_start {
            if rest.starts_with("./") || rest.starts_with(".\\") {
                result.push_str(&directory);
                result.push(std::path::MAIN_SEPARATOR);
                rest = &rest[2..];
                at_segment_start = false;
                continue;
            }

            if rest.starts_with("\\./") || rest.starts_with("\\.\\") {
                result.push_str(&rest[1..3]);
                rest = &rest[3..];
                at_segment_start = false;
                continue;
            }
        }

        result.push(ch);
        rest = &rest[ch.len_utf8()..];
        at_segment_start = ch == ':' || ch == ';';
    }

    result
}

/// Environment values for one tool configuration after reading, parsing, and
/// merging every environment file that exists for it.
#[derive(Debug, Default)]
pub struct ToolEnvironment {
    /// Merged values; later (more specific) files override earlier ones key by key.
    pub values: BTreeMap<String, String>,
    /// The files that contributed, least specific first.
    pub files: Vec<PathBuf>,
    /// Files that could not be read or parsed. Their entries are skipped.
    pub errors: Vec<EnvFileError>,
}

pub fn load_tool_environment(config: &ToolConfig, file_extension: &str) -> ToolEnvironment {
    let mut environment = ToolEnvironment::default();

    for candidate in potential_env_files(config, file_extension) {
        if !candidate.is_file() {
            continue;
        }

        let content = match fs::read_to_string(&candidate) {
            Ok(content) => content,
            Err(source) => {
                environment.errors.push(EnvFileError::Read {
                    path: candidate,
                    source,
                });
                continue;
            }
        };

        match parse_env_file(&candidate, &content) {
            Ok(entries) => {
                let directory = candidate
                    .parent()
                    .map(Path::to_path_buf)
                    .unwrap_or_default();

                for (key, value) in entries {
                    environment
                        .values
                        .insert(key, expand_relative_values(&value, &directory));
                }

                log::debug!("Loaded environment file '{}'", candidate.display());
                environment.files.push(candidate);
            }
            Err(error) => environment.errors.push(error),
        }
    }

    environment
}

/// The candidate environment files that actually exist, least specific first.
pub fn existing_env_files(config: &ToolConfig, file_extension: &str) -> Vec<PathBuf> {
    potential_env_files(config, file_extension)
        .into_iter()
        .filter(|path| path.is_file())
        .collect()
}
