// src/core/version.rs

use regex::Regex;
use semver::Version;
use std::collections::BTreeMap;
use std::sync::OnceLock;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum VersionArgError {
    #[error("The tool version '{0}' is not a valid command line argument.")]
    InvalidArgument(String),
    #[error("The version '{version}' for the tool '{tool}' is invalid.")]
    InvalidVersion { tool: String, version: String },
}

/// Coerces a directory-name fragment into a semantic version.
///
/// An optional leading `v` is stripped, and partial numeric forms are padded
/// (`"2"` becomes `2.0.0`, `"1.5"` becomes `1.5.0`). Returns `None` when the
/// fragment is not coercible; that is not an error, the directory is simply
/// not a version directory.
pub fn coerce(fragment: &str) -> Option<Version> {
    let stripped = fragment.strip_prefix('v').unwrap_or(fragment);
    if stripped.is_empty() {
        return None;
    }

    if let Ok(version) = Version::parse(stripped) {
        return Some(version);
    }

    // Partial forms: up to three dot-separated numeric components.
    let mut numbers = [0u64; 3];
    let mut count = 0;
    for part in stripped.split('.') {
        if count == numbers.len() || part.is_empty() || !part.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }
        numbers[count] = part.parse().ok()?;
        count += 1;
    }

    Some(Version::new(numbers[0], numbers[1], numbers[2]))
}

fn tool_version_regex() -> &'static Regex {
    static REGEX: OnceLock<Regex> = OnceLock::new();
    REGEX.get_or_init(|| {
        // A `\=` in the tool name is an escaped equal sign, not the separator.
        Regex::new(r"^(?P<tool_name>(?:\\=|[^=])+?)\s*=\s*(?P<version>.+?)$")
            .unwrap_or_else(|e| panic!("invalid tool-version regex: {e}"))
    })
}

/// Parses one `NAME=VERSION` pin from the command line. The version accepts
/// an optional `v` prefix and partial forms, same as directory coercion.
pub fn parse_tool_version_arg(arg: &str) -> Result<(String, Version), VersionArgError> {
    let captures = tool_version_regex()
        .captures(arg)
        .ok_or_else(|| VersionArgError::InvalidArgument(arg.to_string()))?;

    let tool = captures["tool_name"].replace("\\=", "=");
    let version_str = &captures["version"];

    let version = coerce(version_str).ok_or_else(|| VersionArgError::InvalidVersion {
        tool: tool.clone(),
        version: version_str.to_string(),
    })?;

    Ok((tool, version))
}

/// Parses every `NAME=VERSION` pin, failing on the first invalid argument.
pub fn parse_tool_version_args(
    args: &[String],
) -> Result<BTreeMap<String, Version>, VersionArgError> {
    let mut results = BTreeMap::new();

    for arg in args {
        let (tool, version) = parse_tool_version_arg(arg)?;
        results.insert(tool, version);
    }

    Ok(results)
}
