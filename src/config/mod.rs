//! Rules file loading and layering.
//!
//! Precedence, lowest first: built-in defaults (nothing set), the rules file,
//! then overrides from the command line.

use crate::analyzer::cleanup::rules::RuleSet;
use crate::error::ConfigError;
use serde_yaml::Value;
use std::fs;
use std::path::Path;

/// Load a rules file, or the defaults when no path is given.
///
/// A missing, unreadable or malformed file is an error, never a silent
/// fallback to defaults.
pub fn load_rules(path: Option<&Path>) -> Result<RuleSet, ConfigError> {
    let Some(path) = path else {
        return Ok(RuleSet::default());
    };

    let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let rules = parse_rules(&content, &path.display().to_string())?;
    log::info!("loaded rules from {}", path.display());
    log::debug!("file rules: {:?}", rules);
    Ok(rules)
}

/// Parse rules file content. Empty and null documents mean defaults.
pub fn parse_rules(content: &str, origin: &str) -> Result<RuleSet, ConfigError> {
    let parse_error = |e: serde_yaml::Error| ConfigError::ParsingFailed {
        origin: origin.to_string(),
        message: e.to_string(),
    };

    if content.trim().is_empty() {
        return Ok(RuleSet::default());
    }

    let value: Value = serde_yaml::from_str(content).map_err(parse_error)?;
    if value.is_null() {
        return Ok(RuleSet::default());
    }
    serde_yaml::from_value(value).map_err(parse_error)
}

/// Layer command-line overrides on top of the rules file.
pub fn resolve_rules(
    rules_file: Option<&Path>,
    overrides: RuleSet,
) -> Result<RuleSet, ConfigError> {
    let rules = load_rules(rules_file)?.merge(overrides);
    log::debug!("effective rules: {:?}", rules);
    Ok(rules)
}
