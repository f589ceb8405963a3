use crate::config::types::{KERNELS_KEY, KernelMap, RuleTable, RulesFile, TargetMap};
use crate::error::{ArchmapError, Result};
use indexmap::IndexMap;
use std::path::Path;

/// Parse a rules file from the given path.
pub fn parse_rules_file(path: &Path) -> Result<RulesFile> {
	let content = std::fs::read_to_string(path).map_err(|source| ArchmapError::RulesReadError {
		path: path.to_path_buf(),
		source,
	})?;

	parse_rules_str(&content, path)
}

/// Load the rules file at `path`, or `None` if it does not exist.
pub fn load_rules(path: &Path) -> Result<Option<RulesFile>> {
	if !path.exists() {
		tracing::debug!("no rules file at {}", path.display());
		return Ok(None);
	}
	parse_rules_file(path).map(Some)
}

/// Parse rules from a string. `path` is only used for error reporting.
///
/// The reserved `kernels` entry is split out; everything else becomes the
/// rule table in the order it appears.
pub fn parse_rules_str(content: &str, path: &Path) -> Result<RulesFile> {
	let parsed: Option<IndexMap<String, TargetMap>> =
		serde_yaml::from_str(content).map_err(|source| ArchmapError::RulesParseError {
			path: path.to_path_buf(),
			source,
		})?;

	let mut entries = parsed.unwrap_or_default();
	let kernels = entries
		.shift_remove(KERNELS_KEY)
		.map(KernelMap::from)
		.unwrap_or_default();

	let rules = RuleTable::from(entries);
	tracing::debug!(
		"parsed {} rules and {} kernel patterns from {}",
		rules.len(),
		kernels.patterns.len(),
		path.display()
	);

	Ok(RulesFile { kernels, rules })
}

/// Parse the built-in rule text: a sequence of single-entry rule mappings.
pub fn parse_default_rules(content: &str) -> Result<Vec<RuleTable>> {
	let tables: Vec<IndexMap<String, TargetMap>> =
		serde_yaml::from_str(content).map_err(|source| ArchmapError::RulesParseError {
			path: "<default rules>".into(),
			source,
		})?;
	Ok(tables.into_iter().map(RuleTable::from).collect())
}
