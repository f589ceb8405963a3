use crate::config::parser::parse_default_rules;
use crate::config::types::RuleTable;
use crate::error::{ArchmapError, Result};
use std::path::PathBuf;
use std::sync::LazyLock;

/// Built-in rules, most specific first. The last entry catches bare image names.
pub const DEFAULT_RULES: &str = r#"
- ^([\w\.]+)/([\w\.]+):([\w\.]+)$:
    amd64: $1/$2:$3
    default: aiyara/$1_$2:$3.$arch

- ^([\w\.]+):([\w\.]+)$:
    amd64: $1:$2
    default: aiyara/$1:$2.$arch

- ^([\w\.]+)$:
    amd64: $1
    default: aiyara/$1:latest.$arch
"#;

static DEFAULT_RULE_TABLES: LazyLock<Vec<RuleTable>> = LazyLock::new(|| {
	parse_default_rules(DEFAULT_RULES).unwrap_or_else(|e| {
		tracing::error!("built-in rules failed to parse: {e}");
		Vec::new()
	})
});

/// The built-in rule tables, parsed once per process.
pub fn default_rule_tables() -> &'static [RuleTable] {
	&DEFAULT_RULE_TABLES
}

/// Get the path to the user's rules file (`~/.swarm/rewrite_rules.yaml`).
pub fn rules_file_path() -> Result<PathBuf> {
	let home_dir = dirs::home_dir().ok_or(ArchmapError::HomeDirectoryNotFound)?;
	Ok(home_dir.join(".swarm").join("rewrite_rules.yaml"))
}
