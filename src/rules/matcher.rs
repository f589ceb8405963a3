use crate::config::types::{KernelMap, RuleTable};
use crate::error::{ArchmapError, Result};
use regex::Regex;
use std::collections::HashMap;

/// Node label carrying the architecture tag.
pub const ARCH_LABEL: &str = "architecture";

/// Architecture assumed when nothing says otherwise.
pub const DEFAULT_ARCH: &str = "amd64";

/// Effective architecture: the given tag, or `amd64`.
pub fn resolve_arch(arch: Option<&str>) -> &str {
	arch.unwrap_or(DEFAULT_ARCH)
}

/// Effective architecture from a node's labels.
pub fn arch_from_labels(labels: &HashMap<String, String>) -> &str {
	resolve_arch(labels.get(ARCH_LABEL).map(String::as_str))
}

/// Compile a regex pattern string.
pub(crate) fn compile_regex(pattern: &str) -> Result<Regex> {
	Regex::new(pattern).map_err(|source| ArchmapError::InvalidRegex {
		pattern: pattern.to_string(),
		source,
	})
}

/// Check that every pattern in the table compiles.
pub fn validate_rules(table: &RuleTable) -> Result<()> {
	for rule in &table.rules {
		compile_regex(&rule.pattern)?;
	}
	Ok(())
}

/// Guess the architecture from a kernel version string.
///
/// Patterns are tried in file order and the first match wins. Patterns that
/// fail to compile are skipped. Falls back to the `default` entry, then to
/// `amd64`.
pub fn detect_arch(kernels: &KernelMap, kernel_version: &str) -> String {
	for (pattern, arch) in &kernels.patterns {
		let regex = match compile_regex(pattern) {
			Ok(regex) => regex,
			Err(e) => {
				tracing::warn!("skipping kernel pattern: {e}");
				continue;
			}
		};

		if regex.is_match(kernel_version) {
			tracing::debug!("kernel {kernel_version} matched {pattern}, arch {arch}");
			return arch.clone();
		}
	}

	kernels
		.default
		.clone()
		.unwrap_or_else(|| DEFAULT_ARCH.to_string())
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::config::parser::parse_rules_str;
	use crate::config::types::Rule;
	use std::path::Path;

	fn kernels(yaml: &str) -> KernelMap {
		parse_rules_str(yaml, Path::new("rewrite_rules.yaml"))
			.unwrap()
			.kernels
	}

	#[test]
	fn test_compile_valid_regex() {
		let result = compile_regex(r"^([\w\.]+)$");
		assert!(result.is_ok());
	}

	#[test]
	fn test_compile_invalid_regex() {
		let result = compile_regex(r"[invalid");
		assert!(result.is_err());
		match result.unwrap_err() {
			ArchmapError::InvalidRegex { pattern, .. } => {
				assert_eq!(pattern, "[invalid");
			}
			_ => panic!("Expected InvalidRegex error"),
		}
	}

	#[test]
	fn test_resolve_arch() {
		assert_eq!(resolve_arch(Some("arm")), "arm");
		assert_eq!(resolve_arch(None), "amd64");
	}

	#[test]
	fn test_arch_from_labels() {
		let mut labels = HashMap::new();
		assert_eq!(arch_from_labels(&labels), "amd64");

		labels.insert("architecture".to_string(), "386".to_string());
		assert_eq!(arch_from_labels(&labels), "386");
	}

	#[test]
	fn test_validate_rules() {
		let good = RuleTable {
			rules: vec![Rule {
				pattern: r"^(nginx)$".to_string(),
				..Default::default()
			}],
		};
		assert!(validate_rules(&good).is_ok());

		let bad = RuleTable {
			rules: vec![Rule {
				pattern: r"^(nginx$".to_string(),
				..Default::default()
			}],
		};
		assert!(validate_rules(&bad).is_err());
	}

	#[test]
	fn test_detect_arch_from_kernel() {
		let kernels = kernels(
			r#"
kernels:
  cubie\w+$: arm
  default: amd64
"#,
		);
		assert_eq!(detect_arch(&kernels, "3.4.106-cubieboard"), "arm");
		assert_eq!(detect_arch(&kernels, "3.4.106-cubietruck"), "arm");
		assert_eq!(detect_arch(&kernels, "3.4.106-cubie"), "amd64");
	}

	#[test]
	fn test_detect_arch_default_listed_first() {
		let kernels = kernels(
			r#"
kernels:
  default: amd64
  cubie\w+$: arm
"#,
		);
		assert_eq!(detect_arch(&kernels, "3.4.106-cubieboard"), "arm");
		assert_eq!(detect_arch(&kernels, "3.4.106-cubie"), "amd64");
	}

	#[test]
	fn test_detect_arch_without_default() {
		let kernels = kernels(
			r#"
kernels:
  armv7l: arm
"#,
		);
		assert_eq!(detect_arch(&kernels, "4.19.0-x86_64"), "amd64");
	}

	#[test]
	fn test_detect_arch_skips_invalid_pattern() {
		let kernels = kernels(
			r#"
kernels:
  "[broken": x86
  raspberry: arm
"#,
		);
		assert_eq!(detect_arch(&kernels, "4.1.0-raspberry"), "arm");
	}
}
