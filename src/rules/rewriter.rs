use crate::config::defaults::default_rule_tables;
use crate::config::types::RuleTable;
use crate::error::Result;
use crate::rules::matcher::{compile_regex, resolve_arch};
use regex::Captures;

/// Architecture tags that mark a reference as already rewritten.
pub const ARCH_SUFFIXES: &[&str] = &["amd64", "arm", "arm64", "386"];

/// Placeholder replaced by the effective architecture.
const ARCH_PLACEHOLDER: &str = "$arch";

/// Whether `reference` already ends in `.<arch>` for a known architecture.
///
/// Such references are never rewritten again, so asking for the same image
/// several times yields the same result.
pub fn is_arch_qualified(reference: &str) -> bool {
	reference
		.rsplit_once('.')
		.is_some_and(|(_, suffix)| ARCH_SUFFIXES.contains(&suffix))
}

/// Fill a rule template.
///
/// `$arch` is substituted first. Then a single left-to-right pass replaces
/// `$N` with capture group `N`; text coming from a group is never scanned
/// again. The longest run of digits naming an existing group is used, so
/// `$1_2` is group 1 followed by `_2`. `$N` for a group that does not exist
/// stays as written, and a group that did not participate becomes empty.
pub fn expand_template(template: &str, arch: &str, caps: &Captures) -> String {
	let target = template.replace(ARCH_PLACEHOLDER, arch);

	let mut out = String::with_capacity(target.len());
	let mut rest = target.as_str();
	while let Some(pos) = rest.find('$') {
		out.push_str(&rest[..pos]);
		let after = &rest[pos + 1..];
		let digits = after.bytes().take_while(u8::is_ascii_digit).count();

		let group = (1..=digits).rev().find_map(|len| {
			let index: usize = after[..len].parse().ok()?;
			(index >= 1 && index < caps.len()).then_some((len, index))
		});

		match group {
			Some((len, index)) => {
				out.push_str(caps.get(index).map_or("", |m| m.as_str()));
				rest = &after[len..];
			}
			None => {
				out.push('$');
				rest = after;
			}
		}
	}
	out.push_str(rest);

	out
}

/// Rewrite `reference` with an override rule table (strict mode).
///
/// Rules are tried in table order and the first one that matches wins.
/// Rules without a template for the architecture (or a `default`) are
/// skipped. A pattern that fails to compile stops evaluation with
/// [`crate::ArchmapError::InvalidRegex`]. Returns `Ok(None)` when no rule
/// matches.
pub fn rewrite(reference: &str, arch: Option<&str>, table: &RuleTable) -> Result<Option<String>> {
	let arch = resolve_arch(arch);

	for rule in &table.rules {
		tracing::debug!("considering rule {}", rule.pattern);
		let regex = compile_regex(&rule.pattern)?;

		let Some(template) = rule.target_for(arch) else {
			continue;
		};

		let Some(caps) = regex.captures(reference) else {
			continue;
		};

		let rewritten = expand_template(template, arch, &caps);
		tracing::debug!("rewrote {reference} as {rewritten}");
		return Ok(Some(rewritten));
	}

	Ok(None)
}

/// Rewrite `reference` against candidate tables in order (tolerant mode).
///
/// Each table is evaluated with [`rewrite`]; a table with an invalid
/// pattern or no match is skipped. References that are already
/// architecture-qualified, or that no table rewrites, come back unchanged.
pub fn rewrite_tolerant(reference: &str, arch: Option<&str>, tables: &[RuleTable]) -> String {
	if is_arch_qualified(reference) {
		tracing::debug!("{reference} is already architecture-qualified");
		return reference.to_string();
	}

	for table in tables {
		match rewrite(reference, arch, table) {
			Ok(Some(rewritten)) => return rewritten,
			Ok(None) => {}
			Err(e) => tracing::warn!("skipping rule table: {e}"),
		}
	}

	reference.to_string()
}

/// Rewrite `reference` with the built-in default rules.
pub fn rewrite_with_default_rules(reference: &str, arch: Option<&str>) -> String {
	rewrite_tolerant(reference, arch, default_rule_tables())
}

/// Rewrite an image reference for a node.
///
/// An override table, when given, replaces the default rules entirely and is
/// evaluated strictly; if none of its rules match, the reference is kept.
/// Without overrides the default rules are used.
pub fn rewrite_image(
	reference: &str,
	arch: Option<&str>,
	overrides: Option<&RuleTable>,
) -> Result<String> {
	if is_arch_qualified(reference) {
		tracing::debug!("{reference} is already architecture-qualified");
		return Ok(reference.to_string());
	}

	let rewritten = match overrides {
		Some(table) => rewrite(reference, arch, table)?.unwrap_or_else(|| reference.to_string()),
		None => rewrite_with_default_rules(reference, arch),
	};
	tracing::debug!("image name after rewrite: {rewritten}");

	Ok(rewritten)
}
