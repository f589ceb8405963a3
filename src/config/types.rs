use indexmap::IndexMap;

/// Reserved top-level key holding the kernel-version-to-architecture table.
pub const KERNELS_KEY: &str = "kernels";

/// Target-map key used when a rule has no template for the node's architecture.
pub const DEFAULT_KEY: &str = "default";

/// Mapping from architecture tag (or `default`) to a template string.
pub type TargetMap = IndexMap<String, String>;

/// A single rewrite rule: a regex pattern and its per-architecture templates.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Rule {
	/// Regex matched against the image reference (first match, unanchored).
	pub pattern: String,

	/// Templates keyed by architecture tag.
	pub targets: TargetMap,
}

impl Rule {
	/// Template for `arch`, falling back to the `default` entry.
	///
	/// Empty templates count as absent.
	pub fn target_for(&self, arch: &str) -> Option<&str> {
		self.targets
			.get(arch)
			.filter(|t| !t.is_empty())
			.or_else(|| self.targets.get(DEFAULT_KEY).filter(|t| !t.is_empty()))
			.map(String::as_str)
	}
}

/// Ordered rule table. Earlier rules have priority.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RuleTable {
	pub rules: Vec<Rule>,
}

impl RuleTable {
	pub fn is_empty(&self) -> bool {
		self.rules.is_empty()
	}

	pub fn len(&self) -> usize {
		self.rules.len()
	}
}

impl From<IndexMap<String, TargetMap>> for RuleTable {
	fn from(map: IndexMap<String, TargetMap>) -> Self {
		RuleTable {
			rules: map
				.into_iter()
				.map(|(pattern, targets)| Rule { pattern, targets })
				.collect(),
		}
	}
}

/// Kernel version patterns used to guess a node's architecture.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct KernelMap {
	/// `(pattern, architecture)` pairs in file order.
	pub patterns: Vec<(String, String)>,

	/// Architecture used when no pattern matches.
	pub default: Option<String>,
}

impl From<TargetMap> for KernelMap {
	fn from(map: TargetMap) -> Self {
		let mut kernels = KernelMap::default();
		for (pattern, arch) in map {
			if pattern == DEFAULT_KEY {
				kernels.default = Some(arch);
			} else {
				kernels.patterns.push((pattern, arch));
			}
		}
		kernels
	}
}

/// Contents of a rewrite rules file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RulesFile {
	/// The `kernels` section, if any.
	pub kernels: KernelMap,

	/// Every other top-level entry, in encounter order.
	pub rules: RuleTable,
}
