use std::path::PathBuf;

/// Library-level structured errors for archmap.
///
/// Use `thiserror` for structured errors that library consumers can match on.
/// The CLI binary wraps these with `anyhow` for rich context chains.
#[derive(Debug, thiserror::Error)]
pub enum ArchmapError {
	#[error("Failed to read rules file: {path}")]
	RulesReadError {
		path: PathBuf,
		#[source]
		source: std::io::Error,
	},

	#[error("Failed to parse rules file: {path}")]
	RulesParseError {
		path: PathBuf,
		#[source]
		source: serde_yaml::Error,
	},

	#[error("Invalid regex pattern in rule: {pattern}")]
	InvalidRegex {
		pattern: String,
		#[source]
		source: regex::Error,
	},

	#[error("Range end {to} is not reachable from {from}")]
	RangeUnreachable { from: String, to: String },

	#[error("Failed to read inventory file: {path}")]
	InventoryReadError {
		path: PathBuf,
		#[source]
		source: std::io::Error,
	},

	#[error("Invalid host entry: {entry}")]
	InvalidHostEntry { entry: String },

	#[error("Failed to resolve home directory")]
	HomeDirectoryNotFound,
}

/// Result type alias using ArchmapError.
pub type Result<T> = std::result::Result<T, ArchmapError>;
