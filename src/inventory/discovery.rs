use crate::error::{ArchmapError, Result};
use crate::inventory::reader::read_section;
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// Inventory file used when the discovery path names only a section.
pub const DEFAULT_INVENTORY: &str = "/etc/ansible/hosts";

/// Inventory file and section named by a discovery path.
///
/// `/path/to/file/section` reads section `section` of `/path/to/file`;
/// `/section` reads it from `/etc/ansible/hosts`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiscoveryPath {
	pub file: PathBuf,
	pub section: String,
}

impl DiscoveryPath {
	pub fn parse(path: &str) -> Self {
		let path = path.trim_start_matches('/');
		match path.rsplit_once('/') {
			Some((file, section)) => DiscoveryPath {
				file: Path::new("/").join(file),
				section: section.to_string(),
			},
			None => DiscoveryPath {
				file: PathBuf::from(DEFAULT_INVENTORY),
				section: path.to_string(),
			},
		}
	}

	/// Read the inventory file and return the hosts of the section.
	pub fn fetch(&self) -> Result<Vec<HostEntry>> {
		let content =
			std::fs::read_to_string(&self.file).map_err(|source| ArchmapError::InventoryReadError {
				path: self.file.clone(),
				source,
			})?;

		let hosts = read_section(&content, &self.section)?;
		tracing::debug!(
			"found {} hosts in section {} of {}",
			hosts.len(),
			self.section,
			self.file.display()
		);
		parse_entries(&hosts)
	}
}

/// A discovered `host:port` pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HostEntry {
	pub host: String,
	pub port: u16,
}

impl FromStr for HostEntry {
	type Err = ArchmapError;

	fn from_str(s: &str) -> Result<Self> {
		let invalid = || ArchmapError::InvalidHostEntry {
			entry: s.to_string(),
		};

		let (host, port) = s.rsplit_once(':').ok_or_else(invalid)?;
		if host.is_empty() {
			return Err(invalid());
		}
		let port: u16 = port.parse().map_err(|_| invalid())?;

		Ok(HostEntry {
			host: host.to_string(),
			port,
		})
	}
}

impl fmt::Display for HostEntry {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{}:{}", self.host, self.port)
	}
}

/// Parse `host:port` strings into entries.
pub fn parse_entries<S: AsRef<str>>(hosts: &[S]) -> Result<Vec<HostEntry>> {
	hosts.iter().map(|h| h.as_ref().parse()).collect()
}
