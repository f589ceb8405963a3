use crate::error::Result;
use crate::range;
use indexmap::IndexMap;

/// Port appended to hosts that do not name one.
pub const DEFAULT_PORT: &str = "2375";

/// Line attribute overriding [`DEFAULT_PORT`].
pub const PORT_ATTRIBUTE: &str = "docker_port";

/// Synthetic section holding every host in file order.
pub const ALL_SECTION: &str = "all";

/// Section for hosts listed before the first header.
pub const UNGROUPED_SECTION: &str = "ungrouped";

/// Hosts of an inventory file, grouped by section.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Inventory {
	sections: IndexMap<String, Vec<String>>,
	all: Vec<String>,
}

impl Inventory {
	/// Parse inventory text.
	///
	/// `#` lines and blank lines are ignored and `[name]` opens a section.
	/// Each data line is `<host-or-range> [key=value ...]`; ranges are
	/// expanded and hosts without a port get `docker_port` or 2375.
	pub fn parse(text: &str) -> Result<Self> {
		let mut inventory = Inventory::default();
		let mut current = UNGROUPED_SECTION.to_string();

		for line in text.lines() {
			let line = line.trim();
			if line.is_empty() || line.starts_with('#') {
				continue;
			}

			if let Some(name) = line.strip_prefix('[').and_then(|l| l.strip_suffix(']')) {
				current = name.trim().to_string();
				tracing::info!("inventory section {current}");
				inventory.sections.entry(current.clone()).or_default();
				continue;
			}

			let hosts = parse_host_line(line)?;
			inventory.all.extend(hosts.iter().cloned());
			inventory
				.sections
				.entry(current.clone())
				.or_default()
				.extend(hosts);
		}

		Ok(inventory)
	}

	/// Hosts of `name`; `all` is every host. Unknown sections are empty.
	pub fn section(&self, name: &str) -> &[String] {
		if name == ALL_SECTION {
			return &self.all;
		}
		self.sections
			.get(name)
			.map(Vec::as_slice)
			.unwrap_or_default()
	}

	/// Section names in the order they first appear.
	pub fn section_names(&self) -> impl Iterator<Item = &str> {
		self.sections.keys().map(String::as_str)
	}
}

/// Read the `host:port` list of one section from inventory text.
pub fn read_section(text: &str, section: &str) -> Result<Vec<String>> {
	Ok(Inventory::parse(text)?.section(section).to_vec())
}

fn parse_host_line(line: &str) -> Result<Vec<String>> {
	let mut tokens = line.split_whitespace();
	let Some(host_spec) = tokens.next() else {
		return Ok(Vec::new());
	};

	let mut port = DEFAULT_PORT;
	for token in tokens {
		if let Some((key, value)) = token.split_once('=')
			&& key == PORT_ATTRIBUTE
		{
			port = value;
		}
	}

	Ok(range::expand(host_spec)?
		.into_iter()
		.map(|host| with_port(host, port))
		.collect())
}

fn with_port(host: String, port: &str) -> String {
	if host.contains(':') {
		host
	} else {
		format!("{host}:{port}")
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_all_read_section() {
		let hosts = read_section(
			r#"
[web]
192.168.0.1

[db]
192.168.0.2"#,
			"all",
		)
		.unwrap();
		assert_eq!(hosts, vec!["192.168.0.1:2375", "192.168.0.2:2375"]);
	}

	#[test]
	fn test_read_section() {
		let data = r#"
# This is comment

[web]
192.168.0.1
# This is comment
192.168.0.3

[db]
# This is comment
192.168.0.2

[with_port]
# This is comment
192.168.0.4 docker_port=4243
192.168.0.5:2376 docker_port=4243
"#;
		assert_eq!(
			read_section(data, "web").unwrap(),
			vec!["192.168.0.1:2375", "192.168.0.3:2375"]
		);
		assert_eq!(read_section(data, "db").unwrap(), vec!["192.168.0.2:2375"]);
		assert_eq!(
			read_section(data, "with_port").unwrap(),
			vec!["192.168.0.4:4243", "192.168.0.5:2376"]
		);
	}

	#[test]
	fn test_unrelated_attribute_ignored() {
		let hosts = read_section("[web]\n10.0.0.1 swarm_port=9999\n", "web").unwrap();
		assert_eq!(hosts, vec!["10.0.0.1:2375"]);
	}

	#[test]
	fn test_read_generator() {
		let data = r#"
[web]
# Support generator
192.168.0.[1:5]
"#;
		let web = read_section(data, "web").unwrap();
		assert_eq!(
			web,
			vec![
				"192.168.0.1:2375",
				"192.168.0.2:2375",
				"192.168.0.3:2375",
				"192.168.0.4:2375",
				"192.168.0.5:2375",
			]
		);
	}

	#[test]
	fn test_generator_with_port_and_attribute() {
		let data = "[web]\nnode[1:2]:2376\nedge[a:b] docker_port=4243\n";
		assert_eq!(
			read_section(data, "web").unwrap(),
			vec!["node1:2376", "node2:2376", "edgea:4243", "edgeb:4243"]
		);
	}

	#[test]
	fn test_missing_section_is_empty() {
		let data = "[web]\n192.168.0.1\n[empty]\n";
		assert!(read_section(data, "db").unwrap().is_empty());
		assert!(read_section(data, "empty").unwrap().is_empty());
	}

	#[test]
	fn test_hosts_before_header_are_ungrouped() {
		let data = "10.0.0.1\n[web]\n10.0.0.2\n";
		let inventory = Inventory::parse(data).unwrap();
		assert_eq!(inventory.section("ungrouped"), ["10.0.0.1:2375"]);
		assert_eq!(inventory.section("web"), ["10.0.0.2:2375"]);
		assert_eq!(inventory.section("all"), ["10.0.0.1:2375", "10.0.0.2:2375"]);
	}

	#[test]
	fn test_reopened_section_appends() {
		let data = "[web]\n10.0.0.1\n[db]\n10.0.0.2\n[web]\n10.0.0.3\n";
		let inventory = Inventory::parse(data).unwrap();
		assert_eq!(inventory.section("web"), ["10.0.0.1:2375", "10.0.0.3:2375"]);
		assert_eq!(inventory.section_names().collect::<Vec<_>>(), vec!["web", "db"]);
	}

	#[test]
	fn test_unreachable_range_is_error() {
		assert!(read_section("[web]\nnode[9:1]\n", "web").is_err());
	}
}
