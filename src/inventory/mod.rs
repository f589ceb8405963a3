//! Host inventory discovery for archmap.
//!
//! This module handles:
//! - Ansible-style inventory parsing into sections of `host:port` strings
//! - Discovery paths naming an inventory file and section
//! - Parsing `host:port` strings into entries

pub mod discovery;
pub mod reader;

pub use discovery::{DEFAULT_INVENTORY, DiscoveryPath, HostEntry, parse_entries};
pub use reader::{ALL_SECTION, DEFAULT_PORT, Inventory, PORT_ATTRIBUTE, read_section};
