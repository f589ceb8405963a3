//! Archmap - architecture-aware image rewriting and host range expansion.
//!
//! This library provides the core functionality for archmap, including:
//! - Rewrite rule parsing, with the built-in default rules
//! - Image reference rewriting per node architecture
//! - Bracketed range expansion (`web[01:10]`)
//! - Inventory section reading for host discovery
//!
//! # Example
//!
//! ```
//! use archmap::rules::rewrite_with_default_rules;
//! use archmap::range::expand;
//!
//! assert_eq!(
//!     rewrite_with_default_rules("chanwit/zookeeper:3.4.6", Some("arm")),
//!     "aiyara/chanwit_zookeeper:3.4.6.arm"
//! );
//! assert_eq!(
//!     expand("node[1:3]").unwrap(),
//!     vec!["node1", "node2", "node3"]
//! );
//! ```

pub mod config;
pub mod error;
pub mod inventory;
pub mod range;
pub mod rules;

pub use error::{ArchmapError, Result};
