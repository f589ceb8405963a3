//! Rewrite rule configuration for archmap.
//!
//! This module handles:
//! - YAML rule file parsing (rules plus the reserved `kernels` table)
//! - Locating the user's rules file
//! - The built-in default rule tables

pub mod defaults;
pub mod parser;
pub mod types;

pub use defaults::{DEFAULT_RULES, default_rule_tables, rules_file_path};
pub use parser::{load_rules, parse_default_rules, parse_rules_file, parse_rules_str};
pub use types::{KernelMap, Rule, RuleTable, RulesFile, TargetMap};
