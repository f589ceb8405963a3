//! Rule matching and rewriting for archmap.
//!
//! This module handles:
//! - Architecture resolution from labels and kernel versions
//! - Image reference rewriting with `$arch` and `$N` templates

pub mod matcher;
pub mod rewriter;

pub use matcher::{
	ARCH_LABEL, DEFAULT_ARCH, arch_from_labels, detect_arch, resolve_arch, validate_rules,
};
pub use rewriter::{
	ARCH_SUFFIXES, expand_template, is_arch_qualified, rewrite, rewrite_image, rewrite_tolerant,
	rewrite_with_default_rules,
};
