//! Bracketed range expansion.
//!
//! A pattern such as `web[00:03].example.com` expands to
//! `web00.example.com` through `web03.example.com`. The endpoints can be any
//! mix of digits, lowercase and uppercase letters; every intermediate value is
//! produced by [`inc`], so width and case follow the `from` endpoint.

use crate::error::{ArchmapError, Result};
use regex::Regex;
use std::sync::LazyLock;

static RANGE_RE: LazyLock<Regex> = LazyLock::new(|| {
	Regex::new(r"\[([0-9A-Za-z]+):([0-9A-Za-z]+)\]").expect("range regex is valid")
});

/// Return the value that follows `s`.
///
/// Works on the last character, odometer style:
/// - `"0"` becomes `"1"`, `"01"` becomes `"02"` (leading zero kept)
/// - `"09"` becomes `"10"`, `"9"` becomes `"10"`
/// - `"a9"` becomes `"b0"`, `"az"` becomes `"ba"`, `"AZ"` becomes `"BA"`
/// - `"z"` becomes `"aa"`, `"Z"` becomes `"AA"`
///
/// A carry out of the first character prepends the first digit of the ring
/// that overflowed (`1`, `A` or `a`). The empty string becomes `"1"`.
pub fn inc(s: &str) -> String {
	let mut chars: Vec<char> = s.chars().collect();
	let mut carry = '1';

	for i in (0..chars.len()).rev() {
		match chars[i] {
			'9' => {
				chars[i] = '0';
				carry = '1';
			}
			'Z' => {
				chars[i] = 'A';
				carry = 'A';
			}
			'z' => {
				chars[i] = 'a';
				carry = 'a';
			}
			c => {
				chars[i] = char::from_u32(c as u32 + 1).unwrap_or(c);
				return chars.into_iter().collect();
			}
		}
	}

	chars.insert(0, carry);
	chars.into_iter().collect()
}

/// Expand the first `[from:to]` span in `pattern`, inclusive of both ends.
///
/// A pattern without a well-formed span (including `127.0.0.[1]`) comes back
/// unchanged as a single element. Text around the span is kept verbatim.
///
/// `inc` never makes a value shorter, so once a value outgrows `to` the end
/// can no longer be reached and [`ArchmapError::RangeUnreachable`] is returned.
pub fn expand(pattern: &str) -> Result<Vec<String>> {
	let Some(caps) = RANGE_RE.captures(pattern) else {
		return Ok(vec![pattern.to_string()]);
	};

	let span = caps.get(0).map_or(0..0, |m| m.range());
	let (prefix, suffix) = (&pattern[..span.start], &pattern[span.end..]);
	let (from, to) = (&caps[1], &caps[2]);
	let to_len = to.chars().count();

	let mut result = Vec::new();
	let mut value = from.to_string();
	loop {
		if value.chars().count() > to_len {
			return Err(ArchmapError::RangeUnreachable {
				from: from.to_string(),
				to: to.to_string(),
			});
		}

		result.push(format!("{prefix}{value}{suffix}"));
		if value == to {
			break;
		}
		value = inc(&value);
	}

	tracing::debug!("expanded {} into {} values", pattern, result.len());
	Ok(result)
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_inc_digits() {
		assert_eq!(inc("0"), "1");
		assert_eq!(inc("01"), "02");
		assert_eq!(inc("09"), "10");
		assert_eq!(inc("9"), "10");
		assert_eq!(inc("99"), "100");
	}

	#[test]
	fn test_inc_letters() {
		assert_eq!(inc("a"), "b");
		assert_eq!(inc("az"), "ba");
		assert_eq!(inc("AZ"), "BA");
		assert_eq!(inc("Az"), "Ba");
	}

	#[test]
	fn test_inc_overflow_prepends_ring_start() {
		assert_eq!(inc("z"), "aa");
		assert_eq!(inc("zz"), "aaa");
		assert_eq!(inc("Z"), "AA");
	}

	#[test]
	fn test_inc_mixed_rings() {
		assert_eq!(inc("a9"), "b0");
		assert_eq!(inc("a1z"), "a2a");
		assert_eq!(inc("A9z"), "B0a");
	}

	#[test]
	fn test_inc_empty() {
		assert_eq!(inc(""), "1");
	}

	#[test]
	fn test_inc_other_characters() {
		assert_eq!(inc("x-"), "x.");
	}

	#[test]
	fn test_expand_no_range() {
		assert_eq!(expand("127.0.0.1").unwrap(), vec!["127.0.0.1"]);
		assert_eq!(expand("127.0.0.1:8080").unwrap(), vec!["127.0.0.1:8080"]);
	}

	#[test]
	fn test_expand_malformed_range_is_literal() {
		assert_eq!(expand("127.0.0.[1]").unwrap(), vec!["127.0.0.[1]"]);
		assert_eq!(expand("127.0.0.[:3]").unwrap(), vec!["127.0.0.[:3]"]);
	}

	#[test]
	fn test_expand_prefix_and_suffix() {
		assert_eq!(
			expand("prefix[1:3]suffix").unwrap(),
			vec!["prefix1suffix", "prefix2suffix", "prefix3suffix"]
		);
	}

	#[test]
	fn test_expand_leading_zero() {
		assert_eq!(expand("x[09:11]y").unwrap(), vec!["x09y", "x10y", "x11y"]);

		let ips = expand("127.0.0.[00:09]").unwrap();
		assert_eq!(ips.len(), 10);
		assert_eq!(ips[0], "127.0.0.00");
		assert_eq!(ips[9], "127.0.0.09");
	}

	#[test]
	fn test_expand_width_grows() {
		assert_eq!(
			expand("1.2.3.[9:11]").unwrap(),
			vec!["1.2.3.9", "1.2.3.10", "1.2.3.11"]
		);
	}

	#[test]
	fn test_expand_keeps_port_suffix() {
		let ips = expand("127.0.0.[1:11]:2375").unwrap();
		assert_eq!(ips.len(), 11);
		assert_eq!(ips[0], "127.0.0.1:2375");
		assert_eq!(ips[10], "127.0.0.11:2375");
	}

	#[test]
	fn test_expand_hostnames() {
		assert_eq!(
			expand("[00:03]h.abc.com").unwrap(),
			vec!["00h.abc.com", "01h.abc.com", "02h.abc.com", "03h.abc.com"]
		);
		assert_eq!(
			expand("web-[a1z:a2b].example.com").unwrap(),
			vec![
				"web-a1z.example.com",
				"web-a2a.example.com",
				"web-a2b.example.com"
			]
		);
	}

	#[test]
	fn test_expand_single_value() {
		assert_eq!(expand("node[7:7]").unwrap(), vec!["node7"]);
	}

	#[test]
	fn test_expand_unreachable_end() {
		match expand("node[5:3]").unwrap_err() {
			ArchmapError::RangeUnreachable { from, to } => {
				assert_eq!(from, "5");
				assert_eq!(to, "3");
			}
			_ => panic!("Expected RangeUnreachable error"),
		}
	}
}
