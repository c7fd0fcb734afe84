//! Editor↔sandbox address translation.
//!
//! The compiler module addresses files by sandbox-local paths while the
//! editor addresses the same files by URI. [`AddressMap`] converts
//! between the two by stripping a workspace-root or scheme prefix on the
//! way in and re-adding it on the way out. Translation is heuristic:
//! an address outside every known prefix passes through unchanged.

use serde::{Deserialize, Serialize};

/// One workspace root mapping.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AddressRoot {
	/// Editor-side prefix, e.g. `file:///home/user/project`.
	pub editor: String,
	/// Sandbox-side prefix, e.g. `/project`.
	pub sandbox: String,
}

/// Bidirectional prefix map between editor URIs and sandbox paths.
///
/// Matching tries the longest known prefix first, across both the
/// workspace roots and a small set of literal scheme prefixes, since
/// inputs may arrive already stripped.
#[derive(Debug, Clone, Default)]
pub struct AddressMap {
	roots: Vec<AddressRoot>,
	schemes: Vec<String>,
}

/// Scheme prefixes recognized when no workspace root matches.
const DEFAULT_SCHEMES: &[&str] = &["file://", "untitled:"];

impl AddressMap {
	/// Creates a map over the given workspace roots with the default
	/// scheme prefixes.
	pub fn new(roots: Vec<AddressRoot>) -> Self {
		Self {
			roots,
			schemes: DEFAULT_SCHEMES.iter().map(|s| (*s).to_string()).collect(),
		}
	}

	/// Replaces the literal scheme prefixes tried after the roots.
	pub fn with_schemes(mut self, schemes: Vec<String>) -> Self {
		self.schemes = schemes;
		self
	}

	/// Translates an editor URI to a sandbox path.
	pub fn to_sandbox(&self, uri: &str) -> String {
		if let Some(root) = self.longest_match(uri, |r| &r.editor) {
			let rest = &uri[root.editor.len()..];
			return format!("{}{rest}", root.sandbox);
		}
		for scheme in self.schemes_longest_first() {
			if let Some(rest) = uri.strip_prefix(scheme.as_str()) {
				return rest.to_string();
			}
		}
		uri.to_string()
	}

	/// Translates a sandbox path back to an editor URI.
	pub fn to_editor(&self, path: &str) -> String {
		if let Some(root) = self.longest_match(path, |r| &r.sandbox) {
			let rest = &path[root.sandbox.len()..];
			return format!("{}{rest}", root.editor);
		}
		path.to_string()
	}

	fn longest_match<'a>(
		&'a self,
		input: &str,
		side: impl Fn(&AddressRoot) -> &String,
	) -> Option<&'a AddressRoot> {
		self.roots
			.iter()
			.filter(|root| input.starts_with(side(root).as_str()))
			.max_by_key(|root| side(root).len())
	}

	fn schemes_longest_first(&self) -> Vec<&String> {
		let mut schemes: Vec<&String> = self.schemes.iter().collect();
		schemes.sort_by_key(|s| std::cmp::Reverse(s.len()));
		schemes
	}
}

#[cfg(test)]
mod tests {
	use pretty_assertions::assert_eq;

	use super::*;

	fn map() -> AddressMap {
		AddressMap::new(vec![
			AddressRoot {
				editor: "file:///home/user/project".into(),
				sandbox: "/project".into(),
			},
			AddressRoot {
				editor: "file:///home/user/project/vendor".into(),
				sandbox: "/vendor".into(),
			},
		])
	}

	#[test]
	fn round_trips_under_a_known_root() {
		let map = map();
		let uri = "file:///home/user/project/shader.sl";
		assert_eq!(map.to_editor(&map.to_sandbox(uri)), uri);
	}

	#[test]
	fn prefers_the_longest_matching_root() {
		let map = map();
		assert_eq!(
			map.to_sandbox("file:///home/user/project/vendor/lib.sl"),
			"/vendor/lib.sl"
		);
	}

	#[test]
	fn strips_a_bare_scheme_when_no_root_matches() {
		let map = map();
		assert_eq!(map.to_sandbox("file:///tmp/scratch.sl"), "/tmp/scratch.sl");
	}

	#[test]
	fn unknown_addresses_pass_through() {
		let map = map();
		assert_eq!(map.to_sandbox("/already/stripped.sl"), "/already/stripped.sl");
		assert_eq!(map.to_editor("/elsewhere/a.sl"), "/elsewhere/a.sl");
	}

	#[test]
	fn inbound_locations_regain_the_editor_prefix() {
		let map = map();
		assert_eq!(
			map.to_editor("/project/deps/color.sl"),
			"file:///home/user/project/deps/color.sl"
		);
	}
}
