//! Service configuration.

use prism_primitives::AddressRoot;
use serde::{Deserialize, Serialize};

/// A file to mirror into the sandbox before the first compile.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PreloadFile {
	/// Sandbox path.
	pub path: String,
	/// Full file content.
	pub content: String,
}

/// Configuration carried by the initialization payload.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceConfig {
	/// Base resource location for assets referenced by programs.
	#[serde(default)]
	pub base_location: Option<String>,
	/// Workspace roots to strip when translating editor URIs to
	/// sandbox paths.
	#[serde(default)]
	pub roots: Vec<AddressRoot>,
	/// Files to mirror into the sandbox during initialization.
	#[serde(default)]
	pub preload: Vec<PreloadFile>,
}
