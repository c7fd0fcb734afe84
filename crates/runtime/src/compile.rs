//! The reflection compile pipeline.
//!
//! One successful compile yields generated code in the requested target
//! form, a parameter layout, the hashed-string table, full reflection
//! metadata, and per-entry-point work-group sizes. Failures are values
//! carrying the compiler's message; nothing here panics on bad input.

use std::collections::HashMap;
use std::str::FromStr;

use prism_service::module::{CompilerModule, ModuleCompileRequest};
use tracing::debug;

use crate::reflect::Reflection;
use crate::{Error, Result};

/// Message reported when a binary artifact cannot be turned into text.
const DISASSEMBLY_FAILED: &str = "failed to disassemble compiled code";

/// Compile targets the pipeline can request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CompileTarget {
	Wgsl,
	Hlsl,
	Glsl,
	Metal,
	SpirV,
	Cuda,
}

impl CompileTarget {
	/// The module-protocol identifier for this target.
	pub const fn as_str(self) -> &'static str {
		match self {
			Self::Wgsl => "WGSL",
			Self::Hlsl => "HLSL",
			Self::Glsl => "GLSL",
			Self::Metal => "METAL",
			Self::SpirV => "SPIRV",
			Self::Cuda => "CUDA",
		}
	}

	/// Whether the target produces byte code that needs disassembly
	/// before it is human-readable.
	pub const fn is_binary(self) -> bool {
		matches!(self, Self::SpirV)
	}
}

impl FromStr for CompileTarget {
	type Err = Error;

	fn from_str(s: &str) -> Result<Self> {
		match s.to_ascii_uppercase().as_str() {
			"WGSL" => Ok(Self::Wgsl),
			"HLSL" => Ok(Self::Hlsl),
			"GLSL" => Ok(Self::Glsl),
			"METAL" => Ok(Self::Metal),
			"SPIRV" => Ok(Self::SpirV),
			"CUDA" => Ok(Self::Cuda),
			other => Err(Error::Compile(format!("unknown compile target `{other}`"))),
		}
	}
}

impl std::fmt::Display for CompileTarget {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.write_str(self.as_str())
	}
}

/// One compile invocation.
#[derive(Debug, Clone)]
pub struct CompileRequest {
	/// Requested target form.
	pub target: CompileTarget,
	/// Explicit entry point, when the target needs one.
	pub entry_point: Option<String>,
	/// Full source text.
	pub source: String,
	/// Sandbox path of the source file.
	pub path: String,
	/// When set, the result is for display only and no dispatch plan
	/// will be derived from it.
	pub display_only: bool,
}

/// Everything a successful compile produces.
#[derive(Debug, Clone)]
pub struct CompileOutput {
	/// Generated code in the requested target form, disassembled to
	/// text for binary targets.
	pub code: String,
	/// Human-readable parameter layout.
	pub layout: String,
	/// Strings hashed at compile time.
	pub hashed_strings: HashMap<String, u32>,
	/// Full reflection metadata.
	pub reflection: Reflection,
	/// Work-group sizes keyed by entry point name.
	pub thread_group_sizes: HashMap<String, [u32; 3]>,
}

/// Compiles `request` through the module and shapes the result.
///
/// For binary targets a second disassembly call replaces the raw code;
/// a disassembly failure is reported as a compile failure with a fixed
/// message, not as a partial success.
pub async fn compile(module: &dyn CompilerModule, request: &CompileRequest) -> Result<CompileOutput> {
	let module_request = ModuleCompileRequest {
		target: request.target.as_str().to_string(),
		entry_point: request.entry_point.clone(),
		source: request.source.clone(),
		path: request.path.clone(),
	};

	let raw = match module.compile(&module_request).await {
		Ok(raw) => raw,
		Err(prism_service::Error::Compile(message)) => return Err(Error::Compile(message)),
		Err(err) => return Err(err.into()),
	};

	let reflection: Reflection = serde_json::from_value(raw.reflection)?;

	let code = if request.target.is_binary() {
		match module.disassemble(&raw.code).await {
			Ok(text) => text,
			Err(_) => return Err(Error::Compile(DISASSEMBLY_FAILED.to_string())),
		}
	} else {
		String::from_utf8_lossy(&raw.code).into_owned()
	};

	debug!(
		target = %request.target,
		entry_points = reflection.entry_points.len(),
		parameters = reflection.parameters.len(),
		"compile succeeded"
	);

	Ok(CompileOutput {
		code,
		layout: raw.layout,
		hashed_strings: reflection.hashed_strings.clone(),
		thread_group_sizes: reflection.thread_group_sizes(),
		reflection,
	})
}

/// Discovers entry point names without compiling.
///
/// Side-effect-free; used to populate a selection prompt before a
/// compile that needs an explicit entry point.
pub async fn find_entry_points(
	module: &dyn CompilerModule,
	source: &str,
	path: &str,
) -> Result<Vec<String>> {
	Ok(module.find_entry_points(source, path).await?)
}
