//! The compiler-module boundary.
//!
//! The shading-language compiler is an opaque in-process service with
//! its own addressing scheme and its own filesystem. [`CompilerModule`]
//! is the full surface this crate relies on; [`ModuleLoader`] produces
//! the process-wide instance on first use.
//!
//! Result shapes here are sandbox-addressed and use native ordered
//! `Vec`s. Implementations that wrap a foreign `size()`/`get(i)`
//! accessor pair must convert it to a `Vec` before returning; the
//! accessor pattern stops at this boundary.

use std::sync::Arc;

use async_trait::async_trait;
use prism_primitives::{Position, Range};

use crate::sandbox::SandboxFs;
use crate::{Error, Result};

/// Completion request context forwarded from the editor.
#[derive(Debug, Clone, Default)]
pub struct CompletionContext {
	/// The character that triggered completion, if any.
	pub trigger_character: Option<String>,
}

/// Completion item kind at the module boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModuleCompletionKind {
	Function,
	Method,
	Variable,
	Field,
	Struct,
	Keyword,
	Module,
	Property,
	Other,
}

/// One completion item produced by the module.
#[derive(Debug, Clone)]
pub struct ModuleCompletion {
	/// Label shown in the editor list.
	pub label: String,
	/// Item kind.
	pub kind: ModuleCompletionKind,
	/// Short type or signature text.
	pub detail: Option<String>,
	/// Markdown documentation body.
	pub documentation: Option<String>,
}

/// Hover result: markdown contents over a source range.
#[derive(Debug, Clone)]
pub struct ModuleHover {
	/// Markdown body.
	pub contents: String,
	/// The range the hover applies to.
	pub range: Range,
}

/// A sandbox-addressed source location.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModuleLocation {
	/// Sandbox path of the containing file.
	pub path: String,
	/// Range within that file.
	pub range: Range,
}

/// Signature help for the call under the cursor.
#[derive(Debug, Clone)]
pub struct ModuleSignatureHelp {
	/// Candidate signatures.
	pub signatures: Vec<ModuleSignature>,
	/// Index of the active signature.
	pub active_signature: u32,
	/// Index of the active parameter.
	pub active_parameter: u32,
}

/// One candidate signature.
#[derive(Debug, Clone)]
pub struct ModuleSignature {
	/// Full signature label.
	pub label: String,
	/// Markdown documentation body.
	pub documentation: Option<String>,
	/// Parameter labels, as substrings of `label`.
	pub parameters: Vec<String>,
}

/// Symbol kind at the module boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModuleSymbolKind {
	Function,
	Struct,
	Field,
	Variable,
	Constant,
	Namespace,
	Other,
}

/// One entry in the document symbol outline.
#[derive(Debug, Clone)]
pub struct ModuleSymbol {
	/// Symbol name.
	pub name: String,
	/// Short type or signature text.
	pub detail: Option<String>,
	/// Symbol kind.
	pub kind: ModuleSymbolKind,
	/// Full range of the symbol.
	pub range: Range,
	/// Range of the identifier itself.
	pub selection_range: Range,
	/// Nested symbols.
	pub children: Vec<ModuleSymbol>,
}

/// Diagnostic severity at the module boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModuleSeverity {
	Error,
	Warning,
	Information,
	Hint,
}

/// One diagnostic produced by the module.
#[derive(Debug, Clone)]
pub struct ModuleDiagnostic {
	/// Human-readable message.
	pub message: String,
	/// Severity.
	pub severity: ModuleSeverity,
	/// Range the diagnostic covers.
	pub range: Range,
	/// Optional diagnostic code.
	pub code: Option<String>,
}

/// Compile request at the module boundary, sandbox-addressed.
#[derive(Debug, Clone)]
pub struct ModuleCompileRequest {
	/// Module-protocol target identifier.
	pub target: String,
	/// Explicit entry point, when the target needs one.
	pub entry_point: Option<String>,
	/// Full source text.
	pub source: String,
	/// Sandbox path of the source file.
	pub path: String,
}

/// Successful compile result at the module boundary.
#[derive(Debug, Clone)]
pub struct ModuleCompileOutput {
	/// Generated code: UTF-8 text for textual targets, raw bytes for
	/// binary ones.
	pub code: Vec<u8>,
	/// Human-readable parameter layout.
	pub layout: String,
	/// Reflection metadata as the module's JSON document.
	pub reflection: serde_json::Value,
}

/// The opaque compiler/language-service instance.
///
/// Query operations are pure: they never mutate module state. Document
/// notifications are the only mutations, and arrive already sequenced
/// per document by [`crate::sync::DocumentSync`].
///
/// Optional capabilities default to empty results; a module that cannot
/// disassemble reports [`Error::Module`].
#[async_trait]
pub trait CompilerModule: Send + Sync {
	/// The module's sandbox filesystem.
	fn fs(&self) -> Arc<dyn SandboxFs>;

	/// Registers a document at its sandbox path.
	async fn open_document(&self, path: &str, text: &str) -> Result<()>;

	/// Replaces a registered document's content in full.
	async fn update_document(&self, path: &str, text: &str) -> Result<()>;

	/// Unregisters a document.
	async fn close_document(&self, path: &str) -> Result<()>;

	/// Loads the implicitly-imported support module for `directory`.
	/// Called at most once per directory.
	async fn load_prelude(&self, directory: &str) -> Result<()> {
		let _ = directory;
		Ok(())
	}

	/// Completion items at a position.
	async fn completion(
		&self,
		path: &str,
		position: Position,
		context: CompletionContext,
	) -> Result<Vec<ModuleCompletion>> {
		let _ = (path, position, context);
		Ok(Vec::new())
	}

	/// Hover information at a position.
	async fn hover(&self, path: &str, position: Position) -> Result<Option<ModuleHover>> {
		let _ = (path, position);
		Ok(None)
	}

	/// Definition sites for the symbol at a position. Locations may
	/// point into other sandbox files.
	async fn definition(&self, path: &str, position: Position) -> Result<Vec<ModuleLocation>> {
		let _ = (path, position);
		Ok(Vec::new())
	}

	/// Signature help at a position.
	async fn signature_help(
		&self,
		path: &str,
		position: Position,
	) -> Result<Option<ModuleSignatureHelp>> {
		let _ = (path, position);
		Ok(None)
	}

	/// The document's symbol outline.
	async fn document_symbols(&self, path: &str) -> Result<Vec<ModuleSymbol>> {
		let _ = path;
		Ok(Vec::new())
	}

	/// Current diagnostics for a document.
	async fn diagnostics(&self, path: &str) -> Result<Vec<ModuleDiagnostic>> {
		let _ = path;
		Ok(Vec::new())
	}

	/// Compiles a program. Compilation failures are returned as
	/// [`Error::Compile`] with a human-readable message.
	async fn compile(&self, request: &ModuleCompileRequest) -> Result<ModuleCompileOutput>;

	/// Discovers entry point names without compiling. Side-effect-free.
	async fn find_entry_points(&self, source: &str, path: &str) -> Result<Vec<String>> {
		let _ = (source, path);
		Ok(Vec::new())
	}

	/// Disassembles one compiled binary artifact into text.
	async fn disassemble(&self, code: &[u8]) -> Result<String> {
		let _ = code;
		Err(Error::Module("disassembly not supported".to_string()))
	}
}

/// Produces the process-wide [`CompilerModule`] instance.
///
/// Invoked lazily by [`crate::service::CompilerService`]; at most one
/// load is in flight at a time, and a failed load is retried on the
/// next call.
#[async_trait]
pub trait ModuleLoader: Send + Sync {
	/// Instantiates the compiler module.
	async fn load(&self) -> Result<Arc<dyn CompilerModule>>;
}
