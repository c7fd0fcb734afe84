//! Compiler service adapter.
//!
//! [`CompilerService`] owns the process-wide compiler module instance.
//! Instantiation is lazy: the first caller triggers the load, concurrent
//! early callers await the same in-flight initialization, and a failed
//! load is retried by the next caller instead of being cached. There is
//! no teardown; the module lives until the process exits.
//!
//! Query operations are pure translations of one module result into the
//! editor-facing `lsp_types` shape. Address translation is bidirectional:
//! editor URI → sandbox path on the way out, sandbox path → editor URI on
//! every location in a result.

use std::str::FromStr;
use std::sync::Arc;

use lsp_types::Uri;
use prism_primitives::{AddressMap, Position};
use tokio::sync::OnceCell;
use tracing::{debug, info, warn};

use crate::config::ServiceConfig;
use crate::module::{
	CompilerModule, CompletionContext, ModuleCompileOutput, ModuleCompileRequest, ModuleCompletion,
	ModuleCompletionKind, ModuleDiagnostic, ModuleHover, ModuleLoader, ModuleSeverity,
	ModuleSignatureHelp, ModuleSymbol, ModuleSymbolKind,
};
use crate::sandbox::VfsBridge;
use crate::{Error, Result};

/// Lazily-initialized adapter over the compiler module.
pub struct CompilerService {
	loader: Arc<dyn ModuleLoader>,
	config: ServiceConfig,
	address: AddressMap,
	module: OnceCell<Arc<dyn CompilerModule>>,
}

impl CompilerService {
	/// Creates a service that will load the module on first use.
	pub fn new(loader: Arc<dyn ModuleLoader>, config: ServiceConfig) -> Self {
		let address = AddressMap::new(config.roots.clone());
		Self {
			loader,
			config,
			address,
			module: OnceCell::new(),
		}
	}

	/// The editor↔sandbox address map.
	pub fn address(&self) -> &AddressMap {
		&self.address
	}

	/// The configuration the service was initialized with, including
	/// the base resource location asset references resolve against.
	pub fn config(&self) -> &ServiceConfig {
		&self.config
	}

	/// Returns the module, instantiating it on first call.
	///
	/// Concurrent first callers share one in-flight initialization;
	/// exactly one load runs. On failure the cell stays empty and the
	/// next call retries.
	pub async fn module(&self) -> Result<Arc<dyn CompilerModule>> {
		self.module
			.get_or_try_init(|| async {
				let module = self
					.loader
					.load()
					.await
					.map_err(|err| Error::Init(err.to_string()))?;
				let bridge = VfsBridge::new(module.fs());
				for file in &self.config.preload {
					bridge.ensure_path(&file.path)?;
					bridge.write(&file.path, &file.content)?;
				}
				info!(preloaded = self.config.preload.len(), "compiler module initialized");
				Ok(module)
			})
			.await
			.cloned()
	}

	/// A bridge over the module's sandbox filesystem.
	pub async fn bridge(&self) -> Result<VfsBridge> {
		Ok(VfsBridge::new(self.module().await?.fs()))
	}

	/// Compiles through the module boundary. Thin pass-through used by
	/// the reflection pipeline; the request is already sandbox-addressed.
	pub async fn compile(&self, request: &ModuleCompileRequest) -> Result<ModuleCompileOutput> {
		self.module().await?.compile(request).await
	}

	/// Completion items at a position.
	pub async fn completion(
		&self,
		uri: &str,
		position: Position,
		context: CompletionContext,
	) -> Result<Vec<lsp_types::CompletionItem>> {
		let module = self.module().await?;
		let path = self.address.to_sandbox(uri);
		let items = module.completion(&path, position, context).await?;
		Ok(items.into_iter().map(completion_to_lsp).collect())
	}

	/// Hover information at a position.
	pub async fn hover(&self, uri: &str, position: Position) -> Result<Option<lsp_types::Hover>> {
		let module = self.module().await?;
		let path = self.address.to_sandbox(uri);
		Ok(module.hover(&path, position).await?.map(hover_to_lsp))
	}

	/// Definition sites for the symbol at a position. Locations in the
	/// result are re-addressed to editor URIs.
	pub async fn definition(
		&self,
		uri: &str,
		position: Position,
	) -> Result<Vec<lsp_types::Location>> {
		let module = self.module().await?;
		let path = self.address.to_sandbox(uri);
		let locations = module.definition(&path, position).await?;
		Ok(locations
			.into_iter()
			.filter_map(|loc| {
				let uri = self.editor_uri(&loc.path)?;
				Some(lsp_types::Location::new(uri, range_to_lsp(loc.range)))
			})
			.collect())
	}

	/// Signature help at a position.
	pub async fn signature_help(
		&self,
		uri: &str,
		position: Position,
	) -> Result<Option<lsp_types::SignatureHelp>> {
		let module = self.module().await?;
		let path = self.address.to_sandbox(uri);
		Ok(module
			.signature_help(&path, position)
			.await?
			.map(signature_help_to_lsp))
	}

	/// The document's symbol outline.
	pub async fn document_symbols(&self, uri: &str) -> Result<Vec<lsp_types::DocumentSymbol>> {
		let module = self.module().await?;
		let path = self.address.to_sandbox(uri);
		let symbols = module.document_symbols(&path).await?;
		Ok(symbols.into_iter().map(symbol_to_lsp).collect())
	}

	/// Current diagnostics for a document.
	///
	/// Infallible: any adapter failure yields an empty list so the
	/// editor never holds on to stale diagnostics.
	pub async fn diagnostics(&self, uri: &str) -> Vec<lsp_types::Diagnostic> {
		let path = self.address.to_sandbox(uri);
		let result = match self.module().await {
			Ok(module) => module.diagnostics(&path).await,
			Err(err) => Err(err),
		};
		match result {
			Ok(items) => items.into_iter().map(diagnostic_to_lsp).collect(),
			Err(err) => {
				warn!(uri = %uri, error = %err, "diagnostics fetch failed; delivering empty list");
				Vec::new()
			}
		}
	}

	/// Re-addresses a sandbox path as an editor `Uri`.
	///
	/// Translation is heuristic: unmapped paths are tried as-is and then
	/// with a `file://` scheme; a path that still does not form a URI is
	/// dropped with a log line rather than failing the whole result.
	fn editor_uri(&self, sandbox_path: &str) -> Option<Uri> {
		let mapped = self.address.to_editor(sandbox_path);
		if let Ok(uri) = Uri::from_str(&mapped) {
			return Some(uri);
		}
		if mapped.starts_with('/') {
			if let Ok(uri) = Uri::from_str(&format!("file://{mapped}")) {
				return Some(uri);
			}
		}
		debug!(path = %sandbox_path, "dropping location with untranslatable address");
		None
	}
}

fn position_to_lsp(position: Position) -> lsp_types::Position {
	lsp_types::Position {
		line: position.line,
		character: position.character,
	}
}

fn range_to_lsp(range: prism_primitives::Range) -> lsp_types::Range {
	lsp_types::Range {
		start: position_to_lsp(range.start),
		end: position_to_lsp(range.end),
	}
}

fn markdown(value: String) -> lsp_types::Documentation {
	lsp_types::Documentation::MarkupContent(lsp_types::MarkupContent {
		kind: lsp_types::MarkupKind::Markdown,
		value,
	})
}

fn completion_to_lsp(item: ModuleCompletion) -> lsp_types::CompletionItem {
	lsp_types::CompletionItem {
		label: item.label,
		kind: Some(completion_kind_to_lsp(item.kind)),
		detail: item.detail,
		documentation: item.documentation.map(markdown),
		..lsp_types::CompletionItem::default()
	}
}

fn completion_kind_to_lsp(kind: ModuleCompletionKind) -> lsp_types::CompletionItemKind {
	use lsp_types::CompletionItemKind as Lsp;
	match kind {
		ModuleCompletionKind::Function => Lsp::FUNCTION,
		ModuleCompletionKind::Method => Lsp::METHOD,
		ModuleCompletionKind::Variable => Lsp::VARIABLE,
		ModuleCompletionKind::Field => Lsp::FIELD,
		ModuleCompletionKind::Struct => Lsp::STRUCT,
		ModuleCompletionKind::Keyword => Lsp::KEYWORD,
		ModuleCompletionKind::Module => Lsp::MODULE,
		ModuleCompletionKind::Property => Lsp::PROPERTY,
		ModuleCompletionKind::Other => Lsp::TEXT,
	}
}

fn hover_to_lsp(hover: ModuleHover) -> lsp_types::Hover {
	lsp_types::Hover {
		contents: lsp_types::HoverContents::Markup(lsp_types::MarkupContent {
			kind: lsp_types::MarkupKind::Markdown,
			value: hover.contents,
		}),
		range: Some(range_to_lsp(hover.range)),
	}
}

fn signature_help_to_lsp(help: ModuleSignatureHelp) -> lsp_types::SignatureHelp {
	lsp_types::SignatureHelp {
		signatures: help
			.signatures
			.into_iter()
			.map(|sig| lsp_types::SignatureInformation {
				label: sig.label,
				documentation: sig.documentation.map(markdown),
				parameters: Some(
					sig.parameters
						.into_iter()
						.map(|label| lsp_types::ParameterInformation {
							label: lsp_types::ParameterLabel::Simple(label),
							documentation: None,
						})
						.collect(),
				),
				active_parameter: None,
			})
			.collect(),
		active_signature: Some(help.active_signature),
		active_parameter: Some(help.active_parameter),
	}
}

#[allow(deprecated, reason = "DocumentSymbol::deprecated must be populated")]
fn symbol_to_lsp(symbol: ModuleSymbol) -> lsp_types::DocumentSymbol {
	lsp_types::DocumentSymbol {
		name: symbol.name,
		detail: symbol.detail,
		kind: symbol_kind_to_lsp(symbol.kind),
		tags: None,
		deprecated: None,
		range: range_to_lsp(symbol.range),
		selection_range: range_to_lsp(symbol.selection_range),
		children: if symbol.children.is_empty() {
			None
		} else {
			Some(symbol.children.into_iter().map(symbol_to_lsp).collect())
		},
	}
}

fn symbol_kind_to_lsp(kind: ModuleSymbolKind) -> lsp_types::SymbolKind {
	use lsp_types::SymbolKind as Lsp;
	match kind {
		ModuleSymbolKind::Function => Lsp::FUNCTION,
		ModuleSymbolKind::Struct => Lsp::STRUCT,
		ModuleSymbolKind::Field => Lsp::FIELD,
		ModuleSymbolKind::Variable => Lsp::VARIABLE,
		ModuleSymbolKind::Constant => Lsp::CONSTANT,
		ModuleSymbolKind::Namespace => Lsp::NAMESPACE,
		ModuleSymbolKind::Other => Lsp::OBJECT,
	}
}

fn diagnostic_to_lsp(diagnostic: ModuleDiagnostic) -> lsp_types::Diagnostic {
	lsp_types::Diagnostic {
		range: range_to_lsp(diagnostic.range),
		severity: Some(match diagnostic.severity {
			ModuleSeverity::Error => lsp_types::DiagnosticSeverity::ERROR,
			ModuleSeverity::Warning => lsp_types::DiagnosticSeverity::WARNING,
			ModuleSeverity::Information => lsp_types::DiagnosticSeverity::INFORMATION,
			ModuleSeverity::Hint => lsp_types::DiagnosticSeverity::HINT,
		}),
		code: diagnostic.code.map(lsp_types::NumberOrString::String),
		message: diagnostic.message,
		..lsp_types::Diagnostic::default()
	}
}

#[cfg(test)]
mod tests {
	use std::sync::atomic::{AtomicUsize, Ordering};

	use async_trait::async_trait;
	use prism_primitives::{AddressRoot, Range};
	use pretty_assertions::assert_eq;

	use super::*;
	use crate::module::ModuleLocation;
	use crate::sandbox::{MemoryFs, SandboxFs};

	struct StaticModule {
		fs: Arc<MemoryFs>,
		definitions: Vec<ModuleLocation>,
		fail_diagnostics: bool,
	}

	#[async_trait]
	impl CompilerModule for StaticModule {
		fn fs(&self) -> Arc<dyn SandboxFs> {
			self.fs.clone()
		}

		async fn open_document(&self, _path: &str, _text: &str) -> Result<()> {
			Ok(())
		}

		async fn update_document(&self, _path: &str, _text: &str) -> Result<()> {
			Ok(())
		}

		async fn close_document(&self, _path: &str) -> Result<()> {
			Ok(())
		}

		async fn definition(&self, _path: &str, _position: Position) -> Result<Vec<ModuleLocation>> {
			Ok(self.definitions.clone())
		}

		async fn diagnostics(&self, _path: &str) -> Result<Vec<crate::module::ModuleDiagnostic>> {
			if self.fail_diagnostics {
				return Err(Error::Module("diagnostics unavailable".to_string()));
			}
			Ok(Vec::new())
		}

		async fn compile(&self, _request: &ModuleCompileRequest) -> Result<ModuleCompileOutput> {
			Err(Error::Module("compile not supported".to_string()))
		}
	}

	struct CountingLoader {
		loads: AtomicUsize,
		fail_first: AtomicUsize,
		definitions: Vec<ModuleLocation>,
		fail_diagnostics: bool,
	}

	impl CountingLoader {
		fn new() -> Self {
			Self {
				loads: AtomicUsize::new(0),
				fail_first: AtomicUsize::new(0),
				definitions: Vec::new(),
				fail_diagnostics: false,
			}
		}
	}

	#[async_trait]
	impl ModuleLoader for CountingLoader {
		async fn load(&self) -> Result<Arc<dyn CompilerModule>> {
			self.loads.fetch_add(1, Ordering::SeqCst);
			if self.fail_first.load(Ordering::SeqCst) > 0 {
				self.fail_first.fetch_sub(1, Ordering::SeqCst);
				return Err(Error::Init("module unavailable".to_string()));
			}
			Ok(Arc::new(StaticModule {
				fs: Arc::new(MemoryFs::new()),
				definitions: self.definitions.clone(),
				fail_diagnostics: self.fail_diagnostics,
			}))
		}
	}

	fn workspace_config() -> ServiceConfig {
		ServiceConfig {
			roots: vec![AddressRoot {
				editor: "file:///ws".to_string(),
				sandbox: "/ws".to_string(),
			}],
			..ServiceConfig::default()
		}
	}

	#[tokio::test]
	async fn concurrent_first_calls_instantiate_once() {
		let loader = Arc::new(CountingLoader::new());
		let service = Arc::new(CompilerService::new(loader.clone(), ServiceConfig::default()));

		let (a, b) = tokio::join!(service.module(), service.module());
		assert!(a.is_ok());
		assert!(b.is_ok());
		assert_eq!(loader.loads.load(Ordering::SeqCst), 1);
	}

	#[tokio::test]
	async fn failed_initialization_is_retried() {
		let loader = Arc::new(CountingLoader::new());
		loader.fail_first.store(1, Ordering::SeqCst);
		let service = CompilerService::new(loader.clone(), ServiceConfig::default());

		assert!(matches!(service.module().await, Err(Error::Init(_))));
		assert!(service.module().await.is_ok());
		assert_eq!(loader.loads.load(Ordering::SeqCst), 2);
	}

	#[tokio::test]
	async fn preload_manifest_lands_in_the_sandbox() {
		let loader = Arc::new(CountingLoader::new());
		let config = ServiceConfig {
			preload: vec![crate::config::PreloadFile {
				path: "/ws/deps/prelude.sl".to_string(),
				content: "module prelude;".to_string(),
			}],
			..workspace_config()
		};
		let service = CompilerService::new(loader, config);

		let bridge = service.bridge().await.unwrap();
		assert_eq!(bridge.read("/ws/deps/prelude.sl").unwrap(), "module prelude;");
	}

	#[tokio::test]
	async fn definition_results_are_readdressed_to_editor_uris() {
		let mut loader = CountingLoader::new();
		loader.definitions = vec![ModuleLocation {
			path: "/ws/deps/color.sl".to_string(),
			range: Range::point(Position::new(3, 4)),
		}];
		let service = CompilerService::new(Arc::new(loader), workspace_config());

		let locations = service
			.definition("file:///ws/main.sl", Position::new(0, 0))
			.await
			.unwrap();
		assert_eq!(locations.len(), 1);
		assert_eq!(locations[0].uri.as_str(), "file:///ws/deps/color.sl");
		assert_eq!(locations[0].range.start.line, 3);
	}

	#[tokio::test]
	async fn diagnostics_failures_deliver_an_empty_list() {
		let mut loader = CountingLoader::new();
		loader.fail_diagnostics = true;
		let service = CompilerService::new(Arc::new(loader), workspace_config());

		let diagnostics = service.diagnostics("file:///ws/main.sl").await;
		assert!(diagnostics.is_empty());
	}
}
