//! Document synchronization between the editor and the compiler sandbox.
//!
//! [`DocumentSync`] receives open/change/close notifications, keeps the
//! in-memory buffer authoritative, and re-materializes the mirror file
//! through the bridge on every change (the sandbox has no incremental
//! write). After each mutation the compiler-side document state is what
//! answers all subsequent queries.
//!
//! Each document's lifecycle is `Closed → Open → (Changed)* → Closed`.
//! Changes to one document are applied strictly in arrival order: the
//! per-document mutex is held from edit application through the module
//! notification, so two in-flight changes never interleave. Unrelated
//! documents synchronize concurrently.

use std::collections::HashSet;
use std::sync::Arc;

use parking_lot::Mutex;
use prism_primitives::{TextEdit, apply_edits};
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use crate::document::{DiagnosticsEvent, DiagnosticsSink, DiagnosticsStream, DocumentStore};
use crate::sandbox::VfsBridge;
use crate::service::CompilerService;
use crate::{Error, Result};

/// Synchronizes editor documents with their sandbox mirrors.
pub struct DocumentSync {
	service: Arc<CompilerService>,
	documents: Arc<DocumentStore>,
	/// Sandbox directories whose support module has been loaded.
	/// Deduplicates the once-per-directory load across documents.
	prelude_dirs: Mutex<HashSet<String>>,
	diagnostics: DiagnosticsSink,
}

impl DocumentSync {
	/// Creates a synchronizer and the stream its pushed diagnostics
	/// arrive on.
	pub fn new(service: Arc<CompilerService>) -> (Self, DiagnosticsStream) {
		let (sink, stream) = mpsc::unbounded_channel();
		let sync = Self {
			service,
			documents: Arc::new(DocumentStore::new()),
			prelude_dirs: Mutex::new(HashSet::new()),
			diagnostics: sink,
		};
		(sync, stream)
	}

	/// The open-document store.
	pub fn documents(&self) -> &DocumentStore {
		&self.documents
	}

	/// Opens a document: seeds the mirror, registers it with the
	/// module, and loads the containing directory's support module the
	/// first time that directory is seen.
	pub async fn open(&self, uri: &str, text: &str) -> Result<()> {
		let module = self.service.module().await?;
		let path = self.service.address().to_sandbox(uri);

		let bridge = VfsBridge::new(module.fs());
		bridge.ensure_path(&path)?;
		bridge.write(&path, text)?;
		module.open_document(&path, text).await?;
		self.documents.insert(uri, &path, text.to_string());
		info!(uri = %uri, path = %path, "opened document");

		let directory = parent_directory(&path);
		let first_visit = self.prelude_dirs.lock().insert(directory.to_string());
		if first_visit {
			debug!(directory = %directory, "loading support module");
			module.load_prelude(directory).await?;
		}

		self.publish_diagnostics(uri).await;
		Ok(())
	}

	/// Applies a batch of edits in array order, rewrites the mirror in
	/// full, and feeds the module the resulting text.
	///
	/// A batch whose edits fall outside the current buffer bounds fails
	/// with [`Error::Edit`] and leaves the buffer, the mirror, and the
	/// module state untouched.
	pub async fn change(&self, uri: &str, edits: &[TextEdit]) -> Result<()> {
		let entry = self
			.documents
			.get(uri)
			.ok_or_else(|| Error::DocumentNotOpen(uri.to_string()))?;

		let mut text = entry.text.lock().await;
		let updated = match apply_edits(&text, edits) {
			Ok(updated) => updated,
			Err(err) => {
				warn!(uri = %uri, error = %err, "rejecting out-of-bounds change batch");
				return Err(err.into());
			}
		};
		*text = updated;

		let module = self.service.module().await?;
		let bridge = VfsBridge::new(module.fs());
		bridge.write(&entry.sandbox_path, &text)?;
		module.update_document(&entry.sandbox_path, &text).await?;
		debug!(uri = %uri, edits = edits.len(), bytes = text.len(), "synchronized change");
		drop(text);

		self.publish_diagnostics(uri).await;
		Ok(())
	}

	/// Closes a document and drops its state.
	pub async fn close(&self, uri: &str) -> Result<()> {
		let Some(entry) = self.documents.remove(uri) else {
			return Ok(());
		};
		let module = self.service.module().await?;
		module.close_document(&entry.sandbox_path).await?;
		info!(uri = %uri, "closed document");
		Ok(())
	}

	/// Fetches current diagnostics and pushes them addressed to the
	/// editor URI. Failures inside the adapter surface as an empty
	/// list, never as stale diagnostics.
	async fn publish_diagnostics(&self, uri: &str) {
		let diagnostics = self.service.diagnostics(uri).await;
		let _ = self.diagnostics.send(DiagnosticsEvent {
			uri: uri.to_string(),
			diagnostics,
		});
	}
}

/// The directory portion of a sandbox path, `/` for root-level files.
fn parent_directory(path: &str) -> &str {
	match path.rsplit_once('/') {
		Some(("", _)) => "/",
		Some((dir, _)) => dir,
		None => "/",
	}
}
