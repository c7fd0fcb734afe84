//! Open-document state tracking.
//!
//! One [`DocumentEntry`] exists per open editor document, created on
//! open and destroyed on close. The synchronizer is the sole mutator of
//! the text; the per-document async mutex is what sequences a
//! document's changes without blocking unrelated documents.

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::RwLock;
use tokio::sync::mpsc;

/// State for a single open document.
#[derive(Debug)]
pub struct DocumentEntry {
	/// The editor-side URI the document was opened under.
	pub editor_uri: String,
	/// The translated sandbox path of the mirror.
	pub sandbox_path: String,
	/// Current full text. Locked for the whole of a change
	/// application so two in-flight changes never interleave.
	pub text: tokio::sync::Mutex<String>,
}

/// Map of open documents keyed by editor URI.
///
/// Thread-safe; shared across async tasks via `Arc`.
#[derive(Default)]
pub struct DocumentStore {
	entries: RwLock<HashMap<String, Arc<DocumentEntry>>>,
}

impl DocumentStore {
	/// Creates an empty store.
	pub fn new() -> Self {
		Self::default()
	}

	/// Registers a document, replacing any previous entry for the URI.
	pub fn insert(&self, editor_uri: &str, sandbox_path: &str, text: String) -> Arc<DocumentEntry> {
		let entry = Arc::new(DocumentEntry {
			editor_uri: editor_uri.to_string(),
			sandbox_path: sandbox_path.to_string(),
			text: tokio::sync::Mutex::new(text),
		});
		self.entries
			.write()
			.insert(editor_uri.to_string(), entry.clone());
		entry
	}

	/// Looks up an open document.
	pub fn get(&self, editor_uri: &str) -> Option<Arc<DocumentEntry>> {
		self.entries.read().get(editor_uri).cloned()
	}

	/// Removes a document, returning its entry if it was open.
	pub fn remove(&self, editor_uri: &str) -> Option<Arc<DocumentEntry>> {
		self.entries.write().remove(editor_uri)
	}

	/// Whether a document is open.
	pub fn contains(&self, editor_uri: &str) -> bool {
		self.entries.read().contains_key(editor_uri)
	}

	/// Number of open documents.
	pub fn len(&self) -> usize {
		self.entries.read().len()
	}

	/// Whether no documents are open.
	pub fn is_empty(&self) -> bool {
		self.entries.read().is_empty()
	}
}

/// Diagnostics pushed after a change, addressed to the editor URI.
#[derive(Debug, Clone)]
pub struct DiagnosticsEvent {
	/// Editor URI of the document the diagnostics belong to.
	pub uri: String,
	/// Current diagnostics; empty clears previous ones.
	pub diagnostics: Vec<lsp_types::Diagnostic>,
}

/// Sender half for pushed diagnostics.
pub type DiagnosticsSink = mpsc::UnboundedSender<DiagnosticsEvent>;

/// Receiver half for pushed diagnostics.
pub type DiagnosticsStream = mpsc::UnboundedReceiver<DiagnosticsEvent>;

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn insert_replaces_previous_entry() {
		let store = DocumentStore::new();
		store.insert("file:///a.sl", "/a.sl", "one".to_string());
		store.insert("file:///a.sl", "/a.sl", "two".to_string());
		assert_eq!(store.len(), 1);

		let entry = store.get("file:///a.sl").unwrap();
		assert_eq!(entry.text.try_lock().unwrap().as_str(), "two");
	}

	#[test]
	fn remove_returns_the_entry() {
		let store = DocumentStore::new();
		store.insert("file:///a.sl", "/a.sl", String::new());
		let entry = store.remove("file:///a.sl").unwrap();
		assert_eq!(entry.sandbox_path, "/a.sl");
		assert!(store.is_empty());
	}
}
