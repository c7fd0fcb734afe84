//! Virtual filesystem bridge.
//!
//! The compiler module owns a self-contained file store, isolated from
//! the editor's real filesystem. [`VfsBridge`] mirrors editor-visible
//! files into it through the [`SandboxFs`] primitives the module
//! exposes. Sandbox state is process-wide and has no teardown; it lives
//! exactly as long as the hosting process.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use parking_lot::RwLock;
use tracing::trace;

use crate::{Error, Result};

/// Filesystem primitives presented by the compiler module's sandbox.
pub trait SandboxFs: Send + Sync {
	/// Creates a single directory. Creating an existing directory is
	/// not an error.
	fn create_directory(&self, path: &str) -> Result<()>;

	/// Whether a file or directory exists at `path`.
	fn exists(&self, path: &str) -> bool;

	/// Reads a file's content.
	fn read(&self, path: &str) -> Result<String>;

	/// Creates or overwrites a file. Overwrite is the common case for
	/// synchronization and must not fail.
	fn write(&self, path: &str, content: &str) -> Result<()>;
}

/// Mirror of editor-visible files inside the compiler sandbox.
#[derive(Clone)]
pub struct VfsBridge {
	fs: Arc<dyn SandboxFs>,
}

impl VfsBridge {
	/// Creates a bridge over the given sandbox filesystem.
	pub fn new(fs: Arc<dyn SandboxFs>) -> Self {
		Self { fs }
	}

	/// Creates every missing ancestor directory of `path`. Idempotent.
	pub fn ensure_path(&self, path: &str) -> Result<()> {
		let mut prefix = String::new();
		let Some((ancestors, _file)) = path.rsplit_once('/') else {
			return Ok(());
		};
		for segment in ancestors.split('/') {
			if segment.is_empty() {
				continue;
			}
			prefix.push('/');
			prefix.push_str(segment);
			if !self.fs.exists(&prefix) {
				trace!(directory = %prefix, "creating sandbox directory");
				self.fs.create_directory(&prefix)?;
			}
		}
		Ok(())
	}

	/// Creates or overwrites the file at `path` with `content`.
	pub fn write(&self, path: &str, content: &str) -> Result<()> {
		self.fs.write(path, content)
	}

	/// Reads the file at `path`; fails with [`Error::NotFound`] if it
	/// was never written.
	pub fn read(&self, path: &str) -> Result<String> {
		self.fs.read(path)
	}

	/// Whether `path` exists in the sandbox.
	pub fn exists(&self, path: &str) -> bool {
		self.fs.exists(path)
	}
}

/// In-process [`SandboxFs`] backed by maps.
///
/// Stands in for the module sandbox in tests and holds pre-module
/// content for embedders that mirror files before the compiler is
/// instantiated.
#[derive(Default)]
pub struct MemoryFs {
	files: RwLock<HashMap<String, String>>,
	directories: RwLock<HashSet<String>>,
}

impl MemoryFs {
	/// Creates an empty filesystem.
	pub fn new() -> Self {
		Self::default()
	}

	/// Number of files currently stored.
	pub fn file_count(&self) -> usize {
		self.files.read().len()
	}
}

impl SandboxFs for MemoryFs {
	fn create_directory(&self, path: &str) -> Result<()> {
		self.directories.write().insert(path.to_string());
		Ok(())
	}

	fn exists(&self, path: &str) -> bool {
		self.files.read().contains_key(path) || self.directories.read().contains(path)
	}

	fn read(&self, path: &str) -> Result<String> {
		self.files
			.read()
			.get(path)
			.cloned()
			.ok_or_else(|| Error::NotFound(path.to_string()))
	}

	fn write(&self, path: &str, content: &str) -> Result<()> {
		self.files
			.write()
			.insert(path.to_string(), content.to_string());
		Ok(())
	}
}
