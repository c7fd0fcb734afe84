//! Document synchronization and compiler-module adaptation.
//!
//! This crate keeps two representations of "the same file" consistent:
//! the editor's incrementally-edited document, and its mirror inside the
//! compiler module's virtual filesystem. It is organized as three
//! layers, leaves first:
//!
//! - [`sandbox`]: the virtual filesystem bridge over the module's own
//!   storage.
//! - [`service`]: the lazily-initialized [`CompilerService`] adapter,
//!   translating query results between editor and sandbox addressing.
//! - [`sync`]: the [`DocumentSync`] lifecycle handler applying
//!   open/change/close notifications and pushing diagnostics.
//!
//! The compiler itself is opaque behind [`module::CompilerModule`];
//! everything here is testable against an in-process mock.

pub mod config;
pub mod document;
pub mod module;
pub mod sandbox;
pub mod service;
pub mod sync;

pub use config::{PreloadFile, ServiceConfig};
pub use document::{DiagnosticsEvent, DiagnosticsSink, DiagnosticsStream, DocumentStore};
pub use module::{CompilerModule, ModuleLoader};
pub use sandbox::{MemoryFs, SandboxFs, VfsBridge};
pub use service::CompilerService;
pub use sync::DocumentSync;

/// A convenient type alias for `Result` with `E` = [`enum@crate::Error`].
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Possible errors.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum Error {
	/// The compiler module failed to instantiate. Initialization is
	/// retried on the next call rather than caching the failure.
	#[error("compiler module initialization failed: {0}")]
	Init(String),
	/// A call across the module boundary failed.
	#[error("compiler module call failed: {0}")]
	Module(String),
	/// The module reported a compilation failure. Always a returned
	/// value, never a panic, so callers can render it inline.
	#[error("{0}")]
	Compile(String),
	/// A sandbox file was read before ever being written.
	#[error("sandbox file not found: {0}")]
	NotFound(String),
	/// A sandbox filesystem operation failed.
	#[error("sandbox error: {0}")]
	Sandbox(String),
	/// A change notification arrived for a document that is not open.
	#[error("document not open: {0}")]
	DocumentNotOpen(String),
	/// An edit range fell outside the current document bounds.
	#[error(transparent)]
	Edit(#[from] prism_primitives::EditError),
}
