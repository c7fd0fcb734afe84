//! Shared primitives for the prism workspace.
//!
//! Line/character coordinates, incremental text edits, and the
//! editor↔sandbox address map. Everything here is synchronous and
//! dependency-light so the layers above stay independently testable.

pub mod address;
pub mod edit;
pub mod position;

pub use address::{AddressMap, AddressRoot};
pub use edit::{EditError, TextEdit, apply_edit, apply_edits};
pub use position::{Position, Range};
