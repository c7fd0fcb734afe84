//! Incremental text edits and their application.
//!
//! Editors describe document changes as a sequence of range replacements.
//! [`apply_edits`] replays such a sequence against a buffer, each edit
//! addressing the text produced by the previous one. Batches are never
//! reordered or coalesced; the result must be byte-identical to applying
//! the edits one by one in the order given.

use serde::{Deserialize, Serialize};

use crate::position::{Position, Range};

/// A single range replacement.
///
/// An edit without a range replaces the entire document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextEdit {
	/// The range to replace, in pre-edit coordinates. `None` replaces
	/// the whole document.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub range: Option<Range>,
	/// Replacement text; may span multiple lines.
	pub text: String,
}

impl TextEdit {
	/// Creates an edit replacing the entire document.
	pub fn full(text: impl Into<String>) -> Self {
		Self {
			range: None,
			text: text.into(),
		}
	}

	/// Creates an edit replacing a range.
	pub fn replace(range: Range, text: impl Into<String>) -> Self {
		Self {
			range: Some(range),
			text: text.into(),
		}
	}
}

/// Structural failure while applying an edit.
///
/// Coordinates are validated before any text is touched; a failing edit
/// never partially mutates the buffer.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EditError {
	/// A position points past the end of a line or past the last line.
	#[error("position {position} is outside the document")]
	OutOfBounds {
		/// The offending position.
		position: Position,
	},
	/// The range's end precedes its start.
	#[error("range end {end} precedes start {start}")]
	ReversedRange {
		/// Range start.
		start: Position,
		/// Range end.
		end: Position,
	},
}

/// Applies a single edit to `text`, returning the new buffer.
pub fn apply_edit(text: &str, edit: &TextEdit) -> Result<String, EditError> {
	let Some(range) = edit.range else {
		return Ok(edit.text.clone());
	};

	if range.end < range.start {
		return Err(EditError::ReversedRange {
			start: range.start,
			end: range.end,
		});
	}

	let start = resolve(text, range.start)?;
	let end = resolve(text, range.end)?;

	let mut out = String::with_capacity(text.len() - (end - start) + edit.text.len());
	out.push_str(&text[..start]);
	out.push_str(&edit.text);
	out.push_str(&text[end..]);
	Ok(out)
}

/// Applies `edits` in array order, each against the buffer produced by
/// the previous one.
pub fn apply_edits(text: &str, edits: &[TextEdit]) -> Result<String, EditError> {
	let mut buffer = text.to_owned();
	for edit in edits {
		buffer = apply_edit(&buffer, edit)?;
	}
	Ok(buffer)
}

/// Resolves a line/character position to a byte offset into `text`.
///
/// A character offset equal to the line's length addresses the position
/// just before the line break (or end of text on the last line).
fn resolve(text: &str, position: Position) -> Result<usize, EditError> {
	let out_of_bounds = || EditError::OutOfBounds { position };

	let mut line_start = 0usize;
	for _ in 0..position.line {
		match text[line_start..].find('\n') {
			Some(i) => line_start += i + 1,
			None => return Err(out_of_bounds()),
		}
	}

	let line_end = text[line_start..]
		.find('\n')
		.map_or(text.len(), |i| line_start + i);
	let line = &text[line_start..line_end];

	if position.character == 0 {
		return Ok(line_start);
	}

	let mut seen = 0u32;
	for (offset, _) in line.char_indices() {
		if seen == position.character {
			return Ok(line_start + offset);
		}
		seen += 1;
	}
	if seen == position.character {
		return Ok(line_end);
	}
	Err(out_of_bounds())
}
