//! Wire message shapes.
//!
//! Requests expect a response; notifications do not. Diagnostics flow
//! the other way: they are pushed after each change, addressed to the
//! original editor URI, never pulled.

use std::collections::HashMap;

use prism_primitives::{Position, TextEdit};
use prism_runtime::{CallCommand, Reflection, ResourceCommand, UniformController};
use serde::{Deserialize, Serialize};

pub use prism_service::config::ServiceConfig as InitializeParams;

/// An incoming request.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "method", content = "params", rename_all = "camelCase")]
pub enum Request {
	/// Compile a program; see [`crate::workbench::Workbench::compile`].
	Compile(CompileParams),
	/// Discover entry point names without compiling.
	Entrypoints(EntrypointsParams),
	/// Completion items at a position.
	Completion(CompletionParams),
	/// Hover information at a position.
	Hover(TextPositionParams),
	/// Definition sites for the symbol at a position.
	Definition(TextPositionParams),
	/// Signature help at a position.
	SignatureHelp(TextPositionParams),
	/// The document's symbol outline.
	DocumentSymbols(DocumentParams),
}

/// An incoming document lifecycle notification.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "method", content = "params", rename_all = "camelCase")]
pub enum Notification {
	/// A document was opened in the editor.
	#[serde(rename_all = "camelCase")]
	DidOpen {
		/// Editor URI.
		uri: String,
		/// Full initial text.
		text: String,
	},
	/// A document changed; edits apply in array order.
	#[serde(rename_all = "camelCase")]
	DidChange {
		/// Editor URI.
		uri: String,
		/// Range edits in application order.
		edits: Vec<TextEdit>,
	},
	/// A document was closed.
	#[serde(rename_all = "camelCase")]
	DidClose {
		/// Editor URI.
		uri: String,
	},
}

/// An outbound push notification.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "method", content = "params", rename_all = "camelCase")]
pub enum ServerNotification {
	/// Current diagnostics for a document; an empty list clears them.
	#[serde(rename_all = "camelCase")]
	Diagnostics {
		/// Editor URI the diagnostics belong to.
		uri: String,
		/// The diagnostics.
		diagnostics: Vec<lsp_types::Diagnostic>,
	},
}

impl From<prism_service::DiagnosticsEvent> for ServerNotification {
	fn from(event: prism_service::DiagnosticsEvent) -> Self {
		Self::Diagnostics {
			uri: event.uri,
			diagnostics: event.diagnostics,
		}
	}
}

/// Parameters of a compile request.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompileParams {
	/// Compile target identifier, e.g. `WGSL`.
	pub target: String,
	/// Entry point name; empty when the module should use all of them.
	#[serde(default)]
	pub entrypoint: String,
	/// Full source text.
	pub source_code: String,
	/// Editor URI of the source file.
	pub shader_path: String,
	/// When true, skip runtime shaping: the result is display-only and
	/// carries no dispatch commands.
	#[serde(default, rename = "noWebGPU")]
	pub no_webgpu: bool,
}

/// Parameters of an entry-point discovery request.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EntrypointsParams {
	/// Full source text.
	pub source_code: String,
	/// Editor URI of the source file.
	pub shader_path: String,
}

/// A document/position pair.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TextPositionParams {
	/// Editor URI.
	pub uri: String,
	/// Position within the document.
	pub position: Position,
}

/// Completion parameters: a position plus optional trigger context.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompletionParams {
	/// Editor URI.
	pub uri: String,
	/// Position within the document.
	pub position: Position,
	/// Trigger context, when the editor supplies one.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub context: Option<CompletionContextParams>,
}

/// Completion trigger context.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompletionContextParams {
	/// The character that triggered completion, if any.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub trigger_character: Option<String>,
}

/// A bare document reference.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentParams {
	/// Editor URI.
	pub uri: String,
}

/// Response to a compile request. Failures are values with a
/// human-readable message, rendered inline by the editor side.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "camelCase")]
pub enum CompileResponse {
	/// The compile succeeded.
	Success(Box<CompileSuccess>),
	/// The compile failed.
	#[serde(rename_all = "camelCase")]
	Failure {
		/// Why, in the compiler's words.
		message: String,
	},
}

/// Payload of a successful compile.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompileSuccess {
	/// Generated code in the requested target form.
	pub code: String,
	/// Human-readable parameter layout.
	pub layout: String,
	/// Strings hashed at compile time.
	pub hashed_strings: HashMap<String, u32>,
	/// Full reflection metadata.
	pub reflection: Reflection,
	/// Work-group sizes keyed by entry point name.
	pub thread_group_sizes: HashMap<String, [u32; 3]>,
	/// Dispatch shaping; absent for display-only compiles.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub run: Option<RunPayload>,
}

/// Dispatch shaping derived from reflection.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RunPayload {
	/// How to populate each bound parameter.
	pub resources: Vec<ResourceCommand>,
	/// Which entry points to dispatch, in order.
	pub calls: Vec<CallCommand>,
	/// Interactive controls for the UI.
	pub controllers: Vec<UniformController>,
	/// Interpretation and planning errors. A non-empty list means the
	/// program cannot run standalone, though inspection still works.
	#[serde(default, skip_serializing_if = "Vec::is_empty")]
	pub errors: Vec<String>,
}

#[cfg(test)]
mod tests {
	use pretty_assertions::assert_eq;

	use super::*;

	#[test]
	fn compile_request_round_trips() {
		let json = r#"{
			"method": "compile",
			"params": {
				"target": "WGSL",
				"entrypoint": "",
				"sourceCode": "float x;",
				"shaderPath": "file:///ws/main.sl",
				"noWebGPU": false
			}
		}"#;
		let request: Request = serde_json::from_str(json).unwrap();
		let Request::Compile(params) = &request else {
			panic!("wrong variant");
		};
		assert_eq!(params.target, "WGSL");
		assert_eq!(params.shader_path, "file:///ws/main.sl");

		let back = serde_json::to_value(&request).unwrap();
		assert_eq!(back["method"], "compile");
		assert_eq!(back["params"]["sourceCode"], "float x;");
	}

	#[test]
	fn change_notification_carries_ordered_edits() {
		let json = r#"{
			"method": "didChange",
			"params": {
				"uri": "file:///ws/main.sl",
				"edits": [
					{"range": {"start": {"line": 1, "character": 1},
					           "end": {"line": 1, "character": 2}},
					 "text": "X"},
					{"text": "full replacement"}
				]
			}
		}"#;
		let notification: Notification = serde_json::from_str(json).unwrap();
		let Notification::DidChange { edits, .. } = notification else {
			panic!("wrong variant");
		};
		assert_eq!(edits.len(), 2);
		assert!(edits[0].range.is_some());
		assert!(edits[1].range.is_none());
	}

	#[test]
	fn failure_responses_are_status_tagged() {
		let response = CompileResponse::Failure {
			message: "unknown compile target `DXIL`".to_string(),
		};
		let value = serde_json::to_value(&response).unwrap();
		assert_eq!(value["status"], "failure");
		assert_eq!(value["message"], "unknown compile target `DXIL`");
	}

	#[test]
	fn initialize_payload_is_the_service_config() {
		let params: InitializeParams = serde_json::from_str(
			r#"{"roots": [{"editor": "file:///ws", "sandbox": "/ws"}]}"#,
		)
		.unwrap();
		assert_eq!(params.roots.len(), 1);
	}
}
