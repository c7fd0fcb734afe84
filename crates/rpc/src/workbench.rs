//! Request dispatch over the service and runtime layers.
//!
//! [`Workbench`] is the single object an embedder wires to a message
//! channel: notifications feed the document synchronizer, requests fan
//! out to the compiler service and the reflection pipeline, and pushed
//! diagnostics surface on the stream returned at construction.
//!
//! Overlapping compile requests are independent; no cancellation is
//! attempted. A superseding request simply produces a second result and
//! the caller keeps whichever arrived last.

use std::sync::Arc;

use prism_runtime::command::interpret;
use prism_runtime::compile::{CompileRequest, CompileTarget, compile, find_entry_points};
use prism_runtime::plan::{ExecutionPlan, build_plan};
use prism_service::module::{CompletionContext, ModuleLoader};
use prism_service::{CompilerService, DiagnosticsStream, DocumentSync, ServiceConfig};
use tracing::debug;

use crate::protocol::{
	CompileParams, CompileResponse, CompileSuccess, Notification, Request, RunPayload,
};
use crate::{Error, Result};

/// Joins the compiler service, the document synchronizer, and the
/// reflection pipeline behind the wire protocol.
pub struct Workbench {
	service: Arc<CompilerService>,
	sync: DocumentSync,
}

impl Workbench {
	/// Creates a workbench and the stream its pushed diagnostics arrive
	/// on. The compiler module is not loaded until first use.
	pub fn new(loader: Arc<dyn ModuleLoader>, config: ServiceConfig) -> (Self, DiagnosticsStream) {
		let service = Arc::new(CompilerService::new(loader, config));
		let (sync, diagnostics) = DocumentSync::new(service.clone());
		(Self { service, sync }, diagnostics)
	}

	/// The underlying compiler service.
	pub fn service(&self) -> &Arc<CompilerService> {
		&self.service
	}

	/// The document synchronizer.
	pub fn sync(&self) -> &DocumentSync {
		&self.sync
	}

	/// Dispatches one request and serializes its response.
	pub async fn handle_request(&self, request: Request) -> Result<serde_json::Value> {
		match request {
			Request::Compile(params) => Ok(serde_json::to_value(self.compile(params).await)?),
			Request::Entrypoints(params) => {
				let module = self.service.module().await?;
				let path = self.service.address().to_sandbox(&params.shader_path);
				let names = find_entry_points(module.as_ref(), &params.source_code, &path)
					.await
					.map_err(Error::Runtime)?;
				Ok(serde_json::to_value(names)?)
			}
			Request::Completion(params) => {
				let context = params
					.context
					.map(|ctx| CompletionContext {
						trigger_character: ctx.trigger_character,
					})
					.unwrap_or_default();
				let items = self
					.service
					.completion(&params.uri, params.position, context)
					.await?;
				Ok(serde_json::to_value(items)?)
			}
			Request::Hover(params) => {
				let hover = self.service.hover(&params.uri, params.position).await?;
				Ok(serde_json::to_value(hover)?)
			}
			Request::Definition(params) => {
				let locations = self.service.definition(&params.uri, params.position).await?;
				Ok(serde_json::to_value(locations)?)
			}
			Request::SignatureHelp(params) => {
				let help = self
					.service
					.signature_help(&params.uri, params.position)
					.await?;
				Ok(serde_json::to_value(help)?)
			}
			Request::DocumentSymbols(params) => {
				let symbols = self.service.document_symbols(&params.uri).await?;
				Ok(serde_json::to_value(symbols)?)
			}
		}
	}

	/// Dispatches one document lifecycle notification.
	pub async fn handle_notification(&self, notification: Notification) -> Result<()> {
		match notification {
			Notification::DidOpen { uri, text } => Ok(self.sync.open(&uri, &text).await?),
			Notification::DidChange { uri, edits } => Ok(self.sync.change(&uri, &edits).await?),
			Notification::DidClose { uri } => Ok(self.sync.close(&uri).await?),
		}
	}

	/// Compiles a program and shapes the wire response.
	///
	/// Every failure mode folds into [`CompileResponse::Failure`] with a
	/// non-empty message; this method never errors.
	pub async fn compile(&self, params: CompileParams) -> CompileResponse {
		match self.try_compile(&params).await {
			Ok(response) => response,
			Err(err) => CompileResponse::Failure {
				message: err.to_string(),
			},
		}
	}

	/// Compiles and builds a strict [`ExecutionPlan`] for in-process
	/// embedders, rejecting programs whose size-of references do not
	/// resolve. Interpretation errors are returned alongside the plan.
	pub async fn plan(&self, params: &CompileParams) -> Result<(ExecutionPlan, Vec<String>)> {
		let output = self.run_pipeline(params).await?;
		let mut interpretation = interpret(&output.reflection);
		let errors = interpretation
			.errors
			.drain(..)
			.map(|err| err.to_string())
			.collect();
		let plan = build_plan(&params.source_code, &output, interpretation)?;
		Ok((plan, errors))
	}

	async fn try_compile(&self, params: &CompileParams) -> Result<CompileResponse> {
		let output = self.run_pipeline(params).await?;

		let run = if params.no_webgpu {
			None
		} else {
			let mut interpretation = interpret(&output.reflection);
			let mut errors: Vec<String> = interpretation
				.errors
				.drain(..)
				.map(|err| err.to_string())
				.collect();
			match build_plan(&params.source_code, &output, interpretation) {
				Ok(plan) => Some(RunPayload {
					resources: plan.resources,
					calls: plan.calls,
					controllers: plan.controllers,
					errors,
				}),
				Err(err) => {
					// A rejected plan hands nothing to the runtime; the
					// compile result itself is still inspectable.
					errors.push(err.to_string());
					Some(RunPayload {
						resources: Vec::new(),
						calls: Vec::new(),
						controllers: Vec::new(),
						errors,
					})
				}
			}
		};

		debug!(target = %params.target, display_only = params.no_webgpu, "compile request served");

		Ok(CompileResponse::Success(Box::new(CompileSuccess {
			code: output.code,
			layout: output.layout,
			hashed_strings: output.hashed_strings,
			reflection: output.reflection,
			thread_group_sizes: output.thread_group_sizes,
			run,
		})))
	}

	async fn run_pipeline(
		&self,
		params: &CompileParams,
	) -> Result<prism_runtime::CompileOutput> {
		let target: CompileTarget = params.target.parse().map_err(Error::Runtime)?;
		let module = self.service.module().await?;
		let request = CompileRequest {
			target,
			entry_point: (!params.entrypoint.is_empty()).then(|| params.entrypoint.clone()),
			source: params.source_code.clone(),
			path: self.service.address().to_sandbox(&params.shader_path),
			display_only: params.no_webgpu,
		};
		Ok(compile(module.as_ref(), &request).await?)
	}
}
