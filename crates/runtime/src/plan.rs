//! Execution plan assembly.
//!
//! The plan is a join of the compile output and the interpreted
//! commands; no further derivation happens here. Its one invariant:
//! every size-of dependency recorded by a call command must name a
//! buffer allocation among the resource commands, otherwise the plan
//! is rejected before being handed to the runtime.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::command::{
	CallCommand, DispatchExtent, Interpretation, ResourceCommand, ResourceKind, UniformController,
};
use crate::compile::CompileOutput;
use crate::{Error, Result};

/// One immutable, runnable description of a compiled program.
///
/// Handed to the external GPU runtime as-is. A plan with no call
/// commands is valid: it describes a program that is inspected rather
/// than dispatched.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExecutionPlan {
	/// The user-authored source the plan was derived from.
	pub source: String,
	/// Generated code in the requested target form.
	pub code: String,
	/// Human-readable parameter layout.
	pub layout: String,
	/// Strings hashed at compile time.
	pub hashed_strings: HashMap<String, u32>,
	/// Work-group sizes keyed by entry point name.
	pub thread_group_sizes: HashMap<String, [u32; 3]>,
	/// How to populate each bound parameter.
	pub resources: Vec<ResourceCommand>,
	/// Which entry points to dispatch, in order.
	pub calls: Vec<CallCommand>,
	/// Interactive controls for the UI.
	pub controllers: Vec<UniformController>,
}

/// Joins a compile output and an interpretation into a plan.
///
/// Interpretation errors are the caller's to surface; this function
/// only checks the join invariant.
pub fn build_plan(
	source: &str,
	output: &CompileOutput,
	interpretation: Interpretation,
) -> Result<ExecutionPlan> {
	for call in &interpretation.calls {
		let DispatchExtent::SizeOf { resource } = &call.extent else {
			continue;
		};
		let Some(target) = interpretation
			.resources
			.iter()
			.find(|r| &r.name == resource)
		else {
			return Err(Error::Plan(format!(
				"call `{}` takes its extent from `{resource}`, which no resource command provides",
				call.entry_point
			)));
		};
		if !matches!(
			target.kind,
			ResourceKind::ZeroBuffer { .. } | ResourceKind::RandomBuffer { .. }
		) {
			return Err(Error::Plan(format!(
				"call `{}` takes its extent from `{resource}`, which is not a buffer allocation",
				call.entry_point
			)));
		}
	}

	debug!(
		resources = interpretation.resources.len(),
		calls = interpretation.calls.len(),
		controllers = interpretation.controllers.len(),
		"built execution plan"
	);

	Ok(ExecutionPlan {
		source: source.to_string(),
		code: output.code.clone(),
		layout: output.layout.clone(),
		hashed_strings: output.hashed_strings.clone(),
		thread_group_sizes: output.thread_group_sizes.clone(),
		resources: interpretation.resources,
		calls: interpretation.calls,
		controllers: interpretation.controllers,
	})
}
