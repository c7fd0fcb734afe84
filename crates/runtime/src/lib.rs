//! Reflection-driven shader execution planning.
//!
//! Nothing here hard-codes a pipeline. The compiler's reflection
//! metadata is the single source of truth for which buffers and
//! textures to allocate, which uniforms to populate, and how many
//! work-items to dispatch:
//!
//! - [`reflect`]: the reflection data model deserialized from the
//!   module's metadata.
//! - [`compile`]: the compile pipeline producing code, layout, hashed
//!   strings, and per-entry-point work-group sizes.
//! - [`command`]: the interpreter deriving resource and call commands
//!   from user attributes.
//! - [`plan`]: the final join into one runnable description for the
//!   external GPU runtime.

pub mod command;
pub mod compile;
pub mod plan;
pub mod reflect;

pub use command::{
	CallCommand, ControllerWidget, DispatchExtent, Interpretation, InterpretError,
	ResourceCommand, ResourceKind, UniformController, interpret,
};
pub use compile::{CompileOutput, CompileRequest, CompileTarget, compile, find_entry_points};
pub use plan::{ExecutionPlan, build_plan};
pub use reflect::{
	AttributeArg, Binding, Reflection, ReflectionEntryPoint, ReflectionParameter, ReflectionType,
	ResourceAccess, ResourceShape, ScalarKind, Stage, UserAttribute,
};

/// A convenient type alias for `Result` with `E` = [`enum@crate::Error`].
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Possible errors.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum Error {
	/// Compilation failed. Carries the human-readable message for
	/// inline rendering; never a panic.
	#[error("{0}")]
	Compile(String),
	/// The module's reflection metadata did not match the expected
	/// shape.
	#[error("invalid reflection metadata: {0}")]
	Reflection(#[from] serde_json::Error),
	/// The execution plan references bindings that do not exist.
	#[error("invalid execution plan: {0}")]
	Plan(String),
	/// A service-layer failure below the pipeline.
	#[error(transparent)]
	Service(#[from] prism_service::Error),
}
