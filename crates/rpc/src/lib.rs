//! Wire protocol and dispatch for the prism workbench.
//!
//! [`protocol`] defines the JSON-RPC-style message shapes exchanged
//! with the editor side over a message channel; [`workbench`] joins the
//! service and runtime layers behind them. Transport is the embedder's
//! concern: requests arrive as deserialized values and responses leave
//! as [`serde_json::Value`]s.

pub mod protocol;
pub mod workbench;

pub use protocol::{
	CompileParams, CompileResponse, CompileSuccess, EntrypointsParams, Notification, Request,
	RunPayload, ServerNotification,
};
pub use workbench::Workbench;

/// A convenient type alias for `Result` with `E` = [`enum@crate::Error`].
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Possible errors.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum Error {
	/// A failure in the service layer.
	#[error(transparent)]
	Service(#[from] prism_service::Error),
	/// A failure in the compile/planning layer.
	#[error(transparent)]
	Runtime(#[from] prism_runtime::Error),
	/// A response could not be serialized.
	#[error("serialization failed: {0}")]
	Serialize(#[from] serde_json::Error),
}
