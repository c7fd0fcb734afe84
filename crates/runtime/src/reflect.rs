//! Reflection metadata model.
//!
//! Deserialized from the JSON document the compiler module emits as a
//! side artifact of compilation. Produced fresh per successful compile
//! and immutable afterwards.
//!
//! Types are recursive but cycle-free: a struct field never contains
//! its own struct by value. Metadata violating that precondition is
//! malformed compiler output.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// Scalar element kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ScalarKind {
	Float32,
	Int32,
	Uint32,
	Bool,
}

/// Shapes a resource parameter can take.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ResourceShape {
	StructuredBuffer,
	Texture2d,
}

/// Declared access on a resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ResourceAccess {
	Read,
	Write,
	ReadWrite,
}

/// A reflected type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum ReflectionType {
	/// Aggregate of named fields.
	#[serde(rename_all = "camelCase")]
	Struct {
		/// Type name.
		name: String,
		/// Field parameters in declaration order.
		fields: Vec<ReflectionParameter>,
	},
	/// Fixed-size vector of scalars.
	#[serde(rename_all = "camelCase")]
	Vector {
		/// Number of elements, 2 through 4.
		element_count: u8,
		/// Element type.
		element_type: Box<ReflectionType>,
	},
	/// A single scalar.
	#[serde(rename_all = "camelCase")]
	Scalar {
		/// Scalar kind.
		scalar_type: ScalarKind,
	},
	/// A GPU resource (buffer or texture).
	#[serde(rename_all = "camelCase")]
	Resource {
		/// Resource shape.
		shape: ResourceShape,
		/// Declared access, when the shape carries one.
		#[serde(default, skip_serializing_if = "Option::is_none")]
		access: Option<ResourceAccess>,
		/// Element or texel type.
		#[serde(default, skip_serializing_if = "Option::is_none")]
		result_type: Option<Box<ReflectionType>>,
	},
	/// A sampler state object.
	SamplerState,
}

impl ReflectionType {
	/// The resource shape, when this is a resource type.
	pub fn resource_shape(&self) -> Option<ResourceShape> {
		match self {
			Self::Resource { shape, .. } => Some(*shape),
			_ => None,
		}
	}
}

/// Where a parameter is bound.
///
/// Exactly one binding kind per parameter: uniform parameters share one
/// contiguous uniform block keyed by offset/size, descriptor-slot
/// parameters occupy independent GPU binding slots.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum Binding {
	/// A span of the shared uniform block.
	#[serde(rename_all = "camelCase")]
	Uniform {
		/// Byte offset into the block.
		offset: u32,
		/// Span size in bytes.
		size: u32,
	},
	/// An independent descriptor slot.
	#[serde(rename_all = "camelCase")]
	DescriptorSlot {
		/// Slot index.
		index: u32,
	},
}

/// One literal argument of a user attribute.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AttributeArg {
	Int(i64),
	Float(f64),
	String(String),
}

impl AttributeArg {
	/// The argument as a float, accepting integer literals.
	pub fn as_f32(&self) -> Option<f32> {
		match self {
			Self::Int(v) => Some(*v as f32),
			Self::Float(v) => Some(*v as f32),
			Self::String(_) => None,
		}
	}

	/// The argument as a non-negative integer.
	pub fn as_u32(&self) -> Option<u32> {
		match self {
			Self::Int(v) => u32::try_from(*v).ok(),
			_ => None,
		}
	}

	/// The argument as a string literal.
	pub fn as_str(&self) -> Option<&str> {
		match self {
			Self::String(v) => Some(v),
			_ => None,
		}
	}
}

/// A user-authored attribute attached to a parameter or entry point.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserAttribute {
	/// Attribute name as lowered by the compiler,
	/// e.g. `playground_TIME`.
	pub name: String,
	/// Literal arguments in source order.
	#[serde(default)]
	pub arguments: Vec<AttributeArg>,
}

impl UserAttribute {
	/// The attribute tag within the `playground` namespace, if any.
	pub fn playground_tag(&self) -> Option<&str> {
		self.name.strip_prefix("playground_")
	}
}

/// One reflected program parameter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReflectionParameter {
	/// Parameter name.
	pub name: String,
	/// Where the parameter is bound.
	pub binding: Binding,
	/// The parameter's type.
	#[serde(rename = "type")]
	pub ty: ReflectionType,
	/// Texel format, for texture parameters that declare one.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub format: Option<String>,
	/// User attributes attached in source.
	#[serde(default, skip_serializing_if = "Vec::is_empty")]
	pub user_attributes: Vec<UserAttribute>,
}

/// Pipeline stage of an entry point.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Stage {
	Compute,
	Vertex,
	Fragment,
}

/// One reflected entry point.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReflectionEntryPoint {
	/// Entry point name.
	pub name: String,
	/// Entry-point-scoped parameters.
	#[serde(default, skip_serializing_if = "Vec::is_empty")]
	pub parameters: Vec<ReflectionParameter>,
	/// Pipeline stage.
	pub stage: Stage,
	/// Declared work-group size.
	pub thread_group_size: [u32; 3],
	/// User attributes attached in source.
	#[serde(default, skip_serializing_if = "Vec::is_empty")]
	pub user_attributes: Vec<UserAttribute>,
}

/// Full reflection metadata for one compiled program.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Reflection {
	/// Entry points in declaration order.
	#[serde(default)]
	pub entry_points: Vec<ReflectionEntryPoint>,
	/// Global parameters in layout order.
	#[serde(default)]
	pub parameters: Vec<ReflectionParameter>,
	/// Strings hashed at compile time, keyed by the source string.
	#[serde(default)]
	pub hashed_strings: HashMap<String, u32>,
}

impl Reflection {
	/// Work-group sizes keyed by entry point name.
	pub fn thread_group_sizes(&self) -> HashMap<String, [u32; 3]> {
		self.entry_points
			.iter()
			.map(|ep| (ep.name.clone(), ep.thread_group_size))
			.collect()
	}
}

#[cfg(test)]
mod tests {
	use pretty_assertions::assert_eq;

	use super::*;

	#[test]
	fn deserializes_a_uniform_parameter() {
		let parameter: ReflectionParameter = serde_json::from_str(
			r#"{
				"name": "elapsed",
				"binding": {"kind": "uniform", "offset": 0, "size": 4},
				"type": {"kind": "scalar", "scalarType": "float32"},
				"userAttributes": [{"name": "playground_TIME"}]
			}"#,
		)
		.unwrap();

		assert_eq!(
			parameter.binding,
			Binding::Uniform { offset: 0, size: 4 }
		);
		assert_eq!(
			parameter.user_attributes[0].playground_tag(),
			Some("TIME")
		);
	}

	#[test]
	fn deserializes_a_resource_parameter() {
		let parameter: ReflectionParameter = serde_json::from_str(
			r#"{
				"name": "particles",
				"binding": {"kind": "descriptorSlot", "index": 1},
				"type": {
					"kind": "resource",
					"shape": "structuredBuffer",
					"access": "readWrite",
					"resultType": {"kind": "scalar", "scalarType": "float32"}
				},
				"userAttributes": [{"name": "playground_ZEROS", "arguments": [4096]}]
			}"#,
		)
		.unwrap();

		assert_eq!(
			parameter.ty.resource_shape(),
			Some(ResourceShape::StructuredBuffer)
		);
		assert_eq!(parameter.user_attributes[0].arguments[0].as_u32(), Some(4096));
	}

	#[test]
	fn attribute_arguments_distinguish_int_float_string() {
		let attribute: UserAttribute = serde_json::from_str(
			r#"{"name": "playground_SLIDER", "arguments": [0.5, 0, 10]}"#,
		)
		.unwrap();

		assert_eq!(attribute.arguments[0], AttributeArg::Float(0.5));
		assert_eq!(attribute.arguments[1], AttributeArg::Int(0));
		assert_eq!(attribute.arguments[1].as_f32(), Some(0.0));
		assert_eq!(attribute.arguments[2].as_f32(), Some(10.0));
	}

	#[test]
	fn thread_group_sizes_are_keyed_by_entry_point() {
		let reflection: Reflection = serde_json::from_str(
			r#"{
				"entryPoints": [
					{"name": "main", "stage": "compute", "threadGroupSize": [16, 16, 1]},
					{"name": "post", "stage": "compute", "threadGroupSize": [64, 1, 1]}
				]
			}"#,
		)
		.unwrap();

		let sizes = reflection.thread_group_sizes();
		assert_eq!(sizes["main"], [16, 16, 1]);
		assert_eq!(sizes["post"], [64, 1, 1]);
	}

	#[test]
	fn vector_types_nest_their_element_type() {
		let ty: ReflectionType = serde_json::from_str(
			r#"{
				"kind": "vector",
				"elementCount": 3,
				"elementType": {"kind": "scalar", "scalarType": "float32"}
			}"#,
		)
		.unwrap();

		assert_eq!(
			ty,
			ReflectionType::Vector {
				element_count: 3,
				element_type: Box::new(ReflectionType::Scalar {
					scalar_type: ScalarKind::Float32
				}),
			}
		);
	}
}
