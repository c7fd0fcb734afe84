//! Resource and call command interpretation.
//!
//! Walks reflection metadata and derives, purely from user attributes,
//! how each bound parameter is populated at run time and which entry
//! points are dispatched with what extent. Parameters the interpreter
//! cannot account for are collected as errors rather than aborting the
//! pass, so static inspection of a program that cannot run standalone
//! still succeeds.

use serde::{Deserialize, Serialize};

use crate::reflect::{
	Binding, Reflection, ReflectionEntryPoint, ReflectionParameter, ReflectionType, ResourceShape,
	Stage, UserAttribute,
};

/// How one bound parameter is populated at run time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum ResourceKind {
	/// Uniform continuously updated with elapsed time.
	Time,
	/// Uniform continuously updated with pointer state.
	MousePosition,
	/// Uniform reflecting the held state of one key.
	#[serde(rename_all = "camelCase")]
	Key {
		/// Key name, e.g. `KeyA`.
		key: String,
	},
	/// Uniform driven by an interactive slider.
	#[serde(rename_all = "camelCase")]
	Slider {
		/// Initial value.
		default: f32,
		/// Lower bound.
		min: f32,
		/// Upper bound.
		max: f32,
	},
	/// Uniform driven by an interactive color picker.
	#[serde(rename_all = "camelCase")]
	ColorPick {
		/// Initial RGB value.
		default: [f32; 3],
	},
	/// Texture loaded from a named asset.
	#[serde(rename_all = "camelCase")]
	TextureFromUrl {
		/// Asset location, resolved against the base location.
		url: String,
	},
	/// Texture allocated black at a fixed extent.
	#[serde(rename_all = "camelCase")]
	BlackTexture {
		/// Width in texels.
		width: u32,
		/// Height in texels.
		height: u32,
	},
	/// Buffer allocated zero-filled with a declared element count.
	#[serde(rename_all = "camelCase")]
	ZeroBuffer {
		/// Element count.
		count: u32,
	},
	/// Buffer seeded with uniform random values.
	#[serde(rename_all = "camelCase")]
	RandomBuffer {
		/// Element count.
		count: u32,
	},
}

/// A derived instruction for populating one bound parameter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResourceCommand {
	/// Parameter name the command targets.
	pub name: String,
	/// The parameter's binding.
	pub binding: Binding,
	/// How to populate it.
	pub kind: ResourceKind,
}

/// Widget backing a uniform controller.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum ControllerWidget {
	/// A one-value slider.
	#[serde(rename_all = "camelCase")]
	Slider {
		default: f32,
		min: f32,
		max: f32,
	},
	/// An RGB color picker.
	#[serde(rename_all = "camelCase")]
	ColorPick {
		default: [f32; 3],
	},
}

/// A user-facing control bound to a uniform memory location.
///
/// Derived 1:1 from interactive resource commands; consumed by the
/// external UI and not mutated here after creation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UniformController {
	/// Controlled parameter name.
	pub name: String,
	/// Byte offset into the uniform block.
	pub offset: u32,
	/// Span size in bytes.
	pub size: u32,
	/// Widget kind with defaults and ranges.
	pub widget: ControllerWidget,
}

/// Work extent of one dispatch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum DispatchExtent {
	/// A literal work-item extent.
	#[serde(rename_all = "camelCase")]
	Fixed {
		/// Work items along x, y, z.
		extent: [u32; 3],
	},
	/// Extent derived from a named resource's runtime size. Recorded
	/// here, resolved by the plan consumer.
	#[serde(rename_all = "camelCase")]
	SizeOf {
		/// Resource command name supplying the size.
		resource: String,
	},
}

/// A derived instruction for dispatching one entry point.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CallCommand {
	/// Entry point to dispatch.
	pub entry_point: String,
	/// Work extent.
	pub extent: DispatchExtent,
	/// Whether the entry point runs once instead of every frame.
	pub once: bool,
}

/// One failure to interpret a parameter or entry point.
///
/// Collected and surfaced as a list; interpretation always completes.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum InterpretError {
	/// An attribute's literal arguments have the wrong arity or type.
	#[error("parameter `{name}`: attribute `{attribute}` expects {expected}")]
	BadArguments {
		/// Parameter name.
		name: String,
		/// Attribute tag.
		attribute: String,
		/// What the attribute expects.
		expected: String,
	},
	/// An attribute is attached to a parameter with the wrong binding
	/// or type.
	#[error("parameter `{name}`: attribute `{attribute}` requires a {expected}")]
	BindingMismatch {
		/// Parameter name.
		name: String,
		/// Attribute tag.
		attribute: String,
		/// Required binding or type.
		expected: &'static str,
	},
	/// More than one population attribute on one parameter.
	#[error("parameter `{name}` carries conflicting playground attributes")]
	Conflicting {
		/// Parameter name.
		name: String,
	},
	/// A descriptor-bound parameter has no recognized attribute and no
	/// default-fill rule; the program cannot run standalone.
	#[error("parameter `{name}` has no recognized attribute and cannot be populated")]
	Unbound {
		/// Parameter name.
		name: String,
	},
	/// An entry point's dispatch attributes are unusable.
	#[error("entry point `{name}`: {reason}")]
	BadEntryPoint {
		/// Entry point name.
		name: String,
		/// What is wrong.
		reason: String,
	},
}

/// Everything one interpretation pass derives.
#[derive(Debug, Clone, Default)]
pub struct Interpretation {
	/// Resource commands in parameter order.
	pub resources: Vec<ResourceCommand>,
	/// Call commands in entry point order.
	pub calls: Vec<CallCommand>,
	/// Interactive controllers, 1:1 with slider/color-pick commands.
	pub controllers: Vec<UniformController>,
	/// Collected interpretation errors.
	pub errors: Vec<InterpretError>,
}

/// Derives resource and call commands from reflection metadata.
pub fn interpret(reflection: &Reflection) -> Interpretation {
	let mut out = Interpretation::default();

	for parameter in &reflection.parameters {
		interpret_parameter(parameter, &mut out);
	}
	for entry_point in &reflection.entry_points {
		for parameter in &entry_point.parameters {
			interpret_parameter(parameter, &mut out);
		}
		interpret_entry_point(entry_point, &mut out);
	}

	out
}

fn interpret_parameter(parameter: &ReflectionParameter, out: &mut Interpretation) {
	let recognized: Vec<&UserAttribute> = parameter
		.user_attributes
		.iter()
		.filter(|attr| {
			attr.playground_tag()
				.is_some_and(|tag| POPULATION_TAGS.contains(&tag))
		})
		.collect();

	let attribute = match recognized.as_slice() {
		[] => {
			// Unattributed uniform data lives in the zero-initialized
			// block; sampler states take the default sampler. Anything
			// else in a descriptor slot cannot be populated.
			let defaulted = matches!(parameter.binding, Binding::Uniform { .. })
				|| matches!(parameter.ty, ReflectionType::SamplerState);
			if !defaulted {
				out.errors.push(InterpretError::Unbound {
					name: parameter.name.clone(),
				});
			}
			return;
		}
		[one] => *one,
		_ => {
			out.errors.push(InterpretError::Conflicting {
				name: parameter.name.clone(),
			});
			return;
		}
	};

	let tag = attribute
		.playground_tag()
		.unwrap_or_default()
		.to_string();
	match build_resource_kind(parameter, &tag, attribute) {
		Ok(kind) => {
			if let Some(controller) = derive_controller(parameter, &kind) {
				out.controllers.push(controller);
			}
			out.resources.push(ResourceCommand {
				name: parameter.name.clone(),
				binding: parameter.binding,
				kind,
			});
		}
		Err(err) => out.errors.push(err),
	}
}

/// Population attributes the interpreter recognizes.
const POPULATION_TAGS: &[&str] = &[
	"TIME",
	"MOUSE_POSITION",
	"KEY",
	"SLIDER",
	"COLOR_PICK",
	"URL",
	"BLACK",
	"ZEROS",
	"RAND",
];

fn build_resource_kind(
	parameter: &ReflectionParameter,
	tag: &str,
	attribute: &UserAttribute,
) -> Result<ResourceKind, InterpretError> {
	let name = || parameter.name.clone();
	let attr = || tag.to_string();
	let args = &attribute.arguments;

	let require_uniform = || match parameter.binding {
		Binding::Uniform { .. } => Ok(()),
		Binding::DescriptorSlot { .. } => Err(InterpretError::BindingMismatch {
			name: name(),
			attribute: attr(),
			expected: "uniform binding",
		}),
	};
	let require_shape = |shape: ResourceShape, expected: &'static str| {
		if parameter.ty.resource_shape() == Some(shape)
			&& matches!(parameter.binding, Binding::DescriptorSlot { .. })
		{
			Ok(())
		} else {
			Err(InterpretError::BindingMismatch {
				name: name(),
				attribute: attr(),
				expected,
			})
		}
	};
	let bad_args = |expected: &str| InterpretError::BadArguments {
		name: name(),
		attribute: attr(),
		expected: expected.to_string(),
	};

	match tag {
		"TIME" => {
			require_uniform()?;
			expect_no_args(args).map_err(|()| bad_args("no arguments"))?;
			Ok(ResourceKind::Time)
		}
		"MOUSE_POSITION" => {
			require_uniform()?;
			expect_no_args(args).map_err(|()| bad_args("no arguments"))?;
			Ok(ResourceKind::MousePosition)
		}
		"KEY" => {
			require_uniform()?;
			let [key] = args.as_slice() else {
				return Err(bad_args("one string argument"));
			};
			let key = key.as_str().ok_or_else(|| bad_args("one string argument"))?;
			Ok(ResourceKind::Key {
				key: key.to_string(),
			})
		}
		"SLIDER" => {
			require_uniform()?;
			let [default, min, max] = args.as_slice() else {
				return Err(bad_args("three numeric arguments (default, min, max)"));
			};
			match (default.as_f32(), min.as_f32(), max.as_f32()) {
				(Some(default), Some(min), Some(max)) => Ok(ResourceKind::Slider {
					default,
					min,
					max,
				}),
				_ => Err(bad_args("three numeric arguments (default, min, max)")),
			}
		}
		"COLOR_PICK" => {
			require_uniform()?;
			let [r, g, b] = args.as_slice() else {
				return Err(bad_args("three numeric arguments (r, g, b)"));
			};
			match (r.as_f32(), g.as_f32(), b.as_f32()) {
				(Some(r), Some(g), Some(b)) => Ok(ResourceKind::ColorPick {
					default: [r, g, b],
				}),
				_ => Err(bad_args("three numeric arguments (r, g, b)")),
			}
		}
		"URL" => {
			require_shape(ResourceShape::Texture2d, "texture descriptor slot")?;
			let [url] = args.as_slice() else {
				return Err(bad_args("one string argument"));
			};
			let url = url.as_str().ok_or_else(|| bad_args("one string argument"))?;
			Ok(ResourceKind::TextureFromUrl {
				url: url.to_string(),
			})
		}
		"BLACK" => {
			require_shape(ResourceShape::Texture2d, "texture descriptor slot")?;
			let [width, height] = args.as_slice() else {
				return Err(bad_args("two integer arguments (width, height)"));
			};
			match (width.as_u32(), height.as_u32()) {
				(Some(width), Some(height)) => Ok(ResourceKind::BlackTexture { width, height }),
				_ => Err(bad_args("two integer arguments (width, height)")),
			}
		}
		"ZEROS" => {
			require_shape(ResourceShape::StructuredBuffer, "buffer descriptor slot")?;
			let [count] = args.as_slice() else {
				return Err(bad_args("one integer argument"));
			};
			let count = count.as_u32().ok_or_else(|| bad_args("one integer argument"))?;
			Ok(ResourceKind::ZeroBuffer { count })
		}
		"RAND" => {
			require_shape(ResourceShape::StructuredBuffer, "buffer descriptor slot")?;
			let [count] = args.as_slice() else {
				return Err(bad_args("one integer argument"));
			};
			let count = count.as_u32().ok_or_else(|| bad_args("one integer argument"))?;
			Ok(ResourceKind::RandomBuffer { count })
		}
		// Kept in sync with POPULATION_TAGS; an unlisted tag is treated
		// as unrecognized rather than faulting the pass.
		_ => Err(InterpretError::Unbound { name: name() }),
	}
}

fn expect_no_args(args: &[crate::reflect::AttributeArg]) -> Result<(), ()> {
	if args.is_empty() { Ok(()) } else { Err(()) }
}

fn derive_controller(
	parameter: &ReflectionParameter,
	kind: &ResourceKind,
) -> Option<UniformController> {
	let Binding::Uniform { offset, size } = parameter.binding else {
		return None;
	};
	let widget = match kind {
		ResourceKind::Slider { default, min, max } => ControllerWidget::Slider {
			default: *default,
			min: *min,
			max: *max,
		},
		ResourceKind::ColorPick { default } => ControllerWidget::ColorPick { default: *default },
		_ => return None,
	};
	Some(UniformController {
		name: parameter.name.clone(),
		offset,
		size,
		widget,
	})
}

fn interpret_entry_point(entry_point: &ReflectionEntryPoint, out: &mut Interpretation) {
	let mut extent: Option<DispatchExtent> = None;
	let mut once = false;
	let mut failed = false;

	for attribute in &entry_point.user_attributes {
		let Some(tag) = attribute.playground_tag() else {
			continue;
		};
		match tag {
			"CALL" => {
				let fixed = attribute
					.arguments
					.iter()
					.map(crate::reflect::AttributeArg::as_u32)
					.collect::<Option<Vec<u32>>>()
					.filter(|v| v.len() == 3);
				match (fixed, &extent) {
					(Some(v), None) => {
						extent = Some(DispatchExtent::Fixed {
							extent: [v[0], v[1], v[2]],
						});
					}
					(Some(_), Some(_)) => {
						out.errors.push(InterpretError::BadEntryPoint {
							name: entry_point.name.clone(),
							reason: "multiple dispatch extents".to_string(),
						});
						failed = true;
					}
					(None, _) => {
						out.errors.push(InterpretError::BadEntryPoint {
							name: entry_point.name.clone(),
							reason: "CALL expects three integer arguments".to_string(),
						});
						failed = true;
					}
				}
			}
			"CALL_SIZE_OF" => {
				let resource = attribute
					.arguments
					.first()
					.and_then(crate::reflect::AttributeArg::as_str)
					.filter(|_| attribute.arguments.len() == 1);
				match (resource, &extent) {
					(Some(resource), None) => {
						extent = Some(DispatchExtent::SizeOf {
							resource: resource.to_string(),
						});
					}
					(Some(_), Some(_)) => {
						out.errors.push(InterpretError::BadEntryPoint {
							name: entry_point.name.clone(),
							reason: "multiple dispatch extents".to_string(),
						});
						failed = true;
					}
					(None, _) => {
						out.errors.push(InterpretError::BadEntryPoint {
							name: entry_point.name.clone(),
							reason: "CALL_SIZE_OF expects one string argument".to_string(),
						});
						failed = true;
					}
				}
			}
			"CALL_ONCE" => once = true,
			_ => {}
		}
	}

	let Some(extent) = extent else {
		if once && !failed {
			out.errors.push(InterpretError::BadEntryPoint {
				name: entry_point.name.clone(),
				reason: "CALL_ONCE without a dispatch extent".to_string(),
			});
		}
		// No dispatch attribute at all: the entry point is simply not
		// dispatchable, which is fine for inspection-only programs.
		return;
	};
	if failed {
		return;
	}

	if entry_point.stage != Stage::Compute {
		out.errors.push(InterpretError::BadEntryPoint {
			name: entry_point.name.clone(),
			reason: "only compute entry points are dispatchable".to_string(),
		});
		return;
	}

	out.calls.push(CallCommand {
		entry_point: entry_point.name.clone(),
		extent,
		once,
	});
}

#[cfg(test)]
mod tests {
	use pretty_assertions::assert_eq;

	use super::*;
	use crate::reflect::{AttributeArg, ScalarKind};

	fn uniform_param(name: &str, offset: u32, size: u32, attrs: Vec<UserAttribute>) -> ReflectionParameter {
		ReflectionParameter {
			name: name.to_string(),
			binding: Binding::Uniform { offset, size },
			ty: ReflectionType::Scalar {
				scalar_type: ScalarKind::Float32,
			},
			format: None,
			user_attributes: attrs,
		}
	}

	fn buffer_param(name: &str, index: u32, attrs: Vec<UserAttribute>) -> ReflectionParameter {
		ReflectionParameter {
			name: name.to_string(),
			binding: Binding::DescriptorSlot { index },
			ty: ReflectionType::Resource {
				shape: ResourceShape::StructuredBuffer,
				access: Some(crate::reflect::ResourceAccess::ReadWrite),
				result_type: Some(Box::new(ReflectionType::Scalar {
					scalar_type: ScalarKind::Float32,
				})),
			},
			format: None,
			user_attributes: attrs,
		}
	}

	fn attr(name: &str, arguments: Vec<AttributeArg>) -> UserAttribute {
		UserAttribute {
			name: format!("playground_{name}"),
			arguments,
		}
	}

	fn entry(name: &str, stage: Stage, attrs: Vec<UserAttribute>) -> ReflectionEntryPoint {
		ReflectionEntryPoint {
			name: name.to_string(),
			parameters: Vec::new(),
			stage,
			thread_group_size: [1, 1, 1],
			user_attributes: attrs,
		}
	}

	#[test]
	fn time_attribute_yields_exactly_one_time_command() {
		let reflection = Reflection {
			parameters: vec![uniform_param("elapsed", 16, 4, vec![attr("TIME", vec![])])],
			..Reflection::default()
		};

		let interp = interpret(&reflection);
		assert!(interp.errors.is_empty());
		assert_eq!(
			interp.resources,
			vec![ResourceCommand {
				name: "elapsed".to_string(),
				binding: Binding::Uniform {
					offset: 16,
					size: 4
				},
				kind: ResourceKind::Time,
			}]
		);
	}

	#[test]
	fn slider_yields_a_command_and_a_controller() {
		let reflection = Reflection {
			parameters: vec![uniform_param(
				"gain",
				0,
				4,
				vec![attr(
					"SLIDER",
					vec![
						AttributeArg::Float(0.5),
						AttributeArg::Int(0),
						AttributeArg::Int(2),
					],
				)],
			)],
			..Reflection::default()
		};

		let interp = interpret(&reflection);
		assert!(interp.errors.is_empty());
		assert_eq!(interp.controllers.len(), 1);
		assert_eq!(interp.controllers[0].offset, 0);
		assert_eq!(
			interp.controllers[0].widget,
			ControllerWidget::Slider {
				default: 0.5,
				min: 0.0,
				max: 2.0
			}
		);
	}

	#[test]
	fn wrong_arity_is_a_reported_error_not_a_fault() {
		let reflection = Reflection {
			parameters: vec![uniform_param(
				"gain",
				0,
				4,
				vec![attr("SLIDER", vec![AttributeArg::Float(0.5)])],
			)],
			..Reflection::default()
		};

		let interp = interpret(&reflection);
		assert!(interp.resources.is_empty());
		assert!(matches!(
			interp.errors.as_slice(),
			[InterpretError::BadArguments { .. }]
		));
	}

	#[test]
	fn wrong_argument_type_is_reported() {
		let reflection = Reflection {
			parameters: vec![buffer_param(
				"particles",
				0,
				vec![attr("ZEROS", vec![AttributeArg::String("many".to_string())])],
			)],
			..Reflection::default()
		};

		let interp = interpret(&reflection);
		assert!(matches!(
			interp.errors.as_slice(),
			[InterpretError::BadArguments { .. }]
		));
	}

	#[test]
	fn population_attributes_validate_the_binding_kind() {
		let reflection = Reflection {
			parameters: vec![buffer_param("particles", 0, vec![attr("TIME", vec![])])],
			..Reflection::default()
		};

		let interp = interpret(&reflection);
		assert!(matches!(
			interp.errors.as_slice(),
			[InterpretError::BindingMismatch { .. }]
		));
	}

	#[test]
	fn unattributed_descriptor_slots_are_unbound_errors() {
		let reflection = Reflection {
			parameters: vec![
				buffer_param("mystery", 0, vec![]),
				uniform_param("plain", 0, 4, vec![]),
			],
			..Reflection::default()
		};

		let interp = interpret(&reflection);
		assert_eq!(
			interp.errors,
			vec![InterpretError::Unbound {
				name: "mystery".to_string()
			}]
		);
	}

	#[test]
	fn errors_do_not_abort_the_pass() {
		let reflection = Reflection {
			parameters: vec![
				buffer_param("mystery", 0, vec![]),
				uniform_param("elapsed", 0, 4, vec![attr("TIME", vec![])]),
			],
			..Reflection::default()
		};

		let interp = interpret(&reflection);
		assert_eq!(interp.errors.len(), 1);
		assert_eq!(interp.resources.len(), 1);
	}

	#[test]
	fn buffer_allocations_become_commands() {
		let reflection = Reflection {
			parameters: vec![
				buffer_param("zeros", 0, vec![attr("ZEROS", vec![AttributeArg::Int(4096)])]),
				buffer_param("noise", 1, vec![attr("RAND", vec![AttributeArg::Int(512)])]),
			],
			..Reflection::default()
		};

		let interp = interpret(&reflection);
		assert!(interp.errors.is_empty());
		assert_eq!(interp.resources[0].kind, ResourceKind::ZeroBuffer { count: 4096 });
		assert_eq!(interp.resources[1].kind, ResourceKind::RandomBuffer { count: 512 });
	}

	#[test]
	fn fixed_call_attribute_yields_a_call_command() {
		let reflection = Reflection {
			entry_points: vec![entry(
				"main",
				Stage::Compute,
				vec![attr(
					"CALL",
					vec![
						AttributeArg::Int(64),
						AttributeArg::Int(64),
						AttributeArg::Int(1),
					],
				)],
			)],
			..Reflection::default()
		};

		let interp = interpret(&reflection);
		assert_eq!(
			interp.calls,
			vec![CallCommand {
				entry_point: "main".to_string(),
				extent: DispatchExtent::Fixed {
					extent: [64, 64, 1]
				},
				once: false,
			}]
		);
	}

	#[test]
	fn size_of_call_records_the_dependency_unresolved() {
		let reflection = Reflection {
			entry_points: vec![entry(
				"simulate",
				Stage::Compute,
				vec![
					attr(
						"CALL_SIZE_OF",
						vec![AttributeArg::String("particles".to_string())],
					),
					attr("CALL_ONCE", vec![]),
				],
			)],
			..Reflection::default()
		};

		let interp = interpret(&reflection);
		assert_eq!(
			interp.calls,
			vec![CallCommand {
				entry_point: "simulate".to_string(),
				extent: DispatchExtent::SizeOf {
					resource: "particles".to_string()
				},
				once: true,
			}]
		);
	}

	#[test]
	fn entry_points_without_dispatch_attributes_emit_nothing() {
		let reflection = Reflection {
			entry_points: vec![entry("helper", Stage::Compute, vec![])],
			..Reflection::default()
		};

		let interp = interpret(&reflection);
		assert!(interp.calls.is_empty());
		assert!(interp.errors.is_empty());
	}

	#[test]
	fn non_compute_dispatch_is_an_error() {
		let reflection = Reflection {
			entry_points: vec![entry(
				"shade",
				Stage::Fragment,
				vec![attr(
					"CALL",
					vec![
						AttributeArg::Int(1),
						AttributeArg::Int(1),
						AttributeArg::Int(1),
					],
				)],
			)],
			..Reflection::default()
		};

		let interp = interpret(&reflection);
		assert!(interp.calls.is_empty());
		assert!(matches!(
			interp.errors.as_slice(),
			[InterpretError::BadEntryPoint { .. }]
		));
	}

	#[test]
	fn call_once_alone_is_an_error() {
		let reflection = Reflection {
			entry_points: vec![entry("init", Stage::Compute, vec![attr("CALL_ONCE", vec![])])],
			..Reflection::default()
		};

		let interp = interpret(&reflection);
		assert!(interp.calls.is_empty());
		assert_eq!(interp.errors.len(), 1);
	}

	#[test]
	fn conflicting_population_attributes_are_reported() {
		let reflection = Reflection {
			parameters: vec![uniform_param(
				"elapsed",
				0,
				4,
				vec![attr("TIME", vec![]), attr("MOUSE_POSITION", vec![])],
			)],
			..Reflection::default()
		};

		let interp = interpret(&reflection);
		assert!(interp.resources.is_empty());
		assert!(matches!(
			interp.errors.as_slice(),
			[InterpretError::Conflicting { .. }]
		));
	}
}
