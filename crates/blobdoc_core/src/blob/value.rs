use std::fmt;

use serde::ser::{Serialize, SerializeMap, SerializeSeq, Serializer};

/// Sixteen opaque identifier bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Guid(pub [u8; 16]);

impl Guid {
	/// Return the identifier as text when every byte is printable ASCII.
	pub fn as_ascii(&self) -> Option<&str> {
		if self.0.iter().all(|byte| byte.is_ascii_graphic()) {
			std::str::from_utf8(&self.0).ok()
		} else {
			None
		}
	}
}

impl fmt::Display for Guid {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self.as_ascii() {
			Some(text) => f.write_str(text),
			None => f.write_str(&hex::encode(self.0)),
		}
	}
}

/// Schema-less decoded value tree.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
	/// Explicit null or unresolved reference.
	Null,
	/// Boolean value.
	Bool(bool),
	/// Any integer width that fits in `i64`.
	I64(i64),
	/// Float, double, decimal, or an unsigned value above `i64::MAX`.
	F64(f64),
	/// String or single character.
	String(Box<str>),
	/// 16-byte opaque identifier.
	Guid(Guid),
	/// Named members in stream order.
	Map(Vec<FieldValue>),
	/// Positional elements.
	List(Vec<Value>),
}

/// One named member of a [`Value::Map`].
#[derive(Debug, Clone, PartialEq)]
pub struct FieldValue {
	/// Member name.
	pub name: Box<str>,
	/// Member value.
	pub value: Value,
}

impl FieldValue {
	/// Build a field from any string-like name.
	pub fn new(name: impl Into<Box<str>>, value: Value) -> Self {
		Self { name: name.into(), value }
	}
}

impl Value {
	/// Build a string value.
	pub fn text(value: impl Into<Box<str>>) -> Self {
		Self::String(value.into())
	}

	/// Stable variant label.
	pub fn kind_name(&self) -> &'static str {
		match self {
			Self::Null => "Null",
			Self::Bool(_) => "Bool",
			Self::I64(_) => "I64",
			Self::F64(_) => "F64",
			Self::String(_) => "String",
			Self::Guid(_) => "Guid",
			Self::Map(_) => "Map",
			Self::List(_) => "List",
		}
	}

	/// Return whether the value is a map without members.
	pub fn is_empty_map(&self) -> bool {
		matches!(self, Self::Map(fields) if fields.is_empty())
	}

	/// Look up a map member by name.
	pub fn get(&self, name: &str) -> Option<&Value> {
		match self {
			Self::Map(fields) => fields.iter().find(|field| field.name.as_ref() == name).map(|field| &field.value),
			_ => None,
		}
	}

	/// Integer payload, if any.
	pub fn as_i64(&self) -> Option<i64> {
		match self {
			Self::I64(value) => Some(*value),
			_ => None,
		}
	}

	/// Numeric payload widened to `f64`.
	pub fn as_f64(&self) -> Option<f64> {
		match self {
			Self::F64(value) => Some(*value),
			Self::I64(value) => Some(*value as f64),
			_ => None,
		}
	}

	/// String payload, if any.
	pub fn as_str(&self) -> Option<&str> {
		match self {
			Self::String(value) => Some(value),
			_ => None,
		}
	}

	/// List elements, if any.
	pub fn as_list(&self) -> Option<&[Value]> {
		match self {
			Self::List(items) => Some(items),
			_ => None,
		}
	}

	/// Map members, if any.
	pub fn as_map(&self) -> Option<&[FieldValue]> {
		match self {
			Self::Map(fields) => Some(fields),
			_ => None,
		}
	}
}

impl Serialize for Value {
	fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
		match self {
			Self::Null => serializer.serialize_unit(),
			Self::Bool(value) => serializer.serialize_bool(*value),
			Self::I64(value) => serializer.serialize_i64(*value),
			Self::F64(value) => serializer.serialize_f64(*value),
			Self::String(value) => serializer.serialize_str(value),
			Self::Guid(value) => serializer.collect_str(value),
			Self::Map(fields) => {
				let mut map = serializer.serialize_map(Some(fields.len()))?;
				for field in fields {
					map.serialize_entry(field.name.as_ref(), &field.value)?;
				}
				map.end()
			}
			Self::List(items) => {
				let mut seq = serializer.serialize_seq(Some(items.len()))?;
				for item in items {
					seq.serialize_element(item)?;
				}
				seq.end()
			}
		}
	}
}
