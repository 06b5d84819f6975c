//! Structural collapsing of decoded containers.
//!
//! The wire format nests generic collection wrappers arbitrarily deep.
//! Without the declared types, wrappers are stripped by shape: empty maps
//! vanish, single-member containers are replaced by their member, and a
//! member's own name moves up to an unnamed parent slot.

use std::collections::HashSet;

use tracing::debug;

use crate::blob::{FieldValue, Value};

/// One decoded entry together with the name it was written under.
#[derive(Debug, Clone, PartialEq)]
pub struct Slot {
	/// Entry name, `None` for unnamed entries.
	pub name: Option<Box<str>>,
	/// Decoded value.
	pub value: Value,
}

impl Slot {
	/// Build an unnamed slot.
	pub fn unnamed(value: Value) -> Self {
		Self { name: None, value }
	}

	/// Build a named slot.
	pub fn named(name: impl Into<Box<str>>, value: Value) -> Self {
		Self {
			name: Some(name.into()),
			value,
		}
	}
}

/// Build a node value from its child slots.
///
/// Named children are keyed by name, unnamed ones by position. On a
/// duplicate name the later value wins.
pub fn collapse_node(name: Option<Box<str>>, children: Vec<Slot>) -> Slot {
	let mut kept = drop_empty_maps(children);
	if kept.len() == 1 {
		return adopt_single(name, kept.pop());
	}

	let mut fields: Vec<FieldValue> = Vec::with_capacity(kept.len());
	for (index, child) in kept.into_iter().enumerate() {
		let key = child.name.unwrap_or_else(|| index.to_string().into_boxed_str());
		if let Some(existing) = fields.iter_mut().find(|field| field.name == key) {
			debug!(key = key.as_ref(), "duplicate member name, keeping later value");
			existing.value = child.value;
			continue;
		}
		fields.push(FieldValue { name: key, value: child.value });
	}
	Slot {
		name,
		value: Value::Map(fields),
	}
}

/// Build an array value from its element slots.
///
/// Elements that carry names re-key the array into a map when the keys
/// (names, or positions for unnamed elements) are unique.
pub fn collapse_array(name: Option<Box<str>>, children: Vec<Slot>) -> Slot {
	let mut kept = drop_empty_maps(children);
	if kept.len() == 1 {
		return adopt_single(name, kept.pop());
	}

	if kept.iter().any(|child| child.name.is_some()) {
		let keys: Vec<Box<str>> = kept
			.iter()
			.enumerate()
			.map(|(index, child)| child.name.clone().unwrap_or_else(|| index.to_string().into_boxed_str()))
			.collect();
		let mut seen = HashSet::with_capacity(keys.len());
		if keys.iter().all(|key| seen.insert(key.as_ref())) {
			let fields = keys
				.into_iter()
				.zip(kept)
				.map(|(key, child)| FieldValue { name: key, value: child.value })
				.collect();
			return Slot {
				name,
				value: Value::Map(fields),
			};
		}
	}

	Slot {
		name,
		value: Value::List(kept.into_iter().map(|child| child.value).collect()),
	}
}

/// Replace single-member containers with their member until a scalar or
/// multi-member container remains. An unnamed slot takes the member's key.
pub fn unwrap_single(slot: Slot) -> Slot {
	let Slot { mut name, mut value } = slot;
	loop {
		value = match value {
			Value::Map(mut fields) if fields.len() == 1 => match fields.pop() {
				Some(field) => {
					name.get_or_insert(field.name);
					field.value
				}
				None => Value::Map(fields),
			},
			Value::List(mut items) if items.len() == 1 => match items.pop() {
				Some(item) => item,
				None => Value::List(items),
			},
			other => return Slot { name, value: other },
		};
	}
}

fn adopt_single(name: Option<Box<str>>, child: Option<Slot>) -> Slot {
	match child {
		Some(child) => unwrap_single(Slot {
			name: name.or(child.name),
			value: child.value,
		}),
		None => Slot {
			name,
			value: Value::Map(Vec::new()),
		},
	}
}

fn drop_empty_maps(children: Vec<Slot>) -> Vec<Slot> {
	children.into_iter().filter(|child| !child.value.is_empty_map()).collect()
}
