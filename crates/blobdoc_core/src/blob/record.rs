//! Serialization records and display-name indexes.
//!
//! A record wraps one blob together with the side table of objects its
//! by-index external references point into. Both are read from JSON.

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use serde::Deserialize;
use tracing::debug;

use crate::blob::{Result, TableResolver, decode_hex};

/// Entry of a record's referenced-object table.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct ObjectRef {
	/// Opaque object identifier.
	#[serde(default)]
	pub guid: Option<String>,
	/// Local file identifier, used when no guid is present.
	#[serde(default, alias = "fileID", alias = "FileID")]
	pub file_id: Option<i64>,
}

impl ObjectRef {
	/// Identifier token used to look up a display name.
	pub fn token(&self) -> Option<Box<str>> {
		match (&self.guid, self.file_id) {
			(Some(guid), _) if !guid.is_empty() => Some(guid.as_str().into()),
			(_, Some(file_id)) => Some(file_id.to_string().into_boxed_str()),
			_ => None,
		}
	}
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
enum RecordBytes {
	Hex(String),
	Raw(Vec<u8>),
}

impl Default for RecordBytes {
	fn default() -> Self {
		Self::Raw(Vec::new())
	}
}

/// Serialized blob plus its referenced-object table.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct SerializationRecord {
	/// Format discriminator; `0` is the binary format.
	#[serde(default, alias = "SerializedFormat")]
	pub serialized_format: i32,
	#[serde(default, alias = "SerializedBytes")]
	serialized_bytes: RecordBytes,
	/// Objects addressed by by-index external references.
	#[serde(default, alias = "ReferencedUnityObjects")]
	pub referenced_objects: Vec<ObjectRef>,
}

impl SerializationRecord {
	/// Parse a record from JSON text.
	pub fn from_json(text: &str) -> Result<Self> {
		let record: Self = serde_json::from_str(text)?;
		debug!(
			format = record.serialized_format,
			objects = record.referenced_objects.len(),
			"loaded serialization record"
		);
		Ok(record)
	}

	/// Read and parse a record file.
	pub fn load(path: impl AsRef<Path>) -> Result<Self> {
		Self::from_json(&fs::read_to_string(path)?)
	}

	/// Blob bytes, decoding the hex form when needed.
	pub fn bytes(&self) -> Result<Vec<u8>> {
		match &self.serialized_bytes {
			RecordBytes::Hex(text) => decode_hex(text),
			RecordBytes::Raw(bytes) => Ok(bytes.clone()),
		}
	}

	/// Identifier token per referenced object, in table order.
	pub fn reference_tokens(&self) -> Vec<Option<Box<str>>> {
		self.referenced_objects.iter().map(ObjectRef::token).collect()
	}

	/// Build a resolver over this record's table and `names`.
	pub fn resolver(&self, names: &NameIndex) -> TableResolver {
		TableResolver::new(self.reference_tokens(), names.entries.clone())
	}
}

/// Identifier to display-name map.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(transparent)]
pub struct NameIndex {
	entries: HashMap<Box<str>, Box<str>>,
}

impl NameIndex {
	/// Parse an index from a JSON object of strings.
	pub fn from_json(text: &str) -> Result<Self> {
		Ok(serde_json::from_str(text)?)
	}

	/// Read and parse an index file.
	pub fn load(path: impl AsRef<Path>) -> Result<Self> {
		Self::from_json(&fs::read_to_string(path)?)
	}

	/// Number of identifiers.
	pub fn len(&self) -> usize {
		self.entries.len()
	}

	/// Whether the index is empty.
	pub fn is_empty(&self) -> bool {
		self.entries.is_empty()
	}

	/// Display name for `identifier`.
	pub fn get(&self, identifier: &str) -> Option<&str> {
		self.entries.get(identifier).map(AsRef::as_ref)
	}
}

#[cfg(test)]
mod tests;
