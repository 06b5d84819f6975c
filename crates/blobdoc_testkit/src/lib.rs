//! Shared test helpers for workspace crates.
//!
//! [`BlobWriter`] emits wire entries byte by byte so tests can describe
//! blobs without hand-written hex. It encodes on its own, from the tag
//! constants in [`tags`], so decoder tests do not share code with the
//! decoder under test.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// Wire tag bytes.
#[allow(missing_docs)]
pub mod tags {
	pub const INVALID: u8 = 0x00;
	pub const NAMED_REF_NODE: u8 = 0x01;
	pub const UNNAMED_REF_NODE: u8 = 0x02;
	pub const NAMED_STRUCT_NODE: u8 = 0x03;
	pub const UNNAMED_STRUCT_NODE: u8 = 0x04;
	pub const END_OF_NODE: u8 = 0x05;
	pub const START_OF_ARRAY: u8 = 0x06;
	pub const END_OF_ARRAY: u8 = 0x07;
	pub const PRIMITIVE_ARRAY: u8 = 0x08;
	pub const NAMED_INTERNAL_REF: u8 = 0x09;
	pub const UNNAMED_INTERNAL_REF: u8 = 0x0a;
	pub const NAMED_EXTERNAL_BY_INDEX: u8 = 0x0b;
	pub const UNNAMED_EXTERNAL_BY_INDEX: u8 = 0x0c;
	pub const NAMED_EXTERNAL_BY_GUID: u8 = 0x0d;
	pub const UNNAMED_EXTERNAL_BY_GUID: u8 = 0x0e;
	pub const NAMED_BYTE: u8 = 0x11;
	pub const UNNAMED_BYTE: u8 = 0x12;
	pub const NAMED_SHORT: u8 = 0x13;
	pub const NAMED_INT: u8 = 0x17;
	pub const UNNAMED_INT: u8 = 0x18;
	pub const NAMED_LONG: u8 = 0x1b;
	pub const UNNAMED_LONG: u8 = 0x1c;
	pub const NAMED_ULONG: u8 = 0x1d;
	pub const NAMED_FLOAT: u8 = 0x1f;
	pub const NAMED_DOUBLE: u8 = 0x21;
	pub const UNNAMED_DOUBLE: u8 = 0x22;
	pub const NAMED_DECIMAL: u8 = 0x23;
	pub const NAMED_CHAR: u8 = 0x25;
	pub const NAMED_STRING: u8 = 0x27;
	pub const UNNAMED_STRING: u8 = 0x28;
	pub const NAMED_GUID: u8 = 0x29;
	pub const UNNAMED_GUID: u8 = 0x2a;
	pub const NAMED_BOOLEAN: u8 = 0x2b;
	pub const UNNAMED_BOOLEAN: u8 = 0x2c;
	pub const NAMED_NULL: u8 = 0x2d;
	pub const UNNAMED_NULL: u8 = 0x2e;
	pub const TYPE_NAME: u8 = 0x2f;
	pub const TYPE_ID: u8 = 0x30;
	pub const END_OF_STREAM: u8 = 0x31;
	pub const NAMED_EXTERNAL_BY_STRING: u8 = 0x32;
	pub const UNNAMED_EXTERNAL_BY_STRING: u8 = 0x33;
}

/// Little-endian wire writer for test blobs.
#[derive(Debug, Default)]
pub struct BlobWriter {
	buf: Vec<u8>,
	types: HashMap<String, i32>,
}

impl BlobWriter {
	/// Create an empty writer.
	pub fn new() -> Self {
		Self::default()
	}

	/// Return the encoded bytes.
	pub fn finish(self) -> Vec<u8> {
		self.buf
	}

	/// Return the encoded bytes as lowercase hex.
	pub fn finish_hex(self) -> String {
		hex::encode(self.buf)
	}

	/// Append raw bytes.
	pub fn raw(mut self, bytes: &[u8]) -> Self {
		self.buf.extend_from_slice(bytes);
		self
	}

	/// Append a wide (UTF-16) string with its flag and length prefix.
	pub fn wide_str(mut self, text: &str) -> Self {
		let units: Vec<u16> = text.encode_utf16().collect();
		self.buf.push(1);
		self.buf.extend_from_slice(&(units.len() as i32).to_le_bytes());
		for unit in units {
			self.buf.extend_from_slice(&unit.to_le_bytes());
		}
		self
	}

	/// Append a narrow string: flag 0, byte length, each byte followed by padding.
	pub fn narrow_str(mut self, text: &str) -> Self {
		self.buf.push(0);
		self.buf.extend_from_slice(&((text.len() * 2) as i32).to_le_bytes());
		for byte in text.bytes() {
			self.buf.push(byte);
			self.buf.push(0);
		}
		self
	}

	fn tag(mut self, named: u8, unnamed: u8, name: Option<&str>) -> Self {
		match name {
			Some(name) => {
				self.buf.push(named);
				self.wide_str(name)
			}
			None => {
				self.buf.push(unnamed);
				self
			}
		}
	}

	fn type_entry(mut self, type_name: Option<&str>) -> Self {
		let Some(type_name) = type_name else {
			self.buf.push(tags::UNNAMED_NULL);
			return self;
		};
		if let Some(id) = self.types.get(type_name).copied() {
			self.buf.push(tags::TYPE_ID);
			self.buf.extend_from_slice(&id.to_le_bytes());
			return self;
		}
		let id = self.types.len() as i32;
		self.types.insert(type_name.to_owned(), id);
		self.buf.push(tags::TYPE_NAME);
		self.buf.extend_from_slice(&id.to_le_bytes());
		self.wide_str(type_name)
	}

	/// Start a reference node carrying a node id.
	pub fn ref_node(self, name: Option<&str>, type_name: Option<&str>, id: i32) -> Self {
		let mut out = self.tag(tags::NAMED_REF_NODE, tags::UNNAMED_REF_NODE, name).type_entry(type_name);
		out.buf.extend_from_slice(&id.to_le_bytes());
		out
	}

	/// Start a struct node (no node id).
	pub fn struct_node(self, name: Option<&str>, type_name: Option<&str>) -> Self {
		self.tag(tags::NAMED_STRUCT_NODE, tags::UNNAMED_STRUCT_NODE, name).type_entry(type_name)
	}

	/// Close the innermost node.
	pub fn end_node(mut self) -> Self {
		self.buf.push(tags::END_OF_NODE);
		self
	}

	/// Start an array with a declared length.
	pub fn array(mut self, len: i64) -> Self {
		self.buf.push(tags::START_OF_ARRAY);
		self.buf.extend_from_slice(&len.to_le_bytes());
		self
	}

	/// Close the innermost array.
	pub fn end_array(mut self) -> Self {
		self.buf.push(tags::END_OF_ARRAY);
		self
	}

	/// Append a packed primitive array.
	pub fn primitive_array(mut self, count: i32, width: i32, data: &[u8]) -> Self {
		self.buf.push(tags::PRIMITIVE_ARRAY);
		self.buf.extend_from_slice(&count.to_le_bytes());
		self.buf.extend_from_slice(&width.to_le_bytes());
		self.buf.extend_from_slice(data);
		self
	}

	/// Append an `i32` entry.
	pub fn int(self, name: Option<&str>, value: i32) -> Self {
		let mut out = self.tag(tags::NAMED_INT, tags::UNNAMED_INT, name);
		out.buf.extend_from_slice(&value.to_le_bytes());
		out
	}

	/// Append an `i64` entry.
	pub fn long(self, name: Option<&str>, value: i64) -> Self {
		let mut out = self.tag(tags::NAMED_LONG, tags::UNNAMED_LONG, name);
		out.buf.extend_from_slice(&value.to_le_bytes());
		out
	}

	/// Append a `u8` entry.
	pub fn byte(self, name: Option<&str>, value: u8) -> Self {
		let mut out = self.tag(tags::NAMED_BYTE, tags::UNNAMED_BYTE, name);
		out.buf.push(value);
		out
	}

	/// Append an `f64` entry.
	pub fn double(self, name: Option<&str>, value: f64) -> Self {
		let mut out = self.tag(tags::NAMED_DOUBLE, tags::UNNAMED_DOUBLE, name);
		out.buf.extend_from_slice(&value.to_le_bytes());
		out
	}

	/// Append a boolean entry.
	pub fn boolean(self, name: Option<&str>, value: bool) -> Self {
		let mut out = self.tag(tags::NAMED_BOOLEAN, tags::UNNAMED_BOOLEAN, name);
		out.buf.push(u8::from(value));
		out
	}

	/// Append a wide string entry.
	pub fn string(self, name: Option<&str>, value: &str) -> Self {
		self.tag(tags::NAMED_STRING, tags::UNNAMED_STRING, name).wide_str(value)
	}

	/// Append a narrow string entry.
	pub fn narrow_string(self, name: Option<&str>, value: &str) -> Self {
		self.tag(tags::NAMED_STRING, tags::UNNAMED_STRING, name).narrow_str(value)
	}

	/// Append a guid entry.
	pub fn guid(self, name: Option<&str>, value: [u8; 16]) -> Self {
		self.tag(tags::NAMED_GUID, tags::UNNAMED_GUID, name).raw(&value)
	}

	/// Append a null entry.
	pub fn null(self, name: Option<&str>) -> Self {
		self.tag(tags::NAMED_NULL, tags::UNNAMED_NULL, name)
	}

	/// Append an internal reference to a node id.
	pub fn internal_ref(self, name: Option<&str>, id: i32) -> Self {
		let mut out = self.tag(tags::NAMED_INTERNAL_REF, tags::UNNAMED_INTERNAL_REF, name);
		out.buf.extend_from_slice(&id.to_le_bytes());
		out
	}

	/// Append an external reference by table index.
	pub fn external_index(self, name: Option<&str>, index: i32) -> Self {
		let mut out = self.tag(tags::NAMED_EXTERNAL_BY_INDEX, tags::UNNAMED_EXTERNAL_BY_INDEX, name);
		out.buf.extend_from_slice(&index.to_le_bytes());
		out
	}

	/// Append an external reference by guid.
	pub fn external_guid(self, name: Option<&str>, value: [u8; 16]) -> Self {
		self.tag(tags::NAMED_EXTERNAL_BY_GUID, tags::UNNAMED_EXTERNAL_BY_GUID, name).raw(&value)
	}

	/// Append an external reference by string.
	pub fn external_string(self, name: Option<&str>, value: &str) -> Self {
		self.tag(tags::NAMED_EXTERNAL_BY_STRING, tags::UNNAMED_EXTERNAL_BY_STRING, name)
			.wide_str(value)
	}

	/// Append a single tag byte with no payload.
	pub fn tag_byte(mut self, byte: u8) -> Self {
		self.buf.push(byte);
		self
	}

	/// Append the end-of-stream marker.
	pub fn end_of_stream(self) -> Self {
		self.tag_byte(tags::END_OF_STREAM)
	}
}

/// Resolve the workspace root path.
pub fn workspace_root() -> PathBuf {
	let manifest_dir = Path::new(env!("CARGO_MANIFEST_DIR"));
	manifest_dir
		.join("..")
		.join("..")
		.canonicalize()
		.unwrap_or_else(|_| manifest_dir.join("..").join(".."))
}

/// Resolve a fixture path under `<workspace>/fixtures`.
pub fn fixture_path(name: &str) -> PathBuf {
	workspace_root().join("fixtures").join(name)
}
