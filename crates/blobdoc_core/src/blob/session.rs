use tracing::debug;

use crate::blob::{DecodeOptions, Decoder, Endianness, RefResolver, Result, Value, collapse_node, decode_hex};

/// One decode of one byte buffer.
///
/// Each session owns its node table and type table; [`BlobSession::parse`]
/// consumes the session so it cannot be reused.
pub struct BlobSession<'a, R> {
	bytes: &'a [u8],
	endianness: Endianness,
	resolver: R,
	options: DecodeOptions,
}

impl<'a, R: RefResolver> BlobSession<'a, R> {
	/// Create a session with default limits.
	pub fn new(bytes: &'a [u8], endianness: Endianness, resolver: R) -> Self {
		Self {
			bytes,
			endianness,
			resolver,
			options: DecodeOptions::default(),
		}
	}

	/// Replace the decode limits.
	pub fn with_options(mut self, options: DecodeOptions) -> Self {
		self.options = options;
		self
	}

	/// Decode every top-level entry and collapse them into one value.
	///
	/// An empty buffer, or one holding only empty containers, yields
	/// [`Value::Null`].
	pub fn parse(self) -> Result<Value> {
		debug!(
			len = self.bytes.len(),
			endianness = self.endianness.as_str(),
			"parsing blob"
		);
		let mut decoder = Decoder::new(self.bytes, self.endianness, self.resolver, self.options);
		let slots = decoder.decode_all()?;
		debug!(entries = slots.len(), end = decoder.reader().pos(), "top-level entries decoded");

		let top = collapse_node(None, slots);
		Ok(match top.value {
			Value::Map(fields) if fields.is_empty() => Value::Null,
			value => value,
		})
	}
}

/// Decode little-endian blob bytes with default limits.
pub fn parse_bytes<R: RefResolver>(bytes: &[u8], resolver: R) -> Result<Value> {
	BlobSession::new(bytes, Endianness::Little, resolver).parse()
}

/// Decode a hex-encoded little-endian blob with default limits.
pub fn parse_hex<R: RefResolver>(text: &str, resolver: R) -> Result<Value> {
	let bytes = decode_hex(text)?;
	parse_bytes(&bytes, resolver)
}

#[cfg(test)]
mod tests {
	use blobdoc_testkit::BlobWriter;

	use crate::blob::{BlobError, BlobSession, DecodeOptions, Endianness, NullResolver, Value, parse_bytes, parse_hex};

	#[test]
	fn empty_buffer_is_null() {
		assert_eq!(parse_bytes(&[], NullResolver).expect("parse"), Value::Null);
	}

	#[test]
	fn single_top_level_value_is_returned_bare() {
		let hex = BlobWriter::new().int(Some("value"), 42).finish_hex();
		assert_eq!(parse_hex(&hex, NullResolver).expect("parse"), Value::I64(42));
	}

	#[test]
	fn several_top_level_entries_form_a_map() {
		let bytes = BlobWriter::new().int(Some("a"), 1).boolean(Some("b"), true).finish();
		let value = parse_bytes(&bytes, NullResolver).expect("parse");
		assert_eq!(value.get("a"), Some(&Value::I64(1)));
		assert_eq!(value.get("b"), Some(&Value::Bool(true)));
	}

	#[test]
	fn truncated_buffer_underruns() {
		let mut bytes = BlobWriter::new()
			.struct_node(None, Some("Row"))
			.long(Some("amount"), 5)
			.end_node()
			.finish();
		bytes.truncate(bytes.len() - 5);
		assert!(matches!(parse_bytes(&bytes, NullResolver), Err(BlobError::BufferUnderrun { .. })));
	}

	#[test]
	fn options_are_applied() {
		let bytes = vec![0_u8; 16];
		let session = BlobSession::new(&bytes, Endianness::Little, NullResolver).with_options(DecodeOptions::strict());
		assert!(matches!(session.parse(), Err(BlobError::MalformedLoop { limit: 8, .. })));
	}

	#[test]
	fn big_endian_session() {
		let bytes = [0x18, 0x00, 0x00, 0x00, 0x07];
		let value = BlobSession::new(&bytes, Endianness::Big, NullResolver).parse().expect("parse");
		assert_eq!(value, Value::I64(7));
	}
}
