//! Property tests over arbitrary byte input.
//!
//! Decoding untrusted bytes must end in a value or an error, never a
//! panic or a hang.

use blobdoc::blob::{BlobSession, DecodeOptions, Endianness, NullResolver, Value, decode_hex};
use blobdoc_testkit::BlobWriter;
use proptest::prelude::*;

proptest! {
	/// Arbitrary little-endian bytes decode or fail cleanly.
	#[test]
	fn arbitrary_bytes_never_panic(bytes in proptest::collection::vec(any::<u8>(), 0..512)) {
		let _ = BlobSession::new(&bytes, Endianness::Little, NullResolver)
			.with_options(DecodeOptions::strict())
			.parse();
	}

	/// Arbitrary big-endian bytes decode or fail cleanly.
	#[test]
	fn arbitrary_big_endian_bytes_never_panic(bytes in proptest::collection::vec(any::<u8>(), 0..512)) {
		let _ = BlobSession::new(&bytes, Endianness::Big, NullResolver)
			.with_options(DecodeOptions::strict())
			.parse();
	}

	/// Bytes drawn from the tag range exercise structural paths.
	#[test]
	fn tag_range_bytes_never_panic(bytes in proptest::collection::vec(0u8..0x34, 0..256)) {
		let _ = BlobSession::new(&bytes, Endianness::Little, NullResolver)
			.with_options(DecodeOptions::strict())
			.parse();
	}

	/// A well-formed integer survives the hex path unchanged.
	#[test]
	fn hex_integer_decodes(value in any::<i32>()) {
		let hex = BlobWriter::new().int(Some("n"), value).finish_hex();
		let bytes = decode_hex(&hex).expect("writer emits valid hex");
		let decoded = BlobSession::new(&bytes, Endianness::Little, NullResolver).parse().expect("parse");
		prop_assert_eq!(decoded, Value::I64(i64::from(value)));
	}
}
