use thiserror::Error;

/// Crate-local result type.
pub type Result<T> = std::result::Result<T, BlobError>;

/// Errors produced while reading and decoding serialized blobs.
#[derive(Debug, Error)]
pub enum BlobError {
	/// Filesystem or stream IO failure.
	#[error("io: {0}")]
	Io(#[from] std::io::Error),
	/// Record or name index JSON failed to parse.
	#[error("json: {0}")]
	Json(#[from] serde_json::Error),
	/// Not enough bytes remained for a fixed-width read.
	#[error("buffer underrun at offset {at}, need {need} bytes, remaining {rem}")]
	BufferUnderrun {
		/// Byte offset where the read was attempted.
		at: usize,
		/// Requested bytes.
		need: usize,
		/// Bytes still available.
		rem: usize,
	},
	/// Entry kind did not match the operation requested on it.
	#[error("unexpected tag at offset {at}: expected {expected}, got {got}")]
	UnexpectedTag {
		/// Logical kind the operation required.
		expected: &'static str,
		/// Logical kind actually peeked.
		got: &'static str,
		/// Cursor offset after the peeked tag.
		at: usize,
	},
	/// Resolver found no value for an external reference.
	#[error("unresolved external reference: {token}")]
	UnresolvedReference {
		/// Rendered reference token.
		token: String,
	},
	/// A retry or iteration bound was exceeded.
	#[error("malformed input: {context} exceeded limit {limit}")]
	MalformedLoop {
		/// Which loop hit its bound.
		context: &'static str,
		/// Configured bound.
		limit: usize,
	},
	/// Node/array nesting exceeded the configured depth.
	#[error("nesting depth exceeded (max={max_depth})")]
	DepthExceeded {
		/// Configured depth ceiling.
		max_depth: usize,
	},
	/// Declared array length exceeded the configured limit.
	#[error("array too large: count={count}, max={max}")]
	ArrayTooLarge {
		/// Declared element count.
		count: u64,
		/// Maximum permitted element count.
		max: usize,
	},
	/// Length prefix was negative.
	#[error("negative length {len} at offset {at}")]
	NegativeLength {
		/// Parsed signed length.
		len: i64,
		/// Cursor offset after the length read.
		at: usize,
	},
	/// Hex input could not be decoded.
	#[error("invalid hex input: {reason}")]
	InvalidHex {
		/// Decoder failure description.
		reason: String,
	},
}
