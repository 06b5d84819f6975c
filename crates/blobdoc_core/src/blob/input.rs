use crate::blob::{BlobError, Result};

/// Decode hex text into blob bytes.
///
/// ASCII whitespace anywhere in the text and a leading `0x`/`0X` prefix
/// are ignored.
pub fn decode_hex(text: &str) -> Result<Vec<u8>> {
	let trimmed = text.trim_start();
	let body = trimmed
		.strip_prefix("0x")
		.or_else(|| trimmed.strip_prefix("0X"))
		.unwrap_or(trimmed);
	let digits: String = body.chars().filter(|ch| !ch.is_ascii_whitespace()).collect();
	hex::decode(&digits).map_err(|err| BlobError::InvalidHex { reason: err.to_string() })
}
