use std::fs;
use std::path::Path;

use blobdoc::blob::{Endianness, Result, SerializationRecord, decode_hex};
use serde::Serialize;
use tracing::debug;

/// How the input file was interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum InputKind {
	Record,
	Hex,
	Raw,
}

impl InputKind {
	pub(crate) fn as_str(self) -> &'static str {
		match self {
			Self::Record => "record",
			Self::Hex => "hex",
			Self::Raw => "raw",
		}
	}
}

/// Blob bytes plus the record they came from, if any.
pub(crate) struct LoadedBlob {
	pub(crate) kind: InputKind,
	pub(crate) bytes: Vec<u8>,
	pub(crate) record: SerializationRecord,
}

/// Load a JSON serialization record, hex text, or raw blob bytes.
pub(crate) fn load_blob(path: &Path) -> Result<LoadedBlob> {
	let raw = fs::read(path)?;
	let loaded = if raw.trim_ascii_start().first() == Some(&b'{') {
		let record = SerializationRecord::from_json(&String::from_utf8_lossy(&raw))?;
		LoadedBlob {
			kind: InputKind::Record,
			bytes: record.bytes()?,
			record,
		}
	} else if looks_like_hex(&raw) {
		LoadedBlob {
			kind: InputKind::Hex,
			bytes: decode_hex(&String::from_utf8_lossy(&raw))?,
			record: SerializationRecord::default(),
		}
	} else {
		LoadedBlob {
			kind: InputKind::Raw,
			bytes: raw,
			record: SerializationRecord::default(),
		}
	};
	debug!(path = %path.display(), kind = loaded.kind.as_str(), len = loaded.bytes.len(), "loaded input");
	Ok(loaded)
}

/// Whether file content reads as hex digits with optional whitespace and `0x` prefix.
pub(crate) fn looks_like_hex(bytes: &[u8]) -> bool {
	let text = bytes.trim_ascii();
	let body = text
		.strip_prefix(b"0x")
		.or_else(|| text.strip_prefix(b"0X"))
		.unwrap_or(text);
	!body.is_empty() && body.iter().all(|byte| byte.is_ascii_hexdigit() || byte.is_ascii_whitespace())
}

pub(crate) fn endianness(big_endian: bool) -> Endianness {
	if big_endian { Endianness::Big } else { Endianness::Little }
}

/// Print a payload as pretty JSON on stdout.
pub(crate) fn emit_json<T: Serialize>(payload: &T) -> Result<()> {
	println!("{}", serde_json::to_string_pretty(payload)?);
	Ok(())
}
