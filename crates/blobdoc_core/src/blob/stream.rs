use std::collections::HashMap;

use tracing::{debug, trace, warn};

use crate::blob::tag::scalar_width;
use crate::blob::{
	BlobError, Cursor, Endianness, EntryKind, EntryTag, ExternalRef, ExternalRefKind, Guid, NodeFrame, NodeStack, Result, TypeToken, Value,
};

/// Cached result of one `peek`.
#[derive(Debug, Clone)]
struct Peeked {
	tag: EntryTag,
	kind: EntryKind,
	name: Option<Box<str>>,
	offset: usize,
}

/// One-entry lookahead reader over the wire entry stream.
///
/// `peek` reads a tag (and its name, for named tags) and caches it until
/// `mark_consumed` or one of the payload reads clears the cache.
pub struct EntryReader<'a> {
	cursor: Cursor<'a>,
	stack: NodeStack,
	peeked: Option<Peeked>,
	types: HashMap<i32, Box<str>>,
}

impl<'a> EntryReader<'a> {
	/// Create a reader over `bytes` with a nesting cap of `max_depth`.
	pub fn new(bytes: &'a [u8], endianness: Endianness, max_depth: usize) -> Self {
		Self {
			cursor: Cursor::with_endianness(bytes, endianness),
			stack: NodeStack::new(max_depth),
			peeked: None,
			types: HashMap::new(),
		}
	}

	/// Return the cursor byte offset.
	pub fn pos(&self) -> usize {
		self.cursor.pos()
	}

	/// Return whether the buffer is exhausted and nothing is cached.
	pub fn is_at_end(&self) -> bool {
		self.peeked.is_none() && self.cursor.is_at_end()
	}

	/// Return number of open nodes and arrays.
	pub fn depth(&self) -> usize {
		self.stack.depth()
	}

	/// Return the innermost open node or array.
	pub fn current_frame(&self) -> Option<&NodeFrame> {
		self.stack.top()
	}

	/// Return the wire tag of the cached entry.
	pub fn current_tag(&self) -> Option<EntryTag> {
		self.peeked.as_ref().map(|peeked| peeked.tag)
	}

	/// Return the byte offset of the cached entry's tag.
	pub fn current_offset(&self) -> Option<usize> {
		self.peeked.as_ref().map(|peeked| peeked.offset)
	}

	/// Peek the next entry kind and name without consuming its payload.
	///
	/// Repeated calls return the cached entry. End-of-buffer reports
	/// [`EntryKind::StreamEnd`].
	pub fn peek(&mut self) -> Result<(EntryKind, Option<&str>)> {
		let peeked = match self.peeked.take() {
			Some(peeked) => peeked,
			None => self.read_header()?,
		};
		let peeked = self.peeked.insert(peeked);
		Ok((peeked.kind, peeked.name.as_deref()))
	}

	/// Clear the cached entry.
	pub fn mark_consumed(&mut self) {
		self.peeked = None;
	}

	fn read_header(&mut self) -> Result<Peeked> {
		let offset = self.cursor.pos();
		if self.cursor.is_at_end() {
			return Ok(Peeked {
				tag: EntryTag::EndOfStream,
				kind: EntryKind::StreamEnd,
				name: None,
				offset,
			});
		}

		let tag = EntryTag::from_byte(self.cursor.read_u8()?);
		let name = if tag.is_named() {
			Some(self.cursor.read_string()?.into_boxed_str())
		} else {
			None
		};
		trace!(offset, tag = tag.as_str(), name = name.as_deref(), "entry");
		Ok(Peeked {
			tag,
			kind: tag.kind(),
			name,
			offset,
		})
	}

	fn peeked_tag(&mut self) -> Result<EntryTag> {
		self.peek()?;
		Ok(self.peeked.as_ref().map_or(EntryTag::EndOfStream, |peeked| peeked.tag))
	}

	/// Advance past the cached entry's payload without interpreting it.
	///
	/// Node entries consume their type entry and id, arrays only their
	/// declared length. The entry stays cached.
	pub fn skip_content(&mut self) -> Result<()> {
		let tag = self.peeked_tag()?;
		if let Some(width) = scalar_width(tag) {
			return self.cursor.skip(width);
		}

		match tag {
			EntryTag::NamedString
			| EntryTag::UnnamedString
			| EntryTag::NamedExternalReferenceByString
			| EntryTag::UnnamedExternalReferenceByString => {
				let _ = self.cursor.read_string()?;
			}
			EntryTag::NamedStartOfReferenceNode | EntryTag::UnnamedStartOfReferenceNode => {
				let _ = self.read_type_entry()?;
				let _ = self.cursor.read_i32()?;
			}
			EntryTag::NamedStartOfStructNode | EntryTag::UnnamedStartOfStructNode => {
				let _ = self.read_type_entry()?;
			}
			EntryTag::StartOfArray => {
				let _ = self.cursor.read_i64()?;
			}
			EntryTag::PrimitiveArray => {
				let (count, width) = self.read_primitive_header()?;
				self.cursor.skip(count.saturating_mul(width))?;
			}
			EntryTag::TypeName => {
				let id = self.cursor.read_i32()?;
				let name = self.cursor.read_string()?;
				self.types.insert(id, name.into_boxed_str());
			}
			EntryTag::TypeId => {
				let _ = self.cursor.read_i32()?;
			}
			_ => {}
		}
		Ok(())
	}

	/// Skip the whole subtree rooted at the next entry.
	///
	/// Structural mismatches inside the subtree are skipped over. Stops
	/// without consuming when the stream ends.
	pub fn skip_entry(&mut self) -> Result<()> {
		let mut open: Vec<EntryKind> = Vec::new();
		loop {
			let (kind, _) = self.peek()?;
			match kind {
				EntryKind::StreamEnd => return Ok(()),
				EntryKind::NodeStart | EntryKind::ArrayStart => {
					self.skip_content()?;
					self.mark_consumed();
					open.push(if kind == EntryKind::NodeStart {
						EntryKind::NodeEnd
					} else {
						EntryKind::ArrayEnd
					});
					continue;
				}
				EntryKind::NodeEnd | EntryKind::ArrayEnd => {
					self.mark_consumed();
					if open.last() == Some(&kind) {
						open.pop();
					} else if !open.is_empty() {
						trace!(kind = kind.as_str(), "skipping mismatched end marker");
					}
				}
				_ => {
					self.skip_content()?;
					self.mark_consumed();
				}
			}
			if open.is_empty() {
				return Ok(());
			}
		}
	}

	/// Enter the node at the cursor.
	///
	/// Returns `false` after skipping the entry when it is not a node start.
	pub fn enter_node(&mut self) -> Result<bool> {
		let (kind, _) = self.peek()?;
		if kind != EntryKind::NodeStart {
			debug!(at = self.cursor.pos(), got = kind.as_str(), "enter_node on non-node entry, skipping");
			self.skip_entry()?;
			return Ok(false);
		}

		let Some(peeked) = self.peeked.take() else {
			return Ok(false);
		};
		let type_token = self.read_type_entry()?;
		let id = match peeked.tag {
			EntryTag::NamedStartOfReferenceNode | EntryTag::UnnamedStartOfReferenceNode => self.cursor.read_i32()?,
			_ => -1,
		};
		self.stack.push_node(NodeFrame::node(peeked.name, id, type_token))?;
		Ok(true)
	}

	/// Leave the innermost node, skipping anything before its end marker.
	pub fn exit_node(&mut self) -> Result<()> {
		self.advance_to_end(EntryKind::NodeEnd)?;
		self.stack.pop();
		Ok(())
	}

	/// Enter the array at the cursor and return its declared length.
	///
	/// Returns `None` after skipping the entry when it is not an array start.
	pub fn enter_array(&mut self) -> Result<Option<i64>> {
		let (kind, _) = self.peek()?;
		if kind != EntryKind::ArrayStart {
			debug!(at = self.cursor.pos(), got = kind.as_str(), "enter_array on non-array entry, skipping");
			self.skip_entry()?;
			return Ok(None);
		}

		self.mark_consumed();
		let len = self.cursor.read_i64()?;
		self.stack.push_array()?;
		Ok(Some(len))
	}

	/// Leave the innermost array, skipping anything before its end marker.
	pub fn exit_array(&mut self) -> Result<()> {
		self.advance_to_end(EntryKind::ArrayEnd)?;
		self.stack.pop();
		Ok(())
	}

	fn advance_to_end(&mut self, end: EntryKind) -> Result<()> {
		loop {
			let (kind, _) = self.peek()?;
			if kind == end {
				self.mark_consumed();
				return Ok(());
			}
			if kind == EntryKind::StreamEnd {
				debug!(expected = end.as_str(), "stream ended before container end");
				return Ok(());
			}
			debug!(at = self.cursor.pos(), got = kind.as_str(), expected = end.as_str(), "skipping entry before container end");
			self.skip_entry()?;
		}
	}

	fn take_expected(&mut self, expected: EntryKind) -> Result<EntryTag> {
		let (kind, _) = self.peek()?;
		let matches = match (expected, kind) {
			(EntryKind::ExternalRef(_), EntryKind::ExternalRef(_)) => true,
			_ => expected == kind,
		};
		if !matches {
			return Err(BlobError::UnexpectedTag {
				expected: expected.as_str(),
				got: kind.as_str(),
				at: self.cursor.pos(),
			});
		}
		Ok(self.peeked.take().map_or(EntryTag::Invalid, |peeked| peeked.tag))
	}

	/// Read an integer entry.
	///
	/// Unsigned 64-bit values beyond `i64::MAX` come back as `F64`.
	pub fn read_integer(&mut self) -> Result<Value> {
		let tag = self.take_expected(EntryKind::Integer)?;
		let value = match tag {
			EntryTag::NamedSByte | EntryTag::UnnamedSByte => i64::from(self.cursor.read_i8()?),
			EntryTag::NamedByte | EntryTag::UnnamedByte => i64::from(self.cursor.read_u8()?),
			EntryTag::NamedShort | EntryTag::UnnamedShort => i64::from(self.cursor.read_i16()?),
			EntryTag::NamedUShort | EntryTag::UnnamedUShort => i64::from(self.cursor.read_u16()?),
			EntryTag::NamedInt | EntryTag::UnnamedInt => i64::from(self.cursor.read_i32()?),
			EntryTag::NamedUInt | EntryTag::UnnamedUInt => i64::from(self.cursor.read_u32()?),
			EntryTag::NamedLong | EntryTag::UnnamedLong => self.cursor.read_i64()?,
			_ => {
				let raw = self.cursor.read_u64()?;
				return Ok(i64::try_from(raw).map_or(Value::F64(raw as f64), Value::I64));
			}
		};
		Ok(Value::I64(value))
	}

	/// Read a float, double or decimal entry as `f64`.
	pub fn read_float(&mut self) -> Result<f64> {
		match self.take_expected(EntryKind::FloatingPoint)? {
			EntryTag::NamedFloat | EntryTag::UnnamedFloat => Ok(f64::from(self.cursor.read_f32()?)),
			EntryTag::NamedDouble | EntryTag::UnnamedDouble => self.cursor.read_f64(),
			_ => self.read_decimal(),
		}
	}

	// 96-bit mantissa in three 32-bit words, then flags: scale in bits
	// 16..24, sign in bit 31.
	fn read_decimal(&mut self) -> Result<f64> {
		let lo = self.cursor.read_u32()?;
		let mid = self.cursor.read_u32()?;
		let hi = self.cursor.read_u32()?;
		let flags = self.cursor.read_u32()?;

		let mantissa = (u128::from(hi) << 64) | (u128::from(mid) << 32) | u128::from(lo);
		let scale = ((flags >> 16) & 0xff) as i32;
		let magnitude = mantissa as f64 / 10_f64.powi(scale);
		Ok(if flags & 0x8000_0000 != 0 { -magnitude } else { magnitude })
	}

	/// Read a boolean entry.
	pub fn read_bool(&mut self) -> Result<bool> {
		self.take_expected(EntryKind::Boolean)?;
		Ok(self.cursor.read_u8()? != 0)
	}

	/// Read a string or char entry.
	pub fn read_text(&mut self) -> Result<String> {
		match self.take_expected(EntryKind::String)? {
			EntryTag::NamedChar | EntryTag::UnnamedChar => {
				let unit = self.cursor.read_u16()?;
				let ch = char::decode_utf16([unit])
					.next()
					.and_then(|ch| ch.ok())
					.unwrap_or(char::REPLACEMENT_CHARACTER);
				Ok(ch.to_string())
			}
			_ => self.cursor.read_string(),
		}
	}

	/// Read a guid entry.
	pub fn read_guid(&mut self) -> Result<Guid> {
		self.take_expected(EntryKind::Guid)?;
		self.cursor.read_guid()
	}

	/// Consume a null entry.
	pub fn read_null(&mut self) -> Result<()> {
		self.take_expected(EntryKind::Null)?;
		Ok(())
	}

	/// Read the node id carried by an internal reference entry.
	pub fn read_internal_ref(&mut self) -> Result<i32> {
		self.take_expected(EntryKind::InternalRef)?;
		self.cursor.read_i32()
	}

	/// Read the token carried by an external reference entry.
	pub fn read_external_ref(&mut self) -> Result<ExternalRef> {
		let tag = self.take_expected(EntryKind::ExternalRef(ExternalRefKind::ByIndex))?;
		match tag.kind() {
			EntryKind::ExternalRef(ExternalRefKind::ByGuid) => Ok(ExternalRef::ByGuid(self.cursor.read_guid()?)),
			EntryKind::ExternalRef(ExternalRefKind::ByString) => Ok(ExternalRef::ByString(self.cursor.read_string()?.into_boxed_str())),
			_ => Ok(ExternalRef::ByIndex(self.cursor.read_i32()?)),
		}
	}

	/// Read a packed primitive array.
	///
	/// Widths 1 (unsigned), 2, 4 and 8 (signed) become integers; other
	/// widths become one hex string per element.
	pub fn read_primitive_array(&mut self) -> Result<Vec<Value>> {
		self.take_expected(EntryKind::PrimitiveArray)?;
		let (count, width) = self.read_primitive_header()?;
		if width == 0 {
			warn!(count, "primitive array with zero element width");
			return Ok(Vec::new());
		}

		let total = count.checked_mul(width).ok_or(BlobError::BufferUnderrun {
			at: self.cursor.pos(),
			need: usize::MAX,
			rem: self.cursor.remaining(),
		})?;
		let raw = self.cursor.read_exact(total)?;
		let big = self.cursor.endianness() == Endianness::Big;
		Ok(raw.chunks_exact(width).map(|chunk| primitive_element(chunk, big)).collect())
	}

	fn read_primitive_header(&mut self) -> Result<(usize, usize)> {
		let count = self.read_length()?;
		let width = self.read_length()?;
		Ok((count, width))
	}

	fn read_length(&mut self) -> Result<usize> {
		let len = self.cursor.read_i32()?;
		usize::try_from(len).map_err(|_| BlobError::NegativeLength {
			len: i64::from(len),
			at: self.cursor.pos(),
		})
	}

	fn read_type_entry(&mut self) -> Result<TypeToken> {
		let tag = EntryTag::from_byte(self.cursor.read_u8()?);
		match tag {
			EntryTag::TypeName => {
				let id = self.cursor.read_i32()?;
				let name = self.cursor.read_string()?.into_boxed_str();
				self.types.insert(id, name.clone());
				Ok(TypeToken::Named { id, name })
			}
			EntryTag::TypeId => {
				let id = self.cursor.read_i32()?;
				let name = self.types.get(&id).cloned();
				if name.is_none() {
					debug!(id, "type id without prior declaration");
				}
				Ok(TypeToken::Id { id, name })
			}
			EntryTag::UnnamedNull => Ok(TypeToken::None),
			other => {
				warn!(at = self.cursor.pos(), tag = other.as_str(), "unexpected type entry");
				Ok(TypeToken::None)
			}
		}
	}
}

fn primitive_element(chunk: &[u8], big: bool) -> Value {
	let mut buf = [0_u8; 8];
	match chunk.len() {
		1 => Value::I64(i64::from(chunk[0])),
		2 | 4 | 8 => {
			let n = chunk.len();
			if big {
				buf[..n].copy_from_slice(chunk);
				buf[..n].reverse();
			} else {
				buf[..n].copy_from_slice(chunk);
			}
			let raw = u64::from_le_bytes(buf);
			let shift = 64 - 8 * n as u32;
			Value::I64(((raw << shift) as i64) >> shift)
		}
		_ => Value::text(hex::encode(chunk)),
	}
}
