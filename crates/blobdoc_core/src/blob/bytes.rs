use crate::blob::{BlobError, Guid, Result};

/// Byte order used for multi-byte reads.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Endianness {
	/// Little-endian byte order.
	#[default]
	Little,
	/// Big-endian byte order.
	Big,
}

impl Endianness {
	/// Stable lowercase label.
	pub fn as_str(self) -> &'static str {
		match self {
			Self::Little => "little",
			Self::Big => "big",
		}
	}
}

/// Bounded cursor over an immutable byte slice.
///
/// A read that needs more bytes than remain fails with
/// [`BlobError::BufferUnderrun`] and leaves the cursor at end-of-buffer.
pub struct Cursor<'a> {
	bytes: &'a [u8],
	pos: usize,
	endianness: Endianness,
}

impl<'a> Cursor<'a> {
	/// Create a little-endian cursor at position 0.
	pub fn new(bytes: &'a [u8]) -> Self {
		Self::with_endianness(bytes, Endianness::Little)
	}

	/// Create a cursor at position 0 with explicit byte order.
	pub fn with_endianness(bytes: &'a [u8], endianness: Endianness) -> Self {
		Self { bytes, pos: 0, endianness }
	}

	/// Return current byte offset.
	pub fn pos(&self) -> usize {
		self.pos
	}

	/// Return total buffer length.
	pub fn len(&self) -> usize {
		self.bytes.len()
	}

	/// Return whether the underlying buffer is empty.
	pub fn is_empty(&self) -> bool {
		self.bytes.is_empty()
	}

	/// Return remaining unread bytes.
	pub fn remaining(&self) -> usize {
		self.bytes.len().saturating_sub(self.pos)
	}

	/// Return whether every byte has been consumed.
	pub fn is_at_end(&self) -> bool {
		self.remaining() == 0
	}

	/// Return configured byte order.
	pub fn endianness(&self) -> Endianness {
		self.endianness
	}

	/// Read exactly `n` bytes and advance cursor.
	pub fn read_exact(&mut self, n: usize) -> Result<&'a [u8]> {
		if n > self.remaining() {
			let err = BlobError::BufferUnderrun {
				at: self.pos,
				need: n,
				rem: self.remaining(),
			};
			self.pos = self.bytes.len();
			return Err(err);
		}

		let start = self.pos;
		self.pos += n;
		Ok(&self.bytes[start..self.pos])
	}

	/// Advance past `n` bytes without returning them.
	pub fn skip(&mut self, n: usize) -> Result<()> {
		let _ = self.read_exact(n)?;
		Ok(())
	}

	fn read_array<const N: usize>(&mut self) -> Result<[u8; N]> {
		let raw = self.read_exact(N)?;
		let mut out = [0_u8; N];
		out.copy_from_slice(raw);
		Ok(out)
	}

	/// Read one byte.
	pub fn read_u8(&mut self) -> Result<u8> {
		Ok(self.read_array::<1>()?[0])
	}

	/// Read a signed byte.
	pub fn read_i8(&mut self) -> Result<i8> {
		Ok(i8::from_ne_bytes(self.read_array::<1>()?))
	}

	/// Read an `i16` using the cursor byte order.
	pub fn read_i16(&mut self) -> Result<i16> {
		let buf = self.read_array::<2>()?;
		Ok(match self.endianness {
			Endianness::Little => i16::from_le_bytes(buf),
			Endianness::Big => i16::from_be_bytes(buf),
		})
	}

	/// Read a `u16` using the cursor byte order.
	pub fn read_u16(&mut self) -> Result<u16> {
		let buf = self.read_array::<2>()?;
		Ok(match self.endianness {
			Endianness::Little => u16::from_le_bytes(buf),
			Endianness::Big => u16::from_be_bytes(buf),
		})
	}

	/// Read an `i32` using the cursor byte order.
	pub fn read_i32(&mut self) -> Result<i32> {
		let buf = self.read_array::<4>()?;
		Ok(match self.endianness {
			Endianness::Little => i32::from_le_bytes(buf),
			Endianness::Big => i32::from_be_bytes(buf),
		})
	}

	/// Read a `u32` using the cursor byte order.
	pub fn read_u32(&mut self) -> Result<u32> {
		let buf = self.read_array::<4>()?;
		Ok(match self.endianness {
			Endianness::Little => u32::from_le_bytes(buf),
			Endianness::Big => u32::from_be_bytes(buf),
		})
	}

	/// Read an `i64` using the cursor byte order.
	pub fn read_i64(&mut self) -> Result<i64> {
		let buf = self.read_array::<8>()?;
		Ok(match self.endianness {
			Endianness::Little => i64::from_le_bytes(buf),
			Endianness::Big => i64::from_be_bytes(buf),
		})
	}

	/// Read a `u64` using the cursor byte order.
	pub fn read_u64(&mut self) -> Result<u64> {
		let buf = self.read_array::<8>()?;
		Ok(match self.endianness {
			Endianness::Little => u64::from_le_bytes(buf),
			Endianness::Big => u64::from_be_bytes(buf),
		})
	}

	/// Read an IEEE-754 `f32` using the cursor byte order.
	pub fn read_f32(&mut self) -> Result<f32> {
		Ok(f32::from_bits(self.read_u32()?))
	}

	/// Read an IEEE-754 `f64` using the cursor byte order.
	pub fn read_f64(&mut self) -> Result<f64> {
		Ok(f64::from_bits(self.read_u64()?))
	}

	/// Read 16 opaque identifier bytes. Byte order does not apply.
	pub fn read_guid(&mut self) -> Result<Guid> {
		Ok(Guid(self.read_array::<16>()?))
	}

	/// Read a flag-prefixed, length-prefixed string.
	///
	/// Flag `0` stores one code unit per two bytes and the length counts
	/// bytes, so every other byte is dropped. Any other flag stores
	/// `length` UTF-16 code units.
	pub fn read_string(&mut self) -> Result<String> {
		let flag = self.read_u8()?;
		let len = self.read_i32()?;
		let len = usize::try_from(len).map_err(|_| BlobError::NegativeLength {
			len: i64::from(len),
			at: self.pos,
		})?;

		if flag == 0 {
			let raw = self.read_exact(len)?;
			let kept: Vec<u8> = raw.iter().step_by(2).copied().collect();
			return Ok(String::from_utf8_lossy(&kept).into_owned());
		}

		let byte_len = len.checked_mul(2).ok_or(BlobError::BufferUnderrun {
			at: self.pos,
			need: usize::MAX,
			rem: self.remaining(),
		})?;
		let raw = self.read_exact(byte_len)?;
		let units: Vec<u16> = raw
			.chunks_exact(2)
			.map(|pair| match self.endianness {
				Endianness::Little => u16::from_le_bytes([pair[0], pair[1]]),
				Endianness::Big => u16::from_be_bytes([pair[0], pair[1]]),
			})
			.collect();
		Ok(String::from_utf16_lossy(&units))
	}
}
