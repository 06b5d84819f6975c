/// Which token form an external reference carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExternalRefKind {
	/// Index into the record's referenced-object table.
	ByIndex,
	/// 16-byte opaque identifier.
	ByGuid,
	/// Free-form identifier string.
	ByString,
}

/// Logical entry kind after folding named/unnamed wire pairs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
	/// Start of a reference or struct node.
	NodeStart,
	/// End of the innermost node.
	NodeEnd,
	/// Start of an array with a declared length.
	ArrayStart,
	/// End of the innermost array.
	ArrayEnd,
	/// Packed array of fixed-width primitives.
	PrimitiveArray,
	/// Reference to a node id earlier in the same stream.
	InternalRef,
	/// Reference to a value outside the stream.
	ExternalRef(ExternalRefKind),
	/// Any integer width.
	Integer,
	/// Float, double or decimal.
	FloatingPoint,
	/// One-byte boolean.
	Boolean,
	/// String or single character.
	String,
	/// 16-byte identifier value.
	Guid,
	/// Explicit null.
	Null,
	/// End of stream marker, or end of buffer.
	StreamEnd,
	/// Unrecognized byte.
	Invalid,
	/// Type declaration with name.
	TypeName,
	/// Type back-reference by id.
	TypeId,
}

impl EntryKind {
	/// Stable label used in errors and listings.
	pub fn as_str(self) -> &'static str {
		match self {
			Self::NodeStart => "NodeStart",
			Self::NodeEnd => "NodeEnd",
			Self::ArrayStart => "ArrayStart",
			Self::ArrayEnd => "ArrayEnd",
			Self::PrimitiveArray => "PrimitiveArray",
			Self::InternalRef => "InternalRef",
			Self::ExternalRef(ExternalRefKind::ByIndex) => "ExternalRefByIndex",
			Self::ExternalRef(ExternalRefKind::ByGuid) => "ExternalRefByGuid",
			Self::ExternalRef(ExternalRefKind::ByString) => "ExternalRefByString",
			Self::Integer => "Integer",
			Self::FloatingPoint => "FloatingPoint",
			Self::Boolean => "Boolean",
			Self::String => "String",
			Self::Guid => "Guid",
			Self::Null => "Null",
			Self::StreamEnd => "StreamEnd",
			Self::Invalid => "Invalid",
			Self::TypeName => "TypeName",
			Self::TypeId => "TypeId",
		}
	}
}

macro_rules! entry_tags {
	($($variant:ident = $byte:literal => $kind:expr, $named:literal;)*) => {
		/// One wire-level entry tag byte.
		#[derive(Debug, Clone, Copy, PartialEq, Eq)]
		#[allow(missing_docs)]
		pub enum EntryTag {
			$($variant,)*
		}

		impl EntryTag {
			/// Decode a wire byte; unknown bytes map to [`EntryTag::Invalid`].
			pub fn from_byte(byte: u8) -> Self {
				match byte {
					$($byte => Self::$variant,)*
					_ => Self::Invalid,
				}
			}

			/// Return the wire byte for this tag.
			pub fn byte(self) -> u8 {
				match self {
					$(Self::$variant => $byte,)*
				}
			}

			/// Return the logical kind this tag folds into.
			pub fn kind(self) -> EntryKind {
				match self {
					$(Self::$variant => $kind,)*
				}
			}

			/// Return whether a name string follows the tag byte.
			pub fn is_named(self) -> bool {
				match self {
					$(Self::$variant => $named,)*
				}
			}

			/// Stable wire tag label.
			pub fn as_str(self) -> &'static str {
				match self {
					$(Self::$variant => stringify!($variant),)*
				}
			}
		}
	};
}

use EntryKind as K;
use ExternalRefKind as R;

entry_tags! {
	Invalid = 0x00 => K::Invalid, false;
	NamedStartOfReferenceNode = 0x01 => K::NodeStart, true;
	UnnamedStartOfReferenceNode = 0x02 => K::NodeStart, false;
	NamedStartOfStructNode = 0x03 => K::NodeStart, true;
	UnnamedStartOfStructNode = 0x04 => K::NodeStart, false;
	EndOfNode = 0x05 => K::NodeEnd, false;
	StartOfArray = 0x06 => K::ArrayStart, false;
	EndOfArray = 0x07 => K::ArrayEnd, false;
	PrimitiveArray = 0x08 => K::PrimitiveArray, false;
	NamedInternalReference = 0x09 => K::InternalRef, true;
	UnnamedInternalReference = 0x0a => K::InternalRef, false;
	NamedExternalReferenceByIndex = 0x0b => K::ExternalRef(R::ByIndex), true;
	UnnamedExternalReferenceByIndex = 0x0c => K::ExternalRef(R::ByIndex), false;
	NamedExternalReferenceByGuid = 0x0d => K::ExternalRef(R::ByGuid), true;
	UnnamedExternalReferenceByGuid = 0x0e => K::ExternalRef(R::ByGuid), false;
	NamedSByte = 0x0f => K::Integer, true;
	UnnamedSByte = 0x10 => K::Integer, false;
	NamedByte = 0x11 => K::Integer, true;
	UnnamedByte = 0x12 => K::Integer, false;
	NamedShort = 0x13 => K::Integer, true;
	UnnamedShort = 0x14 => K::Integer, false;
	NamedUShort = 0x15 => K::Integer, true;
	UnnamedUShort = 0x16 => K::Integer, false;
	NamedInt = 0x17 => K::Integer, true;
	UnnamedInt = 0x18 => K::Integer, false;
	NamedUInt = 0x19 => K::Integer, true;
	UnnamedUInt = 0x1a => K::Integer, false;
	NamedLong = 0x1b => K::Integer, true;
	UnnamedLong = 0x1c => K::Integer, false;
	NamedULong = 0x1d => K::Integer, true;
	UnnamedULong = 0x1e => K::Integer, false;
	NamedFloat = 0x1f => K::FloatingPoint, true;
	UnnamedFloat = 0x20 => K::FloatingPoint, false;
	NamedDouble = 0x21 => K::FloatingPoint, true;
	UnnamedDouble = 0x22 => K::FloatingPoint, false;
	NamedDecimal = 0x23 => K::FloatingPoint, true;
	UnnamedDecimal = 0x24 => K::FloatingPoint, false;
	NamedChar = 0x25 => K::String, true;
	UnnamedChar = 0x26 => K::String, false;
	NamedString = 0x27 => K::String, true;
	UnnamedString = 0x28 => K::String, false;
	NamedGuid = 0x29 => K::Guid, true;
	UnnamedGuid = 0x2a => K::Guid, false;
	NamedBoolean = 0x2b => K::Boolean, true;
	UnnamedBoolean = 0x2c => K::Boolean, false;
	NamedNull = 0x2d => K::Null, true;
	UnnamedNull = 0x2e => K::Null, false;
	TypeName = 0x2f => K::TypeName, false;
	TypeId = 0x30 => K::TypeId, false;
	EndOfStream = 0x31 => K::StreamEnd, false;
	NamedExternalReferenceByString = 0x32 => K::ExternalRef(R::ByString), true;
	UnnamedExternalReferenceByString = 0x33 => K::ExternalRef(R::ByString), false;
}

/// Fixed payload width of a scalar tag, or `None` when the payload is
/// variable or structural.
pub(crate) fn scalar_width(tag: EntryTag) -> Option<usize> {
	use EntryTag as T;
	match tag {
		T::NamedSByte | T::UnnamedSByte | T::NamedByte | T::UnnamedByte | T::NamedBoolean | T::UnnamedBoolean => Some(1),
		T::NamedShort | T::UnnamedShort | T::NamedUShort | T::UnnamedUShort | T::NamedChar | T::UnnamedChar => Some(2),
		T::NamedInt
		| T::UnnamedInt
		| T::NamedUInt
		| T::UnnamedUInt
		| T::NamedFloat
		| T::UnnamedFloat
		| T::NamedInternalReference
		| T::UnnamedInternalReference
		| T::NamedExternalReferenceByIndex
		| T::UnnamedExternalReferenceByIndex => Some(4),
		T::NamedLong | T::UnnamedLong | T::NamedULong | T::UnnamedULong | T::NamedDouble | T::UnnamedDouble => Some(8),
		T::NamedDecimal
		| T::UnnamedDecimal
		| T::NamedGuid
		| T::UnnamedGuid
		| T::NamedExternalReferenceByGuid
		| T::UnnamedExternalReferenceByGuid => Some(16),
		T::NamedNull | T::UnnamedNull | T::EndOfNode | T::EndOfArray | T::EndOfStream | T::Invalid => Some(0),
		_ => None,
	}
}

#[cfg(test)]
mod tests;
