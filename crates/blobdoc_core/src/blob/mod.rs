mod bytes;
mod collapse;
mod decode;
mod error;
mod input;
mod record;
mod resolve;
mod session;
mod stack;
mod stream;
mod tag;
mod value;

/// Bounded byte cursor and byte order selection.
pub use bytes::{Cursor, Endianness};
/// Collapsing helpers applied to decoded containers.
pub use collapse::{Slot, collapse_array, collapse_node, unwrap_single};
/// Generic value decoder and its limits.
pub use decode::{DecodeOptions, Decoder};
/// Error and result aliases.
pub use error::{BlobError, Result};
/// Hex text decoding for blob input.
pub use input::decode_hex;
/// Serialization record and display-name index types.
pub use record::{NameIndex, ObjectRef, SerializationRecord};
/// External reference tokens and resolvers.
pub use resolve::{ExternalRef, NullResolver, RefResolver, TableResolver};
/// Single-use decoder session and convenience entry points.
pub use session::{BlobSession, parse_bytes, parse_hex};
/// Node/array frame stack.
pub use stack::{NodeFrame, NodeStack, TypeToken};
/// One-entry lookahead stream over wire entries.
pub use stream::EntryReader;
/// Wire tag and logical entry kind model.
pub use tag::{EntryKind, EntryTag, ExternalRefKind};
/// Decoded value tree types.
pub use value::{FieldValue, Guid, Value};
