use std::collections::HashMap;
use std::fmt;

use tracing::trace;

use crate::blob::{BlobError, ExternalRefKind, Guid, Result, Value};

/// Token standing in for a value that lives outside the byte stream.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExternalRef {
	/// Index into the record's referenced-object table.
	ByIndex(i32),
	/// Opaque identifier.
	ByGuid(Guid),
	/// Identifier string.
	ByString(Box<str>),
}

impl ExternalRef {
	/// Return the token form.
	pub fn kind(&self) -> ExternalRefKind {
		match self {
			Self::ByIndex(_) => ExternalRefKind::ByIndex,
			Self::ByGuid(_) => ExternalRefKind::ByGuid,
			Self::ByString(_) => ExternalRefKind::ByString,
		}
	}
}

impl fmt::Display for ExternalRef {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Self::ByIndex(index) => write!(f, "index:{index}"),
			Self::ByGuid(guid) => write!(f, "guid:{guid}"),
			Self::ByString(text) => write!(f, "string:{text}"),
		}
	}
}

/// Maps an external reference token to a value.
///
/// Returning [`BlobError::UnresolvedReference`] makes the decoder store
/// `Null` and keep going; any other error aborts the parse.
pub trait RefResolver {
	/// Resolve one token.
	fn resolve(&self, token: &ExternalRef) -> Result<Value>;
}

impl<F> RefResolver for F
where
	F: Fn(&ExternalRef) -> Result<Value>,
{
	fn resolve(&self, token: &ExternalRef) -> Result<Value> {
		self(token)
	}
}

/// Resolver that maps every reference to `Null`.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullResolver;

impl RefResolver for NullResolver {
	fn resolve(&self, _token: &ExternalRef) -> Result<Value> {
		Ok(Value::Null)
	}
}

/// Resolver over a record's referenced-object table and a display-name index.
///
/// `ByIndex(i)` selects the `i`-th identifier token of the table and maps
/// it through the name index. A token without a display name resolves to
/// the token text itself.
#[derive(Debug, Clone, Default)]
pub struct TableResolver {
	tokens: Vec<Option<Box<str>>>,
	names: HashMap<Box<str>, Box<str>>,
}

impl TableResolver {
	/// Build a resolver from table tokens and an identifier-to-name map.
	pub fn new(tokens: Vec<Option<Box<str>>>, names: HashMap<Box<str>, Box<str>>) -> Self {
		Self { tokens, names }
	}

	/// Number of entries in the referenced-object table.
	pub fn table_len(&self) -> usize {
		self.tokens.len()
	}

	fn display(&self, identifier: &str) -> Value {
		match self.names.get(identifier) {
			Some(name) => Value::String(name.clone()),
			None => {
				trace!(identifier, "no display name, using identifier");
				Value::text(identifier)
			}
		}
	}
}

impl RefResolver for TableResolver {
	fn resolve(&self, token: &ExternalRef) -> Result<Value> {
		match token {
			ExternalRef::ByIndex(index) => {
				let slot = usize::try_from(*index).ok().and_then(|index| self.tokens.get(index));
				match slot {
					Some(Some(identifier)) => Ok(self.display(identifier)),
					_ => Err(BlobError::UnresolvedReference { token: token.to_string() }),
				}
			}
			ExternalRef::ByGuid(guid) => Ok(self.display(&guid.to_string())),
			ExternalRef::ByString(text) => Ok(self.display(text)),
		}
	}
}

#[cfg(test)]
mod tests;
