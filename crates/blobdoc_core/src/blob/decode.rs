use std::collections::HashMap;

use tracing::{debug, trace, warn};

use crate::blob::{
	BlobError, Endianness, EntryKind, EntryReader, RefResolver, Result, Slot, Value, collapse_array, collapse_node,
};

/// Hard bounds applied while decoding untrusted blobs.
#[derive(Debug, Clone)]
pub struct DecodeOptions {
	/// Maximum number of simultaneously open nodes and arrays.
	pub max_depth: usize,
	/// Maximum number of children decoded for one node, and of top-level entries.
	pub max_node_entries: usize,
	/// Maximum consecutive unusable entries skipped while looking for a value.
	pub max_invalid_retries: usize,
	/// Maximum declared array length.
	pub max_array_elems: usize,
	/// Maximum number of values produced, counting every copy made by an
	/// internal reference.
	pub max_total_values: usize,
}

impl Default for DecodeOptions {
	fn default() -> Self {
		Self {
			max_depth: 256,
			max_node_entries: 999,
			max_invalid_retries: 64,
			max_array_elems: 1 << 20,
			max_total_values: 1 << 20,
		}
	}
}

impl DecodeOptions {
	/// Tighter preset for batch jobs over many small records.
	pub fn strict() -> Self {
		Self {
			max_depth: 64,
			max_node_entries: 256,
			max_invalid_retries: 8,
			max_array_elems: 65_536,
			max_total_values: 65_536,
		}
	}
}

/// Recursive-descent decoder from wire entries to [`Value`] trees.
pub struct Decoder<'a, R> {
	reader: EntryReader<'a>,
	resolver: R,
	options: DecodeOptions,
	nodes: HashMap<i32, StoredNode>,
	produced: usize,
}

/// Closed reference node kept for internal references.
struct StoredNode {
	value: Value,
	size: usize,
}

impl<'a, R: RefResolver> Decoder<'a, R> {
	/// Create a decoder over `bytes`.
	pub fn new(bytes: &'a [u8], endianness: Endianness, resolver: R, options: DecodeOptions) -> Self {
		Self {
			reader: EntryReader::new(bytes, endianness, options.max_depth),
			resolver,
			options,
			nodes: HashMap::new(),
			produced: 0,
		}
	}

	/// Borrow the underlying entry reader.
	pub fn reader(&self) -> &EntryReader<'a> {
		&self.reader
	}

	/// Decode every top-level entry until the stream ends.
	pub fn decode_all(&mut self) -> Result<Vec<Slot>> {
		let mut slots = Vec::new();
		loop {
			let (kind, _) = self.reader.peek()?;
			if kind == EntryKind::StreamEnd {
				return Ok(slots);
			}
			if slots.len() >= self.options.max_node_entries {
				return Err(BlobError::MalformedLoop {
					context: "top-level entries",
					limit: self.options.max_node_entries,
				});
			}
			match self.decode_value()? {
				Some(slot) => slots.push(slot),
				None => return Ok(slots),
			}
		}
	}

	/// Decode the value rooted at the next entry.
	///
	/// Returns `None` when the stream-end marker is reached. Unusable
	/// entries are skipped up to `max_invalid_retries` times in a row.
	pub fn decode_value(&mut self) -> Result<Option<Slot>> {
		if self.reader.is_at_end() {
			return Ok(Some(Slot::unnamed(Value::Null)));
		}

		let mut retries = 0_usize;
		loop {
			let (kind, name) = self.reader.peek()?;
			let name: Option<Box<str>> = name.map(Box::from);
			let value = match kind {
				EntryKind::NodeStart => return self.decode_node().map(Some),
				EntryKind::ArrayStart => return self.decode_array(name).map(Some),
				EntryKind::StreamEnd => return Ok(None),
				EntryKind::Null => {
					self.reader.read_null()?;
					Value::Null
				}
				EntryKind::ExternalRef(_) => self.decode_external()?,
				EntryKind::InternalRef => self.decode_internal()?,
				EntryKind::PrimitiveArray => Value::List(self.reader.read_primitive_array()?),
				EntryKind::Integer => self.reader.read_integer()?,
				EntryKind::FloatingPoint => Value::F64(self.reader.read_float()?),
				EntryKind::Boolean => Value::Bool(self.reader.read_bool()?),
				EntryKind::String => Value::String(self.reader.read_text()?.into_boxed_str()),
				EntryKind::Guid => Value::Guid(self.reader.read_guid()?),
				EntryKind::Invalid | EntryKind::TypeName | EntryKind::TypeId | EntryKind::NodeEnd | EntryKind::ArrayEnd => {
					retries += 1;
					if retries > self.options.max_invalid_retries {
						return Err(BlobError::MalformedLoop {
							context: "invalid entry retries",
							limit: self.options.max_invalid_retries,
						});
					}
					trace!(at = self.reader.pos(), kind = kind.as_str(), retries, "skipping unusable entry");
					self.reader.skip_entry()?;
					continue;
				}
			};
			self.charge(1)?;
			return Ok(Some(Slot { name, value }));
		}
	}

	fn charge(&mut self, count: usize) -> Result<()> {
		self.produced = self.produced.saturating_add(count);
		if self.produced > self.options.max_total_values {
			return Err(BlobError::MalformedLoop {
				context: "internal reference expansion",
				limit: self.options.max_total_values,
			});
		}
		Ok(())
	}

	fn decode_node(&mut self) -> Result<Slot> {
		if !self.reader.enter_node()? {
			return Ok(Slot::unnamed(Value::Map(Vec::new())));
		}
		let (name, id) = self
			.reader
			.current_frame()
			.map(|frame| (frame.name.clone(), frame.id))
			.unwrap_or((None, -1));
		let produced_before = self.produced;
		self.charge(1)?;

		let mut children = Vec::new();
		loop {
			let (kind, _) = self.reader.peek()?;
			if matches!(kind, EntryKind::NodeEnd | EntryKind::StreamEnd) {
				break;
			}
			if children.len() >= self.options.max_node_entries {
				return Err(BlobError::MalformedLoop {
					context: "node entries",
					limit: self.options.max_node_entries,
				});
			}
			match self.decode_value()? {
				Some(slot) => children.push(slot),
				None => break,
			}
		}

		let slot = collapse_node(name, children);
		self.reader.exit_node()?;
		if id >= 0 {
			let size = self.produced - produced_before;
			self.nodes.insert(id, StoredNode {
				value: slot.value.clone(),
				size,
			});
		}
		Ok(slot)
	}

	fn decode_array(&mut self, name: Option<Box<str>>) -> Result<Slot> {
		let Some(declared) = self.reader.enter_array()? else {
			return Ok(Slot::unnamed(Value::Map(Vec::new())));
		};
		let count = usize::try_from(declared).map_err(|_| BlobError::NegativeLength {
			len: declared,
			at: self.reader.pos(),
		})?;
		if count > self.options.max_array_elems {
			return Err(BlobError::ArrayTooLarge {
				count: count as u64,
				max: self.options.max_array_elems,
			});
		}

		self.charge(1)?;
		let mut children = Vec::with_capacity(count.min(1024));
		for _ in 0..count {
			let (kind, _) = self.reader.peek()?;
			if matches!(kind, EntryKind::ArrayEnd | EntryKind::StreamEnd) {
				debug!(declared = count, decoded = children.len(), "array ended before declared length");
				break;
			}
			match self.decode_value()? {
				Some(slot) => children.push(slot),
				None => break,
			}
		}

		let slot = collapse_array(name, children);
		self.reader.exit_array()?;
		Ok(slot)
	}

	fn decode_external(&mut self) -> Result<Value> {
		let token = self.reader.read_external_ref()?;
		match self.resolver.resolve(&token) {
			Ok(value) => Ok(value),
			Err(BlobError::UnresolvedReference { token }) => {
				warn!(%token, "unresolved external reference");
				Ok(Value::Null)
			}
			Err(err) => Err(err),
		}
	}

	fn decode_internal(&mut self) -> Result<Value> {
		let id = self.reader.read_internal_ref()?;
		let Some(size) = self.nodes.get(&id).map(|node| node.size) else {
			debug!(id, "internal reference to unknown or open node");
			return Ok(Value::Null);
		};
		// the reference entry itself is charged by the caller
		self.charge(size.saturating_sub(1))?;
		Ok(self.nodes.get(&id).map_or(Value::Null, |node| node.value.clone()))
	}
}

#[cfg(test)]
mod tests;
