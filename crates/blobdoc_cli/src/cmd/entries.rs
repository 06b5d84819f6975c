use std::path::PathBuf;

use blobdoc::blob::{DecodeOptions, Endianness, EntryKind, EntryReader, EntryTag, Result, Value};

use crate::cmd::util::{emit_json, load_blob};

#[derive(Debug, serde::Serialize)]
struct EntryRow {
	offset: usize,
	depth: usize,
	tag: &'static str,
	kind: &'static str,
	name: Option<String>,
	detail: Option<String>,
}

/// List every wire entry of a blob in stream order.
pub fn run(path: PathBuf, json: bool, endianness: Endianness) -> Result<()> {
	let blob = load_blob(&path)?;
	let rows = list_entries(&blob.bytes, endianness)?;

	if json {
		return emit_json(&rows);
	}

	println!("path: {}", path.display());
	println!("input: {}", blob.kind.as_str());
	println!("entries: {}", rows.len());
	println!("offset\tdepth\ttag\tkind\tname\tdetail");
	for row in rows {
		println!(
			"{}\t{}\t{}\t{}\t{}\t{}",
			row.offset,
			row.depth,
			row.tag,
			row.kind,
			row.name.as_deref().unwrap_or("-"),
			row.detail.as_deref().unwrap_or("-")
		);
	}

	Ok(())
}

fn list_entries(bytes: &[u8], endianness: Endianness) -> Result<Vec<EntryRow>> {
	let mut reader = EntryReader::new(bytes, endianness, DecodeOptions::default().max_depth);
	let mut rows = Vec::new();

	loop {
		let depth = reader.depth();
		let (kind, name) = reader.peek()?;
		let name = name.map(str::to_owned);
		let offset = reader.current_offset().unwrap_or(bytes.len());
		let tag = reader.current_tag().map_or("EndOfStream", EntryTag::as_str);

		if kind == EntryKind::StreamEnd {
			if offset < bytes.len() {
				rows.push(EntryRow {
					offset,
					depth,
					tag,
					kind: kind.as_str(),
					name,
					detail: None,
				});
			}
			return Ok(rows);
		}

		let detail = read_detail(&mut reader, kind)?;
		rows.push(EntryRow {
			offset,
			depth,
			tag,
			kind: kind.as_str(),
			name,
			detail,
		});
	}
}

fn read_detail(reader: &mut EntryReader<'_>, kind: EntryKind) -> Result<Option<String>> {
	let detail = match kind {
		EntryKind::NodeStart => {
			reader.enter_node()?;
			reader.current_frame().map(|frame| {
				let type_name = frame.type_token.name().unwrap_or("-");
				if frame.id >= 0 {
					format!("{type_name} id={}", frame.id)
				} else {
					type_name.to_owned()
				}
			})
		}
		EntryKind::ArrayStart => reader.enter_array()?.map(|len| format!("len={len}")),
		EntryKind::NodeEnd => {
			reader.exit_node()?;
			None
		}
		EntryKind::ArrayEnd => {
			reader.exit_array()?;
			None
		}
		EntryKind::Integer => Some(render_scalar(&reader.read_integer()?)),
		EntryKind::FloatingPoint => Some(reader.read_float()?.to_string()),
		EntryKind::Boolean => Some(reader.read_bool()?.to_string()),
		EntryKind::String => Some(format!("{:?}", reader.read_text()?)),
		EntryKind::Guid => Some(reader.read_guid()?.to_string()),
		EntryKind::Null => {
			reader.read_null()?;
			None
		}
		EntryKind::InternalRef => Some(format!("#{}", reader.read_internal_ref()?)),
		EntryKind::ExternalRef(_) => Some(reader.read_external_ref()?.to_string()),
		EntryKind::PrimitiveArray => Some(format!("{} items", reader.read_primitive_array()?.len())),
		EntryKind::Invalid | EntryKind::TypeName | EntryKind::TypeId | EntryKind::StreamEnd => {
			reader.skip_entry()?;
			None
		}
	};
	Ok(detail)
}

fn render_scalar(value: &Value) -> String {
	match value {
		Value::I64(v) => v.to_string(),
		Value::F64(v) => v.to_string(),
		other => other.kind_name().to_owned(),
	}
}
