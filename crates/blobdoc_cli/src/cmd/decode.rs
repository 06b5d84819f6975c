use std::path::PathBuf;

use blobdoc::blob::{BlobSession, DecodeOptions, Endianness, NameIndex, Result, Value};

use crate::cmd::print::{PrintOptions, print_value};
use crate::cmd::util::{emit_json, load_blob};

/// Arguments of the `decode` command.
pub struct DecodeArgs {
	/// Record, hex, or raw blob file.
	pub path: PathBuf,
	/// Optional identifier-to-name JSON file.
	pub names: Option<PathBuf>,
	/// Emit JSON instead of text.
	pub json: bool,
	/// Byte order of multi-byte fields.
	pub endianness: Endianness,
	/// Override for the nesting cap.
	pub max_depth: Option<usize>,
	/// Override for the per-node entry cap.
	pub max_entries: Option<usize>,
}

#[derive(serde::Serialize)]
struct DecodeJson<'a> {
	path: String,
	input: &'static str,
	bytes: usize,
	references: usize,
	value: &'a Value,
}

/// Decode and print one blob.
pub fn run(args: DecodeArgs) -> Result<()> {
	let blob = load_blob(&args.path)?;
	let names = match &args.names {
		Some(path) => NameIndex::load(path)?,
		None => NameIndex::default(),
	};

	let mut options = DecodeOptions::default();
	if let Some(max_depth) = args.max_depth {
		options.max_depth = max_depth;
	}
	if let Some(max_entries) = args.max_entries {
		options.max_node_entries = max_entries;
	}

	let resolver = blob.record.resolver(&names);
	let value = BlobSession::new(&blob.bytes, args.endianness, resolver).with_options(options).parse()?;

	if args.json {
		return emit_json(&DecodeJson {
			path: args.path.display().to_string(),
			input: blob.kind.as_str(),
			bytes: blob.bytes.len(),
			references: blob.record.referenced_objects.len(),
			value: &value,
		});
	}

	println!("path: {}", args.path.display());
	println!("input: {}", blob.kind.as_str());
	println!("bytes: {}", blob.bytes.len());
	println!("references: {}", blob.record.referenced_objects.len());
	println!("names: {}", names.len());
	println!("decoded:");
	print_value(&value, 0, 0, PrintOptions::default());

	Ok(())
}
