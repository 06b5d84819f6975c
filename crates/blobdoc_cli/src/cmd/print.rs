use blobdoc::blob::Value;

/// Output truncation and formatting limits for decoded values.
#[derive(Debug, Clone, Copy)]
pub struct PrintOptions {
	/// Maximum number of members printed for a single map.
	pub max_fields_per_map: usize,
	/// Maximum number of Unicode scalar values printed for strings.
	pub max_string_len: usize,
	/// Maximum number of elements printed for lists.
	pub max_list_items: usize,
	/// Maximum recursive print depth for nested lists/maps.
	pub max_print_depth: u32,
}

impl Default for PrintOptions {
	fn default() -> Self {
		Self {
			max_fields_per_map: 80,
			max_string_len: 200,
			max_list_items: 16,
			max_print_depth: 6,
		}
	}
}

/// Print one decoded value tree.
pub fn print_value(value: &Value, indent: usize, depth: u32, options: PrintOptions) {
	let mut out = String::new();
	render_value(&mut out, value, indent, depth, options);
	print!("{out}");
}

pub(crate) fn render_value(out: &mut String, value: &Value, indent: usize, depth: u32, options: PrintOptions) {
	let pad = " ".repeat(indent);
	match value {
		Value::Null => out.push_str(&format!("{pad}null\n")),
		Value::Bool(v) => out.push_str(&format!("{pad}{v}\n")),
		Value::I64(v) => out.push_str(&format!("{pad}{v}\n")),
		Value::F64(v) => out.push_str(&format!("{pad}{v}\n")),
		Value::String(v) => out.push_str(&format!("{pad}\"{}\"\n", truncate(v, options.max_string_len))),
		Value::Guid(v) => out.push_str(&format!("{pad}guid:{v}\n")),
		Value::List(items) => {
			if depth >= options.max_print_depth {
				out.push_str(&format!("{pad}[... {} items]\n", items.len()));
				return;
			}
			out.push_str(&format!("{pad}[\n"));
			for item in items.iter().take(options.max_list_items) {
				render_value(out, item, indent + 2, depth + 1, options);
			}
			if items.len() > options.max_list_items {
				out.push_str(&format!("{pad}  ... {} more\n", items.len() - options.max_list_items));
			}
			out.push_str(&format!("{pad}]\n"));
		}
		Value::Map(fields) => {
			if depth >= options.max_print_depth {
				out.push_str(&format!("{pad}{{ ... {} members }}\n", fields.len()));
				return;
			}
			out.push_str(&format!("{pad}{{\n"));
			for field in fields.iter().take(options.max_fields_per_map) {
				out.push_str(&format!("{pad}  {} = ", field.name));
				if matches!(field.value, Value::Map(_) | Value::List(_)) {
					out.push('\n');
					render_value(out, &field.value, indent + 4, depth + 1, options);
				} else {
					render_value(out, &field.value, 0, depth + 1, options);
				}
			}
			if fields.len() > options.max_fields_per_map {
				out.push_str(&format!("{pad}  ... {} more members\n", fields.len() - options.max_fields_per_map));
			}
			out.push_str(&format!("{pad}}}\n"));
		}
	}
}

fn truncate(input: &str, max_len: usize) -> String {
	if input.chars().count() <= max_len {
		return input.to_owned();
	}
	let out: String = input.chars().take(max_len).collect();
	format!("{out}...")
}
