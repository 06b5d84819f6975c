use std::collections::HashMap;

use blobdoc_testkit::{BlobWriter, tags};

use crate::blob::{
	BlobError, DecodeOptions, Decoder, Endianness, ExternalRef, FieldValue, NullResolver, Result, TableResolver, Value,
};

fn decode_one(bytes: &[u8]) -> Value {
	let mut decoder = Decoder::new(bytes, Endianness::Little, NullResolver, DecodeOptions::default());
	decoder.decode_value().expect("decode").expect("value").value
}

#[test]
fn node_with_scalar_and_array_members() {
	let bytes = BlobWriter::new()
		.struct_node(None, Some("Root"))
		.int(Some("a"), 1)
		.struct_node(Some("b"), Some("List"))
		.array(2)
		.int(None, 2)
		.int(None, 3)
		.end_array()
		.end_node()
		.end_node()
		.finish();

	assert_eq!(
		decode_one(&bytes),
		Value::Map(vec![
			FieldValue::new("a", Value::I64(1)),
			FieldValue::new("b", Value::List(vec![Value::I64(2), Value::I64(3)])),
		])
	);
}

#[test]
fn named_wrapper_collapses_to_scalar() {
	let bytes = BlobWriter::new()
		.struct_node(None, Some("Wrapper"))
		.int(Some("value"), 42)
		.end_node()
		.finish();
	let mut decoder = Decoder::new(&bytes, Endianness::Little, NullResolver, DecodeOptions::default());
	let slot = decoder.decode_value().expect("decode").expect("value");
	assert_eq!(slot.value, Value::I64(42));
	assert_eq!(slot.name.as_deref(), Some("value"));
}

#[test]
fn internal_reference_reuses_closed_node() {
	let bytes = BlobWriter::new()
		.struct_node(None, None)
		.ref_node(Some("first"), Some("Item"), 5)
		.int(Some("x"), 1)
		.int(Some("y"), 2)
		.end_node()
		.internal_ref(Some("second"), 5)
		.end_node()
		.finish();

	let value = decode_one(&bytes);
	let first = value.get("first").expect("first member");
	assert_eq!(first.get("x"), Some(&Value::I64(1)));
	assert_eq!(value.get("second"), Some(first));
}

#[test]
fn internal_reference_to_open_node_is_null() {
	let bytes = BlobWriter::new()
		.ref_node(None, Some("Loop"), 7)
		.internal_ref(Some("parent"), 7)
		.int(Some("k"), 1)
		.end_node()
		.finish();

	let value = decode_one(&bytes);
	assert_eq!(value.get("parent"), Some(&Value::Null));
	assert_eq!(value.get("k"), Some(&Value::I64(1)));
}

#[test]
fn external_reference_goes_through_resolver() {
	let bytes = BlobWriter::new()
		.struct_node(None, None)
		.external_index(Some("item"), 1)
		.external_index(Some("missing"), 9)
		.end_node()
		.finish();
	let resolver = TableResolver::new(
		vec![Some("guid-a".into()), Some("guid-b".into())],
		HashMap::from([(Box::from("guid-b"), Box::from("Barley"))]),
	);
	let mut decoder = Decoder::new(&bytes, Endianness::Little, resolver, DecodeOptions::default());
	let value = decoder.decode_value().expect("decode").expect("value").value;

	assert_eq!(value.get("item"), Some(&Value::text("Barley")));
	assert_eq!(value.get("missing"), Some(&Value::Null));
}

#[test]
fn resolver_failures_other_than_unresolved_abort() {
	let bytes = BlobWriter::new().external_string(None, "x").finish();
	let resolver = |_: &ExternalRef| -> Result<Value> { Err(BlobError::InvalidHex { reason: "boom".into() }) };
	let mut decoder = Decoder::new(&bytes, Endianness::Little, resolver, DecodeOptions::default());
	assert!(matches!(decoder.decode_value(), Err(BlobError::InvalidHex { .. })));
}

#[test]
fn stray_markers_are_skipped() {
	let bytes = BlobWriter::new()
		.tag_byte(tags::INVALID)
		.tag_byte(tags::END_OF_NODE)
		.tag_byte(tags::END_OF_ARRAY)
		.int(Some("n"), 3)
		.finish();
	let mut decoder = Decoder::new(&bytes, Endianness::Little, NullResolver, DecodeOptions::default());
	let slot = decoder.decode_value().expect("decode").expect("value");
	assert_eq!(slot.name.as_deref(), Some("n"));
	assert_eq!(slot.value, Value::I64(3));
}

#[test]
fn repeated_invalid_tags_hit_retry_cap() {
	let bytes = vec![tags::INVALID; 32];
	let options = DecodeOptions {
		max_invalid_retries: 8,
		..DecodeOptions::default()
	};
	let mut decoder = Decoder::new(&bytes, Endianness::Little, NullResolver, options);
	let err = decoder.decode_value().expect_err("retry cap");
	assert!(matches!(err, BlobError::MalformedLoop { limit: 8, .. }));
}

#[test]
fn node_entry_cap_is_enforced() {
	let mut writer = BlobWriter::new().struct_node(None, None);
	for index in 0..5 {
		writer = writer.int(None, index);
	}
	let bytes = writer.end_node().finish();
	let options = DecodeOptions {
		max_node_entries: 4,
		..DecodeOptions::default()
	};
	let mut decoder = Decoder::new(&bytes, Endianness::Little, NullResolver, options);
	let err = decoder.decode_value().expect_err("entry cap");
	assert!(matches!(err, BlobError::MalformedLoop { context: "node entries", limit: 4 }));
}

#[test]
fn array_stops_at_early_end_marker() {
	let bytes = BlobWriter::new()
		.array(5)
		.int(None, 1)
		.int(None, 2)
		.end_array()
		.boolean(Some("after"), true)
		.finish();
	let mut decoder = Decoder::new(&bytes, Endianness::Little, NullResolver, DecodeOptions::default());
	let slot = decoder.decode_value().expect("decode").expect("array");
	assert_eq!(slot.value, Value::List(vec![Value::I64(1), Value::I64(2)]));

	let next = decoder.decode_value().expect("decode").expect("sibling");
	assert_eq!(next.name.as_deref(), Some("after"));
}

#[test]
fn negative_and_oversized_arrays_are_rejected() {
	let bytes = BlobWriter::new().array(-1).end_array().finish();
	let mut decoder = Decoder::new(&bytes, Endianness::Little, NullResolver, DecodeOptions::default());
	assert!(matches!(decoder.decode_value(), Err(BlobError::NegativeLength { len: -1, .. })));

	let bytes = BlobWriter::new().array(100).end_array().finish();
	let options = DecodeOptions {
		max_array_elems: 10,
		..DecodeOptions::default()
	};
	let mut decoder = Decoder::new(&bytes, Endianness::Little, NullResolver, options);
	assert!(matches!(decoder.decode_value(), Err(BlobError::ArrayTooLarge { count: 100, max: 10 })));
}

#[test]
fn nesting_beyond_depth_cap_fails() {
	let mut writer = BlobWriter::new();
	for _ in 0..6 {
		writer = writer.struct_node(None, None);
	}
	let bytes = writer.int(Some("leaf"), 1).finish();
	let options = DecodeOptions {
		max_depth: 4,
		..DecodeOptions::default()
	};
	let mut decoder = Decoder::new(&bytes, Endianness::Little, NullResolver, options);
	assert!(matches!(decoder.decode_value(), Err(BlobError::DepthExceeded { max_depth: 4 })));
}

#[test]
fn stream_end_marker_yields_none() {
	let bytes = BlobWriter::new().end_of_stream().finish();
	let mut decoder = Decoder::new(&bytes, Endianness::Little, NullResolver, DecodeOptions::default());
	assert_eq!(decoder.decode_value().expect("decode"), None);
}

#[test]
fn decode_all_collects_top_level_entries() {
	let bytes = BlobWriter::new()
		.int(Some("a"), 1)
		.string(Some("b"), "two")
		.end_of_stream()
		.int(Some("ignored"), 3)
		.finish();
	let mut decoder = Decoder::new(&bytes, Endianness::Little, NullResolver, DecodeOptions::default());
	let slots = decoder.decode_all().expect("decode all");
	assert_eq!(slots.len(), 2);
	assert_eq!(slots[1].value, Value::text("two"));
}

#[test]
fn empty_nodes_vanish_from_parent() {
	let bytes = BlobWriter::new()
		.struct_node(None, None)
		.struct_node(Some("nothing"), None)
		.end_node()
		.int(Some("a"), 1)
		.int(Some("b"), 2)
		.end_node()
		.finish();
	let value = decode_one(&bytes);
	assert_eq!(value.get("nothing"), None);
	assert_eq!(value.get("b"), Some(&Value::I64(2)));
}

fn nested_references(levels: i32, width: i32) -> Vec<u8> {
	let mut writer = BlobWriter::new().struct_node(None, None).ref_node(Some("l0"), Some("Leaf"), 0);
	for index in 0..width {
		writer = writer.int(None, index);
	}
	writer = writer.end_node();
	for level in 1..=levels {
		writer = writer.ref_node(Some(&format!("l{level}")), Some("Level"), level);
		for _ in 0..width {
			writer = writer.internal_ref(None, level - 1);
		}
		writer = writer.end_node();
	}
	writer.end_node().finish()
}

#[test]
fn reference_copies_count_against_value_budget() {
	let options = DecodeOptions {
		max_total_values: 2_000,
		..DecodeOptions::default()
	};

	// l0 holds 21 values and l1 holds 421, which fits
	let bytes = nested_references(1, 20);
	let mut decoder = Decoder::new(&bytes, Endianness::Little, NullResolver, options.clone());
	let value = decoder.decode_value().expect("decode").expect("value").value;
	assert_eq!(value.get("l1").and_then(Value::as_map).map(<[FieldValue]>::len), Some(20));

	// l2 would expand to 8421 values
	let bytes = nested_references(2, 20);
	assert!(bytes.len() < 1_000);
	let mut decoder = Decoder::new(&bytes, Endianness::Little, NullResolver, options);
	let err = decoder.decode_value().expect_err("expansion budget");
	assert!(matches!(
		err,
		BlobError::MalformedLoop {
			context: "internal reference expansion",
			limit: 2_000
		}
	));
}
