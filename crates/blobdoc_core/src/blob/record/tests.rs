use blobdoc_testkit::BlobWriter;

use crate::blob::{BlobError, ExternalRef, NameIndex, RefResolver, SerializationRecord, Value, parse_bytes};

#[test]
fn record_with_hex_bytes_and_aliases() {
	let json = r#"{
		"SerializedFormat": 0,
		"SerializedBytes": "0x1800 000000",
		"ReferencedUnityObjects": [
			{ "guid": "a1b2" },
			{ "fileID": 77 },
			{}
		]
	}"#;
	let record = SerializationRecord::from_json(json).expect("record");
	assert_eq!(record.serialized_format, 0);
	assert_eq!(record.bytes().expect("bytes"), vec![0x18, 0, 0, 0, 0]);
	assert_eq!(record.reference_tokens(), vec![Some("a1b2".into()), Some("77".into()), None]);
}

#[test]
fn record_with_byte_array_and_defaults() {
	let record = SerializationRecord::from_json(r#"{ "serialized_bytes": [24, 1, 0, 0, 0] }"#).expect("record");
	assert_eq!(record.serialized_format, 0);
	assert!(record.referenced_objects.is_empty());
	assert_eq!(parse_bytes(&record.bytes().expect("bytes"), record.resolver(&NameIndex::default())).expect("parse"), Value::I64(1));
}

#[test]
fn bad_hex_in_record_is_reported_on_access() {
	let record = SerializationRecord::from_json(r#"{ "SerializedBytes": "xyz" }"#).expect("record");
	assert!(matches!(record.bytes(), Err(BlobError::InvalidHex { .. })));
}

#[test]
fn malformed_json_is_json_error() {
	assert!(matches!(SerializationRecord::from_json("{"), Err(BlobError::Json(_))));
	assert!(matches!(NameIndex::from_json("[1, 2]"), Err(BlobError::Json(_))));
}

#[test]
fn record_resolver_maps_index_to_display_name() {
	let record = SerializationRecord::from_json(
		r#"{ "ReferencedUnityObjects": [{"guid": "g0"}, {"guid": "g1"}, {"guid": "g2"}, {"guid": "g3"}] }"#,
	)
	.expect("record");
	let names = NameIndex::from_json(r#"{ "g3": "Wheat" }"#).expect("names");
	assert_eq!(names.get("g3"), Some("Wheat"));

	let resolver = record.resolver(&names);
	assert_eq!(resolver.resolve(&ExternalRef::ByIndex(3)).expect("index 3"), Value::text("Wheat"));
	assert_eq!(resolver.resolve(&ExternalRef::ByIndex(1)).expect("index 1"), Value::text("g1"));

	let bytes = BlobWriter::new().external_index(Some("item"), 3).finish();
	assert_eq!(parse_bytes(&bytes, resolver).expect("parse"), Value::text("Wheat"));
}
