use std::collections::HashMap;

use crate::blob::{BlobError, ExternalRef, ExternalRefKind, Guid, NullResolver, RefResolver, Result, TableResolver, Value};

fn wheat_resolver() -> TableResolver {
	let tokens = vec![None, Some("a1b2".into()), Some("c3d4".into()), Some("e5f6".into())];
	let mut names = HashMap::new();
	names.insert("e5f6".into(), "Wheat".into());
	names.insert("0123456789abcdef".into(), "Barley".into());
	TableResolver::new(tokens, names)
}

#[test]
fn index_resolves_through_table_and_names() {
	let value = wheat_resolver().resolve(&ExternalRef::ByIndex(3)).expect("index 3 resolves");
	assert_eq!(value, Value::text("Wheat"));
}

#[test]
fn token_without_display_name_falls_back_to_token() {
	let value = wheat_resolver().resolve(&ExternalRef::ByIndex(1)).expect("index 1 resolves");
	assert_eq!(value, Value::text("a1b2"));
}

#[test]
fn missing_or_empty_slots_are_unresolved() {
	let resolver = wheat_resolver();
	for index in [0, 4, -1] {
		let err = resolver.resolve(&ExternalRef::ByIndex(index)).expect_err("slot should not resolve");
		assert!(matches!(err, BlobError::UnresolvedReference { .. }));
	}
}

#[test]
fn guid_tokens_use_ascii_text_for_lookup() {
	let guid = Guid(*b"0123456789abcdef");
	let value = wheat_resolver().resolve(&ExternalRef::ByGuid(guid)).expect("guid resolves");
	assert_eq!(value, Value::text("Barley"));
	assert_eq!(ExternalRef::ByGuid(guid).kind(), ExternalRefKind::ByGuid);
}

#[test]
fn closures_act_as_resolvers() {
	let resolver = |token: &ExternalRef| -> Result<Value> {
		match token {
			ExternalRef::ByIndex(index) => Ok(Value::I64(i64::from(*index) * 10)),
			_ => Ok(Value::Null),
		}
	};
	assert_eq!(resolver.resolve(&ExternalRef::ByIndex(2)).expect("resolves"), Value::I64(20));
	assert_eq!(NullResolver.resolve(&ExternalRef::ByString("x".into())).expect("resolves"), Value::Null);
}
