use super::scalar_width;
use crate::blob::{EntryKind, EntryTag, ExternalRefKind};

#[test]
fn every_byte_maps_to_one_kind() {
	for byte in 0..=u8::MAX {
		let tag = EntryTag::from_byte(byte);
		if tag != EntryTag::Invalid {
			assert_eq!(tag.byte(), byte, "tag {} should round-trip its byte", tag.as_str());
		}
		let _ = tag.kind();
	}
	assert_eq!(EntryTag::from_byte(0x34), EntryTag::Invalid);
	assert_eq!(EntryTag::from_byte(0xff).kind(), EntryKind::Invalid);
}

#[test]
fn named_and_unnamed_pairs_fold_together() {
	assert_eq!(EntryTag::NamedInt.kind(), EntryKind::Integer);
	assert_eq!(EntryTag::UnnamedInt.kind(), EntryKind::Integer);
	assert!(EntryTag::NamedInt.is_named());
	assert!(!EntryTag::UnnamedInt.is_named());
	assert_eq!(EntryTag::NamedStartOfStructNode.kind(), EntryTag::UnnamedStartOfReferenceNode.kind());
	assert_eq!(
		EntryTag::UnnamedExternalReferenceByString.kind(),
		EntryKind::ExternalRef(ExternalRefKind::ByString)
	);
}

#[test]
fn structural_tags_are_unnamed() {
	for tag in [
		EntryTag::EndOfNode,
		EntryTag::StartOfArray,
		EntryTag::EndOfArray,
		EntryTag::PrimitiveArray,
		EntryTag::TypeName,
		EntryTag::TypeId,
		EntryTag::EndOfStream,
	] {
		assert!(!tag.is_named(), "{} should carry no name", tag.as_str());
	}
}

#[test]
fn guid_payloads_are_sixteen_bytes() {
	assert_eq!(scalar_width(EntryTag::NamedGuid), Some(16));
	assert_eq!(scalar_width(EntryTag::UnnamedExternalReferenceByGuid), Some(16));
	assert_eq!(scalar_width(EntryTag::NamedLong), Some(8));
	assert_eq!(scalar_width(EntryTag::NamedString), None);
	assert_eq!(scalar_width(EntryTag::StartOfArray), None);
}
