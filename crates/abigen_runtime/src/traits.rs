use crate::abi::FieldMeta;

/// Implemented by every generated struct.
pub trait AbiStruct {
	/// Struct name as declared in the ABI.
	const NAME: &'static str;

	/// The declared base struct, if any. Its fields are already part of
	/// [`FIELDS`](Self::FIELDS).
	const BASE: Option<&'static str>;

	/// Every field in wire order, base fields first.
	const FIELDS: &'static [FieldMeta];
}

/// Implemented by every generated variant enum.
pub trait AbiVariant {
	/// Variant name as declared in the ABI.
	const NAME: &'static str;

	/// Alternative types in discriminant order.
	const ALTERNATIVES: &'static [&'static str];

	/// The alternative type this value holds.
	fn alternative(&self) -> &'static str;

	/// Discriminant of the alternative this value holds.
	fn index(&self) -> usize {
		Self::ALTERNATIVES
			.iter()
			.position(|alternative| *alternative == self.alternative())
			.unwrap_or_default()
	}
}
