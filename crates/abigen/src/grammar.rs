//! The compact ABI type grammar: `T`, `T?`, `T[]` and `T$`.

use std::fmt;

use abigen_runtime::TypeModifier;

/// A raw ABI type string split into its base name and trailing modifier.
///
/// Only one trailing modifier is stripped per parse. A type such as `int8[]?`
/// parses as an optional `int8[]`; the resolver parses the base again.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[allow(clippy::struct_excessive_bools)]
pub struct AbiTypeDescriptor {
	pub base_name: String,
	pub is_array: bool,
	pub is_optional: bool,
	pub is_binary_extension: bool,
}

impl AbiTypeDescriptor {
	pub fn parse(raw: &str) -> Self {
		let mut descriptor = Self {
			base_name: raw.to_string(),
			is_array: false,
			is_optional: false,
			is_binary_extension: false,
		};

		if let Some(base) = raw.strip_suffix('$') {
			descriptor.base_name = base.to_string();
			descriptor.is_binary_extension = true;
		} else if let Some(base) = raw.strip_suffix('?') {
			descriptor.base_name = base.to_string();
			descriptor.is_optional = true;
		} else if let Some(base) = raw.strip_suffix("[]") {
			descriptor.base_name = base.to_string();
			descriptor.is_array = true;
		}

		descriptor
	}

	pub fn modifier(&self) -> TypeModifier {
		if self.is_binary_extension {
			TypeModifier::BinaryExtension
		} else if self.is_optional {
			TypeModifier::Optional
		} else if self.is_array {
			TypeModifier::Array
		} else {
			TypeModifier::None
		}
	}

	/// Whether the base name still ends in a modifier of its own.
	pub fn has_nested_modifier(&self) -> bool {
		Self::parse(&self.base_name).modifier() != TypeModifier::None
	}
}

impl fmt::Display for AbiTypeDescriptor {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{}{}", self.base_name, self.modifier().suffix())
	}
}
