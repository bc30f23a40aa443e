//! Maps ABI type names onto primitives or ABI-declared types.

use std::collections::HashMap;
use std::collections::HashSet;

use abigen_runtime::AbiDocument;
use abigen_runtime::TypeModifier;
use abigen_runtime::abi::VariantDef;

use crate::error::GenerateError;
use crate::error::Result;
use crate::grammar::AbiTypeDescriptor;

/// The built-in ABI types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Primitive {
	Bool,
	Int8,
	Uint8,
	Int16,
	Uint16,
	Int32,
	Uint32,
	Int64,
	Uint64,
	Int128,
	Uint128,
	VarInt32,
	VarUint32,
	Float32,
	Float64,
	Float128,
	TimePoint,
	TimePointSec,
	BlockTimestamp,
	Name,
	Bytes,
	String,
	Checksum160,
	Checksum256,
	Checksum512,
	PublicKey,
	PrivateKey,
	Signature,
	Symbol,
	SymbolCode,
	Asset,
	ExtendedAsset,
}

impl Primitive {
	pub const ALL: [Self; 32] = [
		Self::Bool,
		Self::Int8,
		Self::Uint8,
		Self::Int16,
		Self::Uint16,
		Self::Int32,
		Self::Uint32,
		Self::Int64,
		Self::Uint64,
		Self::Int128,
		Self::Uint128,
		Self::VarInt32,
		Self::VarUint32,
		Self::Float32,
		Self::Float64,
		Self::Float128,
		Self::TimePoint,
		Self::TimePointSec,
		Self::BlockTimestamp,
		Self::Name,
		Self::Bytes,
		Self::String,
		Self::Checksum160,
		Self::Checksum256,
		Self::Checksum512,
		Self::PublicKey,
		Self::PrivateKey,
		Self::Signature,
		Self::Symbol,
		Self::SymbolCode,
		Self::Asset,
		Self::ExtendedAsset,
	];

	pub fn from_abi(name: &str) -> Option<Self> {
		Self::ALL.into_iter().find(|primitive| primitive.abi_name() == name)
	}

	pub const fn abi_name(self) -> &'static str {
		match self {
			Self::Bool => "bool",
			Self::Int8 => "int8",
			Self::Uint8 => "uint8",
			Self::Int16 => "int16",
			Self::Uint16 => "uint16",
			Self::Int32 => "int32",
			Self::Uint32 => "uint32",
			Self::Int64 => "int64",
			Self::Uint64 => "uint64",
			Self::Int128 => "int128",
			Self::Uint128 => "uint128",
			Self::VarInt32 => "varint32",
			Self::VarUint32 => "varuint32",
			Self::Float32 => "float32",
			Self::Float64 => "float64",
			Self::Float128 => "float128",
			Self::TimePoint => "time_point",
			Self::TimePointSec => "time_point_sec",
			Self::BlockTimestamp => "block_timestamp_type",
			Self::Name => "name",
			Self::Bytes => "bytes",
			Self::String => "string",
			Self::Checksum160 => "checksum160",
			Self::Checksum256 => "checksum256",
			Self::Checksum512 => "checksum512",
			Self::PublicKey => "public_key",
			Self::PrivateKey => "private_key",
			Self::Signature => "signature",
			Self::Symbol => "symbol",
			Self::SymbolCode => "symbol_code",
			Self::Asset => "asset",
			Self::ExtendedAsset => "extended_asset",
		}
	}
}

/// What a type name finally refers to.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ResolvedKind {
	Primitive(Primitive),
	/// An ABI struct, by ABI name.
	Struct(String),
	/// An ABI variant, by ABI name.
	Variant(String),
}

/// A resolved type with its modifiers, innermost first.
///
/// `names?` where `names = name[]` resolves to `Name` with
/// `[Array, Optional]`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ResolvedType {
	pub kind: ResolvedKind,
	pub modifiers: Vec<TypeModifier>,
}

impl ResolvedType {
	/// The outermost modifier, the one that decides how the field itself is
	/// encoded.
	pub fn outer_modifier(&self) -> TypeModifier {
		self.modifiers.last().copied().unwrap_or_default()
	}

	/// The struct or variant this type refers to, if any.
	pub fn referent(&self) -> Option<&str> {
		match &self.kind {
			ResolvedKind::Primitive(_) => None,
			ResolvedKind::Struct(name) | ResolvedKind::Variant(name) => Some(name),
		}
	}
}

/// Resolves type names against one ABI: aliases first, then structs and
/// variants, then primitives.
#[derive(Debug)]
pub struct TypeResolver<'a> {
	aliases: HashMap<&'a str, &'a str>,
	structs: HashSet<&'a str>,
	variants: HashMap<&'a str, &'a VariantDef>,
}

impl<'a> TypeResolver<'a> {
	pub fn new(abi: &'a AbiDocument) -> Self {
		Self {
			aliases: abi
				.types
				.iter()
				.map(|alias| (alias.new_type_name.as_str(), alias.type_name.as_str()))
				.collect(),
			structs: abi.structs.iter().map(|s| s.name.as_str()).collect(),
			variants: abi.variants.iter().map(|v| (v.name.as_str(), v)).collect(),
		}
	}

	pub fn variant(&self, name: &str) -> Option<&'a VariantDef> {
		self.variants.get(name).copied()
	}

	/// Resolve a raw type string. `context` names where it was found, for the
	/// error message.
	pub fn resolve_str(&self, raw: &str, context: &str) -> Result<ResolvedType> {
		self.resolve(&AbiTypeDescriptor::parse(raw), context)
	}

	pub fn resolve(&self, descriptor: &AbiTypeDescriptor, context: &str) -> Result<ResolvedType> {
		let mut aliases_seen = Vec::new();
		self.resolve_inner(descriptor, context, &mut aliases_seen)
	}

	fn resolve_inner(
		&self,
		descriptor: &AbiTypeDescriptor,
		context: &str,
		aliases_seen: &mut Vec<String>,
	) -> Result<ResolvedType> {
		let base = descriptor.base_name.as_str();

		let mut resolved = if descriptor.has_nested_modifier() {
			self.resolve_inner(&AbiTypeDescriptor::parse(base), context, aliases_seen)?
		} else if let Some(target) = self.aliases.get(base) {
			if aliases_seen.iter().any(|seen| seen == base) {
				let mut path = aliases_seen.clone();
				path.push(base.to_string());
				return Err(GenerateError::CyclicDependency { path });
			}
			aliases_seen.push(base.to_string());
			let resolved = self.resolve_inner(&AbiTypeDescriptor::parse(target), context, aliases_seen)?;
			aliases_seen.pop();
			resolved
		} else if self.structs.contains(base) {
			ResolvedType {
				kind: ResolvedKind::Struct(base.to_string()),
				modifiers: Vec::new(),
			}
		} else if self.variants.contains_key(base) {
			ResolvedType {
				kind: ResolvedKind::Variant(base.to_string()),
				modifiers: Vec::new(),
			}
		} else if let Some(primitive) = Primitive::from_abi(base) {
			ResolvedType {
				kind: ResolvedKind::Primitive(primitive),
				modifiers: Vec::new(),
			}
		} else {
			return Err(GenerateError::UnknownType {
				type_name: base.to_string(),
				context: context.to_string(),
			});
		};

		let modifier = descriptor.modifier();
		if modifier != TypeModifier::None {
			resolved.modifiers.push(modifier);
		}

		Ok(resolved)
	}

	/// Resolve every alternative of variant `name`, in discriminant order.
	pub fn resolve_variant(&self, name: &str) -> Result<Vec<ResolvedType>> {
		let Some(variant) = self.variant(name) else {
			return Err(GenerateError::UnknownType {
				type_name: name.to_string(),
				context: "variant lookup".to_string(),
			});
		};

		if variant.types.is_empty() {
			return Err(GenerateError::EmptyVariant {
				name: name.to_string(),
			});
		}

		variant
			.types
			.iter()
			.map(|alternative| self.resolve_str(alternative, &format!("variant `{name}`")))
			.collect()
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn abi(json: &str) -> AbiDocument {
		AbiDocument::from_json(json).unwrap_or_else(|e| panic!("test ABI: {e}"))
	}

	#[test]
	fn every_primitive_round_trips_its_name() {
		for primitive in Primitive::ALL {
			assert_eq!(Primitive::from_abi(primitive.abi_name()), Some(primitive));
		}
		assert_eq!(Primitive::from_abi("uint256"), None);
	}

	#[test]
	fn aliases_take_precedence_and_stack_modifiers() {
		let abi = abi(r#"{
			"version": "eosio::abi/1.1",
			"types": [
				{ "new_type_name": "account_name", "type": "name" },
				{ "new_type_name": "names", "type": "account_name[]" },
				{ "new_type_name": "asset", "type": "string" }
			]
		}"#);
		let resolver = TypeResolver::new(&abi);

		let resolved = resolver
			.resolve_str("names?", "test")
			.unwrap_or_else(|e| panic!("{e}"));
		assert_eq!(resolved.kind, ResolvedKind::Primitive(Primitive::Name));
		assert_eq!(resolved.modifiers, vec![TypeModifier::Array, TypeModifier::Optional]);
		assert_eq!(resolved.outer_modifier(), TypeModifier::Optional);

		let shadowed = resolver.resolve_str("asset", "test").unwrap_or_else(|e| panic!("{e}"));
		assert_eq!(shadowed.kind, ResolvedKind::Primitive(Primitive::String));
	}

	#[test]
	fn structs_and_variants_resolve_by_reference() {
		let abi = abi(r#"{
			"version": "eosio::abi/1.2",
			"structs": [{ "name": "point", "base": "", "fields": [] }],
			"variants": [{ "name": "shape", "types": ["point", "uint8[]"] }]
		}"#);
		let resolver = TypeResolver::new(&abi);

		let point = resolver.resolve_str("point[]", "test").unwrap_or_else(|e| panic!("{e}"));
		assert_eq!(point.kind, ResolvedKind::Struct("point".into()));
		assert_eq!(point.referent(), Some("point"));

		let shape = resolver.resolve_str("shape$", "test").unwrap_or_else(|e| panic!("{e}"));
		assert_eq!(shape.kind, ResolvedKind::Variant("shape".into()));
		assert_eq!(shape.outer_modifier(), TypeModifier::BinaryExtension);

		let alternatives = resolver.resolve_variant("shape").unwrap_or_else(|e| panic!("{e}"));
		assert_eq!(alternatives.len(), 2);
		assert_eq!(alternatives[1].kind, ResolvedKind::Primitive(Primitive::Uint8));
		assert_eq!(alternatives[1].modifiers, vec![TypeModifier::Array]);
	}

	#[test]
	fn nested_modifiers_in_one_string() {
		let abi = abi(r#"{ "version": "eosio::abi/1.2" }"#);
		let resolver = TypeResolver::new(&abi);

		let resolved = resolver.resolve_str("int8[]?", "test").unwrap_or_else(|e| panic!("{e}"));
		assert_eq!(resolved.kind, ResolvedKind::Primitive(Primitive::Int8));
		assert_eq!(resolved.modifiers, vec![TypeModifier::Array, TypeModifier::Optional]);
	}

	#[test]
	fn unknown_types_are_fatal() {
		let abi = abi(r#"{ "version": "eosio::abi/1.2" }"#);
		let resolver = TypeResolver::new(&abi);

		let err = resolver.resolve_str("uint256[]", "field `x` of struct `y`");
		assert_eq!(
			err,
			Err(GenerateError::UnknownType {
				type_name: "uint256".into(),
				context: "field `x` of struct `y`".into(),
			})
		);
	}

	#[test]
	fn alias_loops_are_cycles() {
		let abi = abi(r#"{
			"version": "eosio::abi/1.1",
			"types": [
				{ "new_type_name": "a", "type": "b" },
				{ "new_type_name": "b", "type": "a?" }
			]
		}"#);
		let resolver = TypeResolver::new(&abi);

		let err = resolver.resolve_str("a", "test");
		assert_eq!(
			err,
			Err(GenerateError::CyclicDependency {
				path: vec!["a".into(), "b".into(), "a".into()],
			})
		);
	}

	#[test]
	fn empty_variants_are_rejected() {
		let abi = abi(r#"{ "version": "eosio::abi/1.2", "variants": [{ "name": "nothing", "types": [] }] }"#);
		let resolver = TypeResolver::new(&abi);

		assert_eq!(
			resolver.resolve_variant("nothing"),
			Err(GenerateError::EmptyVariant { name: "nothing".into() })
		);
	}
}
