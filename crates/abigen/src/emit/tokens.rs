use abigen_runtime::TypeModifier;
use proc_macro2::TokenStream;
use quote::quote;

use crate::names;
use crate::resolve::Primitive;
use crate::resolve::ResolvedKind;
use crate::resolve::ResolvedType;

/// Where a type reference is emitted. Declarations live in the `types`
/// module; everything else reaches them through `types::`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scope {
	Types,
	Namespace,
}

/// The Rust type for a resolved ABI type, modifiers applied innermost first.
pub fn rust_type(ty: &ResolvedType, scope: Scope) -> TokenStream {
	let mut tokens = match &ty.kind {
		ResolvedKind::Primitive(primitive) => primitive_type(*primitive),
		ResolvedKind::Struct(name) | ResolvedKind::Variant(name) => {
			let ident = names::type_ident(name);
			match scope {
				Scope::Types => quote! { #ident },
				Scope::Namespace => quote! { types::#ident },
			}
		}
	};

	for modifier in &ty.modifiers {
		tokens = match modifier {
			TypeModifier::None => tokens,
			TypeModifier::Array => quote! { ::std::vec::Vec<#tokens> },
			TypeModifier::Optional | TypeModifier::BinaryExtension => quote! { ::core::option::Option<#tokens> },
		};
	}

	tokens
}

fn primitive_type(primitive: Primitive) -> TokenStream {
	match primitive {
		Primitive::Bool => quote! { bool },
		Primitive::Int8 => quote! { i8 },
		Primitive::Uint8 => quote! { u8 },
		Primitive::Int16 => quote! { i16 },
		Primitive::Uint16 => quote! { u16 },
		Primitive::Int32 => quote! { i32 },
		Primitive::Uint32 => quote! { u32 },
		Primitive::Int64 => quote! { i64 },
		Primitive::Uint64 => quote! { u64 },
		Primitive::Int128 => quote! { i128 },
		Primitive::Uint128 => quote! { u128 },
		Primitive::VarInt32 => quote! { rt::types::VarInt32 },
		Primitive::VarUint32 => quote! { rt::types::VarUint32 },
		Primitive::Float32 => quote! { f32 },
		Primitive::Float64 => quote! { f64 },
		Primitive::Float128 => quote! { rt::types::Float128 },
		Primitive::TimePoint => quote! { rt::types::TimePoint },
		Primitive::TimePointSec => quote! { rt::types::TimePointSec },
		Primitive::BlockTimestamp => quote! { rt::types::BlockTimestamp },
		Primitive::Name => quote! { rt::types::Name },
		Primitive::Bytes => quote! { rt::types::Bytes },
		Primitive::String => quote! { ::std::string::String },
		Primitive::Checksum160 => quote! { rt::types::Checksum160 },
		Primitive::Checksum256 => quote! { rt::types::Checksum256 },
		Primitive::Checksum512 => quote! { rt::types::Checksum512 },
		Primitive::PublicKey => quote! { rt::types::PublicKey },
		Primitive::PrivateKey => quote! { rt::types::PrivateKey },
		Primitive::Signature => quote! { rt::types::Signature },
		Primitive::Symbol => quote! { rt::types::Symbol },
		Primitive::SymbolCode => quote! { rt::types::SymbolCode },
		Primitive::Asset => quote! { rt::types::Asset },
		Primitive::ExtendedAsset => quote! { rt::types::ExtendedAsset },
	}
}

/// The `rt::TypeModifier` variant for `modifier`.
pub fn modifier_path(modifier: TypeModifier) -> TokenStream {
	match modifier {
		TypeModifier::None => quote! { rt::TypeModifier::None },
		TypeModifier::Array => quote! { rt::TypeModifier::Array },
		TypeModifier::Optional => quote! { rt::TypeModifier::Optional },
		TypeModifier::BinaryExtension => quote! { rt::TypeModifier::BinaryExtension },
	}
}
