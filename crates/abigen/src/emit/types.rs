//! Declarations for the `types` module: one item per ABI struct, variant and
//! alias, in dependency order.

use abigen_runtime::TypeModifier;
use proc_macro2::TokenStream;
use quote::quote;

use super::tokens::Scope;
use super::tokens::modifier_path;
use super::tokens::rust_type;
use crate::model::AliasModel;
use crate::model::DeclarationModel;
use crate::model::FieldModel;
use crate::model::StructModel;
use crate::model::VariantModel;

/// The body of the `types` module.
pub fn declarations(declarations: &[DeclarationModel], serde_crate: &str) -> TokenStream {
	let items = declarations.iter().map(|declaration| {
		match declaration {
			DeclarationModel::Struct(model) => struct_item(model, serde_crate),
			DeclarationModel::Variant(model) => variant_item(model),
			DeclarationModel::Alias(model) => alias_item(model),
		}
	});

	quote! { #(#items)* }
}

fn struct_item(model: &StructModel, serde_crate: &str) -> TokenStream {
	let ident = &model.ident;
	let abi_name = &model.abi_name;
	let doc = format!(" ABI struct `{abi_name}`.");
	let fields = model.fields.iter().map(field);
	let metas = model.fields.iter().map(|field| {
		let name = &field.abi_name;
		let abi_type = &field.abi_type;
		let modifier = modifier_path(field.modifier);
		quote! { rt::FieldMeta::new(#name, #abi_type, #modifier) }
	});
	let base = match &model.base {
		Some(base) => quote! { ::core::option::Option::Some(#base) },
		None => quote! { ::core::option::Option::None },
	};

	quote! {
		#[doc = #doc]
		#[derive(Debug, Clone, PartialEq, rt::serde::Serialize, rt::serde::Deserialize)]
		#[serde(crate = #serde_crate)]
		pub struct #ident {
			#(#fields,)*
		}

		impl rt::AbiStruct for #ident {
			const NAME: &'static str = #abi_name;
			const BASE: ::core::option::Option<&'static str> = #base;
			const FIELDS: &'static [rt::FieldMeta] = &[#(#metas),*];
		}
	}
}

fn field(field: &FieldModel) -> TokenStream {
	let ident = &field.ident;
	let ty = rust_type(&field.ty, Scope::Types);
	let abi_name = &field.abi_name;

	let rename = (ident.to_string() != *abi_name).then(|| quote! { #[serde(rename = #abi_name)] });
	let extension = (field.modifier == TypeModifier::BinaryExtension)
		.then(|| quote! { #[serde(default, skip_serializing_if = "Option::is_none")] });

	quote! {
		#rename
		#extension
		pub #ident: #ty
	}
}

fn variant_item(model: &VariantModel) -> TokenStream {
	let ident = &model.ident;
	let abi_name = &model.abi_name;
	let doc = format!(" ABI variant `{abi_name}`.");

	let alternatives: Vec<_> = model.alternatives.iter().map(|alternative| &alternative.ident).collect();
	let tags: Vec<_> = model.alternatives.iter().map(|alternative| &alternative.abi_type).collect();
	let types = model
		.alternatives
		.iter()
		.map(|alternative| rust_type(&alternative.ty, Scope::Types));

	quote! {
		#[doc = #doc]
		#[derive(Debug, Clone, PartialEq)]
		pub enum #ident {
			#(#alternatives(#types),)*
		}

		impl rt::AbiVariant for #ident {
			const NAME: &'static str = #abi_name;
			const ALTERNATIVES: &'static [&'static str] = &[#(#tags),*];

			fn alternative(&self) -> &'static str {
				match *self {
					#(Self::#alternatives(_) => #tags,)*
				}
			}
		}

		impl rt::serde::Serialize for #ident {
			fn serialize<S: rt::serde::Serializer>(&self, serializer: S) -> ::core::result::Result<S::Ok, S::Error> {
				match self {
					#(Self::#alternatives(value) => rt::variant::serialize(#tags, value, serializer),)*
				}
			}
		}

		impl<'de> rt::serde::Deserialize<'de> for #ident {
			fn deserialize<D: rt::serde::Deserializer<'de>>(deserializer: D) -> ::core::result::Result<Self, D::Error> {
				let (tag, value) = rt::variant::deserialize(deserializer)?;
				match tag.as_str() {
					#(#tags => rt::variant::alternative(value).map(Self::#alternatives),)*
					_ => ::core::result::Result::Err(rt::variant::unknown(&tag, <Self as rt::AbiVariant>::ALTERNATIVES)),
				}
			}
		}
	}
}

fn alias_item(model: &AliasModel) -> TokenStream {
	let ident = &model.ident;
	let doc = format!(" ABI alias `{}`.", model.abi_name);
	let target = rust_type(&model.target, Scope::Types);

	quote! {
		#[doc = #doc]
		pub type #ident = #target;
	}
}
