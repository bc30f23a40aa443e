//! The `TableName` enum, one index enum per table and the table accessor
//! methods on `Contract`.

use proc_macro2::TokenStream;
use quote::quote;

use crate::model::TableModel;
use crate::names;

pub fn enums(tables: &[TableModel]) -> TokenStream {
	let variants: Vec<_> = tables.iter().map(|table| &table.ident).collect();
	let names: Vec<_> = tables.iter().map(|table| &table.abi_name).collect();
	let rows: Vec<_> = tables.iter().map(|table| &table.row_abi_name).collect();
	let indices = tables.iter().map(index_enum);

	quote! {
		/// Every table the contract declares.
		#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
		pub enum TableName {
			#(#variants,)*
		}

		impl TableName {
			pub const ALL: &'static [Self] = &[#(Self::#variants),*];

			/// The table name as declared in the ABI.
			pub const fn as_str(self) -> &'static str {
				match self {
					#(Self::#variants => #names,)*
				}
			}

			/// The ABI struct each row decodes into.
			pub const fn row_name(self) -> &'static str {
				match self {
					#(Self::#variants => #rows,)*
				}
			}
		}

		impl ::core::fmt::Display for TableName {
			fn fmt(&self, f: &mut ::core::fmt::Formatter<'_>) -> ::core::fmt::Result {
				f.write_str(self.as_str())
			}
		}

		impl ::core::str::FromStr for TableName {
			type Err = rt::ClientError;

			fn from_str(s: &str) -> ::core::result::Result<Self, Self::Err> {
				match s {
					#(#names => ::core::result::Result::Ok(Self::#variants),)*
					_ => ::core::result::Result::Err(rt::ClientError::UnknownName {
						kind: "table",
						name: ::std::string::ToString::to_string(s),
					}),
				}
			}
		}

		#(#indices)*
	}
}

fn index_enum(table: &TableModel) -> TokenStream {
	let ident = &table.index_ident;
	let doc = format!(" Indices of the `{}` table.", table.abi_name);
	let variants: Vec<_> = table.indices.iter().map(|index| &index.ident).collect();
	let fields = table.indices.iter().map(|index| &index.field);
	let key_types = table.indices.iter().map(|index| &index.key_type);
	let positions = table.indices.iter().map(|index| {
		let position = syn::Ident::new(&format!("{:?}", index.position), proc_macro2::Span::call_site());
		quote! { rt::IndexPosition::#position }
	});
	// Lowering always yields at least the primary index.
	let primary = &variants[0];

	quote! {
		#[doc = #doc]
		#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
		pub enum #ident {
			#(#variants,)*
		}

		impl rt::TableIndex for #ident {
			const PRIMARY: Self = Self::#primary;
			const ALL: &'static [Self] = &[#(Self::#variants),*];

			fn field(self) -> &'static str {
				match self {
					#(Self::#variants => #fields,)*
				}
			}

			fn position(self) -> rt::IndexPosition {
				match self {
					#(Self::#variants => #positions,)*
				}
			}

			fn key_type(self) -> &'static str {
				match self {
					#(Self::#variants => #key_types,)*
				}
			}
		}
	}
}

/// One accessor per table, scoped to the contract account.
pub fn methods(tables: &[TableModel]) -> TokenStream {
	let methods = tables.iter().map(|table| {
		let method = &table.method;
		let variant = &table.ident;
		let row = &table.row_ident;
		let index = &table.index_ident;
		let doc = format!(
			" The `{}` table, one `{}` row per {}.",
			table.abi_name,
			table.row_abi_name,
			names::singularize(&table.abi_name)
		);

		quote! {
			#[doc = #doc]
			pub fn #method(&self) -> rt::Table<types::#row, #index> {
				self.client.table(TableName::#variant.as_str())
			}
		}
	});

	quote! { #(#methods)* }
}
