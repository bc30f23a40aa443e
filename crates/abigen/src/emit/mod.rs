//! Token emission and rendering of one contract's bindings.

mod actions;
mod tables;
mod tokens;
mod types;

use abigen_runtime::AbiDocument;
use proc_macro2::Ident;
use proc_macro2::Span;
use proc_macro2::TokenStream;
use quote::quote;

pub use self::tokens::Scope;
pub use self::tokens::rust_type;
use crate::config::GenerateConfig;
use crate::error::GenerateError;
use crate::error::Result;
use crate::model::ContractModel;

/// Lints generated code cannot be expected to satisfy.
const ALLOWED_LINTS: &[&str] = &[
	"non_snake_case",
	"non_camel_case_types",
	"dead_code",
	"unused_imports",
	"unreachable_patterns",
	"unreachable_code",
	"clippy::all",
	"clippy::pedantic",
];

/// The bindings of one contract, ready to render.
#[derive(Debug, Clone)]
pub struct EmissionUnit {
	account: String,
	namespace: String,
	tokens: TokenStream,
}

impl EmissionUnit {
	pub fn account(&self) -> &str {
		&self.account
	}

	/// Name of the module wrapping every generated item.
	pub fn namespace(&self) -> &str {
		&self.namespace
	}

	pub fn tokens(&self) -> &TokenStream {
		&self.tokens
	}

	/// Pretty-print the unit as a Rust source file.
	pub fn render(&self) -> Result<String> {
		let file = syn::parse2::<syn::File>(self.tokens.clone()).map_err(|e| {
			GenerateError::Render {
				account: self.account.clone(),
				message: e.to_string(),
			}
		})?;

		Ok(format!("{}{}", header(&self.account), prettyplease::unparse(&file)))
	}
}

fn header(account: &str) -> String {
	format!(
		"// @generated by abigen from the ABI of `{account}`.\n// Do not edit by hand; regenerate instead.\n\n"
	)
}

/// Lower `abi` and emit the bindings for the contract deployed at `account`.
///
/// Generation is all or nothing: any error leaves no output behind.
pub fn generate(abi: &AbiDocument, account: &str, config: &GenerateConfig) -> Result<EmissionUnit> {
	let runtime = syn::parse_str::<syn::Path>(&config.runtime_crate).map_err(|e| {
		GenerateError::InvalidRuntimePath {
			path: config.runtime_crate.clone(),
			message: e.to_string(),
		}
	})?;
	let model = ContractModel::lower(abi, account)?;

	let abi_items = if config.embed_abi {
		let blob = abi.to_hex().map_err(|e| {
			GenerateError::AbiEncoding {
				account: account.to_string(),
				message: e.to_string(),
			}
		})?;
		quote! {
			/// The contract ABI in its binary form, hex encoded.
			pub const ABI_HEX: &str = #blob;

			/// Decode the embedded ABI.
			pub fn abi() -> ::core::result::Result<rt::AbiDocument, rt::AbiError> {
				rt::AbiDocument::from_hex(ABI_HEX)
			}
		}
	} else {
		TokenStream::new()
	};

	let serde_crate = format!("{}::serde", config.runtime_crate);
	let namespace = Ident::new(&model.namespace, Span::call_site());
	let account_name = &model.account;
	let account_value = model.account_value;
	let declarations = types::declarations(&model.declarations, &serde_crate);
	let action_enums = actions::enums(&model.actions);
	let action_methods = actions::methods(&model.actions);
	let table_enums = tables::enums(&model.tables);
	let table_methods = tables::methods(&model.tables);
	let lints = ALLOWED_LINTS.iter().map(|lint| {
		syn::parse_str::<syn::Path>(lint).map_err(|e| {
			GenerateError::Render {
				account: account.to_string(),
				message: e.to_string(),
			}
		})
	});
	let lints = lints.collect::<Result<Vec<_>>>()?;
	let doc = format!(" Bindings for the `{account_name}` contract.");

	let tokens = quote! {
		use #runtime as rt;

		#[doc = #doc]
		#[allow(#(#lints),*)]
		pub mod #namespace {
			use super::rt;

			/// The account the contract is deployed to.
			pub const ACCOUNT_NAME: &str = #account_name;
			pub const ACCOUNT: rt::types::Name = rt::types::Name::from_u64(#account_value);

			#abi_items

			/// Structs, variants and aliases declared by the ABI.
			pub mod types {
				use super::rt;

				#declarations
			}

			#action_enums
			#table_enums

			/// Typed access to the contract's actions and tables.
			#[derive(Debug, Clone)]
			pub struct Contract {
				client: rt::ContractClient,
			}

			impl Contract {
				pub fn new(client: rt::ContractClient) -> Self {
					Self { client }
				}

				pub fn client(&self) -> &rt::ContractClient {
					&self.client
				}

				#action_methods
				#table_methods
			}
		}
	};

	tracing::info!(
		account,
		namespace = %model.namespace,
		structs = model.struct_count(),
		actions = model.actions.len(),
		tables = model.tables.len(),
		"generated bindings"
	);

	Ok(EmissionUnit {
		account: model.account,
		namespace: model.namespace,
		tokens,
	})
}

/// [`generate`] then [`EmissionUnit::render`].
pub fn generate_bindings(abi: &AbiDocument, account: &str, config: &GenerateConfig) -> Result<String> {
	generate(abi, account, config)?.render()
}
