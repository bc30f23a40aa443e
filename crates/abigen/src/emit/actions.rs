//! The `ActionName` and `ActionParams` enums and one `Contract` method per
//! action.

use proc_macro2::TokenStream;
use quote::quote;

use super::tokens::Scope;
use super::tokens::rust_type;
use crate::model::ActionModel;

/// `ActionName` and `ActionParams`.
pub fn enums(actions: &[ActionModel]) -> TokenStream {
	let variants: Vec<_> = actions.iter().map(|action| &action.ident).collect();
	let names: Vec<_> = actions.iter().map(|action| &action.abi_name).collect();
	let structs: Vec<_> = actions.iter().map(|action| &action.struct_abi_name).collect();
	let params: Vec<_> = actions.iter().map(|action| &action.struct_ident).collect();

	quote! {
		/// Every action the contract declares.
		#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
		pub enum ActionName {
			#(#variants,)*
		}

		impl ActionName {
			pub const ALL: &'static [Self] = &[#(Self::#variants),*];

			/// The action name as declared in the ABI.
			pub const fn as_str(self) -> &'static str {
				match self {
					#(Self::#variants => #names,)*
				}
			}

			/// The ABI struct describing the action's payload.
			pub const fn struct_name(self) -> &'static str {
				match self {
					#(Self::#variants => #structs,)*
				}
			}
		}

		impl ::core::fmt::Display for ActionName {
			fn fmt(&self, f: &mut ::core::fmt::Formatter<'_>) -> ::core::fmt::Result {
				f.write_str(self.as_str())
			}
		}

		impl ::core::str::FromStr for ActionName {
			type Err = rt::ClientError;

			fn from_str(s: &str) -> ::core::result::Result<Self, Self::Err> {
				match s {
					#(#names => ::core::result::Result::Ok(Self::#variants),)*
					_ => ::core::result::Result::Err(rt::ClientError::UnknownName {
						kind: "action",
						name: ::std::string::ToString::to_string(s),
					}),
				}
			}
		}

		/// The payload of any one action.
		#[derive(Debug, Clone, PartialEq)]
		pub enum ActionParams {
			#(#variants(types::#params),)*
		}

		impl ActionParams {
			pub const fn name(&self) -> ActionName {
				match *self {
					#(Self::#variants(_) => ActionName::#variants,)*
				}
			}
		}
	}
}

/// `Contract::action` plus one method per action.
pub fn methods(actions: &[ActionModel]) -> TokenStream {
	let variants = actions.iter().map(|action| &action.ident);
	let names = actions.iter().map(|action| &action.abi_name);
	let structs = actions.iter().map(|action| &action.struct_abi_name);

	let dispatch = quote! {
		/// Submit any action from its assembled parameters.
		pub async fn action(&self, params: ActionParams) -> ::core::result::Result<rt::TransactResult, rt::ClientError> {
			let payload = match params {
				#(ActionParams::#variants(params) => rt::ActionData::from_struct(#names, #structs, &params)?,)*
			};
			self.client.dispatch(payload).await
		}
	};

	let methods = actions.iter().map(method);

	quote! {
		#dispatch
		#(#methods)*
	}
}

fn method(action: &ActionModel) -> TokenStream {
	let method = &action.method;
	let name = &action.abi_name;
	let struct_name = &action.struct_abi_name;
	let doc = format!(" Submit the `{name}` action.");

	let params = action.fields.iter().map(|field| {
		let ident = &field.ident;
		let ty = rust_type(&field.ty, Scope::Namespace);
		quote! { #ident: #ty }
	});
	let pushes = action.fields.iter().map(|field| {
		let ident = &field.ident;
		let abi_name = &field.abi_name;
		quote! { __payload.push(#abi_name, &#ident)?; }
	});
	let binding = if action.fields.is_empty() {
		quote! { let __payload }
	} else {
		quote! { let mut __payload }
	};

	quote! {
		#[doc = #doc]
		pub async fn #method(&self, #(#params),*) -> ::core::result::Result<rt::TransactResult, rt::ClientError> {
			#binding = rt::ActionData::new(#name, #struct_name);
			#(#pushes)*
			self.client.dispatch(__payload).await
		}
	}
}
