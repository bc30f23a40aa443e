//! Generate typed Rust bindings for Antelope smart contracts from their ABI.
//!
//! ```rust,no_run
//! use abigen::GenerateConfig;
//! use abigen::generate_bindings;
//! use abigen_runtime::AbiDocument;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let json = std::fs::read_to_string("eosio.token.json")?;
//! let abi = AbiDocument::from_json(&json)?;
//! let source = generate_bindings(&abi, "eosio.token", &GenerateConfig::default())?;
//! std::fs::write("src/eosio_token.rs", source)?;
//! # Ok(())
//! # }
//! ```

mod config;
pub mod emit;
mod error;
pub mod grammar;
pub mod model;
pub mod names;
pub mod order;
pub mod resolve;

pub use crate::config::GenerateConfig;
pub use crate::emit::EmissionUnit;
pub use crate::emit::generate;
pub use crate::emit::generate_bindings;
pub use crate::error::GenerateError;
pub use crate::error::Result;
pub use crate::grammar::AbiTypeDescriptor;
pub use crate::model::ContractModel;
pub use crate::order::Declaration;
pub use crate::order::order;
pub use crate::resolve::Primitive;
pub use crate::resolve::ResolvedKind;
pub use crate::resolve::ResolvedType;
pub use crate::resolve::TypeResolver;
