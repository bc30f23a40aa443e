//! Runtime support for contract bindings generated by `abigen`.
//!
//! Generated code refers to this crate through a single path (by default
//! `abigen_runtime`) and expects the items re-exported here.

pub mod abi;
mod client;
mod cursor;
mod error;
mod table;
mod traits;
pub mod types;
pub mod variant;

pub use serde;
pub use serde_json;
pub use typed_builder;

pub use crate::abi::AbiDocument;
pub use crate::abi::FieldMeta;
pub use crate::abi::TypeModifier;
pub use crate::client::*;
pub use crate::cursor::*;
pub use crate::error::*;
pub use crate::table::*;
pub use crate::traits::*;

/// Make sure all traits are available.
pub mod prelude {
	pub use super::AbiFetcher;
	pub use super::AbiStruct;
	pub use super::AbiVariant;
	pub use super::RowFetcher;
	pub use super::TableIndex;
	pub use super::TransactionSubmitter;
	pub use super::WireCodec;
}
