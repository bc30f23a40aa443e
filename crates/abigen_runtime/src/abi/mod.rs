//! The contract ABI document as served by `get_abi`, and the metadata that
//! generated bindings attach to their types.

mod binary;

use serde::Deserialize;
use serde::Serialize;

use crate::error::AbiError;

/// A contract ABI in its JSON shape.
///
/// Every list defaults to empty so minimal documents (for example one with
/// only `version` and `structs`) parse.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct AbiDocument {
	pub version: String,
	#[serde(default)]
	pub types: Vec<TypeDef>,
	#[serde(default)]
	pub structs: Vec<StructDef>,
	#[serde(default)]
	pub actions: Vec<ActionDef>,
	#[serde(default)]
	pub tables: Vec<TableDef>,
	#[serde(default)]
	pub ricardian_clauses: Vec<ClauseDef>,
	#[serde(default)]
	pub error_messages: Vec<ErrorMessageDef>,
	#[serde(default)]
	pub abi_extensions: Vec<ExtensionDef>,
	#[serde(default)]
	pub variants: Vec<VariantDef>,
	#[serde(default)]
	pub action_results: Vec<ActionResultDef>,
}

/// A type alias: `new_type_name` stands for `type`.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct TypeDef {
	pub new_type_name: String,
	#[serde(rename = "type")]
	pub type_name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct StructDef {
	pub name: String,
	#[serde(default)]
	pub base: String,
	#[serde(default)]
	pub fields: Vec<FieldDef>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct FieldDef {
	pub name: String,
	#[serde(rename = "type")]
	pub type_name: String,
}

/// An action and the struct describing its payload.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ActionDef {
	pub name: String,
	#[serde(rename = "type")]
	pub type_name: String,
	#[serde(default)]
	pub ricardian_contract: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct TableDef {
	pub name: String,
	#[serde(default)]
	pub index_type: String,
	#[serde(default)]
	pub key_names: Vec<String>,
	#[serde(default)]
	pub key_types: Vec<String>,
	#[serde(rename = "type")]
	pub type_name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ClauseDef {
	pub id: String,
	pub body: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ErrorMessageDef {
	pub error_code: u64,
	pub error_msg: String,
}

/// An opaque ABI extension; `data` is hex encoded.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ExtensionDef {
	#[serde(rename = "type")]
	pub tag: u16,
	pub data: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct VariantDef {
	pub name: String,
	pub types: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ActionResultDef {
	pub name: String,
	pub result_type: String,
}

impl AbiDocument {
	pub fn from_json(json: &str) -> Result<Self, AbiError> {
		Ok(serde_json::from_str(json)?)
	}

	/// Encode in the binary `abi_def` layout used by `setabi`.
	pub fn to_bin(&self) -> Result<Vec<u8>, AbiError> {
		binary::encode(self)
	}

	/// Decode the binary `abi_def` layout. Trailing bytes are rejected.
	pub fn from_bin(bytes: &[u8]) -> Result<Self, AbiError> {
		binary::decode(bytes)
	}

	pub fn to_hex(&self) -> Result<String, AbiError> {
		Ok(hex::encode(self.to_bin()?))
	}

	pub fn from_hex(blob: &str) -> Result<Self, AbiError> {
		Self::from_bin(&hex::decode(blob)?)
	}

	pub fn find_struct(&self, name: &str) -> Option<&StructDef> {
		self.structs.iter().find(|s| s.name == name)
	}

	pub fn find_action(&self, name: &str) -> Option<&ActionDef> {
		self.actions.iter().find(|a| a.name == name)
	}

	pub fn find_table(&self, name: &str) -> Option<&TableDef> {
		self.tables.iter().find(|t| t.name == name)
	}
}

/// The single trailing modifier an ABI type string may carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum TypeModifier {
	#[default]
	None,
	/// `T[]`
	Array,
	/// `T?`
	Optional,
	/// `T$`: absent in data encoded before the field was added.
	BinaryExtension,
}

impl TypeModifier {
	pub const fn suffix(self) -> &'static str {
		match self {
			Self::None => "",
			Self::Array => "[]",
			Self::Optional => "?",
			Self::BinaryExtension => "$",
		}
	}
}

/// Wire metadata for one field of a generated struct.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldMeta {
	/// Field name as written in the ABI.
	pub name: &'static str,
	/// Field type as written in the ABI, modifier included.
	pub abi_type: &'static str,
	pub modifier: TypeModifier,
}

impl FieldMeta {
	pub const fn new(name: &'static str, abi_type: &'static str, modifier: TypeModifier) -> Self {
		Self {
			name,
			abi_type,
			modifier,
		}
	}
}
