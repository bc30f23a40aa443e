//! Intermediate representation of one contract's bindings.
//!
//! The model is lowered from an [`AbiDocument`] with every name resolved,
//! every type checked and every declaration in emission order. The emitters
//! only read it.

use std::collections::HashMap;

use abigen_runtime::AbiDocument;
use abigen_runtime::IndexPosition;
use abigen_runtime::TypeModifier;
use abigen_runtime::abi::StructDef;
use abigen_runtime::abi::TableDef;
use abigen_runtime::types::Name;
use proc_macro2::Ident;
use proc_macro2::Span;

use crate::error::GenerateError;
use crate::error::Result;
use crate::grammar::AbiTypeDescriptor;
use crate::names;
use crate::order::Declaration;
use crate::order::order;
use crate::resolve::ResolvedType;
use crate::resolve::TypeResolver;

/// `Contract` methods that action and table methods must not shadow.
const FIXED_METHODS: &[&str] = &["new", "client", "action"];

/// Top-level IR for a single contract.
#[derive(Debug, Clone)]
pub struct ContractModel {
	pub account: String,
	pub account_value: u64,
	pub namespace: String,
	pub declarations: Vec<DeclarationModel>,
	pub actions: Vec<ActionModel>,
	pub tables: Vec<TableModel>,
}

#[derive(Debug, Clone)]
pub enum DeclarationModel {
	Struct(StructModel),
	Variant(VariantModel),
	Alias(AliasModel),
}

/// A struct with its base fields flattened in front of its own.
#[derive(Debug, Clone)]
pub struct StructModel {
	pub abi_name: String,
	pub ident: Ident,
	pub base: Option<String>,
	pub fields: Vec<FieldModel>,
}

#[derive(Debug, Clone)]
pub struct FieldModel {
	pub abi_name: String,
	/// The field type as written in the ABI.
	pub abi_type: String,
	/// The modifier written on the field type itself.
	pub modifier: TypeModifier,
	pub ident: Ident,
	pub ty: ResolvedType,
}

#[derive(Debug, Clone)]
pub struct VariantModel {
	pub abi_name: String,
	pub ident: Ident,
	pub alternatives: Vec<AlternativeModel>,
}

#[derive(Debug, Clone)]
pub struct AlternativeModel {
	/// The alternative type as written in the ABI; also its JSON tag.
	pub abi_type: String,
	pub ident: Ident,
	pub ty: ResolvedType,
}

#[derive(Debug, Clone)]
pub struct AliasModel {
	pub abi_name: String,
	pub ident: Ident,
	pub target: ResolvedType,
}

#[derive(Debug, Clone)]
pub struct ActionModel {
	pub abi_name: String,
	/// Variant of the generated `ActionName` and `ActionParams` enums.
	pub ident: Ident,
	pub method: Ident,
	pub struct_abi_name: String,
	pub struct_ident: Ident,
	pub fields: Vec<FieldModel>,
}

#[derive(Debug, Clone)]
pub struct TableModel {
	pub abi_name: String,
	/// Variant of the generated `TableName` enum.
	pub ident: Ident,
	pub method: Ident,
	pub row_abi_name: String,
	pub row_ident: Ident,
	pub index_ident: Ident,
	pub indices: Vec<IndexModel>,
}

#[derive(Debug, Clone)]
pub struct IndexModel {
	/// The row field this index covers.
	pub field: String,
	pub ident: Ident,
	pub position: IndexPosition,
	/// Key type in `get_table_rows` terms (`i64`, `name`, `sha256`, …).
	pub key_type: String,
}

impl ContractModel {
	/// Lower `abi` into the IR for the contract deployed at `account`.
	pub fn lower(abi: &AbiDocument, account: &str) -> Result<Self> {
		if account.is_empty() {
			return Err(GenerateError::InvalidAccount {
				account: String::new(),
				reason: "the account name is empty".to_string(),
			});
		}

		let account_value = account
			.parse::<Name>()
			.map_err(|e| {
				GenerateError::InvalidAccount {
					account: account.to_string(),
					reason: e.to_string(),
				}
			})?
			.as_u64();

		let resolver = TypeResolver::new(abi);
		check_type_names(abi)?;

		let mut lowered_structs: HashMap<&str, StructModel> = HashMap::new();
		let mut declarations = Vec::new();

		for declaration in order(abi, &resolver)? {
			let model = match declaration {
				Declaration::Struct(def) => {
					let model = lower_struct(def, &resolver, &lowered_structs)?;
					lowered_structs.insert(&def.name, model.clone());
					DeclarationModel::Struct(model)
				}
				Declaration::Variant(def) => {
					let mut taken = Vec::new();
					let alternatives = def
						.types
						.iter()
						.zip(resolver.resolve_variant(&def.name)?)
						.map(|(abi_type, ty)| {
							let name = names::unique(names::variant_name(abi_type), &taken);
							taken.push(name.clone());
							AlternativeModel {
								abi_type: abi_type.clone(),
								ident: Ident::new(&name, Span::call_site()),
								ty,
							}
						})
						.collect();

					DeclarationModel::Variant(VariantModel {
						abi_name: def.name.clone(),
						ident: names::type_ident(&def.name),
						alternatives,
					})
				}
				Declaration::Alias(def) => {
					let context = format!("alias `{}`", def.new_type_name);
					DeclarationModel::Alias(AliasModel {
						abi_name: def.new_type_name.clone(),
						ident: names::type_ident(&def.new_type_name),
						target: resolver.resolve_str(&def.type_name, &context)?,
					})
				}
			};
			declarations.push(model);
		}

		let actions = lower_actions(abi, &lowered_structs)?;
		let action_methods: Vec<String> = actions.iter().map(|action| action.method.to_string()).collect();
		let tables = lower_tables(abi, &lowered_structs, &action_methods)?;

		Ok(Self {
			account: account.to_string(),
			account_value,
			namespace: names::contract_namespace(account),
			declarations,
			actions,
			tables,
		})
	}

	pub fn struct_count(&self) -> usize {
		self.declarations
			.iter()
			.filter(|declaration| matches!(declaration, DeclarationModel::Struct(_)))
			.count()
	}
}

/// Every struct, variant and alias must get its own Rust name, and none may
/// shadow a prelude type.
fn check_type_names(abi: &AbiDocument) -> Result<()> {
	let declared = abi
		.structs
		.iter()
		.map(|s| s.name.as_str())
		.chain(abi.variants.iter().map(|v| v.name.as_str()))
		.chain(abi.types.iter().map(|t| t.new_type_name.as_str()));

	let mut seen: HashMap<String, &str> = HashMap::new();
	for abi_name in declared {
		let ident = names::type_name(abi_name);
		if names::is_reserved_type(&ident) {
			return Err(GenerateError::ReservedTypeName {
				name: abi_name.to_string(),
				ident,
			});
		}
		if let Some(first) = seen.get(&ident) {
			return Err(GenerateError::DuplicateTypeName {
				ident,
				first: (*first).to_string(),
				second: abi_name.to_string(),
			});
		}
		seen.insert(ident, abi_name);
	}

	Ok(())
}

fn lower_struct(
	def: &StructDef,
	resolver: &TypeResolver<'_>,
	lowered: &HashMap<&str, StructModel>,
) -> Result<StructModel> {
	let mut fields = match lowered.get(def.base.as_str()) {
		Some(base) if !def.base.is_empty() => base.fields.clone(),
		_ => Vec::new(),
	};
	let mut taken: Vec<String> = fields.iter().map(|field| field.ident.to_string()).collect();

	for field in &def.fields {
		if fields.iter().any(|existing| existing.abi_name == field.name) {
			return Err(GenerateError::DuplicateField {
				structure: def.name.clone(),
				field: field.name.clone(),
			});
		}

		let context = format!("field `{}` of struct `{}`", field.name, def.name);
		let ty = resolver.resolve_str(&field.type_name, &context)?;
		let ident = names::field_ident(&field.name);
		let ident_name = names::unique(ident.to_string(), &taken);
		let ident = if ident_name == ident.to_string() {
			ident
		} else {
			Ident::new(&ident_name, Span::call_site())
		};
		taken.push(ident_name);

		fields.push(FieldModel {
			abi_name: field.name.clone(),
			abi_type: field.type_name.clone(),
			modifier: AbiTypeDescriptor::parse(&field.type_name).modifier(),
			ident,
			ty,
		});
	}

	Ok(StructModel {
		abi_name: def.name.clone(),
		ident: names::type_ident(&def.name),
		base: (!def.base.is_empty()).then(|| def.base.clone()),
		fields,
	})
}

fn lower_actions(abi: &AbiDocument, structs: &HashMap<&str, StructModel>) -> Result<Vec<ActionModel>> {
	let mut variants = Vec::new();
	let mut methods: Vec<String> = Vec::new();

	abi.actions
		.iter()
		.map(|action| {
			let Some(params) = structs.get(action.type_name.as_str()) else {
				return Err(GenerateError::MissingActionStruct {
					action: action.name.clone(),
					struct_name: action.type_name.clone(),
				});
			};

			let variant = names::unique(names::variant_name(&action.name), &variants);
			variants.push(variant.clone());

			let method = disambiguate(names::method_ident(&action.name), "_action", &methods, &[]);
			methods.push(method.to_string());

			Ok(ActionModel {
				abi_name: action.name.clone(),
				ident: Ident::new(&variant, Span::call_site()),
				method,
				struct_abi_name: params.abi_name.clone(),
				struct_ident: params.ident.clone(),
				fields: params.fields.clone(),
			})
		})
		.collect()
}

fn lower_tables(
	abi: &AbiDocument,
	structs: &HashMap<&str, StructModel>,
	action_methods: &[String],
) -> Result<Vec<TableModel>> {
	let mut variants = Vec::new();
	let mut index_idents = Vec::new();
	let mut methods: Vec<String> = Vec::new();

	abi.tables
		.iter()
		.map(|table| {
			let Some(row) = structs.get(table.type_name.as_str()) else {
				return Err(GenerateError::MissingTableStruct {
					table: table.name.clone(),
					struct_name: table.type_name.clone(),
				});
			};

			let variant = names::unique(names::variant_name(&table.name), &variants);
			variants.push(variant.clone());

			let index_ident = names::unique(format!("{}Index", names::type_name(&table.name)), &index_idents);
			index_idents.push(index_ident.clone());

			let method = disambiguate(names::method_ident(&table.name), "_table", &methods, action_methods);
			methods.push(method.to_string());

			Ok(TableModel {
				abi_name: table.name.clone(),
				ident: Ident::new(&variant, Span::call_site()),
				method,
				row_abi_name: row.abi_name.clone(),
				row_ident: row.ident.clone(),
				index_ident: Ident::new(&index_ident, Span::call_site()),
				indices: lower_indices(table, row)?,
			})
		})
		.collect()
}

/// The indices of `table`, in position order. A table without `key_names`
/// is indexed by the first field of its row struct.
fn lower_indices(table: &TableDef, row: &StructModel) -> Result<Vec<IndexModel>> {
	if table.key_names.len() > IndexPosition::ALL.len() {
		return Err(GenerateError::TooManyIndices {
			table: table.name.clone(),
			count: table.key_names.len(),
		});
	}

	let keys: Vec<(String, String)> = if table.key_names.is_empty() {
		let field = row.fields.first().map_or_else(
			|| {
				tracing::warn!(table = %table.name, "row struct has no fields; naming the primary index `primary`");
				"primary".to_string()
			},
			|field| field.abi_name.clone(),
		);
		vec![(field, table.index_type.clone())]
	} else {
		table
			.key_names
			.iter()
			.enumerate()
			.map(|(i, name)| {
				let key_type = table
					.key_types
					.get(i)
					.cloned()
					.unwrap_or_else(|| table.index_type.clone());
				(name.clone(), key_type)
			})
			.collect()
	};

	let mut taken = Vec::new();
	let indices = keys
		.into_iter()
		.zip(IndexPosition::ALL)
		.map(|((field, key_type), position)| {
			if !row.fields.iter().any(|f| f.abi_name == field) {
				tracing::warn!(table = %table.name, key = %field, "index key names no field of the row struct");
			}

			let ident = names::unique(names::variant_name(&field), &taken);
			taken.push(ident.clone());

			IndexModel {
				field,
				ident: Ident::new(&ident, Span::call_site()),
				position,
				key_type: key_type_for(&key_type).to_string(),
			}
		})
		.collect();

	Ok(indices)
}

/// `get_table_rows` names its key types differently from the ABI.
fn key_type_for(abi_type: &str) -> &str {
	match abi_type {
		"uint64" | "int64" => "i64",
		"uint128" | "int128" => "i128",
		"checksum256" | "sha256" => "sha256",
		"checksum160" | "ripemd160" => "ripemd160",
		other => other,
	}
}

/// Append `suffix` to `method` when it clashes with a fixed method, a
/// method in `others`, or one already taken.
fn disambiguate(method: Ident, suffix: &str, taken: &[String], others: &[String]) -> Ident {
	let name = method.to_string();
	let clashes = |candidate: &str| {
		FIXED_METHODS.contains(&candidate)
			|| taken.iter().any(|t| t == candidate)
			|| others.iter().any(|o| o == candidate)
	};

	if !clashes(&name) {
		return method;
	}

	let base = name.trim_start_matches("r#");
	let mut candidate = format!("{base}{suffix}");
	let mut n = 2;
	while clashes(&candidate) {
		candidate = format!("{base}{suffix}{n}");
		n += 1;
	}
	Ident::new(&candidate, Span::call_site())
}
