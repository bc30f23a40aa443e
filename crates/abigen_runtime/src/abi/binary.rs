//! Binary `abi_def` codec.
//!
//! Strings and vectors carry a varuint32 length prefix, names are packed into
//! little-endian `u64`s. `variants` and `action_results` are binary
//! extensions: always written, read only while bytes remain.

use super::AbiDocument;
use super::ActionDef;
use super::ActionResultDef;
use super::ClauseDef;
use super::ErrorMessageDef;
use super::ExtensionDef;
use super::FieldDef;
use super::StructDef;
use super::TableDef;
use super::TypeDef;
use super::VariantDef;
use crate::error::AbiError;
use crate::types::Name;

pub(super) fn encode(abi: &AbiDocument) -> Result<Vec<u8>, AbiError> {
	let mut w = Writer::default();

	w.string(&abi.version);

	w.len(abi.types.len());
	for def in &abi.types {
		w.string(&def.new_type_name);
		w.string(&def.type_name);
	}

	w.len(abi.structs.len());
	for def in &abi.structs {
		w.string(&def.name);
		w.string(&def.base);
		w.len(def.fields.len());
		for field in &def.fields {
			w.string(&field.name);
			w.string(&field.type_name);
		}
	}

	w.len(abi.actions.len());
	for def in &abi.actions {
		w.name(&def.name, "action name")?;
		w.string(&def.type_name);
		w.string(&def.ricardian_contract);
	}

	w.len(abi.tables.len());
	for def in &abi.tables {
		w.name(&def.name, "table name")?;
		w.string(&def.index_type);
		w.strings(&def.key_names);
		w.strings(&def.key_types);
		w.string(&def.type_name);
	}

	w.len(abi.ricardian_clauses.len());
	for def in &abi.ricardian_clauses {
		w.string(&def.id);
		w.string(&def.body);
	}

	w.len(abi.error_messages.len());
	for def in &abi.error_messages {
		w.buf.extend_from_slice(&def.error_code.to_le_bytes());
		w.string(&def.error_msg);
	}

	w.len(abi.abi_extensions.len());
	for def in &abi.abi_extensions {
		w.buf.extend_from_slice(&def.tag.to_le_bytes());
		let data = hex::decode(&def.data)?;
		w.len(data.len());
		w.buf.extend_from_slice(&data);
	}

	w.len(abi.variants.len());
	for def in &abi.variants {
		w.string(&def.name);
		w.strings(&def.types);
	}

	w.len(abi.action_results.len());
	for def in &abi.action_results {
		w.name(&def.name, "action result name")?;
		w.string(&def.result_type);
	}

	Ok(w.buf)
}

pub(super) fn decode(bytes: &[u8]) -> Result<AbiDocument, AbiError> {
	let mut r = Reader { data: bytes, pos: 0 };
	let mut abi = AbiDocument {
		version: r.string("version")?,
		..AbiDocument::default()
	};

	for _ in 0..r.len("types")? {
		abi.types.push(TypeDef {
			new_type_name: r.string("type alias")?,
			type_name: r.string("type alias")?,
		});
	}

	for _ in 0..r.len("structs")? {
		let name = r.string("struct")?;
		let base = r.string("struct")?;
		let mut fields = Vec::new();
		for _ in 0..r.len("struct fields")? {
			fields.push(FieldDef {
				name: r.string("struct field")?,
				type_name: r.string("struct field")?,
			});
		}
		abi.structs.push(StructDef { name, base, fields });
	}

	for _ in 0..r.len("actions")? {
		abi.actions.push(ActionDef {
			name: r.name("action name")?,
			type_name: r.string("action")?,
			ricardian_contract: r.string("action")?,
		});
	}

	for _ in 0..r.len("tables")? {
		abi.tables.push(TableDef {
			name: r.name("table name")?,
			index_type: r.string("table")?,
			key_names: r.strings("table key names")?,
			key_types: r.strings("table key types")?,
			type_name: r.string("table")?,
		});
	}

	for _ in 0..r.len("ricardian clauses")? {
		abi.ricardian_clauses.push(ClauseDef {
			id: r.string("ricardian clause")?,
			body: r.string("ricardian clause")?,
		});
	}

	for _ in 0..r.len("error messages")? {
		abi.error_messages.push(ErrorMessageDef {
			error_code: r.u64("error message")?,
			error_msg: r.string("error message")?,
		});
	}

	for _ in 0..r.len("abi extensions")? {
		let tag = r.u16("abi extension")?;
		let len = r.len("abi extension")?;
		let data = hex::encode(r.take(len, "abi extension")?);
		abi.abi_extensions.push(ExtensionDef { tag, data });
	}

	if r.has_remaining() {
		for _ in 0..r.len("variants")? {
			abi.variants.push(VariantDef {
				name: r.string("variant")?,
				types: r.strings("variant types")?,
			});
		}
	}

	if r.has_remaining() {
		for _ in 0..r.len("action results")? {
			abi.action_results.push(ActionResultDef {
				name: r.name("action result name")?,
				result_type: r.string("action result")?,
			});
		}
	}

	if r.has_remaining() {
		return Err(AbiError::TrailingBytes {
			count: bytes.len() - r.pos,
		});
	}

	Ok(abi)
}

#[derive(Default)]
struct Writer {
	buf: Vec<u8>,
}

impl Writer {
	fn varuint32(&mut self, mut value: u32) {
		loop {
			let mut byte = (value & 0x7f) as u8;
			value >>= 7;
			if value != 0 {
				byte |= 0x80;
			}
			self.buf.push(byte);
			if value == 0 {
				break;
			}
		}
	}

	fn len(&mut self, len: usize) {
		self.varuint32(len as u32);
	}

	fn string(&mut self, value: &str) {
		self.len(value.len());
		self.buf.extend_from_slice(value.as_bytes());
	}

	fn strings(&mut self, values: &[String]) {
		self.len(values.len());
		for value in values {
			self.string(value);
		}
	}

	fn name(&mut self, value: &str, context: &'static str) -> Result<(), AbiError> {
		let name = value
			.parse::<Name>()
			.map_err(|source| AbiError::Name { context, source })?;
		self.buf.extend_from_slice(&name.as_u64().to_le_bytes());
		Ok(())
	}
}

struct Reader<'a> {
	data: &'a [u8],
	pos: usize,
}

impl<'a> Reader<'a> {
	fn has_remaining(&self) -> bool {
		self.pos < self.data.len()
	}

	fn take(&mut self, count: usize, context: &'static str) -> Result<&'a [u8], AbiError> {
		let end = self
			.pos
			.checked_add(count)
			.filter(|&end| end <= self.data.len())
			.ok_or(AbiError::UnexpectedEof { context })?;
		let slice = &self.data[self.pos..end];
		self.pos = end;
		Ok(slice)
	}

	fn array<const N: usize>(&mut self, context: &'static str) -> Result<[u8; N], AbiError> {
		let mut out = [0u8; N];
		out.copy_from_slice(self.take(N, context)?);
		Ok(out)
	}

	fn u16(&mut self, context: &'static str) -> Result<u16, AbiError> {
		Ok(u16::from_le_bytes(self.array(context)?))
	}

	fn u64(&mut self, context: &'static str) -> Result<u64, AbiError> {
		Ok(u64::from_le_bytes(self.array(context)?))
	}

	fn varuint32(&mut self, context: &'static str) -> Result<u32, AbiError> {
		let mut value = 0u64;
		let mut shift = 0;
		loop {
			let [byte] = self.array::<1>(context)?;
			value |= u64::from(byte & 0x7f) << shift;
			if byte & 0x80 == 0 {
				break;
			}
			shift += 7;
			if shift >= 35 {
				return Err(AbiError::VarintOverflow { context });
			}
		}
		u32::try_from(value).map_err(|_| AbiError::VarintOverflow { context })
	}

	fn len(&mut self, context: &'static str) -> Result<usize, AbiError> {
		Ok(self.varuint32(context)? as usize)
	}

	fn string(&mut self, context: &'static str) -> Result<String, AbiError> {
		let len = self.len(context)?;
		let bytes = self.take(len, context)?;
		String::from_utf8(bytes.to_vec()).map_err(|_| AbiError::InvalidUtf8 { context })
	}

	fn strings(&mut self, context: &'static str) -> Result<Vec<String>, AbiError> {
		let count = self.len(context)?;
		(0..count).map(|_| self.string(context)).collect()
	}

	fn name(&mut self, context: &'static str) -> Result<String, AbiError> {
		Ok(Name::from_u64(self.u64(context)?).to_string())
	}
}

#[cfg(test)]
mod tests {
	use proptest::prelude::*;

	use super::*;

	fn token_abi() -> AbiDocument {
		AbiDocument {
			version: "eosio::abi/1.2".to_owned(),
			types: vec![TypeDef {
				new_type_name: "account_name".to_owned(),
				type_name: "name".to_owned(),
			}],
			structs: vec![StructDef {
				name: "account".to_owned(),
				base: String::new(),
				fields: vec![FieldDef {
					name: "balance".to_owned(),
					type_name: "asset".to_owned(),
				}],
			}],
			actions: vec![ActionDef {
				name: "transfer".to_owned(),
				type_name: "transfer".to_owned(),
				ricardian_contract: String::new(),
			}],
			tables: vec![TableDef {
				name: "accounts".to_owned(),
				index_type: "i64".to_owned(),
				key_names: vec![],
				key_types: vec![],
				type_name: "account".to_owned(),
			}],
			..AbiDocument::default()
		}
	}

	#[test]
	fn encodes_known_prefix() {
		let bin = encode(&token_abi()).unwrap_or_else(|e| panic!("encode: {e}"));
		assert_eq!(bin[0], 14);
		assert_eq!(&bin[1..15], b"eosio::abi/1.2");
		// Both binary extensions are written even when empty.
		assert_eq!(&bin[bin.len() - 2..], &[0, 0]);
	}

	#[test]
	fn decodes_without_binary_extensions() {
		let mut bin = encode(&token_abi()).unwrap_or_else(|e| panic!("encode: {e}"));
		bin.truncate(bin.len() - 2);
		let decoded = decode(&bin).unwrap_or_else(|e| panic!("decode: {e}"));
		assert_eq!(decoded, token_abi());
	}

	#[test]
	fn rejects_truncated_and_trailing_data() {
		let bin = encode(&token_abi()).unwrap_or_else(|e| panic!("encode: {e}"));
		assert!(matches!(
			decode(&bin[..10]),
			Err(AbiError::UnexpectedEof { .. })
		));

		let mut padded = bin;
		padded.push(0);
		assert!(matches!(
			decode(&padded),
			Err(AbiError::TrailingBytes { count: 1 })
		));
	}

	#[test]
	fn rejects_invalid_action_names() {
		let mut abi = token_abi();
		abi.actions[0].name = "Transfer".to_owned();
		assert!(matches!(encode(&abi), Err(AbiError::Name { .. })));
	}

	fn ident() -> impl Strategy<Value = String> {
		"[a-z][a-z0-9_]{0,10}"
	}

	fn account_name() -> impl Strategy<Value = String> {
		"[a-z1-5]{1,12}"
	}

	fn arb_abi() -> impl Strategy<Value = AbiDocument> {
		let structs = prop::collection::vec(
			(
				ident(),
				prop::option::of(ident()),
				prop::collection::vec((ident(), ident()), 0..4),
			),
			0..4,
		);
		let actions = prop::collection::vec((account_name(), ident(), ".{0,16}"), 0..3);
		let tables = prop::collection::vec(
			(account_name(), prop::collection::vec(ident(), 0..3), ident()),
			0..3,
		);
		let variants = prop::collection::vec((ident(), prop::collection::vec(ident(), 1..4)), 0..3);
		let extensions = prop::collection::vec((any::<u16>(), prop::collection::vec(any::<u8>(), 0..8)), 0..2);

		(structs, actions, tables, variants, extensions, any::<u64>()).prop_map(
			|(structs, actions, tables, variants, extensions, error_code)| {
				AbiDocument {
					version: "eosio::abi/1.2".to_owned(),
					types: vec![],
					structs: structs
						.into_iter()
						.map(|(name, base, fields)| {
							StructDef {
								name,
								base: base.unwrap_or_default(),
								fields: fields
									.into_iter()
									.map(|(name, type_name)| FieldDef { name, type_name })
									.collect(),
							}
						})
						.collect(),
					actions: actions
						.into_iter()
						.map(|(name, type_name, ricardian_contract)| {
							ActionDef {
								name,
								type_name,
								ricardian_contract,
							}
						})
						.collect(),
					tables: tables
						.into_iter()
						.map(|(name, key_names, type_name)| {
							TableDef {
								name,
								index_type: "i64".to_owned(),
								key_types: key_names.iter().map(|_| "i64".to_owned()).collect(),
								key_names,
								type_name,
							}
						})
						.collect(),
					ricardian_clauses: vec![],
					error_messages: vec![ErrorMessageDef {
						error_code,
						error_msg: "failure".to_owned(),
					}],
					abi_extensions: extensions
						.into_iter()
						.map(|(tag, data)| {
							ExtensionDef {
								tag,
								data: hex::encode(data),
							}
						})
						.collect(),
					variants: variants
						.into_iter()
						.map(|(name, types)| VariantDef { name, types })
						.collect(),
					action_results: vec![],
				}
			},
		)
	}

	proptest! {
		#[test]
		fn blob_decode_then_encode_is_identity(abi in arb_abi()) {
			let blob = encode(&abi).unwrap_or_else(|e| panic!("encode: {e}"));
			let decoded = decode(&blob).unwrap_or_else(|e| panic!("decode: {e}"));
			prop_assert_eq!(&decoded, &abi);
			let reencoded = encode(&decoded).unwrap_or_else(|e| panic!("re-encode: {e}"));
			prop_assert_eq!(reencoded, blob);
		}
	}
}
