//! In-memory stand-ins for the network and codec collaborators.

#![allow(dead_code)]

use std::sync::Arc;
use std::sync::Mutex;
use std::sync::atomic::AtomicBool;
use std::sync::atomic::Ordering;

use abigen_runtime::AbiDocument;
use abigen_runtime::ActionPayload;
use abigen_runtime::ClientConfig;
use abigen_runtime::CodecError;
use abigen_runtime::ContractClient;
use abigen_runtime::IndexPosition;
use abigen_runtime::NetworkError;
use abigen_runtime::PermissionLevel;
use abigen_runtime::RowFetcher;
use abigen_runtime::RowsPage;
use abigen_runtime::RowsRequest;
use abigen_runtime::TableIndex;
use abigen_runtime::TransactResult;
use abigen_runtime::TransactionSubmitter;
use abigen_runtime::WireCodec;
use abigen_runtime::types::Name;
use async_trait::async_trait;
use serde::Deserialize;
use serde_json::Value;
use serde_json::json;

pub const ABI: &str = r#"{
	"version": "eosio::abi/1.2",
	"structs": [
		{ "name": "transfer", "base": "", "fields": [
			{ "name": "from", "type": "name" },
			{ "name": "to", "type": "name" },
			{ "name": "quantity", "type": "asset" },
			{ "name": "memo", "type": "string" }
		] },
		{ "name": "row", "base": "", "fields": [
			{ "name": "id", "type": "uint64" },
			{ "name": "owner", "type": "name" }
		] }
	],
	"actions": [{ "name": "transfer", "type": "transfer", "ricardian_contract": "" }],
	"tables": [{ "name": "rows", "index_type": "i64", "key_names": ["id"], "key_types": ["uint64"], "type": "row" }]
}"#;

pub fn name(value: &str) -> Name {
	value.parse().unwrap_or_else(|e| panic!("invalid name `{value}`: {e}"))
}

// ---------------------------------------------------------------------------
// Table rows
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Row {
	pub id: u64,
	pub owner: Name,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowsIndex {
	Id,
}

impl TableIndex for RowsIndex {
	const ALL: &'static [Self] = &[Self::Id];
	const PRIMARY: Self = Self::Id;

	fn field(self) -> &'static str {
		"id"
	}

	fn position(self) -> IndexPosition {
		IndexPosition::Primary
	}

	fn key_type(self) -> &'static str {
		"i64"
	}
}

/// Serves `count` rows with primary keys `0..count`, never more than `cap`
/// per request, the way a node caps `get_table_rows`.
pub struct FakeRows {
	rows: Vec<(u64, Value)>,
	cap: u32,
	fail_next: AtomicBool,
	requests: Mutex<Vec<RowsRequest>>,
}

impl FakeRows {
	pub fn new(count: u64) -> Self {
		let rows = (0..count)
			.map(|id| (id, json!({ "id": id, "owner": "alice" })))
			.collect();
		Self::with_rows(rows)
	}

	pub fn with_rows(rows: Vec<(u64, Value)>) -> Self {
		Self {
			rows,
			cap: u32::MAX,
			fail_next: AtomicBool::new(false),
			requests: Mutex::new(Vec::new()),
		}
	}

	#[must_use]
	pub fn capped(mut self, cap: u32) -> Self {
		self.cap = cap;
		self
	}

	/// Make the next fetch fail with a network error.
	pub fn fail_next(&self) {
		self.fail_next.store(true, Ordering::SeqCst);
	}

	pub fn requests(&self) -> Vec<RowsRequest> {
		self.requests
			.lock()
			.unwrap_or_else(|e| panic!("poisoned: {e}"))
			.clone()
	}
}

fn bound(key: Option<&str>, default: u64) -> u64 {
	key.map_or(default, |key| {
		key.parse()
			.unwrap_or_else(|e| panic!("bad key `{key}`: {e}"))
	})
}

#[async_trait]
impl RowFetcher for FakeRows {
	async fn fetch_rows(&self, request: &RowsRequest) -> Result<RowsPage, NetworkError> {
		self.requests
			.lock()
			.unwrap_or_else(|e| panic!("poisoned: {e}"))
			.push(request.clone());

		if self.fail_next.swap(false, Ordering::SeqCst) {
			return Err(NetworkError::new("get_table_rows", "connection reset"));
		}

		let lower = bound(request.lower_bound.as_deref(), 0);
		let upper = bound(request.upper_bound.as_deref(), u64::MAX);
		let mut matching: Vec<&(u64, Value)> = self
			.rows
			.iter()
			.filter(|(key, _)| *key >= lower && *key <= upper)
			.collect();
		if request.reverse {
			matching.reverse();
		}

		let take = request.limit.min(self.cap) as usize;
		let more = matching.len() > take;
		let next_key = matching.get(take).filter(|_| more).map(|(key, _)| key.to_string());
		let rows = matching.into_iter().take(take).map(|(_, row)| row.clone()).collect();

		Ok(RowsPage {
			rows,
			more,
			next_key,
		})
	}
}

// ---------------------------------------------------------------------------
// Actions
// ---------------------------------------------------------------------------

/// Checks every struct field is present and every `name` field parses, then
/// "encodes" to JSON bytes.
pub struct FakeCodec;

impl WireCodec for FakeCodec {
	fn encode(&self, abi: &AbiDocument, type_name: &str, value: &Value) -> Result<Vec<u8>, CodecError> {
		let layout = abi
			.find_struct(type_name)
			.ok_or_else(|| CodecError::new(format!("unknown struct `{type_name}`")))?;

		for field in &layout.fields {
			let Some(field_value) = value.get(&field.name) else {
				return Err(CodecError::new("missing field").with_field(&field.name));
			};
			if field.type_name == "name" {
				let valid = field_value.as_str().is_some_and(|text| text.parse::<Name>().is_ok());
				if !valid {
					return Err(CodecError::new(format!("`{field_value}` is not a name")).with_field(&field.name));
				}
			}
		}

		serde_json::to_vec(value).map_err(|e| CodecError::new(e.to_string()))
	}

	fn decode(&self, _abi: &AbiDocument, _type_name: &str, bytes: &[u8]) -> Result<Value, CodecError> {
		serde_json::from_slice(bytes).map_err(|e| CodecError::new(e.to_string()))
	}
}

#[derive(Default)]
pub struct FakeSubmitter {
	submitted: Mutex<Vec<ActionPayload>>,
}

impl FakeSubmitter {
	pub fn submitted(&self) -> Vec<ActionPayload> {
		self.submitted
			.lock()
			.unwrap_or_else(|e| panic!("poisoned: {e}"))
			.clone()
	}
}

#[async_trait]
impl TransactionSubmitter for FakeSubmitter {
	async fn submit(&self, action: ActionPayload) -> Result<TransactResult, NetworkError> {
		let mut submitted = self.submitted.lock().unwrap_or_else(|e| panic!("poisoned: {e}"));
		submitted.push(action);

		Ok(TransactResult {
			transaction_id: format!("tx{}", submitted.len()),
			processed: json!({ "receipt": { "status": "executed" } }),
		})
	}
}

pub fn client(rows: Arc<FakeRows>, submitter: Arc<FakeSubmitter>) -> ContractClient {
	let abi = AbiDocument::from_json(ABI).unwrap_or_else(|e| panic!("test ABI: {e}"));
	let config = ClientConfig::builder()
		.account(name("eosio.token"))
		.abi(abi)
		.codec(Arc::new(FakeCodec))
		.rows(rows)
		.submitter(submitter)
		.authorization(vec![PermissionLevel::new(name("alice"), name("active"))])
		.build();

	ContractClient::new(config)
}
