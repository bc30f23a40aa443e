//! In-memory stand-ins for the collaborators generated contracts talk to.

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
use abigen_runtime::TransactResult;
use abigen_runtime::TransactionSubmitter;
use abigen_runtime::WireCodec;
use abigen_runtime::types::Asset;
use abigen_runtime::types::Name;
use async_trait::async_trait;
use serde_json::Value;
use serde_json::json;

pub fn name(value: &str) -> Name {
	value.parse().unwrap_or_else(|e| panic!("invalid name `{value}`: {e}"))
}

pub fn asset(value: &str) -> Asset {
	value.parse().unwrap_or_else(|e| panic!("invalid asset `{value}`: {e}"))
}

// ---------------------------------------------------------------------------
// Table rows
// ---------------------------------------------------------------------------

/// An index key: numeric keys compare as numbers, everything else as text.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
enum Key {
	Number(u64),
	Text(String),
}

impl Key {
	fn of(value: &Value) -> Self {
		match value {
			Value::Number(number) => {
				Self::Number(number.as_u64().unwrap_or_else(|| panic!("non u64 key {number}")))
			}
			Value::String(text) => Self::Text(text.clone()),
			other => panic!("unsupported key {other}"),
		}
	}

	/// Parse a request bound the same way as `self`.
	fn bound(&self, text: &str) -> Self {
		match self {
			Self::Number(_) => Self::Number(text.parse().unwrap_or_else(|e| panic!("bad key `{text}`: {e}"))),
			Self::Text(_) => Self::Text(text.to_owned()),
		}
	}

	fn text(&self) -> String {
		match self {
			Self::Number(number) => number.to_string(),
			Self::Text(text) => text.clone(),
		}
	}
}

/// Serves JSON rows, indexed at each position by the row field named in
/// `keys`, and never more than `cap` rows per request, the way a node caps
/// `get_table_rows`.
pub struct FakeRows {
	rows: Vec<Value>,
	keys: Vec<&'static str>,
	cap: u32,
	fail_next: AtomicBool,
	requests: Mutex<Vec<RowsRequest>>,
}

impl FakeRows {
	pub fn new(rows: Vec<Value>, keys: &[&'static str]) -> Self {
		Self {
			rows,
			keys: keys.to_vec(),
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

	pub fn last_request(&self) -> RowsRequest {
		self.requests()
			.pop()
			.unwrap_or_else(|| panic!("no rows were requested"))
	}
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

		let position = IndexPosition::ALL
			.iter()
			.position(|position| *position == request.index_position)
			.unwrap_or_else(|| panic!("unknown position {}", request.index_position));
		let field = self
			.keys
			.get(position)
			.unwrap_or_else(|| panic!("no {} index on `{}`", request.index_position, request.table));

		let mut matching: Vec<(Key, &Value)> = self
			.rows
			.iter()
			.map(|row| (Key::of(&row[*field]), row))
			.filter(|(key, _)| {
				request.lower_bound.as_deref().is_none_or(|lower| *key >= key.bound(lower))
					&& request.upper_bound.as_deref().is_none_or(|upper| *key <= key.bound(upper))
			})
			.collect();
		matching.sort_by(|a, b| a.0.cmp(&b.0));
		if request.reverse {
			matching.reverse();
		}

		let take = request.limit.min(self.cap) as usize;
		let more = matching.len() > take;
		let next_key = matching.get(take).map(|(key, _)| key.text());
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

/// Checks every struct field is present, every `name` parses and no `asset`
/// is negative, then "encodes" to JSON bytes.
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
			match field.type_name.as_str() {
				"name" => {
					let valid = field_value.as_str().is_some_and(|text| text.parse::<Name>().is_ok());
					if !valid {
						return Err(CodecError::new(format!("`{field_value}` is not a name")).with_field(&field.name));
					}
				}
				"asset" => {
					let negative = field_value.as_str().is_some_and(|text| text.starts_with('-'));
					if negative {
						return Err(CodecError::new("negative quantity").with_field(&field.name));
					}
				}
				_ => {}
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

	/// The JSON data of the `index`th submitted action.
	pub fn data(&self, index: usize) -> Value {
		let submitted = self.submitted();
		let payload = submitted
			.get(index)
			.unwrap_or_else(|| panic!("only {} actions submitted", submitted.len()));
		serde_json::from_slice(&payload.data).unwrap_or_else(|e| panic!("{e}"))
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

pub fn client(account: Name, abi: AbiDocument, rows: Arc<FakeRows>, submitter: Arc<FakeSubmitter>) -> ContractClient {
	let config = ClientConfig::builder()
		.account(account)
		.abi(abi)
		.codec(Arc::new(FakeCodec))
		.rows(rows)
		.submitter(submitter)
		.authorization(vec![PermissionLevel::new(name("alice"), name("active"))])
		.build();

	ContractClient::new(config)
}
