use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use serde::Deserialize;
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Map;
use serde_json::Value;
use typed_builder::TypedBuilder;

use crate::abi::AbiDocument;
use crate::error::ClientError;
use crate::error::CodecError;
use crate::error::NetworkError;
use crate::table::RowsPage;
use crate::table::RowsRequest;
use crate::table::Table;
use crate::table::TableIndex;
use crate::types::Name;

/// Fetches a contract's ABI from a node (`get_abi`).
#[async_trait]
pub trait AbiFetcher: Send + Sync {
	async fn get_abi(&self, account: Name) -> Result<AbiDocument, NetworkError>;
}

/// Fetches one page of table rows (`get_table_rows` with `json: true`).
#[async_trait]
pub trait RowFetcher: Send + Sync {
	async fn fetch_rows(&self, request: &RowsRequest) -> Result<RowsPage, NetworkError>;
}

/// Signs and pushes a transaction carrying a single action.
#[async_trait]
pub trait TransactionSubmitter: Send + Sync {
	async fn submit(&self, action: ActionPayload) -> Result<TransactResult, NetworkError>;
}

/// Converts JSON values to and from the binary wire format described by an
/// ABI.
pub trait WireCodec: Send + Sync {
	fn encode(&self, abi: &AbiDocument, type_name: &str, value: &Value) -> Result<Vec<u8>, CodecError>;

	fn decode(&self, abi: &AbiDocument, type_name: &str, bytes: &[u8]) -> Result<Value, CodecError>;
}

/// An `actor@permission` pair authorizing an action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PermissionLevel {
	pub actor: Name,
	pub permission: Name,
}

impl PermissionLevel {
	pub fn new(actor: Name, permission: Name) -> Self {
		Self { actor, permission }
	}
}

impl fmt::Display for PermissionLevel {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{}@{}", self.actor, self.permission)
	}
}

/// A fully encoded action, ready for the transaction submitter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActionPayload {
	pub account: Name,
	pub name: Name,
	pub authorization: Vec<PermissionLevel>,
	pub data: Vec<u8>,
}

/// Whatever the transaction submitter reports back. Passed through untouched.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct TransactResult {
	pub transaction_id: String,
	#[serde(default)]
	pub processed: Value,
}

/// The JSON form of an action's parameters, built one field at a time so a
/// failed conversion names its field.
#[derive(Debug, Clone, PartialEq)]
pub struct ActionData {
	action: &'static str,
	struct_name: &'static str,
	fields: Map<String, Value>,
}

impl ActionData {
	pub fn new(action: &'static str, struct_name: &'static str) -> Self {
		Self {
			action,
			struct_name,
			fields: Map::new(),
		}
	}

	/// Build from an already assembled parameter struct.
	pub fn from_struct<T: Serialize>(
		action: &'static str,
		struct_name: &'static str,
		params: &T,
	) -> Result<Self, ClientError> {
		let fields = match serde_json::to_value(params) {
			Ok(Value::Object(fields)) => fields,
			Ok(other) => {
				return Err(ClientError::TypeCoercion {
					action: action.to_owned(),
					field: struct_name.to_owned(),
					reason: format!("expected a JSON object, found `{other}`"),
				});
			}
			Err(e) => {
				return Err(ClientError::TypeCoercion {
					action: action.to_owned(),
					field: struct_name.to_owned(),
					reason: e.to_string(),
				});
			}
		};

		Ok(Self {
			action,
			struct_name,
			fields,
		})
	}

	pub fn push<T: Serialize + ?Sized>(&mut self, field: &'static str, value: &T) -> Result<(), ClientError> {
		let value = serde_json::to_value(value).map_err(|e| {
			ClientError::TypeCoercion {
				action: self.action.to_owned(),
				field: field.to_owned(),
				reason: e.to_string(),
			}
		})?;
		self.fields.insert(field.to_owned(), value);
		Ok(())
	}

	pub fn action(&self) -> &'static str {
		self.action
	}

	pub fn struct_name(&self) -> &'static str {
		self.struct_name
	}

	pub fn into_value(self) -> Value {
		Value::Object(self.fields)
	}
}

/// Everything a generated contract needs to talk to a chain.
#[derive(TypedBuilder)]
pub struct ClientConfig {
	account: Name,
	abi: AbiDocument,
	codec: Arc<dyn WireCodec>,
	rows: Arc<dyn RowFetcher>,
	submitter: Arc<dyn TransactionSubmitter>,
	#[builder(default)]
	authorization: Vec<PermissionLevel>,
}

struct ClientInner {
	account: Name,
	abi: AbiDocument,
	codec: Arc<dyn WireCodec>,
	rows: Arc<dyn RowFetcher>,
	submitter: Arc<dyn TransactionSubmitter>,
	authorization: Vec<PermissionLevel>,
}

/// The collaborator handles shared by every action and table of one
/// contract. Cheap to clone.
#[derive(Clone)]
pub struct ContractClient {
	inner: Arc<ClientInner>,
}

impl ContractClient {
	pub fn new(config: ClientConfig) -> Self {
		let ClientConfig {
			account,
			abi,
			codec,
			rows,
			submitter,
			authorization,
		} = config;

		Self {
			inner: Arc::new(ClientInner {
				account,
				abi,
				codec,
				rows,
				submitter,
				authorization,
			}),
		}
	}

	pub fn account(&self) -> Name {
		self.inner.account
	}

	pub fn abi(&self) -> &AbiDocument {
		&self.inner.abi
	}

	pub fn authorization(&self) -> &[PermissionLevel] {
		&self.inner.authorization
	}

	pub(crate) fn rows(&self) -> &Arc<dyn RowFetcher> {
		&self.inner.rows
	}

	/// Encode `data` against its struct layout and submit it.
	///
	/// Encoding happens before anything touches the network, so a coercion
	/// failure never results in a submitted transaction.
	pub async fn dispatch(&self, data: ActionData) -> Result<TransactResult, ClientError> {
		let action = data.action();
		let struct_name = data.struct_name();
		let name = action.parse::<Name>().map_err(|_| {
			ClientError::UnknownName {
				kind: "action",
				name: action.to_owned(),
			}
		})?;

		let payload = self
			.inner
			.codec
			.encode(&self.inner.abi, struct_name, &data.into_value())
			.map_err(|CodecError { field, message }| {
				ClientError::TypeCoercion {
					action: action.to_owned(),
					field: field.unwrap_or_else(|| struct_name.to_owned()),
					reason: message,
				}
			})?;

		tracing::debug!(
			account = %self.inner.account,
			action,
			bytes = payload.len(),
			"submitting action"
		);

		let result = self
			.inner
			.submitter
			.submit(ActionPayload {
				account: self.inner.account,
				name,
				authorization: self.inner.authorization.clone(),
				data: payload,
			})
			.await?;

		Ok(result)
	}

	/// An accessor for `table`, scoped to the contract account.
	pub fn table<R: DeserializeOwned, I: TableIndex>(&self, table: &'static str) -> Table<R, I> {
		Table::new(self.clone(), table)
	}
}

impl fmt::Debug for ContractClient {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("ContractClient")
			.field("account", &self.inner.account)
			.field("authorization", &self.inner.authorization)
			.finish_non_exhaustive()
	}
}

/// Fetch `account`'s ABI. Network failures are returned as-is.
pub async fn fetch_abi(fetcher: &dyn AbiFetcher, account: Name) -> Result<AbiDocument, ClientError> {
	tracing::debug!(%account, "fetching ABI");
	Ok(fetcher.get_abi(account).await?)
}
