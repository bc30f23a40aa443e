//! Table accessors: range queries, point lookups and `first(n)` retrieval over
//! a contract table, all returning rows decoded into the generated row
//! struct.

use std::fmt;
use std::marker::PhantomData;

use serde::Deserialize;
use serde::Deserializer;
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::client::ContractClient;
use crate::cursor::TableCursor;
use crate::error::ClientError;
use crate::types::Name;

/// Rows per request when no limit is given.
pub const DEFAULT_PAGE_SIZE: u32 = 10;

/// The ten canonical index slots a table may declare, in order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IndexPosition {
	Primary,
	Secondary,
	Tertiary,
	Fourth,
	Fifth,
	Sixth,
	Seventh,
	Eighth,
	Ninth,
	Tenth,
}

impl IndexPosition {
	pub const ALL: [Self; 10] = [
		Self::Primary,
		Self::Secondary,
		Self::Tertiary,
		Self::Fourth,
		Self::Fifth,
		Self::Sixth,
		Self::Seventh,
		Self::Eighth,
		Self::Ninth,
		Self::Tenth,
	];

	/// The position of the `index`th declared key, counting from zero.
	pub fn from_index(index: usize) -> Option<Self> {
		Self::ALL.get(index).copied()
	}

	pub const fn as_str(self) -> &'static str {
		match self {
			Self::Primary => "primary",
			Self::Secondary => "secondary",
			Self::Tertiary => "tertiary",
			Self::Fourth => "fourth",
			Self::Fifth => "fifth",
			Self::Sixth => "sixth",
			Self::Seventh => "seventh",
			Self::Eighth => "eighth",
			Self::Ninth => "ninth",
			Self::Tenth => "tenth",
		}
	}
}

impl fmt::Display for IndexPosition {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}

/// Implemented by the generated per-table index enums.
pub trait TableIndex: Copy + fmt::Debug + Send + Sync + 'static {
	/// The index `first`, `get` and unbounded queries walk.
	const PRIMARY: Self;

	/// Every index of the table, in position order.
	const ALL: &'static [Self];

	/// Name of the row field this index covers.
	fn field(self) -> &'static str;

	fn position(self) -> IndexPosition;

	/// ABI type of the index key, e.g. `i64` or `name`.
	fn key_type(self) -> &'static str;

	/// Look an index up by the row field it covers.
	fn by_field(field: &str) -> Option<Self> {
		Self::ALL.iter().copied().find(|index| index.field() == field)
	}
}

/// Inclusive bounds over one index. Keys are given in their text form, as
/// the node's `get_table_rows` expects them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Range<I> {
	pub index: I,
	pub lower: Option<String>,
	pub upper: Option<String>,
}

impl<I: TableIndex> Range<I> {
	/// An unbounded range over `index`.
	pub fn new(index: I) -> Self {
		Self {
			index,
			lower: None,
			upper: None,
		}
	}

	/// Rows whose key is `from` or greater.
	#[must_use]
	pub fn lower_bound(mut self, from: impl fmt::Display) -> Self {
		self.lower = Some(from.to_string());
		self
	}

	/// Rows whose key is `to` or less.
	#[must_use]
	pub fn upper_bound(mut self, to: impl fmt::Display) -> Self {
		self.upper = Some(to.to_string());
		self
	}

	pub fn between(index: I, from: impl fmt::Display, to: impl fmt::Display) -> Self {
		Self::new(index).lower_bound(from).upper_bound(to)
	}

	/// The single key `key`.
	pub fn exact(index: I, key: impl fmt::Display) -> Self {
		let key = key.to_string();
		Self {
			index,
			lower: Some(key.clone()),
			upper: Some(key),
		}
	}
}

/// Paging options for a query.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QueryOptions {
	/// Rows per request.
	pub limit: u32,
	/// Total rows the cursor yields before reporting the end.
	pub max_rows: Option<u32>,
	/// Walk from the upper bound down.
	pub reverse: bool,
}

impl Default for QueryOptions {
	fn default() -> Self {
		Self {
			limit: DEFAULT_PAGE_SIZE,
			max_rows: None,
			reverse: false,
		}
	}
}

impl QueryOptions {
	#[must_use]
	pub fn limit(mut self, limit: u32) -> Self {
		self.limit = limit;
		self
	}

	#[must_use]
	pub fn max_rows(mut self, max_rows: u32) -> Self {
		self.max_rows = Some(max_rows);
		self
	}

	#[must_use]
	pub fn reverse(mut self) -> Self {
		self.reverse = true;
		self
	}
}

/// One `get_table_rows` request, as handed to the [`RowFetcher`].
///
/// [`RowFetcher`]: crate::client::RowFetcher
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RowsRequest {
	pub code: Name,
	pub table: String,
	pub scope: String,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub lower_bound: Option<String>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub upper_bound: Option<String>,
	pub limit: u32,
	pub index_position: IndexPosition,
	pub key_type: String,
	pub reverse: bool,
}

/// One page of rows in their JSON form.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct RowsPage {
	#[serde(default)]
	pub rows: Vec<Value>,
	#[serde(default)]
	pub more: bool,
	/// Where the following page starts. Nodes send `""` when there is none.
	#[serde(default, deserialize_with = "non_empty_key")]
	pub next_key: Option<String>,
}

fn non_empty_key<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<String>, D::Error> {
	let key = Option::<String>::deserialize(deserializer)?;
	Ok(key.filter(|key| !key.is_empty()))
}

/// Accessor for one contract table, returning rows of type `R` and queried
/// through the index enum `I`.
pub struct Table<R, I> {
	client: ContractClient,
	table: &'static str,
	scope: String,
	_marker: PhantomData<fn() -> (R, I)>,
}

impl<R, I> Table<R, I>
where
	R: DeserializeOwned,
	I: TableIndex,
{
	/// A table accessor scoped to the contract account.
	pub fn new(client: ContractClient, table: &'static str) -> Self {
		let scope = client.account().to_string();
		Self {
			client,
			table,
			scope,
			_marker: PhantomData,
		}
	}

	/// Read a different scope of the same table.
	#[must_use]
	pub fn scope(mut self, scope: impl fmt::Display) -> Self {
		self.scope = scope.to_string();
		self
	}

	pub fn name(&self) -> &'static str {
		self.table
	}

	pub fn current_scope(&self) -> &str {
		&self.scope
	}

	/// Rows whose `range.index` key lies within the range, lazily paged.
	#[doc(alias = "where")]
	pub fn query(&self, range: Range<I>, options: QueryOptions) -> TableCursor<R> {
		let index = range.index;
		let request = RowsRequest {
			code: self.client.account(),
			table: self.table.to_owned(),
			scope: self.scope.clone(),
			lower_bound: range.lower,
			upper_bound: range.upper,
			limit: options.limit,
			index_position: index.position(),
			key_type: index.key_type().to_owned(),
			reverse: options.reverse,
		};

		TableCursor::new(self.client.clone(), request, options.max_rows)
	}

	/// The row whose `index` key equals `key`, if there is one.
	pub async fn find(&self, index: I, key: impl fmt::Display) -> Result<Option<R>, ClientError> {
		let options = QueryOptions::default().limit(1).max_rows(1);
		let mut cursor = self.query(Range::exact(index, key), options);
		Ok(cursor.next().await?.into_iter().next())
	}

	/// Like [`find`](Self::find), naming the index by its row field.
	pub async fn find_by(&self, field: &str, key: impl fmt::Display) -> Result<Option<R>, ClientError> {
		let index = I::by_field(field).ok_or_else(|| {
			ClientError::MissingIndex {
				table: self.table.to_owned(),
				field: field.to_owned(),
			}
		})?;
		self.find(index, key).await
	}

	/// The row with primary key `key`, if there is one.
	pub async fn get(&self, key: impl fmt::Display) -> Result<Option<R>, ClientError> {
		self.find(I::PRIMARY, key).await
	}

	/// At most `limit` rows in primary index order.
	pub fn first(&self, limit: u32) -> TableCursor<R> {
		let options = QueryOptions::default().limit(limit).max_rows(limit);
		self.query(Range::new(I::PRIMARY), options)
	}
}

impl<R, I> Clone for Table<R, I> {
	fn clone(&self) -> Self {
		Self {
			client: self.client.clone(),
			table: self.table,
			scope: self.scope.clone(),
			_marker: PhantomData,
		}
	}
}

impl<R, I> fmt::Debug for Table<R, I> {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("Table")
			.field("account", &self.client.account())
			.field("table", &self.table)
			.field("scope", &self.scope)
			.finish()
	}
}
