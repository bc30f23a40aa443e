use std::fmt;
use std::marker::PhantomData;

use serde::de::DeserializeOwned;

use crate::client::ContractClient;
use crate::error::ClientError;
use crate::table::RowsRequest;

/// A lazy, paged reader over the rows of one table query.
///
/// Each [`next`](Self::next) issues at most one fetch. Calls must not overlap;
/// await one before starting the next. State only changes once a page has
/// been fetched and every row in it decoded, so a failed call leaves the
/// cursor as it was.
pub struct TableCursor<R> {
	client: ContractClient,
	request: RowsRequest,
	max_rows: Option<u32>,
	rows_count: u32,
	next_key: Option<String>,
	end_reached: bool,
	_marker: PhantomData<fn() -> R>,
}

impl<R: DeserializeOwned> TableCursor<R> {
	pub(crate) fn new(client: ContractClient, request: RowsRequest, max_rows: Option<u32>) -> Self {
		Self {
			client,
			request,
			max_rows,
			rows_count: 0,
			next_key: None,
			end_reached: false,
			_marker: PhantomData,
		}
	}

	/// Fetch the next page. Returns an empty page, without fetching, once the
	/// end has been reached.
	pub async fn next(&mut self) -> Result<Vec<R>, ClientError> {
		if self.end_reached {
			return Ok(Vec::new());
		}

		let remaining = self.max_rows.map(|max| max.saturating_sub(self.rows_count));
		if remaining == Some(0) {
			self.end_reached = true;
			return Ok(Vec::new());
		}

		let limit = remaining.map_or(self.request.limit, |remaining| self.request.limit.min(remaining));
		let request = self.page_request(limit);
		let page = self.client.rows().fetch_rows(&request).await?;

		let mut rows = page
			.rows
			.into_iter()
			.map(serde_json::from_value)
			.collect::<Result<Vec<R>, _>>()
			.map_err(|source| {
				ClientError::Decode {
					table: request.table.clone(),
					source,
				}
			})?;
		rows.truncate(limit as usize);

		tracing::debug!(
			table = %request.table,
			scope = %request.scope,
			index = %request.index_position,
			limit,
			rows = rows.len(),
			more = page.more,
			"fetched table rows"
		);

		// `rows.len()` is bounded by `limit`, a u32.
		self.rows_count = self.rows_count.saturating_add(u32::try_from(rows.len()).unwrap_or(u32::MAX));
		self.next_key = page.next_key;
		let max_reached = self.max_rows.is_some_and(|max| self.rows_count >= max);
		self.end_reached = !page.more || self.next_key.is_none() || max_reached || rows.is_empty();

		Ok(rows)
	}

	/// Drain the cursor, returning every remaining row.
	pub async fn all(&mut self) -> Result<Vec<R>, ClientError> {
		let mut rows = Vec::new();
		while !self.end_reached {
			rows.extend(self.next().await?);
		}
		Ok(rows)
	}

	/// Rows returned so far.
	pub fn rows_count(&self) -> u32 {
		self.rows_count
	}

	pub fn end_reached(&self) -> bool {
		self.end_reached
	}

	/// Start over from the original bounds.
	pub fn reset(&mut self) {
		self.rows_count = 0;
		self.next_key = None;
		self.end_reached = false;
	}

	fn page_request(&self, limit: u32) -> RowsRequest {
		let mut request = self.request.clone();
		request.limit = limit;
		if let Some(key) = &self.next_key {
			if request.reverse {
				request.upper_bound = Some(key.clone());
			} else {
				request.lower_bound = Some(key.clone());
			}
		}
		request
	}
}

impl<R> fmt::Debug for TableCursor<R> {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("TableCursor")
			.field("request", &self.request)
			.field("max_rows", &self.max_rows)
			.field("rows_count", &self.rows_count)
			.field("next_key", &self.next_key)
			.field("end_reached", &self.end_reached)
			.finish_non_exhaustive()
	}
}
