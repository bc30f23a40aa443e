use thiserror::Error;

/// Errors produced while parsing the text form of an Antelope type.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ParseError {
	#[error("invalid name `{value}`: {reason}")]
	InvalidName { value: String, reason: String },

	#[error("invalid symbol code `{0}`: expected 1 to 7 upper-case letters")]
	InvalidSymbolCode(String),

	#[error("invalid symbol `{0}`: expected `<precision>,<CODE>` with precision at most 18")]
	InvalidSymbol(String),

	#[error("invalid asset `{value}`: {reason}")]
	InvalidAsset { value: String, reason: String },

	#[error("invalid hex: {0}")]
	InvalidHex(#[from] hex::FromHexError),
}

/// Errors produced while reading or writing an ABI document.
#[derive(Debug, Error)]
pub enum AbiError {
	#[error("failed to parse ABI JSON: {0}")]
	Json(#[from] serde_json::Error),

	#[error("failed to decode ABI hex: {0}")]
	Hex(#[from] hex::FromHexError),

	#[error("unexpected end of ABI data while reading {context}")]
	UnexpectedEof { context: &'static str },

	#[error("ABI string in {context} is not valid UTF-8")]
	InvalidUtf8 { context: &'static str },

	#[error("varuint32 in {context} does not fit in 32 bits")]
	VarintOverflow { context: &'static str },

	#[error("invalid name in {context}: {source}")]
	Name {
		context: &'static str,
		source: ParseError,
	},

	#[error("{count} unexpected trailing bytes after ABI data")]
	TrailingBytes { count: usize },
}

/// A failure reported by one of the network collaborators. It is passed to
/// the caller unchanged; nothing in this crate retries.
#[derive(Debug, Error)]
#[error("{operation} failed: {source}")]
pub struct NetworkError {
	pub operation: String,
	#[source]
	pub source: Box<dyn std::error::Error + Send + Sync>,
}

impl NetworkError {
	pub fn new(
		operation: impl Into<String>,
		source: impl Into<Box<dyn std::error::Error + Send + Sync>>,
	) -> Self {
		Self {
			operation: operation.into(),
			source: source.into(),
		}
	}
}

/// A failure reported by the wire codec. `field` names the offending struct
/// field when the codec can tell which one it was.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct CodecError {
	pub field: Option<String>,
	pub message: String,
}

impl CodecError {
	pub fn new(message: impl Into<String>) -> Self {
		Self {
			field: None,
			message: message.into(),
		}
	}

	#[must_use]
	pub fn with_field(mut self, field: impl Into<String>) -> Self {
		self.field = Some(field.into());
		self
	}
}

/// Errors surfaced by generated contract bindings at run time.
#[derive(Debug, Error)]
pub enum ClientError {
	#[error("cannot encode field `{field}` of action `{action}`: {reason}")]
	TypeCoercion {
		action: String,
		field: String,
		reason: String,
	},

	#[error("failed to decode a row of table `{table}`: {source}")]
	Decode {
		table: String,
		source: serde_json::Error,
	},

	#[error("table `{table}` has no index on `{field}`")]
	MissingIndex { table: String, field: String },

	#[error("unknown {kind} `{name}`")]
	UnknownName { kind: &'static str, name: String },

	#[error(transparent)]
	Network(#[from] NetworkError),

	#[error(transparent)]
	Abi(#[from] AbiError),
}
