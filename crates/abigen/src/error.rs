use thiserror::Error;

pub type Result<T> = std::result::Result<T, GenerateError>;

/// Why bindings could not be generated for a contract. Every variant is
/// fatal for the whole contract; no partial output is produced.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GenerateError {
	#[error("unknown type `{type_name}` in {context}")]
	UnknownType { type_name: String, context: String },

	#[error("action `{action}` refers to struct `{struct_name}`, which is not declared")]
	MissingActionStruct { action: String, struct_name: String },

	#[error("table `{table}` refers to struct `{struct_name}`, which is not declared")]
	MissingTableStruct { table: String, struct_name: String },

	#[error("cyclic type dependency: {}", .path.join(" -> "))]
	CyclicDependency { path: Vec<String> },

	#[error("struct `{structure}` declares field `{field}` more than once, counting its base")]
	DuplicateField { structure: String, field: String },

	#[error("variant `{name}` has no alternatives")]
	EmptyVariant { name: String },

	#[error("table `{table}` declares {count} indices; at most 10 are supported")]
	TooManyIndices { table: String, count: usize },

	#[error("`{first}` and `{second}` both map to the Rust name `{ident}`")]
	DuplicateTypeName {
		ident: String,
		first: String,
		second: String,
	},

	#[error("`{name}` maps to `{ident}`, which would shadow a Rust prelude type")]
	ReservedTypeName { name: String, ident: String },

	#[error("`{account}` is not a valid account name: {reason}")]
	InvalidAccount { account: String, reason: String },

	#[error("cannot embed the binary ABI of `{account}`: {message}")]
	AbiEncoding { account: String, message: String },

	#[error("`{path}` is not a usable runtime crate path: {message}")]
	InvalidRuntimePath { path: String, message: String },

	#[error("generated code for `{account}` is not valid Rust: {message}")]
	Render { account: String, message: String },
}
