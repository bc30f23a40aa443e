//! Name derivation: casing rules for ABI names and the Rust identifiers built
//! from them.

use heck::ToSnakeCase;
use heck::ToUpperCamelCase;
use proc_macro2::Ident;
use proc_macro2::Span;

/// Strict and reserved keywords of the 2024 edition.
const KEYWORDS: &[&str] = &[
	"abstract", "as", "async", "await", "become", "box", "break", "const", "continue", "do", "dyn",
	"else", "enum", "extern", "false", "final", "fn", "for", "gen", "if", "impl", "in", "let", "loop",
	"macro", "match", "mod", "move", "mut", "override", "priv", "pub", "ref", "return", "static",
	"struct", "trait", "true", "try", "type", "typeof", "unsafe", "unsized", "use", "virtual", "where",
	"while", "yield",
];

/// Keywords that cannot be raw identifiers.
const PATH_KEYWORDS: &[&str] = &["crate", "self", "Self", "super", "_"];

/// Type names generated code relies on from the prelude.
const PRELUDE_TYPES: &[&str] = &[
	"Box", "Clone", "Copy", "Default", "Err", "None", "Ok", "Option", "PartialEq", "Result", "Self",
	"Send", "Sized", "Some", "String", "Sync", "ToString", "Vec",
];

/// `user_row` → `UserRow`. Splits on `_`, `.` and spaces, upper-cases the
/// first letter of each segment and lower-cases the rest.
pub fn pascal_case(value: &str) -> String {
	value
		.split(['_', '.', ' '])
		.filter(|segment| !segment.is_empty())
		.map(|segment| capitalize(&segment.to_lowercase()))
		.collect()
}

/// `eosio.token` → `_EosioToken`. The leading underscore keeps the module
/// apart from a struct with the same PascalCase name.
pub fn contract_namespace(account: &str) -> String {
	let body: String = account.split('.').map(pascal_case).collect();
	format!("_{body}")
}

/// Upper-case the first character only.
pub fn capitalize(value: &str) -> String {
	let mut chars = value.chars();
	match chars.next() {
		Some(first) => first.to_uppercase().chain(chars).collect(),
		None => String::new(),
	}
}

/// Endings that take `-es` in the plural.
const ES_PLURALS: &[&str] = &["ches", "shes", "sses", "xes", "zzes"];

/// A suffix-rule singular: `bodies` → `body`, `matches` → `match`,
/// `buses` → `bus`, `houses` → `house`, `cats` → `cat`. Anything else is
/// returned unchanged.
pub fn singularize(value: &str) -> String {
	if let Some(stem) = value.strip_suffix("ies") {
		return format!("{stem}y");
	}

	if ES_PLURALS.iter().any(|ending| value.ends_with(ending)) || is_us_plural(value) {
		return value[..value.len() - 2].to_string();
	}

	if value.ends_with('s') && !value.ends_with("ss") {
		return value[..value.len() - 1].to_string();
	}

	value.to_string()
}

/// `buses`, `statuses`: a consonant before `uses`. A vowel there means the
/// singular ends in `-use` (`houses`, `causes`).
fn is_us_plural(value: &str) -> bool {
	value
		.strip_suffix("uses")
		.and_then(|stem| stem.chars().last())
		.is_some_and(|c| !matches!(c.to_ascii_lowercase(), 'a' | 'e' | 'i' | 'o' | 'u'))
}

/// Replace anything that cannot appear in an identifier with `_`, and
/// prefix a leading digit.
fn sanitize(value: &str) -> String {
	let mut out: String = value
		.chars()
		.map(|c| if c.is_ascii_alphanumeric() || c == '_' { c } else { '_' })
		.collect();

	if out.is_empty() || out.starts_with(|c: char| c.is_ascii_digit()) {
		out.insert(0, '_');
	}

	out
}

/// A value-namespace identifier: keywords become raw identifiers and
/// path keywords get a trailing underscore.
fn value_ident(name: String) -> Ident {
	if PATH_KEYWORDS.contains(&name.as_str()) {
		Ident::new(&format!("{name}_"), Span::call_site())
	} else if KEYWORDS.contains(&name.as_str()) {
		Ident::new_raw(&name, Span::call_site())
	} else {
		Ident::new(&name, Span::call_site())
	}
}

/// The Rust name of a struct field or parameter: the lower-cased ABI name.
pub fn field_ident(abi_name: &str) -> Ident {
	value_ident(sanitize(&abi_name.to_lowercase()))
}

/// The Rust name of an action or table method.
pub fn method_ident(abi_name: &str) -> Ident {
	value_ident(sanitize(&abi_name.replace('.', "_").to_snake_case()))
}

/// The Rust name of a struct, variant or alias declaration.
pub fn type_name(abi_name: &str) -> String {
	let name = sanitize(&pascal_case(abi_name));
	if name == "_" { "_Type".to_string() } else { name }
}

pub fn type_ident(abi_name: &str) -> Ident {
	Ident::new(&type_name(abi_name), Span::call_site())
}

/// Whether `ident` would shadow a prelude type inside generated code.
pub fn is_reserved_type(ident: &str) -> bool {
	PRELUDE_TYPES.contains(&ident)
}

/// The enum variant for an action, table or variant alternative:
/// `uint64[]` → `Uint64Array`, `asset?` → `AssetOptional`.
pub fn variant_name(raw: &str) -> String {
	let (base, suffix) = if let Some(base) = raw.strip_suffix('$') {
		(base, "Ext")
	} else if let Some(base) = raw.strip_suffix('?') {
		(base, "Optional")
	} else if let Some(base) = raw.strip_suffix("[]") {
		(base, "Array")
	} else {
		(raw, "")
	};

	let base = if base != raw && (base.ends_with(['$', '?']) || base.ends_with("[]")) {
		variant_name(base)
	} else {
		sanitize(&base.replace('.', "_").to_upper_camel_case())
	};

	format!("{base}{suffix}")
}

/// Pick a name not yet in `taken`, appending `2`, `3`, … as needed.
pub fn unique(name: String, taken: &[String]) -> String {
	if !taken.contains(&name) {
		return name;
	}

	let mut n = 2;
	loop {
		let candidate = format!("{name}{n}");
		if !taken.contains(&candidate) {
			return candidate;
		}
		n += 1;
	}
}
