//! Serde support for generated variant enums.
//!
//! A variant travels as a two element array, `["<alternative type>", value]`.
//! Generated `Serialize`/`Deserialize` impls call into these helpers so the
//! emitted code stays small.

use serde::Deserialize;
use serde::Deserializer;
use serde::Serialize;
use serde::Serializer;
use serde::de;
use serde::de::DeserializeOwned;
use serde::ser::SerializeTuple;
use serde_json::Value;

/// Write `value` tagged with its ABI alternative type.
pub fn serialize<S, T>(tag: &str, value: &T, serializer: S) -> Result<S::Ok, S::Error>
where
	S: Serializer,
	T: Serialize + ?Sized,
{
	let mut pair = serializer.serialize_tuple(2)?;
	pair.serialize_element(tag)?;
	pair.serialize_element(value)?;
	pair.end()
}

/// Read the `[tag, value]` pair, leaving the value undecoded until the tag
/// has been matched.
pub fn deserialize<'de, D>(deserializer: D) -> Result<(String, Value), D::Error>
where
	D: Deserializer<'de>,
{
	<(String, Value)>::deserialize(deserializer)
}

/// Decode the value of a matched alternative.
pub fn alternative<T, E>(value: Value) -> Result<T, E>
where
	T: DeserializeOwned,
	E: de::Error,
{
	serde_json::from_value(value).map_err(E::custom)
}

/// The error for a tag that names none of `expected`.
pub fn unknown<E: de::Error>(tag: &str, expected: &'static [&'static str]) -> E {
	E::unknown_variant(tag, expected)
}

#[cfg(test)]
mod tests {
	use super::*;

	#[derive(Debug, Clone, PartialEq)]
	enum Reward {
		Uint64(u64),
		String(String),
	}

	const ALTERNATIVES: &[&str] = &["uint64", "string"];

	impl Serialize for Reward {
		fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
			match self {
				Self::Uint64(value) => serialize("uint64", value, serializer),
				Self::String(value) => serialize("string", value, serializer),
			}
		}
	}

	impl<'de> Deserialize<'de> for Reward {
		fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
			let (tag, value) = deserialize(deserializer)?;
			match tag.as_str() {
				"uint64" => alternative(value).map(Self::Uint64),
				"string" => alternative(value).map(Self::String),
				_ => Err(unknown(&tag, ALTERNATIVES)),
			}
		}
	}

	#[test]
	fn serializes_as_tagged_pair() {
		let json = serde_json::to_string(&Reward::Uint64(7)).unwrap_or_else(|e| panic!("{e}"));
		assert_eq!(json, r#"["uint64",7]"#);

		let json = serde_json::to_string(&Reward::String("hi".into())).unwrap_or_else(|e| panic!("{e}"));
		assert_eq!(json, r#"["string","hi"]"#);
	}

	#[test]
	fn deserializes_by_tag() {
		let reward: Reward = serde_json::from_str(r#"["string","hi"]"#).unwrap_or_else(|e| panic!("{e}"));
		assert_eq!(reward, Reward::String("hi".into()));
	}

	#[test]
	fn rejects_unknown_tags_and_mismatched_values() {
		let err = serde_json::from_str::<Reward>(r#"["bool",true]"#)
			.err()
			.unwrap_or_else(|| panic!("unknown tag accepted"));
		assert!(err.to_string().contains("unknown variant `bool`"), "{err}");

		assert!(serde_json::from_str::<Reward>(r#"["uint64","seven"]"#).is_err());
		assert!(serde_json::from_str::<Reward>(r#"{"uint64":7}"#).is_err());
	}
}
