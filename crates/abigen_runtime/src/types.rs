//! Rust representations of the Antelope built-in ABI types.
//!
//! Integers, floats, `bool` and `string` map onto Rust primitives directly, so
//! only the types without a native counterpart live here. Every type that has a
//! canonical text form serializes to JSON as that text.

use std::fmt;
use std::str::FromStr;

use serde::Deserialize;
use serde::Deserializer;
use serde::Serialize;
use serde::Serializer;
use serde::de;

use crate::error::ParseError;

const NAME_CHARMAP: &[u8; 32] = b".12345abcdefghijklmnopqrstuvwxyz";
const NAME_MAX_LEN: usize = 13;
const SYMBOL_CODE_MAX_LEN: usize = 7;
const SYMBOL_MAX_PRECISION: u8 = 18;

macro_rules! impl_text_serde {
	($ty:ty) => {
		impl Serialize for $ty {
			fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
				serializer.collect_str(self)
			}
		}

		impl<'de> Deserialize<'de> for $ty {
			fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
				let text = String::deserialize(deserializer)?;
				text.parse().map_err(de::Error::custom)
			}
		}
	};
}

macro_rules! opaque_text {
	($(#[$meta:meta])* $name:ident) => {
		$(#[$meta])*
		#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
		#[serde(transparent)]
		pub struct $name(pub String);

		impl $name {
			pub fn new(value: impl Into<String>) -> Self {
				Self(value.into())
			}

			pub fn as_str(&self) -> &str {
				&self.0
			}
		}

		impl fmt::Display for $name {
			fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
				f.write_str(&self.0)
			}
		}

		impl From<&str> for $name {
			fn from(value: &str) -> Self {
				Self(value.to_owned())
			}
		}

		impl From<String> for $name {
			fn from(value: String) -> Self {
				Self(value)
			}
		}
	};
}

/// An Antelope account, action, table or permission name packed into 64 bits.
///
/// Valid names are at most 13 characters from `.12345a-z`; the 13th character
/// is restricted to `.12345a-j`. Names with trailing dots are rejected since
/// they do not survive a round trip through the packed form.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct Name(u64);

impl Name {
	pub const fn from_u64(value: u64) -> Self {
		Self(value)
	}

	pub const fn as_u64(self) -> u64 {
		self.0
	}

	pub fn is_empty(self) -> bool {
		self.0 == 0
	}
}

fn name_char_value(c: u8) -> Option<u64> {
	match c {
		b'.' => Some(0),
		b'1'..=b'5' => Some(u64::from(c - b'1') + 1),
		b'a'..=b'z' => Some(u64::from(c - b'a') + 6),
		_ => None,
	}
}

impl FromStr for Name {
	type Err = ParseError;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		let invalid = |reason: &str| {
			ParseError::InvalidName {
				value: s.to_owned(),
				reason: reason.to_owned(),
			}
		};

		if s.len() > NAME_MAX_LEN {
			return Err(invalid("longer than 13 characters"));
		}

		let mut value = 0u64;
		for (i, c) in s.bytes().enumerate() {
			let symbol = name_char_value(c).ok_or_else(|| invalid("contains a character outside `.12345a-z`"))?;
			if i < NAME_MAX_LEN - 1 {
				value |= (symbol & 0x1f) << (64 - 5 * (i + 1));
			} else {
				if symbol > 0x0f {
					return Err(invalid("13th character must be one of `.12345a-j`"));
				}
				value |= symbol;
			}
		}

		let name = Self(value);
		if name.to_string() != s {
			return Err(invalid("trailing dots are not allowed"));
		}

		Ok(name)
	}
}

impl TryFrom<&str> for Name {
	type Error = ParseError;

	fn try_from(value: &str) -> Result<Self, Self::Error> {
		value.parse()
	}
}

impl From<u64> for Name {
	fn from(value: u64) -> Self {
		Self(value)
	}
}

impl fmt::Display for Name {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		let mut out = [b'.'; NAME_MAX_LEN];
		let mut tmp = self.0;
		for i in 0..NAME_MAX_LEN {
			let (mask, shift) = if i == 0 { (0x0f, 4) } else { (0x1f, 5) };
			out[NAME_MAX_LEN - 1 - i] = NAME_CHARMAP[(tmp & mask) as usize];
			tmp >>= shift;
		}

		let len = out.iter().rposition(|&c| c != b'.').map_or(0, |pos| pos + 1);
		// The charmap is ASCII so every prefix is valid UTF-8.
		f.write_str(std::str::from_utf8(&out[..len]).map_err(|_| fmt::Error)?)
	}
}

impl fmt::Debug for Name {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_tuple("Name").field(&self.to_string()).finish()
	}
}

impl_text_serde!(Name);

/// The ticker part of a [`Symbol`], `EOS` in `4,EOS`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SymbolCode(String);

impl SymbolCode {
	pub fn as_str(&self) -> &str {
		&self.0
	}
}

impl FromStr for SymbolCode {
	type Err = ParseError;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		if s.is_empty() || s.len() > SYMBOL_CODE_MAX_LEN || !s.bytes().all(|c| c.is_ascii_uppercase()) {
			return Err(ParseError::InvalidSymbolCode(s.to_owned()));
		}
		Ok(Self(s.to_owned()))
	}
}

impl fmt::Display for SymbolCode {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(&self.0)
	}
}

impl_text_serde!(SymbolCode);

/// A currency symbol together with its decimal precision, written `4,EOS`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Symbol {
	precision: u8,
	code: SymbolCode,
}

impl Symbol {
	pub fn new(precision: u8, code: SymbolCode) -> Result<Self, ParseError> {
		if precision > SYMBOL_MAX_PRECISION {
			return Err(ParseError::InvalidSymbol(format!("{precision},{code}")));
		}
		Ok(Self { precision, code })
	}

	pub fn precision(&self) -> u8 {
		self.precision
	}

	pub fn code(&self) -> &SymbolCode {
		&self.code
	}
}

impl FromStr for Symbol {
	type Err = ParseError;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		let invalid = || ParseError::InvalidSymbol(s.to_owned());
		let (precision, code) = s.split_once(',').ok_or_else(invalid)?;
		let precision = precision.parse::<u8>().map_err(|_| invalid())?;
		let code = code.parse::<SymbolCode>().map_err(|_| invalid())?;
		Self::new(precision, code)
	}
}

impl fmt::Display for Symbol {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{},{}", self.precision, self.code)
	}
}

impl_text_serde!(Symbol);

/// A token quantity: an integer amount scaled by the symbol's precision,
/// written `1.0000 EOS`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Asset {
	amount: i64,
	symbol: Symbol,
}

impl Asset {
	pub fn new(amount: i64, symbol: Symbol) -> Self {
		Self { amount, symbol }
	}

	pub fn amount(&self) -> i64 {
		self.amount
	}

	pub fn symbol(&self) -> &Symbol {
		&self.symbol
	}
}

impl FromStr for Asset {
	type Err = ParseError;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		let invalid = |reason: &str| {
			ParseError::InvalidAsset {
				value: s.to_owned(),
				reason: reason.to_owned(),
			}
		};

		let (amount, code) = s
			.trim()
			.split_once(' ')
			.ok_or_else(|| invalid("expected `<amount> <symbol>`"))?;
		let code = code
			.trim()
			.parse::<SymbolCode>()
			.map_err(|_| invalid("invalid symbol code"))?;

		let (negative, digits) = match amount.strip_prefix('-') {
			Some(rest) => (true, rest),
			None => (false, amount),
		};
		let (whole, fraction) = digits.split_once('.').unwrap_or((digits, ""));
		if whole.is_empty() || !whole.bytes().chain(fraction.bytes()).all(|c| c.is_ascii_digit()) {
			return Err(invalid("amount is not a decimal number"));
		}
		if digits.contains('.') && fraction.is_empty() {
			return Err(invalid("amount has a trailing decimal point"));
		}

		let precision = u8::try_from(fraction.len()).map_err(|_| invalid("precision is too large"))?;
		let symbol = Symbol::new(precision, code).map_err(|_| invalid("precision is too large"))?;
		let magnitude = format!("{whole}{fraction}")
			.parse::<i128>()
			.map_err(|_| invalid("amount is out of range"))?;
		let signed = if negative { -magnitude } else { magnitude };
		let amount = i64::try_from(signed).map_err(|_| invalid("amount is out of range"))?;

		Ok(Self { amount, symbol })
	}
}

impl fmt::Display for Asset {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		let precision = u32::from(self.symbol.precision);
		let magnitude = i128::from(self.amount).unsigned_abs();
		let sign = if self.amount < 0 { "-" } else { "" };

		if precision == 0 {
			return write!(f, "{sign}{magnitude} {}", self.symbol.code);
		}

		let scale = 10u128.pow(precision);
		write!(
			f,
			"{sign}{}.{:0width$} {}",
			magnitude / scale,
			magnitude % scale,
			self.symbol.code,
			width = precision as usize,
		)
	}
}

impl_text_serde!(Asset);

/// An [`Asset`] qualified by the token contract that issued it.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ExtendedAsset {
	pub quantity: Asset,
	pub contract: Name,
}

/// Raw bytes, hex encoded in JSON.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct Bytes(pub Vec<u8>);

impl fmt::Display for Bytes {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(&hex::encode(&self.0))
	}
}

impl FromStr for Bytes {
	type Err = ParseError;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		hex::decode(s).map(Self).map_err(ParseError::InvalidHex)
	}
}

impl From<Vec<u8>> for Bytes {
	fn from(value: Vec<u8>) -> Self {
		Self(value)
	}
}

impl_text_serde!(Bytes);

/// `varuint32`: an unsigned LEB128 integer on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct VarUint32(pub u32);

/// `varint32`: a zigzag LEB128 integer on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct VarInt32(pub i32);

opaque_text!(
	/// `float128`, kept in its hex text form.
	Float128
);
opaque_text!(Checksum160);
opaque_text!(Checksum256);
opaque_text!(Checksum512);
opaque_text!(
	/// `time_point`: microseconds since the epoch, ISO 8601 in JSON.
	TimePoint
);
opaque_text!(
	/// `time_point_sec`: seconds since the epoch, ISO 8601 in JSON.
	TimePointSec
);
opaque_text!(
	/// `block_timestamp_type`: half-second slots since 2000-01-01.
	BlockTimestamp
);
opaque_text!(PublicKey);
opaque_text!(PrivateKey);
opaque_text!(Signature);
