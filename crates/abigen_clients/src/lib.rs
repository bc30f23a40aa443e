//! Bindings generated at build time from the ABI fixtures of `abigen`'s
//! tests, compiled the way a downstream crate compiles them.

pub mod eosio_token {
	include!(concat!(env!("OUT_DIR"), "/eosio_token.rs"));
}

pub mod market {
	include!(concat!(env!("OUT_DIR"), "/market.rs"));
}
