//! Generate bindings for the ABI fixtures shared with `abigen`'s tests.

use std::env;
use std::fs;
use std::path::PathBuf;

use abigen::GenerateConfig;
use abigen::generate_bindings;
use abigen_runtime::AbiDocument;

/// `(account, module)` pairs. Each fixture is named `<account>.json`.
const CONTRACTS: &[(&str, &str)] = &[("eosio.token", "eosio_token"), ("market", "market")];

fn main() {
	let manifest_dir = env::var("CARGO_MANIFEST_DIR").unwrap_or_else(|e| panic!("CARGO_MANIFEST_DIR: {e}"));
	let out_dir = env::var("OUT_DIR").unwrap_or_else(|e| panic!("OUT_DIR: {e}"));
	let fixtures = PathBuf::from(manifest_dir).join("../abigen/tests/fixtures");

	println!("cargo::rerun-if-changed=build.rs");

	for (account, module) in CONTRACTS {
		let path = fixtures.join(format!("{account}.json"));
		println!("cargo::rerun-if-changed={}", path.display());

		let json = fs::read_to_string(&path).unwrap_or_else(|e| panic!("failed to read {}: {e}", path.display()));
		let abi = AbiDocument::from_json(&json).unwrap_or_else(|e| panic!("failed to parse {}: {e}", path.display()));
		let source = generate_bindings(&abi, account, &GenerateConfig::default())
			.unwrap_or_else(|e| panic!("cannot generate bindings for `{account}`: {e}"));

		let dest = PathBuf::from(&out_dir).join(format!("{module}.rs"));
		fs::write(&dest, source).unwrap_or_else(|e| panic!("failed to write {}: {e}", dest.display()));
	}
}
