//! Command line front end for `abigen`: read contract ABIs, write one Rust
//! bindings file per contract, or check that the files on disk are current.

use std::fs;
use std::path::Path;
use std::path::PathBuf;

use abigen::GenerateConfig;
use abigen::GenerateError;
use abigen::generate_bindings;
use abigen_runtime::AbiDocument;
use abigen_runtime::AbiError;
use clap::Parser;
use heck::ToSnakeCase;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, CliError>;

#[derive(Debug, Parser)]
#[command(
	name = "abigen",
	version,
	about = "Generate typed Rust bindings from Antelope contract ABIs"
)]
pub struct Args {
	/// A single ABI file path. Can be provided multiple times.
	#[arg(long = "abi")]
	pub abis: Vec<PathBuf>,

	/// A directory containing `*.json` ABIs.
	#[arg(long = "abi-dir")]
	pub abi_dir: Option<PathBuf>,

	/// Account the contract is deployed to. Defaults to the file stem, so
	/// `eosio.token.json` is read as `eosio.token`. Only valid with a single
	/// `--abi`.
	#[arg(long)]
	pub account: Option<String>,

	/// Directory the `<account>.rs` files are written to.
	#[arg(long)]
	pub output: PathBuf,

	/// Path generated code uses to reach the runtime crate.
	#[arg(long = "runtime-crate", default_value = "abigen_runtime")]
	pub runtime_crate: String,

	/// Do not embed the binary ABI in the generated files.
	#[arg(long = "no-embed-abi")]
	pub no_embed_abi: bool,

	/// Compare against the existing files instead of writing them.
	#[arg(long)]
	pub check: bool,

	/// Increase log verbosity (`-v` info, `-vv` debug).
	#[arg(short, long, action = clap::ArgAction::Count)]
	pub verbose: u8,
}

impl Args {
	pub fn config(&self) -> GenerateConfig {
		GenerateConfig::default()
			.runtime_crate(self.runtime_crate.clone())
			.embed_abi(!self.no_embed_abi)
	}
}

#[derive(Debug, Error)]
pub enum CliError {
	#[error("failed to read `{path}`: {source}")]
	ReadFile {
		path: PathBuf,
		source: std::io::Error,
	},
	#[error("failed to write `{path}`: {source}")]
	WriteFile {
		path: PathBuf,
		source: std::io::Error,
	},
	#[error("failed to parse ABI `{path}`: {source}")]
	ParseAbi { path: PathBuf, source: AbiError },
	#[error("cannot generate bindings for `{path}`: {source}")]
	Generate {
		path: PathBuf,
		source: GenerateError,
	},
	#[error("invalid arguments: {reason}")]
	InvalidArgs { reason: String },
	#[error("bindings are out of date: {}", display_paths(.paths))]
	Drift { paths: Vec<PathBuf> },
}

fn display_paths(paths: &[PathBuf]) -> String {
	paths
		.iter()
		.map(|path| format!("`{}`", path.display()))
		.collect::<Vec<_>>()
		.join(", ")
}

/// Generate (or check) the bindings of every ABI named by `args`, returning
/// the output paths in processing order.
pub fn run(args: &Args) -> Result<Vec<PathBuf>> {
	let abi_paths = collect_abi_paths(args)?;
	if args.account.is_some() && abi_paths.len() != 1 {
		return Err(CliError::InvalidArgs {
			reason: "--account needs exactly one ABI".to_string(),
		});
	}

	let config = args.config();
	let mut outputs = Vec::with_capacity(abi_paths.len());
	let mut drifted = Vec::new();

	for abi_path in &abi_paths {
		let account = match &args.account {
			Some(account) => account.clone(),
			None => file_stem(abi_path)?,
		};
		let source = render(abi_path, &account, &config)?;
		let output_path = args.output.join(format!("{}.rs", account.to_snake_case()));

		if args.check {
			if !is_current(&output_path, &source)? {
				tracing::warn!(path = %output_path.display(), "bindings are out of date");
				drifted.push(output_path.clone());
			}
		} else {
			write(&output_path, &source)?;
			tracing::info!(account = %account, path = %output_path.display(), "wrote bindings");
		}

		outputs.push(output_path);
	}

	if !drifted.is_empty() {
		return Err(CliError::Drift { paths: drifted });
	}

	Ok(outputs)
}

fn render(abi_path: &Path, account: &str, config: &GenerateConfig) -> Result<String> {
	let json = fs::read_to_string(abi_path).map_err(|source| {
		CliError::ReadFile {
			path: abi_path.to_path_buf(),
			source,
		}
	})?;
	let abi = AbiDocument::from_json(&json).map_err(|source| {
		CliError::ParseAbi {
			path: abi_path.to_path_buf(),
			source,
		}
	})?;

	generate_bindings(&abi, account, config).map_err(|source| {
		CliError::Generate {
			path: abi_path.to_path_buf(),
			source,
		}
	})
}

fn is_current(path: &Path, rendered: &str) -> Result<bool> {
	match fs::read_to_string(path) {
		Ok(existing) => Ok(existing == rendered),
		Err(error) if error.kind() == std::io::ErrorKind::NotFound => Ok(false),
		Err(source) => {
			Err(CliError::ReadFile {
				path: path.to_path_buf(),
				source,
			})
		}
	}
}

fn write(path: &Path, source: &str) -> Result<()> {
	if let Some(parent) = path.parent() {
		fs::create_dir_all(parent).map_err(|source| {
			CliError::WriteFile {
				path: parent.to_path_buf(),
				source,
			}
		})?;
	}

	fs::write(path, source).map_err(|source| {
		CliError::WriteFile {
			path: path.to_path_buf(),
			source,
		}
	})
}

fn collect_abi_paths(args: &Args) -> Result<Vec<PathBuf>> {
	let mut abi_paths = args.abis.clone();

	if let Some(abi_dir) = &args.abi_dir {
		let entries = fs::read_dir(abi_dir).map_err(|source| {
			CliError::ReadFile {
				path: abi_dir.clone(),
				source,
			}
		})?;

		for entry in entries {
			let entry = entry.map_err(|source| {
				CliError::ReadFile {
					path: abi_dir.clone(),
					source,
				}
			})?;
			let path = entry.path();
			let is_json = path
				.extension()
				.and_then(|ext| ext.to_str())
				.is_some_and(|ext| ext.eq_ignore_ascii_case("json"));
			if is_json {
				abi_paths.push(path);
			}
		}
	}

	abi_paths.sort();
	abi_paths.dedup();

	if abi_paths.is_empty() {
		return Err(CliError::InvalidArgs {
			reason: "provide at least one --abi or --abi-dir".to_string(),
		});
	}

	Ok(abi_paths)
}

fn file_stem(path: &Path) -> Result<String> {
	let Some(stem) = path.file_stem().and_then(|stem| stem.to_str()) else {
		return Err(CliError::InvalidArgs {
			reason: format!("`{}` has no UTF-8 file stem", path.display()),
		});
	};
	Ok(stem.to_string())
}
