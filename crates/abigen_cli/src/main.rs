use abigen_cli::Args;
use abigen_cli::run;
use clap::Parser;
use tracing_subscriber::EnvFilter;

fn main() {
	let args = Args::parse();
	init_tracing(args.verbose);

	if let Err(error) = run(&args) {
		eprintln!("{error}");
		std::process::exit(1);
	}
}

/// `RUST_LOG` wins over `-v`.
fn init_tracing(verbose: u8) {
	let level = match verbose {
		0 => "warn",
		1 => "info",
		_ => "debug",
	};
	let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

	tracing_subscriber::fmt()
		.with_env_filter(filter)
		.with_writer(std::io::stderr)
		.with_target(false)
		.init();
}
