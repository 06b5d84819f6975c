#![allow(missing_docs)]

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing_subscriber::prelude::*;
use tracing_subscriber::{EnvFilter, fmt};

mod cmd;

#[derive(Parser)]
#[command(name = "blobdoc", about = "Serialized-bytes blob inspection tools")]
struct Cli {
	#[command(subcommand)]
	command: Commands,
}

#[derive(Subcommand)]
enum Commands {
	Decode {
		path: PathBuf,
		#[arg(long)]
		names: Option<PathBuf>,
		#[arg(long)]
		json: bool,
		#[arg(long)]
		big_endian: bool,
		#[arg(long)]
		max_depth: Option<usize>,
		#[arg(long)]
		max_entries: Option<usize>,
	},
	Entries {
		path: PathBuf,
		#[arg(long)]
		json: bool,
		#[arg(long)]
		big_endian: bool,
	},
}

fn main() {
	init_tracing();
	if let Err(err) = run() {
		eprintln!("error: {err}");
		std::process::exit(1);
	}
}

fn init_tracing() {
	tracing_subscriber::registry()
		.with(EnvFilter::try_from_default_env().unwrap_or_else(|_| "warn".into()))
		.with(fmt::layer().with_writer(std::io::stderr))
		.init();
}

fn run() -> blobdoc::blob::Result<()> {
	let cli = Cli::parse();

	match cli.command {
		Commands::Decode {
			path,
			names,
			json,
			big_endian,
			max_depth,
			max_entries,
		} => cmd::decode::run(cmd::decode::DecodeArgs {
			path,
			names,
			json,
			endianness: cmd::util::endianness(big_endian),
			max_depth,
			max_entries,
		}),
		Commands::Entries { path, json, big_endian } => cmd::entries::run(path, json, cmd::util::endianness(big_endian)),
	}
}
