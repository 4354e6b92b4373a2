#![allow(missing_docs)]

use std::path::PathBuf;

use clap::{Parser, Subcommand};

mod cmd;

#[derive(Parser)]
#[command(name = "rxdoc", about = "Ruby Marshal data inspection tools")]
struct Cli {
	#[command(subcommand)]
	command: Commands,
}

#[derive(Subcommand)]
enum Commands {
	Convert {
		input: PathBuf,
		output: PathBuf,
		#[arg(long, default_value_t = 2)]
		indent: usize,
		#[arg(long, default_value_t = 256)]
		max_depth: u32,
		#[arg(long)]
		log_file: Option<PathBuf>,
		#[arg(long)]
		no_rgss: bool,
		#[arg(long)]
		strict_dumps: bool,
	},
	Show {
		input: PathBuf,
		#[arg(long, default_value_t = 2)]
		indent: usize,
		#[arg(long)]
		stats: bool,
		#[arg(long)]
		no_rgss: bool,
	},
}

fn main() {
	if let Err(err) = run() {
		eprintln!("error: {err}");
		std::process::exit(1);
	}
}

fn run() -> rxdoc::marshal::Result<()> {
	let cli = Cli::parse();

	match cli.command {
		Commands::Convert {
			input,
			output,
			indent,
			max_depth,
			log_file,
			no_rgss,
			strict_dumps,
		} => cmd::convert::run(
			input,
			output,
			cmd::convert::ConvertOptions {
				indent,
				max_depth,
				log_file,
				no_rgss,
				strict_dumps,
			},
		),
		Commands::Show {
			input,
			indent,
			stats,
			no_rgss,
		} => cmd::show::run(input, cmd::show::ShowOptions { indent, stats, no_rgss }),
	}
}
