// fpointgen — write a random points file and its checksum file

use std::path::PathBuf;
use std::process;

use anyhow::Context;
use clap::Parser;
use tracing::info;

use points_rs::common::{error_chain_msg, init_logging, reset_sigpipe};
use points_rs::generate::{DEFAULT_LINES, GenConfig, write_files};

const TOOL_NAME: &str = "fpointgen";

#[derive(Parser)]
#[command(
    name = "fpointgen",
    version,
    about = "Generate random `X,Y` lines and the matching checksum file"
)]
struct Cli {
    /// Number of lines to generate (100000000 is about 1.2GB)
    #[arg(short = 'n', long = "lines", default_value_t = DEFAULT_LINES)]
    lines: u64,

    /// Points file to write
    #[arg(short = 'o', long = "output", default_value = "points.txt")]
    output: PathBuf,

    /// Checksum file to write
    #[arg(long = "verify-out", value_name = "FILE", default_value = "points-verify.txt")]
    verify_out: PathBuf,

    /// Seed for reproducible output
    #[arg(long = "seed")]
    seed: Option<u64>,

    /// Log progress to stderr
    #[arg(short = 'v', long = "verbose")]
    verbose: bool,
}

fn run(cli: &Cli) -> anyhow::Result<()> {
    let cfg = GenConfig {
        lines: cli.lines,
        seed: cli.seed,
    };
    info!(lines = cfg.lines, output = %cli.output.display(), "generating");
    let checksum = write_files(&cli.output, &cli.verify_out, &cfg).with_context(|| {
        format!(
            "cannot write '{}' or '{}'",
            cli.output.display(),
            cli.verify_out.display()
        )
    })?;
    println!("{}", checksum);
    Ok(())
}

fn main() {
    reset_sigpipe();
    let cli = Cli::parse();
    init_logging(cli.verbose);

    if let Err(e) = run(&cli) {
        eprintln!("{}: {}", TOOL_NAME, error_chain_msg(&e));
        process::exit(1);
    }
}
