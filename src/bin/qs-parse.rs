//! `qs-parse`: reads a ".qs" file and prints one JSON record per input line.
//!
//! Lines that cannot be parsed are reported on stderr with their line number and raw
//! text; parsing continues with the next line.

use std::io::{self, BufWriter};
use std::path::{Path, PathBuf};
use std::process;

use clap::{Arg, ArgAction, Command};
use qsck::convert;
use qsck::input::{self, InputKind};
use tracing::Level;

fn build_cli() -> Command {
    Command::new("qs-parse")
        .about("Reads a \".qs\" file, outputs one JSON record per input line to stdout")
        .arg(
            Arg::new("input")
                .value_name("INPUT_QS_PATH")
                .help("Path to a .qs, .qs.gz, .qs.bz2 or .qs.zst file")
                .required(true)
                .value_parser(clap::value_parser!(PathBuf)),
        )
        .arg(
            Arg::new("verbose")
                .long("verbose")
                .short('v')
                .help("Log reassembly decisions to stderr")
                .action(ArgAction::SetTrue),
        )
}

fn main() {
    let matches = build_cli().get_matches();

    let level = if matches.get_flag("verbose") {
        Level::DEBUG
    } else {
        Level::INFO
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(io::stderr)
        .init();

    let Some(path) = matches.get_one::<PathBuf>("input") else {
        eprintln!("missing INPUT_QS_PATH");
        process::exit(2);
    };

    if let Err(e) = run(path) {
        eprintln!("{}", e);
        process::exit(1);
    }
}

fn run(path: &Path) -> qsck::Result<()> {
    let lines = input::open(path, InputKind::Qs)?;
    let mut out = BufWriter::new(io::stdout().lock());
    let source = path.display().to_string();

    let summary = convert::convert_lines(lines, &mut out, &source, convert::qs_to_json)?;
    tracing::debug!(converted = summary.converted, failed = summary.failed, "done");
    Ok(())
}
