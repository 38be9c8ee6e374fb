//! `qs-format`: reads a JSON file with one `[identifier, timestamp, fields]` record
//! per line and prints each record as a ".qs" line.

use std::io::{self, BufWriter};
use std::path::{Path, PathBuf};
use std::process;

use clap::{Arg, ArgAction, Command};
use qsck::input::{self, InputKind};
use qsck::{convert, QsOptions};

fn build_cli() -> Command {
    Command::new("qs-format")
        .about("Reads JSON file with one record per line, outputs .qs records to stdout")
        .arg(
            Arg::new("input")
                .value_name("INPUT_JSON_PATH")
                .help("Path to a .json, .json.gz, .json.bz2 or .json.zst file")
                .required(true)
                .value_parser(clap::value_parser!(PathBuf)),
        )
        .arg(
            Arg::new("raw-numerics")
                .long("raw-numerics")
                .help("Keep scientific-notation literals exactly as given")
                .action(ArgAction::SetTrue),
        )
}

fn main() {
    tracing_subscriber::fmt().with_writer(io::stderr).init();

    let matches = build_cli().get_matches();
    let Some(path) = matches.get_one::<PathBuf>("input") else {
        eprintln!("missing INPUT_JSON_PATH");
        process::exit(2);
    };
    let options = QsOptions::new().with_numeric_normalization(!matches.get_flag("raw-numerics"));

    if let Err(e) = run(path, &options) {
        eprintln!("{}", e);
        process::exit(1);
    }
}

fn run(path: &Path, options: &QsOptions) -> qsck::Result<()> {
    let lines = input::open(path, InputKind::Json)?;
    let mut out = BufWriter::new(io::stdout().lock());
    let source = path.display().to_string();

    let summary =
        convert::convert_lines(lines, &mut out, &source, |line| convert::json_to_qs(line, options))?;
    tracing::debug!(converted = summary.converted, failed = summary.failed, "done");
    Ok(())
}
