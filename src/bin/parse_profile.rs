#![forbid(unsafe_code)]
#![deny(warnings)]
#![warn(clippy::pedantic)]

use clap::{Parser, ValueEnum};
use hotleak::profile::WORKSPACE_PREFIX;
use hotleak::{init_tracing, Annotation, ProfilePaths, ProfileReport};
use std::path::PathBuf;
use tracing::{debug, info};

#[derive(Clone, Copy, Debug, Default, ValueEnum)]
enum Format {
    #[default]
    Text,
    Json,
}

/// Turn profiler reports into GitHub Actions annotations
#[derive(Parser, Debug)]
#[command(version, about)]
struct Args {
    /// valgrind memcheck log
    memcheck: PathBuf,
    /// callgrind output
    callgrind: PathBuf,
    /// cachegrind output; a `<stem>_summary.txt` next to it wins
    cachegrind: PathBuf,
    /// `pprof --text` output
    pprof: PathBuf,
    /// profiled binary, used in the group title
    binary: String,
    /// anything past the binary is accepted and ignored
    #[arg(hide = true)]
    extra: Vec<String>,

    /// only files under this prefix get file/line annotations
    #[arg(long, default_value = WORKSPACE_PREFIX)]
    workspace_prefix: String,

    #[arg(long, value_enum, default_value_t)]
    format: Format,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_tracing();
    let args = Args::parse();
    let paths = ProfilePaths {
        memcheck: args.memcheck.clone(),
        callgrind: args.callgrind.clone(),
        cachegrind: args.cachegrind.clone(),
        pprof: args.pprof.clone(),
    };
    if !args.extra.is_empty() {
        debug!(extra = ?args.extra, "ignoring extra arguments");
    }
    let report = match ProfileReport::collect(&paths, &args.workspace_prefix) {
        Ok(report) => report,
        Err(e) => {
            println!("{}", Annotation::Error(format!("{e:#}")));
            return Err(e.into());
        }
    };
    info!(binary = %args.binary, findings = report.findings.len(), "collected");

    match args.format {
        Format::Json => println!("{}", serde_json::to_string_pretty(&report.findings)?),
        Format::Text => {
            println!("{}", Annotation::Group("parse-profile arguments".into()));
            for (i, arg) in std::env::args().enumerate() {
                println!("  argv[{i}] = {arg:?}");
            }
            println!("{}", Annotation::EndGroup);
            for a in report.annotations(&args.binary) {
                println!("{a}");
            }
        }
    }
    Ok(())
}
