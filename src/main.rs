//! fragscore - score fragment contributions from newline-delimited JSON.
//!
//! Each input line is one record's fragment multiset, e.g.
//! `{"2246728737": 2, "864662311": 1}`. Lines that do not parse are skipped
//! (or abort the run when the config says `invalid_records: fail`). Scores are
//! written to stdout as `id<TAB>score` lines.
//!
//! Usage: `fragscore [--config <file.yaml>] [input.jsonl]` (stdin when no
//! input is given).

use std::fs::File;
use std::io::{self, BufRead, BufReader, Write};

use anyhow::{bail, Context};
use fragscore::{score_records_with_config, FragmentCounts, FragscoreConfig};
use tracing_subscriber::EnvFilter;

struct Args {
    config: Option<String>,
    input: Option<String>,
}

fn parse_args() -> anyhow::Result<Args> {
    let mut args = Args {
        config: None,
        input: None,
    };
    let mut iter = std::env::args().skip(1);
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--config" | "-c" => {
                let Some(path) = iter.next() else {
                    bail!("--config requires a path");
                };
                args.config = Some(path);
            }
            "--help" | "-h" => {
                println!("usage: fragscore [--config <file.yaml>] [input.jsonl]");
                std::process::exit(0);
            }
            other if args.input.is_none() => args.input = Some(other.to_string()),
            other => bail!("unexpected argument: {other}"),
        }
    }
    Ok(args)
}

#[allow(clippy::ptr_arg)]
fn parse_line(line: &String) -> Result<FragmentCounts, serde_json::Error> {
    serde_json::from_str(line)
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_target(false)
        .with_writer(io::stderr)
        .json()
        .init();

    let args = parse_args()?;

    let config = match args.config.as_deref() {
        Some(path) => FragscoreConfig::from_file(path)
            .with_context(|| format!("loading config from {path}"))?,
        None => FragscoreConfig::default(),
    };

    let reader: Box<dyn BufRead> = match args.input.as_deref() {
        Some(path) => Box::new(BufReader::new(
            File::open(path).with_context(|| format!("opening {path}"))?,
        )),
        None => Box::new(BufReader::new(io::stdin())),
    };

    let mut lines = Vec::new();
    for line in reader.lines() {
        let line = line.context("reading input")?;
        if !line.trim().is_empty() {
            lines.push(line);
        }
    }

    let run = score_records_with_config(lines, &parse_line, &config)?;
    tracing::info!(
        records_seen = run.records_seen,
        records_skipped = run.records_skipped,
        frequent_count = run.report.frequent_count,
        "fragscore_complete"
    );

    let stdout = io::stdout();
    let mut out = stdout.lock();
    out.write_all(run.report.to_tsv().as_bytes())?;
    out.flush()?;
    Ok(())
}
