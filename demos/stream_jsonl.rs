//! Reads newline-delimited JSON records from stdin, enriches each with a
//! token count, and writes the result to stdout — the shape an external
//! CLI wrapper would drive this crate with.

use std::io::{self, BufReader};
use tokenbudget::stream::{run_single_worker, Mode, StreamConfig};
use tokenbudget::Engine;

fn main() {
    tracing_subscriber::fmt::init();

    let engine = Engine::from_embedded().expect("embedded vocabularies are always valid");
    let config = StreamConfig {
        mode: Mode::Count,
        model: "gpt-4o".to_string(),
        ..Default::default()
    };

    let stdin = BufReader::new(io::stdin());
    let (summary, exit) = run_single_worker(&engine, &config, stdin, io::stdout(), io::stderr());
    eprintln!(
        "processed {} lines, {} failed",
        summary.lines_total, summary.lines_failed
    );
    std::process::exit(exit.code());
}
