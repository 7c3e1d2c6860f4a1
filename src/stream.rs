//! Stream driver: line framing, quota enforcement, and either a strictly
//! sequential single-worker loop or a fixed-size multi-worker pool over a
//! bounded mutex+condvar FIFO.

use crate::error::{Error, ExitCode, RecordError};
use crate::pricing::Pricing;
use crate::record::{self, RecordConfig, Scratch};
use crate::Engine;
use std::collections::VecDeque;
use std::io::{BufRead, Write};
use std::sync::{Condvar, Mutex};
use std::thread;

/// Whether the run also computes and emits cost fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Count,
    Price,
}

/// Plain configuration struct; this crate never parses `std::env::args` —
/// argument parsing is an external caller's responsibility.
#[derive(Debug, Clone)]
pub struct StreamConfig {
    pub mode: Mode,
    pub model: String,
    pub text_field: String,
    pub max_line_bytes: usize,
    pub workers: usize,
    pub max_tokens: Option<u64>,
    pub max_cost: Option<f64>,
    pub fail_on_error: bool,
    pub quiet: bool,
    pub pricing: Option<Pricing>,
}

impl Default for StreamConfig {
    fn default() -> Self {
        Self {
            mode: Mode::Count,
            model: String::new(),
            text_field: "text".to_string(),
            max_line_bytes: 10 * 1024 * 1024,
            workers: 1,
            max_tokens: None,
            max_cost: None,
            fail_on_error: false,
            quiet: false,
            pricing: None,
        }
    }
}

/// Counters over a run.
#[derive(Debug, Clone, Default, serde::Serialize)]
pub struct StreamSummary {
    pub version: String,
    pub lines_total: u64,
    pub lines_failed: u64,
    pub tokens_input: u64,
    pub tokens_output: u64,
    pub cost_input_usd: f64,
    pub cost_output_usd: f64,
    pub cost_total_usd: f64,
    pub accuracy: String,
    pub quota_hit: bool,
}

impl StreamSummary {
    fn new(accuracy: &str) -> Self {
        Self {
            version: "1".to_string(),
            accuracy: accuracy.to_string(),
            ..Default::default()
        }
    }

    fn absorb_record(&mut self, value: &serde_json::Value) {
        self.tokens_input += value
            .get("tokens_input")
            .and_then(serde_json::Value::as_u64)
            .unwrap_or(0);
        self.tokens_output += value
            .get("tokens_output")
            .and_then(serde_json::Value::as_u64)
            .unwrap_or(0);
        self.cost_input_usd += value
            .get("cost_input_usd")
            .and_then(serde_json::Value::as_f64)
            .unwrap_or(0.0);
        self.cost_output_usd += value
            .get("cost_output_usd")
            .and_then(serde_json::Value::as_f64)
            .unwrap_or(0.0);
        self.cost_total_usd += value
            .get("cost_total_usd")
            .and_then(serde_json::Value::as_f64)
            .unwrap_or(0.0);
    }

    fn quota_tripped(&self, config: &StreamConfig) -> bool {
        config
            .max_tokens
            .is_some_and(|limit| self.tokens_input >= limit)
            || config
                .max_cost
                .is_some_and(|limit| self.cost_total_usd >= limit)
    }
}

enum LineOutcome {
    Eof,
    Line,
    Overlong,
}

/// Reads one line into `buf` (without the trailing `\n`), capping stored
/// bytes at `max`; bytes beyond `max` are still consumed from `reader` (so
/// framing stays correct) but dropped, and the outcome is `Overlong`.
fn read_line(reader: &mut impl BufRead, max: usize, buf: &mut Vec<u8>) -> std::io::Result<LineOutcome> {
    buf.clear();
    let mut overlong = false;
    let mut saw_any = false;
    loop {
        let available = reader.fill_buf()?;
        if available.is_empty() {
            return Ok(if !saw_any {
                LineOutcome::Eof
            } else if overlong {
                LineOutcome::Overlong
            } else {
                LineOutcome::Line
            });
        }
        saw_any = true;
        if let Some(nl) = available.iter().position(|&b| b == b'\n') {
            let chunk_len = nl;
            if !overlong {
                let room = max.saturating_sub(buf.len());
                let take = chunk_len.min(room);
                buf.extend_from_slice(&available[..take]);
                if chunk_len > room {
                    overlong = true;
                }
            }
            let consumed = nl + 1;
            reader.consume(consumed);
            return Ok(if overlong { LineOutcome::Overlong } else { LineOutcome::Line });
        } else {
            if !overlong {
                let room = max.saturating_sub(buf.len());
                let take = available.len().min(room);
                buf.extend_from_slice(&available[..take]);
                if available.len() > room {
                    overlong = true;
                }
            }
            let consumed = available.len();
            reader.consume(consumed);
        }
    }
}

fn accuracy_tier(model: &str) -> &'static str {
    crate::model_registry::resolve(model)
        .map(|spec| spec.accuracy.as_str())
        .unwrap_or(crate::model_registry::Accuracy::Estimate.as_str())
}

/// Runs the single-worker path: input line order equals output record
/// order; quota checks happen strictly between lines.
pub fn run_single_worker(
    engine: &Engine,
    config: &StreamConfig,
    mut input: impl BufRead,
    mut output: impl Write,
    mut errors: impl Write,
) -> (StreamSummary, ExitCode) {
    let mut summary = StreamSummary::new(accuracy_tier(&config.model));
    let mut scratch = Scratch::new();
    let mut line_buf = Vec::new();
    let mut line_number: u64 = 0;

    let record_config = RecordConfig {
        text_field: &config.text_field,
        model: &config.model,
        price: config.mode == Mode::Price,
        pricing: config.pricing,
    };

    loop {
        line_number += 1;
        match read_line(&mut input, config.max_line_bytes, &mut line_buf) {
            Ok(LineOutcome::Eof) => {
                line_number -= 1;
                break;
            }
            Ok(LineOutcome::Overlong) => {
                log_record_error(&mut errors, config.quiet, line_number, "line_too_long");
                summary.lines_failed += 1;
                summary.lines_total += 1;
                if config.fail_on_error {
                    return (summary, ExitCode::from(&Error::LineTooLong {
                        line: line_number,
                        max: config.max_line_bytes,
                    }));
                }
                continue;
            }
            Ok(LineOutcome::Line) => {}
            Err(_) => {
                return (summary, ExitCode::Generic);
            }
        }

        summary.lines_total += 1;
        match record::process(engine, &mut scratch, &line_buf, &record_config) {
            Ok(enriched) => {
                if let Ok(value) = serde_json::from_slice::<serde_json::Value>(enriched) {
                    summary.absorb_record(&value);
                }
                if output.write_all(enriched).is_err() || output.write_all(b"\n").is_err() {
                    return (summary, ExitCode::Generic);
                }
            }
            Err(record_err) => {
                log_record_error(&mut errors, config.quiet, line_number, record_err.name());
                summary.lines_failed += 1;
                if config.fail_on_error {
                    return (
                        summary,
                        ExitCode::from(&Error::RecordFatal {
                            line: line_number,
                            source: record_err,
                        }),
                    );
                }
            }
        }

        if summary.quota_tripped(config) {
            summary.quota_hit = true;
            write_summary(&mut errors, config.quiet, &summary);
            return (summary, ExitCode::Quota);
        }
    }

    write_summary(&mut errors, config.quiet, &summary);
    let exit = if summary.lines_failed > 0 {
        ExitCode::Partial
    } else {
        ExitCode::Ok
    };
    (summary, exit)
}

struct Job {
    line_number: u64,
    bytes: Vec<u8>,
}

struct QueueState {
    jobs: VecDeque<Job>,
    closed: bool,
}

struct LineQueue {
    state: Mutex<QueueState>,
    condvar: Condvar,
}

impl LineQueue {
    fn new() -> Self {
        Self {
            state: Mutex::new(QueueState {
                jobs: VecDeque::new(),
                closed: false,
            }),
            condvar: Condvar::new(),
        }
    }

    fn push(&self, job: Job) {
        let mut state = self.state.lock().unwrap();
        state.jobs.push_back(job);
        self.condvar.notify_one();
    }

    fn close(&self) {
        let mut state = self.state.lock().unwrap();
        state.closed = true;
        self.condvar.notify_all();
    }

    /// Blocks until a job is available or the queue is closed and drained.
    fn pop(&self) -> Option<Job> {
        let mut state = self.state.lock().unwrap();
        loop {
            if let Some(job) = state.jobs.pop_front() {
                return Some(job);
            }
            if state.closed {
                return None;
            }
            state = self.condvar.wait(state).unwrap();
        }
    }
}

/// Runs the multi-worker path, used only when `workers > 1` and no quota
/// is configured — quota semantics are strictly sequential and cannot be
/// offered here. Output record order is not preserved; record content is
/// identical to what single-worker mode would produce for the same line.
pub fn run_multi_worker(
    engine: &Engine,
    config: &StreamConfig,
    mut input: impl BufRead,
    output: impl Write + Send,
    errors: impl Write + Send,
) -> (StreamSummary, ExitCode) {
    let queue = LineQueue::new();
    let output = Mutex::new(output);
    let errors = Mutex::new(errors);
    let summary = Mutex::new(StreamSummary::new(accuracy_tier(&config.model)));

    let record_config = RecordConfig {
        text_field: &config.text_field,
        model: &config.model,
        price: config.mode == Mode::Price,
        pricing: config.pricing,
    };

    let lines_total = thread::scope(|scope| {
        for _ in 0..config.workers.max(1) {
            let queue = &queue;
            let output = &output;
            let errors = &errors;
            let summary = &summary;
            let record_config = &record_config;
            scope.spawn(move || {
                let mut scratch = Scratch::new();
                while let Some(job) = queue.pop() {
                    match record::process(engine, &mut scratch, &job.bytes, record_config) {
                        Ok(enriched) => {
                            if let Ok(value) = serde_json::from_slice::<serde_json::Value>(enriched) {
                                summary.lock().unwrap().absorb_record(&value);
                            }
                            let mut out = output.lock().unwrap();
                            let _ = out.write_all(enriched);
                            let _ = out.write_all(b"\n");
                        }
                        Err(record_err) => {
                            log_record_error(
                                &mut *errors.lock().unwrap(),
                                config.quiet,
                                job.line_number,
                                record_err.name(),
                            );
                            summary.lock().unwrap().lines_failed += 1;
                        }
                    }
                }
            });
        }

        let mut line_number: u64 = 0;
        let mut lines_total: u64 = 0;
        loop {
            line_number += 1;
            let mut buf = Vec::new();
            match read_line(&mut input, config.max_line_bytes, &mut buf) {
                Ok(LineOutcome::Eof) => break,
                Ok(LineOutcome::Overlong) => {
                    log_record_error(
                        &mut *errors.lock().unwrap(),
                        config.quiet,
                        line_number,
                        "line_too_long",
                    );
                    summary.lock().unwrap().lines_failed += 1;
                    lines_total += 1;
                }
                Ok(LineOutcome::Line) => {
                    lines_total += 1;
                    queue.push(Job {
                        line_number,
                        bytes: buf,
                    });
                }
                Err(_) => break,
            }
        }
        queue.close();
        lines_total
    });

    // Workers joined automatically at the end of `thread::scope`.
    let mut summary = summary.into_inner().unwrap();
    let mut errors = errors.into_inner().unwrap();
    summary.lines_total = lines_total;
    write_summary(&mut errors, config.quiet, &summary);

    let exit = if summary.lines_failed > 0 {
        ExitCode::Partial
    } else {
        ExitCode::Ok
    };
    (summary, exit)
}

fn log_record_error(errors: &mut impl Write, quiet: bool, line: u64, kind: &str) {
    tracing::warn!(line, kind, "record error");
    if quiet {
        return;
    }
    let _ = writeln!(errors, "line {line}: {kind}");
}

fn write_summary(errors: &mut impl Write, quiet: bool, summary: &StreamSummary) {
    tracing::debug!(
        lines_total = summary.lines_total,
        lines_failed = summary.lines_failed,
        quota_hit = summary.quota_hit,
        "stream finished"
    );
    if quiet {
        return;
    }
    if let Ok(json) = serde_json::to_string(summary) {
        let _ = writeln!(errors, "{json}");
    }
}
