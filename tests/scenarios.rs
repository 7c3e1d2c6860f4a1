//! End-to-end scenario tests covering pre-tokenization, pricing
//! enrichment, quota enforcement, and bad-line handling.

use tokenbudget::pretoken::{tokenize, Encoding};
use tokenbudget::record::{process, RecordConfig, Scratch};
use tokenbudget::stream::{run_single_worker, Mode, StreamConfig};
use tokenbudget::Engine;

fn engine() -> Engine {
    Engine::from_embedded().unwrap()
}

fn spans(encoding: Encoding, text: &str) -> Vec<&str> {
    tokenize(encoding, text.as_bytes())
        .iter()
        .map(|t| &text[t.offset..t.offset + t.length])
        .collect()
}

#[test]
fn scenario_1_hello_world_under_o200k() {
    let text = "Hello, world!";
    assert_eq!(
        spans(Encoding::O200kBase, text),
        vec!["Hello", ",", " world", "!"]
    );
    let engine = engine();
    let (tokens, _) = engine.count_tokens("gpt-4o", text);
    assert_eq!(tokens, 4);
}

#[test]
fn scenario_2_three_digit_split_under_either_encoding() {
    assert_eq!(spans(Encoding::Cl100kBase, "1234"), vec!["123", "4"]);
    assert_eq!(spans(Encoding::O200kBase, "1234"), vec!["123", "4"]);
}

#[test]
fn scenario_3_long_repeated_run_collapses_and_completes_quickly() {
    let text = "a".repeat(4096);
    let start = std::time::Instant::now();
    let engine = engine();
    let (tokens, _) = engine.count_tokens("gpt-4o", &text);
    assert!(start.elapsed().as_secs() < 1, "merge took too long");
    assert!(tokens < 4096 / 2, "expected substantial merging, got {tokens} tokens");
}

#[test]
fn scenario_4_price_mode_enriches_with_cost_fields() {
    let engine = engine();
    let mut scratch = Scratch::new();
    let config = RecordConfig {
        text_field: "text",
        model: "gpt-4o",
        price: true,
        pricing: Some(tokenbudget::pricing::Pricing::new(5.0, 15.0).unwrap()),
    };
    let out = process(&engine, &mut scratch, br#"{"text":"hi"}"#, &config).unwrap();
    let value: serde_json::Value = serde_json::from_slice(out).unwrap();
    assert!(value.get("tokens_input").is_some());
    assert!(value.get("cost_input_usd").is_some());
    assert!(value.get("cost_output_usd").is_some());
    assert!(value.get("cost_total_usd").is_some());
    assert_eq!(value.get("accuracy").unwrap().as_str().unwrap(), "exact");
    assert_eq!(value.get("text").unwrap().as_str().unwrap(), "hi");
}

#[test]
fn scenario_5_quota_halts_the_stream_with_quota_exit() {
    let engine = engine();
    let lines: String = (0..1000)
        .map(|i| format!("{{\"text\":\"line number {i} has some words in it\"}}\n"))
        .collect();
    let config = StreamConfig {
        model: "gpt-4o".to_string(),
        max_tokens: Some(500),
        ..Default::default()
    };
    let input = std::io::Cursor::new(lines.into_bytes());
    let mut output = Vec::new();
    let mut errors = Vec::new();
    let (summary, exit) = run_single_worker(&engine, &config, input, &mut output, &mut errors);
    assert_eq!(exit, tokenbudget::ExitCode::Quota);
    assert!(summary.quota_hit);
    assert!(summary.lines_total < 1000);
}

#[test]
fn scenario_6_one_bad_line_is_skipped_others_enriched_exit_65() {
    let engine = engine();
    let input = std::io::Cursor::new(
        b"{\"text\":\"one\"}\n{not json}\n{\"text\":\"three\"}\n".to_vec(),
    );
    let config = StreamConfig {
        model: "gpt-4o".to_string(),
        mode: Mode::Count,
        ..Default::default()
    };
    let mut output = Vec::new();
    let mut errors = Vec::new();
    let (summary, exit) = run_single_worker(&engine, &config, input, &mut output, &mut errors);
    assert_eq!(summary.lines_failed, 1);
    assert_eq!(summary.lines_total, 3);
    assert_eq!(exit, tokenbudget::ExitCode::Partial);

    let output_text = String::from_utf8(output).unwrap();
    assert_eq!(output_text.lines().count(), 2);
}
