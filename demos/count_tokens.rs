//! Counts tokens for a fixed piece of text under a few model aliases and
//! prints the accuracy tier alongside each count.

use tokenbudget::Engine;

fn main() {
    tracing_subscriber::fmt::init();

    let engine = Engine::from_embedded().expect("embedded vocabularies are always valid");
    let text = "The quick brown fox jumps over the lazy dog.";

    for model in ["gpt-4o", "gpt-4", "some-vendor/unreleased-model"] {
        let (tokens, accuracy) = engine.count_tokens(model, text);
        println!("{model}: {tokens} tokens ({})", accuracy.as_str());
    }
}
