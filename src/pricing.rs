//! Pricing evaluator: a pure function of token counts and a rate
//! schedule, using the standard per-million-token cost formula.

use crate::error::Error;

/// Per-million-token dollar rates for one model. `pricing.rs` does not
/// know where these numbers come from — looking them up is the caller's
/// responsibility.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Pricing {
    pub input_per_million: f64,
    pub output_per_million: f64,
}

impl Pricing {
    pub fn new(input_per_million: f64, output_per_million: f64) -> Result<Self, Error> {
        if input_per_million < 0.0 || output_per_million < 0.0 {
            return Err(Error::PricingError(
                "per-million rate must not be negative".into(),
            ));
        }
        Ok(Self {
            input_per_million,
            output_per_million,
        })
    }
}

/// `{tokens_input, tokens_output, cost_input_usd, cost_output_usd,
/// cost_total_usd}`. Accuracy is carried alongside the costs by the
/// caller rather than recomputed here, since it is a property of the
/// tokenizer that produced the counts, not of the pricing step.
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize)]
pub struct CostRecord {
    pub tokens_input: u64,
    pub tokens_output: u64,
    pub cost_input_usd: f64,
    pub cost_output_usd: f64,
    pub cost_total_usd: f64,
}

/// `cost = (tokens / 1_000_000) * rate` per side; total is the sum, with
/// no internal rounding.
pub fn evaluate(tokens_input: u64, tokens_output: u64, pricing: &Pricing) -> CostRecord {
    let cost_input_usd = (tokens_input as f64 / 1_000_000.0) * pricing.input_per_million;
    let cost_output_usd = (tokens_output as f64 / 1_000_000.0) * pricing.output_per_million;
    CostRecord {
        tokens_input,
        tokens_output,
        cost_input_usd,
        cost_output_usd,
        cost_total_usd: cost_input_usd + cost_output_usd,
    }
}
