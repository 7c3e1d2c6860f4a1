//! Record processor: enriches one JSON object with token counts,
//! accuracy, and (in `price` mode) costs.

use crate::error::RecordError;
use crate::pricing::{self, Pricing};
use crate::Engine;
use serde_json::Value;

/// Per-call configuration; borrowed from the driver's `StreamConfig` for
/// the lifetime of one `process` call.
pub struct RecordConfig<'a> {
    pub text_field: &'a str,
    pub model: &'a str,
    pub price: bool,
    pub pricing: Option<Pricing>,
}

/// Reusable per-record scratch buffer, reset between records rather than
/// reallocated. One `Scratch` is owned by the single-worker driver loop
/// or by each worker thread; it is never shared.
#[derive(Default)]
pub struct Scratch {
    out_buf: Vec<u8>,
}

impl Scratch {
    pub fn new() -> Self {
        Self {
            out_buf: Vec::with_capacity(4096),
        }
    }
}

/// Parses `line` as one JSON object, enriches it, and serialises the
/// result into `scratch`'s reused buffer. The returned slice borrows from
/// `scratch` and is only valid until the next `process` call on the same
/// `Scratch`.
pub fn process<'s>(
    engine: &Engine,
    scratch: &'s mut Scratch,
    line: &[u8],
    config: &RecordConfig,
) -> Result<&'s [u8], RecordError> {
    scratch.out_buf.clear();

    let mut value: Value = serde_json::from_slice(line).map_err(|_| RecordError::InvalidJson)?;
    let obj = value.as_object_mut().ok_or(RecordError::InvalidJson)?;

    let text = obj
        .get(config.text_field)
        .and_then(Value::as_str)
        .ok_or_else(|| RecordError::MissingField(config.text_field.to_string()))?
        .to_string();

    let (tokens_input, accuracy) = engine.count_tokens(config.model, &text);
    obj.insert("tokens_input".to_string(), Value::from(tokens_input as u64));
    obj.insert("accuracy".to_string(), Value::from(accuracy.as_str()));

    if config.price {
        let tokens_output = obj.get("tokens_output").and_then(Value::as_u64).unwrap_or(0);
        let pricing = config
            .pricing
            .as_ref()
            .ok_or_else(|| RecordError::PricingLookup("no pricing configured for model".into()))?;
        let cost = pricing::evaluate(tokens_input as u64, tokens_output, pricing);
        obj.insert("tokens_output".to_string(), Value::from(cost.tokens_output));
        obj.insert("cost_input_usd".to_string(), serde_json::json!(cost.cost_input_usd));
        obj.insert("cost_output_usd".to_string(), serde_json::json!(cost.cost_output_usd));
        obj.insert("cost_total_usd".to_string(), serde_json::json!(cost.cost_total_usd));
    }

    // `Value` serialization can only fail on non-finite floats, which
    // cannot arise here: token counts are finite and `Pricing::new`
    // already rejects negative rates.
    serde_json::to_writer(&mut scratch.out_buf, &value)
        .map_err(|e| RecordError::TokenizationFailed(format!("serialization failed: {e}")))?;

    Ok(&scratch.out_buf)
}
