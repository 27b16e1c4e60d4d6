/// Implementation of `sse encode`.
///
/// Reads JSON-lines records and writes them as an SSE stream. Each record
/// becomes one message; its string values are used verbatim, any other
/// JSON value is written as its JSON text (`3000`, `true`, `null`).
///
/// # Example
///
/// ```text
/// $ printf '{"event":"tick","data":"a\\nb","retry":500}\n' | sse encode -
/// event: tick
/// retry: 500
/// data: a
/// data: b
///
/// ```
use std::collections::BTreeMap;
use std::io::Write;

use anyhow::{Context, Result};
use serde_json::Value;
use sse_encoder::SseEncoder;
use sse_types::SseMessage;

use crate::EncodeArgs;
use crate::input;

/// Run the `sse encode` command.
///
/// # Errors
///
/// Returns an error if the input is not UTF-8, a line is not a JSON
/// object, or a record cannot be represented on the wire (a field name
/// containing `:`, a line break in a non-`data` value).
pub fn run(args: &EncodeArgs) -> Result<()> {
    let bytes = input::read_all(&args.input)?;
    let name = input::display_name(&args.input);
    let text = std::str::from_utf8(&bytes).with_context(|| format!("{name} is not UTF-8"))?;

    let mut encoder = SseEncoder::new();
    for (line_no, line) in text.lines().enumerate() {
        if line.trim().is_empty() {
            continue;
        }
        let record: BTreeMap<String, Value> = serde_json::from_str(line)
            .with_context(|| format!("{name}:{}: expected a JSON object", line_no + 1))?;
        encoder.add_message(to_message(record));
    }

    let mut out = input::open_output(args.output.as_deref())?;
    let written = encoder
        .write_to(&mut out)
        .with_context(|| format!("cannot encode records from {name}"))?;
    out.flush().context("cannot flush output")?;

    tracing::debug!(messages = encoder.len(), bytes = written, "encode finished");
    Ok(())
}

/// Convert one JSON record into a message.
fn to_message(record: BTreeMap<String, Value>) -> SseMessage {
    record
        .into_iter()
        .map(|(key, value)| {
            let value = match value {
                Value::String(s) => s,
                other => other.to_string(),
            };
            (key, value)
        })
        .collect()
}
