/// Implementation of `sse stats`.
///
/// Runs an SSE stream through the transform and prints what happened to
/// its bytes: how many messages came out, how many delimited frames were
/// empty and suppressed, how much trailing input was discarded, and how
/// messages distribute across event names and field names.
///
/// # Example output
///
/// ```text
/// Input:     stream.txt  (282 bytes)
/// Messages:  6
/// Suppressed frames:  1
/// Discarded bytes:    7
///
/// Event             Count
/// ───────────────────────
/// (none)                3
/// update                3
///
/// Field             Count
/// ───────────────────────
/// data                  6
/// event                 3
/// id                    2
/// ```
///
/// With `--json` the same report is printed as a JSON object.
use std::collections::BTreeMap;

use anyhow::{Context, Result};
use serde::Serialize;
use sse_decoder::{DecodeError, SseMessage, SseTransform, TransformConfig};

use crate::StatsArgs;
use crate::input;

/// Label for messages with no `event` field.
const NO_EVENT: &str = "(none)";
/// Label for the empty (comment) field name.
const EMPTY_FIELD: &str = "(comment)";

#[derive(Debug, Default, Serialize)]
struct StatsReport {
    input: String,
    bytes: u64,
    messages: u64,
    suppressed_frames: u64,
    discarded_bytes: u64,
    events: BTreeMap<String, u64>,
    fields: BTreeMap<String, u64>,
}

impl StatsReport {
    fn record(&mut self, message: &SseMessage) {
        let event = message.event().unwrap_or(NO_EVENT);
        *self.events.entry(event.to_owned()).or_default() += 1;
        for (key, _) in message.iter() {
            let key = if key.is_empty() { EMPTY_FIELD } else { key };
            *self.fields.entry(key.to_owned()).or_default() += 1;
        }
    }
}

/// Run the `sse stats` command.
///
/// # Errors
///
/// Returns an error if the input cannot be read or contains invalid UTF-8.
pub fn run(args: &StatsArgs) -> Result<()> {
    let bytes = input::read_all(&args.input)?;
    let name = input::display_name(&args.input);

    let mut report = collect(&bytes, args.transform.config(), args.transform.chunk_size())
        .with_context(|| format!("failed to decode {name}"))?;
    report.input = name;

    if args.json {
        let json = serde_json::to_string_pretty(&report).context("cannot serialize report")?;
        println!("{json}");
    } else {
        print_report(&report);
    }
    Ok(())
}

/// Push `bytes` through a fresh transform and tally the result.
fn collect(
    bytes: &[u8],
    config: TransformConfig,
    chunk_size: Option<usize>,
) -> Result<StatsReport, DecodeError> {
    let mut transform = SseTransform::new(config);
    let mut report = StatsReport::default();
    let size = chunk_size.unwrap_or(bytes.len()).max(1);

    for chunk in bytes.chunks(size) {
        transform.push_with(chunk, |message| report.record(&message))?;
    }
    if let Some(tail) = transform.finish()? {
        report.record(&tail);
    }

    let stats = transform.stats();
    report.bytes = stats.bytes_in;
    report.messages = stats.messages;
    report.suppressed_frames = stats.suppressed_frames;
    report.discarded_bytes = stats.discarded_bytes;
    Ok(report)
}

fn print_report(report: &StatsReport) {
    println!("Input:     {}  ({} bytes)", report.input, report.bytes);
    println!("Messages:  {}", report.messages);
    println!("Suppressed frames:  {}", report.suppressed_frames);
    println!("Discarded bytes:    {}", report.discarded_bytes);

    print_table("Event", &report.events);
    print_table("Field", &report.fields);
}

fn print_table(heading: &str, counts: &BTreeMap<String, u64>) {
    if counts.is_empty() {
        return;
    }
    println!();
    println!("{heading:<16}  {:>5}", "Count");
    println!("{}", "─".repeat(23));
    for (label, count) in counts {
        println!("{label:<16}  {count:>5}");
    }
}
