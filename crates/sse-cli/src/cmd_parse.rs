/// Implementation of `sse parse`.
///
/// Decodes an SSE stream and writes one compact JSON object per message,
/// keys sorted, one per line.
///
/// Two feeding modes:
///
/// ```text
/// ┌────────────────────┬───────────────────────────────────────────────┐
/// │ Mode               │ Behaviour                                     │
/// ├────────────────────┼───────────────────────────────────────────────┤
/// │ default            │ StreamingDecoder over the file or stdin;      │
/// │                    │ each message is printed as soon as it ends    │
/// │ --chunk-size N     │ Whole input read first, then pushed through   │
/// │                    │ SseTransform in N-byte chunks                 │
/// └────────────────────┴───────────────────────────────────────────────┘
/// ```
///
/// Both modes print the same messages; `--chunk-size` exists to show it.
use std::io::Write;
use std::path::Path;

use anyhow::{Context, Result};
use sse_decoder::{SseMessage, SseTransform, StreamingDecoder, TransformConfig};

use crate::ParseArgs;
use crate::input;

/// Run the `sse parse` command.
///
/// # Errors
///
/// Returns an error if the input cannot be read, contains invalid UTF-8,
/// or the output cannot be written.
pub fn run(args: &ParseArgs) -> Result<()> {
    let config = args.transform.config();
    let mut out = input::open_output(args.output.as_deref())?;

    let count = match args.transform.chunk_size() {
        Some(size) => parse_chunked(&args.input, config, size, &mut out)?,
        None => parse_streaming(&args.input, config, &mut out)?,
    };

    out.flush().context("cannot flush output")?;
    tracing::debug!(count, input = %input::display_name(&args.input), "parse finished");
    Ok(())
}

fn parse_chunked(
    path: &Path,
    config: TransformConfig,
    size: usize,
    out: &mut dyn Write,
) -> Result<u64> {
    let bytes = input::read_all(path)?;
    let name = input::display_name(path);
    let mut transform = SseTransform::new(config);
    let mut count = 0;

    for chunk in bytes.chunks(size) {
        let messages = transform
            .push(chunk)
            .with_context(|| format!("failed to decode {name}"))?;
        for message in &messages {
            write_json_line(out, message)?;
            count += 1;
        }
    }

    if let Some(tail) = transform
        .finish()
        .with_context(|| format!("failed to decode {name}"))?
    {
        write_json_line(out, &tail)?;
        count += 1;
    }
    Ok(count)
}

fn parse_streaming(path: &Path, config: TransformConfig, out: &mut dyn Write) -> Result<u64> {
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("cannot start async runtime")?;

    runtime.block_on(async {
        let reader = input::open_async(path).await?;
        let name = input::display_name(path);
        let mut decoder = StreamingDecoder::with_config(reader, config);
        let mut count = 0;

        while let Some(message) = decoder.next().await {
            let message = message.with_context(|| format!("failed to decode {name}"))?;
            write_json_line(out, &message)?;
            // Downstream of `curl -N` the reader wants each message now.
            out.flush().context("cannot flush output")?;
            count += 1;
        }
        Ok::<_, anyhow::Error>(count)
    })
}

/// Write `message` as one line of JSON.
fn write_json_line(out: &mut dyn Write, message: &SseMessage) -> Result<()> {
    serde_json::to_writer(&mut *out, message.fields()).context("cannot serialize message")?;
    out.write_all(b"\n").context("cannot write output")?;
    Ok(())
}
