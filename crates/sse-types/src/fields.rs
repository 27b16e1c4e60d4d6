use sse_wire::trim_field;

use crate::message::{SseMessage, field};

/// How repeated `data` values inside one frame are combined.
///
/// ```text
///   data: a          Concat  → "ab"
///   data: b          Newline → "a\nb"
/// ```
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum DataJoin {
    /// Append with no separator.
    #[default]
    Concat,
    /// Insert `\n` between values.
    Newline,
}

impl DataJoin {
    #[must_use]
    pub fn from_newline_flag(join_with_newline: bool) -> Self {
        if join_with_newline {
            Self::Newline
        } else {
            Self::Concat
        }
    }

    fn separator(self) -> &'static str {
        match self {
            Self::Concat => "",
            Self::Newline => "\n",
        }
    }
}

/// Split one line into a trimmed `(key, value)` pair at its first colon.
///
/// Lines without a colon carry no field and return `None`. A line that
/// starts with `:` yields the empty key. Trimming uses
/// [`sse_wire::is_field_whitespace`]: U+FEFF is stripped, U+0085 is not.
///
/// ```text
///   "  data  :  v  "            → ("data", "v")
///   "data: https://h:8080/p"    → ("data", "https://h:8080/p")
///   ": keep-alive"              → ("", "keep-alive")
///   "garbage"                   → None
/// ```
#[must_use]
pub fn parse_line(line: &str) -> Option<(&str, &str)> {
    let (key, value) = line.split_once(':')?;
    Some((trim_field(key), trim_field(value)))
}

/// Parse a complete frame into a message record.
///
/// The frame is split on `\n` and each line goes through
/// [`parse_line`]. A repeated `data` key is merged according to `join`;
/// any other repeated key keeps its last value. The result may be empty
/// (no line had a colon); callers decide whether to emit it.
#[must_use]
pub fn parse_frame(frame: &str, join: DataJoin) -> SseMessage {
    let mut message = SseMessage::new();

    for (key, value) in frame.split('\n').filter_map(parse_line) {
        if key == field::DATA {
            if let Some(existing) = message.entry_mut(field::DATA) {
                existing.push_str(join.separator());
                existing.push_str(value);
                continue;
            }
        }
        message.insert(key, value);
    }

    message
}
