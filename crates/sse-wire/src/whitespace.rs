/// Whitespace stripped from frames, keys, and values.
///
/// This is the ECMAScript `WhiteSpace` + `LineTerminator` set that SSE
/// producers written against `String.prototype.trim` expect. It differs
/// from [`char::is_whitespace`] in two code points:
///
/// ```text
///   U+FEFF  ZERO WIDTH NO-BREAK SPACE   stripped here, kept by char::is_whitespace
///   U+0085  NEXT LINE                   kept here, stripped by char::is_whitespace
/// ```
#[must_use]
pub fn is_field_whitespace(c: char) -> bool {
    match c {
        '\u{FEFF}' => true,
        '\u{0085}' => false,
        other => other.is_whitespace(),
    }
}

/// Trim [`is_field_whitespace`] characters from both ends of `s`.
#[must_use]
pub fn trim_field(s: &str) -> &str {
    s.trim_matches(is_field_whitespace)
}
