//! Whitespace splitting of a raw input line into an argument list.

/// Characters that separate arguments: space, tab, carriage return, newline, bell.
pub const DELIMITERS: [char; 5] = [' ', '\t', '\r', '\n', '\x07'];

/// Split `line` on runs of [`DELIMITERS`].
///
/// The result owns its strings, so the raw line can be dropped right away.
/// An empty or delimiter-only line yields an empty list. No quoting,
/// escaping or expansion is performed.
pub fn tokenize(line: &str) -> Vec<String> {
    line.split(|c: char| DELIMITERS.contains(&c))
        .filter(|token| !token.is_empty())
        .map(str::to_owned)
        .collect()
}
