//! Properties media (the default `key=value` format)

use crate::error::{Error, Result};
use crate::media::{Media, Pair, decode};

pub const MEDIA_TYPE: &str = "text/x-java-properties";

/// Media for `.properties` style content.
///
/// Supports `=`, `:` and whitespace separators, `#`/`!` comment lines,
/// backslash line continuations and the usual escapes (`\t`, `\n`, `\r`,
/// `\f`, `\uXXXX`).
#[derive(Debug, Default)]
pub struct PropertiesMedia;

impl PropertiesMedia {
    pub fn new() -> Self {
        Self
    }
}

impl Media for PropertiesMedia {
    fn media_type(&self) -> &str {
        MEDIA_TYPE
    }

    fn file_extensions(&self) -> &[&str] {
        &["properties"]
    }

    fn parse(&self, input: &[u8]) -> Result<Vec<Pair>> {
        let source = decode(MEDIA_TYPE, input)?;
        let mut pairs = Vec::new();
        for (line_num, line) in logical_lines(source) {
            let (key, value) = split_entry(&line);
            let key = unescape(key).map_err(|m| line_error(line_num, m))?;
            let value = unescape(value).map_err(|m| line_error(line_num, m))?;
            pairs.push((key, value));
        }
        Ok(pairs)
    }

    fn format(&self, entries: &[(&str, &str)]) -> Result<Vec<u8>> {
        let mut out = String::new();
        for (key, value) in entries {
            out.push_str(&escape(key, true));
            out.push('=');
            out.push_str(&escape(value, false));
            out.push('\n');
        }
        Ok(out.into_bytes())
    }
}

fn line_error(line_num: usize, message: String) -> Error {
    Error::parse(MEDIA_TYPE, format!("line {line_num}: {message}"))
}

/// Join continuation lines and drop blanks and comments.
///
/// Yields the 1-based number of the first physical line with each logical line.
fn logical_lines(source: &str) -> Vec<(usize, String)> {
    let mut lines = Vec::new();
    let mut current: Option<(usize, String)> = None;

    for (idx, raw) in source.lines().enumerate() {
        let trimmed = raw.trim_start();
        let continuing = current.is_some();

        if !continuing && (trimmed.is_empty() || trimmed.starts_with('#') || trimmed.starts_with('!'))
        {
            continue;
        }

        let (text, continues) = strip_continuation(trimmed);
        let entry = current.get_or_insert_with(|| (idx + 1, String::new()));
        entry.1.push_str(text);

        if !continues {
            if let Some(done) = current.take() {
                lines.push(done);
            }
        }
    }

    if let Some(done) = current.take() {
        lines.push(done);
    }
    lines
}

/// A line continues when it ends with an odd number of backslashes.
fn strip_continuation(line: &str) -> (&str, bool) {
    let trailing = line.chars().rev().take_while(|c| *c == '\\').count();
    if trailing % 2 == 1 {
        (&line[..line.len() - 1], true)
    } else {
        (line, false)
    }
}

/// Split a logical line into its (still escaped) key and value.
fn split_entry(line: &str) -> (&str, &str) {
    let mut escaped = false;
    let mut key_end = line.len();
    for (idx, c) in line.char_indices() {
        if escaped {
            escaped = false;
            continue;
        }
        match c {
            '\\' => escaped = true,
            '=' | ':' | ' ' | '\t' | '\x0c' => {
                key_end = idx;
                break;
            }
            _ => {}
        }
    }

    let key = &line[..key_end];
    let rest = line[key_end..].trim_start_matches([' ', '\t', '\x0c']);
    let rest = rest
        .strip_prefix('=')
        .or_else(|| rest.strip_prefix(':'))
        .unwrap_or(rest);
    (key, rest.trim_start_matches([' ', '\t', '\x0c']))
}

fn unescape(text: &str) -> std::result::Result<String, String> {
    let mut out = String::with_capacity(text.len());
    let mut chars = text.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('t') => out.push('\t'),
            Some('n') => out.push('\n'),
            Some('r') => out.push('\r'),
            Some('f') => out.push('\x0c'),
            Some('u') => {
                let hex: String = chars.by_ref().take(4).collect();
                let code = u32::from_str_radix(&hex, 16)
                    .ok()
                    .filter(|_| hex.len() == 4)
                    .ok_or_else(|| format!("malformed \\u escape '\\u{hex}'"))?;
                let decoded = char::from_u32(code)
                    .ok_or_else(|| format!("invalid code point '\\u{hex}'"))?;
                out.push(decoded);
            }
            Some(other) => out.push(other),
            None => {}
        }
    }
    Ok(out)
}

fn escape(text: &str, is_key: bool) -> String {
    let mut out = String::with_capacity(text.len());
    for (idx, c) in text.chars().enumerate() {
        match c {
            '\\' => out.push_str("\\\\"),
            '\t' => out.push_str("\\t"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\x0c' => out.push_str("\\f"),
            '=' | ':' if is_key => {
                out.push('\\');
                out.push(c);
            }
            ' ' if is_key || idx == 0 => out.push_str("\\ "),
            '#' | '!' if idx == 0 => {
                out.push('\\');
                out.push(c);
            }
            _ => out.push(c),
        }
    }
    out
}
