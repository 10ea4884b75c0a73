//! Dotenv media

use tracing::debug;

use crate::error::{Error, Result};
use crate::media::{Media, Pair, decode};

pub const MEDIA_TYPE: &str = "text/x-dotenv";

/// Media for `.env` files: `KEY=value` lines with optional `export`
/// prefix, quoted values and trailing `#` comments.
#[derive(Debug, Default)]
pub struct DotenvMedia;

impl DotenvMedia {
    pub fn new() -> Self {
        Self
    }
}

impl Media for DotenvMedia {
    fn media_type(&self) -> &str {
        MEDIA_TYPE
    }

    fn file_extensions(&self) -> &[&str] {
        &["env"]
    }

    fn parse(&self, input: &[u8]) -> Result<Vec<Pair>> {
        let content = decode(MEDIA_TYPE, input)?;
        let mut vars = Vec::new();

        for (line_num, line) in content.lines().enumerate() {
            let line = line.trim();

            // Skip comments and empty lines
            if line.is_empty() || line.starts_with('#') {
                continue;
            }

            let line = line.strip_prefix("export ").map(str::trim_start).unwrap_or(line);

            let Some((key, value)) = line.split_once('=') else {
                return Err(Error::parse(
                    MEDIA_TYPE,
                    format!("line {}: expected KEY=value", line_num + 1),
                ));
            };

            let key = key.trim();
            if key.is_empty() {
                debug!("Skipping empty key at line {}", line_num + 1);
                continue;
            }

            let value = parse_value(value.trim())
                .map_err(|m| Error::parse(MEDIA_TYPE, format!("line {}: {m}", line_num + 1)))?;
            vars.push((key.to_string(), value));
        }

        Ok(vars)
    }

    fn format(&self, entries: &[(&str, &str)]) -> Result<Vec<u8>> {
        let mut out = String::new();
        for (key, value) in entries {
            if key.is_empty() || key.contains(['=', '\n']) {
                return Err(Error::format(MEDIA_TYPE, format!("invalid key '{key}'")));
            }
            out.push_str(key);
            out.push('=');
            if needs_quotes(value) {
                out.push('"');
                for c in value.chars() {
                    match c {
                        '"' => out.push_str("\\\""),
                        '\\' => out.push_str("\\\\"),
                        '\n' => out.push_str("\\n"),
                        _ => out.push(c),
                    }
                }
                out.push('"');
            } else {
                out.push_str(value);
            }
            out.push('\n');
        }
        Ok(out.into_bytes())
    }
}

fn needs_quotes(value: &str) -> bool {
    value.is_empty()
        || value.trim() != value
        || value.contains(['#', '"', '\'', '\\', '\n'])
}

fn parse_value(value: &str) -> std::result::Result<String, String> {
    if let Some(rest) = value.strip_prefix('"') {
        let mut out = String::new();
        let mut chars = rest.chars();
        while let Some(c) = chars.next() {
            match c {
                '"' => return Ok(out),
                '\\' => match chars.next() {
                    Some('n') => out.push('\n'),
                    Some('t') => out.push('\t'),
                    Some(other) => out.push(other),
                    None => break,
                },
                _ => out.push(c),
            }
        }
        return Err("unterminated double-quoted value".to_string());
    }

    if let Some(rest) = value.strip_prefix('\'') {
        return rest
            .find('\'')
            .map(|end| rest[..end].to_string())
            .ok_or_else(|| "unterminated single-quoted value".to_string());
    }

    // Remove inline comments (only when preceded by whitespace)
    let value = match value.find(" #") {
        Some(idx) => &value[..idx],
        None => value,
    };
    Ok(value.trim().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn parse(source: &str) -> Vec<Pair> {
        DotenvMedia::new().parse(source.as_bytes()).unwrap()
    }

    fn pair(k: &str, v: &str) -> Pair {
        (k.to_string(), v.to_string())
    }

    #[test]
    fn test_parse_basic() {
        assert_eq!(
            parse("KEY=value\nANOTHER=123"),
            vec![pair("KEY", "value"), pair("ANOTHER", "123")]
        );
    }

    #[test]
    fn test_parse_quotes_and_comments() {
        let vars = parse(
            "# header\nexport A=\"quoted # not comment\"\nB='single'\nC=plain # trailing\nD=a#b\n",
        );
        assert_eq!(
            vars,
            vec![
                pair("A", "quoted # not comment"),
                pair("B", "single"),
                pair("C", "plain"),
                pair("D", "a#b"),
            ]
        );
    }

    #[test]
    fn test_parse_escapes_in_double_quotes() {
        assert_eq!(parse(r#"X="a\nb \"c\"""#), vec![pair("X", "a\nb \"c\"")]);
    }

    #[test]
    fn test_missing_equals_is_error() {
        let err = DotenvMedia::new().parse(b"A=1\nNOPE\n").unwrap_err();
        assert!(err.to_string().contains("line 2"), "got: {err}");
    }

    #[test]
    fn test_unterminated_quote_is_error() {
        assert!(DotenvMedia::new().parse(b"A=\"open").is_err());
    }

    #[test]
    fn test_format_quotes_when_needed() {
        let out = DotenvMedia::new()
            .format(&[("A", "plain"), ("B", "has space "), ("C", "")])
            .unwrap();
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "A=plain\nB=\"has space \"\nC=\"\"\n"
        );
    }
}
