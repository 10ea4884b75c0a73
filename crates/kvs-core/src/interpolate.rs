//! Placeholder expansion
//!
//! Supported syntax:
//!
//! - `${name}` substitutes the value of `name`
//! - `${name:-default}` substitutes `default` (itself expanded) when `name`
//!   cannot be resolved
//! - `$${` renders a literal `${`
//!
//! Names are looked up in this order:
//!
//! 1. The key being interpolated. A self-reference is never fatal: the
//!    default is used if present, otherwise the placeholder is kept as-is.
//! 2. External [`Variables`]. Their values may contain placeholders and are
//!    expanded in turn; a name that refers back to itself is a recursion error.
//! 3. Entries resolved before the current one. These are already final.

use crate::error::{Error, Result};
use crate::variables::Variables;

/// Default bound on nested substitution
pub const DEFAULT_MAX_DEPTH: usize = 32;

const OPEN: &str = "${";
const ESCAPED_OPEN: &str = "$${";
const DEFAULT_SEPARATOR: &str = ":-";

/// Expands placeholders against a set of external variables.
pub struct Interpolator<'a> {
    variables: &'a dyn Variables,
    max_depth: usize,
}

/// Per-call state
struct Expansion<'r> {
    key: &'r str,
    raw: &'r str,
    resolved: &'r dyn Variables,
    /// External variables currently being expanded, outermost first
    stack: Vec<String>,
}

impl<'a> Interpolator<'a> {
    pub fn new(variables: &'a dyn Variables) -> Self {
        Self {
            variables,
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }

    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    /// Expand every placeholder in `raw`, the value of `key`.
    ///
    /// `resolved` is the view of entries that precede `key`.
    pub fn interpolate(&self, key: &str, raw: &str, resolved: &dyn Variables) -> Result<String> {
        if !raw.contains(OPEN) {
            return Ok(raw.to_string());
        }
        let mut expansion = Expansion {
            key,
            raw,
            resolved,
            stack: Vec::new(),
        };
        self.expand(&mut expansion, raw, 0)
    }

    fn expand(&self, ctx: &mut Expansion<'_>, text: &str, depth: usize) -> Result<String> {
        if !text.contains(OPEN) {
            return Ok(text.to_string());
        }

        let mut out = String::with_capacity(text.len());
        let mut rest = text;
        while let Some(pos) = rest.find('$') {
            out.push_str(&rest[..pos]);
            let tail = &rest[pos..];
            if tail.starts_with(ESCAPED_OPEN) {
                out.push_str(OPEN);
                rest = &tail[ESCAPED_OPEN.len()..];
            } else if let Some(inner) = tail.strip_prefix(OPEN) {
                let close = closing_brace(inner).ok_or_else(|| Error::Interpolation {
                    key: ctx.key.to_string(),
                    raw: ctx.raw.to_string(),
                    message: "unterminated placeholder".to_string(),
                    location: None,
                })?;
                out.push_str(&self.resolve(ctx, &inner[..close], depth)?);
                rest = &inner[close + 1..];
            } else {
                out.push('$');
                rest = &tail[1..];
            }
        }
        out.push_str(rest);
        Ok(out)
    }

    /// Resolve the body of one placeholder (the text between `${` and `}`).
    fn resolve(&self, ctx: &mut Expansion<'_>, body: &str, depth: usize) -> Result<String> {
        let (name_part, default) = split_default(body);
        if depth >= self.max_depth {
            return Err(Error::Recursion {
                key: ctx.key.to_string(),
                raw: ctx.raw.to_string(),
                name: name_part.to_string(),
                location: None,
            });
        }

        let name = self.expand(ctx, name_part, depth + 1)?;

        if name == ctx.key {
            return match default {
                Some(default) => self.expand(ctx, default, depth + 1),
                None => Ok(format!("{OPEN}{body}}}")),
            };
        }

        if let Some(value) = self.variables.get_value(&name) {
            if ctx.stack.contains(&name) {
                return Err(Error::Recursion {
                    key: ctx.key.to_string(),
                    raw: ctx.raw.to_string(),
                    name,
                    location: None,
                });
            }
            ctx.stack.push(name);
            let expanded = self.expand(ctx, &value, depth + 1);
            ctx.stack.pop();
            return expanded;
        }

        if let Some(value) = ctx.resolved.get_value(&name) {
            return Ok(value);
        }

        match default {
            Some(default) => self.expand(ctx, default, depth + 1),
            None => Err(Error::MissingVariable {
                key: ctx.key.to_string(),
                raw: ctx.raw.to_string(),
                name,
                location: None,
            }),
        }
    }
}

/// Byte offset of the `}` closing a placeholder whose body starts at `text[0]`.
fn closing_brace(text: &str) -> Option<usize> {
    let bytes = text.as_bytes();
    let mut depth = 1usize;
    let mut i = 0;
    while i < bytes.len() {
        match bytes[i] {
            b'$' if bytes.get(i + 1) == Some(&b'{') => {
                depth += 1;
                i += 2;
                continue;
            }
            b'}' => {
                depth -= 1;
                if depth == 0 {
                    return Some(i);
                }
            }
            _ => {}
        }
        i += 1;
    }
    None
}

/// Split `name:-default` at the first separator outside nested placeholders.
fn split_default(body: &str) -> (&str, Option<&str>) {
    let bytes = body.as_bytes();
    let mut depth = 0usize;
    let mut i = 0;
    while i < bytes.len() {
        match bytes[i] {
            b'$' if bytes.get(i + 1) == Some(&b'{') => {
                depth += 1;
                i += 2;
                continue;
            }
            b'}' => depth = depth.saturating_sub(1),
            b':' if depth == 0 && body[i..].starts_with(DEFAULT_SEPARATOR) => {
                return (&body[..i], Some(&body[i + DEFAULT_SEPARATOR.len()..]));
            }
            _ => {}
        }
        i += 1;
    }
    (body, None)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::variables::MapVariables;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    fn none() -> MapVariables {
        MapVariables::new()
    }

    #[rstest]
    #[case("plain value", "plain value")]
    #[case("${stuff}", "/home/x")]
    #[case("${stuff}/bin", "/home/x/bin")]
    #[case("${MISSING:-${stuff}}", "/home/x")]
    #[case("${MISSING:-}", "")]
    #[case("${MISSING:-a:-b}", "a:-b")]
    #[case("$${literal}", "${literal}")]
    #[case("cost: $5", "cost: $5")]
    #[case("${na${suffix}}", "nested")]
    fn expands(#[case] raw: &str, #[case] expected: &str) {
        let external = MapVariables::new().with("suffix", "me").with("name", "nested");
        let resolved = MapVariables::new().with("stuff", "/home/x");
        let out = Interpolator::new(&external)
            .interpolate("blah", raw, &resolved)
            .unwrap();
        assert_eq!(out, expected);
    }

    #[test]
    fn missing_variable_names_the_variable() {
        let err = Interpolator::new(&none())
            .interpolate("blah", "${MISSING}", &none())
            .unwrap_err();
        match err {
            Error::MissingVariable { key, raw, name, .. } => {
                assert_eq!(key, "blah");
                assert_eq!(raw, "${MISSING}");
                assert_eq!(name, "MISSING");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn own_key_is_not_fatal() {
        let variables = none();
        let interpolator = Interpolator::new(&variables);
        assert_eq!(interpolator.interpolate("a", "${a}", &none()).unwrap(), "${a}");
        assert_eq!(
            interpolator.interpolate("a", "${a:-fallback}", &none()).unwrap(),
            "fallback"
        );
    }

    #[test]
    fn external_values_are_expanded() {
        let external = MapVariables::new().with("home", "/home/x").with("bin", "${home}/bin");
        let out = Interpolator::new(&external)
            .interpolate("path", "${bin}", &none())
            .unwrap();
        assert_eq!(out, "/home/x/bin");
    }

    #[test]
    fn external_values_win_over_resolved_entries() {
        let external = MapVariables::new().with("host", "from-env");
        let resolved = MapVariables::new().with("host", "from-file");
        let out = Interpolator::new(&external)
            .interpolate("url", "http://${host}", &resolved)
            .unwrap();
        assert_eq!(out, "http://from-env");
    }

    #[test]
    fn resolved_entries_are_final() {
        let resolved = MapVariables::new().with("a", "${not-expanded}");
        let out = Interpolator::new(&none())
            .interpolate("b", "${a}", &resolved)
            .unwrap();
        assert_eq!(out, "${not-expanded}");
    }

    #[test]
    fn mutual_reference_is_a_recursion_error() {
        let external = MapVariables::new().with("a", "${b}").with("b", "${a}");
        let err = Interpolator::new(&external)
            .interpolate("x", "${a}", &none())
            .unwrap_err();
        assert!(matches!(err, Error::Recursion { ref name, .. } if name == "a"), "got {err}");
    }

    #[test]
    fn depth_limit_is_a_recursion_error() {
        let external = MapVariables::new()
            .with("l1", "${l2}")
            .with("l2", "${l3}")
            .with("l3", "end");
        let ok = Interpolator::new(&external).interpolate("x", "${l1}", &none());
        assert_eq!(ok.unwrap(), "end");

        let err = Interpolator::new(&external)
            .with_max_depth(2)
            .interpolate("x", "${l1}", &none())
            .unwrap_err();
        assert!(matches!(err, Error::Recursion { .. }), "got {err}");
    }

    #[test]
    fn unterminated_placeholder_is_an_error() {
        let err = Interpolator::new(&none())
            .interpolate("k", "${open", &none())
            .unwrap_err();
        assert!(matches!(err, Error::Interpolation { .. }), "got {err}");
        assert!(err.is_interpolation());
    }

    #[test]
    fn split_default_ignores_nested_separators() {
        assert_eq!(split_default("a"), ("a", None));
        assert_eq!(split_default("a:-b"), ("a", Some("b")));
        assert_eq!(split_default("${x:-y}:-z"), ("${x:-y}", Some("z")));
    }
}
