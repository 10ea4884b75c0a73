//! Resource flags

use std::fmt;
use std::str::FromStr;

use serde::Serialize;

use crate::error::{Error, Result};

/// Behavioral flag attached to a resource and to the entries it produces
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Flag {
    /// A missing resource is skipped instead of failing the resolution
    NoRequire,
    /// Entries are only scanned for directives, never added to the result
    NoAdd,
    /// Entries skip placeholder expansion
    NoInterpolate,
    /// Entry values are redacted in every rendered output
    Sensitive,
    /// Directive keys are ignored; no child resources are loaded
    NoLoadChildren,
    /// A resource that yields no entries is an error
    NoEmpty,
}

impl Flag {
    pub const ALL: [Flag; 6] = [
        Flag::NoRequire,
        Flag::NoAdd,
        Flag::NoInterpolate,
        Flag::Sensitive,
        Flag::NoLoadChildren,
        Flag::NoEmpty,
    ];

    /// The canonical token for this flag, e.g. `NO_REQUIRE`
    pub fn name(&self) -> &'static str {
        match self {
            Flag::NoRequire => "NO_REQUIRE",
            Flag::NoAdd => "NO_ADD",
            Flag::NoInterpolate => "NO_INTERPOLATE",
            Flag::Sensitive => "SENSITIVE",
            Flag::NoLoadChildren => "NO_LOAD_CHILDREN",
            Flag::NoEmpty => "NO_EMPTY",
        }
    }

    fn bit(self) -> u8 {
        1 << (self as u8)
    }
}

impl FromStr for Flag {
    type Err = Error;

    /// Parse a flag token, case-insensitively. `OPTIONAL` is accepted for
    /// `NO_REQUIRE` and `REDACT` for `SENSITIVE`.
    fn from_str(token: &str) -> Result<Self> {
        let upper = token.trim().to_ascii_uppercase();
        match upper.as_str() {
            "OPTIONAL" => return Ok(Flag::NoRequire),
            "REDACT" => return Ok(Flag::Sensitive),
            _ => {}
        }
        Flag::ALL
            .into_iter()
            .find(|flag| flag.name() == upper)
            .ok_or_else(|| Error::UnknownFlag {
                token: token.trim().to_string(),
            })
    }
}

impl fmt::Display for Flag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A set of [`Flag`]s
#[derive(Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Flags(u8);

impl Flags {
    pub const EMPTY: Flags = Flags(0);

    pub fn contains(&self, flag: Flag) -> bool {
        self.0 & flag.bit() != 0
    }

    pub fn insert(&mut self, flag: Flag) {
        self.0 |= flag.bit();
    }

    /// Return a copy with `flag` added.
    pub fn with(mut self, flag: Flag) -> Self {
        self.insert(flag);
        self
    }

    pub fn union(self, other: Flags) -> Self {
        Flags(self.0 | other.0)
    }

    pub fn is_empty(&self) -> bool {
        self.0 == 0
    }

    /// Iterate the contained flags in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = Flag> + '_ {
        Flag::ALL.into_iter().filter(|flag| self.contains(*flag))
    }

    /// Parse a comma-separated list of flag tokens. Blank tokens are skipped.
    pub fn parse_list(list: &str) -> Result<Self> {
        list.split(',')
            .map(str::trim)
            .filter(|token| !token.is_empty())
            .map(str::parse::<Flag>)
            .collect()
    }
}

impl From<Flag> for Flags {
    fn from(flag: Flag) -> Self {
        Flags::EMPTY.with(flag)
    }
}

impl FromIterator<Flag> for Flags {
    fn from_iter<I: IntoIterator<Item = Flag>>(iter: I) -> Self {
        iter.into_iter().fold(Flags::EMPTY, Flags::with)
    }
}

impl std::ops::BitOr<Flag> for Flags {
    type Output = Flags;

    fn bitor(self, flag: Flag) -> Flags {
        self.with(flag)
    }
}

impl std::ops::BitOr for Flag {
    type Output = Flags;

    fn bitor(self, other: Flag) -> Flags {
        Flags::from(self).with(other)
    }
}

impl fmt::Debug for Flags {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.iter()).finish()
    }
}

impl fmt::Display for Flags {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names: Vec<&str> = self.iter().map(|flag| flag.name()).collect();
        write!(f, "[{}]", names.join(", "))
    }
}

impl Serialize for Flags {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_seq(self.iter())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("NO_REQUIRE", Flag::NoRequire)]
    #[case("no_require", Flag::NoRequire)]
    #[case(" Optional ", Flag::NoRequire)]
    #[case("no_add", Flag::NoAdd)]
    #[case("NO_INTERPOLATE", Flag::NoInterpolate)]
    #[case("sensitive", Flag::Sensitive)]
    #[case("redact", Flag::Sensitive)]
    #[case("no_load_children", Flag::NoLoadChildren)]
    #[case("NO_EMPTY", Flag::NoEmpty)]
    fn parses_tokens(#[case] token: &str, #[case] expected: Flag) {
        assert_eq!(token.parse::<Flag>().unwrap(), expected);
    }

    #[test]
    fn unknown_token_is_error() {
        let err = "NO_SUCH".parse::<Flag>().unwrap_err();
        assert!(matches!(err, Error::UnknownFlag { ref token } if token == "NO_SUCH"));
    }

    #[test]
    fn parse_list_unions_tokens() {
        let flags = Flags::parse_list("no_add, SENSITIVE,,").unwrap();
        assert!(flags.contains(Flag::NoAdd));
        assert!(flags.contains(Flag::Sensitive));
        assert!(!flags.contains(Flag::NoRequire));
        assert_eq!(flags.to_string(), "[NO_ADD, SENSITIVE]");
    }

    #[test]
    fn parse_list_rejects_unknown_token() {
        assert!(Flags::parse_list("NO_ADD,bogus").is_err());
    }

    #[test]
    fn set_operations() {
        let flags = Flag::NoRequire | Flag::Sensitive;
        assert_eq!(flags.union(Flag::NoAdd.into()).iter().count(), 3);
        assert!(Flags::EMPTY.is_empty());
        assert_eq!(Flags::EMPTY.to_string(), "[]");
    }

    #[test]
    fn serializes_as_names() {
        let json = serde_json::to_string(&(Flag::NoAdd | Flag::NoEmpty)).unwrap();
        assert_eq!(json, r#"["NO_ADD","NO_EMPTY"]"#);
    }
}
