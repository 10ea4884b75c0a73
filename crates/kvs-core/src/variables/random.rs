//! Generated `random.*` variables

use rand::Rng;

use super::Variables;

pub const RANDOM_PREFIX: &str = "random.";

/// Upper bound for `random.bytes(n)`
const MAX_RANDOM_BYTES: usize = 1024;

/// Synthesizes a fresh value each time a `random.*` name is looked up.
///
/// Supported names (after the prefix):
///
/// - `int`, `long` - any `i32` / `i64`
/// - `int(max)`, `long(max)` - in `0..max`
/// - `int[min,max]`, `long[min,max]` - in `min..max`
/// - `uuid` - a v4 UUID
/// - `value` - 16 random bytes, hex encoded
/// - `bytes(n)` - `n` random bytes, hex encoded
///
/// Nothing is generated unless asked for; unrecognized or invalid names
/// resolve to nothing.
#[derive(Debug, Clone)]
pub struct RandomVariables {
    prefix: String,
}

impl RandomVariables {
    pub fn new() -> Self {
        Self::with_prefix(RANDOM_PREFIX)
    }

    pub fn with_prefix(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
        }
    }
}

impl Default for RandomVariables {
    fn default() -> Self {
        Self::new()
    }
}

impl Variables for RandomVariables {
    fn get_value(&self, name: &str) -> Option<String> {
        let pattern = name.strip_prefix(self.prefix.as_str())?;
        generate(pattern, &mut rand::thread_rng())
    }
}

fn generate(pattern: &str, rng: &mut impl Rng) -> Option<String> {
    match pattern {
        "int" => return Some(rng.r#gen::<i32>().to_string()),
        "long" => return Some(rng.r#gen::<i64>().to_string()),
        "uuid" => return Some(uuid::Uuid::new_v4().to_string()),
        "value" => return Some(random_hex(rng, 16)),
        _ => {}
    }

    if let Some(args) = arguments(pattern, "bytes") {
        let [count] = args.as_slice() else {
            return None;
        };
        let count = usize::try_from(*count).ok().filter(|n| *n <= MAX_RANDOM_BYTES)?;
        return Some(random_hex(rng, count));
    }
    if let Some(args) = arguments(pattern, "int") {
        let (min, max) = bounds(&args)?;
        let min = i32::try_from(min).ok()?;
        let max = i32::try_from(max).ok()?;
        return Some(rng.gen_range(min..max).to_string());
    }
    if let Some(args) = arguments(pattern, "long") {
        let (min, max) = bounds(&args)?;
        return Some(rng.gen_range(min..max).to_string());
    }
    None
}

fn random_hex(rng: &mut impl Rng, count: usize) -> String {
    let mut bytes = vec![0u8; count];
    rng.fill(bytes.as_mut_slice());
    hex::encode(bytes)
}

/// Parse `kind(a)` or `kind[a,b]` into its numeric arguments.
fn arguments(pattern: &str, kind: &str) -> Option<Vec<i64>> {
    let rest = pattern.strip_prefix(kind)?;
    let inner = rest
        .strip_prefix('(')
        .and_then(|r| r.strip_suffix(')'))
        .or_else(|| rest.strip_prefix('[').and_then(|r| r.strip_suffix(']')))?;
    inner.split(',').map(|n| n.trim().parse().ok()).collect()
}

/// A single argument is an exclusive maximum from zero; two are `min..max`.
fn bounds(args: &[i64]) -> Option<(i64, i64)> {
    let (min, max) = match args {
        [max] => (0, *max),
        [min, max] => (*min, *max),
        _ => return None,
    };
    (min < max).then_some((min, max))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn value(name: &str) -> Option<String> {
        RandomVariables::new().get_value(name)
    }

    #[test]
    fn ignores_names_outside_prefix() {
        assert_eq!(value("int"), None);
        assert_eq!(value("other.int"), None);
    }

    #[test]
    fn plain_int_and_long() {
        assert!(value("random.int").unwrap().parse::<i32>().is_ok());
        assert!(value("random.long").unwrap().parse::<i64>().is_ok());
    }

    #[rstest]
    #[case("random.int(10)", 0, 10)]
    #[case("random.int[1024,65536]", 1024, 65536)]
    #[case("random.long(5)", 0, 5)]
    #[case("random.long[-3, 3]", -3, 3)]
    fn ranges_are_respected(#[case] name: &str, #[case] min: i64, #[case] max: i64) {
        for _ in 0..50 {
            let n: i64 = value(name).unwrap().parse().unwrap();
            assert!(n >= min && n < max, "{name} produced {n}");
        }
    }

    #[rstest]
    #[case("random.int(0)")]
    #[case("random.int[5,5]")]
    #[case("random.int[a,b]")]
    #[case("random.int(1,2,3)")]
    #[case("random.int(99999999999)")]
    #[case("random.bytes(4096)")]
    #[case("random.nope")]
    fn invalid_specs_resolve_to_nothing(#[case] name: &str) {
        assert_eq!(value(name), None);
    }

    #[test]
    fn uuid_value_and_bytes() {
        assert!(uuid::Uuid::parse_str(&value("random.uuid").unwrap()).is_ok());
        let hex_value = value("random.value").unwrap();
        assert_eq!(hex_value.len(), 32);
        assert!(hex_value.chars().all(|c| c.is_ascii_hexdigit()));
        assert_eq!(value("random.bytes(3)").unwrap().len(), 6);
    }

    #[test]
    fn generated_lazily_per_lookup() {
        assert_ne!(value("random.uuid"), value("random.uuid"));
    }

    #[test]
    fn custom_prefix() {
        let vars = RandomVariables::with_prefix("gen.");
        assert!(vars.get_value("gen.uuid").is_some());
        assert!(vars.get_value("random.uuid").is_none());
    }
}
