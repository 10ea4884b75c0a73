//! Tests for media selection and rendering through the registry

use kvs_media::{Media, MediaRegistry};
use pretty_assertions::assert_eq;
use rstest::rstest;

#[rstest]
#[case("classpath:/app.properties", "text/x-java-properties")]
#[case("file:///etc/app/.env", "text/x-dotenv")]
#[case("memory:conf.JSON", "application/json")]
#[case("/srv/app.toml", "application/toml")]
#[case("https://example.com/app.yml?rev=2", "application/yaml")]
fn test_media_is_sniffed_from_uri(#[case] uri: &str, #[case] expected: &str) {
    let registry = MediaRegistry::with_builtins();

    let media = registry.for_uri(uri).expect("Should recognise extension");

    assert_eq!(media.media_type(), expected);
}

#[test]
fn test_unknown_extension_falls_back_to_properties() {
    let registry = MediaRegistry::with_builtins();

    assert!(registry.for_uri("memory:app.ini").is_none());
    assert_eq!(registry.fallback().media_type(), "text/x-java-properties");
}

#[rstest]
#[case("json")]
#[case("application/json")]
#[case("APPLICATION/JSON")]
fn test_lookup_by_name(#[case] name: &str) {
    let registry = MediaRegistry::with_builtins();

    assert_eq!(registry.by_name(name).map(|m| m.media_type()), Some("application/json"));
}

#[test]
fn test_structured_media_agree_on_flattened_keys() {
    let registry = MediaRegistry::with_builtins();
    let json = br#"{"db": {"host": "localhost", "ports": [5432, 5433]}}"#;
    let toml = b"[db]\nhost = \"localhost\"\nports = [5432, 5433]\n";
    let yaml = b"db:\n  host: localhost\n  ports:\n    - 5432\n    - 5433\n";

    let expected = vec![
        ("db.host".to_string(), "localhost".to_string()),
        ("db.ports[0]".to_string(), "5432".to_string()),
        ("db.ports[1]".to_string(), "5433".to_string()),
    ];
    for (name, input) in [("json", &json[..]), ("toml", &toml[..]), ("yaml", &yaml[..])] {
        let media = registry.by_name(name).unwrap();
        assert_eq!(media.parse(input).unwrap(), expected, "{name}");
    }
}

#[test]
fn test_formatted_output_parses_back() {
    let registry = MediaRegistry::with_builtins();
    let entries = [("server.port", "8080"), ("greeting", "hello world"), ("path", "C:\\tmp")];

    for media in registry.iter() {
        let bytes = media.format(&entries).unwrap();
        let parsed = media.parse(&bytes).unwrap();
        let parsed: Vec<(&str, &str)> = parsed.iter().map(|(k, v)| (k.as_str(), v.as_str())).collect();
        assert_eq!(parsed, entries.to_vec(), "{}", media.media_type());
    }
}
