// Integration tests for jsontree using test fixtures
use jsontree::{parse_named, ParseError, Parsed, Value};
use std::fs;
use std::path::PathBuf;

fn get_test_file_path(subdir: &str, filename: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join(subdir)
        .join(filename)
}

fn read_test_file(subdir: &str, filename: &str) -> String {
    let path = get_test_file_path(subdir, filename);
    fs::read_to_string(&path).unwrap_or_else(|_| panic!("Failed to read test file: {:?}", path))
}

fn parse_fixture(subdir: &str, filename: &str) -> Parsed {
    let content = read_test_file(subdir, filename);
    parse_named(&content, filename)
}

// Tests for well-formed files that should parse without a single error
mod ok_tests {
    use super::*;

    fn parse_ok(filename: &str) -> Value {
        let parsed = parse_fixture("ok", filename);
        assert!(
            parsed.is_clean(),
            "Should parse cleanly: {:?}",
            parsed.errors
        );
        parsed.value
    }

    #[test]
    fn test_primitives() {
        let value = parse_ok("primitives.json");
        assert_eq!(value.pointer("/string").unwrap().as_str(), Ok("hello"));
        assert_eq!(value.pointer("/empty_string").unwrap().as_str(), Ok(""));
        assert_eq!(value.pointer("/integer").unwrap().as_int(), Ok(42));
        assert_eq!(value.pointer("/negative").unwrap().as_int(), Ok(-17));
        assert_eq!(value.pointer("/float").unwrap().as_float(), Ok(3.25));
        assert_eq!(value.pointer("/exponent").unwrap().as_float(), Ok(6.02e23));
        assert_eq!(value.pointer("/yes").unwrap().as_bool(), Ok(true));
        assert_eq!(value.pointer("/no").unwrap().as_bool(), Ok(false));
        assert!(value.pointer("/nothing").unwrap().is_null());
    }

    #[test]
    fn test_collections() {
        let value = parse_ok("collections.json");
        assert_eq!(value.pointer("/empty_array"), Ok(&Value::array()));
        assert_eq!(value.pointer("/empty_object"), Ok(&Value::object()));
        assert_eq!(value.pointer("/mixed").unwrap().as_array().unwrap().len(), 7);
        let matrix = value.pointer("/matrix").unwrap();
        assert_eq!(matrix.get_index(1).unwrap().get_index(0), Ok(&Value::int(3)));
        let second = value.pointer("/records").unwrap().get_index(1).unwrap();
        assert_eq!(second.pointer("/id"), Ok(&Value::int(2)));
        assert_eq!(second.pointer("/tags").unwrap().as_array().unwrap().len(), 2);
    }

    #[test]
    fn test_escapes() {
        let value = parse_ok("escapes.json");
        let field = |key: &str| value.field(key).unwrap().as_str().unwrap().to_string();
        assert_eq!(field("quote"), "say \"hi\"");
        assert_eq!(field("backslash"), "C:\\path\\to");
        assert_eq!(field("chained"), "a\\\"b");
        assert_eq!(field("controls"), "tab\tnew\nline");
        assert_eq!(field("unicode"), "café 😀");
        assert_eq!(field("solidus"), "a/b");
        assert_eq!(field("structural text"), "{[,:]}");
    }

    #[test]
    fn test_nested() {
        let value = parse_ok("nested.json");
        let e = value.pointer("/a/b/c/d/e").unwrap();
        let g = e
            .get_index(0)
            .and_then(|v| v.field("f"))
            .and_then(|v| v.get_index(0))
            .and_then(|v| v.get_index(0))
            .and_then(|v| v.get_index(0))
            .and_then(|v| v.field("g"))
            .unwrap();
        assert_eq!(g.as_str(), Ok("deep"));
    }

    #[test]
    fn test_scalar_root() {
        assert_eq!(parse_ok("scalar_root.json"), Value::string("just a string"));
    }
}

// Tests for malformed files: errors are reported and a partial tree is still built
mod bad_tests {
    use super::*;

    #[test]
    fn test_unclosed_object() {
        let parsed = parse_fixture("bad", "unclosed_object.json");
        assert!(matches!(
            parsed.errors[0],
            ParseError::MismatchedBrackets { .. }
        ));
        assert!(!parsed.is_clean());
    }

    #[test]
    fn test_mismatched() {
        let parsed = parse_fixture("bad", "mismatched.json");
        let mismatched = parsed
            .errors
            .iter()
            .filter(|e| matches!(e, ParseError::MismatchedBrackets { .. }))
            .count();
        assert_eq!(mismatched, 2);
        assert_eq!(parsed.value.pointer("/list"), Ok(&Value::int(1)));
    }

    #[test]
    fn test_unterminated_string() {
        let parsed = parse_fixture("bad", "unterminated_string.json");
        let unterminated = parsed
            .errors
            .iter()
            .filter(|e| matches!(e, ParseError::UnterminatedString { .. }))
            .count();
        assert_eq!(unterminated, 1);
    }

    #[test]
    fn test_unknown_atoms() {
        let parsed = parse_fixture("bad", "unknown_atoms.json");
        assert_eq!(parsed.errors.len(), 3);
        assert_eq!(
            parsed.value,
            Value::Array(vec![Value::Null, Value::Null, Value::Null, Value::int(1)])
        );
    }

    #[test]
    fn test_trailing() {
        let parsed = parse_fixture("bad", "trailing.json");
        assert_eq!(parsed.errors.len(), 1);
        assert!(matches!(
            parsed.errors[0],
            ParseError::TrailingOrMissingRoot { .. }
        ));
        assert_eq!(parsed.value.pointer("/a"), Ok(&Value::int(1)));
    }

    #[test]
    fn test_malformed_numbers() {
        let parsed = parse_fixture("bad", "malformed_numbers.json");
        assert_eq!(parsed.errors.len(), 2);
        assert!(parsed.value.pointer("/dots").unwrap().is_null());
        assert!(parsed.value.pointer("/sign").unwrap().is_null());
        assert_eq!(parsed.value.pointer("/ok"), Ok(&Value::int(7)));
    }
}
