use crate::builder::Builder;
use crate::error::{Error, ParseError, ParseFailure};
use crate::lexer::Lexer;
use crate::options::ParseOptions;
use crate::render::{render, render_pretty};
use crate::value::Value;
use log::debug;
use miette::NamedSource;
use serde::{Serialize, Serializer};
use std::sync::Arc;

/// The outcome of parsing a document: the best tree that could be built and
/// every problem found on the way. An empty `errors` list means the input was
/// well formed.
#[derive(Debug, Clone)]
pub struct Parsed {
    pub value: Value,
    pub errors: Vec<ParseError>,
}

impl Serialize for Parsed {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        self.value.serialize(serializer)
    }
}

impl Parsed {
    #[must_use]
    pub fn is_clean(&self) -> bool {
        self.errors.is_empty()
    }

    /// The tree, or every collected error as one diagnostic.
    ///
    /// # Errors
    /// `Error::Parse` if any problem was recorded, even though a partial
    /// tree exists.
    pub fn into_result(self) -> Result<Value, Error> {
        if self.errors.is_empty() {
            Ok(self.value)
        } else {
            Err(ParseFailure {
                errors: self.errors,
            }
            .into())
        }
    }

    /// Compact JSON for the parsed tree.
    #[must_use]
    pub fn render(&self) -> String {
        render(&self.value)
    }

    #[must_use]
    pub fn render_pretty(&self, indent_unit: &str) -> String {
        render_pretty(&self.value, indent_unit)
    }

    /// Serializes the tree into a pretty-printed JSON string through `serde_json`.
    ///
    /// # Errors
    /// Returns a `serde_json::Error` if serialization fails.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(&self)
    }

    /// Serializes the tree into a YAML string.
    ///
    /// # Errors
    /// Returns a `serde_yaml::Error` if serialization fails.
    pub fn to_yaml(&self) -> Result<String, serde_yaml::Error> {
        serde_yaml::to_string(&self)
    }
}

/// Parses JSON text into a value tree.
///
/// This is the primary entry point. Parsing never fails outright: malformed
/// input yields a best-effort tree together with the list of problems.
///
/// ```rust
/// let parsed = jsontree::parse(r#"{"x": [1, 2, {"y": 3}]}"#);
/// assert!(parsed.is_clean());
/// assert_eq!(parsed.value.pointer("/x").unwrap().get_index(1).unwrap().as_int(), Ok(2));
/// ```
#[must_use]
pub fn parse(source: &str) -> Parsed {
    parse_with(source, &ParseOptions::default())
}

/// Like [`parse`], naming the source in diagnostics.
#[must_use]
pub fn parse_named(source: &str, file_name: &str) -> Parsed {
    parse_with(source, &ParseOptions::default().with_source_name(file_name))
}

#[must_use]
pub fn parse_with(source: &str, options: &ParseOptions) -> Parsed {
    let shared = NamedSource::new(&options.source_name, Arc::<str>::from(source));

    let (tokens, mut errors) = Lexer::with_source(source, shared.clone()).lex();
    let token_count = tokens.len();
    let (value, build_errors) = Builder::with_source(source, shared)
        .duplicate_keys(options.duplicate_keys)
        .max_depth(options.max_depth)
        .build(tokens);
    errors.extend(build_errors);

    debug!(
        "parsed {} ({} bytes, {} tokens): {} error(s)",
        options.source_name,
        source.len(),
        token_count,
        errors.len()
    );
    Parsed { value, errors }
}
