use crate::utils::get_line_and_column;
use crate::value::ValueKind;
use miette::{Diagnostic, NamedSource, SourceSpan};
use std::sync::Arc;
use thiserror::Error;

/// Source text shared by every diagnostic produced from one parse.
pub type Source = NamedSource<Arc<str>>;

#[derive(Error, Debug, Diagnostic, Clone)]
pub enum Error {
    #[error(transparent)]
    #[diagnostic(transparent)]
    Parse(#[from] ParseFailure),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Access(#[from] AccessError),
}

/// Every problem found while parsing one document, reported as a single diagnostic.
#[derive(Error, Debug, Diagnostic, Clone)]
#[error("{} problem(s) found while parsing", .errors.len())]
#[diagnostic(
    code(jsontree::parse_failure),
    help("The document was still built on a best-effort basis; see the related errors.")
)]
pub struct ParseFailure {
    #[related]
    pub errors: Vec<ParseError>,
}

#[derive(Error, Debug, Diagnostic, Clone)]
pub enum ParseError {
    #[error("Unterminated string")]
    #[diagnostic(
        code(jsontree::lexer::unterminated_string),
        help("Every string needs a closing `\"` that is not preceded by an odd number of `\\`.")
    )]
    UnterminatedString {
        #[source_code]
        src: Source,
        #[label("This string is never closed")]
        span: SourceSpan,
    },

    #[error("Unknown atom `{atom}`")]
    #[diagnostic(
        code(jsontree::lexer::unknown_atom),
        help("Only `true`, `false` and `null` are valid bare words.")
    )]
    UnknownAtom {
        #[source_code]
        src: Source,
        #[label("Not a JSON literal")]
        span: SourceSpan,
        atom: String,
    },

    #[error("Mismatched brackets")]
    #[diagnostic(
        code(jsontree::builder::mismatched_brackets),
        help("Each `[` must be closed by `]` and each `{{` by `}}`, innermost first.")
    )]
    MismatchedBrackets {
        #[source_code]
        src: Source,
        #[label("{reason}")]
        span: SourceSpan,
        reason: String,
    },

    #[error("Nesting deeper than {max_depth} levels")]
    #[diagnostic(
        code(jsontree::builder::nesting_too_deep),
        help("Brackets past the limit were ignored and their contents kept in the enclosing container. Raise `max_depth` in `ParseOptions` to accept deeper documents.")
    )]
    NestingTooDeep {
        #[source_code]
        src: Source,
        #[label("This bracket exceeds the nesting limit")]
        span: SourceSpan,
        max_depth: usize,
    },

    #[error("Trailing or missing root value")]
    #[diagnostic(
        code(jsontree::builder::trailing_or_missing_root),
        help("A document holds exactly one top-level value.")
    )]
    TrailingOrMissingRoot {
        #[source_code]
        src: Source,
        #[label("{reason}")]
        span: SourceSpan,
        reason: String,
    },

    #[error("Malformed number `{text}`")]
    #[diagnostic(
        code(jsontree::builder::malformed_number),
        help("The value was replaced by `null`.")
    )]
    MalformedNumber {
        #[source_code]
        src: Source,
        #[label("Cannot be read as a number")]
        span: SourceSpan,
        text: String,
    },

    #[error("Duplicate key `{key}`")]
    #[diagnostic(
        code(jsontree::builder::key_collision),
        help("Duplicate keys are rejected by the current options; the first value was kept.")
    )]
    KeyCollision {
        #[source_code]
        src: Source,
        #[label("This key was already used in the same object")]
        span: SourceSpan,
        key: String,
    },

    #[error("Key `{key}` has no value")]
    #[diagnostic(code(jsontree::builder::missing_value))]
    MissingValue {
        #[source_code]
        src: Source,
        #[label("Expected a value after this key")]
        span: SourceSpan,
        key: String,
    },

    #[error("Object keys must be strings")]
    #[diagnostic(
        code(jsontree::builder::invalid_key),
        help("The key and the value following it were skipped.")
    )]
    InvalidKey {
        #[source_code]
        src: Source,
        #[label("Expected a string key here")]
        span: SourceSpan,
    },

    #[error("Unexpected `{token}`")]
    #[diagnostic(code(jsontree::builder::stray_token))]
    StrayToken {
        #[source_code]
        src: Source,
        #[label("Not allowed here, ignored")]
        span: SourceSpan,
        token: String,
    },
}

impl ParseError {
    /// The byte range of the source this error points at.
    #[must_use]
    pub fn span(&self) -> SourceSpan {
        match self {
            ParseError::UnterminatedString { span, .. }
            | ParseError::UnknownAtom { span, .. }
            | ParseError::MismatchedBrackets { span, .. }
            | ParseError::NestingTooDeep { span, .. }
            | ParseError::TrailingOrMissingRoot { span, .. }
            | ParseError::MalformedNumber { span, .. }
            | ParseError::KeyCollision { span, .. }
            | ParseError::MissingValue { span, .. }
            | ParseError::InvalidKey { span, .. }
            | ParseError::StrayToken { span, .. } => *span,
        }
    }

    /// 1-based line and column of the start of this error within `source`.
    #[must_use]
    pub fn line_col(&self, source: &str) -> (usize, usize) {
        get_line_and_column(source, self.span().offset())
    }
}

/// Failures of the typed accessors and of path reads/writes.
#[derive(Error, Debug, Diagnostic, Clone, PartialEq, Eq)]
pub enum AccessError {
    #[error("No value at `{path}` (lookup stopped at `{at}`)")]
    #[diagnostic(
        code(jsontree::path::not_found),
        help("Every segment but the last must name an existing object.")
    )]
    PathNotFound { path: String, at: String },

    #[error("Invalid path `{path}`")]
    #[diagnostic(
        code(jsontree::path::invalid),
        help("Paths start with `/`, e.g. `/server/port`. The empty path names the root.")
    )]
    InvalidPath { path: String },

    #[error("Expected {expected}, found {found}")]
    #[diagnostic(code(jsontree::value::type_mismatch))]
    TypeMismatch {
        expected: ValueKind,
        found: ValueKind,
    },

    #[error("Index {index} is out of bounds for an array of length {len}")]
    #[diagnostic(code(jsontree::value::index_out_of_bounds))]
    IndexOutOfBounds { index: usize, len: usize },

    #[error("Object has no key `{key}`")]
    #[diagnostic(code(jsontree::value::missing_key))]
    MissingKey { key: String },
}
