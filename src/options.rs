/// Name used in diagnostics when the caller does not supply one.
pub const DEFAULT_SOURCE_NAME: &str = "source.json";

/// Deepest array/object nesting the builder accepts.
pub const DEFAULT_MAX_DEPTH: usize = 128;

/// What the builder does when an object repeats a key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DuplicateKeys {
    /// The last occurrence wins.
    #[default]
    Overwrite,
    /// The first occurrence is kept and every later one is reported as a
    /// `KeyCollision` error.
    Reject,
}

/// Configuration for [`parse_with`](crate::api::parse_with).
///
/// ```rust
/// use jsontree::options::{DuplicateKeys, ParseOptions};
///
/// let options = ParseOptions::default()
///     .with_source_name("settings.json")
///     .with_duplicate_keys(DuplicateKeys::Reject);
/// let parsed = jsontree::parse_with(r#"{"a": 1, "a": 2}"#, &options);
///
/// assert_eq!(parsed.errors.len(), 1);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseOptions {
    /// Policy for repeated object keys.
    ///
    /// # Default
    ///
    /// [`DuplicateKeys::Overwrite`]
    pub duplicate_keys: DuplicateKeys,

    /// Name shown in diagnostics for the parsed text.
    ///
    /// # Default
    ///
    /// [`DEFAULT_SOURCE_NAME`]
    pub source_name: String,

    /// Deepest nesting of arrays and objects. Openers past this depth are
    /// reported as `NestingTooDeep` and dropped together with their closers,
    /// so their contents land in the enclosing container.
    ///
    /// # Default
    ///
    /// [`DEFAULT_MAX_DEPTH`]
    pub max_depth: usize,
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self {
            duplicate_keys: DuplicateKeys::default(),
            source_name: DEFAULT_SOURCE_NAME.to_string(),
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

impl ParseOptions {
    #[must_use]
    pub fn with_duplicate_keys(mut self, duplicate_keys: DuplicateKeys) -> Self {
        self.duplicate_keys = duplicate_keys;
        self
    }

    #[must_use]
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    #[must_use]
    pub fn with_source_name(mut self, name: impl Into<String>) -> Self {
        self.source_name = name.into();
        self
    }
}
