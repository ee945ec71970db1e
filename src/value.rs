use crate::error::AccessError;
use crate::path;
use crate::render;
use std::collections::BTreeMap;
use std::fmt::{self, Display};

/// The tag of a [`Value`], used in error messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValueKind {
    Null,
    Bool,
    Int,
    Float,
    String,
    Array,
    Object,
}

impl Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ValueKind::Null => "null",
            ValueKind::Bool => "a boolean",
            ValueKind::Int => "an integer",
            ValueKind::Float => "a float",
            ValueKind::String => "a string",
            ValueKind::Array => "an array",
            ValueKind::Object => "an object",
        };
        f.write_str(name)
    }
}

/// A parsed or hand-built JSON document.
///
/// Numbers remember the exact text they were parsed from so that rendering
/// does not drift; values built in code carry no text and are rendered with
/// standard decimal formatting. Equality ignores that text.
///
/// Objects are stored in a [`BTreeMap`], so keys are unique and always
/// rendered in lexicographic order.
#[derive(Debug, Clone, Default)]
pub enum Value {
    #[default]
    Null,
    Bool(bool),
    Int {
        value: i64,
        raw: Option<String>,
    },
    Float {
        value: f64,
        raw: Option<String>,
    },
    String(String),
    Array(Vec<Value>),
    Object(BTreeMap<String, Value>),
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Null, Value::Null) => true,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Int { value: a, .. }, Value::Int { value: b, .. }) => a == b,
            (Value::Float { value: a, .. }, Value::Float { value: b, .. }) => a == b,
            (Value::String(a), Value::String(b)) => a == b,
            (Value::Array(a), Value::Array(b)) => a == b,
            (Value::Object(a), Value::Object(b)) => a == b,
            _ => false,
        }
    }
}

// === Construction ===

impl Value {
    pub fn string(s: impl Into<String>) -> Self {
        Value::String(s.into())
    }

    pub fn int(value: i64) -> Self {
        Value::Int { value, raw: None }
    }

    pub fn float(value: f64) -> Self {
        Value::Float { value, raw: None }
    }

    /// A float that renders as `text` instead of re-deriving digits from `value`.
    pub fn float_with_text(value: f64, text: impl Into<String>) -> Self {
        Value::Float {
            value,
            raw: Some(text.into()),
        }
    }

    pub fn bool(value: bool) -> Self {
        Value::Bool(value)
    }

    /// An empty array.
    pub fn array() -> Self {
        Value::Array(Vec::new())
    }

    /// An empty object.
    pub fn object() -> Self {
        Value::Object(BTreeMap::new())
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Value::Bool(value)
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Value::int(value)
    }
}

impl From<i32> for Value {
    fn from(value: i32) -> Self {
        Value::int(i64::from(value))
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Value::float(value)
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::String(value.to_string())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::String(value)
    }
}

impl From<Vec<Value>> for Value {
    fn from(items: Vec<Value>) -> Self {
        Value::Array(items)
    }
}

impl From<BTreeMap<String, Value>> for Value {
    fn from(map: BTreeMap<String, Value>) -> Self {
        Value::Object(map)
    }
}

impl FromIterator<Value> for Value {
    fn from_iter<I: IntoIterator<Item = Value>>(iter: I) -> Self {
        Value::Array(iter.into_iter().collect())
    }
}

impl<K: Into<String>> FromIterator<(K, Value)> for Value {
    fn from_iter<I: IntoIterator<Item = (K, Value)>>(iter: I) -> Self {
        Value::Object(iter.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }
}

// === Inspection ===

impl Value {
    #[must_use]
    pub fn kind(&self) -> ValueKind {
        match self {
            Value::Null => ValueKind::Null,
            Value::Bool(_) => ValueKind::Bool,
            Value::Int { .. } => ValueKind::Int,
            Value::Float { .. } => ValueKind::Float,
            Value::String(_) => ValueKind::String,
            Value::Array(_) => ValueKind::Array,
            Value::Object(_) => ValueKind::Object,
        }
    }

    #[must_use]
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// The source text of a parsed number, if there is one.
    #[must_use]
    pub fn raw_text(&self) -> Option<&str> {
        match self {
            Value::Int { raw, .. } | Value::Float { raw, .. } => raw.as_deref(),
            _ => None,
        }
    }

    fn mismatch(&self, expected: ValueKind) -> AccessError {
        AccessError::TypeMismatch {
            expected,
            found: self.kind(),
        }
    }

    /// # Errors
    /// `TypeMismatch` unless this is a string.
    pub fn as_str(&self) -> Result<&str, AccessError> {
        match self {
            Value::String(s) => Ok(s),
            _ => Err(self.mismatch(ValueKind::String)),
        }
    }

    /// # Errors
    /// `TypeMismatch` unless this is an integer.
    pub fn as_int(&self) -> Result<i64, AccessError> {
        match self {
            Value::Int { value, .. } => Ok(*value),
            _ => Err(self.mismatch(ValueKind::Int)),
        }
    }

    /// Integers are not widened; a stored `Int` is a `TypeMismatch` here.
    ///
    /// # Errors
    /// `TypeMismatch` unless this is a float.
    pub fn as_float(&self) -> Result<f64, AccessError> {
        match self {
            Value::Float { value, .. } => Ok(*value),
            _ => Err(self.mismatch(ValueKind::Float)),
        }
    }

    /// # Errors
    /// `TypeMismatch` unless this is a boolean.
    pub fn as_bool(&self) -> Result<bool, AccessError> {
        match self {
            Value::Bool(b) => Ok(*b),
            _ => Err(self.mismatch(ValueKind::Bool)),
        }
    }

    /// # Errors
    /// `TypeMismatch` unless this is an array.
    pub fn as_array(&self) -> Result<&Vec<Value>, AccessError> {
        match self {
            Value::Array(items) => Ok(items),
            _ => Err(self.mismatch(ValueKind::Array)),
        }
    }

    /// # Errors
    /// `TypeMismatch` unless this is an array.
    pub fn as_array_mut(&mut self) -> Result<&mut Vec<Value>, AccessError> {
        match self {
            Value::Array(items) => Ok(items),
            _ => Err(self.mismatch(ValueKind::Array)),
        }
    }

    /// # Errors
    /// `TypeMismatch` unless this is an object.
    pub fn as_object(&self) -> Result<&BTreeMap<String, Value>, AccessError> {
        match self {
            Value::Object(map) => Ok(map),
            _ => Err(self.mismatch(ValueKind::Object)),
        }
    }

    /// # Errors
    /// `TypeMismatch` unless this is an object.
    pub fn as_object_mut(&mut self) -> Result<&mut BTreeMap<String, Value>, AccessError> {
        match self {
            Value::Object(map) => Ok(map),
            _ => Err(self.mismatch(ValueKind::Object)),
        }
    }

    /// The element at `index` of an array.
    ///
    /// # Errors
    /// `TypeMismatch` if this is not an array, `IndexOutOfBounds` past the end.
    pub fn get_index(&self, index: usize) -> Result<&Value, AccessError> {
        let items = self.as_array()?;
        items.get(index).ok_or(AccessError::IndexOutOfBounds {
            index,
            len: items.len(),
        })
    }

    /// # Errors
    /// `TypeMismatch` if this is not an array, `IndexOutOfBounds` past the end.
    pub fn get_index_mut(&mut self, index: usize) -> Result<&mut Value, AccessError> {
        let items = self.as_array_mut()?;
        let len = items.len();
        items
            .get_mut(index)
            .ok_or(AccessError::IndexOutOfBounds { index, len })
    }

    /// The value stored under `key` in an object.
    ///
    /// # Errors
    /// `TypeMismatch` if this is not an object, `MissingKey` if the key is absent.
    pub fn field(&self, key: &str) -> Result<&Value, AccessError> {
        self.as_object()?
            .get(key)
            .ok_or_else(|| AccessError::MissingKey {
                key: key.to_string(),
            })
    }

    /// # Errors
    /// `TypeMismatch` if this is not an object, `MissingKey` if the key is absent.
    pub fn field_mut(&mut self, key: &str) -> Result<&mut Value, AccessError> {
        self.as_object_mut()?
            .get_mut(key)
            .ok_or_else(|| AccessError::MissingKey {
                key: key.to_string(),
            })
    }
}

// === Mutation ===

impl Value {
    /// Appends to an array.
    ///
    /// # Errors
    /// `TypeMismatch` unless this is an array.
    pub fn push(&mut self, value: impl Into<Value>) -> Result<(), AccessError> {
        self.as_array_mut()?.push(value.into());
        Ok(())
    }

    /// Stores `value` under `key`, returning whatever was there before.
    ///
    /// # Errors
    /// `TypeMismatch` unless this is an object.
    pub fn insert(
        &mut self,
        key: impl Into<String>,
        value: impl Into<Value>,
    ) -> Result<Option<Value>, AccessError> {
        Ok(self.as_object_mut()?.insert(key.into(), value.into()))
    }

    /// See [`path::get_path`].
    ///
    /// # Errors
    /// `PathNotFound` or `InvalidPath`.
    pub fn pointer(&self, path: &str) -> Result<&Value, AccessError> {
        path::get_path(self, path)
    }

    /// See [`path::get_path_mut`].
    ///
    /// # Errors
    /// `PathNotFound` or `InvalidPath`.
    pub fn pointer_mut(&mut self, path: &str) -> Result<&mut Value, AccessError> {
        path::get_path_mut(self, path)
    }

    /// See [`path::set_path`].
    ///
    /// # Errors
    /// `PathNotFound` or `InvalidPath`.
    pub fn set_pointer(
        &mut self,
        path: &str,
        value: impl Into<Value>,
        create_intermediate: bool,
    ) -> Result<(), AccessError> {
        path::set_path(self, path, value.into(), create_intermediate)
    }

    /// See [`path::remove_path`].
    ///
    /// # Errors
    /// `PathNotFound` or `InvalidPath`.
    pub fn remove_pointer(&mut self, path: &str) -> Result<Value, AccessError> {
        path::remove_path(self, path)
    }
}

/// Compact JSON by default; `{:#}` pretty-prints with two-space indentation.
impl Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if f.alternate() {
            f.write_str(&render::render_pretty(self, "  "))
        } else {
            f.write_str(&render::render(self))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Value {
        [
            ("name", Value::string("demo")),
            ("count", Value::int(3)),
            ("ratio", Value::float(0.5)),
            ("on", Value::bool(true)),
            ("tags", vec![Value::from("a"), Value::from("b")].into()),
        ]
        .into_iter()
        .collect()
    }

    #[test]
    fn test_kinds() {
        let value = sample();
        assert_eq!(value.kind(), ValueKind::Object);
        assert_eq!(value.field("tags").unwrap().kind(), ValueKind::Array);
        assert_eq!(Value::default().kind(), ValueKind::Null);
    }

    #[test]
    fn test_typed_accessors() {
        let value = sample();
        assert_eq!(value.field("name").unwrap().as_str(), Ok("demo"));
        assert_eq!(value.field("count").unwrap().as_int(), Ok(3));
        assert_eq!(value.field("ratio").unwrap().as_float(), Ok(0.5));
        assert_eq!(value.field("on").unwrap().as_bool(), Ok(true));
        assert_eq!(
            value.field("tags").unwrap().get_index(1).unwrap().as_str(),
            Ok("b")
        );
    }

    #[test]
    fn test_type_mismatch_is_reported() {
        let value = sample();
        assert_eq!(
            value.field("count").unwrap().as_str(),
            Err(AccessError::TypeMismatch {
                expected: ValueKind::String,
                found: ValueKind::Int,
            })
        );
        assert_eq!(
            value.field("count").unwrap().as_float(),
            Err(AccessError::TypeMismatch {
                expected: ValueKind::Float,
                found: ValueKind::Int,
            })
        );
        assert!(matches!(
            value.get_index(0),
            Err(AccessError::TypeMismatch {
                expected: ValueKind::Array,
                ..
            })
        ));
    }

    #[test]
    fn test_missing_elements() {
        let value = sample();
        assert_eq!(
            value.field("nope"),
            Err(AccessError::MissingKey {
                key: "nope".to_string()
            })
        );
        assert_eq!(
            value.field("tags").unwrap().get_index(2),
            Err(AccessError::IndexOutOfBounds { index: 2, len: 2 })
        );
    }

    #[test]
    fn test_push_and_insert() {
        let mut list = Value::array();
        list.push(1).unwrap();
        list.push("two").unwrap();
        assert_eq!(list.as_array().unwrap().len(), 2);

        let mut obj = Value::object();
        assert_eq!(obj.insert("k", 1).unwrap(), None);
        assert_eq!(obj.insert("k", 2).unwrap(), Some(Value::int(1)));
        assert!(Value::Null.insert("k", 1).is_err());
        assert!(obj.push(1).is_err());
    }

    #[test]
    fn test_equality_ignores_number_text() {
        let parsed = Value::Int {
            value: 10,
            raw: Some("+10".to_string()),
        };
        assert_eq!(parsed, Value::int(10));
        assert_eq!(Value::float_with_text(1.5, "1.50"), Value::float(1.5));
        assert_ne!(Value::int(1), Value::float(1.0));
    }

    #[test]
    fn test_mutable_accessors() {
        let mut value = sample();
        *value.field_mut("count").unwrap() = Value::int(4);
        *value
            .field_mut("tags")
            .unwrap()
            .get_index_mut(0)
            .unwrap() = Value::Null;
        assert_eq!(value.field("count").unwrap().as_int(), Ok(4));
        assert!(value.field("tags").unwrap().get_index(0).unwrap().is_null());
    }

    #[test]
    fn test_display() {
        let value: Value = vec![Value::int(1), Value::object()].into();
        assert_eq!(value.to_string(), "[1,{}]");
        assert_eq!(format!("{value:#}"), "[\n  1,\n  {}\n]");
    }
}
