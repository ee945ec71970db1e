use crate::value::Value;
use serde::{Serialize, Serializer};

impl Serialize for Value {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            Value::Null => serializer.serialize_unit(),
            Value::Bool(b) => serializer.serialize_bool(*b),
            Value::Int { value, .. } => serializer.serialize_i64(*value),
            Value::Float { value, .. } => serializer.serialize_f64(*value),
            Value::String(s) => serializer.serialize_str(s),
            Value::Array(items) => serializer.collect_seq(items),
            Value::Object(map) => serializer.collect_map(map),
        }
    }
}

impl From<serde_json::Value> for Value {
    fn from(value: serde_json::Value) -> Self {
        match value {
            serde_json::Value::Null => Value::Null,
            serde_json::Value::Bool(b) => Value::Bool(b),
            serde_json::Value::Number(n) => match n.as_i64() {
                Some(i) => Value::int(i),
                // u64 beyond i64::MAX and every float
                None => Value::float(n.as_f64().unwrap_or(f64::NAN)),
            },
            serde_json::Value::String(s) => Value::String(s),
            serde_json::Value::Array(items) => items.into_iter().map(Value::from).collect(),
            serde_json::Value::Object(map) => map
                .into_iter()
                .map(|(k, v)| (k, Value::from(v)))
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_serialize_matches_serde_json() {
        let value: Value = [
            ("name", Value::string("My App")),
            ("version", Value::float(1.5)),
            ("port", Value::int(8080)),
            ("features", vec![Value::from("a"), Value::Null].into()),
        ]
        .into_iter()
        .collect();

        let expected = json!({
            "name": "My App",
            "version": 1.5,
            "port": 8080,
            "features": ["a", null],
        });
        assert_eq!(serde_json::to_value(&value).unwrap(), expected);
    }

    #[test]
    fn test_from_serde_json() {
        let value = Value::from(json!({"a": [1, 2.5, "x", true, null]}));
        let items = value.field("a").unwrap().as_array().unwrap();
        assert_eq!(items[0], Value::int(1));
        assert_eq!(items[1], Value::float(2.5));
        assert_eq!(items[2], Value::string("x"));
        assert_eq!(items[3], Value::bool(true));
        assert!(items[4].is_null());
    }

    #[test]
    fn test_yaml() {
        let value: Value = [("b", Value::int(1)), ("a", Value::bool(true))]
            .into_iter()
            .collect();
        assert_eq!(serde_yaml::to_string(&value).unwrap(), "a: true\nb: 1\n");
    }
}
