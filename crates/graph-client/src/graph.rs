//! Generic Graph API response object
//!
//! Every response comes back as a generic property bag first; callers read
//! individual properties or cast the whole object into a typed shape.

use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

use crate::error::{GraphError, Result};

/// One JSON object returned by the Graph API.
#[derive(Debug, Clone, Default)]
pub struct GraphObject {
    properties: Map<String, Value>,
}

impl GraphObject {
    /// Wrap a raw JSON value. Anything but a JSON object is a payload error.
    pub fn from_value(value: Value) -> Result<Self> {
        match value {
            Value::Object(properties) => Ok(Self { properties }),
            _ => Err(GraphError::Json("expected a JSON object".to_string())),
        }
    }

    /// Raw property lookup.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.properties.get(key)
    }

    /// String property, if present and a string.
    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.get(key).and_then(Value::as_str)
    }

    /// Integer property, if present and a number.
    pub fn get_i64(&self, key: &str) -> Option<i64> {
        self.get(key).and_then(Value::as_i64)
    }

    /// Boolean property. Graph encodes some flags as 0/1, accept both.
    pub fn get_bool(&self, key: &str) -> Option<bool> {
        match self.get(key) {
            Some(Value::Bool(b)) => Some(*b),
            Some(Value::Number(n)) => n.as_i64().map(|n| n != 0),
            _ => None,
        }
    }

    /// Required string property; a response without it is malformed.
    pub fn require_str(&self, key: &str) -> Result<String> {
        self.get_str(key)
            .map(str::to_string)
            .ok_or_else(|| GraphError::Json(format!("missing `{}` property", key)))
    }

    /// Array-of-objects property. List endpoints wrap their results this way.
    pub fn get_list(&self, key: &str) -> Result<Vec<GraphObject>> {
        let value = self
            .get(key)
            .ok_or_else(|| GraphError::Json(format!("missing `{}` array", key)))?;
        let items = value
            .as_array()
            .ok_or_else(|| GraphError::Json(format!("`{}` is not an array", key)))?;
        items.iter().cloned().map(GraphObject::from_value).collect()
    }

    /// Cast into a narrower typed shape.
    pub fn cast<T: DeserializeOwned>(&self) -> Result<T> {
        serde_json::from_value(Value::Object(self.properties.clone())).map_err(Into::into)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;
    use serde_json::json;

    #[test]
    fn test_from_value_rejects_non_objects() {
        assert!(GraphObject::from_value(json!([1, 2, 3])).is_err());
        assert!(GraphObject::from_value(json!("plain string")).is_err());
        assert!(GraphObject::from_value(json!({"id": "1"})).is_ok());
    }

    #[test]
    fn test_typed_property_lookup() {
        let graph = GraphObject::from_value(json!({
            "id": "1000",
            "name": "Example",
            "count": 3,
            "flag": true,
        }))
        .unwrap();

        assert_eq!(graph.get_str("id"), Some("1000"));
        assert_eq!(graph.get_i64("count"), Some(3));
        assert_eq!(graph.get_bool("flag"), Some(true));
        assert_eq!(graph.get_str("missing"), None);
        assert_eq!(graph.get_str("count"), None);
    }

    #[test]
    fn test_numeric_booleans() {
        let graph = GraphObject::from_value(json!({"administrator": 1, "muted": 0})).unwrap();
        assert_eq!(graph.get_bool("administrator"), Some(true));
        assert_eq!(graph.get_bool("muted"), Some(false));
    }

    #[test]
    fn test_require_str() {
        let graph = GraphObject::from_value(json!({"id": "1000_2000"})).unwrap();
        assert_eq!(graph.require_str("id").unwrap(), "1000_2000");
        assert!(matches!(
            graph.require_str("name"),
            Err(GraphError::Json(_))
        ));
    }

    #[test]
    fn test_get_list() {
        let graph = GraphObject::from_value(json!({
            "data": [{"id": "g1"}, {"id": "g2"}],
        }))
        .unwrap();

        let list = graph.get_list("data").unwrap();
        assert_eq!(list.len(), 2);
        assert_eq!(list[1].get_str("id"), Some("g2"));
    }

    #[test]
    fn test_get_list_missing_or_malformed() {
        let graph = GraphObject::from_value(json!({"data": "nope"})).unwrap();
        assert!(graph.get_list("data").is_err());
        assert!(graph.get_list("other").is_err());
    }

    #[test]
    fn test_cast_to_typed_shape() {
        #[derive(Debug, Deserialize)]
        struct Narrow {
            id: String,
            name: Option<String>,
        }

        let graph = GraphObject::from_value(json!({"id": "p1", "name": "Page One"})).unwrap();
        let narrow: Narrow = graph.cast().unwrap();
        assert_eq!(narrow.id, "p1");
        assert_eq!(narrow.name.as_deref(), Some("Page One"));
    }
}
