//! Building comparable graphs from JSON documents.

use std::sync::Arc;

use crate::object::Object;
use crate::type_info::TypeInfo;
use crate::value::Value;

/// Type name given to objects converted from JSON.
pub const JSON_OBJECT_TYPE: &str = "JsonObject";

fn convert(json: serde_json::Value, object_type: &Arc<TypeInfo>) -> Value {
    match json {
        serde_json::Value::Null => Value::Null,
        serde_json::Value::Bool(b) => Value::Bool(b),
        serde_json::Value::Number(n) => match n.as_i64() {
            Some(i) => Value::Int(i),
            None => Value::Float(n.as_f64().unwrap_or(f64::NAN)),
        },
        serde_json::Value::String(s) => Value::from(s),
        serde_json::Value::Array(items) => {
            Value::list(items.into_iter().map(|item| convert(item, object_type)))
        }
        serde_json::Value::Object(members) => {
            let object = Object::new(object_type);
            for (name, member) in members {
                object.set(name, convert(member, object_type));
            }
            Value::Object(object)
        }
    }
}

/// JSON objects become composite values whose fields are the members, arrays
/// become lists. Use [`Value::json`] to keep a document as an opaque leaf.
impl From<serde_json::Value> for Value {
    fn from(json: serde_json::Value) -> Self {
        let object_type = TypeInfo::new(JSON_OBJECT_TYPE);
        convert(json, &object_type)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::ValueKind;
    use serde_json::json;

    #[test]
    fn objects_become_composites() {
        let value = Value::from(json!({
            "name": "Jack",
            "age": 10,
            "height": 1.4,
            "tags": ["a", "b"],
            "spouse": null
        }));
        let object = value.as_object().unwrap();
        assert_eq!(object.type_name(), JSON_OBJECT_TYPE);
        assert!(object.get("age").unwrap().equals(&Value::from(10)));
        assert!(object.get("height").unwrap().equals(&Value::from(1.4)));
        assert_eq!(object.get("tags").unwrap().kind(), ValueKind::OrderedCollection);
        assert!(object.get("spouse").unwrap().is_null());
    }

    #[test]
    fn opaque_json_is_a_leaf() {
        let value = Value::json(json!({"a": [1, 2]}));
        assert_eq!(value.kind(), ValueKind::Scalar);
        assert!(value.equals(&Value::json(json!({"a": [1, 2]}))));
    }
}
