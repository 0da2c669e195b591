//! JSON boundary for selectors and query configs.
//!
//! The typed filter union is inferred here by explicit inspection of each
//! JSON value. Shapes the translator has no meaning for are rejected instead
//! of falling through to equality.

use serde_json::{Map, Value};

use crate::ast::*;
use crate::error::{QueryError, QueryResult};

/// Key marking a JSON object as a pre-built comparator.
pub const OPERATOR_TAG: &str = "$op";

/// Build a [`Selector`] from a JSON object.
///
/// | JSON                       | Filter value            |
/// |----------------------------|-------------------------|
/// | `null`                     | `Null`                  |
/// | bool / number / string     | `Scalar`                |
/// | array of scalars           | `List`                  |
/// | object with `"$op"`        | `Operator` (validated)  |
/// | any other object           | `Nested`                |
pub fn selector_from_json(value: &Value) -> QueryResult<Selector> {
    match value {
        Value::Object(map) => selector_from_map(map, ""),
        _ => Err(QueryError::selector("$", "selector must be a JSON object")),
    }
}

fn selector_from_map(map: &Map<String, Value>, prefix: &str) -> QueryResult<Selector> {
    let mut selector = Selector::new();
    for (key, value) in map {
        let path = if prefix.is_empty() {
            key.clone()
        } else {
            format!("{}.{}", prefix, key)
        };
        selector.insert(key.as_str(), filter_from_json(value, &path)?);
    }
    Ok(selector)
}

fn filter_from_json(value: &Value, path: &str) -> QueryResult<FilterValue> {
    match value {
        Value::Null => Ok(FilterValue::Null),
        Value::Array(items) => items
            .iter()
            .enumerate()
            .map(|(i, item)| {
                let path = format!("{}[{}]", path, i);
                scalar_from_json(item, &path)?
                    .ok_or_else(|| QueryError::selector(path, "list items must be scalars"))
            })
            .collect::<QueryResult<Vec<_>>>()
            .map(FilterValue::List),
        Value::Object(map) if map.contains_key(OPERATOR_TAG) => {
            serde_json::from_value::<FindOperator>(value.clone())
                .map(FilterValue::Operator)
                .map_err(|e| QueryError::selector(path, e.to_string()))
        }
        Value::Object(map) => selector_from_map(map, path).map(FilterValue::Nested),
        other => scalar_from_json(other, path)?
            .map(FilterValue::Scalar)
            .ok_or_else(|| QueryError::selector(path, "unsupported value")),
    }
}

/// `Ok(None)` for values that are not scalars.
///
/// Integers must fit `i64`; fractional numbers become floats.
fn scalar_from_json(value: &Value, path: &str) -> QueryResult<Option<Scalar>> {
    let scalar = match value {
        Value::Bool(b) => Scalar::Bool(*b),
        Value::Number(n) => match (n.as_i64(), n.is_f64()) {
            (Some(i), _) => Scalar::Int(i),
            (None, true) => n
                .as_f64()
                .map(Scalar::Float)
                .ok_or_else(|| QueryError::selector(path, "unsupported number"))?,
            (None, false) => {
                return Err(QueryError::selector(
                    path,
                    format!("integer {} is out of range", n),
                ));
            }
        },
        Value::String(s) => Scalar::String(s.clone()),
        _ => return Ok(None),
    };
    Ok(Some(scalar))
}

/// Build a [`QueryConfig`] from a JSON object.
///
/// `null` (for the whole config or any one key) means "not supplied".
pub fn config_from_json(value: &Value) -> QueryResult<QueryConfig> {
    let map = match value {
        Value::Null => return Ok(QueryConfig::default()),
        Value::Object(map) => map,
        _ => {
            return Err(QueryError::InvalidConfig(
                "config must be a JSON object".to_string(),
            ));
        }
    };

    let mut config = QueryConfig::default();
    for (key, value) in map {
        if value.is_null() {
            continue;
        }
        match key.as_str() {
            "skip" => config.skip = Some(non_negative(key, value)?),
            "take" => config.take = Some(non_negative(key, value)?),
            "relations" => config.relations = Some(string_list(key, value)?),
            "select" => config.select = Some(string_list(key, value)?),
            "order" => config.order = Some(order_from_json(value)?),
            other => {
                return Err(QueryError::InvalidConfig(format!(
                    "unknown key '{}'",
                    other
                )));
            }
        }
    }
    Ok(config)
}

fn non_negative(key: &str, value: &Value) -> QueryResult<u64> {
    value.as_u64().ok_or_else(|| {
        QueryError::InvalidConfig(format!("'{}' must be a non-negative integer", key))
    })
}

fn string_list(key: &str, value: &Value) -> QueryResult<Vec<String>> {
    let invalid = || QueryError::InvalidConfig(format!("'{}' must be an array of strings", key));
    value
        .as_array()
        .ok_or_else(invalid)?
        .iter()
        .map(|item| item.as_str().map(str::to_string).ok_or_else(invalid))
        .collect()
}

fn order_from_json(value: &Value) -> QueryResult<OrderBy> {
    let map = value.as_object().ok_or_else(|| {
        QueryError::InvalidConfig("'order' must be an object of field -> direction".to_string())
    })?;

    let mut order = OrderBy::new();
    for (field, dir) in map {
        let text = match dir {
            Value::String(s) => s.clone(),
            Value::Number(n) => n.to_string(),
            _ => String::new(),
        };
        let dir = text
            .parse::<SortOrder>()
            .map_err(|e| QueryError::InvalidConfig(format!("order '{}': {}", field, e)))?;
        order.push(field.as_str(), dir);
    }
    Ok(order)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_selector_shapes() {
        let selector = selector_from_json(&json!({
            "email": "a@b.c",
            "display_id": 42,
            "total": 9.5,
            "canceled_at": null,
            "status": ["pending", "completed"],
            "shipping_address": {"postal_code": "1000"},
            "title": {"$op": "iLike", "value": "%shirt%"}
        }))
        .unwrap();

        assert_eq!(selector.get("email"), Some(&FilterValue::Scalar("a@b.c".into())));
        assert_eq!(selector.get("display_id"), Some(&FilterValue::Scalar(Scalar::Int(42))));
        assert_eq!(selector.get("total"), Some(&FilterValue::Scalar(Scalar::Float(9.5))));
        assert_eq!(selector.get("canceled_at"), Some(&FilterValue::Null));
        assert_eq!(
            selector.get("status"),
            Some(&FilterValue::List(vec!["pending".into(), "completed".into()]))
        );
        assert_eq!(
            selector.get("shipping_address"),
            Some(&FilterValue::Nested(Selector::new().equals("postal_code", "1000")))
        );
        assert_eq!(
            selector.get("title"),
            Some(&FilterValue::Operator(FindOperator::ILike("%shirt%".into())))
        );
    }

    #[test]
    fn test_selector_keeps_key_order() {
        let selector = selector_from_json(&json!({"z": 1, "a": 2, "m": 3})).unwrap();
        let keys: Vec<&str> = selector.iter().map(|(k, _)| k).collect();
        assert_eq!(keys, vec!["z", "a", "m"]);
    }

    #[test]
    fn test_rejects_non_object_root() {
        let err = selector_from_json(&json!([1, 2])).unwrap_err();
        assert!(matches!(err, QueryError::InvalidSelector { .. }));
    }

    #[test]
    fn test_rejects_list_of_objects() {
        let err = selector_from_json(&json!({"items": {"id": [{"x": 1}]}})).unwrap_err();
        match err {
            QueryError::InvalidSelector { path, .. } => assert_eq!(path, "items.id[0]"),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_rejects_integer_beyond_i64() {
        let err = selector_from_json(&json!({"display_id": 18446744073709551615u64})).unwrap_err();
        match err {
            QueryError::InvalidSelector { path, message } => {
                assert_eq!(path, "display_id");
                assert!(message.contains("out of range"));
            }
            other => panic!("unexpected error: {other}"),
        }

        let err = selector_from_json(&json!({"id": [1, 18446744073709551615u64]})).unwrap_err();
        assert!(matches!(err, QueryError::InvalidSelector { path, .. } if path == "id[1]"));
    }

    #[test]
    fn test_rejects_unknown_operator() {
        let err = selector_from_json(&json!({"price": {"$op": "near", "value": 3}})).unwrap_err();
        match err {
            QueryError::InvalidSelector { path, .. } => assert_eq!(path, "price"),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_config_full() {
        let config = config_from_json(&json!({
            "skip": 0,
            "take": 20,
            "relations": ["items", "items.variant"],
            "select": ["id", "email"],
            "order": {"created_at": "desc", "display_id": 1}
        }))
        .unwrap();

        assert_eq!(config.skip, Some(0));
        assert_eq!(config.take, Some(20));
        assert_eq!(
            config.relations,
            Some(vec!["items".to_string(), "items.variant".to_string()])
        );
        assert_eq!(config.select, Some(vec!["id".to_string(), "email".to_string()]));
        assert_eq!(
            config.order,
            Some(
                OrderBy::new()
                    .then("created_at", SortOrder::Desc)
                    .then("display_id", SortOrder::Asc)
            )
        );
    }

    #[test]
    fn test_config_null_means_absent() {
        assert_eq!(config_from_json(&Value::Null).unwrap(), QueryConfig::default());
        let config = config_from_json(&json!({"relations": null, "take": null})).unwrap();
        assert_eq!(config, QueryConfig::default());
    }

    #[test]
    fn test_config_rejects_bad_values() {
        assert!(config_from_json(&json!({"skip": -1})).is_err());
        assert!(config_from_json(&json!({"take": "ten"})).is_err());
        assert!(config_from_json(&json!({"select": ["id", 3]})).is_err());
        assert!(config_from_json(&json!({"order": {"id": "up"}})).is_err());
        assert!(config_from_json(&json!({"limit": 10})).is_err());
    }
}
