//! Tool parameter schema sanitizer
//!
//! Gemini function declarations accept only a subset of JSON Schema. This
//! walks a tool's parameter schema and rebuilds it without the keywords the
//! API rejects. Input schemas are never modified.

use serde_json::{Map, Value};

/// Keywords removed at every schema level
const UNSUPPORTED_KEYWORDS: &[&str] = &[
    "patternProperties",
    "additionalProperties",
    "const",
    "anyOf",
];

/// Keywords whose value maps names to sub-schemas
const SCHEMA_MAP_KEYWORDS: &[&str] = &["properties", "definitions", "$defs"];

/// Keywords whose value is a sub-schema or an array of sub-schemas
const SCHEMA_KEYWORDS: &[&str] = &["items", "not", "contains", "additionalItems"];

/// Keywords whose value is an array of sub-schemas
const SCHEMA_LIST_KEYWORDS: &[&str] = &["allOf", "oneOf", "prefixItems"];

/// Rebuild `schema` using only keywords the provider accepts.
///
/// An object node that declares `properties` or `required` without a `type`
/// is given `"type": "object"`. Everything else the provider accepts is
/// copied unchanged, and non-object input is returned as-is.
pub fn sanitize_schema(schema: &Value) -> Value {
    match schema {
        Value::Object(node) => Value::Object(sanitize_node(node)),
        other => other.clone(),
    }
}

fn sanitize_node(node: &Map<String, Value>) -> Map<String, Value> {
    let mut out = Map::with_capacity(node.len() + 1);

    for (key, value) in node {
        let key = key.as_str();
        if UNSUPPORTED_KEYWORDS.contains(&key) {
            continue;
        }

        let value = if SCHEMA_MAP_KEYWORDS.contains(&key) {
            sanitize_schema_map(value)
        } else if SCHEMA_KEYWORDS.contains(&key) || SCHEMA_LIST_KEYWORDS.contains(&key) {
            sanitize_schema_or_list(value)
        } else {
            value.clone()
        };
        out.insert(key.to_string(), value);
    }

    let needs_type = !out.contains_key("type")
        && (out.contains_key("properties") || out.contains_key("required"));
    if needs_type {
        out.insert("type".to_string(), Value::String("object".to_string()));
    }

    out
}

/// `{"name": schema, ...}`; names are kept verbatim
fn sanitize_schema_map(value: &Value) -> Value {
    match value {
        Value::Object(map) => Value::Object(
            map.iter()
                .map(|(name, schema)| (name.clone(), sanitize_schema(schema)))
                .collect(),
        ),
        other => other.clone(),
    }
}

fn sanitize_schema_or_list(value: &Value) -> Value {
    match value {
        Value::Array(schemas) => Value::Array(schemas.iter().map(sanitize_schema).collect()),
        other => sanitize_schema(other),
    }
}
