//! # Dynamic Values
//!
//! Arguments and results travel as `serde_json::Value`. This module bridges those untyped values
//! and the [`TypeRef`] tags of the model:
//!
//! * **[`check`]**: validates that an argument is compatible with a declared type before anything
//!   is sent. Complex values must be objects whose keys are fields of the named type, with every
//!   required field present.
//! * **[`coerce`]**: converts a raw transport result into the declared return type. Transports
//!   speaking text-based protocols usually hand back strings, so textual scalars are parsed
//!   (`"5"` becomes `5` for an `int`, `"true"` becomes `true` for a `boolean`).
//!
//! JSON numbers cannot hold everything XML Schema can. The special floating point values `INF`,
//! `-INF` and `NaN` stay strings, and so do `decimal`s that an `f64` would round.
use crate::model::{PrimitiveKind, TypeRef};
use crate::registry::Registry;
use serde_json::{Map, Number, Value};

/// A value that does not fit its declared type.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("expected {expected} at '{path}', found {actual}")]
pub struct Mismatch {
    /// Location of the offending value, e.g. `person.addresses[1].zip`.
    pub path: String,
    pub expected: String,
    pub actual: String,
}

impl Mismatch {
    fn new(path: &str, expected: impl ToString, actual: impl ToString) -> Self {
        Self {
            path: path.to_string(),
            expected: expected.to_string(),
            actual: actual.to_string(),
        }
    }
}

/// A short name for the JSON kind of `value`, used in error messages.
pub fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(n) if n.is_i64() || n.is_u64() => "integer",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

fn field_path(path: &str, field: &str) -> String {
    if path.is_empty() {
        field.to_string()
    } else {
        format!("{path}.{field}")
    }
}

/// Checks that `value` is acceptable for a slot of type `type_ref`.
///
/// `null` is only accepted for optional slots (and for `anyType`).
pub fn check(
    value: &Value,
    type_ref: &TypeRef,
    optional: bool,
    registry: &Registry,
    path: &str,
) -> Result<(), Mismatch> {
    if value.is_null() {
        return match type_ref {
            _ if optional => Ok(()),
            TypeRef::Void | TypeRef::Primitive(PrimitiveKind::AnyType) => Ok(()),
            _ => Err(Mismatch::new(path, type_ref, "null")),
        };
    }

    let compatible = match type_ref {
        TypeRef::Void => false,
        TypeRef::Primitive(kind) => primitive_matches(value, *kind),
        TypeRef::Array(inner) => {
            let Value::Array(items) = value else {
                return Err(Mismatch::new(path, type_ref, kind_of(value)));
            };
            for (idx, item) in items.iter().enumerate() {
                check(item, inner, false, registry, &format!("{path}[{idx}]"))?;
            }
            true
        }
        TypeRef::Complex(name) => {
            let Value::Object(fields) = value else {
                return Err(Mismatch::new(path, type_ref, kind_of(value)));
            };
            return check_object(fields, name, registry, path);
        }
    };

    if compatible {
        Ok(())
    } else {
        Err(Mismatch::new(path, type_ref, kind_of(value)))
    }
}

fn primitive_matches(value: &Value, kind: PrimitiveKind) -> bool {
    match kind {
        PrimitiveKind::String
        | PrimitiveKind::DateTime
        | PrimitiveKind::Date
        | PrimitiveKind::Time
        | PrimitiveKind::Base64Binary => value.is_string(),
        PrimitiveKind::Boolean => value.is_boolean(),
        PrimitiveKind::Int => value
            .as_i64()
            .is_some_and(|n| i32::try_from(n).is_ok()),
        PrimitiveKind::Long => value.is_i64() || value.is_u64(),
        PrimitiveKind::Float | PrimitiveKind::Double => {
            value.is_number() || value.as_str().is_some_and(is_special_float)
        }
        PrimitiveKind::Decimal => {
            value.is_number() || value.as_str().is_some_and(|s| normalize_decimal(s).is_some())
        }
        PrimitiveKind::AnyType => true,
    }
}

fn check_object(
    fields: &Map<String, Value>,
    type_name: &str,
    registry: &Registry,
    path: &str,
) -> Result<(), Mismatch> {
    let complex = registry
        .complex_type(type_name)
        .ok_or_else(|| Mismatch::new(path, type_name, "an undefined type"))?;

    if let Some(unknown) = fields.keys().find(|key| complex.field(key).is_none()) {
        return Err(Mismatch::new(
            &field_path(path, unknown),
            format!("a field of {type_name}"),
            "an unknown field",
        ));
    }

    for field in &complex.fields {
        let path = field_path(path, &field.name);
        match fields.get(&field.name) {
            Some(value) => check(value, &field.type_ref, field.optional, registry, &path)?,
            None if field.optional => {}
            None => return Err(Mismatch::new(&path, &field.type_ref, "nothing")),
        }
    }

    Ok(())
}

/// Reorders object keys into the declared field order of their complex type.
///
/// Sequence-based schemas are order sensitive on the wire, while callers build objects in
/// whatever order they like.
pub fn arrange(value: Value, type_ref: &TypeRef, registry: &Registry) -> Value {
    match (type_ref, value) {
        (TypeRef::Array(inner), Value::Array(items)) => Value::Array(
            items
                .into_iter()
                .map(|item| arrange(item, inner, registry))
                .collect(),
        ),
        (TypeRef::Complex(name), Value::Object(mut fields)) => {
            let Some(complex) = registry.complex_type(name) else {
                return Value::Object(fields);
            };
            let mut ordered = Map::new();
            for field in &complex.fields {
                if let Some(value) = fields.remove(&field.name) {
                    ordered.insert(field.name.clone(), arrange(value, &field.type_ref, registry));
                }
            }
            ordered.extend(fields);
            Value::Object(ordered)
        }
        (_, value) => value,
    }
}

/// Coerces a raw result into `type_ref`.
///
/// `Void` always yields `null`, and `null` (a nil result) is passed through for every type.
pub fn coerce(value: Value, type_ref: &TypeRef, registry: &Registry) -> Result<Value, Mismatch> {
    coerce_at(value, type_ref, registry, "")
}

fn coerce_at(
    value: Value,
    type_ref: &TypeRef,
    registry: &Registry,
    path: &str,
) -> Result<Value, Mismatch> {
    match (type_ref, value) {
        (TypeRef::Void, _) => Ok(Value::Null),
        (_, Value::Null) => Ok(Value::Null),
        (TypeRef::Primitive(kind), value) => coerce_primitive(value, *kind, path),
        (TypeRef::Array(inner), Value::Array(items)) => items
            .into_iter()
            .enumerate()
            .map(|(idx, item)| coerce_at(item, inner, registry, &format!("{path}[{idx}]")))
            .collect::<Result<Vec<_>, _>>()
            .map(Value::Array),
        // An empty element carries no items.
        (TypeRef::Array(_), Value::String(s)) if s.trim().is_empty() => Ok(Value::Array(vec![])),
        // A single occurrence of a repeated element.
        (TypeRef::Array(inner), single) => {
            Ok(Value::Array(vec![coerce_at(single, inner, registry, &format!("{path}[0]"))?]))
        }
        (TypeRef::Complex(_), Value::String(s)) if s.trim().is_empty() => {
            Ok(Value::Object(Map::new()))
        }
        (TypeRef::Complex(name), Value::Object(fields)) => {
            coerce_object(fields, name, registry, path).map(Value::Object)
        }
        (TypeRef::Complex(_), other) => Err(Mismatch::new(path, type_ref, kind_of(&other))),
    }
}

fn coerce_object(
    fields: Map<String, Value>,
    type_name: &str,
    registry: &Registry,
    path: &str,
) -> Result<Map<String, Value>, Mismatch> {
    let complex = registry
        .complex_type(type_name)
        .ok_or_else(|| Mismatch::new(path, type_name, "an undefined type"))?;

    fields
        .into_iter()
        .map(|(key, value)| -> Result<(String, Value), Mismatch> {
            let value = match complex.field(&key) {
                Some(field) => {
                    coerce_at(value, &field.type_ref, registry, &field_path(path, &key))?
                }
                // Fields the description does not know about are passed through untouched.
                None => value,
            };
            Ok((key, value))
        })
        .collect()
}

fn coerce_primitive(value: Value, kind: PrimitiveKind, path: &str) -> Result<Value, Mismatch> {
    let fail = |value: &Value| Mismatch::new(path, kind, kind_of(value));

    match kind {
        PrimitiveKind::AnyType => Ok(value),
        PrimitiveKind::String
        | PrimitiveKind::DateTime
        | PrimitiveKind::Date
        | PrimitiveKind::Time
        | PrimitiveKind::Base64Binary => match value {
            Value::String(_) => Ok(value),
            Value::Bool(b) => Ok(Value::String(b.to_string())),
            Value::Number(n) => Ok(Value::String(n.to_string())),
            other => Err(fail(&other)),
        },
        PrimitiveKind::Boolean => match &value {
            Value::Bool(_) => Ok(value),
            Value::String(s) => match s.trim() {
                "true" | "1" => Ok(Value::Bool(true)),
                "false" | "0" => Ok(Value::Bool(false)),
                _ => Err(Mismatch::new(path, kind, format!("'{s}'"))),
            },
            other => Err(fail(other)),
        },
        PrimitiveKind::Int => match &value {
            Value::Number(n) if n.as_i64().is_some_and(|n| i32::try_from(n).is_ok()) => Ok(value),
            Value::String(s) => s
                .trim()
                .parse::<i32>()
                .map(Value::from)
                .map_err(|_| Mismatch::new(path, kind, format!("'{s}'"))),
            other => Err(fail(other)),
        },
        PrimitiveKind::Long => match &value {
            Value::Number(n) if n.is_i64() || n.is_u64() => Ok(value),
            Value::String(s) => {
                let s = s.trim();
                s.parse::<i64>()
                    .map(Value::from)
                    .or_else(|_| s.parse::<u64>().map(Value::from))
                    .map_err(|_| Mismatch::new(path, kind, format!("'{s}'")))
            }
            other => Err(fail(other)),
        },
        PrimitiveKind::Float | PrimitiveKind::Double => match &value {
            Value::Number(_) => Ok(value),
            Value::String(s) if is_special_float(s) => Ok(Value::String(s.trim().to_string())),
            Value::String(s) => s
                .trim()
                .parse::<f64>()
                .ok()
                .and_then(Number::from_f64)
                .map(Value::Number)
                .ok_or_else(|| Mismatch::new(path, kind, format!("'{s}'"))),
            other => Err(fail(other)),
        },
        PrimitiveKind::Decimal => match &value {
            Value::Number(_) => Ok(value),
            Value::String(s) => {
                let normalized =
                    normalize_decimal(s).ok_or_else(|| Mismatch::new(path, kind, format!("'{s}'")))?;
                Ok(exact_number(&normalized).unwrap_or(Value::String(normalized)))
            }
            other => Err(fail(other)),
        },
    }
}

fn is_special_float(text: &str) -> bool {
    matches!(text.trim(), "INF" | "+INF" | "-INF" | "NaN")
}

/// Canonical form of an `xs:decimal` lexical value, `None` when `text` is not one.
///
/// Leading zeros, trailing fraction zeros and a `+` sign are dropped: `"+007.50"` becomes `"7.5"`.
fn normalize_decimal(text: &str) -> Option<String> {
    let text = text.trim();
    let (negative, digits) = match text.as_bytes().first()? {
        b'-' => (true, &text[1..]),
        b'+' => (false, &text[1..]),
        _ => (false, text),
    };
    let (integer, fraction) = digits.split_once('.').unwrap_or((digits, ""));

    let valid = |part: &str| part.bytes().all(|b| b.is_ascii_digit());
    if (integer.is_empty() && fraction.is_empty()) || !valid(integer) || !valid(fraction) {
        return None;
    }

    let integer = match integer.trim_start_matches('0') {
        "" => "0",
        integer => integer,
    };
    let fraction = fraction.trim_end_matches('0');

    let mut normalized = String::new();
    if negative && (integer != "0" || !fraction.is_empty()) {
        normalized.push('-');
    }
    normalized.push_str(integer);
    if !fraction.is_empty() {
        normalized.push('.');
        normalized.push_str(fraction);
    }
    Some(normalized)
}

/// Converts a canonical decimal into a JSON number when no precision is lost.
fn exact_number(canonical: &str) -> Option<Value> {
    if !canonical.contains('.') {
        if let Ok(n) = canonical.parse::<i64>() {
            return Some(Value::from(n));
        }
    }

    let float = canonical.parse::<f64>().ok()?;
    if float.to_string() != canonical {
        return None;
    }
    Number::from_f64(float).map(Value::Number)
}
