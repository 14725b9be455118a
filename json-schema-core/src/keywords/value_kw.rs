//! `enum`, `type` (spec §4.4, draft-04 §5.5.1 for `enum`, §5.1.4 for
//! `type`).

use indexmap::IndexMap;

use crate::dispatch::Engine;
use crate::error::{InstanceError, SchemaError};
use crate::value::{is_a, PrimitiveType, Json};

fn structurally_unique(values: &[Json]) -> bool {
    for i in 0..values.len() {
        for j in (i + 1)..values.len() {
            if values[i] == values[j] {
                return false;
            }
        }
    }
    true
}

pub fn enum_validate(
    _engine: &Engine,
    _obj: &IndexMap<String, Json>,
    value: &Json,
) -> Result<(), SchemaError> {
    let arr = value.as_array().ok_or_else(|| {
        SchemaError::malformed("enum", "§5.5.1", "must be an array")
    })?;
    if arr.is_empty() {
        return Err(SchemaError::malformed(
            "enum",
            "§5.5.1",
            "must be a non-empty array",
        ));
    }
    if !structurally_unique(arr) {
        return Err(SchemaError::malformed(
            "enum",
            "§5.5.1",
            "elements must be structurally unique",
        ));
    }
    Ok(())
}

pub fn enum_apply(
    _engine: &Engine,
    _obj: &IndexMap<String, Json>,
    value: &Json,
    instance: &Json,
) -> Result<(), InstanceError> {
    let arr = value.as_array().unwrap_or(&[]);
    if arr.iter().any(|member| member == instance) {
        Ok(())
    } else {
        Err(InstanceError::invalid(
            "enum",
            "§5.5.1",
            format!("{} is not one of the enumerated values", instance.to_compact_string()),
            "",
        ))
    }
}

pub fn enum_generate(
    _engine: &Engine,
    _obj: &IndexMap<String, Json>,
    value: &Json,
) -> Vec<Json> {
    value.as_array().unwrap_or(&[]).to_vec()
}

/// One representative valid/invalid instance per primitive type, used both
/// by `type_apply`'s type-check and `type_generate`'s sampling.
fn sample_for(t: PrimitiveType) -> Json {
    match t {
        PrimitiveType::Array => Json::Array(vec![]),
        PrimitiveType::Boolean => Json::Bool(true),
        PrimitiveType::Integer => Json::Integer(0),
        PrimitiveType::Number => Json::Double(0.5),
        PrimitiveType::Null => Json::Null,
        PrimitiveType::Object => Json::object(),
        PrimitiveType::String => Json::String(String::new()),
    }
}

/// A value that is never `is_a` of `t` (used for the invalid half of
/// `type_generate`'s per-type sample pair).
fn counter_sample_for(t: PrimitiveType) -> Json {
    match t {
        PrimitiveType::Array | PrimitiveType::Object => Json::Null,
        _ => Json::Array(vec![]),
    }
}

fn type_names(value: &Json) -> Option<Vec<PrimitiveType>> {
    if let Some(name) = value.as_str() {
        return PrimitiveType::from_name(name).map(|t| vec![t]);
    }
    let arr = value.as_array()?;
    let mut names = Vec::with_capacity(arr.len());
    for v in arr {
        names.push(PrimitiveType::from_name(v.as_str()?)?);
    }
    // Unique-entries check only; an empty array is accepted (spec §9 open
    // question 2 — the source treats this as probably-unintended but the
    // behaviour is preserved rather than guessed at: it simply matches no
    // instance, ever).
    let mut seen = std::collections::HashSet::new();
    for t in &names {
        if !seen.insert(*t as u8) {
            return None;
        }
    }
    Some(names)
}

pub fn type_validate(
    _engine: &Engine,
    _obj: &IndexMap<String, Json>,
    value: &Json,
) -> Result<(), SchemaError> {
    if type_names(value).is_some() {
        Ok(())
    } else {
        Err(SchemaError::malformed(
            "type",
            "§5.1.4",
            "must be a primitive type name, or an array of unique primitive type names",
        ))
    }
}

pub fn type_apply(
    _engine: &Engine,
    _obj: &IndexMap<String, Json>,
    value: &Json,
    instance: &Json,
) -> Result<(), InstanceError> {
    let names = match type_names(value) {
        Some(n) => n,
        None => return Ok(()), // unreachable once validate_schema has run
    };
    let actual = instance.primitive_type();
    if names.iter().any(|&t| is_a(actual, t)) {
        Ok(())
    } else {
        Err(InstanceError::invalid(
            "type",
            "§5.1.4",
            format!("{} is not one of the listed types", actual.name()),
            "",
        ))
    }
}

pub fn type_generate(
    _engine: &Engine,
    _obj: &IndexMap<String, Json>,
    value: &Json,
) -> Vec<Json> {
    let names = match type_names(value) {
        Some(n) => n,
        None => return vec![],
    };
    let mut out = Vec::with_capacity(names.len() * 2);
    for t in names {
        out.push(sample_for(t));
        out.push(counter_sample_for(t));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn enum_scenario() {
        let eng = Engine::with_debug(false);
        let obj = IndexMap::new();
        let value = Json::Array(vec![Json::Integer(1), Json::String("x".into()), Json::Null]);

        assert!(enum_apply(&eng, &obj, &value, &Json::Integer(1)).is_ok());
        assert!(enum_apply(&eng, &obj, &value, &Json::Null).is_ok());
        assert!(enum_apply(&eng, &obj, &value, &Json::Integer(2)).is_err());

        let generated = enum_generate(&eng, &obj, &value);
        assert_eq!(generated.len(), 3);
    }

    #[test]
    fn empty_type_array_matches_nothing() {
        let eng = Engine::with_debug(false);
        let obj = IndexMap::new();
        let value = Json::Array(vec![]);
        assert!(type_validate(&eng, &obj, &value).is_ok());
        assert!(type_apply(&eng, &obj, &value, &Json::Integer(1)).is_err());
        assert!(type_apply(&eng, &obj, &value, &Json::Null).is_err());
    }

    #[test]
    fn type_rejects_duplicate_entries() {
        let eng = Engine::with_debug(false);
        let obj = IndexMap::new();
        let value = Json::Array(vec![Json::String("integer".into()), Json::String("integer".into())]);
        assert!(type_validate(&eng, &obj, &value).is_err());
    }
}
