//! `allOf`, `anyOf`, `oneOf`, `not` (spec §4.4, draft-04 §5.5).

use indexmap::IndexMap;

use crate::dispatch::Engine;
use crate::error::{InstanceError, SchemaError};
use crate::instance_set::InstanceSet;
use crate::value::Json;

fn non_empty_schema_array(value: &Json) -> Option<&[Json]> {
    let arr = value.as_array()?;
    if arr.is_empty() {
        None
    } else {
        Some(arr)
    }
}

fn validate_schema_array(
    engine: &Engine,
    keyword: &'static str,
    section: &'static str,
    value: &Json,
) -> Result<(), SchemaError> {
    let arr = non_empty_schema_array(value).ok_or_else(|| {
        SchemaError::malformed(keyword, section, "must be a non-empty array of schema objects")
    })?;
    for sub in arr {
        engine.recurse_validate(sub)?;
    }
    Ok(())
}

pub fn all_of_validate(
    engine: &Engine,
    _obj: &IndexMap<String, Json>,
    value: &Json,
) -> Result<(), SchemaError> {
    validate_schema_array(engine, "allOf", "§5.5.3", value)
}

pub fn all_of_apply(
    engine: &Engine,
    _obj: &IndexMap<String, Json>,
    value: &Json,
    instance: &Json,
) -> Result<(), InstanceError> {
    for sub in value.as_array().unwrap_or(&[]) {
        engine.recurse_apply(sub, instance)?;
    }
    Ok(())
}

pub fn all_of_generate(
    engine: &Engine,
    _obj: &IndexMap<String, Json>,
    value: &Json,
) -> Vec<Json> {
    let mut out = InstanceSet::new();
    for sub in value.as_array().unwrap_or(&[]) {
        out.extend(engine.recurse_generate(sub).into_vec());
    }
    out.into_vec()
}

pub fn any_of_validate(
    engine: &Engine,
    _obj: &IndexMap<String, Json>,
    value: &Json,
) -> Result<(), SchemaError> {
    validate_schema_array(engine, "anyOf", "§5.5.4", value)
}

pub fn any_of_apply(
    engine: &Engine,
    _obj: &IndexMap<String, Json>,
    value: &Json,
    instance: &Json,
) -> Result<(), InstanceError> {
    let subs = value.as_array().unwrap_or(&[]);
    if subs.iter().any(|s| engine.recurse_apply(s, instance).is_ok()) {
        Ok(())
    } else {
        Err(InstanceError::invalid(
            "anyOf",
            "§5.5.4",
            "instance did not satisfy any of the listed schemas",
            "",
        ))
    }
}

pub fn any_of_generate(
    engine: &Engine,
    obj: &IndexMap<String, Json>,
    value: &Json,
) -> Vec<Json> {
    all_of_generate(engine, obj, value)
}

pub fn one_of_validate(
    engine: &Engine,
    _obj: &IndexMap<String, Json>,
    value: &Json,
) -> Result<(), SchemaError> {
    validate_schema_array(engine, "oneOf", "§5.5.5", value)
}

pub fn one_of_apply(
    engine: &Engine,
    _obj: &IndexMap<String, Json>,
    value: &Json,
    instance: &Json,
) -> Result<(), InstanceError> {
    let subs = value.as_array().unwrap_or(&[]);
    let matches = subs
        .iter()
        .filter(|s| engine.recurse_apply(s, instance).is_ok())
        .count();
    if matches == 1 {
        Ok(())
    } else {
        Err(InstanceError::invalid(
            "oneOf",
            "§5.5.5",
            format!("instance satisfied {} of the listed schemas, expected exactly 1", matches),
            "",
        ))
    }
}

pub fn one_of_generate(
    engine: &Engine,
    obj: &IndexMap<String, Json>,
    value: &Json,
) -> Vec<Json> {
    all_of_generate(engine, obj, value)
}

pub fn not_validate(
    engine: &Engine,
    _obj: &IndexMap<String, Json>,
    value: &Json,
) -> Result<(), SchemaError> {
    engine.recurse_validate(value)
}

pub fn not_apply(
    engine: &Engine,
    _obj: &IndexMap<String, Json>,
    value: &Json,
    instance: &Json,
) -> Result<(), InstanceError> {
    if engine.recurse_apply(value, instance).is_err() {
        Ok(())
    } else {
        Err(InstanceError::invalid(
            "not",
            "§5.5.6",
            "instance satisfied the negated schema",
            "",
        ))
    }
}

pub fn not_generate(
    engine: &Engine,
    _obj: &IndexMap<String, Json>,
    value: &Json,
) -> Vec<Json> {
    engine.recurse_generate(value).into_vec()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn all_of_scenario() {
        let eng = Engine::with_debug(false);
        let obj = IndexMap::new();

        let mut int_schema = IndexMap::new();
        int_schema.insert("type".to_string(), Json::String("integer".into()));
        let mut min_schema = IndexMap::new();
        min_schema.insert("minimum".to_string(), Json::Integer(0));

        let value = Json::Array(vec![Json::Object(int_schema), Json::Object(min_schema)]);

        assert!(all_of_apply(&eng, &obj, &value, &Json::Integer(0)).is_ok());
        assert!(all_of_apply(&eng, &obj, &value, &Json::Integer(-1)).is_err());
        assert!(all_of_apply(&eng, &obj, &value, &Json::String("s".into())).is_err());
    }
}
