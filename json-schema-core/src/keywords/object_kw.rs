//! `maxProperties`, `minProperties`, `required`, `additionalProperties`,
//! `properties`, `patternProperties`, `dependencies` (spec §4.4, §4.4.a,
//! draft-04 §5.4). The parent/child `additionalProperties` check (draft-04
//! §5.4.4, §8.3.3) is shared by all three of `properties`,
//! `patternProperties`, and `additionalProperties`'s `apply` entries —
//! wiring all three to the same function is idempotent, since `apply`
//! never has side effects beyond its `Result`. Their `generate`
//! contribution is the composite object generator (`composite::object`),
//! invoked once by the dispatcher (spec §4.5.b, §9 item 5).

use indexmap::IndexMap;
use regex::Regex;
use std::collections::HashSet;

use crate::dispatch::Engine;
use crate::error::{InstanceError, SchemaError};
use crate::value::Json;

fn non_negative_int(v: &Json) -> Option<i64> {
    match v {
        Json::Integer(i) if *i >= 0 => Some(*i),
        _ => None,
    }
}

pub fn max_properties_validate(
    _engine: &Engine,
    _obj: &IndexMap<String, Json>,
    value: &Json,
) -> Result<(), SchemaError> {
    if non_negative_int(value).is_some() {
        Ok(())
    } else {
        Err(SchemaError::malformed(
            "maxProperties",
            "§5.4.1",
            "must be a non-negative integer",
        ))
    }
}

pub fn max_properties_apply(
    _engine: &Engine,
    _obj: &IndexMap<String, Json>,
    value: &Json,
    instance: &Json,
) -> Result<(), InstanceError> {
    let o = match instance.as_object() {
        Some(o) => o,
        None => return Ok(()),
    };
    let max = non_negative_int(value).unwrap_or(0) as usize;
    if o.len() <= max {
        Ok(())
    } else {
        Err(InstanceError::invalid(
            "maxProperties",
            "§5.4.1",
            format!("object has more than {} properties", max),
            "",
        ))
    }
}

pub fn min_properties_validate(
    _engine: &Engine,
    _obj: &IndexMap<String, Json>,
    value: &Json,
) -> Result<(), SchemaError> {
    if non_negative_int(value).is_some() {
        Ok(())
    } else {
        Err(SchemaError::malformed(
            "minProperties",
            "§5.4.2",
            "must be a non-negative integer",
        ))
    }
}

pub fn min_properties_apply(
    _engine: &Engine,
    _obj: &IndexMap<String, Json>,
    value: &Json,
    instance: &Json,
) -> Result<(), InstanceError> {
    let o = match instance.as_object() {
        Some(o) => o,
        None => return Ok(()),
    };
    let min = non_negative_int(value).unwrap_or(0) as usize;
    if o.len() >= min {
        Ok(())
    } else {
        Err(InstanceError::invalid(
            "minProperties",
            "§5.4.2",
            format!("object has fewer than {} properties", min),
            "",
        ))
    }
}

fn string_array_with_unique_entries(value: &Json) -> Option<Vec<&str>> {
    let arr = value.as_array()?;
    if arr.is_empty() {
        return None;
    }
    let mut names = Vec::with_capacity(arr.len());
    for v in arr {
        names.push(v.as_str()?);
    }
    let unique: HashSet<&str> = names.iter().copied().collect();
    if unique.len() != names.len() {
        return None;
    }
    Some(names)
}

pub fn required_validate(
    _engine: &Engine,
    _obj: &IndexMap<String, Json>,
    value: &Json,
) -> Result<(), SchemaError> {
    if string_array_with_unique_entries(value).is_some() {
        Ok(())
    } else {
        Err(SchemaError::malformed(
            "required",
            "§5.4.3",
            "must be a non-empty array of unique strings",
        ))
    }
}

pub fn required_apply(
    _engine: &Engine,
    _obj: &IndexMap<String, Json>,
    value: &Json,
    instance: &Json,
) -> Result<(), InstanceError> {
    let o = match instance.as_object() {
        Some(o) => o,
        None => return Ok(()),
    };
    let names = value.as_array().into_iter().flatten();
    for name in names {
        if let Some(name) = name.as_str() {
            if !o.contains_key(name) {
                return Err(InstanceError::invalid(
                    "required",
                    "§5.4.3",
                    format!("missing required property `{}`", name),
                    "",
                ));
            }
        }
    }
    Ok(())
}

pub fn additional_properties_validate(
    engine: &Engine,
    _obj: &IndexMap<String, Json>,
    value: &Json,
) -> Result<(), SchemaError> {
    match value {
        Json::Bool(_) => Ok(()),
        Json::Object(_) => engine.recurse_validate(value),
        _ => Err(SchemaError::malformed(
            "additionalProperties",
            "§5.4.4",
            "must be a boolean or a schema object",
        )),
    }
}

pub fn properties_validate(
    engine: &Engine,
    _obj: &IndexMap<String, Json>,
    value: &Json,
) -> Result<(), SchemaError> {
    let props = value.as_object().ok_or_else(|| {
        SchemaError::malformed("properties", "§5.4.4", "must be an object")
    })?;
    for sub in props.values() {
        engine.recurse_validate(sub)?;
    }
    Ok(())
}

pub fn pattern_properties_validate(
    engine: &Engine,
    _obj: &IndexMap<String, Json>,
    value: &Json,
) -> Result<(), SchemaError> {
    let props = value.as_object().ok_or_else(|| {
        SchemaError::malformed("patternProperties", "§5.4.4", "must be an object")
    })?;
    for (pattern, sub) in props {
        Regex::new(pattern).map_err(|e| {
            SchemaError::malformed(
                "patternProperties",
                "§5.4.4",
                format!("key `{}` is not a valid regex: {}", pattern, e),
            )
        })?;
        engine.recurse_validate(sub)?;
    }
    Ok(())
}

/// The draft-04 §5.4.4/§8.3.3 parent+child check, shared by
/// `properties`/`patternProperties`/`additionalProperties`.
pub fn object_keywords_apply(
    engine: &Engine,
    obj: &IndexMap<String, Json>,
    _value: &Json,
    instance: &Json,
) -> Result<(), InstanceError> {
    let inst = match instance.as_object() {
        Some(o) => o,
        None => return Ok(()),
    };

    let empty_props = IndexMap::new();
    let properties = engine
        .keyword_value(obj, "properties")
        .and_then(|v| v.as_object().cloned())
        .unwrap_or(empty_props.clone());
    let pattern_properties = engine
        .keyword_value(obj, "patternProperties")
        .and_then(|v| v.as_object().cloned())
        .unwrap_or(empty_props);
    let additional = engine
        .keyword_value(obj, "additionalProperties")
        .unwrap_or(Json::object());

    let pattern_regexes: Vec<(Regex, &Json)> = pattern_properties
        .iter()
        .filter_map(|(p, s)| Regex::new(p).ok().map(|re| (re, s)))
        .collect();

    if additional == Json::Bool(false) {
        for key in inst.keys() {
            let covered = properties.contains_key(key)
                || pattern_regexes.iter().any(|(re, _)| re.is_match(key));
            if !covered {
                return Err(InstanceError::invalid(
                    "additionalProperties",
                    "§5.4.4",
                    format!("property `{}` is not allowed", key),
                    "",
                ));
            }
        }
    }

    for (key, val) in inst {
        let mut matched_any = false;
        if let Some(schema) = properties.get(key) {
            engine.recurse_apply(schema, val)?;
            matched_any = true;
        }
        for (re, schema) in &pattern_regexes {
            if re.is_match(key) {
                engine.recurse_apply(schema, val)?;
                matched_any = true;
            }
        }
        if !matched_any {
            if let Json::Object(_) = &additional {
                engine.recurse_apply(&additional, val)?;
            }
        }
    }

    Ok(())
}

#[derive(Debug, Clone)]
pub(crate) enum DependencyKind {
    Schema(Json),
    Properties(Vec<String>),
}

pub(crate) fn parse_dependencies(value: &Json) -> Option<IndexMap<String, DependencyKind>> {
    let obj = value.as_object()?;
    let mut out = IndexMap::new();
    for (k, v) in obj {
        let kind = if v.is_object() {
            DependencyKind::Schema(v.clone())
        } else if let Some(names) = string_array_with_unique_entries(v) {
            DependencyKind::Properties(names.into_iter().map(str::to_owned).collect())
        } else {
            return None;
        };
        out.insert(k.clone(), kind);
    }
    Some(out)
}

pub fn dependencies_validate(
    engine: &Engine,
    _obj: &IndexMap<String, Json>,
    value: &Json,
) -> Result<(), SchemaError> {
    let deps = parse_dependencies(value).ok_or_else(|| {
        SchemaError::malformed(
            "dependencies",
            "§5.4.5",
            "each value must be a schema object or a non-empty array of unique strings",
        )
    })?;
    for dep in deps.values() {
        if let DependencyKind::Schema(s) = dep {
            engine.recurse_validate(s)?;
        }
    }
    Ok(())
}

pub fn dependencies_apply(
    engine: &Engine,
    _obj: &IndexMap<String, Json>,
    value: &Json,
    instance: &Json,
) -> Result<(), InstanceError> {
    let inst = match instance.as_object() {
        Some(o) => o,
        None => return Ok(()),
    };
    let deps = match parse_dependencies(value) {
        Some(d) => d,
        None => return Ok(()),
    };
    for (key, dep) in &deps {
        if !inst.contains_key(key.as_str()) {
            continue;
        }
        match dep {
            DependencyKind::Schema(schema) => engine.recurse_apply(schema, instance)?,
            DependencyKind::Properties(names) => {
                for name in names {
                    if !inst.contains_key(name.as_str()) {
                        return Err(InstanceError::invalid(
                            "dependencies",
                            "§5.4.5",
                            format!(
                                "property `{}` requires sibling property `{}`",
                                key, name
                            ),
                            "",
                        ));
                    }
                }
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn property_dependency_scenario() {
        let eng = Engine::with_debug(false);
        let mut deps_obj = IndexMap::new();
        deps_obj.insert(
            "a".to_string(),
            Json::Array(vec![Json::String("b".into())]),
        );
        let deps = Json::Object(deps_obj);
        let obj = IndexMap::new();

        let mut inst1 = IndexMap::new();
        inst1.insert("a".to_string(), Json::Integer(1));
        assert!(dependencies_apply(&eng, &obj, &deps, &Json::Object(inst1)).is_err());

        let mut inst2 = IndexMap::new();
        inst2.insert("a".to_string(), Json::Integer(1));
        inst2.insert("b".to_string(), Json::Integer(2));
        assert!(dependencies_apply(&eng, &obj, &deps, &Json::Object(inst2)).is_ok());

        let mut inst3 = IndexMap::new();
        inst3.insert("b".to_string(), Json::Integer(2));
        assert!(dependencies_apply(&eng, &obj, &deps, &Json::Object(inst3)).is_ok());
    }
}
