//! `multipleOf`, `maximum`/`exclusiveMaximum`, `minimum`/`exclusiveMinimum`
//! (spec §4.4, draft-04 §5.1).

use indexmap::IndexMap;

use crate::dispatch::Engine;
use crate::error::{InstanceError, SchemaError};
use crate::value::{json_number_cmp, Json};
use std::cmp::Ordering;

fn is_positive_number(v: &Json) -> bool {
    match v {
        Json::Integer(i) => *i > 0,
        Json::Double(d) => *d > 0.0,
        _ => false,
    }
}

pub fn multiple_of_validate(
    _engine: &Engine,
    _obj: &IndexMap<String, Json>,
    value: &Json,
) -> Result<(), SchemaError> {
    if value.is_number() && is_positive_number(value) {
        Ok(())
    } else {
        Err(SchemaError::malformed(
            "multipleOf",
            "§5.1.1",
            "must be a number strictly greater than zero",
        ))
    }
}

pub fn multiple_of_apply(
    _engine: &Engine,
    _obj: &IndexMap<String, Json>,
    value: &Json,
    instance: &Json,
) -> Result<(), InstanceError> {
    if !instance.is_number() {
        return Ok(());
    }
    let divides = match (instance, value) {
        (Json::Integer(i), Json::Integer(x)) => x != &0 && i % x == 0,
        _ => {
            let i = instance.as_f64().unwrap();
            let x = value.as_f64().unwrap();
            x != 0.0 && (i / x).floor() == i / x
        }
    };
    if divides {
        Ok(())
    } else {
        Err(InstanceError::invalid(
            "multipleOf",
            "§5.1.1",
            format!("{} is not a multiple of {}", instance.to_compact_string(), value.to_compact_string()),
            "",
        ))
    }
}

pub fn multiple_of_generate(
    _engine: &Engine,
    _obj: &IndexMap<String, Json>,
    value: &Json,
) -> Vec<Json> {
    let mut out = vec![Json::Integer(0)];
    match value {
        Json::Integer(x) => {
            out.push(Json::Integer(*x));
            out.push(Json::Integer(x * 2));
            out.push(Json::Integer(x + 1));
        }
        Json::Double(x) => {
            out.push(Json::Double(*x));
            out.push(Json::Double(x * 2.0));
            let bump = if *x != 0.1 { 0.1 } else { 0.2 };
            out.push(Json::Double(x + bump));
        }
        _ => {}
    }
    out
}

fn maximum_boundaries(x: &Json) -> Vec<Json> {
    match x {
        Json::Integer(x) => vec![
            Json::Integer(x - 1),
            Json::Integer(*x),
            Json::Integer(x + 1),
        ],
        Json::Double(x) => vec![
            Json::Double(x - 1.0),
            Json::Double(*x),
            Json::Double(x + 1.0),
        ],
        _ => vec![],
    }
}

pub fn maximum_validate(
    _engine: &Engine,
    _obj: &IndexMap<String, Json>,
    value: &Json,
) -> Result<(), SchemaError> {
    if value.is_number() {
        Ok(())
    } else {
        Err(SchemaError::malformed(
            "maximum",
            "§5.1.2",
            "must be a number",
        ))
    }
}

pub fn maximum_apply(
    engine: &Engine,
    obj: &IndexMap<String, Json>,
    value: &Json,
    instance: &Json,
) -> Result<(), InstanceError> {
    if !instance.is_number() {
        return Ok(());
    }
    let exclusive = engine
        .keyword_value(obj, "exclusiveMaximum")
        .and_then(|v| v.as_bool())
        .unwrap_or(false);
    let ok = match json_number_cmp(instance, value) {
        Some(Ordering::Less) => true,
        Some(Ordering::Equal) => !exclusive,
        Some(Ordering::Greater) => false,
        None => true,
    };
    if ok {
        Ok(())
    } else {
        Err(InstanceError::invalid(
            "maximum",
            "§5.1.2",
            format!(
                "{} exceeds maximum {}",
                instance.to_compact_string(),
                value.to_compact_string()
            ),
            "",
        ))
    }
}

pub fn maximum_generate(
    _engine: &Engine,
    _obj: &IndexMap<String, Json>,
    value: &Json,
) -> Vec<Json> {
    maximum_boundaries(value)
}

pub fn exclusive_maximum_validate(
    _engine: &Engine,
    obj: &IndexMap<String, Json>,
    value: &Json,
) -> Result<(), SchemaError> {
    if value.as_bool().is_none() {
        return Err(SchemaError::malformed(
            "exclusiveMaximum",
            "§5.1.2",
            "must be a boolean",
        ));
    }
    if !obj.contains_key("maximum") {
        return Err(SchemaError::malformed(
            "exclusiveMaximum",
            "§5.1.2",
            "requires sibling keyword `maximum` to be present",
        ));
    }
    Ok(())
}

pub fn minimum_validate(
    _engine: &Engine,
    _obj: &IndexMap<String, Json>,
    value: &Json,
) -> Result<(), SchemaError> {
    if value.is_number() {
        Ok(())
    } else {
        Err(SchemaError::malformed(
            "minimum",
            "§5.1.3",
            "must be a number",
        ))
    }
}

pub fn minimum_apply(
    engine: &Engine,
    obj: &IndexMap<String, Json>,
    value: &Json,
    instance: &Json,
) -> Result<(), InstanceError> {
    if !instance.is_number() {
        return Ok(());
    }
    let exclusive = engine
        .keyword_value(obj, "exclusiveMinimum")
        .and_then(|v| v.as_bool())
        .unwrap_or(false);
    let ok = match json_number_cmp(instance, value) {
        Some(Ordering::Greater) => true,
        Some(Ordering::Equal) => !exclusive,
        Some(Ordering::Less) => false,
        None => true,
    };
    if ok {
        Ok(())
    } else {
        Err(InstanceError::invalid(
            "minimum",
            "§5.1.3",
            format!(
                "{} is below minimum {}",
                instance.to_compact_string(),
                value.to_compact_string()
            ),
            "",
        ))
    }
}

pub fn minimum_generate(
    _engine: &Engine,
    _obj: &IndexMap<String, Json>,
    value: &Json,
) -> Vec<Json> {
    // Mirrors `maximum`'s boundary family: one below, at, and one above.
    maximum_boundaries(value)
}

pub fn exclusive_minimum_validate(
    _engine: &Engine,
    obj: &IndexMap<String, Json>,
    value: &Json,
) -> Result<(), SchemaError> {
    if value.as_bool().is_none() {
        return Err(SchemaError::malformed(
            "exclusiveMinimum",
            "§5.1.3",
            "must be a boolean",
        ));
    }
    if !obj.contains_key("minimum") {
        return Err(SchemaError::malformed(
            "exclusiveMinimum",
            "§5.1.3",
            "requires sibling keyword `minimum` to be present",
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use indexmap::IndexMap;

    fn engine() -> Engine {
        Engine::with_debug(false)
    }

    #[test]
    fn maximum_boundary_scenario() {
        let mut obj = IndexMap::new();
        obj.insert("maximum".to_string(), Json::Integer(2));
        let eng = engine();

        assert!(maximum_apply(&eng, &obj, &Json::Integer(2), &Json::Integer(2)).is_ok());
        assert!(maximum_apply(&eng, &obj, &Json::Integer(2), &Json::Integer(3)).is_err());

        let generated = maximum_generate(&eng, &obj, &Json::Integer(2));
        assert!(generated.contains(&Json::Integer(2)));
        assert!(generated.contains(&Json::Integer(3)));
    }

    #[test]
    fn multiple_of_integer_path_uses_modulo() {
        let obj = IndexMap::new();
        let eng = engine();
        assert!(multiple_of_apply(&eng, &obj, &Json::Integer(3), &Json::Integer(9)).is_ok());
        assert!(multiple_of_apply(&eng, &obj, &Json::Integer(3), &Json::Integer(10)).is_err());
    }
}
