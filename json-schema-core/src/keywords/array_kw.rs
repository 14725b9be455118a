//! `items`, `additionalItems`, `maxItems`, `minItems`, `uniqueItems` (spec
//! §4.4, draft-04 §5.3). Their `generate` contribution is not independent
//! per keyword; it is the composite array generator (`composite::array`),
//! invoked once by the dispatcher (spec §4.5.a, §9 item 5).

use indexmap::IndexMap;

use crate::dispatch::Engine;
use crate::error::{InstanceError, SchemaError};
use crate::value::Json;

fn non_negative_int(v: &Json) -> Option<i64> {
    match v {
        Json::Integer(i) if *i >= 0 => Some(*i),
        _ => None,
    }
}

pub fn additional_items_validate(
    _engine: &Engine,
    _obj: &IndexMap<String, Json>,
    value: &Json,
) -> Result<(), SchemaError> {
    match value {
        Json::Bool(_) => Ok(()),
        Json::Object(_) => Ok(()),
        _ => Err(SchemaError::malformed(
            "additionalItems",
            "§5.3.1",
            "must be a boolean or a schema object",
        )),
    }
}

pub fn items_validate(
    engine: &Engine,
    _obj: &IndexMap<String, Json>,
    value: &Json,
) -> Result<(), SchemaError> {
    match value {
        Json::Object(_) => engine.recurse_validate(value),
        Json::Array(items) => {
            for item in items {
                engine.recurse_validate(item)?;
            }
            Ok(())
        }
        _ => Err(SchemaError::malformed(
            "items",
            "§5.3.1",
            "must be a schema object or an array of schema objects",
        )),
    }
}

pub fn items_apply(
    engine: &Engine,
    obj: &IndexMap<String, Json>,
    value: &Json,
    instance: &Json,
) -> Result<(), InstanceError> {
    let elements = match instance.as_array() {
        Some(a) => a,
        None => return Ok(()),
    };

    match value {
        Json::Object(_) => {
            for el in elements {
                engine.recurse_apply(value, el)?;
            }
            Ok(())
        }
        Json::Array(positional) => {
            let additional = engine
                .keyword_value(obj, "additionalItems")
                .unwrap_or(Json::object());
            for (i, el) in elements.iter().enumerate() {
                if i < positional.len() {
                    engine.recurse_apply(&positional[i], el)?;
                } else {
                    match &additional {
                        Json::Bool(false) => {
                            return Err(InstanceError::invalid(
                                "additionalItems",
                                "§5.3.1",
                                "array has more items than `items` allows",
                                "",
                            ));
                        }
                        Json::Bool(true) => {}
                        schema => engine.recurse_apply(schema, el)?,
                    }
                }
            }
            Ok(())
        }
        _ => Ok(()),
    }
}

pub fn max_items_validate(
    _engine: &Engine,
    _obj: &IndexMap<String, Json>,
    value: &Json,
) -> Result<(), SchemaError> {
    if non_negative_int(value).is_some() {
        Ok(())
    } else {
        Err(SchemaError::malformed(
            "maxItems",
            "§5.3.2",
            "must be a non-negative integer",
        ))
    }
}

pub fn max_items_apply(
    _engine: &Engine,
    _obj: &IndexMap<String, Json>,
    value: &Json,
    instance: &Json,
) -> Result<(), InstanceError> {
    let arr = match instance.as_array() {
        Some(a) => a,
        None => return Ok(()),
    };
    let max = non_negative_int(value).unwrap_or(0) as usize;
    if arr.len() <= max {
        Ok(())
    } else {
        Err(InstanceError::invalid(
            "maxItems",
            "§5.3.2",
            format!("array has more than {} items", max),
            "",
        ))
    }
}

pub fn min_items_validate(
    _engine: &Engine,
    _obj: &IndexMap<String, Json>,
    value: &Json,
) -> Result<(), SchemaError> {
    if non_negative_int(value).is_some() {
        Ok(())
    } else {
        Err(SchemaError::malformed(
            "minItems",
            "§5.3.3",
            "must be a non-negative integer",
        ))
    }
}

pub fn min_items_apply(
    _engine: &Engine,
    _obj: &IndexMap<String, Json>,
    value: &Json,
    instance: &Json,
) -> Result<(), InstanceError> {
    let arr = match instance.as_array() {
        Some(a) => a,
        None => return Ok(()),
    };
    let min = non_negative_int(value).unwrap_or(0) as usize;
    if arr.len() >= min {
        Ok(())
    } else {
        Err(InstanceError::invalid(
            "minItems",
            "§5.3.3",
            format!("array has fewer than {} items", min),
            "",
        ))
    }
}

pub fn unique_items_validate(
    _engine: &Engine,
    _obj: &IndexMap<String, Json>,
    value: &Json,
) -> Result<(), SchemaError> {
    if value.as_bool().is_some() {
        Ok(())
    } else {
        Err(SchemaError::malformed(
            "uniqueItems",
            "§5.3.4",
            "must be a boolean",
        ))
    }
}

pub fn unique_items_apply(
    _engine: &Engine,
    _obj: &IndexMap<String, Json>,
    value: &Json,
    instance: &Json,
) -> Result<(), InstanceError> {
    if value.as_bool() != Some(true) {
        return Ok(());
    }
    let arr = match instance.as_array() {
        Some(a) => a,
        None => return Ok(()),
    };
    for i in 0..arr.len() {
        for j in (i + 1)..arr.len() {
            if arr[i] == arr[j] {
                return Err(InstanceError::invalid(
                    "uniqueItems",
                    "§5.3.4",
                    format!("elements {} and {} are structurally equal", i, j),
                    "",
                ));
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use indexmap::IndexMap;

    #[test]
    fn unique_items_scenario() {
        let eng = Engine::with_debug(false);
        let obj = IndexMap::new();
        let v = Json::Bool(true);

        assert!(unique_items_apply(&eng, &obj, &v, &Json::Array(vec![])).is_ok());
        assert!(
            unique_items_apply(&eng, &obj, &v, &Json::Array(vec![Json::Null])).is_ok()
        );
        assert!(unique_items_apply(
            &eng,
            &obj,
            &v,
            &Json::Array(vec![Json::Null, Json::Null])
        )
        .is_err());
    }
}
