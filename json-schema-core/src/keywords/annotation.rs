//! `title`, `description`, `default` (spec §4.4, draft-04 §6). Purely
//! annotative: no `apply` contribution at all, and `default`'s only
//! contribution is to `generate` (emit the literal value as a candidate).

use indexmap::IndexMap;

use crate::dispatch::Engine;
use crate::error::SchemaError;
use crate::value::Json;

pub fn title_validate(
    _engine: &Engine,
    _obj: &IndexMap<String, Json>,
    value: &Json,
) -> Result<(), SchemaError> {
    if value.as_str().is_some() {
        Ok(())
    } else {
        Err(SchemaError::malformed("title", "§6.1", "must be a string"))
    }
}

pub fn description_validate(
    _engine: &Engine,
    _obj: &IndexMap<String, Json>,
    value: &Json,
) -> Result<(), SchemaError> {
    if value.as_str().is_some() {
        Ok(())
    } else {
        Err(SchemaError::malformed(
            "description",
            "§6.1",
            "must be a string",
        ))
    }
}

pub fn default_generate(
    _engine: &Engine,
    _obj: &IndexMap<String, Json>,
    value: &Json,
) -> Vec<Json> {
    vec![value.clone()]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_emitted_verbatim() {
        let eng = Engine::with_debug(false);
        let obj = IndexMap::new();
        let value = Json::Integer(7);
        assert_eq!(default_generate(&eng, &obj, &value), vec![Json::Integer(7)]);
    }
}
