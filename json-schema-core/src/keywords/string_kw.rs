//! `maxLength`, `minLength`, `pattern` (spec §4.4, draft-04 §5.2).

use indexmap::IndexMap;
use regex::Regex;

use crate::dispatch::Engine;
use crate::error::{InstanceError, SchemaError};
use crate::value::Json;

fn non_negative_int(v: &Json) -> Option<i64> {
    match v {
        Json::Integer(i) if *i >= 0 => Some(*i),
        _ => None,
    }
}

fn ascii_string(len: usize) -> String {
    "a".repeat(len)
}

/// A multi-byte UTF-8 character repeated `len` times (2 bytes/char, 1
/// Unicode scalar value per char, so `chars().count() == len`).
fn multibyte_string(len: usize) -> String {
    "é".repeat(len)
}

pub fn max_length_validate(
    _engine: &Engine,
    _obj: &IndexMap<String, Json>,
    value: &Json,
) -> Result<(), SchemaError> {
    if non_negative_int(value).is_some() {
        Ok(())
    } else {
        Err(SchemaError::malformed(
            "maxLength",
            "§5.2.1",
            "must be a non-negative integer",
        ))
    }
}

pub fn max_length_apply(
    _engine: &Engine,
    _obj: &IndexMap<String, Json>,
    value: &Json,
    instance: &Json,
) -> Result<(), InstanceError> {
    let s = match instance.as_str() {
        Some(s) => s,
        None => return Ok(()),
    };
    let max = non_negative_int(value).unwrap_or(0) as usize;
    if s.chars().count() <= max {
        Ok(())
    } else {
        Err(InstanceError::invalid(
            "maxLength",
            "§5.2.1",
            format!("string longer than {} characters", max),
            "",
        ))
    }
}

pub fn max_length_generate(
    _engine: &Engine,
    _obj: &IndexMap<String, Json>,
    value: &Json,
) -> Vec<Json> {
    let n = non_negative_int(value).unwrap_or(0) as usize;
    vec![
        Json::String(ascii_string(n)),
        Json::String(ascii_string(n + 1)),
        Json::String(multibyte_string(n)),
        Json::String(multibyte_string(n + 1)),
    ]
}

pub fn min_length_validate(
    _engine: &Engine,
    _obj: &IndexMap<String, Json>,
    value: &Json,
) -> Result<(), SchemaError> {
    if non_negative_int(value).is_some() {
        Ok(())
    } else {
        Err(SchemaError::malformed(
            "minLength",
            "§5.2.2",
            "must be a non-negative integer",
        ))
    }
}

pub fn min_length_apply(
    _engine: &Engine,
    _obj: &IndexMap<String, Json>,
    value: &Json,
    instance: &Json,
) -> Result<(), InstanceError> {
    let s = match instance.as_str() {
        Some(s) => s,
        None => return Ok(()),
    };
    let min = non_negative_int(value).unwrap_or(0) as usize;
    if s.chars().count() >= min {
        Ok(())
    } else {
        Err(InstanceError::invalid(
            "minLength",
            "§5.2.2",
            format!("string shorter than {} characters", min),
            "",
        ))
    }
}

pub fn min_length_generate(
    _engine: &Engine,
    _obj: &IndexMap<String, Json>,
    value: &Json,
) -> Vec<Json> {
    let n = non_negative_int(value).unwrap_or(0) as usize;
    let below = n.saturating_sub(1);
    vec![
        Json::String(ascii_string(n)),
        Json::String(ascii_string(below)),
        Json::String(multibyte_string(n)),
        Json::String(multibyte_string(below)),
    ]
}

pub fn pattern_validate(
    _engine: &Engine,
    _obj: &IndexMap<String, Json>,
    value: &Json,
) -> Result<(), SchemaError> {
    let s = value.as_str().ok_or_else(|| {
        SchemaError::malformed("pattern", "§5.2.3", "must be a string")
    })?;
    Regex::new(s).map_err(|e| {
        SchemaError::malformed("pattern", "§5.2.3", format!("not a valid regex: {}", e))
    })?;
    Ok(())
}

pub fn pattern_apply(
    _engine: &Engine,
    _obj: &IndexMap<String, Json>,
    value: &Json,
    instance: &Json,
) -> Result<(), InstanceError> {
    let s = match instance.as_str() {
        Some(s) => s,
        None => return Ok(()),
    };
    let pattern = value.as_str().unwrap_or("");
    let re = match Regex::new(pattern) {
        Ok(re) => re,
        Err(_) => return Ok(()), // unreachable once validate_schema has run
    };
    if re.is_match(s) {
        Ok(())
    } else {
        Err(InstanceError::invalid(
            "pattern",
            "§5.2.3",
            format!("{:?} does not match /{}/", s, pattern),
            "",
        ))
    }
}

/// Emits two constant fallback strings regardless of the pattern. The
/// reference implementation this engine follows flags true regex-derived
/// sampling as future work ("executing the regexp state machine is more
/// involved") — this engine preserves that fallback rather than guessing
/// at automaton exploration (spec §9 open question 1).
pub fn pattern_generate(
    _engine: &Engine,
    _obj: &IndexMap<String, Json>,
    _value: &Json,
) -> Vec<Json> {
    vec![Json::String(String::new()), Json::String("non-empty".to_owned())]
}

#[cfg(test)]
mod tests {
    use super::*;
    use indexmap::IndexMap;

    #[test]
    fn max_length_boundary_scenario() {
        let eng = Engine::with_debug(false);
        let obj = IndexMap::new();
        let v = Json::Integer(1);

        assert!(max_length_apply(&eng, &obj, &v, &Json::String("".into())).is_ok());
        assert!(max_length_apply(&eng, &obj, &v, &Json::String("0".into())).is_ok());
        assert!(max_length_apply(&eng, &obj, &v, &Json::String("00".into())).is_err());

        let generated = max_length_generate(&eng, &obj, &v);
        assert!(generated.contains(&Json::String("a".into())));
        assert!(generated.contains(&Json::String("aa".into())));
    }

    #[test]
    fn multibyte_length_counts_scalar_values_not_bytes() {
        let s = multibyte_string(3);
        assert_eq!(s.chars().count(), 3);
        assert!(s.len() > 3);
    }
}
