//! The keyword table and the single recursive driver that walks a schema
//! object and invokes whichever per-keyword routines are present (spec
//! §4.3). This is the only place per-keyword logic is entered from;
//! per-keyword functions call back into [`Engine::recurse_validate`],
//! [`Engine::recurse_apply`], and [`Engine::recurse_generate`] for any
//! sub-schema position they own.

use indexmap::IndexMap;

use crate::config::debug_enabled_from_env;
use crate::error::{InstanceError, SchemaError};
use crate::instance_set::InstanceSet;
use crate::keywords;
use crate::value::Json;

pub type ValidateFn = fn(&Engine, &IndexMap<String, Json>, &Json) -> Result<(), SchemaError>;
pub type ApplyFn =
    fn(&Engine, &IndexMap<String, Json>, &Json, &Json) -> Result<(), InstanceError>;
pub type GenerateFn = fn(&Engine, &IndexMap<String, Json>, &Json) -> Vec<Json>;

/// The tiny closed set of default literals a keyword can carry, decoded by
/// a hand-written reader rather than the full JSON parser (spec §4.3).
#[derive(Debug, Clone, Copy)]
pub enum DefaultLiteral {
    EmptyObject,
    False,
    Zero,
}

impl DefaultLiteral {
    pub fn to_json(self) -> Json {
        match self {
            DefaultLiteral::EmptyObject => Json::object(),
            DefaultLiteral::False => Json::Bool(false),
            DefaultLiteral::Zero => Json::Integer(0),
        }
    }
}

pub struct KeywordEntry {
    pub name: &'static str,
    pub default_literal: Option<DefaultLiteral>,
    pub validate: Option<ValidateFn>,
    pub apply: Option<ApplyFn>,
    pub generate: Option<GenerateFn>,
}

/// Keyword names whose `generate` contribution is not an independent
/// per-keyword routine but a shared invocation of the array composite
/// generator (spec §4.5.a). Listed here, rather than behind a per-keyword
/// function pointer, so the dispatcher can fire the composite exactly
/// once per `generate_instance_nodes` call regardless of how many of
/// these keywords are present (spec §9 item 5).
const ARRAY_COMPOSITE_KEYWORDS: &[&str] =
    &["items", "additionalItems", "maxItems", "minItems", "uniqueItems"];

/// Same idea for the object composite generator (spec §4.5.b).
const OBJECT_COMPOSITE_KEYWORDS: &[&str] = &[
    "maxProperties",
    "minProperties",
    "required",
    "additionalProperties",
    "properties",
    "patternProperties",
    "dependencies",
];

macro_rules! kw {
    ($name:expr, $default:expr, $validate:expr, $apply:expr, $generate:expr) => {
        KeywordEntry {
            name: $name,
            default_literal: $default,
            validate: $validate,
            apply: $apply,
            generate: $generate,
        }
    };
}

pub static KEYWORDS: &[KeywordEntry] = &[
    kw!(
        "multipleOf",
        None,
        Some(keywords::numeric::multiple_of_validate),
        Some(keywords::numeric::multiple_of_apply),
        Some(keywords::numeric::multiple_of_generate)
    ),
    kw!(
        "maximum",
        None,
        Some(keywords::numeric::maximum_validate),
        Some(keywords::numeric::maximum_apply),
        Some(keywords::numeric::maximum_generate)
    ),
    kw!(
        "exclusiveMaximum",
        Some(DefaultLiteral::False),
        Some(keywords::numeric::exclusive_maximum_validate),
        None,
        None
    ),
    kw!(
        "minimum",
        None,
        Some(keywords::numeric::minimum_validate),
        Some(keywords::numeric::minimum_apply),
        Some(keywords::numeric::minimum_generate)
    ),
    kw!(
        "exclusiveMinimum",
        Some(DefaultLiteral::False),
        Some(keywords::numeric::exclusive_minimum_validate),
        None,
        None
    ),
    kw!(
        "maxLength",
        None,
        Some(keywords::string_kw::max_length_validate),
        Some(keywords::string_kw::max_length_apply),
        Some(keywords::string_kw::max_length_generate)
    ),
    kw!(
        "minLength",
        Some(DefaultLiteral::Zero),
        Some(keywords::string_kw::min_length_validate),
        Some(keywords::string_kw::min_length_apply),
        Some(keywords::string_kw::min_length_generate)
    ),
    kw!(
        "pattern",
        None,
        Some(keywords::string_kw::pattern_validate),
        Some(keywords::string_kw::pattern_apply),
        Some(keywords::string_kw::pattern_generate)
    ),
    kw!(
        "additionalItems",
        Some(DefaultLiteral::EmptyObject),
        Some(keywords::array_kw::additional_items_validate),
        None,
        None
    ),
    kw!(
        "items",
        Some(DefaultLiteral::EmptyObject),
        Some(keywords::array_kw::items_validate),
        Some(keywords::array_kw::items_apply),
        None
    ),
    kw!(
        "maxItems",
        None,
        Some(keywords::array_kw::max_items_validate),
        Some(keywords::array_kw::max_items_apply),
        None
    ),
    kw!(
        "minItems",
        Some(DefaultLiteral::Zero),
        Some(keywords::array_kw::min_items_validate),
        Some(keywords::array_kw::min_items_apply),
        None
    ),
    kw!(
        "uniqueItems",
        Some(DefaultLiteral::False),
        Some(keywords::array_kw::unique_items_validate),
        Some(keywords::array_kw::unique_items_apply),
        None
    ),
    kw!(
        "maxProperties",
        None,
        Some(keywords::object_kw::max_properties_validate),
        Some(keywords::object_kw::max_properties_apply),
        None
    ),
    kw!(
        "minProperties",
        Some(DefaultLiteral::Zero),
        Some(keywords::object_kw::min_properties_validate),
        Some(keywords::object_kw::min_properties_apply),
        None
    ),
    kw!(
        "required",
        None,
        Some(keywords::object_kw::required_validate),
        Some(keywords::object_kw::required_apply),
        None
    ),
    kw!(
        "additionalProperties",
        Some(DefaultLiteral::EmptyObject),
        Some(keywords::object_kw::additional_properties_validate),
        Some(keywords::object_kw::object_keywords_apply),
        None
    ),
    kw!(
        "properties",
        Some(DefaultLiteral::EmptyObject),
        Some(keywords::object_kw::properties_validate),
        Some(keywords::object_kw::object_keywords_apply),
        None
    ),
    kw!(
        "patternProperties",
        Some(DefaultLiteral::EmptyObject),
        Some(keywords::object_kw::pattern_properties_validate),
        Some(keywords::object_kw::object_keywords_apply),
        None
    ),
    kw!(
        "dependencies",
        Some(DefaultLiteral::EmptyObject),
        Some(keywords::object_kw::dependencies_validate),
        Some(keywords::object_kw::dependencies_apply),
        None
    ),
    kw!(
        "enum",
        None,
        Some(keywords::value_kw::enum_validate),
        Some(keywords::value_kw::enum_apply),
        Some(keywords::value_kw::enum_generate)
    ),
    kw!(
        "type",
        None,
        Some(keywords::value_kw::type_validate),
        Some(keywords::value_kw::type_apply),
        Some(keywords::value_kw::type_generate)
    ),
    kw!(
        "allOf",
        None,
        Some(keywords::combinators::all_of_validate),
        Some(keywords::combinators::all_of_apply),
        Some(keywords::combinators::all_of_generate)
    ),
    kw!(
        "anyOf",
        None,
        Some(keywords::combinators::any_of_validate),
        Some(keywords::combinators::any_of_apply),
        Some(keywords::combinators::any_of_generate)
    ),
    kw!(
        "oneOf",
        None,
        Some(keywords::combinators::one_of_validate),
        Some(keywords::combinators::one_of_apply),
        Some(keywords::combinators::one_of_generate)
    ),
    kw!(
        "not",
        None,
        Some(keywords::combinators::not_validate),
        Some(keywords::combinators::not_apply),
        Some(keywords::combinators::not_generate)
    ),
    kw!(
        "title",
        None,
        Some(keywords::annotation::title_validate),
        None,
        None
    ),
    kw!(
        "description",
        None,
        Some(keywords::annotation::description_validate),
        None,
        None
    ),
    kw!(
        "default",
        None,
        None,
        None,
        Some(keywords::annotation::default_generate)
    ),
];

/// The dispatcher. Holds nothing but the debug-trace switch; schema trees
/// are immutable and owned entirely by `SchemaDocument`.
#[derive(Debug, Clone, Copy, Default)]
pub struct Engine {
    pub debug: bool,
}

impl Engine {
    pub fn new() -> Self {
        Engine {
            debug: debug_enabled_from_env(),
        }
    }

    pub fn with_debug(debug: bool) -> Self {
        Engine { debug }
    }

    fn trace(&self, msg: impl Fn() -> String) {
        if self.debug {
            log::debug!("{}", msg());
        }
    }

    /// Looks up a keyword's value on `obj`, falling back to its default
    /// literal when absent. Used both by the dispatch loop and by
    /// per-keyword functions that need to read a sibling keyword (e.g.
    /// `maximum` reading `exclusiveMaximum`).
    pub fn keyword_value(&self, obj: &IndexMap<String, Json>, name: &str) -> Option<Json> {
        if let Some(v) = obj.get(name) {
            return Some(v.clone());
        }
        KEYWORDS
            .iter()
            .find(|e| e.name == name)
            .and_then(|e| e.default_literal)
            .map(DefaultLiteral::to_json)
    }

    /// `validate_schema` (spec §4.3): walks `KEYWORDS` in table order,
    /// stopping at the first error.
    pub fn validate_schema(&self, schema_obj: &Json) -> Result<(), SchemaError> {
        let obj = schema_obj.as_object().ok_or(SchemaError::RootNotObject)?;
        for entry in KEYWORDS {
            if let Some(value) = self.keyword_value(obj, entry.name) {
                if let Some(validate) = entry.validate {
                    self.trace(|| format!("validate: {}", entry.name));
                    validate(self, obj, &value)?;
                }
            }
        }
        Ok(())
    }

    /// `apply_schema` (spec §4.3): same iteration; stops at the first
    /// instance-validation failure.
    pub fn apply_schema(&self, schema_obj: &Json, instance: &Json) -> Result<(), InstanceError> {
        let obj = match schema_obj.as_object() {
            Some(o) => o,
            None => return Ok(()), // non-object schema positions are rejected at validate time
        };
        for entry in KEYWORDS {
            if let Some(value) = self.keyword_value(obj, entry.name) {
                if let Some(apply) = entry.apply {
                    self.trace(|| format!("apply: {}", entry.name));
                    apply(self, obj, &value, instance)?;
                }
            }
        }
        Ok(())
    }

    /// `generate_instance_nodes` (spec §4.3): same iteration; simple
    /// keywords push their own contributions, and the array/object
    /// composite generators (spec §4.5) each fire at most once,
    /// triggered by the first composite-group keyword encountered in
    /// table order (spec §9 item 5).
    pub fn generate_instance_nodes(&self, schema_obj: &Json) -> InstanceSet {
        let mut out = InstanceSet::new();
        let obj = match schema_obj.as_object() {
            Some(o) => o,
            None => return out,
        };

        if obj.is_empty() {
            out.insert(Json::Null);
            return out;
        }

        let mut array_composite_done = false;
        let mut object_composite_done = false;

        for entry in KEYWORDS {
            let present_or_defaulted = self.keyword_value(obj, entry.name);
            let value = match present_or_defaulted {
                Some(v) => v,
                None => continue,
            };

            if ARRAY_COMPOSITE_KEYWORDS.contains(&entry.name) {
                if !array_composite_done && obj.contains_key(entry.name) {
                    self.trace(|| "generate: array composite".to_owned());
                    out.extend(crate::composite::array::generate_all_items(self, obj));
                    array_composite_done = true;
                }
                continue;
            }
            if OBJECT_COMPOSITE_KEYWORDS.contains(&entry.name) {
                if !object_composite_done && obj.contains_key(entry.name) {
                    self.trace(|| "generate: object composite".to_owned());
                    out.extend(crate::composite::object::generate_all_properties(self, obj));
                    object_composite_done = true;
                }
                continue;
            }

            if let Some(generate) = entry.generate {
                self.trace(|| format!("generate: {}", entry.name));
                out.extend(generate(self, obj, &value));
            }
        }

        out
    }

    /// Sub-schema recursion guard (spec §4.3, §5, §8 invariant 9): the
    /// empty schema `{}` always validates, and generates exactly one
    /// `null` placeholder rather than recursing further.
    pub fn recurse_validate(&self, sub_schema: &Json) -> Result<(), SchemaError> {
        match sub_schema.as_object() {
            Some(o) if o.is_empty() => Ok(()),
            Some(_) => self.validate_schema(sub_schema),
            None => Err(SchemaError::malformed(
                "(subschema)",
                "§3.2",
                "subschema must be a JSON object",
            )),
        }
    }

    pub fn recurse_apply(&self, sub_schema: &Json, instance: &Json) -> Result<(), InstanceError> {
        match sub_schema.as_object() {
            Some(o) if o.is_empty() => Ok(()),
            _ => self.apply_schema(sub_schema, instance),
        }
    }

    pub fn recurse_generate(&self, sub_schema: &Json) -> InstanceSet {
        self.generate_instance_nodes(sub_schema)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_schema_validates_anything_and_generates_one_null() {
        let engine = Engine::new();
        let empty = Json::object();

        assert!(engine.validate_schema(&empty).is_ok());
        assert!(engine.apply_schema(&empty, &Json::Integer(5)).is_ok());
        assert!(engine
            .apply_schema(&empty, &Json::String("x".into()))
            .is_ok());

        let generated = engine.generate_instance_nodes(&empty);
        assert_eq!(generated.len(), 1);
        assert_eq!(generated.iter().next(), Some(&Json::Null));
    }
}
