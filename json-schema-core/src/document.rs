//! The top-level schema object (spec §4.6): owns one loaded, immutable
//! schema tree and exposes `validate`/`apply`/`generate_instances` plus
//! meta-schema validation against the two embedded draft-04 resources
//! (spec §6).

use std::rc::Rc;
use std::sync::OnceLock;

use crate::config::CancellationToken;
use crate::dispatch::Engine;
use crate::error::{InstanceError, LoadError, SchemaError};
use crate::value::Json;

/// The embedded draft-04 meta-schema and hyper-meta-schema documents
/// (spec §6): opaque JSON resources, compiled into the binary since the
/// spec treats loading them as an external collaborator's concern, not
/// the engine's.
const DRAFT_04_SCHEMA: &str = include_str!("../resources/draft-04-schema.json");
const DRAFT_04_HYPER_SCHEMA: &str = include_str!("../resources/draft-04-hyper-schema.json");

static META_SCHEMA: OnceLock<Json> = OnceLock::new();
static HYPER_META_SCHEMA: OnceLock<Json> = OnceLock::new();

/// Selects which embedded meta-schema `validate_against_meta` checks
/// against.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MetaSchemaKind {
    Schema,
    HyperSchema,
}

impl MetaSchemaKind {
    fn resource(self) -> &'static Json {
        let (cell, text) = match self {
            MetaSchemaKind::Schema => (&META_SCHEMA, DRAFT_04_SCHEMA),
            MetaSchemaKind::HyperSchema => (&HYPER_META_SCHEMA, DRAFT_04_HYPER_SCHEMA),
        };
        cell.get_or_init(|| Json::parse(text).expect("embedded meta-schema resource is valid JSON"))
    }
}

/// Which instance validity classes (plus the deliberately-malformed JSON
/// vector) a `generate_instances` caller wants back (spec §4.6, §6 CLI
/// flags).
#[derive(Debug, Clone, Copy)]
pub struct GenerateFlags {
    pub include_valid: bool,
    pub include_invalid: bool,
    pub include_malformed_json: bool,
}

impl Default for GenerateFlags {
    fn default() -> Self {
        GenerateFlags {
            include_valid: true,
            include_invalid: true,
            include_malformed_json: true,
        }
    }
}

/// One generated test vector: its compact JSON text, and whether it
/// satisfies the schema it was generated from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedInstance {
    pub json_text: String,
    pub valid: bool,
}

/// A loaded, validated, immutable draft-04 schema document.
#[derive(Debug, Clone)]
pub struct SchemaDocument {
    root: Rc<Json>,
    engine: Engine,
}

impl SchemaDocument {
    /// Parses `bytes` as UTF-8 JSON, rejects a non-object root, and runs
    /// `validate_schema` on it; only a document that passes is retained
    /// (spec §4.6, §7 — malformed-schema errors propagate unchanged).
    pub fn load(bytes: &[u8]) -> Result<Self, LoadError> {
        let engine = Engine::new();
        let text = std::str::from_utf8(bytes)
            .map_err(|e| LoadError::Schema(SchemaError::Parse(e.to_string())))?;
        let root = Json::parse(text)?;
        if root.as_object().is_none() {
            return Err(LoadError::Schema(SchemaError::RootNotObject));
        }
        engine.validate_schema(&root)?;
        Ok(SchemaDocument {
            root: Rc::new(root),
            engine,
        })
    }

    /// Same as [`Self::load`], but checks `token` once before parsing and
    /// once after validation — the only two suspension points an
    /// in-memory, synchronous loader actually has (spec §5).
    pub fn load_cancellable(bytes: &[u8], token: &CancellationToken) -> Result<Self, LoadError> {
        if token.is_cancelled() {
            return Err(LoadError::Cancelled);
        }
        let doc = Self::load(bytes)?;
        if token.is_cancelled() {
            return Err(LoadError::Cancelled);
        }
        Ok(doc)
    }

    pub fn root(&self) -> &Json {
        &self.root
    }

    /// Delegates to the dispatcher's `apply_schema` (spec §4.3, §4.6).
    pub fn apply(&self, instance: &Json) -> Result<(), InstanceError> {
        self.engine.apply_schema(&self.root, instance)
    }

    /// Validates this document's root object as an *instance* against
    /// one of the two embedded meta-schemas (spec §6). Because this
    /// engine does not resolve `$ref` (spec §1 non-goals), sub-schema
    /// positions reached only through a `$ref` in the meta-schema are
    /// not enforced — documented as a known limitation in DESIGN.md
    /// rather than silently claimed as full meta-schema coverage.
    pub fn validate_against_meta(&self, kind: MetaSchemaKind) -> Result<(), InstanceError> {
        let meta = kind.resource();
        self.engine.apply_schema(meta, &self.root)
    }

    /// Runs `generate_instance_nodes` once, labels each candidate's
    /// validity by re-applying the schema to it, and filters by `flags`.
    /// Appends the literal non-well-formed-JSON vector when
    /// `include_malformed_json` is set (spec §4.6).
    pub fn generate_instances(&self, flags: &GenerateFlags) -> Vec<GeneratedInstance> {
        let nodes = self.engine.generate_instance_nodes(&self.root);
        let mut out = Vec::with_capacity(nodes.len() + 1);
        for node in nodes.iter() {
            let valid = self.apply(node).is_ok();
            if (valid && flags.include_valid) || (!valid && flags.include_invalid) {
                out.push(GeneratedInstance {
                    json_text: node.to_compact_string(),
                    valid,
                });
            }
        }
        if flags.include_malformed_json {
            out.push(GeneratedInstance {
                json_text: "\u{2620}".to_owned(),
                valid: false,
            });
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_non_object_root() {
        let err = SchemaDocument::load(b"[1,2,3]").unwrap_err();
        assert!(matches!(err, LoadError::Schema(SchemaError::RootNotObject)));
    }

    #[test]
    fn rejects_malformed_schema() {
        let err = SchemaDocument::load(br#"{"maximum":"not a number"}"#).unwrap_err();
        assert!(matches!(err, LoadError::Schema(SchemaError::MalformedSchema { .. })));
    }

    #[test]
    fn scenario_integer_range() {
        let doc = SchemaDocument::load(br#"{"type":"integer","minimum":0,"maximum":2}"#).unwrap();
        let texts: Vec<String> = doc
            .generate_instances(&GenerateFlags::default())
            .into_iter()
            .filter(|g| g.valid)
            .map(|g| g.json_text)
            .collect();
        assert!(texts.contains(&"0".to_string()));
        assert!(texts.contains(&"1".to_string()));
        assert!(texts.contains(&"2".to_string()));

        assert!(doc.apply(&Json::Integer(0)).is_ok());
        assert!(doc.apply(&Json::Integer(2)).is_ok());
        assert!(doc.apply(&Json::Integer(-1)).is_err());
        assert!(doc.apply(&Json::Integer(3)).is_err());
    }

    #[test]
    fn scenario_required_property() {
        let doc = SchemaDocument::load(
            br#"{"required":["a"],"properties":{"a":{"type":"integer"}}}"#,
        )
        .unwrap();

        let mut a1 = indexmap::IndexMap::new();
        a1.insert("a".to_string(), Json::Integer(1));
        assert!(doc.apply(&Json::Object(a1)).is_ok());

        assert!(doc.apply(&Json::object()).is_err());

        let mut a_null = indexmap::IndexMap::new();
        a_null.insert("a".to_string(), Json::Null);
        assert!(doc.apply(&Json::Object(a_null)).is_err());
    }

    #[test]
    fn generated_instances_have_no_duplicates() {
        let doc = SchemaDocument::load(br#"{"enum":[1,"x",null]}"#).unwrap();
        let instances = doc.generate_instances(&GenerateFlags::default());
        let mut seen = std::collections::HashSet::new();
        for inst in &instances {
            assert!(seen.insert(inst.json_text.clone()), "duplicate instance {}", inst.json_text);
        }
    }

    #[test]
    fn malformed_json_vector_is_appended_and_labelled_invalid() {
        let doc = SchemaDocument::load(b"{}").unwrap();
        let instances = doc.generate_instances(&GenerateFlags::default());
        assert!(instances
            .iter()
            .any(|g| g.json_text == "\u{2620}" && !g.valid));
    }

    #[test]
    fn meta_schema_self_validates_as_a_schema() {
        let engine = Engine::new();
        let meta = MetaSchemaKind::Schema.resource();
        assert!(engine.validate_schema(meta).is_ok());
        let hyper = MetaSchemaKind::HyperSchema.resource();
        assert!(engine.validate_schema(hyper).is_ok());
    }

    #[test]
    fn a_well_formed_schema_validates_against_the_meta_schema() {
        let doc = SchemaDocument::load(br#"{"type":"integer","minimum":0}"#).unwrap();
        assert!(doc.validate_against_meta(MetaSchemaKind::Schema).is_ok());
    }
}
