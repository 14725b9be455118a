//! Loads the two embedded meta-schema resources and checks that each is
//! itself a well-formed draft-04 schema (spec §6, §10).

use json_schema_core::document::MetaSchemaKind;
use json_schema_core::{Engine, Json, SchemaDocument};

fn load_resource(text: &str) -> Json {
    Json::parse(text).expect("embedded resource parses as JSON")
}

#[test]
fn draft_04_schema_resource_validates_as_a_schema() {
    let text = include_str!("../resources/draft-04-schema.json");
    let root = load_resource(text);
    let engine = Engine::new();
    assert!(engine.validate_schema(&root).is_ok());
}

#[test]
fn draft_04_hyper_schema_resource_validates_as_a_schema() {
    let text = include_str!("../resources/draft-04-hyper-schema.json");
    let root = load_resource(text);
    let engine = Engine::new();
    assert!(engine.validate_schema(&root).is_ok());
}

#[test]
fn ordinary_schema_validates_against_both_meta_schemas() {
    let doc = SchemaDocument::load(br#"{"type":"object","properties":{"a":{"type":"integer"}}}"#)
        .expect("schema loads");
    assert!(doc.validate_against_meta(MetaSchemaKind::Schema).is_ok());
    assert!(doc.validate_against_meta(MetaSchemaKind::HyperSchema).is_ok());
}
