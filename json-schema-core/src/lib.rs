//! Keyword engine for validating and fuzzing JSON Schema draft-04
//! documents.
//!
//! The engine is a generic dispatch loop (`dispatch::Engine`) driven by a
//! static table of per-keyword routines (`keywords::*`), operating on a
//! tagged JSON value tree (`value::Json`) with draft-04 structural
//! equality. Two composite generators (`composite::array`,
//! `composite::object`) handle the combinatorics of `items`/`properties`
//! and their co-keywords. `document::SchemaDocument` is the public
//! entry point: load a schema, `apply` it to instances, or
//! `generate_instances` to fuzz a parser that consumes the schema's
//! format.

pub mod composite;
pub mod config;
pub mod dispatch;
pub mod document;
pub mod error;
pub mod instance_set;
pub mod keywords;
pub mod string_set;
pub mod value;

pub use config::CancellationToken;
pub use dispatch::Engine;
pub use document::{GenerateFlags, GeneratedInstance, MetaSchemaKind, SchemaDocument};
pub use error::{InstanceError, LoadError, SchemaError};
pub use value::{Json, PrimitiveType};
