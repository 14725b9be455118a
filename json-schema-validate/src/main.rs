//! `json-schema-validate` — validates one or more JSON Schema draft-04
//! documents against the embedded draft-04 meta-schema (spec §6).

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use json_schema_core::document::MetaSchemaKind;
use json_schema_core::SchemaDocument;

/// Validates JSON Schema draft-04 documents against the meta-schema.
#[derive(Parser, Debug)]
#[command(name = "json-schema-validate")]
#[command(about = "Validates JSON Schema draft-04 documents", long_about = None)]
struct Args {
    /// Schema files to validate
    schemas: Vec<PathBuf>,

    /// Suppress per-file error messages
    #[arg(short = 'q')]
    quiet: bool,

    /// Keep validating remaining files after one fails
    #[arg(short = 'i')]
    continue_on_error: bool,

    /// Validate against the plain meta-schema instead of the hyper-meta-schema
    #[arg(long = "no-hyper")]
    no_hyper: bool,
}

/// Exit codes per spec §6: 0 success, 1 invalid option, 2 malformed JSON,
/// 3 schema failed meta-schema validation.
#[repr(u8)]
enum Exit {
    Success = 0,
    InvalidOption = 1,
    MalformedJson = 2,
    FailedMetaSchema = 3,
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    let args = Args::parse();

    if args.schemas.is_empty() {
        eprintln!("json-schema-validate: at least one schema file is required");
        return ExitCode::from(Exit::InvalidOption as u8);
    }

    let meta_kind = if args.no_hyper {
        MetaSchemaKind::Schema
    } else {
        MetaSchemaKind::HyperSchema
    };

    let mut worst: Option<Exit> = None;
    for path in &args.schemas {
        let bytes = match std::fs::read(path) {
            Ok(b) => b,
            Err(e) => {
                if !args.quiet {
                    eprintln!("{}: {}", path.display(), e);
                }
                worst = Some(Exit::MalformedJson);
                if !args.continue_on_error {
                    break;
                }
                continue;
            }
        };

        match SchemaDocument::load(&bytes) {
            Ok(doc) => match doc.validate_against_meta(meta_kind) {
                Ok(()) => {
                    if !args.quiet {
                        println!("{}: valid", path.display());
                    }
                }
                Err(e) => {
                    if !args.quiet {
                        eprintln!("{}: failed meta-schema validation: {}", path.display(), e);
                    }
                    worst = Some(Exit::FailedMetaSchema);
                    if !args.continue_on_error {
                        break;
                    }
                }
            },
            Err(e) => {
                if !args.quiet {
                    eprintln!("{}: {}", path.display(), e);
                }
                worst = Some(Exit::MalformedJson);
                if !args.continue_on_error {
                    break;
                }
            }
        }
    }

    ExitCode::from(worst.map(|e| e as u8).unwrap_or(Exit::Success as u8))
}
