//! `json-schema-generate` — generates JSON test vectors (a mix of valid
//! and deliberately-invalid instances) from one JSON Schema draft-04
//! document (spec §6).

use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Instant;

use clap::{Parser, ValueEnum};
use json_schema_core::document::{GenerateFlags, GeneratedInstance};
use json_schema_core::SchemaDocument;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Plain,
    C,
}

/// Generates JSON test vectors from a JSON Schema draft-04 document.
#[derive(Parser, Debug)]
#[command(name = "json-schema-generate")]
#[command(about = "Generates JSON test vectors from a JSON Schema draft-04 document", long_about = None)]
struct Args {
    /// Schema file to generate vectors from
    schema: PathBuf,

    /// Suppress stderr diagnostics
    #[arg(short = 'q')]
    quiet: bool,

    /// Emit only valid instances
    #[arg(short = 'v')]
    valid_only: bool,

    /// Emit only invalid instances
    #[arg(short = 'n')]
    invalid_only: bool,

    /// Suppress the non-well-formed-JSON vector
    #[arg(short = 'j')]
    suppress_malformed: bool,

    /// Output format
    #[arg(short = 'f', long = "format", default_value = "plain")]
    format: OutputFormat,

    /// C array variable name (only used with `-f c`)
    #[arg(long = "c-variable-name", default_value = "test_vectors")]
    c_variable_name: String,

    /// Print elapsed generation time to stderr
    #[arg(long = "show-timings")]
    show_timings: bool,
}

/// Exit codes per spec §6: 0 success, 1 invalid option, 2 malformed JSON.
#[repr(u8)]
enum Exit {
    Success = 0,
    InvalidOption = 1,
    MalformedJson = 2,
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    let args = Args::parse();

    if args.valid_only && args.invalid_only {
        eprintln!("json-schema-generate: -v and -n are mutually exclusive");
        return ExitCode::from(Exit::InvalidOption as u8);
    }

    let bytes = match std::fs::read(&args.schema) {
        Ok(b) => b,
        Err(e) => {
            eprintln!("{}: {}", args.schema.display(), e);
            return ExitCode::from(Exit::MalformedJson as u8);
        }
    };

    let doc = match SchemaDocument::load(&bytes) {
        Ok(doc) => doc,
        Err(e) => {
            eprintln!("{}: {}", args.schema.display(), e);
            return ExitCode::from(Exit::MalformedJson as u8);
        }
    };

    let flags = GenerateFlags {
        include_valid: !args.invalid_only,
        include_invalid: !args.valid_only,
        include_malformed_json: !args.suppress_malformed,
    };

    let start = Instant::now();
    let mut instances = doc.generate_instances(&flags);
    let elapsed = start.elapsed();

    // The engine's own collection order is unspecified (spec §5); sort
    // lexicographically here, at the outer layer, for deterministic CLI
    // output.
    instances.sort_by(|a, b| a.json_text.cmp(&b.json_text));

    match args.format {
        OutputFormat::Plain => print_plain(&instances),
        OutputFormat::C => print_c(&instances, &args.c_variable_name),
    }

    if args.show_timings && !args.quiet {
        eprintln!("generated {} instances in {:?}", instances.len(), elapsed);
    }

    ExitCode::from(Exit::Success as u8)
}

fn print_plain(instances: &[GeneratedInstance]) {
    let mut out = String::new();
    for inst in instances {
        out.push_str(&inst.json_text);
        out.push('\n');
    }
    print!("{}", out);
}

/// The C-array compatibility format (spec §6): a header, then a
/// `static const struct { const char *json; size_t size; unsigned int
/// is_valid; }` array literal, with a trailing sequential-index comment
/// on every element.
fn print_c(instances: &[GeneratedInstance], variable_name: &str) {
    println!("/* Generated by json-schema-generate. Do not edit. */");
    println!();
    println!("#include <stddef.h>");
    println!();
    println!("static const struct {{");
    println!("    const char *json;");
    println!("    size_t size;");
    println!("    unsigned int is_valid;");
    println!("}} {}[] = {{", variable_name);
    for (i, inst) in instances.iter().enumerate() {
        let escaped = c_escape(&inst.json_text);
        println!(
            "    {{ \"{}\", {}, {} }},  // {}",
            escaped,
            inst.json_text.len(),
            inst.valid as u8,
            i
        );
    }
    println!("}};");
}

fn c_escape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for b in s.bytes() {
        match b {
            b'"' => out.push_str("\\\""),
            b'\\' => out.push_str("\\\\"),
            b'\n' => out.push_str("\\n"),
            b'\r' => out.push_str("\\r"),
            b'\t' => out.push_str("\\t"),
            0x20..=0x7e => out.push(b as char),
            _ => out.push_str(&format!("\\x{:02x}", b)),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn c_escape_handles_quotes_and_control_bytes() {
        assert_eq!(c_escape("a\"b"), "a\\\"b");
        assert_eq!(c_escape("a\\b"), "a\\\\b");
        assert_eq!(c_escape("\u{2620}"), "\\xe2\\x98\\xa0");
    }
}
