use std::io::Write;
use std::process::Command;

fn bin() -> &'static str {
    env!("CARGO_BIN_EXE_json-schema-validate")
}

fn write_schema(text: &str) -> tempfile_stub::NamedTempFile {
    tempfile_stub::NamedTempFile::new(text)
}

/// A tiny local stand-in for `tempfile`: the teacher's own test suite
/// (`schema-struct/tests/test.rs`) doesn't pull in a temp-file crate
/// either, it just writes to `std::env::temp_dir()` directly.
mod tempfile_stub {
    use std::fs;
    use std::path::PathBuf;

    pub struct NamedTempFile {
        pub path: PathBuf,
    }

    impl NamedTempFile {
        pub fn new(contents: &str) -> Self {
            let mut path = std::env::temp_dir();
            let unique = format!(
                "json-schema-validate-test-{}-{}.json",
                std::process::id(),
                contents.len()
            );
            path.push(unique);
            fs::write(&path, contents).expect("write temp schema file");
            NamedTempFile { path }
        }
    }

    impl Drop for NamedTempFile {
        fn drop(&mut self) {
            let _ = fs::remove_file(&self.path);
        }
    }
}

#[test]
fn valid_schema_exits_zero() {
    let file = write_schema(r#"{"type":"integer","minimum":0}"#);
    let status = Command::new(bin())
        .arg("-q")
        .arg(&file.path)
        .status()
        .expect("spawn json-schema-validate");
    assert!(status.success());
}

#[test]
fn malformed_json_exits_two() {
    let file = write_schema("{not json");
    let output = Command::new(bin())
        .arg("-q")
        .arg(&file.path)
        .output()
        .expect("spawn json-schema-validate");
    assert_eq!(output.status.code(), Some(2));
}

#[test]
fn malformed_schema_exits_two() {
    let file = write_schema(r#"{"maximum":"not a number"}"#);
    let output = Command::new(bin())
        .arg("-q")
        .arg(&file.path)
        .output()
        .expect("spawn json-schema-validate");
    assert_eq!(output.status.code(), Some(2));
}

#[test]
fn no_schema_files_is_an_invalid_option() {
    let output = Command::new(bin())
        .output()
        .expect("spawn json-schema-validate");
    assert_eq!(output.status.code(), Some(1));
}

#[test]
fn quiet_flag_suppresses_stdout_on_success() {
    let file = write_schema(r#"{"type":"string"}"#);
    let output = Command::new(bin())
        .arg("-q")
        .arg(&file.path)
        .output()
        .expect("spawn json-schema-validate");
    assert!(output.stdout.is_empty());
    let _ = std::io::stdout().flush();
}
