use std::process::Command;

fn bin() -> &'static str {
    env!("CARGO_BIN_EXE_json-schema-generate")
}

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
                "json-schema-generate-test-{}-{}.json",
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

fn write_schema(text: &str) -> tempfile_stub::NamedTempFile {
    tempfile_stub::NamedTempFile::new(text)
}

#[test]
fn plain_format_emits_one_json_value_per_line() {
    let file = write_schema(r#"{"enum":[1,2,3]}"#);
    let output = Command::new(bin())
        .arg(&file.path)
        .arg("-j")
        .output()
        .expect("spawn json-schema-generate");
    assert!(output.status.success());
    let text = String::from_utf8(output.stdout).unwrap();
    for line in text.lines() {
        assert!(serde_json::from_str::<serde_json::Value>(line).is_ok());
    }
}

#[test]
fn valid_only_flag_excludes_invalid_vectors() {
    let file = write_schema(r#"{"type":"integer","minimum":0,"maximum":2}"#);
    let output = Command::new(bin())
        .arg(&file.path)
        .arg("-v")
        .arg("-j")
        .output()
        .expect("spawn json-schema-generate");
    let text = String::from_utf8(output.stdout).unwrap();
    assert!(!text.contains("-1"));
}

#[test]
fn c_format_emits_a_static_const_array() {
    let file = write_schema(r#"{"type":"integer"}"#);
    let output = Command::new(bin())
        .arg(&file.path)
        .arg("-f")
        .arg("c")
        .arg("--c-variable-name")
        .arg("my_vectors")
        .output()
        .expect("spawn json-schema-generate");
    let text = String::from_utf8(output.stdout).unwrap();
    assert!(text.contains("my_vectors[]"));
    assert!(text.contains("is_valid"));
}

#[test]
fn malformed_schema_file_exits_two() {
    let file = write_schema("not json at all");
    let output = Command::new(bin())
        .arg(&file.path)
        .output()
        .expect("spawn json-schema-generate");
    assert_eq!(output.status.code(), Some(2));
}
