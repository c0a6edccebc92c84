//! Schema dispatch and lazy compilation against schema files on disk.

use camino::Utf8PathBuf;
use std::fs;
use tempfile::TempDir;
use yamlfmt_schema::{SchemaError, YamlSchema, YamlSchemas};

fn create_temp_dir() -> TempDir {
    tempfile::tempdir().expect("tempdir")
}

fn write_schema(temp: &TempDir, name: &str, contents: &str) -> String {
    let root = Utf8PathBuf::from_path_buf(temp.path().to_path_buf()).unwrap();
    let path = root.join(name);
    fs::write(&path, contents).unwrap();
    path.into_string()
}

fn requires_name() -> &'static str {
    r#"{
        "$schema": "https://json-schema.org/draft/2020-12/schema",
        "type": "object",
        "required": ["name"],
        "properties": { "name": { "type": "string" } }
    }"#
}

fn requires_port() -> &'static str {
    r#"{
        "type": "object",
        "required": ["port"]
    }"#
}

#[test]
fn test_conforming_document_passes() {
    let temp = create_temp_dir();
    let url = write_schema(&temp, "name.json", requires_name());
    let schema = YamlSchema::new(url, "**/*.yaml");

    assert_eq!(schema.validate("svc/app.yaml", b"name: web\n"), Ok(()));
    assert!(schema.is_compiled());
}

#[test]
fn test_nonconforming_document_lists_violations() {
    let temp = create_temp_dir();
    let url = write_schema(&temp, "name.json", requires_name());
    let schema = YamlSchema::new(url.clone(), "**/*.yaml");

    let err = schema.validate("app.yaml", b"name: 3\n").unwrap_err();
    match &err {
        SchemaError::Invalid {
            url: got_url,
            path,
            violations,
        } => {
            assert_eq!(got_url, &url);
            assert_eq!(path, "app.yaml");
            assert_eq!(violations.len(), 1);
            assert!(violations[0].starts_with("/name"));
        }
        other => panic!("unexpected error: {other:?}"),
    }
    assert!(err.to_string().contains("does not conform"));
}

#[test]
fn test_every_document_in_stream_is_checked() {
    let temp = create_temp_dir();
    let url = write_schema(&temp, "name.json", requires_name());
    let schema = YamlSchema::new(url, "*.yaml");

    let err = schema
        .validate("multi.yaml", b"name: a\n---\nother: b\n")
        .unwrap_err();
    assert!(matches!(err, SchemaError::Invalid { .. }));
}

#[test]
fn test_unmatched_glob_never_compiles() {
    let schema = YamlSchema::new("/definitely/not/here.json", "deploy/**/*.yaml");

    for path in ["a.yaml", "src/b.yaml", "deployment/c.yaml"] {
        assert_eq!(
            schema.validate(path, b"a: 1\n"),
            Err(SchemaError::NoPathMatch)
        );
    }
    assert!(!schema.is_compiled());
}

#[test]
fn test_unreachable_schema_is_compile_error() {
    let schema = YamlSchema::new("/definitely/not/here.json", "**/*.yaml");
    let err = schema.validate("x.yaml", b"a: 1\n").unwrap_err();
    assert!(matches!(err, SchemaError::Compile { .. }));
    assert!(!err.is_no_path_match());
    assert!(!schema.is_compiled());
}

#[test]
fn test_registry_returns_matching_schema_result_verbatim() {
    let temp = create_temp_dir();
    let name = write_schema(&temp, "name.json", requires_name());
    let port = write_schema(&temp, "port.json", requires_port());

    let schemas = YamlSchemas::from_pairs([
        (name.as_str(), "apps/*.yaml"),
        (port.as_str(), "services/*.yaml"),
    ]);

    assert_eq!(schemas.validate("apps/web.yaml", b"name: web\n"), Ok(()));
    let err = schemas
        .validate("services/api.yaml", b"name: api\n")
        .unwrap_err();
    match err {
        SchemaError::Invalid { url, .. } => assert_eq!(url, port),
        other => panic!("unexpected error: {other:?}"),
    }
    assert_eq!(
        schemas.validate("docs/readme.yaml", b"x: 1\n"),
        Err(SchemaError::NoPathMatch)
    );

    let compiled: Vec<bool> = schemas.iter().map(YamlSchema::is_compiled).collect();
    assert_eq!(compiled, vec![true, true]);
}

#[test]
fn test_first_configured_schema_wins_on_overlap() {
    let temp = create_temp_dir();
    let name = write_schema(&temp, "name.json", requires_name());
    let port = write_schema(&temp, "port.json", requires_port());

    let schemas = YamlSchemas::from_pairs([(name.as_str(), "**/*.yaml"), (port.as_str(), "**/*.yaml")]);

    assert_eq!(schemas.validate("a.yaml", b"name: x\n"), Ok(()));
    let second: Vec<bool> = schemas.iter().map(YamlSchema::is_compiled).collect();
    assert_eq!(second, vec![true, false]);
}

#[test]
fn test_schema_written_in_yaml_is_accepted() {
    let temp = create_temp_dir();
    let url = write_schema(
        &temp,
        "name.yaml",
        "type: object\nrequired:\n  - name\n",
    );
    let schema = YamlSchema::new(format!("file://{}", url), "*.yaml");
    assert_eq!(schema.validate("a.yaml", b"name: x\n"), Ok(()));
    assert!(schema.validate("b.yaml", b"other: x\n").is_err());
}
