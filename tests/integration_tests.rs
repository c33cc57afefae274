use record_converter::{
    convert_file, resolve_reader, resolve_writer, ConvertError, FileFormat, Record,
};
use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;
use tempfile::TempDir;

/// Helper to create an input file inside the test's scratch directory
fn create_temp_file(dir: &TempDir, name: &str, content: &str) -> PathBuf {
    let path = dir.path().join(name);
    fs::write(&path, content).unwrap();
    path
}

fn record(fields: &[(&str, &str)]) -> Record {
    fields.iter().copied().collect()
}

fn sample_records() -> Vec<Record> {
    vec![
        record(&[("id", "1"), ("name", "John Doe"), ("note", "Contains, comma")]),
        record(&[("id", "2"), ("name", "Jane"), ("note", "a < b & \"quoted\"")]),
        record(&[("id", "3"), ("name", ""), ("note", "multi\nline")]),
    ]
}

fn round_trip(records: &[Record], file_name: &str) -> Vec<Record> {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join(file_name);

    resolve_writer(&path).unwrap().generate(records, &path).unwrap();
    resolve_reader(&path).unwrap().parse(&path).unwrap()
}

#[test]
fn test_round_trip_json() {
    let records = sample_records();
    assert_eq!(round_trip(&records, "data.json"), records);
}

#[test]
fn test_round_trip_xml() {
    let records = sample_records();
    assert_eq!(round_trip(&records, "data.xml"), records);
}

#[test]
fn test_round_trip_csv() {
    let records = sample_records();
    assert_eq!(round_trip(&records, "data.csv"), records);
}

#[test]
fn test_round_trip_csv_fills_union_columns() {
    let records = vec![record(&[("a", "1"), ("b", "2")]), record(&[("c", "3")])];
    let parsed = round_trip(&records, "union.csv");

    assert_eq!(parsed.len(), 2);
    assert_eq!(parsed[0], record(&[("a", "1"), ("b", "2"), ("c", "")]));
    assert_eq!(parsed[1], record(&[("a", ""), ("b", ""), ("c", "3")]));
}

#[test]
fn test_json_to_csv() {
    let dir = TempDir::new().unwrap();
    let input = create_temp_file(
        &dir,
        "input.json",
        r#"[{"a":"1","b":"2"},{"c":"3"}]"#,
    );
    let output = dir.path().join("output.csv");

    let summary = convert_file(&input, &output).unwrap();

    assert_eq!(summary.records, 2);
    assert_eq!(summary.input_format, FileFormat::Json);
    assert_eq!(summary.output_format, FileFormat::Csv);
    assert_eq!(fs::read_to_string(&output).unwrap(), "a,b,c\n1,2,\n,,3\n");
}

#[test]
fn test_csv_to_xml() {
    let dir = TempDir::new().unwrap();
    let input = create_temp_file(&dir, "input.csv", "123invalid;valid_name\nx;y\n");
    let output = dir.path().join("output.xml");

    convert_file(&input, &output).unwrap();

    let content = fs::read_to_string(&output).unwrap();
    assert!(content.contains("<_123invalid>x</_123invalid>"));
    assert!(content.contains("<valid_name>y</valid_name>"));
}

#[test]
fn test_xml_to_json_maps_empty_elements() {
    let dir = TempDir::new().unwrap();
    let input = create_temp_file(
        &dir,
        "input.xml",
        "<records><record><id>1</id><name></name></record></records>",
    );
    let output = dir.path().join("output.json");

    convert_file(&input, &output).unwrap();

    let value: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(&output).unwrap()).unwrap();
    assert_eq!(value, serde_json::json!([{"id": "1", "name": ""}]));
}

#[test]
fn test_empty_inputs_produce_empty_outputs() {
    let dir = TempDir::new().unwrap();
    let empty_json = create_temp_file(&dir, "empty.json", "[]");
    let empty_csv = create_temp_file(&dir, "empty.csv", "");

    let csv_out = dir.path().join("out.csv");
    convert_file(&empty_json, &csv_out).unwrap();
    assert_eq!(fs::metadata(&csv_out).unwrap().len(), 0);

    let json_out = dir.path().join("out.json");
    convert_file(&empty_csv, &json_out).unwrap();
    assert_eq!(fs::read_to_string(&json_out).unwrap().trim(), "[]");

    let xml_out = dir.path().join("out.xml");
    convert_file(&empty_csv, &xml_out).unwrap();
    let xml = fs::read_to_string(&xml_out).unwrap();
    assert!(xml.contains("<records>") && xml.contains("</records>"));
    assert!(!xml.contains("<record>"));
}

#[test]
fn test_nested_input_rejected_for_json_and_xml() {
    let dir = TempDir::new().unwrap();
    let json = create_temp_file(
        &dir,
        "nested.json",
        r#"[{"id":"1","addr":{"city":"NYC"}}]"#,
    );
    let xml = create_temp_file(
        &dir,
        "nested.xml",
        "<records><record><id>1</id><addr><city>NYC</city></addr></record></records>",
    );

    for input in [json, xml] {
        let err = convert_file(&input, &dir.path().join("out.csv")).unwrap_err();
        assert!(matches!(err, ConvertError::Structure { .. }));
        assert!(err.to_string().contains("Nested structures are not supported"));
    }
}

#[test]
fn test_malformed_xml_writes_no_output() {
    let dir = TempDir::new().unwrap();
    let input = create_temp_file(&dir, "junk.xml", "this is not xml");
    let output = dir.path().join("out.json");

    let err = convert_file(&input, &output).unwrap_err();

    assert!(matches!(err, ConvertError::Syntax { .. }));
    assert!(!output.exists());
}

#[test]
fn test_json_numbers_survive_conversion_to_csv() {
    let dir = TempDir::new().unwrap();
    let input = create_temp_file(
        &dir,
        "input.json",
        "\u{feff}[{\"id\": 123456789012345678901234567890, \"amt\": 1e400}]",
    );
    let output = dir.path().join("out.csv");

    convert_file(&input, &output).unwrap();

    assert_eq!(
        fs::read_to_string(&output).unwrap(),
        "id,amt\n123456789012345678901234567890,1e400\n"
    );
}

#[test]
fn test_creates_missing_output_directories() {
    let dir = TempDir::new().unwrap();
    let input = create_temp_file(&dir, "input.csv", "id\n1\n");
    let output = dir.path().join("nested/deeper/output.json");

    convert_file(&input, &output).unwrap();

    assert!(output.exists());
}

#[test]
fn test_directory_creation_failure() {
    let dir = TempDir::new().unwrap();
    let input = create_temp_file(&dir, "input.csv", "id\n1\n");
    let blocker = create_temp_file(&dir, "blocker", "not a directory");
    let output = blocker.join("output.json");

    let err = convert_file(&input, &output).unwrap_err();

    assert!(matches!(err, ConvertError::Directory { .. }));
}

#[test]
fn test_unsupported_formats() {
    let dir = TempDir::new().unwrap();
    let input = create_temp_file(&dir, "input.txt", "hello");

    let err = convert_file(&input, &dir.path().join("out.json")).unwrap_err();
    assert!(matches!(err, ConvertError::UnsupportedFormat { .. }));
    assert!(err.to_string().contains(".txt"));

    let err = convert_file(Path::new("input.csv"), Path::new("output")).unwrap_err();
    assert!(matches!(err, ConvertError::UnsupportedFormat { .. }));
}

#[test]
fn test_missing_input_file() {
    let dir = TempDir::new().unwrap();
    let err = convert_file(&dir.path().join("nope.json"), &dir.path().join("out.csv"))
        .unwrap_err();

    assert!(matches!(err, ConvertError::NotFound { .. }));
    assert!(err.to_string().starts_with("Error: Input file"));
}

#[test]
fn test_cli_converts_and_reports() {
    let dir = TempDir::new().unwrap();
    let input = create_temp_file(&dir, "input.csv", "id;name\n1;Ann\n");
    let output = dir.path().join("output.json");

    let result = Command::new(env!("CARGO_BIN_EXE_record-converter"))
        .args(["--input", input.to_str().unwrap(), "--output", output.to_str().unwrap()])
        .output()
        .expect("Failed to run converter");

    assert!(result.status.success());
    let stdout = String::from_utf8(result.stdout).unwrap();
    assert!(stdout.contains("Successfully converted"));

    let value: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(&output).unwrap()).unwrap();
    assert_eq!(value, serde_json::json!([{"id": "1", "name": "Ann"}]));
}

#[test]
fn test_cli_format_override_and_failure_exit() {
    let dir = TempDir::new().unwrap();
    let input = create_temp_file(&dir, "input.data", r#"{"id":"1"}"#);
    let output = dir.path().join("output.data");

    let result = Command::new(env!("CARGO_BIN_EXE_record-converter"))
        .args([
            "--input",
            input.to_str().unwrap(),
            "--output",
            output.to_str().unwrap(),
            "--from",
            "json",
            "--to",
            "csv",
        ])
        .output()
        .expect("Failed to run converter");
    assert!(result.status.success());
    assert_eq!(fs::read_to_string(&output).unwrap(), "id\n1\n");

    let result = Command::new(env!("CARGO_BIN_EXE_record-converter"))
        .args(["--input", input.to_str().unwrap(), "--output", "out.csv"])
        .output()
        .expect("Failed to run converter");
    assert!(!result.status.success());
    let stderr = String::from_utf8(result.stderr).unwrap();
    assert!(stderr.contains("Unsupported file format '.data'"));
}
