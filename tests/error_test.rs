//! Tests for error types

use breeding_results::Error;

#[test]
fn test_invalid_input_error() {
    let error = Error::InvalidInput("k must be in (0, 1]".to_string());
    let error_str = format!("{error}");
    assert!(error_str.contains("Invalid input"));
    assert!(error_str.contains("k must be in (0, 1]"));
}

#[test]
fn test_shape_mismatch_error() {
    let error = Error::ShapeMismatch {
        expected: 10,
        actual: 9,
    };
    let error_str = format!("{error}");
    assert!(error_str.contains("Shape mismatch"));
    assert!(error_str.contains("10"));
    assert!(error_str.contains('9'));
}

#[test]
fn test_invalid_config_error() {
    let error = Error::InvalidConfig("drop_rate must be in [0, 1)".to_string());
    let error_str = format!("{error}");
    assert!(error_str.contains("Invalid model configuration"));
    assert!(error_str.contains("drop_rate"));
}

#[test]
fn test_missing_column_error() {
    let error = Error::MissingColumn("config".to_string());
    assert_eq!(format!("{error}"), "Missing column 'config' in results table");
}

#[test]
fn test_config_decode_error() {
    let error = Error::ConfigDecode {
        row: 3,
        message: "expected value".to_string(),
    };
    let error_str = format!("{error}");
    assert!(error_str.contains("data row 3"));
    assert!(error_str.contains("expected value"));
    assert!(error_str.contains("not partially parsed"));
}

#[test]
fn test_io_error_conversion() {
    let io_error = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "read-only");
    let error: Error = io_error.into();
    let error_str = format!("{error}");
    assert!(error_str.contains("IO error"));
}

#[test]
fn test_json_error_conversion() {
    let json_error = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
    let error: Error = json_error.into();
    assert!(format!("{error}").contains("JSON error"));
}

#[test]
fn test_error_debug() {
    let error = Error::MissingColumn("config".to_string());
    let debug_str = format!("{error:?}");
    assert!(debug_str.contains("MissingColumn"));
}

#[test]
fn test_result_type_alias_error() {
    fn returns_error() -> breeding_results::Result<i32> {
        Err(Error::InvalidInput("test error".to_string()))
    }

    let result = returns_error();
    assert!(result.is_err());
}

#[test]
fn test_invalid_data_error() {
    let error = Error::InvalidData {
        file: "phenotypes_sorted.csv".to_string(),
        message: "no trait column 'milk'".to_string(),
    };
    assert_eq!(
        format!("{error}"),
        "Malformed data file 'phenotypes_sorted.csv': no trait column 'milk'"
    );
}
