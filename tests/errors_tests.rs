//! 错误类型测试

use docads::errors::DocadsError;

#[test]
fn test_error_codes_are_stable() {
    assert_eq!(DocadsError::validation("x").code(), "E001");
    assert_eq!(DocadsError::file_operation("x").code(), "E002");
    assert_eq!(DocadsError::serialization("x").code(), "E003");
    assert_eq!(DocadsError::config_load("x").code(), "E004");
    assert_eq!(DocadsError::delivery("x").code(), "E005");
    assert_eq!(DocadsError::not_found("x").code(), "E006");
}

#[test]
fn test_display_uses_simple_format() {
    let err = DocadsError::validation("probability out of range");
    assert_eq!(
        err.to_string(),
        "Validation Error: probability out of range"
    );
}

#[test]
fn test_from_io_error() {
    let io = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
    let err: DocadsError = io.into();
    assert_eq!(err.code(), "E002");
    assert!(err.message().contains("denied"));
}

#[test]
fn test_from_serde_json_error() {
    let parse_err = serde_json::from_str::<serde_json::Value>("{bad").unwrap_err();
    let err: DocadsError = parse_err.into();
    assert_eq!(err.error_type(), "Serialization Error");
}

#[test]
fn test_from_toml_error() {
    let parse_err = toml::from_str::<toml::Value>("= broken").unwrap_err();
    let err: DocadsError = parse_err.into();
    assert_eq!(err.code(), "E004");
}
