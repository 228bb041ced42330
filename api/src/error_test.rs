use super::*;

#[test]
fn message_string_is_used() {
    assert_eq!(
        extract_message(r#"{"message":"Partner not found"}"#).as_deref(),
        Some("Partner not found")
    );
}

#[test]
fn message_list_yields_first_entry() {
    assert_eq!(
        extract_message(r#"{"message":["first","second"]}"#).as_deref(),
        Some("first")
    );
}

#[test]
fn message_list_of_non_strings_falls_back_to_unknown() {
    assert_eq!(extract_message(r#"{"message":[1]}"#).as_deref(), Some("Unknown error"));
}

#[test]
fn detail_string_is_used_when_message_missing() {
    assert_eq!(
        extract_message(r#"{"detail":"Invalid credentials"}"#).as_deref(),
        Some("Invalid credentials")
    );
}

#[test]
fn detail_validation_list_yields_first_msg() {
    let body = r#"{"detail":[{"loc":["body","username"],"msg":"field required"}]}"#;
    assert_eq!(extract_message(body).as_deref(), Some("field required"));
}

#[test]
fn non_json_body_has_no_message() {
    assert_eq!(extract_message("<html>bad gateway</html>"), None);
    assert_eq!(extract_message(""), None);
}

#[test]
fn status_error_classifies_auth_failures() {
    let unauthorized = ApiError::Status { status: 401, message: None };
    let forbidden = ApiError::Status { status: 403, message: None };
    let missing = ApiError::Status { status: 404, message: None };
    assert!(unauthorized.is_auth_failure());
    assert!(forbidden.is_auth_failure());
    assert!(!missing.is_auth_failure());
    assert!(!ApiError::Validation("x".into()).is_auth_failure());
}

#[test]
fn message_prefers_backend_text() {
    let err = ApiError::Status {
        status: 400,
        message: Some("Amount must be positive".into()),
    };
    assert_eq!(err.message(), "Amount must be positive");
    assert_eq!(ApiError::Status { status: 500, message: None }.message(), "Unknown error");
    assert_eq!(ApiError::Validation("Address is required".into()).message(), "Address is required");
}
