use super::*;
use crate::error_code::ErrorCode;

// =============================================================================
// LlmError::error_code
// =============================================================================

#[test]
fn error_codes_are_distinct() {
    let errors = [
        LlmError::ConfigParse("bad".into()),
        LlmError::MissingApiKey { var: "KEY".into() },
        LlmError::ApiRequest("timeout".into()),
        LlmError::ApiResponse { status: 500, body: "oops".into() },
        LlmError::ApiParse("json".into()),
        LlmError::HttpClientBuild("tls".into()),
    ];
    let codes: std::collections::HashSet<&str> = errors.iter().map(ErrorCode::error_code).collect();
    assert_eq!(codes.len(), errors.len());
}

#[test]
fn error_code_missing_api_key() {
    let err = LlmError::MissingApiKey { var: "GEMINI_API_KEY".into() };
    assert_eq!(err.error_code(), "E_MISSING_API_KEY");
    assert!(err.to_string().contains("GEMINI_API_KEY"));
}

// =============================================================================
// LlmError::retryable
// =============================================================================

#[test]
fn retryable_api_request() {
    assert!(LlmError::ApiRequest("conn refused".into()).retryable());
}

#[test]
fn retryable_api_response_429_and_5xx() {
    assert!(LlmError::ApiResponse { status: 429, body: String::new() }.retryable());
    assert!(LlmError::ApiResponse { status: 503, body: String::new() }.retryable());
}

#[test]
fn not_retryable_client_errors() {
    assert!(!LlmError::ApiResponse { status: 400, body: String::new() }.retryable());
    assert!(!LlmError::ApiParse("eof".into()).retryable());
    assert!(!LlmError::MissingApiKey { var: "K".into() }.retryable());
}

// =============================================================================
// Message / Role
// =============================================================================

#[test]
fn role_serializes_lowercase() {
    assert_eq!(serde_json::to_value(Role::User).unwrap(), "user");
    assert_eq!(serde_json::to_value(Role::Model).unwrap(), "model");
    assert_eq!(Role::Model.as_str(), "model");
}

#[test]
fn message_constructors_set_role() {
    assert_eq!(Message::user("hi").role, Role::User);
    assert_eq!(Message::model("hello").role, Role::Model);
}

#[test]
fn default_options_match_widget_settings() {
    let opts = GenerationOptions::default();
    assert!((opts.temperature - 0.3).abs() < f32::EPSILON);
    assert!(opts.web_search);
    assert!(opts.max_output_tokens.is_none());
}

#[test]
fn total_tokens_saturates() {
    let resp = ChatResponse { input_tokens: u64::MAX, output_tokens: 5, ..ChatResponse::default() };
    assert_eq!(resp.total_tokens(), u64::MAX);
}
