// =========================
// tests/unit/error_tests.rs
// =========================
//! Unit tests for the error module
use axum::http::StatusCode;
use backend_lib::error::AppError;
use backend_lib::storage::StoreError;

#[test]
fn test_app_error_error_codes() {
    let cases = [
        (AppError::Unauthenticated, "AUTH_001", StatusCode::UNAUTHORIZED),
        (AppError::Forbidden, "AUTH_002", StatusCode::FORBIDDEN),
        (AppError::InvalidCredentials, "AUTH_003", StatusCode::UNAUTHORIZED),
        (AppError::ExpiredOrInvalidToken, "AUTH_004", StatusCode::UNAUTHORIZED),
        (AppError::NotFound("item".to_string()), "NF_001", StatusCode::NOT_FOUND),
        (
            AppError::ValidationFailed("bad".to_string()),
            "VAL_001",
            StatusCode::BAD_REQUEST,
        ),
        (
            AppError::Internal("boom".to_string()),
            "INT_001",
            StatusCode::INTERNAL_SERVER_ERROR,
        ),
    ];

    for (error, code, status) in cases {
        assert_eq!(error.error_code(), code, "{error}");
        assert_eq!(error.status_code(), status, "{error}");
    }
}

#[test]
fn test_infrastructure_errors_are_sanitized() {
    let err = AppError::Storage(StoreError::Io(std::io::Error::new(
        std::io::ErrorKind::PermissionDenied,
        "/var/lib/shopfront/store.json",
    )));
    assert!(err.is_internal());
    assert!(!err.sanitized_message().contains("/var/lib"));

    let err = AppError::Internal("smtp relay someone@ refused".to_string());
    assert!(!err.sanitized_message().contains("someone@"));

    // Caller mistakes are not internal and keep their wording
    let err = AppError::ValidationFailed("Your passwords don't match".to_string());
    assert!(!err.is_internal());
    assert!(err.sanitized_message().contains("Your passwords don't match"));
}
