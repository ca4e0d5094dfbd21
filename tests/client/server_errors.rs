//! Tier 3: Server Errors

use crate::test_utils::*;

/// Error entries keep code, description and position
#[test]
fn test_error_entries_parsed() {
    let body = r#"{"errors": [
        {"position": ["params", "data", 0], "code": "validation failed", "description": "bad field"},
        {"code": "instance not unique", "description": "duplicate"}
    ]}"#;
    let err = client(Scripted::new().reply(400, body))
        .query(Expr::null())
        .unwrap_err();

    match &err {
        ClientError::Server { kind, status, errors } => {
            assert_eq!(*kind, ServerErrorKind::BadRequest);
            assert_eq!(*status, 400);
            assert_eq!(errors.len(), 2);
            assert_eq!(errors[0].position.to_string(), "params.data[0]");
            assert!(errors[1].position.is_root());
        }
        other => panic!("Expected Server, got {:?}", other),
    }
    let text = err.to_string();
    assert!(text.starts_with("bad request (status 400)"), "{}", text);
    assert!(text.contains("validation failed: bad field at params.data[0]"), "{}", text);
}

/// Every documented status maps to its kind
#[test]
fn test_status_mapping() {
    let cases = [
        (400, ServerErrorKind::BadRequest),
        (401, ServerErrorKind::Unauthorized),
        (403, ServerErrorKind::PermissionDenied),
        (404, ServerErrorKind::NotFound),
        (500, ServerErrorKind::Internal),
        (503, ServerErrorKind::Unavailable),
        (429, ServerErrorKind::Unknown(429)),
    ];
    for (status, kind) in cases {
        let err = client(Scripted::new().reply(status, r#"{"errors": []}"#))
            .query(Expr::null())
            .unwrap_err();
        assert_eq!(err.server_kind(), Some(kind), "status {}", status);
    }
    assert!(ServerErrorKind::Unavailable.is_retryable());
    assert!(!ServerErrorKind::NotFound.is_retryable());
}
