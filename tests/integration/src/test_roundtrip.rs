//! Sign on one side, authenticate on the other.

use reqsig_auth::{AuthError, Credential, ParamValue, SignableRequest, StaticCredentialProvider};
use reqsig_core::{FixedClock, VerifyConfig};
use serde_json::json;

use crate::{init_tracing, request_line, server_view};

#[test]
fn test_should_roundtrip_scalars_lists_and_structured_values() {
    init_tracing();
    let credential = Credential::new("app", "sekrit");

    let mut client = SignableRequest::new(
        "put",
        "/v1/widgets/42",
        vec![
            ("Name", ParamValue::from("  Sprocket  ")),
            ("Tags", ParamValue::from(vec!["blue", " large "])),
            ("Filter", ParamValue::from(json!({ "max": 10, "min": 1 }))),
            ("Query", ParamValue::from("a&b=c d/é+%")),
        ],
    )
    .unwrap();
    client.sign(&credential);

    let server = server_view("PUT", &request_line(&client)).unwrap();
    assert_eq!(server.string_to_sign(), client.string_to_sign());
    assert_eq!(server.authenticate(&credential, &VerifyConfig::default()), Ok(true));
}

#[test]
fn test_should_reject_replayed_request_after_grace_window() {
    init_tracing();
    let credential = Credential::new("app", "sekrit");
    let signed_at = FixedClock::new(1_700_000_000);

    let mut client = SignableRequest::new("GET", "/feed", vec![("page", "2")]).unwrap();
    client.sign_with_clock(&credential, &signed_at);
    let server = server_view("GET", &request_line(&client)).unwrap();

    let config = VerifyConfig::default().with_timestamp_grace(60);
    assert_eq!(
        server.authenticate_with_clock(&credential, &config, &signed_at.advanced_by(59)),
        Ok(true)
    );
    assert!(matches!(
        server.authenticate_with_clock(&credential, &config, &signed_at.advanced_by(60)),
        Err(AuthError::Expired { grace: 60, .. })
    ));
}

#[test]
fn test_should_reject_parameter_smuggled_in_transit() {
    init_tracing();
    let credential = Credential::new("app", "sekrit");

    let mut client = SignableRequest::new("DELETE", "/files", vec![("id", "7")]).unwrap();
    client.sign(&credential);
    let line = format!("{}&force=true", request_line(&client));

    let server = server_view("DELETE", &line).unwrap();
    let err = server
        .authenticate(&credential, &VerifyConfig::default())
        .unwrap_err();
    assert!(matches!(err, AuthError::InvalidSignature { .. }));
    assert!(err.to_string().contains("force=true"));
}

#[test]
fn test_should_resolve_credentials_by_key() {
    init_tracing();
    let provider = StaticCredentialProvider::new(vec![
        ("alice".to_owned(), "a-secret".to_owned()),
        ("bob".to_owned(), "b-secret".to_owned()),
    ]);

    for (key, secret) in [("alice", "a-secret"), ("bob", "b-secret")] {
        let mut client = SignableRequest::new("GET", "/me", Vec::<(&str, &str)>::new()).unwrap();
        client.sign(&Credential::new(key, secret));
        let server = server_view("GET", &request_line(&client)).unwrap();
        assert_eq!(
            server.authenticate_with_provider(&provider, &VerifyConfig::default()),
            Ok(true)
        );
    }

    // Bob's key with Alice's secret.
    let mut forged = SignableRequest::new("GET", "/me", Vec::<(&str, &str)>::new()).unwrap();
    forged.sign(&Credential::new("bob", "a-secret"));
    let server = server_view("GET", &request_line(&forged)).unwrap();
    assert!(matches!(
        server.authenticate_with_provider(&provider, &VerifyConfig::default()),
        Err(AuthError::InvalidSignature { .. })
    ));
}

#[test]
fn test_should_authenticate_http_request_head() {
    init_tracing();
    let credential = Credential::new("app", "sekrit");
    let mut client = SignableRequest::new("POST", "/upload", vec![("size", "1024")]).unwrap();
    client.sign(&credential);

    let (parts, ()) = http::Request::builder()
        .method("POST")
        .uri(format!("http://localhost:8080{}", request_line(&client)))
        .body(())
        .unwrap()
        .into_parts();

    let server = SignableRequest::from_parts(&parts).unwrap();
    assert_eq!(server.authenticate(&credential, &VerifyConfig::default()), Ok(true));
}
