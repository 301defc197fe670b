//! Fixed vectors that independent implementations of the scheme must reproduce.

use reqsig_auth::{Credential, ParamValue, SignableRequest};
use reqsig_core::{FixedClock, VerifyConfig};

use crate::{init_tracing, server_view};

const ORDERS_SIGNATURE: &str = "5c98bb818a6d22a3c824456db215306e0ed95fc576a27f9b464842dca5d624e3";

fn orders_request() -> SignableRequest {
    SignableRequest::new(
        "post",
        "/v1/orders",
        vec![
            ("Symbols", ParamValue::from(vec![" btc", "eth "])),
            ("note", ParamValue::from("a&b=c")),
            ("LIMIT", ParamValue::from("10")),
        ],
    )
    .unwrap()
}

#[test]
fn test_should_produce_known_canonical_string() {
    init_tracing();
    let mut request = orders_request();
    request.sign_with_clock(&Credential::new("app", "sekrit"), &FixedClock::new(1_700_000_123));

    assert_eq!(
        request.string_to_sign(),
        "POST\n/v1/orders\n\
         auth_key=app&auth_timestamp=1700000123&auth_version=1.0&\
         limit=10&note=a%26b%3Dc&symbols[]=btc&symbols[]=eth"
    );
    assert_eq!(request.auth_dict().unwrap()["auth_signature"], ORDERS_SIGNATURE);
}

#[test]
fn test_should_accept_vector_signed_elsewhere() {
    init_tracing();
    let line = format!(
        "/v1/orders?symbols%5B%5D=btc&symbols%5B%5D=eth&note=a%26b%3Dc&limit=10\
         &auth_version=1.0&auth_key=app&auth_timestamp=1700000123&auth_signature={ORDERS_SIGNATURE}"
    );
    let server = server_view("POST", &line).unwrap();

    let result = server.authenticate_with_clock(
        &Credential::new("app", "sekrit"),
        &VerifyConfig::default(),
        &FixedClock::new(1_700_000_200),
    );
    assert_eq!(result, Ok(true));
}
