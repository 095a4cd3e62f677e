use color_eyre::Result;
use serde_json::{json, Value};
use sjwt::{
    error::ErrorKind, jwt::TokenEngine, Claims, EnvSecret, Secret, SecretProvider,
};
use sjwt_clock::{TestClock, UnixTime};

const NOW: UnixTime = UnixTime(1_700_000_000);

fn claims(value: Value) -> Claims {
    match value {
        Value::Object(map) => map,
        other => panic!("not an object: {other}"),
    }
}

#[test]
fn issued_token_is_accepted() -> Result<()> {
    let token = sjwt::encode(&claims(json!({ "user_id": 123 })), 60, "s3cr3t")?;
    let decoded = sjwt::decode(token.as_str(), "s3cr3t")?;

    assert!(decoded.is_valid());
    assert_eq!(decoded.payload()["user_id"], 123);

    Ok(())
}

#[test]
fn zero_lifetime_token_expires() -> Result<()> {
    let mut engine = TokenEngine::with_clock(TestClock::new(NOW));
    let secret = Secret::from("s3cr3t");
    let token = engine.encode(&claims(json!({ "user_id": 200 })), 0, &secret)?;

    engine = TokenEngine::with_clock(TestClock::new(NOW.add_secs(1)));
    let decoded = engine.decode(token.as_str(), &secret)?;

    assert!(decoded.token_expired());
    assert!(decoded.signature_valid());
    assert!(!decoded.is_valid());

    Ok(())
}

#[test]
fn two_segments_are_not_a_token() {
    let err = sjwt::decode("abc.def", "s3cr3t").unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidFormat);
}

#[test]
fn token_without_exp_is_refused() {
    let header = sjwt_base64::encode(br#"{"typ":"JWT","alg":"HS256"}"#);
    let payload = sjwt_base64::encode(br#"{"user_id":123}"#);
    let message = format!("{header}.{payload}");
    let signature = sjwt_base64::encode(sjwt::jws::sign(
        message.as_bytes(),
        &Secret::from("s3cr3t"),
    ));

    let err = sjwt::decode(&format!("{message}.{signature}"), "s3cr3t").unwrap_err();
    assert_eq!(err.kind(), ErrorKind::MissingExpClaim);
}

#[test]
fn token_from_other_secret_is_refused() -> Result<()> {
    let token = sjwt::encode(&claims(json!({ "user_id": 1 })), 60, "secretA")?;
    let decoded = sjwt::decode(token.as_str(), "secretB")?;

    assert!(!decoded.signature_valid());
    assert!(!decoded.is_valid());

    Ok(())
}

#[test]
fn header_to_context_flow() -> Result<()> {
    std::env::set_var("SJWT_SCENARIO_SECRET", "from-env");
    let provider = EnvSecret::from_vars(["SJWT_SCENARIO_SECRET"]);
    let engine = TokenEngine::new();
    let settings = sjwt::config::Settings::default();

    let token = engine.encode(
        &claims(json!({ "id": 42, "email": "ana@example.com" })),
        settings.default_expiration,
        &provider,
    )?;
    let header_value = format!("Bearer {token:#}");

    let found = settings
        .extract_token(&header_value)
        .expect("token in header");
    let decoded = engine.decode(found.as_str(), &provider)?;
    let ctx = sjwt::context::UserContext::from_decoded(&decoded).expect("valid token");

    assert_eq!(ctx.id(), Some(&json!(42)));
    assert_eq!(ctx.email(), Some("ana@example.com"));
    assert_eq!(provider.secret()?, &Secret::from("from-env"));

    Ok(())
}
