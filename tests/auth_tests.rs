use jsonwebtoken::{Algorithm, EncodingKey, Header, encode};
use serde_json::{Value, json};
use teams2go::bot::{ActivityVerifier, BotFrameworkVerifier, WebhookRequest};
use teams2go::core::config::{AppConfig, BotConfig};
use teams2go::errors::BridgeError;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const SIGNING_KEY: &[u8] = include_bytes!("fixtures/test_signing_key.pem");
const KID: &str = "test-kid";
const MODULUS: &str = "jguKLQBQExjiCKDp-J2tivRQmgWp7qiHHzKRESakhFJm50DCIpdFwZnUFqiS4FNgSEYWWKYa9e4kk7AxnLxZDcXWQU75Wic9_odQNe-pwB4ONjy-Sq0kkrFkwX_hJf_y0oLxkc0RM6-mYroo-DLjp-MIAtVfRzMDkfddgQt_G6SWSPdnUsYMuXCu65APkVlqHuiVo2MX8lGMjf0GcFbOZmVzEz5kQDlnhUgji4EleZq9nxVA6ixm2d_0PqLEsPSPtYO_OaBUxFX9Pn3i0125a1NtIe_UqUN8dvC9vv6yZPcMXF4jiZLojsmQaA4vmXtAaX6pcFwxCPcUZh7Px8fi1w";
const APP_ID: &str = "00000000-1111-2222-3333-444444444444";
const SERVICE_URL: &str = "https://smba.trafficmanager.net/emea/";
// 2100-01-01T00:00:00Z
const FAR_FUTURE: u64 = 4_102_444_800;

async fn key_server(expected_fetches: u64) -> MockServer {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/openidconfiguration"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "issuer": "https://api.botframework.com",
            "jwks_uri": format!("{}/keys", server.uri()),
            "id_token_signing_alg_values_supported": ["RS256"]
        })))
        .expect(expected_fetches)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/keys"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "keys": [{
                "kty": "RSA",
                "use": "sig",
                "kid": KID,
                "n": MODULUS,
                "e": "AQAB",
                "endorsements": ["msteams"]
            }]
        })))
        .expect(expected_fetches)
        .mount(&server)
        .await;
    server
}

fn bot_config(server: &MockServer) -> BotConfig {
    let metadata_url = format!("{}/openidconfiguration", server.uri());
    AppConfig::from_lookup(move |key| match key {
        "MicrosoftAppId" => Some(APP_ID.to_string()),
        "MicrosoftAppPassword" => Some("app-secret".to_string()),
        "BOT_OPENID_METADATA_URL" => Some(metadata_url.clone()),
        _ => None,
    })
    .bot
    .expect("bot config present")
}

fn sign(claims: &Value, kid: &str) -> String {
    let mut header = Header::new(Algorithm::RS256);
    header.kid = Some(kid.to_string());
    let key = EncodingKey::from_rsa_pem(SIGNING_KEY).expect("test key parses");
    encode(&header, claims, &key).expect("token signs")
}

fn claims() -> Value {
    json!({
        "iss": "https://api.botframework.com",
        "aud": APP_ID,
        "exp": FAR_FUTURE,
        "nbf": 1_700_000_000u64,
        "serviceurl": SERVICE_URL
    })
}

fn activity_body() -> String {
    json!({
        "type": "message",
        "id": "1",
        "text": "hi",
        "from": {"id": "29:user"},
        "recipient": {"id": format!("28:{APP_ID}")},
        "conversation": {"id": "a:1"},
        "serviceUrl": SERVICE_URL
    })
    .to_string()
}

fn request(token: Option<&str>, body: String) -> WebhookRequest {
    let headers = match token {
        Some(t) => json!({"authorization": format!("Bearer {t}")}),
        None => json!({"content-type": "application/json"}),
    };
    WebhookRequest {
        method: "POST".to_string(),
        headers,
        body,
    }
}

fn assert_unauthorized(result: Result<impl std::fmt::Debug, BridgeError>) {
    match result {
        Err(e @ BridgeError::Unauthorized(_)) => assert_eq!(e.status_code(), 401),
        other => panic!("expected unauthorized, got {other:?}"),
    }
}

#[tokio::test]
async fn accepts_token_signed_by_published_key() {
    let server = key_server(1).await;
    let verifier = BotFrameworkVerifier::new(&bot_config(&server));

    let token = sign(&claims(), KID);
    let activity = verifier
        .verify(&request(Some(&token), activity_body()))
        .await
        .expect("token accepted");

    assert_eq!(activity.activity_type, "message");
    assert_eq!(activity.text.as_deref(), Some("hi"));
}

#[tokio::test]
async fn missing_header_is_rejected_without_fetching_keys() {
    let server = key_server(0).await;
    let verifier = BotFrameworkVerifier::new(&bot_config(&server));

    assert_unauthorized(verifier.verify(&request(None, activity_body())).await);
}

#[tokio::test]
async fn wrong_audience_is_rejected() {
    let server = key_server(1).await;
    let verifier = BotFrameworkVerifier::new(&bot_config(&server));

    let mut wrong = claims();
    wrong["aud"] = json!("some-other-bot");
    let token = sign(&wrong, KID);

    assert_unauthorized(verifier.verify(&request(Some(&token), activity_body())).await);
}

#[tokio::test]
async fn wrong_issuer_is_rejected() {
    let server = key_server(1).await;
    let verifier = BotFrameworkVerifier::new(&bot_config(&server));

    let mut wrong = claims();
    wrong["iss"] = json!("https://sts.windows.net/tenant/");
    let token = sign(&wrong, KID);

    assert_unauthorized(verifier.verify(&request(Some(&token), activity_body())).await);
}

#[tokio::test]
async fn expired_token_is_rejected() {
    let server = key_server(1).await;
    let verifier = BotFrameworkVerifier::new(&bot_config(&server));

    let mut expired = claims();
    expired["exp"] = json!(1_600_000_000u64);
    expired["nbf"] = json!(1_500_000_000u64);
    let token = sign(&expired, KID);

    assert_unauthorized(verifier.verify(&request(Some(&token), activity_body())).await);
}

#[tokio::test]
async fn unknown_key_id_is_rejected() {
    let server = key_server(1).await;
    let verifier = BotFrameworkVerifier::new(&bot_config(&server));

    let token = sign(&claims(), "rotated-away");
    assert_unauthorized(verifier.verify(&request(Some(&token), activity_body())).await);
}

#[tokio::test]
async fn service_url_claim_must_match_activity() {
    let server = key_server(1).await;
    let verifier = BotFrameworkVerifier::new(&bot_config(&server));

    let mut other = claims();
    other["serviceurl"] = json!("https://attacker.example/");
    let token = sign(&other, KID);

    assert_unauthorized(verifier.verify(&request(Some(&token), activity_body())).await);
}

#[tokio::test]
async fn garbage_body_after_valid_token_is_a_parse_error() {
    let server = key_server(1).await;
    let verifier = BotFrameworkVerifier::new(&bot_config(&server));

    let token = sign(&claims(), KID);
    let err = verifier
        .verify(&request(Some(&token), "not json".to_string()))
        .await
        .expect_err("body is not an activity");
    assert!(matches!(err, BridgeError::Parse(_)));
    assert_eq!(err.status_code(), 400);
}

#[tokio::test]
async fn unreachable_key_endpoint_is_a_server_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(503).set_body_string("maintenance"))
        .expect(1)
        .mount(&server)
        .await;
    let verifier = BotFrameworkVerifier::new(&bot_config(&server));

    let token = sign(&claims(), KID);
    let err = verifier
        .verify(&request(Some(&token), activity_body()))
        .await
        .expect_err("keys unavailable");
    assert_eq!(err.status_code(), 500);
}
