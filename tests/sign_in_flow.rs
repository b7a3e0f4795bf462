//! End-to-end tests for wallet sign-in: credentials in, admin session out.
//!
//! Signatures are produced with real ed25519 keys over the canonical message
//! text, exactly as a browser wallet would.
//!
//! Run with:
//! ```bash
//! cargo test --test sign_in_flow
//! cargo test --test sign_in_flow --features native-auth
//! ```

use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use serde_json::json;
use solana_keypair::Keypair;
use solana_signer::Signer;

use visa_admin_auth::csrf::CSRF_COOKIE;
use visa_admin_auth::prelude::*;

const BASE_URL: &str = "https://app.example.com";
const DOMAIN: &str = "app.example.com";
const ISSUED_AT: &str = "2026-10-19T09:00:00.000Z";

fn message_json(address: &str, domain: &str, nonce: &str) -> String {
    json!({
        "header": { "t": "sip99" },
        "payload": {
            "domain": domain,
            "address": address,
            "statement": "Sign in to review business visa applications",
            "uri": format!("https://{domain}"),
            "version": "1",
            "chainId": 1,
            "nonce": nonce,
            "issuedAt": ISSUED_AT,
            "expirationTime": "2026-10-19T09:10:00.000Z"
        }
    })
    .to_string()
}

fn sign(keypair: &Keypair, message_json: &str) -> String {
    let message = SignInMessage::parse(message_json).expect("test message parses");
    keypair.sign_message(&message.signing_bytes()).to_string()
}

fn signed_credentials(keypair: &Keypair, domain: &str, nonce: &str) -> Credentials {
    let message = message_json(&keypair.pubkey().to_string(), domain, nonce);
    let signature = sign(keypair, &message);
    Credentials::new(message, signature)
}

fn now() -> DateTime<Utc> {
    DateTime::parse_from_rfc3339(ISSUED_AT).unwrap().with_timezone(&Utc) + Duration::minutes(1)
}

fn authorizer(live_nonce: &str) -> Authorizer<StaticCsrfToken> {
    Authorizer::new(
        Some(url::Url::parse(BASE_URL).unwrap()),
        StaticCsrfToken::new(live_nonce),
    )
}

fn resolver(wallets: &[&str]) -> SessionResolver {
    SessionResolver::new(Arc::new(AdminAllowList::parse(&wallets.join(","))))
}

// ─── Tests ───────────────────────────────────────────────────────────────────

#[tokio::test]
async fn test_valid_sign_in_yields_admin_session() {
    let keypair = Keypair::new();
    let address = keypair.pubkey().to_string();
    let creds = signed_credentials(&keypair, DOMAIN, "N1");

    let subject = authorizer("N1")
        .authorize_at(&creds, &RequestContext::new(), now())
        .await
        .expect("valid sign-in");
    assert_eq!(subject.address.as_str(), address);

    let session = resolver(&[&address]).resolve_role(&subject).unwrap();
    assert_eq!(session.wallet_address.as_str(), address);
    assert_eq!(session.role, Role::Admin);
}

#[tokio::test]
async fn test_stale_nonce_is_rejected() {
    let keypair = Keypair::new();
    let creds = signed_credentials(&keypair, DOMAIN, "N1");

    let err = authorizer("N2")
        .authorize_at(&creds, &RequestContext::new(), now())
        .await
        .unwrap_err();
    assert_eq!(err, AuthFailure::NonceMismatch);
}

#[tokio::test]
async fn test_non_admin_is_refused_after_valid_signature() {
    let keypair = Keypair::new();
    let creds = signed_credentials(&keypair, DOMAIN, "N1");

    let subject = authorizer("N1")
        .authorize_at(&creds, &RequestContext::new(), now())
        .await
        .unwrap();
    let other_admin = Keypair::new().pubkey().to_string();

    assert_eq!(
        resolver(&[&other_admin]).resolve_role(&subject).unwrap_err(),
        AuthFailure::NotAuthorized
    );
}

#[tokio::test]
async fn test_each_field_fails_its_own_check() {
    let keypair = Keypair::new();
    let address = keypair.pubkey().to_string();
    let authorizer = authorizer("N1");
    let ctx = RequestContext::new();

    // Signed for another site.
    let creds = signed_credentials(&keypair, "phish.example.com", "N1");
    assert!(matches!(
        authorizer.authorize_at(&creds, &ctx, now()).await,
        Err(AuthFailure::DomainMismatch { .. })
    ));

    // Signed with an old nonce.
    let creds = signed_credentials(&keypair, DOMAIN, "N0");
    assert_eq!(
        authorizer.authorize_at(&creds, &ctx, now()).await.unwrap_err(),
        AuthFailure::NonceMismatch
    );

    // Right message, signature from a different key.
    let message = message_json(&address, DOMAIN, "N1");
    let creds = Credentials::new(message.clone(), sign(&Keypair::new(), &message));
    assert_eq!(
        authorizer.authorize_at(&creds, &ctx, now()).await.unwrap_err(),
        AuthFailure::InvalidSignature
    );

    // Claimed address swapped after signing.
    let signature = sign(&keypair, &message);
    let swapped = message_json(&Keypair::new().pubkey().to_string(), DOMAIN, "N1");
    let creds = Credentials::new(swapped, signature);
    assert_eq!(
        authorizer.authorize_at(&creds, &ctx, now()).await.unwrap_err(),
        AuthFailure::InvalidSignature
    );
}

#[tokio::test]
async fn test_tampered_statement_breaks_signature() {
    let keypair = Keypair::new();
    let creds = signed_credentials(&keypair, DOMAIN, "N1");
    let tampered = Credentials::new(
        creds.message.replace("review business visa", "approve all"),
        creds.signature.clone(),
    );

    assert_eq!(
        authorizer("N1")
            .authorize_at(&tampered, &RequestContext::new(), now())
            .await
            .unwrap_err(),
        AuthFailure::InvalidSignature
    );
}

#[tokio::test]
async fn test_expired_message() {
    let keypair = Keypair::new();
    let creds = signed_credentials(&keypair, DOMAIN, "N1");

    let err = authorizer("N1")
        .authorize_at(&creds, &RequestContext::new(), now() + Duration::minutes(30))
        .await
        .unwrap_err();
    assert_eq!(err, AuthFailure::Expired);
}

#[tokio::test]
async fn test_authorize_is_idempotent() {
    let keypair = Keypair::new();
    let good = signed_credentials(&keypair, DOMAIN, "N1");
    let bad = signed_credentials(&keypair, DOMAIN, "N9");
    let authorizer = authorizer("N1");
    let ctx = RequestContext::new();

    let first = authorizer.authorize_at(&good, &ctx, now()).await;
    let second = authorizer.authorize_at(&good, &ctx, now()).await;
    assert_eq!(first, second);
    assert!(first.is_ok());

    let first = authorizer.authorize_at(&bad, &ctx, now()).await;
    let second = authorizer.authorize_at(&bad, &ctx, now()).await;
    assert_eq!(first, second);
    assert_eq!(first.unwrap_err(), AuthFailure::NonceMismatch);
}

#[tokio::test]
async fn test_boundary_hides_failure_reason() {
    let keypair = Keypair::new();
    let authorizer = authorizer("N1");
    let ctx = RequestContext::new();

    let failures = [
        Credentials::new("", ""),
        Credentials::new("{}", "sig"),
        signed_credentials(&keypair, "phish.example.com", "N1"),
        signed_credentials(&keypair, DOMAIN, "N0"),
        Credentials::new(message_json(&keypair.pubkey().to_string(), DOMAIN, "N1"), "sig"),
    ];
    for creds in &failures {
        assert!(authorizer.authorize_credentials(creds, &ctx).await.is_none());
    }
}

#[tokio::test]
async fn test_cookie_backed_nonce_end_to_end() {
    let keypair = Keypair::new();
    let address = keypair.pubkey().to_string();

    let config = AuthConfig::builder()
        .base_url("http://localhost:3000")
        .session_secret("dashboard-secret")
        .admin_wallets(&format!("{address}, SomeOtherWallet"))
        .build()
        .unwrap();
    let csrf = CookieCsrfTokenProvider::from_config(&config).unwrap();
    let cookie_header = format!(
        "{}={}",
        CSRF_COOKIE,
        urlencoding::encode(&csrf.cookie_value("token-abc"))
    );
    let authorizer = Authorizer::from_config(&config, csrf);
    let sessions = SessionResolver::new(config.admin_wallets.clone());

    let creds = signed_credentials(&keypair, "localhost:3000", "token-abc");
    let ctx = RequestContext::from_cookie_header(&cookie_header);

    let subject = authorizer
        .authorize_at(&creds, &ctx, now())
        .await
        .expect("cookie nonce matches");
    let session = sessions
        .session_or_deny(Some(subject.address.as_str()))
        .expect("admin session");
    assert_eq!(session.role, Role::Admin);

    // Without the cookie there is no expected nonce.
    assert_eq!(
        authorizer
            .authorize_at(&creds, &RequestContext::new(), now())
            .await
            .unwrap_err(),
        AuthFailure::NonceMismatch
    );
}

#[tokio::test]
async fn test_missing_base_url_is_operational() {
    let keypair = Keypair::new();
    let config = AuthConfig::builder().admin_wallets("W1").build().unwrap();
    let authorizer = Authorizer::from_config(&config, StaticCsrfToken::new("N1"));
    let creds = signed_credentials(&keypair, DOMAIN, "N1");

    let err = authorizer
        .authorize_at(&creds, &RequestContext::new(), now())
        .await
        .unwrap_err();
    assert_eq!(err, AuthFailure::MisconfiguredServer);
    assert!(err.is_operational());
}

#[cfg(feature = "native-auth")]
#[tokio::test]
async fn test_keypair_signed_credentials_are_accepted() {
    let keypair = Keypair::new();
    let address = keypair.pubkey().to_string();
    let issued_at = DateTime::parse_from_rfc3339(ISSUED_AT).unwrap().with_timezone(&Utc);

    let request = SignInRequest::new(DOMAIN, BASE_URL, "N1")
        .statement("Sign in to review business visa applications")
        .chain_id("007")
        .issued_at(issued_at)
        .ttl(Duration::minutes(10));
    let creds = sign_in_with_keypair(&keypair, request).expect("signing succeeds");

    let subject = authorizer("N1")
        .authorize_at(&creds, &RequestContext::new(), now())
        .await
        .expect("keypair-signed credentials verify");
    assert_eq!(subject.address.as_str(), address);

    let session = resolver(&[&address]).resolve_role(&subject).unwrap();
    assert_eq!(session.role, Role::Admin);

    assert_eq!(
        authorizer("N1")
            .authorize_at(&creds, &RequestContext::new(), now() + Duration::minutes(30))
            .await
            .unwrap_err(),
        AuthFailure::Expired
    );
}
