//! Backend contract tests against a wiremock server.

use std::cell::RefCell;
use std::rc::Rc;

use serde_json::json;
use uuid::Uuid;
use wiremock::matchers::{body_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use signup_client::HttpSignupApi;
use signup_core::{
    AccountCredentials, AccountRequest, AccountRole, CheckoutSessionId, CompanyId, CompanyInfo,
    DASHBOARD_ROUTE, MemoryStore, Navigator, SignupApi, SignupController, SignupDraft,
    SignupError, SignupState, Tier,
};

fn acme() -> CompanyInfo {
    CompanyInfo {
        company_name: "Acme Inc".into(),
        employee_count: 75,
        tier: Tier::Professional,
    }
}

#[derive(Default)]
struct UrlLog(RefCell<Vec<String>>);

impl Navigator for UrlLog {
    fn navigate(&self, url: &str) -> signup_core::Result<()> {
        self.0.borrow_mut().push(url.to_string());
        Ok(())
    }
}

#[tokio::test]
async fn test_checkout_session_created() {
    let server = MockServer::start().await;
    let key = Uuid::new_v4();

    Mock::given(method("POST"))
        .and(path("/api/create-checkout-session"))
        .and(header("idempotency-key", key.to_string().as_str()))
        .and(body_json(json!({
            "company_name": "Acme Inc",
            "employee_count": 75,
            "tier": "professional"
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "company_id": 42,
            "checkout_url": "https://checkout.stripe.com/c/pay/cs_123"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let api = HttpSignupApi::new(server.uri());
    let created = api.create_checkout_session(&acme(), key).await.unwrap();

    assert_eq!(created.company_id, CompanyId::new(42));
    assert_eq!(created.checkout_url, "https://checkout.stripe.com/c/pay/cs_123");
}

#[tokio::test]
async fn test_checkout_rejection_is_verbatim() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/create-checkout-session"))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({
            "success": false,
            "error": "Employee count exceeds Starter plan"
        })))
        .mount(&server)
        .await;

    let api = HttpSignupApi::new(server.uri());
    let err = api
        .create_checkout_session(&acme(), Uuid::new_v4())
        .await
        .unwrap_err();

    assert!(matches!(err, SignupError::Rejected(_)));
    assert_eq!(err.user_message(), "Employee count exceeds Starter plan");
}

#[tokio::test]
async fn test_checkout_non_json_error_uses_fallback() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/create-checkout-session"))
        .respond_with(ResponseTemplate::new(502).set_body_string("<html>Bad Gateway</html>"))
        .mount(&server)
        .await;

    let api = HttpSignupApi::new(server.uri());
    let err = api
        .create_checkout_session(&acme(), Uuid::new_v4())
        .await
        .unwrap_err();

    assert_eq!(err.user_message(), "Failed to create checkout session");
}

#[tokio::test]
async fn test_unreachable_backend_is_network_error() {
    // Nothing listens on port 1
    let api = HttpSignupApi::new("http://127.0.0.1:1");
    let err = api
        .create_checkout_session(&acme(), Uuid::new_v4())
        .await
        .unwrap_err();

    assert!(matches!(err, SignupError::Network(_)));
    assert!(err.is_retryable());
    assert_eq!(err.user_message(), "Network error. Please try again.");
}

#[tokio::test]
async fn test_verify_session_query() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/verify-session"))
        .and(query_param("session_id", "cs_123"))
        .and(query_param("company_id", "42"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "success": true })))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/api/verify-session"))
        .and(query_param("session_id", "cs_unpaid"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "success": false })))
        .mount(&server)
        .await;

    let api = HttpSignupApi::new(server.uri());

    let paid = api
        .verify_session(&CheckoutSessionId::from_string("cs_123"), CompanyId::new(42))
        .await
        .unwrap();
    assert!(paid);

    let unpaid = api
        .verify_session(&CheckoutSessionId::from_string("cs_unpaid"), CompanyId::new(42))
        .await
        .unwrap();
    assert!(!unpaid);
}

#[tokio::test]
async fn test_signup_body_and_rejection() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/signup"))
        .and(body_json(json!({
            "company_id": 42,
            "email": "a@acme.com",
            "password": "0123456789",
            "name": "Ada Lovelace",
            "role": "admin"
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "success": true })))
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/api/signup"))
        .respond_with(ResponseTemplate::new(409).set_body_json(json!({
            "success": false,
            "error": "Email already registered"
        })))
        .mount(&server)
        .await;

    let api = HttpSignupApi::new(server.uri());
    let mut request = AccountRequest {
        company_id: CompanyId::new(42),
        email: "a@acme.com".into(),
        password: "0123456789".into(),
        name: "Ada Lovelace".into(),
        role: AccountRole::Admin,
    };
    api.create_account(&request).await.unwrap();

    request.email = "taken@acme.com".into();
    let err = api.create_account(&request).await.unwrap_err();
    assert_eq!(err.user_message(), "Email already registered");
}

#[tokio::test]
async fn test_flow_against_backend() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/create-checkout-session"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "company_id": 42,
            "checkout_url": "https://checkout.stripe.com/c/pay/cs_123"
        })))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/api/verify-session"))
        .and(query_param("session_id", "cs_123"))
        .and(query_param("company_id", "42"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "success": true })))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/api/signup"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "success": true })))
        .expect(1)
        .mount(&server)
        .await;

    let store = Rc::new(MemoryStore::new());
    let log = Rc::new(UrlLog::default());

    let mut plan = SignupController::new(HttpSignupApi::new(server.uri()), store.clone(), log.clone());
    plan.select_tier(Tier::Professional).unwrap();
    plan.submit_company_info(SignupDraft {
        company_name: "Acme Inc".into(),
        employee_count: 75,
        tier: Tier::Professional,
        ..Default::default()
    })
    .await
    .unwrap();

    let mut back = SignupController::new(HttpSignupApi::new(server.uri()), store.clone(), log.clone());
    back.resume("?session_id=cs_123&company_id=42").await.unwrap();
    assert_eq!(back.state().name(), "account_details");

    back.submit_account(AccountCredentials {
        name: "Ada Lovelace".into(),
        email: "a@acme.com".into(),
        password: "0123456789".into(),
    })
    .await
    .unwrap();

    assert_eq!(back.state(), &SignupState::Dashboard);
    assert!(store.is_empty());
    assert_eq!(
        log.0.borrow().as_slice(),
        [
            "https://checkout.stripe.com/c/pay/cs_123".to_string(),
            DASHBOARD_ROUTE.to_string()
        ]
    );
}
