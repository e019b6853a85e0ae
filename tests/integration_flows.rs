//! End-to-end flow scenarios against a mock portal API.

use secrecy::SecretString;
use serde_json::json;
use std::net::TcpListener;
use wiremock::matchers::{body_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use vecino::api::ApiClient;
use vecino::vecino::flow::recover::{RecoverStep, RecoveryFlow};
use vecino::vecino::flow::register::{RegisterStep, RegistrationFlow};
use vecino::vecino::flow::{FlowError, FlowState, StepOutcome};
use vecino::vecino::session::SessionStore;

fn can_bind_localhost() -> bool {
    TcpListener::bind("127.0.0.1:0").is_ok()
}

fn secret(value: &str) -> SecretString {
    SecretString::from(value.to_string())
}

fn identity_json() -> serde_json::Value {
    json!({
        "id": "u-123",
        "email": "vecina@example.com",
        "roles": ["resident"],
        "profile": {"firstName": "Ana", "lastName": "Rojas"}
    })
}

#[tokio::test]
async fn registration_happy_path_commits_the_identity() {
    if !can_bind_localhost() {
        return;
    }
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/auth/validate"))
        .and(body_json(json!({
            "email": "vecina@example.com",
            "documentType": "RUT",
            "documentValue": "12345678-5"
        })))
        .respond_with(ResponseTemplate::new(404))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/auth/otp/request"))
        .and(body_json(json!({
            "email": "vecina@example.com",
            "purpose": "registration"
        })))
        .respond_with(ResponseTemplate::new(202))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/auth/register"))
        .and(body_json(json!({
            "email": "vecina@example.com",
            "documentType": "RUT",
            "documentValue": "12345678-5",
            "firstName": "Ana",
            "lastName": "Rojas",
            "password": "longenough1",
            "otp": "123456"
        })))
        .respond_with(ResponseTemplate::new(201).set_body_json(identity_json()))
        .expect(1)
        .mount(&server)
        .await;

    let api = ApiClient::new(&server.uri()).expect("client");
    let store = SessionStore::new();
    let mut flow = RegistrationFlow::new();

    // Step 1: pre-check says available, the code goes out, the flow moves on.
    let outcome = flow
        .submit_contact(&api, " Vecina@Example.COM ", "12.345.678-5")
        .await;
    assert_eq!(outcome, StepOutcome::Advanced);
    assert_eq!(flow.state(), FlowState::Collecting(RegisterStep::Profile));

    // Step 2: no network involved.
    let outcome = flow.submit_profile("Ana", "Rojas", secret("longenough1"), &secret("longenough1"));
    assert_eq!(outcome, StepOutcome::Advanced);
    assert_eq!(flow.state(), FlowState::Collecting(RegisterStep::Code));

    // Step 3: the correct code creates the account.
    let outcome = flow.submit_code(&api, &store, "123456").await;
    assert_eq!(outcome, StepOutcome::Completed);
    assert!(flow.is_completed());

    let identity = store.current().expect("identity resident after registration");
    assert_eq!(identity.id, "u-123");
    assert_eq!(identity.profile.first_name, "Ana");
}

#[tokio::test]
async fn registration_conflict_blocks_step_one_without_code_request() {
    if !can_bind_localhost() {
        return;
    }
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/auth/validate"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    // The conflict must short-circuit: no code request may go out.
    Mock::given(method("POST"))
        .and(path("/auth/otp/request"))
        .respond_with(ResponseTemplate::new(202))
        .expect(0)
        .mount(&server)
        .await;

    let api = ApiClient::new(&server.uri()).expect("client");
    let store = SessionStore::new();
    let mut flow = RegistrationFlow::new();

    let outcome = flow
        .submit_contact(&api, "vecina@example.com", "12345678-5")
        .await;

    assert_eq!(outcome, StepOutcome::Failed(FlowError::Conflict));
    assert_eq!(flow.state(), FlowState::Collecting(RegisterStep::Contact));
    assert!(!store.is_authenticated());

    // The failure points at a way out.
    assert!(FlowError::Conflict.remediation().is_some());
}

#[tokio::test]
async fn registration_transient_failure_keeps_step_one() {
    if !can_bind_localhost() {
        return;
    }
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/auth/validate"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let api = ApiClient::new(&server.uri()).expect("client");
    let mut flow = RegistrationFlow::new();

    let outcome = flow
        .submit_contact(&api, "vecina@example.com", "12345678-5")
        .await;

    assert_eq!(outcome, StepOutcome::Failed(FlowError::Unavailable));
    assert_eq!(flow.state(), FlowState::Collecting(RegisterStep::Contact));
}

#[tokio::test]
async fn registration_retries_after_a_rejected_code() {
    if !can_bind_localhost() {
        return;
    }
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/auth/validate"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/auth/otp/request"))
        .respond_with(ResponseTemplate::new(202))
        .mount(&server)
        .await;

    // First attempt: expired code. Second attempt: accepted.
    Mock::given(method("POST"))
        .and(path("/auth/register"))
        .respond_with(ResponseTemplate::new(400).set_body_string("invalid otp"))
        .up_to_n_times(1)
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/auth/register"))
        .respond_with(ResponseTemplate::new(201).set_body_json(identity_json()))
        .mount(&server)
        .await;

    let api = ApiClient::new(&server.uri()).expect("client");
    let store = SessionStore::new();
    let mut flow = RegistrationFlow::new();

    flow.submit_contact(&api, "vecina@example.com", "12345678-5").await;
    flow.submit_profile("Ana", "Rojas", secret("longenough1"), &secret("longenough1"));

    let outcome = flow.submit_code(&api, &store, "000000").await;
    assert_eq!(outcome, StepOutcome::Failed(FlowError::CodeRejected));
    assert_eq!(flow.state(), FlowState::Collecting(RegisterStep::Code));
    assert!(!store.is_authenticated());

    let outcome = flow.submit_code(&api, &store, "123456").await;
    assert_eq!(outcome, StepOutcome::Completed);
    assert!(store.is_authenticated());
}

#[tokio::test]
async fn recovery_happy_path_resets_the_password() {
    if !can_bind_localhost() {
        return;
    }
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/auth/otp/request"))
        .and(body_json(json!({
            "email": "vecina@example.com",
            "purpose": "password-reset"
        })))
        .respond_with(ResponseTemplate::new(202))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/auth/reset-password"))
        .and(body_json(json!({
            "email": "vecina@example.com",
            "newPassword": "brandnewpass1",
            "otp": "654321"
        })))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    let api = ApiClient::new(&server.uri()).expect("client");
    let mut flow = RecoveryFlow::new();

    let outcome = flow.submit_email(&api, " Vecina@Example.COM ").await;
    assert_eq!(outcome, StepOutcome::Advanced);
    assert_eq!(flow.state(), FlowState::Collecting(RecoverStep::Password));

    let outcome = flow.submit_password(secret("brandnewpass1"), &secret("brandnewpass1"));
    assert_eq!(outcome, StepOutcome::Advanced);

    let outcome = flow.submit_code(&api, "654321").await;
    assert_eq!(outcome, StepOutcome::Completed);
    assert!(flow.is_completed());
}

#[tokio::test]
async fn recovery_rejected_code_stays_resumable() {
    if !can_bind_localhost() {
        return;
    }
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/auth/otp/request"))
        .respond_with(ResponseTemplate::new(202))
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/auth/reset-password"))
        .respond_with(ResponseTemplate::new(400).set_body_string("invalid otp"))
        .mount(&server)
        .await;

    let api = ApiClient::new(&server.uri()).expect("client");
    let mut flow = RecoveryFlow::new();

    flow.submit_email(&api, "vecina@example.com").await;
    flow.submit_password(secret("brandnewpass1"), &secret("brandnewpass1"));

    let outcome = flow.submit_code(&api, "000000").await;
    assert_eq!(outcome, StepOutcome::Failed(FlowError::CodeRejected));
    assert_eq!(flow.state(), FlowState::Collecting(RecoverStep::Code));
    assert!(!flow.is_completed());
}

#[tokio::test]
async fn local_validation_failures_never_touch_the_network() {
    if !can_bind_localhost() {
        return;
    }
    let server = MockServer::start().await;

    // No mocks mounted: any request would 404 and the expect below would
    // catch accidental traffic.
    Mock::given(method("POST"))
        .and(path("/auth/validate"))
        .respond_with(ResponseTemplate::new(404))
        .expect(0)
        .mount(&server)
        .await;

    let api = ApiClient::new(&server.uri()).expect("client");
    let mut flow = RegistrationFlow::new();

    let outcome = flow.submit_contact(&api, "not-an-email", "1-1").await;

    let StepOutcome::Invalid(errors) = outcome else {
        panic!("expected field errors");
    };
    assert_eq!(errors.len(), 2);
    assert_eq!(flow.state(), FlowState::Collecting(RegisterStep::Contact));
}
