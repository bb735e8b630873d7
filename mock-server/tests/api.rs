use axum::http::{self, Request, StatusCode};
use http_body_util::BodyExt;
use mock_server::{app, Account, MockCredentials};
use serde_json::Value;
use tower::ServiceExt;

const PREFIX: &str = "/api2.php/demo/1/public-key";

async fn body_json<T: serde::de::DeserializeOwned>(response: axum::response::Response) -> T {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

async fn body_bytes(response: axum::response::Response) -> bytes::Bytes {
    response.into_body().collect().await.unwrap().to_bytes()
}

fn get_request(uri: &str) -> Request<String> {
    Request::builder().uri(uri).body(String::new()).unwrap()
}

fn json_request(method: &str, uri: &str, body: &str) -> Request<String> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(http::header::CONTENT_TYPE, "application/json")
        .body(body.to_string())
        .unwrap()
}

fn signed_credentials() -> MockCredentials {
    MockCredentials {
        signature: Some("sig".to_string()),
        ..MockCredentials::default()
    }
}

// --- list ---

#[tokio::test]
async fn list_accounts_returns_seed() {
    let resp = app(MockCredentials::default())
        .oneshot(get_request(&format!("{PREFIX}/account")))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    let accounts: Vec<Account> = body_json(resp).await;
    assert_eq!(accounts.len(), 3);
    assert_eq!(accounts[0].name, "Kasse");
}

// --- credentials ---

#[tokio::test]
async fn wrong_public_key_returns_error_code() {
    let resp = app(MockCredentials::default())
        .oneshot(get_request("/api2.php/demo/1/wrong/account"))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    let body: Value = body_json(resp).await;
    assert_eq!(body["error_code"], 401);
}

#[tokio::test]
async fn wrong_company_returns_error_code() {
    let resp = app(MockCredentials::default())
        .oneshot(get_request("/api2.php/other/1/public-key/account"))
        .await
        .unwrap();

    let body: Value = body_json(resp).await;
    assert_eq!(body["error_code"], 401);
}

#[tokio::test]
async fn missing_signature_is_rejected_when_required() {
    let resp = app(signed_credentials())
        .oneshot(get_request(&format!("{PREFIX}/account")))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::FORBIDDEN);
    let body: Value = body_json(resp).await;
    assert_eq!(body["error_code"], 403);
}

#[tokio::test]
async fn matching_signature_is_accepted() {
    let req = Request::builder()
        .uri(format!("{PREFIX}/account"))
        .header("Signature", "sig")
        .body(String::new())
        .unwrap();
    let resp = app(signed_credentials()).oneshot(req).await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
}

// --- get ---

#[tokio::test]
async fn get_account_by_id() {
    let resp = app(MockCredentials::default())
        .oneshot(get_request(&format!("{PREFIX}/account/2")))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    let account: Account = body_json(resp).await;
    assert_eq!(account.account_no, "1020");
}

#[tokio::test]
async fn get_unknown_account_returns_error_code() {
    let resp = app(MockCredentials::default())
        .oneshot(get_request(&format!("{PREFIX}/account/99")))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    let body: Value = body_json(resp).await;
    assert_eq!(body["error_code"], 404);
}

#[tokio::test]
async fn get_non_numeric_id_returns_error_code() {
    let resp = app(MockCredentials::default())
        .oneshot(get_request(&format!("{PREFIX}/account/abc")))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = body_json(resp).await;
    assert_eq!(body["error_code"], 400);
}

// --- update ---

#[tokio::test]
async fn update_account_applies_fields() {
    let resp = app(MockCredentials::default())
        .oneshot(json_request(
            "POST",
            &format!("{PREFIX}/account/1"),
            r#"{"name":"Hauptkasse"}"#,
        ))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    let account: Account = body_json(resp).await;
    assert_eq!(account.name, "Hauptkasse");
    assert_eq!(account.account_no, "1000");
}

#[tokio::test]
async fn update_with_malformed_json_returns_error_code() {
    let resp = app(MockCredentials::default())
        .oneshot(json_request("POST", &format!("{PREFIX}/account/1"), "{nope"))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = body_json(resp).await;
    assert_eq!(body["error_code"], 400);
}

#[tokio::test]
async fn update_non_numeric_id_returns_error_code() {
    let resp = app(MockCredentials::default())
        .oneshot(json_request("POST", &format!("{PREFIX}/account/abc"), "{}"))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = body_json(resp).await;
    assert_eq!(body["error_code"], 400);
}

// --- search ---

#[tokio::test]
async fn search_by_account_no() {
    let resp = app(MockCredentials::default())
        .oneshot(json_request(
            "POST",
            &format!("{PREFIX}/account/search"),
            r#"[{"field":"account_no","value":"3200"}]"#,
        ))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    let accounts: Vec<Account> = body_json(resp).await;
    assert_eq!(accounts.len(), 1);
    assert_eq!(accounts[0].id, 3);
}

#[tokio::test]
async fn search_like_is_case_insensitive() {
    let resp = app(MockCredentials::default())
        .oneshot(json_request(
            "POST",
            &format!("{PREFIX}/account/search"),
            r#"[{"field":"name","value":"BAN","criteria":"like"}]"#,
        ))
        .await
        .unwrap();

    let accounts: Vec<Account> = body_json(resp).await;
    assert_eq!(accounts.len(), 1);
    assert_eq!(accounts[0].name, "Bank");
}

#[tokio::test]
async fn search_unknown_field_returns_error_code() {
    let resp = app(MockCredentials::default())
        .oneshot(json_request(
            "POST",
            &format!("{PREFIX}/account/search"),
            r#"[{"field":"colour","value":"red"}]"#,
        ))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let body: Value = body_json(resp).await;
    assert_eq!(body["error_code"], 422);
}

// --- maintenance ---

#[tokio::test]
async fn maintenance_returns_html() {
    let resp = app(MockCredentials::default())
        .oneshot(get_request(&format!("{PREFIX}/maintenance")))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::SERVICE_UNAVAILABLE);
    let bytes = body_bytes(resp).await;
    assert!(serde_json::from_slice::<Value>(&bytes).is_err());
}

#[tokio::test]
async fn corrupt_returns_non_utf8_bytes() {
    let resp = app(MockCredentials::default())
        .oneshot(get_request(&format!("{PREFIX}/corrupt")))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    let bytes = body_bytes(resp).await;
    assert!(std::str::from_utf8(&bytes).is_err());
}
