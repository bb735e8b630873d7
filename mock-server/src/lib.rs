use std::{
    collections::{BTreeMap, HashMap},
    sync::Arc,
};

use axum::{
    extract::{rejection::JsonRejection, FromRequestParts, Path, State},
    http::{header, request::Parts, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tokio::{net::TcpListener, sync::RwLock};
use tracing::{debug, info};

/// Access data the mock accepts. `signature: None` skips the header check.
#[derive(Clone, Debug)]
pub struct MockCredentials {
    pub company_id: String,
    pub user_id: String,
    pub public_key: String,
    pub signature: Option<String>,
}

impl Default for MockCredentials {
    fn default() -> Self {
        Self {
            company_id: "demo".to_string(),
            user_id: "1".to_string(),
            public_key: "public-key".to_string(),
            signature: None,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Account {
    pub id: u32,
    pub account_no: String,
    pub name: String,
}

#[derive(Deserialize)]
pub struct UpdateAccount {
    pub account_no: Option<String>,
    pub name: Option<String>,
}

/// One entry of a search payload, e.g. `{"field":"name","value":"Kasse","criteria":"like"}`.
#[derive(Deserialize)]
pub struct SearchCriterion {
    pub field: String,
    pub value: String,
    #[serde(default = "default_criteria")]
    pub criteria: String,
}

fn default_criteria() -> String {
    "=".to_string()
}

pub struct AppState {
    credentials: MockCredentials,
    accounts: RwLock<BTreeMap<u32, Account>>,
}

pub type SharedState = Arc<AppState>;

/// A response in the service's error shape.
type ServiceError = (StatusCode, Json<Value>);

fn service_error(status: StatusCode, message: &str) -> ServiceError {
    (
        status,
        Json(json!({ "error_code": status.as_u16(), "message": message })),
    )
}

fn parse_account_id(raw: &str) -> Result<u32, ServiceError> {
    raw.parse()
        .map_err(|_| service_error(StatusCode::BAD_REQUEST, "Invalid account id"))
}

pub fn seed_accounts() -> BTreeMap<u32, Account> {
    [
        (1, "1000", "Kasse"),
        (2, "1020", "Bank"),
        (3, "3200", "Handelserlöse"),
    ]
    .into_iter()
    .map(|(id, no, name)| {
        (
            id,
            Account {
                id,
                account_no: no.to_string(),
                name: name.to_string(),
            },
        )
    })
    .collect()
}

pub fn app(credentials: MockCredentials) -> Router {
    let state: SharedState = Arc::new(AppState {
        credentials,
        accounts: RwLock::new(seed_accounts()),
    });
    Router::new()
        .route(
            "/api2.php/{company_id}/{user_id}/{public_key}/account",
            get(list_accounts),
        )
        .route(
            "/api2.php/{company_id}/{user_id}/{public_key}/account/search",
            post(search_accounts),
        )
        .route(
            "/api2.php/{company_id}/{user_id}/{public_key}/account/{id}",
            get(get_account).post(update_account),
        )
        .route(
            "/api2.php/{company_id}/{user_id}/{public_key}/maintenance",
            get(maintenance),
        )
        .route(
            "/api2.php/{company_id}/{user_id}/{public_key}/corrupt",
            get(corrupt),
        )
        .with_state(state)
}

pub async fn run(listener: TcpListener, credentials: MockCredentials) -> Result<(), std::io::Error> {
    if let Ok(addr) = listener.local_addr() {
        info!(%addr, company_id = %credentials.company_id, "mock bexio api listening");
    }
    axum::serve(listener, app(credentials)).await
}

/// Extractor that checks the credentials embedded in the path and the
/// optional `Signature` header.
pub struct Authorized;

impl FromRequestParts<SharedState> for Authorized {
    type Rejection = ServiceError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &SharedState,
    ) -> Result<Self, Self::Rejection> {
        let Path(params) = Path::<HashMap<String, String>>::from_request_parts(parts, state)
            .await
            .map_err(|_| service_error(StatusCode::NOT_FOUND, "Not found"))?;

        let expected = &state.credentials;
        let matches = |key: &str, value: &str| params.get(key).map(String::as_str) == Some(value);
        if !(matches("company_id", &expected.company_id)
            && matches("user_id", &expected.user_id)
            && matches("public_key", &expected.public_key))
        {
            debug!(path = %parts.uri.path(), "rejected access data");
            return Err(service_error(StatusCode::UNAUTHORIZED, "Invalid access data"));
        }

        if let Some(signature) = &expected.signature {
            let sent = parts
                .headers
                .get("signature")
                .and_then(|v| v.to_str().ok());
            if sent != Some(signature.as_str()) {
                debug!("rejected signature");
                return Err(service_error(StatusCode::FORBIDDEN, "Invalid signature"));
            }
        }
        Ok(Authorized)
    }
}

async fn list_accounts(_: Authorized, State(state): State<SharedState>) -> Json<Vec<Account>> {
    let accounts = state.accounts.read().await;
    Json(accounts.values().cloned().collect())
}

async fn get_account(
    _: Authorized,
    State(state): State<SharedState>,
    Path((_, _, _, id)): Path<(String, String, String, String)>,
) -> Result<Json<Account>, ServiceError> {
    let id = parse_account_id(&id)?;
    let accounts = state.accounts.read().await;
    accounts
        .get(&id)
        .cloned()
        .map(Json)
        .ok_or_else(|| service_error(StatusCode::NOT_FOUND, "Account not found"))
}

async fn update_account(
    _: Authorized,
    State(state): State<SharedState>,
    Path((_, _, _, id)): Path<(String, String, String, String)>,
    input: Result<Json<UpdateAccount>, JsonRejection>,
) -> Result<Json<Account>, ServiceError> {
    let id = parse_account_id(&id)?;
    let Json(input) = input.map_err(|e| service_error(StatusCode::BAD_REQUEST, &e.body_text()))?;
    let mut accounts = state.accounts.write().await;
    let account = accounts
        .get_mut(&id)
        .ok_or_else(|| service_error(StatusCode::NOT_FOUND, "Account not found"))?;
    if let Some(account_no) = input.account_no {
        account.account_no = account_no;
    }
    if let Some(name) = input.name {
        account.name = name;
    }
    Ok(Json(account.clone()))
}

async fn search_accounts(
    _: Authorized,
    State(state): State<SharedState>,
    input: Result<Json<Vec<SearchCriterion>>, JsonRejection>,
) -> Result<Json<Vec<Account>>, ServiceError> {
    let Json(criteria) =
        input.map_err(|e| service_error(StatusCode::BAD_REQUEST, &e.body_text()))?;
    let accounts = state.accounts.read().await;
    let mut found = Vec::new();
    for account in accounts.values() {
        let mut keep = true;
        for c in &criteria {
            let field = match c.field.as_str() {
                "name" => &account.name,
                "account_no" => &account.account_no,
                other => {
                    return Err(service_error(
                        StatusCode::UNPROCESSABLE_ENTITY,
                        &format!("Unknown search field: {other}"),
                    ))
                }
            };
            keep &= match c.criteria.as_str() {
                "like" => field.to_lowercase().contains(&c.value.to_lowercase()),
                _ => *field == c.value,
            };
        }
        if keep {
            found.push(account.clone());
        }
    }
    Ok(Json(found))
}

/// JSON content type, but the body is not UTF-8.
async fn corrupt(_: Authorized) -> Response {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "application/json")],
        b"{\"name\":\"\xff\"}".as_slice(),
    )
        .into_response()
}

async fn maintenance(_: Authorized) -> Response {
    (
        StatusCode::SERVICE_UNAVAILABLE,
        [(header::CONTENT_TYPE, "text/html")],
        "<html><body>Wartungsarbeiten</body></html>",
    )
        .into_response()
}
