use std::{collections::BTreeMap, sync::Arc};

use axum::{
    extract::{Path, Query, State},
    http::{header, HeaderMap, Method, StatusCode},
    routing::{any, get},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use tokio::{net::TcpListener, sync::RwLock};
use tracing::debug;

/// Every response body is wrapped in `{"data": ...}`.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Envelope<T> {
    pub data: T,
}

impl<T> Envelope<T> {
    fn json(data: T) -> Json<Self> {
        Json(Self { data })
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub user_id: u64,
    pub display_name: String,
    pub role: String,
}

#[derive(Deserialize)]
pub struct CreateUser {
    pub display_name: String,
    #[serde(default = "default_role")]
    pub role: String,
}

fn default_role() -> String {
    "member".to_string()
}

#[derive(Deserialize)]
pub struct UpdateUser {
    pub display_name: Option<String>,
    pub role: Option<String>,
}

/// What the server saw, reflected back by `/echo`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Echo {
    pub method: String,
    pub query: Vec<(String, String)>,
    pub authorization: Option<String>,
    pub content_type: Option<String>,
    pub body: String,
}

#[derive(Default)]
pub struct Store {
    users: BTreeMap<u64, User>,
    next_id: u64,
}

pub type Db = Arc<RwLock<Store>>;

pub fn app() -> Router {
    let db: Db = Arc::new(RwLock::new(Store::default()));
    Router::new()
        .route("/users", get(list_users).post(create_user))
        .route(
            "/users/{id}",
            get(get_user).patch(update_user).delete(delete_user),
        )
        .route("/echo", any(echo))
        .with_state(db)
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    axum::serve(listener, app()).await
}

/// Accept any non-empty bearer token.
fn require_bearer(headers: &HeaderMap) -> Result<(), StatusCode> {
    let token = headers
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .unwrap_or("");
    if token.is_empty() {
        debug!("rejecting unauthenticated request");
        return Err(StatusCode::UNAUTHORIZED);
    }
    Ok(())
}

fn header_string(headers: &HeaderMap, name: header::HeaderName) -> Option<String> {
    headers
        .get(name)
        .and_then(|value| value.to_str().ok())
        .map(str::to_string)
}

async fn list_users(
    State(db): State<Db>,
    Query(params): Query<Vec<(String, String)>>,
) -> Json<Envelope<Vec<User>>> {
    let roles: Vec<&str> = params
        .iter()
        .filter(|(key, _)| key == "role")
        .map(|(_, value)| value.as_str())
        .collect();
    let store = db.read().await;
    let users = store
        .users
        .values()
        .filter(|user| roles.is_empty() || roles.contains(&user.role.as_str()))
        .cloned()
        .collect();
    Envelope::json(users)
}

async fn create_user(
    State(db): State<Db>,
    headers: HeaderMap,
    Json(input): Json<CreateUser>,
) -> Result<(StatusCode, Json<Envelope<User>>), StatusCode> {
    require_bearer(&headers)?;
    let mut store = db.write().await;
    store.next_id += 1;
    let user = User {
        user_id: store.next_id,
        display_name: input.display_name,
        role: input.role,
    };
    store.users.insert(user.user_id, user.clone());
    Ok((StatusCode::CREATED, Envelope::json(user)))
}

async fn get_user(
    State(db): State<Db>,
    Path(id): Path<u64>,
) -> Result<Json<Envelope<User>>, StatusCode> {
    let store = db.read().await;
    store
        .users
        .get(&id)
        .cloned()
        .map(Envelope::json)
        .ok_or(StatusCode::NOT_FOUND)
}

async fn update_user(
    State(db): State<Db>,
    Path(id): Path<u64>,
    headers: HeaderMap,
    Json(input): Json<UpdateUser>,
) -> Result<Json<Envelope<User>>, StatusCode> {
    require_bearer(&headers)?;
    let mut store = db.write().await;
    let user = store.users.get_mut(&id).ok_or(StatusCode::NOT_FOUND)?;
    if let Some(display_name) = input.display_name {
        user.display_name = display_name;
    }
    if let Some(role) = input.role {
        user.role = role;
    }
    Ok(Envelope::json(user.clone()))
}

async fn delete_user(
    State(db): State<Db>,
    Path(id): Path<u64>,
    headers: HeaderMap,
) -> Result<StatusCode, StatusCode> {
    require_bearer(&headers)?;
    let mut store = db.write().await;
    store
        .users
        .remove(&id)
        .map(|_| StatusCode::NO_CONTENT)
        .ok_or(StatusCode::NOT_FOUND)
}

async fn echo(
    method: Method,
    Query(query): Query<Vec<(String, String)>>,
    headers: HeaderMap,
    body: String,
) -> Json<Envelope<Echo>> {
    Envelope::json(Echo {
        method: method.to_string(),
        query,
        authorization: header_string(&headers, header::AUTHORIZATION),
        content_type: header_string(&headers, header::CONTENT_TYPE),
        body,
    })
}
