//! HTTP surface: router construction, request/response DTOs, and handlers.
//!
//! Every contact operation takes the authenticated caller ([`AuthUser`]) and
//! resolves its target through the store's ownership gate, so a contact owned
//! by another user is indistinguishable from a missing one.

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::{Method, StatusCode},
    routing::{get, patch, post, put},
    Json, Router,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::info;
use uuid::Uuid;

use rolodex_store::{ContactFields, Database, StoreError, User};

use crate::auth::{self, AuthUser};
use crate::config::ServerConfig;
use crate::error::ApiError;
use crate::validate;

#[derive(Clone)]
pub struct AppState {
    pub db: Arc<Mutex<Database>>,
    pub config: Arc<ServerConfig>,
}

pub fn build_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::PATCH,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers(Any);

    Router::new()
        .route("/health", get(health_check))
        .route("/api/v1/users", get(list_users))
        .route("/api/v1/users/signup", post(signup))
        .route("/api/v1/users/signin", post(signin))
        .route("/api/v1/contacts", get(list_contacts))
        .route("/api/v1/contact", post(create_contact))
        .route("/api/v1/contact/{id}", get(show_contact))
        .route(
            "/api/v1/contacts/{id}",
            put(update_contact).delete(destroy_contact),
        )
        .route("/api/v1/contacts/{id}/star", patch(star_contact))
        .route("/api/v1/starred/contacts", get(starred_contacts))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

// ---------------------------------------------------------------------------
// DTOs
// ---------------------------------------------------------------------------

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    version: &'static str,
}

/// A user as exposed over the API -- the credential hash never leaves the
/// server.
#[derive(Serialize)]
struct UserResponse {
    id: Uuid,
    email: String,
    username: String,
    created_at: DateTime<Utc>,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            email: user.email,
            username: user.username,
            created_at: user.created_at,
        }
    }
}

/// Fields are optional so a missing field reaches the validator and comes
/// back as a field message instead of a deserialization error.
#[derive(Deserialize)]
struct SignupRequest {
    email: Option<String>,
    username: Option<String>,
    password: Option<String>,
}

#[derive(Deserialize)]
struct SigninRequest {
    email: Option<String>,
    password: Option<String>,
}

#[derive(Serialize)]
struct TokenResponse {
    #[serde(rename = "type")]
    token_type: &'static str,
    token: String,
}

#[derive(Deserialize)]
struct ContactRequest {
    fullname: Option<String>,
    email: Option<String>,
    telephone: Option<String>,
    address: Option<String>,
}

impl ContactRequest {
    fn validate(&self) -> Result<ContactFields, ApiError> {
        let messages = validate::validate_contact(
            self.fullname.as_deref(),
            self.email.as_deref(),
            self.telephone.as_deref(),
            self.address.as_deref(),
        );
        if !messages.is_empty() {
            return Err(ApiError::Validation(messages));
        }

        Ok(ContactFields {
            fullname: trimmed(&self.fullname),
            email: trimmed(&self.email),
            telephone: trimmed(&self.telephone),
            address: trimmed(&self.address),
        })
    }
}

/// Validation has already established presence; this just normalizes.
fn trimmed(value: &Option<String>) -> String {
    value.as_deref().unwrap_or_default().trim().to_string()
}

// ---------------------------------------------------------------------------
// Users
// ---------------------------------------------------------------------------

async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
    })
}

async fn list_users(
    State(state): State<AppState>,
) -> Result<Json<Vec<UserResponse>>, ApiError> {
    let db = state.db.lock().await;
    let users = db.list_users()?;
    Ok(Json(users.into_iter().map(UserResponse::from).collect()))
}

async fn signup(
    State(state): State<AppState>,
    Json(req): Json<SignupRequest>,
) -> Result<(StatusCode, Json<serde_json::Value>), ApiError> {
    if !state.config.open_signup {
        return Err(ApiError::SignupClosed);
    }

    let mut messages = validate::validate_signup(
        req.email.as_deref(),
        req.username.as_deref(),
        req.password.as_deref(),
    );
    if !messages.is_empty() {
        return Err(ApiError::Validation(messages));
    }

    let email = trimmed(&req.email);
    let username = trimmed(&req.username);
    let password = req.password.as_deref().unwrap_or_default();

    let db = state.db.lock().await;

    if db.email_taken(&email)? {
        messages.push("email has already been taken".to_string());
    }
    if db.username_taken(&username)? {
        messages.push("username has already been taken".to_string());
    }
    if !messages.is_empty() {
        return Err(ApiError::Validation(messages));
    }

    let user = User {
        id: Uuid::new_v4(),
        email,
        username,
        password_hash: auth::hash_password(password),
        created_at: Utc::now(),
    };
    db.create_user(&user)?;

    let token = auth::generate_token();
    db.create_session(&auth::token_hash(&token), user.id)?;

    info!(user = %user.id, username = %user.username, "user signed up");

    Ok((
        StatusCode::CREATED,
        Json(serde_json::json!({
            "type": "bearer",
            "token": token,
            "user": UserResponse::from(user),
        })),
    ))
}

async fn signin(
    State(state): State<AppState>,
    Json(req): Json<SigninRequest>,
) -> Result<Json<TokenResponse>, ApiError> {
    // Explicit required-field validation before any credential lookup.
    let messages = validate::validate_signin(req.email.as_deref(), req.password.as_deref());
    if !messages.is_empty() {
        return Err(ApiError::Validation(messages));
    }

    let email = trimmed(&req.email);
    let password = req.password.as_deref().unwrap_or_default();

    let db = state.db.lock().await;

    let user = match db.find_user_by_email(&email) {
        Ok(user) => user,
        Err(StoreError::NotFound) => return Err(ApiError::Unauthorized),
        Err(other) => return Err(other.into()),
    };

    if !auth::verify_password(password, &user.password_hash) {
        return Err(ApiError::Unauthorized);
    }

    let token = auth::generate_token();
    db.create_session(&auth::token_hash(&token), user.id)?;

    info!(user = %user.id, "user signed in");

    Ok(Json(TokenResponse {
        token_type: "bearer",
        token,
    }))
}

// ---------------------------------------------------------------------------
// Contacts
// ---------------------------------------------------------------------------

async fn list_contacts(
    AuthUser(user_id): AuthUser,
    State(state): State<AppState>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let db = state.db.lock().await;
    let contacts = db.list_contacts_for_user(user_id)?;
    Ok(Json(serde_json::json!(contacts)))
}

async fn create_contact(
    AuthUser(user_id): AuthUser,
    State(state): State<AppState>,
    Json(req): Json<ContactRequest>,
) -> Result<(StatusCode, Json<serde_json::Value>), ApiError> {
    let fields = req.validate()?;

    let db = state.db.lock().await;
    let contact = db.create_contact(user_id, &fields)?;

    info!(contact = %contact.id, user = %user_id, "contact created");

    Ok((
        StatusCode::CREATED,
        Json(serde_json::json!({
            "message": "Contact created successfully",
            "data": contact,
        })),
    ))
}

async fn show_contact(
    AuthUser(user_id): AuthUser,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let db = state.db.lock().await;
    let contact = db.owned_contact(user_id, id)?;
    Ok(Json(serde_json::json!(contact)))
}

async fn update_contact(
    AuthUser(user_id): AuthUser,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(req): Json<ContactRequest>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let fields = req.validate()?;

    let db = state.db.lock().await;
    let contact = db.update_contact(user_id, id, &fields)?;

    info!(contact = %contact.id, user = %user_id, "contact updated");

    Ok(Json(serde_json::json!({
        "message": "Updated successfully",
        "data": contact,
    })))
}

async fn destroy_contact(
    AuthUser(user_id): AuthUser,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let db = state.db.lock().await;
    db.delete_contact(user_id, id)?;

    info!(contact = %id, user = %user_id, "contact deleted");

    Ok(Json(serde_json::json!({
        "message": "Deleted successfully",
    })))
}

async fn star_contact(
    AuthUser(user_id): AuthUser,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let db = state.db.lock().await;
    let contact = db.star_contact(user_id, id)?;

    info!(contact = %contact.id, user = %user_id, "contact starred");

    Ok(Json(serde_json::json!({
        "message": "Contact starred successfully",
        "data": contact,
    })))
}

async fn starred_contacts(
    AuthUser(user_id): AuthUser,
    State(state): State<AppState>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let db = state.db.lock().await;
    let contacts = db.list_starred_for_user(user_id)?;
    Ok(Json(serde_json::json!(contacts)))
}

// ---------------------------------------------------------------------------
// Serving
// ---------------------------------------------------------------------------

pub async fn serve(state: AppState, addr: std::net::SocketAddr) -> anyhow::Result<()> {
    let app = build_router(state);

    info!(addr = %addr, "Starting HTTP API server");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
