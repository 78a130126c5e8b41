use std::sync::Arc;

use axum::{Json, extract::State, extract::rejection::JsonRejection, response::IntoResponse};
use tracing::{info, warn};

use cashbox_db::Store;
use cashbox_types::api::{LoginRequest, RegisterRequest, StatusResponse};

use crate::error::{ApiError, INVALID_CREDENTIALS_BODY, MISSING_CREDENTIALS, blocking, parse_body};
use crate::password;

pub type AppState = Arc<AppStateInner>;

pub struct AppStateInner {
    pub store: Arc<dyn Store>,
}

impl AppStateInner {
    pub fn new(store: Arc<dyn Store>) -> AppState {
        Arc::new(Self { store })
    }
}

pub async fn register(
    State(state): State<AppState>,
    payload: Result<Json<RegisterRequest>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let req = parse_body(payload, MISSING_CREDENTIALS, INVALID_CREDENTIALS_BODY)?;
    let (username, password) = req
        .credentials()
        .map(|(u, p)| (u.to_string(), p.to_string()))
        .ok_or(ApiError::Validation(MISSING_CREDENTIALS))?;

    let store = state.store.clone();
    let name = username.clone();
    let user_id = blocking(move || {
        let hash = password::hash_password(&password).map_err(ApiError::Internal)?;
        Ok(store.create_user(&name, &hash)?)
    })
    .await
    .inspect_err(|e| {
        if matches!(e, ApiError::Conflict) {
            info!("Registration refused, username {:?} taken", username);
        }
    })?;

    info!("Registered user {} ({:?})", user_id, username);
    Ok(Json(StatusResponse::ok("User registered successfully")))
}

/// Pass/fail credential check. Nothing is issued on success; the frontend
/// remembers the username itself.
pub async fn login(
    State(state): State<AppState>,
    payload: Result<Json<LoginRequest>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let req = parse_body(payload, MISSING_CREDENTIALS, INVALID_CREDENTIALS_BODY)?;
    let (username, password) = req
        .credentials()
        .map(|(u, p)| (u.to_string(), p.to_string()))
        .ok_or(ApiError::Validation(MISSING_CREDENTIALS))?;

    let store = state.store.clone();
    let name = username.clone();
    let outcome = blocking(move || {
        let Some(user) = store.get_user_by_username(&name)? else {
            // Same Argon2 cost as a real check, so timing does not reveal the miss
            password::verify_missing_user(&password);
            return Err(ApiError::Auth);
        };

        let valid =
            password::verify_password(&password, &user.password_hash).map_err(ApiError::Internal)?;
        if valid { Ok(()) } else { Err(ApiError::Auth) }
    })
    .await;

    match outcome {
        Ok(()) => {
            info!("Login for {:?}", username);
            Ok(Json(StatusResponse::ok("Login successful")))
        }
        Err(ApiError::Auth) => {
            warn!("Failed login for {:?}", username);
            Err(ApiError::Auth)
        }
        Err(e) => Err(e),
    }
}
