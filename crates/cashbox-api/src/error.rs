use axum::{
    Json,
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use cashbox_db::StoreError;
use cashbox_types::api::StatusResponse;
use thiserror::Error;
use tracing::{debug, error};

pub const MISSING_CREDENTIALS: &str = "Missing username or password";
pub const MISSING_COUNTS: &str = "Missing username or counts";
pub const INVALID_CREDENTIALS_BODY: &str = "Invalid username or password";
pub const INVALID_COUNTS: &str = "Invalid username or counts";

/// Every handler failure ends up here and leaves as
/// `{"success": false, "message": ...}`.
#[derive(Error, Debug)]
pub enum ApiError {
    #[error("{0}")]
    Validation(&'static str),

    #[error("Username already exists")]
    Conflict,

    #[error("Invalid credentials")]
    Auth,

    #[error("Database error")]
    Storage(#[source] anyhow::Error),

    #[error("Internal server error")]
    Internal(#[source] anyhow::Error),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Validation(_) => StatusCode::BAD_REQUEST,
            ApiError::Conflict => StatusCode::CONFLICT,
            ApiError::Auth => StatusCode::UNAUTHORIZED,
            ApiError::Storage(_) | ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::UsernameTaken => ApiError::Conflict,
            StoreError::Backend(e) => ApiError::Storage(e),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match &self {
            ApiError::Storage(e) => error!("Store failure: {:#}", e),
            ApiError::Internal(e) => error!("Internal failure: {:#}", e),
            _ => {}
        }

        (self.status(), Json(StatusResponse::failure(self.to_string()))).into_response()
    }
}

/// Unwrap a JSON body. Well-formed JSON with a wrongly typed field (say a
/// fractional quantity) is reported as `invalid`; anything that is not a JSON
/// body at all is reported as `missing`.
pub fn parse_body<T>(
    payload: Result<Json<T>, JsonRejection>,
    missing: &'static str,
    invalid: &'static str,
) -> Result<T, ApiError> {
    match payload {
        Ok(Json(body)) => Ok(body),
        Err(rejection) => {
            debug!("Rejected request body: {}", rejection.body_text());
            match rejection {
                JsonRejection::JsonDataError(_) => Err(ApiError::Validation(invalid)),
                _ => Err(ApiError::Validation(missing)),
            }
        }
    }
}

/// Run store or hashing work off the async runtime.
pub async fn blocking<F, T>(f: F) -> Result<T, ApiError>
where
    F: FnOnce() -> Result<T, ApiError> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(f).await.map_err(|e| {
        error!("spawn_blocking join error: {}", e);
        ApiError::Internal(e.into())
    })?
}
