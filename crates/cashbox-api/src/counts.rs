use axum::{Json, extract::State, extract::rejection::JsonRejection, response::IntoResponse};
use chrono::{SecondsFormat, Utc};
use tracing::info;

use cashbox_types::api::{SubmitCountsRequest, SubmitCountsResponse};
use cashbox_types::tally;

use crate::auth::AppState;
use crate::error::{ApiError, INVALID_COUNTS, MISSING_COUNTS, blocking, parse_body};

/// Store one row per denomination and report the totals.
///
/// Rows go in as a single transaction, so the totals returned always describe
/// exactly what was persisted. The username is not checked against `users`
/// and no login is required.
pub async fn submit_counts(
    State(state): State<AppState>,
    payload: Result<Json<SubmitCountsRequest>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let req = parse_body(payload, MISSING_COUNTS, INVALID_COUNTS)?;
    let (username, counts) = req
        .into_parts()
        .ok_or(ApiError::Validation(MISSING_COUNTS))?;

    // One timestamp for the whole submission
    let timestamp = Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true);
    let totals = tally(&counts);

    let store = state.store.clone();
    let name = username.clone();
    let stored = blocking(move || Ok(store.insert_counts(&name, &counts, &timestamp)?)).await?;

    info!(
        "Saved {} count rows for {:?}: value {}, items {}",
        stored, username, totals.total_value, totals.total_count
    );

    Ok(Json(SubmitCountsResponse {
        success: true,
        message: "Counts saved".into(),
        total_value: totals.total_value,
        total_count: totals.total_count,
    }))
}
