use crate::error::{found, AppError, Result};
use crate::model::{CreateUrlRequest, CreateUrlResponse, StatsResponse};
use crate::state::AppState;
use axum::extract::{Path, State};
use axum::http::{header, HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use tracing::{info, warn};

pub async fn create_url_handler(
    State(state): State<AppState>,
    Json(request): Json<CreateUrlRequest>,
) -> Result<Json<CreateUrlResponse>> {
    let url = request.url.trim();
    if url.is_empty() {
        return Err(AppError::InvalidRequest("url must not be empty".to_string()));
    }
    if HeaderValue::from_bytes(url.as_bytes()).is_err() {
        return Err(AppError::InvalidRequest(
            "url must not contain control characters".to_string(),
        ));
    }

    let created = state.shortener().create(url).await;
    let durable = created.is_durable();
    if durable {
        info!(code = %created.short_code, "Shortened URL");
    } else {
        warn!(code = %created.short_code, outcome = ?created.outcome, "Shortened URL without durable storage");
    }

    Ok(Json(CreateUrlResponse {
        short_url: created.short_code.to_url(state.base_url()),
        short_code: created.short_code.into(),
        long_url: created.long_url,
        durable,
    }))
}

pub async fn redirect_handler(
    Path(short_code): Path<String>,
    State(state): State<AppState>,
) -> Result<Response> {
    let long_url = found(state.shortener().resolve(&short_code).await)?;
    let location = HeaderValue::try_from(long_url)
        .map_err(|e| AppError::InvalidTarget(format!("{short_code}: {e}")))?;
    Ok((StatusCode::FOUND, [(header::LOCATION, location)]).into_response())
}

pub async fn stats_handler(
    Path(short_code): Path<String>,
    State(state): State<AppState>,
) -> Result<Json<StatsResponse>> {
    let record = found(state.shortener().get_stats(&short_code).await)?;
    Ok(Json(record.into()))
}
