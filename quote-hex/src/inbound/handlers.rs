//! HTTP request handlers.

use std::sync::Arc;

use axum::{
    Json,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
};

use quote_types::{AppError, BidResponse, ErrorResponse, QuoteFetcher, QuoteRepository};

use crate::QuoteService;

/// Application state shared across handlers.
pub struct AppState<F: QuoteFetcher, R: QuoteRepository> {
    pub service: QuoteService<F, R>,
}

/// Wrapper to implement IntoResponse for AppError (orphan rule workaround).
#[derive(Debug)]
pub struct ApiError(pub AppError);

impl From<AppError> for ApiError {
    fn from(err: AppError) -> Self {
        ApiError(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        // Every failure is a 500; the kind only feeds the log line.
        tracing::error!(kind = %self.0.kind(), error = %self.0, "quote request failed");

        let body = ErrorResponse {
            error: self.0.to_string(),
        };

        (StatusCode::INTERNAL_SERVER_ERROR, Json(body)).into_response()
    }
}

/// Current USD/BRL bid, persisted before it is returned.
#[tracing::instrument(skip(state))]
pub async fn get_cotacao<F: QuoteFetcher, R: QuoteRepository>(
    State(state): State<Arc<AppState<F, R>>>,
) -> Result<Json<BidResponse>, ApiError> {
    tracing::info!("Request received");
    let bid = state.service.current_bid().await?;
    Ok(Json(BidResponse { bid }))
}
