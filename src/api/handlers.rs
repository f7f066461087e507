//! HTTP request handlers for the FX gateway.
//!
//! Handlers only extract, validate and delegate. Every failure is returned as
//! an [`AppError`] and rendered by its `IntoResponse` impl.

use crate::api::models::{
    ConversionResult, ConvertQuery, CurrencyNameTable, ErrorResponse, HealthResponse,
};
use crate::core::config::AppConfig;
use crate::core::{AppError, Result};
use crate::services::{ConversionService, RatesClient};
use axum::{
    extract::{rejection::QueryRejection, Query, State},
    http::header,
    response::{IntoResponse, Response},
    Json,
};
use prometheus::{Encoder, TextEncoder};
use std::sync::Arc;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub conversion_service: ConversionService,
}

impl AppState {
    /// Build the state around a shared HTTP client.
    pub fn new(config: &AppConfig, http_client: reqwest::Client) -> anyhow::Result<Self> {
        let client = RatesClient::new(http_client, &config.upstream)?;
        Ok(Self {
            conversion_service: ConversionService::new(client),
        })
    }
}

/// Convert an amount between two currencies at a historical date.
#[utoipa::path(
    get,
    path = "/convert",
    tag = "conversion",
    params(ConvertQuery),
    responses(
        (status = 200, description = "Converted amount and currency names", body = ConversionResult),
        (status = 400, description = "Missing parameter, invalid amount or unavailable currency", body = ErrorResponse),
        (status = 500, description = "Upstream provider failure", body = ErrorResponse)
    )
)]
pub async fn convert(
    State(state): State<Arc<AppState>>,
    query: std::result::Result<Query<ConvertQuery>, QueryRejection>,
) -> Result<Json<ConversionResult>> {
    let Query(query) = query.map_err(|rejection| {
        tracing::debug!(error = %rejection, "Unreadable query string");
        AppError::MissingParameters
    })?;

    let request = query.validate()?;
    let result = state.conversion_service.convert(&request).await?;
    Ok(Json(result))
}

/// List every currency code the provider knows, with its display name.
#[utoipa::path(
    get,
    path = "/getAllCurrencies",
    tag = "currencies",
    responses(
        (status = 200, description = "Currency code to name mapping", body = CurrencyNameTable),
        (status = 500, description = "Upstream provider failure", body = ErrorResponse)
    )
)]
pub async fn get_all_currencies(
    State(state): State<Arc<AppState>>,
) -> Result<Json<CurrencyNameTable>> {
    let names = state.conversion_service.all_currencies().await?;
    tracing::debug!(count = names.len(), "Fetched currency names");
    Ok(Json(names))
}

/// Health check endpoint
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
    })
}

/// Prometheus metrics endpoint
pub async fn metrics_handler() -> Result<Response> {
    let encoder = TextEncoder::new();
    let metric_families = prometheus::gather();
    let mut buffer = Vec::new();

    encoder
        .encode(&metric_families, &mut buffer)
        .map_err(|e| AppError::Internal(e.to_string()))?;

    Ok((
        [(header::CONTENT_TYPE, encoder.format_type().to_string())],
        buffer,
    )
        .into_response())
}
