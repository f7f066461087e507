//! HTTP client for the upstream exchange-rate provider.
//!
//! Two endpoints are used:
//! - `GET /api/historical/{date}.json?app_id=...` for a rate table
//! - `GET /api/currencies.json[?app_id=...]` for display names
//!
//! No retries. Every call is recorded in the upstream metrics and logged
//! without the URL, since the URL carries the credential.

use crate::api::models::{CurrencyNameTable, RateTable};
use crate::core::config::UpstreamConfig;
use crate::core::error::UpstreamError;
use crate::core::error_types::UpstreamOutcome;
use crate::core::logging::get_request_id;
use crate::core::metrics::get_metrics;
use anyhow::{bail, Context};
use reqwest::{RequestBuilder, Url};
use serde::{de::DeserializeOwned, Deserialize};
use std::time::Instant;

const HISTORICAL_ENDPOINT: &str = "historical";
const CURRENCIES_ENDPOINT: &str = "currencies";

/// Whether a currency-name request carries the credential.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NamesAccess {
    /// No `app_id` query parameter
    Public,
    /// `app_id` appended
    Authenticated,
}

#[derive(Deserialize)]
struct HistoricalPayload {
    rates: Option<RateTable>,
}

/// Thin wrapper over a shared `reqwest::Client`.
#[derive(Clone)]
pub struct RatesClient {
    http_client: reqwest::Client,
    base_url: Url,
    app_id: String,
}

impl RatesClient {
    /// Fails if the configured base URL cannot carry path segments.
    pub fn new(http_client: reqwest::Client, upstream: &UpstreamConfig) -> anyhow::Result<Self> {
        let base_url = Url::parse(&upstream.base_url)
            .with_context(|| format!("Invalid upstream base URL: {}", upstream.base_url))?;
        if base_url.cannot_be_a_base() {
            bail!("Upstream base URL cannot be a base: {}", upstream.base_url);
        }

        Ok(Self {
            http_client,
            base_url,
            app_id: upstream.app_id.clone(),
        })
    }

    fn endpoint_url(&self, segments: &[&str]) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    /// Fetch the rate table for `date`.
    ///
    /// A payload without a `rates` object is an error.
    pub async fn historical_rates(&self, date: &str) -> Result<RateTable, UpstreamError> {
        let file = format!("{}.json", date);
        let url = self.endpoint_url(&["api", HISTORICAL_ENDPOINT, &file]);
        let request = self
            .http_client
            .get(url)
            .query(&[("app_id", self.app_id.as_str())]);

        let payload: HistoricalPayload = self.get_json(HISTORICAL_ENDPOINT, request).await?;
        payload.rates.ok_or(UpstreamError::MissingRates)
    }

    /// Fetch the currency name table.
    pub async fn currency_names(
        &self,
        access: NamesAccess,
    ) -> Result<CurrencyNameTable, UpstreamError> {
        let url = self.endpoint_url(&["api", "currencies.json"]);
        let mut request = self.http_client.get(url);
        if access == NamesAccess::Authenticated {
            request = request.query(&[("app_id", self.app_id.as_str())]);
        }

        self.get_json(CURRENCIES_ENDPOINT, request).await
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        endpoint: &'static str,
        request: RequestBuilder,
    ) -> Result<T, UpstreamError> {
        let start = Instant::now();

        let result = async {
            let response = request.send().await?;
            let status = response.status();
            if !status.is_success() {
                return Err(UpstreamError::Status(status.as_u16()));
            }
            Ok(response.json::<T>().await?)
        }
        .await;

        let elapsed = start.elapsed().as_secs_f64();
        let outcome = match &result {
            Ok(_) => UpstreamOutcome::Success,
            Err(e) => e.outcome(),
        };

        let metrics = get_metrics();
        metrics
            .upstream_latency
            .with_label_values(&[endpoint])
            .observe(elapsed);
        metrics
            .upstream_requests
            .with_label_values(&[endpoint, outcome.as_str()])
            .inc();

        match &result {
            Ok(_) => tracing::debug!(
                request_id = %get_request_id(),
                upstream_endpoint = endpoint,
                duration_secs = elapsed,
                "Upstream call succeeded"
            ),
            Err(e) => tracing::warn!(
                request_id = %get_request_id(),
                upstream_endpoint = endpoint,
                outcome = %outcome,
                error = %e,
                duration_secs = elapsed,
                "Upstream call failed"
            ),
        }

        result
    }
}
