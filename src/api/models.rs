//! API request and response models.
//!
//! Raw query parameters arrive as [`ConvertQuery`] and are turned into a
//! [`ConversionRequest`] by [`ConvertQuery::validate`] before any upstream
//! call is made.

use crate::core::{AppError, Result};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::HashMap;
use utoipa::{IntoParams, ToSchema};

/// Raw `/convert` query string. Every field is optional here so that a missing
/// parameter produces our own error body instead of an extractor rejection.
#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct ConvertQuery {
    /// Historical date, `YYYY-MM-DD`
    #[param(example = "2024-01-01")]
    pub date: Option<String>,

    /// Three-letter code of the currency being converted from
    #[param(example = "USD")]
    pub source_currency: Option<String>,

    /// Three-letter code of the currency being converted to
    #[param(example = "EUR")]
    pub target_currency: Option<String>,

    /// Nonnegative amount in the source currency
    #[param(example = "100")]
    pub amount_in_source_currency: Option<String>,
}

/// A validated conversion request.
#[derive(Debug, Clone, PartialEq)]
pub struct ConversionRequest {
    pub date: String,
    pub source_currency: String,
    pub target_currency: String,
    pub amount_in_source_currency: f64,
}

fn required(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}

impl ConvertQuery {
    /// Check presence of all four parameters, then parse the amount.
    pub fn validate(self) -> Result<ConversionRequest> {
        let (Some(date), Some(source_currency), Some(target_currency), Some(raw_amount)) = (
            required(self.date),
            required(self.source_currency),
            required(self.target_currency),
            required(self.amount_in_source_currency),
        ) else {
            return Err(AppError::MissingParameters);
        };

        let amount_in_source_currency = parse_amount(&raw_amount)?;

        Ok(ConversionRequest {
            date,
            source_currency,
            target_currency,
            amount_in_source_currency,
        })
    }
}

/// Parse an amount string into a finite, nonnegative number.
pub fn parse_amount(raw: &str) -> Result<f64> {
    match raw.trim().parse::<f64>() {
        Ok(amount) if amount.is_finite() && amount >= 0.0 => Ok(amount),
        _ => Err(AppError::InvalidAmount(raw.to_string())),
    }
}

/// Successful `/convert` response body.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
#[schema(example = json!({
    "amountInTargetCurrency": 90.0,
    "sourceCurrencyName": "US Dollar",
    "targetCurrencyName": "Euro"
}))]
pub struct ConversionResult {
    /// Converted amount, unrounded
    pub amount_in_target_currency: f64,

    /// Display name of the source currency (falls back to its code)
    pub source_currency_name: String,

    /// Display name of the target currency (falls back to its code)
    pub target_currency_name: String,
}

/// Error response body.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[schema(example = json!({"error": "Missing required query parameters."}))]
pub struct ErrorResponse {
    pub error: String,
}

/// Rates for one date, keyed by currency code.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(transparent)]
pub struct RateTable(pub HashMap<String, f64>);

impl RateTable {
    /// Usable rate for `code`. A zero rate is treated as absent.
    pub fn rate(&self, code: &str) -> Option<f64> {
        self.0.get(code).copied().filter(|rate| *rate != 0.0)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl FromIterator<(String, f64)> for RateTable {
    fn from_iter<I: IntoIterator<Item = (String, f64)>>(iter: I) -> Self {
        RateTable(iter.into_iter().collect())
    }
}

/// Currency code to display name, exactly as returned by the provider.
///
/// Kept as a raw JSON object so `/getAllCurrencies` forwards the provider's
/// key order and values untouched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(transparent)]
#[schema(value_type = Object, example = json!({"USD": "United States Dollar", "EUR": "Euro"}))]
pub struct CurrencyNameTable(pub Map<String, Value>);

impl CurrencyNameTable {
    /// Display name for `code`, or the code itself when the name is missing,
    /// blank or not a string.
    pub fn display_name(&self, code: &str) -> String {
        self.0
            .get(code)
            .and_then(Value::as_str)
            .filter(|name| !name.is_empty())
            .map(str::to_string)
            .unwrap_or_else(|| code.to_string())
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl FromIterator<(String, String)> for CurrencyNameTable {
    fn from_iter<I: IntoIterator<Item = (String, String)>>(iter: I) -> Self {
        CurrencyNameTable(
            iter.into_iter()
                .map(|(code, name)| (code, Value::String(name)))
                .collect(),
        )
    }
}

/// Health check response.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct HealthResponse {
    pub status: String,
}
