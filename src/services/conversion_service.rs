//! Currency conversion against the upstream rate provider.

use crate::api::models::{ConversionRequest, ConversionResult, CurrencyNameTable};
use crate::core::{AppError, Result};
use crate::services::rates_client::{NamesAccess, RatesClient};

/// Convert `amount` given both currencies' rates against a common base.
///
/// No rounding is applied.
pub fn convert_amount(source_rate: f64, target_rate: f64, amount: f64) -> f64 {
    (target_rate / source_rate) * amount
}

/// Stateless conversion service. Cheap to clone.
#[derive(Clone)]
pub struct ConversionService {
    client: RatesClient,
}

impl ConversionService {
    pub fn new(client: RatesClient) -> Self {
        Self { client }
    }

    /// Fetch the rate table for the request date, then the public name table,
    /// and build the result. The two upstream calls run one after the other.
    #[tracing::instrument(
        skip(self, request),
        fields(
            date = %request.date,
            source = %request.source_currency,
            target = %request.target_currency,
        )
    )]
    pub async fn convert(&self, request: &ConversionRequest) -> Result<ConversionResult> {
        let rates = self.client.historical_rates(&request.date).await?;

        let (Some(source_rate), Some(target_rate)) = (
            rates.rate(&request.source_currency),
            rates.rate(&request.target_currency),
        ) else {
            return Err(AppError::CurrencyUnavailable {
                source_currency: request.source_currency.clone(),
                target_currency: request.target_currency.clone(),
            });
        };

        let names = self.client.currency_names(NamesAccess::Public).await?;

        let amount_in_target_currency =
            convert_amount(source_rate, target_rate, request.amount_in_source_currency);

        tracing::debug!(
            source_rate,
            target_rate,
            amount = request.amount_in_source_currency,
            result = amount_in_target_currency,
            "Conversion computed"
        );

        Ok(ConversionResult {
            amount_in_target_currency,
            source_currency_name: names.display_name(&request.source_currency),
            target_currency_name: names.display_name(&request.target_currency),
        })
    }

    /// Fetch the full name table with the credential attached.
    pub async fn all_currencies(&self) -> Result<CurrencyNameTable> {
        self.client
            .currency_names(NamesAccess::Authenticated)
            .await
            .map_err(AppError::CurrencyNames)
    }
}
