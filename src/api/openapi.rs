//! OpenAPI documentation for the public endpoints.

use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::api::handlers::convert,
        crate::api::handlers::get_all_currencies,
    ),
    components(
        schemas(
            crate::api::models::ConversionResult,
            crate::api::models::CurrencyNameTable,
            crate::api::models::ErrorResponse,
        )
    ),
    tags(
        (name = "conversion", description = "Historical currency conversion"),
        (name = "currencies", description = "Currency name lookup")
    ),
    info(
        title = "FX Gateway API",
        version = "1.0.0",
        description = "Currency conversion and currency-name lookup backed by an upstream exchange-rate provider.",
        license(name = "MIT")
    ),
    servers(
        (url = "http://127.0.0.1:5000", description = "Local development server"),
        (url = "http://localhost:5000", description = "Local development server (localhost)")
    )
)]
pub struct FxApiDoc;
