//! API layer for the FX gateway.
//!
//! This module contains the HTTP handlers, request/response models, the
//! OpenAPI document and router assembly.

pub mod handlers;
pub mod models;
pub mod openapi;
pub mod routes;

// Re-export commonly used types
pub use handlers::{convert, get_all_currencies, health, metrics_handler, AppState};
pub use models::{
    ConversionRequest, ConversionResult, ConvertQuery, CurrencyNameTable, ErrorResponse,
    RateTable,
};
pub use openapi::FxApiDoc;
pub use routes::build_router;
