//! FX Gateway - a small HTTP proxy in front of an exchange-rate provider
//!
//! Two public endpoints are exposed:
//!
//! - **`GET /convert`**: convert an amount between two currencies at a historical date
//! - **`GET /getAllCurrencies`**: list currency codes with their display names
//!
//! Nothing is cached or persisted; every request goes to the upstream provider.
//!
//! # Architecture
//!
//! - [`core`]: Core functionality (config, errors, logging context, metrics, middleware)
//! - [`api`]: HTTP handlers, request/response models, router
//! - [`services`]: Upstream client and conversion logic
//!
//! # Configuration
//!
//! The server requires the following environment variable:
//! - `APP_ID`: credential for the upstream provider
//!
//! Optional environment variables:
//! - `HOST`: Server bind address, IP or hostname (default: 0.0.0.0)
//! - `PORT`: Server port (default: 5000)
//! - `UPSTREAM_BASE_URL`: Provider base URL (default: https://openexchangerates.org)
//! - `VERIFY_SSL`: Verify SSL certificates for upstream (default: true)
//! - `REQUEST_TIMEOUT_SECS`: Upstream request timeout in seconds (default: 30)

pub mod api;
pub mod core;
pub mod services;

// Re-export commonly used types for convenience
pub use api::{build_router, AppState, ConversionResult, CurrencyNameTable, FxApiDoc};
pub use core::{AppConfig, AppError, Result, UpstreamError};
pub use services::{ConversionService, RatesClient};
