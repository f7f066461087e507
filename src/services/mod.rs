//! Business logic services for the FX gateway.
//!
//! This module contains the upstream rate-provider client and the conversion
//! logic built on top of it.

pub mod conversion_service;
pub mod rates_client;

// Re-export commonly used types
pub use conversion_service::{convert_amount, ConversionService};
pub use rates_client::{NamesAccess, RatesClient};
