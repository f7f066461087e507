//! Shared constants for caller-visible error bodies and upstream outcome labels.

use std::fmt;

pub const MSG_MISSING_PARAMETERS: &str = "Missing required query parameters.";
pub const MSG_INVALID_AMOUNT: &str = "The specified amount is not a valid number.";
pub const MSG_CURRENCY_UNAVAILABLE: &str =
    "The specified source or target currency is not available.";
pub const MSG_INTERNAL: &str = "Internal Server Error";
pub const MSG_CURRENCY_NAMES_FAILED: &str = "Failed to fetch currency names.";

pub const UPSTREAM_OUTCOME_SUCCESS: &str = "success";
pub const UPSTREAM_OUTCOME_TRANSPORT: &str = "transport";
pub const UPSTREAM_OUTCOME_TIMEOUT: &str = "timeout";
pub const UPSTREAM_OUTCOME_STATUS: &str = "status";
pub const UPSTREAM_OUTCOME_DECODE: &str = "decode";

/// Coarse classification of an upstream call, used as a metric label.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpstreamOutcome {
    Success,
    Transport,
    Timeout,
    Status,
    Decode,
}

impl UpstreamOutcome {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Success => UPSTREAM_OUTCOME_SUCCESS,
            Self::Transport => UPSTREAM_OUTCOME_TRANSPORT,
            Self::Timeout => UPSTREAM_OUTCOME_TIMEOUT,
            Self::Status => UPSTREAM_OUTCOME_STATUS,
            Self::Decode => UPSTREAM_OUTCOME_DECODE,
        }
    }
}

impl fmt::Display for UpstreamOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
