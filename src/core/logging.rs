//! Request-scoped logging context.
//!
//! The request-id middleware stores a per-request UUID in a tokio task-local so
//! that handlers, the upstream client and the error boundary can all tag their
//! log lines without threading it through every call.

tokio::task_local! {
    /// Task-local storage for the current request ID.
    pub static REQUEST_ID: String;
}

/// Response header carrying the request ID back to the caller.
pub const REQUEST_ID_HEADER: &str = "x-request-id";

/// Get the current request ID from context, if set.
///
/// Returns an empty string if no request ID is set.
pub fn get_request_id() -> String {
    REQUEST_ID.try_with(|id| id.clone()).unwrap_or_default()
}

/// Generate a new unique request ID using UUID v4.
pub fn generate_request_id() -> String {
    uuid::Uuid::new_v4().to_string()
}
