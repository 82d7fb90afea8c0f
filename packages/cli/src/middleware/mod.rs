//! Middleware for response hardening and panic recovery

pub mod security_headers;

pub use security_headers::SecurityHeadersLayer;

use axum::response::{IntoResponse, Response};
use todo_api::AppError;
use tower_http::catch_panic::CatchPanicLayer;

/// Create a panic handler that returns consistent error responses
pub fn create_panic_handler(
) -> CatchPanicLayer<fn(Box<dyn std::any::Any + Send + 'static>) -> Response> {
    CatchPanicLayer::custom(handle_panic)
}

/// Report a handler panic as an internal error; the payload is logged, never returned
fn handle_panic(err: Box<dyn std::any::Any + Send + 'static>) -> Response {
    let panic_message = if let Some(s) = err.downcast_ref::<String>() {
        s.as_str()
    } else if let Some(s) = err.downcast_ref::<&str>() {
        s
    } else {
        "unknown panic occurred"
    };

    AppError::internal(anyhow::anyhow!("handler panicked: {}", panic_message)).into_response()
}
