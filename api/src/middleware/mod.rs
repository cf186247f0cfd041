//! Middleware for the API.

mod cors;
mod request_context;

pub use cors::cors_layer;
pub use request_context::{request_context, REQUEST_ID_HEADER};
