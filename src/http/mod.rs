//! HTTP boundary for the voice detection API.
//!
//! Exposes the detection pipeline behind an Axum router: API-key checked
//! detection requests, an unauthenticated health probe and request counters.
//! The boundary owns transport concerns only; classification lives in
//! [`crate::analysis`].

mod handlers;
mod state;


pub use handlers::{
    build_router, run_http_server, DetectionRequest, DetectionResponse, HealthResponse,
    HttpServerError,
};
pub use state::AppState;
