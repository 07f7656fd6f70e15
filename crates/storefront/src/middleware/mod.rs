//! HTTP middleware stack for the storefront API.
//!
//! # Middleware Order (bottom to top in Router)
//!
//! 1. `TraceLayer` (request tracing, opens the span)
//! 2. CORS (any origin, so browser clients on another port can call the API)
//! 3. Request ID (add unique ID to each request, recorded in the span)

pub mod request_id;

pub use request_id::{REQUEST_ID_HEADER, RequestId, request_id_middleware};
