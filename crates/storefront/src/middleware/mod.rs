//! HTTP middleware stack for the storefront.
//!
//! # Middleware Order (outermost first)
//!
//! 1. Sentry layers (hub per request, HTTP context)
//! 2. `TraceLayer` (request tracing)
//! 3. Request ID (add unique ID to each request)
//! 4. Session layer (tower-sessions with `SQLite` store)
//! 5. Filter context (per-request category filter)

pub mod filter;
pub mod request_id;
pub mod session;

pub use filter::{FilterContext, FilterError, filter_context_middleware};
pub use request_id::request_id_middleware;
pub use session::create_session_layer;
