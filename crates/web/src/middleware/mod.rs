//! HTTP middleware stack.
//!
//! # Middleware Order (outermost first)
//!
//! 1. `TraceLayer` (request span with a `request_id` field)
//! 2. Request ID (fill the span field, echo `x-request-id`)
//! 3. CORS (site origin only)
//! 4. Session layer (tower-sessions)

pub mod auth;
pub mod cors;
pub mod flash;
pub mod request_id;
pub mod session;

pub use auth::{OptionalUser, RequireUser, clear_current_user, current_user, set_current_user};
pub use cors::cors_layer;
pub use flash::FlashKind;
pub use request_id::request_id_middleware;
pub use session::create_session_layer;
