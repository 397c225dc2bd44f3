//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, middleware)
//!     → request.rs (request ID)
//!     → handlers.rs (JSON body → coordinator call)
//!     → result envelope as JSON
//! ```

pub mod handlers;
pub mod request;
pub mod server;

pub use request::{RequestId, X_REQUEST_ID};
pub use server::{build_router, AppState, HttpServer};
