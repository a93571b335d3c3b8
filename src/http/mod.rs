//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, middleware stack, per-hop routes)
//!     → request.rs (request id, request span continuing the caller's trace)
//!     → middleware/ (CORS, request metrics)
//!     → handlers.rs (decode body, drive Forwarder / WeatherResolver)
//!     → response.rs (error envelope, pass-through of forwarded bodies)
//!     → Send to client
//! ```

pub mod handlers;
pub mod middleware;
pub mod request;
pub mod response;
pub mod server;

pub use request::X_REQUEST_ID;
pub use response::ErrorBody;
pub use server::HttpServer;
