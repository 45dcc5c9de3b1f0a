//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, middleware)
//!     → request.rs (assign request ID)
//!     → handler.rs (catalog search orchestration)
//!     → response.rs (JSON body, error status mapping)
//!     → Send to client
//! ```

pub mod handler;
pub mod request;
pub mod response;
pub mod server;

pub use handler::CatalogHandler;
pub use request::{MakeRequestUuid, RequestIdExt, X_REQUEST_ID};
pub use response::{CatalogResponse, ErrorBody, ProxyError};
pub use server::{HttpServer, SEARCH_PATH};
