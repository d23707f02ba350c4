//! Manual approval step handler, library crate.
//!
//! The binary in `main.rs` is a thin wrapper; everything it runs lives here
//! so integration tests in `tests/` can drive the dispatcher directly.

pub mod client;
pub mod config;
pub mod dispatcher;
pub mod errors;
pub mod markdown;
pub mod models;
pub mod status;
pub mod transport;

pub use dispatcher::{ApprovalDispatcher, Handler};
pub use errors::ApprovalError;
