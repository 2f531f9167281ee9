//! Domain model and wire schema shared by the health-record companion app.
//!
//! Everything here is plain data: record summaries, share settings, the
//! consent roster, and the JSON shapes exchanged with the records backend.
//! No UI or transport code lives in this crate so the types can be exercised
//! in tests without a terminal or a network.

pub mod error;
pub mod model;
pub mod schema;
pub mod share;

pub use error::AppError;
