//! Shared types for the IntelliHub console
//!
//! Wire types exchanged with the IntelliHub backend: the response envelope,
//! backend response codes, roles, permission codes and request/response DTOs.

pub mod client;
pub mod error;
pub mod models;
pub mod permissions;
pub mod response;
pub mod util;

// Re-exports
pub use error::{ResponseCategory, ResponseCode};
pub use response::{Envelope, EnvelopeError, EnvelopeOutcome, PageData, PageResult};
