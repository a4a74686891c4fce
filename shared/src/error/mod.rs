//! Backend response codes
//!
//! - [`ResponseCode`]: the codes the IntelliHub services put in the envelope
//! - [`ResponseCategory`]: classification of codes by range
//! - [`is_session_invalidating`]: which domain failures end the client session
//!
//! # Example
//!
//! ```
//! use shared::error::{ResponseCode, is_session_invalidating};
//!
//! assert!(ResponseCode::TokenExpired.forces_logout());
//! assert!(is_session_invalidating(4105, ""));
//! assert!(!is_session_invalidating(4000, "参数错误"));
//! ```

mod category;
mod codes;

pub use category::ResponseCategory;
pub use codes::{ResponseCode, TOKEN_EXPIRED_MESSAGE, UnknownResponseCode, is_session_invalidating};
