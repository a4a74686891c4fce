//! Backend response codes
//!
//! Codes carried in the envelope `code` field, organized by range:
//! - 200: Success
//! - 401: Gateway authentication rejection
//! - 40xx: Client errors
//! - 41xx: Authentication errors
//! - 42xx: Account state errors
//! - 50xx: Server errors
//! - 51xx: File operation errors
//! - 52xx: Rate limiting errors

use serde::{Deserialize, Serialize};
use std::fmt;

/// Message the IAM service returns for an invalid or expired token.
///
/// Matched verbatim; some services only report token expiry through this text.
pub const TOKEN_EXPIRED_MESSAGE: &str = "Token无效或已过期";

/// Backend response code enum
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "i32", try_from = "i32")]
#[repr(u16)]
pub enum ResponseCode {
    // ==================== Success ====================
    /// Operation completed successfully
    Success = 200,

    // ==================== Gateway ====================
    /// Gateway rejected the request token
    GatewayUnauthorized = 401,

    // ==================== 40xx: Client ====================
    /// Bad request parameters
    BadRequest = 4000,
    /// Unauthorized access
    Unauthorized = 4001,
    /// Access forbidden (tenant invalid or disabled)
    Forbidden = 4003,
    /// Resource not found
    NotFound = 4004,
    /// Target data not found
    DataNotFound = 4010,
    /// Record already exists
    DataExists = 4011,
    /// Duplicate data
    DataDuplicate = 4012,
    /// Operation failed (e.g. deleting a published API)
    OperationFailed = 4013,

    // ==================== 41xx: Auth ====================
    /// Wrong account or password
    AccountIncorrect = 4100,
    /// Wrong password
    PasswordIncorrect = 4101,
    /// Captcha wrong or expired
    CaptchaIncorrect = 4102,
    /// SMS code wrong or expired
    SmsCodeIncorrect = 4103,
    /// Email code wrong or expired
    EmailCodeIncorrect = 4104,
    /// Token invalid or expired
    TokenInvalid = 4105,
    /// Token expired
    TokenExpired = 4106,

    // ==================== 42xx: Account ====================
    /// Account locked
    AccountLocked = 4200,
    /// Account disabled
    AccountDisabled = 4201,
    /// Account expired
    AccountExpired = 4202,
    /// Password expired
    PasswordExpired = 4203,
    /// Too many login failures
    TooManyLoginFailures = 4204,

    // ==================== 50xx: Server ====================
    /// Server busy
    ServerError = 5000,
    /// Service unavailable
    ServiceUnavailable = 5001,
    /// Database operation failed
    DatabaseError = 5002,

    // ==================== 51xx: File ====================
    /// File upload failed
    FileUploadError = 5100,
    /// File download failed
    FileDownloadError = 5101,
    /// File not found
    FileNotFound = 5102,
    /// File delete failed
    FileDeleteError = 5103,
    /// Export failed
    ExportError = 5110,
    /// Import failed
    ImportError = 5111,

    // ==================== 52xx: Rate limit ====================
    /// Duplicate submission
    RepeatRequest = 5200,
    /// Rate limit exceeded
    RateLimitExceeded = 5201,
    /// Operation not allowed
    OperationNotAllowed = 5202,
}

impl ResponseCode {
    /// Get the numeric code value
    #[inline]
    pub const fn code(&self) -> i32 {
        *self as u16 as i32
    }

    /// Codes after which the client must drop its session
    pub const fn forces_logout(&self) -> bool {
        matches!(
            self,
            ResponseCode::GatewayUnauthorized
                | ResponseCode::TokenInvalid
                | ResponseCode::TokenExpired
                | ResponseCode::Forbidden
        )
    }
}

/// Whether a domain failure must tear down the client session.
///
/// Unknown codes only match through the token-expired message.
pub fn is_session_invalidating(code: i32, message: &str) -> bool {
    ResponseCode::try_from(code).is_ok_and(|c| c.forces_logout()) || message == TOKEN_EXPIRED_MESSAGE
}

impl From<ResponseCode> for i32 {
    #[inline]
    fn from(code: ResponseCode) -> Self {
        code.code()
    }
}

/// Error when converting an unknown integer to ResponseCode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UnknownResponseCode(pub i32);

impl fmt::Display for UnknownResponseCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown response code: {}", self.0)
    }
}

impl std::error::Error for UnknownResponseCode {}

impl TryFrom<i32> for ResponseCode {
    type Error = UnknownResponseCode;

    fn try_from(value: i32) -> Result<Self, Self::Error> {
        match value {
            200 => Ok(ResponseCode::Success),
            401 => Ok(ResponseCode::GatewayUnauthorized),

            4000 => Ok(ResponseCode::BadRequest),
            4001 => Ok(ResponseCode::Unauthorized),
            4003 => Ok(ResponseCode::Forbidden),
            4004 => Ok(ResponseCode::NotFound),
            4010 => Ok(ResponseCode::DataNotFound),
            4011 => Ok(ResponseCode::DataExists),
            4012 => Ok(ResponseCode::DataDuplicate),
            4013 => Ok(ResponseCode::OperationFailed),

            4100 => Ok(ResponseCode::AccountIncorrect),
            4101 => Ok(ResponseCode::PasswordIncorrect),
            4102 => Ok(ResponseCode::CaptchaIncorrect),
            4103 => Ok(ResponseCode::SmsCodeIncorrect),
            4104 => Ok(ResponseCode::EmailCodeIncorrect),
            4105 => Ok(ResponseCode::TokenInvalid),
            4106 => Ok(ResponseCode::TokenExpired),

            4200 => Ok(ResponseCode::AccountLocked),
            4201 => Ok(ResponseCode::AccountDisabled),
            4202 => Ok(ResponseCode::AccountExpired),
            4203 => Ok(ResponseCode::PasswordExpired),
            4204 => Ok(ResponseCode::TooManyLoginFailures),

            5000 => Ok(ResponseCode::ServerError),
            5001 => Ok(ResponseCode::ServiceUnavailable),
            5002 => Ok(ResponseCode::DatabaseError),

            5100 => Ok(ResponseCode::FileUploadError),
            5101 => Ok(ResponseCode::FileDownloadError),
            5102 => Ok(ResponseCode::FileNotFound),
            5103 => Ok(ResponseCode::FileDeleteError),
            5110 => Ok(ResponseCode::ExportError),
            5111 => Ok(ResponseCode::ImportError),

            5200 => Ok(ResponseCode::RepeatRequest),
            5201 => Ok(ResponseCode::RateLimitExceeded),
            5202 => Ok(ResponseCode::OperationNotAllowed),

            _ => Err(UnknownResponseCode(value)),
        }
    }
}

impl fmt::Display for ResponseCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}
