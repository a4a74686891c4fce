//! Response code category classification

use serde::{Deserialize, Serialize};

/// Category of a backend response code, determined by its range
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResponseCategory {
    /// 200
    Success,
    /// 401 and 41xx
    Auth,
    /// 40xx
    Client,
    /// 42xx
    Account,
    /// 50xx
    Server,
    /// 51xx
    File,
    /// 52xx
    RateLimit,
    /// Anything else
    Unknown,
}

impl ResponseCategory {
    /// Determine category from a raw envelope code
    pub fn from_code(code: i32) -> Self {
        match code {
            200 => Self::Success,
            401 | 4100..4200 => Self::Auth,
            4000..4100 => Self::Client,
            4200..4300 => Self::Account,
            5000..5100 => Self::Server,
            5100..5200 => Self::File,
            5200..5300 => Self::RateLimit,
            _ => Self::Unknown,
        }
    }

    /// Failures the backend owns rather than the caller
    pub fn is_server_side(&self) -> bool {
        matches!(self, Self::Server | Self::File | Self::Unknown)
    }

    /// Get the string name for this category
    pub fn name(&self) -> &'static str {
        match self {
            Self::Success => "success",
            Self::Auth => "auth",
            Self::Client => "client",
            Self::Account => "account",
            Self::Server => "server",
            Self::File => "file",
            Self::RateLimit => "rate_limit",
            Self::Unknown => "unknown",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ResponseCode;

    #[test]
    fn test_category_from_code() {
        assert_eq!(ResponseCategory::from_code(200), ResponseCategory::Success);
        assert_eq!(ResponseCategory::from_code(401), ResponseCategory::Auth);
        assert_eq!(ResponseCategory::from_code(4105), ResponseCategory::Auth);
        assert_eq!(ResponseCategory::from_code(4003), ResponseCategory::Client);
        assert_eq!(ResponseCategory::from_code(4201), ResponseCategory::Account);
        assert_eq!(ResponseCategory::from_code(5002), ResponseCategory::Server);
        assert_eq!(ResponseCategory::from_code(5111), ResponseCategory::File);
        assert_eq!(ResponseCategory::from_code(5201), ResponseCategory::RateLimit);
        assert_eq!(ResponseCategory::from_code(-1), ResponseCategory::Unknown);
    }

    #[test]
    fn test_known_codes_land_in_their_range() {
        assert_eq!(
            ResponseCategory::from_code(ResponseCode::TokenExpired.code()),
            ResponseCategory::Auth
        );
        assert_eq!(
            ResponseCategory::from_code(ResponseCode::RateLimitExceeded.code()),
            ResponseCategory::RateLimit
        );
        assert!(ResponseCategory::from_code(ResponseCode::DatabaseError.code()).is_server_side());
        assert!(!ResponseCategory::from_code(ResponseCode::DataExists.code()).is_server_side());
    }

    #[test]
    fn test_category_serialize() {
        let json = serde_json::to_string(&ResponseCategory::RateLimit).unwrap();
        assert_eq!(json, "\"rate_limit\"");
        assert_eq!(ResponseCategory::Account.name(), "account");
    }
}
