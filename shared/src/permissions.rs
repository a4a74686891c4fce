//! Permission Definitions
//!
//! Permission codes are opaque strings granted through IAM roles. The console
//! only tests membership; `platform_admin` passes every check implicitly.

/// Console permission codes checked by route guards
pub const ALL_PERMISSIONS: &[&str] = &[
    // === API market / API management ===
    MARKET_VIEW,
    API_LIST,
    API_CREATE,
    API_UPDATE,
    // === Applications / tenants / users ===
    APP_LIST,
    TENANT_LIST,
    USER_LIST,
    // === Monitoring ===
    MONITOR_VIEW,
    MONITOR_ALERT,
    SYSTEM_LOG,
    // === System ===
    SYSTEM_CONFIG,
    SYSTEM_ANNOUNCEMENT,
    // === Event center ===
    EVENT_DEFINITION,
    EVENT_SUBSCRIPTION,
    EVENT_RECORD,
    EVENT_STATISTICS,
    // === AIGC ===
    AIGC_CHAT,
    AIGC_TEMPLATE,
    AIGC_STATS,
    AIGC_COST,
];

pub const MARKET_VIEW: &str = "market:view";
pub const API_LIST: &str = "api:list";
pub const API_CREATE: &str = "api:create";
pub const API_UPDATE: &str = "api:update";
pub const APP_LIST: &str = "app:list";
pub const TENANT_LIST: &str = "tenant:list";
pub const USER_LIST: &str = "user:list";
pub const MONITOR_VIEW: &str = "monitor:view";
pub const MONITOR_ALERT: &str = "monitor:alert";
pub const SYSTEM_LOG: &str = "system:log";
pub const SYSTEM_CONFIG: &str = "system:config";
pub const SYSTEM_ANNOUNCEMENT: &str = "system:announcement";
pub const EVENT_DEFINITION: &str = "event:definition";
pub const EVENT_SUBSCRIPTION: &str = "event:subscription";
pub const EVENT_RECORD: &str = "event:record";
pub const EVENT_STATISTICS: &str = "event:statistics";
pub const AIGC_CHAT: &str = "aigc:chat";
pub const AIGC_TEMPLATE: &str = "aigc:template";
pub const AIGC_STATS: &str = "aigc:stats";
pub const AIGC_COST: &str = "aigc:cost";

/// Whether a code is one the console knows about
pub fn is_known_permission(permission: &str) -> bool {
    ALL_PERMISSIONS.contains(&permission)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_permissions() {
        assert!(is_known_permission("api:list"));
        assert!(is_known_permission(AIGC_COST));
        assert!(!is_known_permission("api:*"));
        assert!(!is_known_permission(""));
    }

    #[test]
    fn test_codes_are_unique() {
        let mut seen = std::collections::HashSet::new();
        for code in ALL_PERMISSIONS {
            assert!(seen.insert(*code), "duplicate permission {}", code);
        }
    }
}
