//! Console route table

use shared::permissions::{
    AIGC_CHAT, AIGC_COST, AIGC_STATS, AIGC_TEMPLATE, API_CREATE, API_LIST, API_UPDATE, APP_LIST,
    EVENT_DEFINITION, EVENT_RECORD, EVENT_STATISTICS, EVENT_SUBSCRIPTION, MARKET_VIEW,
    MONITOR_ALERT, MONITOR_VIEW, SYSTEM_ANNOUNCEMENT, SYSTEM_CONFIG, SYSTEM_LOG, TENANT_LIST,
    USER_LIST,
};

use super::{Location, RouteRecord};

pub const HOME: &str = "/";
pub const CONSOLE_HOME: &str = "/console";

/// Query flag asking the home page to open the login dialog
pub const LOGIN_REQUIRED_QUERY: &str = "login";
/// Query parameter carrying the path to return to after login
pub const REDIRECT_QUERY: &str = "redirect";

/// Home with the login prompt, optionally remembering where to go back to
pub fn login_required(redirect: Option<&str>) -> Location {
    let location = Location::new(HOME).with_query(LOGIN_REQUIRED_QUERY, "required");
    match redirect {
        Some(path) => location.with_query(REDIRECT_QUERY, path),
        None => location,
    }
}

fn page(path: &str, name: &str, title: &str) -> RouteRecord {
    RouteRecord::new(path).name(name).title(title)
}

/// Every console page
pub fn console_routes() -> Vec<RouteRecord> {
    vec![
        RouteRecord::new("/").children(vec![
            page("", "Home", "首页").requires_auth(false),
            page("api-market", "ApiMarket", "API市场")
                .requires_auth(false)
                .permission(MARKET_VIEW),
            page("console", "Console", "控制台")
                .requires_auth(true)
                .children(console_children()),
            page("monitor", "Monitor", "监控中心")
                .requires_auth(true)
                .permission(MONITOR_VIEW),
            page("docs", "Docs", "开发文档").requires_auth(false),
            page("profile", "Profile", "个人中心").requires_auth(true),
        ]),
        page("/:pathMatch(.*)*", "NotFound", "页面不存在").layout("error"),
    ]
}

fn console_children() -> Vec<RouteRecord> {
    vec![
        page("", "Dashboard", "数据看板"),
        // API management
        page("api/list", "ApiList", "API列表").permission(API_LIST),
        page("api/create", "ApiCreate", "创建API").permission(API_CREATE),
        page("api/:id/edit", "ApiEdit", "编辑API").permission(API_UPDATE),
        page("api/:id", "ApiDetail", "API详情").permission(API_LIST),
        page("api/groups", "ApiGroups", "API分组").permission(API_LIST),
        // Gateway
        page("gateway", "GatewayOverview", "网关概览"),
        page("gateway/routes", "GatewayRoutes", "路由管理"),
        page("gateway/plugins", "GatewayPlugins", "插件配置"),
        page("gateway/ratelimit", "GatewayRatelimit", "限流策略"),
        // Applications
        page("app/list", "AppList", "应用列表").permission(APP_LIST),
        // Tenants
        page("tenant", "TenantSecurity", "多租户安全").permission(TENANT_LIST),
        page("tenant/list", "TenantList", "租户列表").permission(TENANT_LIST),
        // Users
        page("users/list", "UsersList", "用户列表").permission(USER_LIST),
        page("users/roles", "UsersRoles", "角色权限").permission(USER_LIST),
        // Monitoring
        page("stats", "Stats", "调用统计").permission(MONITOR_VIEW),
        page("logs", "Logs", "调用日志").permission(SYSTEM_LOG),
        page("alert/rules", "AlertRules", "告警规则").permission(MONITOR_ALERT),
        page("alert/records", "AlertRecords", "告警历史").permission(MONITOR_ALERT),
        // System
        page("settings", "Settings", "系统设置").permission(SYSTEM_CONFIG),
        page("announcements", "Announcements", "公告管理").permission(SYSTEM_ANNOUNCEMENT),
        // Event center
        page("event/definitions", "EventDefinitions", "事件定义").permission(EVENT_DEFINITION),
        page("event/subscriptions", "EventSubscriptions", "事件订阅")
            .permission(EVENT_SUBSCRIPTION),
        page("event/records", "EventRecords", "事件记录").permission(EVENT_RECORD),
        page("event/statistics", "EventStatistics", "事件统计").permission(EVENT_STATISTICS),
        // AIGC
        page("aigc/chat", "AigcChat", "AI对话").permission(AIGC_CHAT),
        page("aigc/templates", "AigcTemplates", "Prompt模板").permission(AIGC_TEMPLATE),
        page("aigc/dashboard", "AigcDashboard", "使用统计").permission(AIGC_STATS),
        page("aigc/cost", "AigcCost", "成本分析").permission(AIGC_COST),
    ]
}
