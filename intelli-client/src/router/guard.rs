//! Navigation guard
//!
//! Runs before every navigation:
//! 1. protected route, anonymous session → home with `login=required`
//! 2. declared `permission` missing → console home
//! 3. declared `permissions`, none held → console home
//! 4. otherwise proceed and retitle the page

use super::routes::{CONSOLE_HOME, login_required};
use super::{Location, ResolvedRoute, RouteTable, RouterError};
use crate::session::SessionStore;

/// Redirects followed before a navigation is abandoned
pub const MAX_REDIRECTS: usize = 10;

/// What the guard needs to know about the session
pub trait AccessPolicy {
    fn is_authenticated(&self) -> bool;
    fn has_permission(&self, code: &str) -> bool;
    fn has_any_permission(&self, codes: &[String]) -> bool;
}

impl AccessPolicy for SessionStore {
    fn is_authenticated(&self) -> bool {
        SessionStore::is_authenticated(self)
    }

    fn has_permission(&self, code: &str) -> bool {
        SessionStore::has_permission(self, code)
    }

    fn has_any_permission(&self, codes: &[String]) -> bool {
        SessionStore::has_any_permission(self, codes)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NavigationDecision {
    Proceed { title: String },
    Redirect(Location),
}

#[derive(Debug, Clone)]
pub struct RouteGuard {
    app_name: String,
}

impl RouteGuard {
    pub fn new(app_name: impl Into<String>) -> Self {
        Self {
            app_name: app_name.into(),
        }
    }

    /// Page title for a route title
    pub fn page_title(&self, title: Option<&str>) -> String {
        match title {
            Some(title) if !title.is_empty() => format!("{} - {}", title, self.app_name),
            _ => self.app_name.clone(),
        }
    }

    pub fn check(&self, route: &ResolvedRoute, access: &dyn AccessPolicy) -> NavigationDecision {
        let authenticated = access.is_authenticated();

        if route.requires_auth() && !authenticated {
            let redirect = route.location.full_path();
            tracing::info!(path = %redirect, "Login required");
            return NavigationDecision::Redirect(login_required(Some(&redirect)));
        }

        let meta = route.meta();
        if authenticated {
            if let Some(code) = meta.permission.as_deref() {
                if !access.has_permission(code) {
                    tracing::warn!(permission = code, "Permission denied");
                    return NavigationDecision::Redirect(Location::new(CONSOLE_HOME));
                }
            }
            if !meta.permissions.is_empty() && !access.has_any_permission(&meta.permissions) {
                tracing::warn!(permissions = ?meta.permissions, "Permission denied, none held");
                return NavigationDecision::Redirect(Location::new(CONSOLE_HOME));
            }
        }

        NavigationDecision::Proceed {
            title: self.page_title(meta.title.as_deref()),
        }
    }
}

/// Completed navigation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Navigation {
    pub location: Location,
    pub name: Option<String>,
    pub title: String,
    /// Where the navigation was originally headed, if it was redirected
    pub redirected_from: Option<Location>,
}

/// Tracks the current location and follows guard redirects
#[derive(Debug, Clone)]
pub struct Navigator {
    table: RouteTable,
    guard: RouteGuard,
    current: Option<Navigation>,
}

impl Navigator {
    pub fn new(table: RouteTable, guard: RouteGuard) -> Self {
        Self {
            table,
            guard,
            current: None,
        }
    }

    pub fn table(&self) -> &RouteTable {
        &self.table
    }

    pub fn current(&self) -> Option<&Navigation> {
        self.current.as_ref()
    }

    /// Current page title
    pub fn title(&self) -> String {
        self.current
            .as_ref()
            .map(|nav| nav.title.clone())
            .unwrap_or_else(|| self.guard.page_title(None))
    }

    /// Navigate to a path such as `"/console/api/list?page=2"`
    pub fn navigate(&mut self, target: &str, access: &dyn AccessPolicy) -> Result<Navigation, RouterError> {
        self.navigate_to(Location::parse(target)?, access)
    }

    pub fn navigate_to(
        &mut self,
        target: Location,
        access: &dyn AccessPolicy,
    ) -> Result<Navigation, RouterError> {
        let requested = target.clone();
        let mut location = target;

        for _ in 0..=MAX_REDIRECTS {
            let Some(route) = self.table.resolve(&location) else {
                return Ok(self.arrive(location, None, self.guard.page_title(None), &requested));
            };
            match self.guard.check(&route, access) {
                NavigationDecision::Proceed { title } => {
                    return Ok(self.arrive(location, route.name, title, &requested));
                }
                NavigationDecision::Redirect(next) => {
                    tracing::debug!(from = %location, to = %next, "Navigation redirected");
                    location = next;
                }
            }
        }

        Err(RouterError::TooManyRedirects {
            path: requested.full_path(),
            limit: MAX_REDIRECTS,
        })
    }

    fn arrive(
        &mut self,
        location: Location,
        name: Option<String>,
        title: String,
        requested: &Location,
    ) -> Navigation {
        let navigation = Navigation {
            redirected_from: (location != *requested).then(|| requested.clone()),
            location,
            name,
            title,
        };
        tracing::info!(path = %navigation.location, title = %navigation.title, "Navigated");
        self.current = Some(navigation.clone());
        navigation
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::router::{LOGIN_REQUIRED_QUERY, REDIRECT_QUERY, RouteRecord, console_routes};

    #[derive(Default)]
    struct Access {
        authenticated: bool,
        admin: bool,
        permissions: Vec<&'static str>,
    }

    impl AccessPolicy for Access {
        fn is_authenticated(&self) -> bool {
            self.authenticated
        }

        fn has_permission(&self, code: &str) -> bool {
            self.authenticated && (self.admin || self.permissions.contains(&code))
        }

        fn has_any_permission(&self, codes: &[String]) -> bool {
            codes.iter().any(|c| self.has_permission(c))
        }
    }

    fn anonymous() -> Access {
        Access::default()
    }

    fn member(permissions: &[&'static str]) -> Access {
        Access {
            authenticated: true,
            permissions: permissions.to_vec(),
            ..Default::default()
        }
    }

    fn navigator() -> Navigator {
        Navigator::new(RouteTable::new(console_routes()), RouteGuard::new("IntelliHub"))
    }

    #[test]
    fn test_protected_descendant_redirects_to_login() {
        let mut nav = navigator();
        let result = nav.navigate("/console/api/list", &anonymous()).unwrap();

        assert_eq!(result.location.path, "/");
        assert_eq!(result.location.query_value(LOGIN_REQUIRED_QUERY), Some("required"));
        assert_eq!(result.location.query_value(REDIRECT_QUERY), Some("/console/api/list"));
        assert_eq!(result.name.as_deref(), Some("Home"));
        assert_eq!(result.redirected_from.unwrap().path, "/console/api/list");
    }

    #[test]
    fn test_login_redirect_keeps_query() {
        let mut nav = navigator();
        let result = nav.navigate("/profile?tab=security", &anonymous()).unwrap();
        assert_eq!(
            result.location.query_value(REDIRECT_QUERY),
            Some("/profile?tab=security")
        );
    }

    #[test]
    fn test_missing_permission_redirects_to_console() {
        let mut nav = navigator();
        let result = nav.navigate("/console/tenant/list", &member(&["api:list"])).unwrap();
        assert_eq!(result.location.path, "/console");
        assert_eq!(result.name.as_deref(), Some("Dashboard"));
        assert_eq!(result.title, "数据看板 - IntelliHub");
    }

    #[test]
    fn test_permission_granted() {
        let mut nav = navigator();
        let result = nav.navigate("/console/api/42", &member(&["api:list"])).unwrap();
        assert_eq!(result.name.as_deref(), Some("ApiDetail"));
        assert!(result.redirected_from.is_none());
        assert_eq!(nav.title(), "API详情 - IntelliHub");
    }

    #[test]
    fn test_platform_admin_passes_every_route() {
        let admin = Access {
            authenticated: true,
            admin: true,
            ..Default::default()
        };
        let mut nav = navigator();
        for path in ["/console/settings", "/console/aigc/cost", "/monitor", "/console/users/roles"] {
            let result = nav.navigate(path, &admin).unwrap();
            assert_eq!(result.location.path, path);
        }
    }

    #[test]
    fn test_anonymous_permission_route_is_open() {
        // The market declares a permission but no login requirement
        let mut nav = navigator();
        let result = nav.navigate("/api-market", &anonymous()).unwrap();
        assert_eq!(result.name.as_deref(), Some("ApiMarket"));
    }

    #[test]
    fn test_any_permission_route() {
        let table = RouteTable::new(vec![
            RouteRecord::new("/console").name("Console").requires_auth(true),
            RouteRecord::new("/reports")
                .name("Reports")
                .title("Reports")
                .requires_auth(true)
                .any_permission(["monitor:view", "system:log"]),
        ]);
        let mut nav = Navigator::new(table, RouteGuard::new("IntelliHub"));

        let ok = nav.navigate("/reports", &member(&["system:log"])).unwrap();
        assert_eq!(ok.title, "Reports - IntelliHub");

        let denied = nav.navigate("/reports", &member(&["api:list"])).unwrap();
        assert_eq!(denied.location.path, "/console");
        assert_eq!(denied.title, "IntelliHub");
    }

    #[test]
    fn test_not_found() {
        let mut nav = navigator();
        let result = nav.navigate("/nowhere", &anonymous()).unwrap();
        assert_eq!(result.name.as_deref(), Some("NotFound"));
        assert_eq!(result.title, "页面不存在 - IntelliHub");
    }

    #[test]
    fn test_redirect_loop_is_bounded() {
        // Console itself demands a permission nobody holds
        let table = RouteTable::new(vec![
            RouteRecord::new("/console").requires_auth(true).permission("never"),
        ]);
        let mut nav = Navigator::new(table, RouteGuard::new("IntelliHub"));
        let err = nav.navigate("/console", &member(&[])).unwrap_err();
        assert_eq!(
            err,
            RouterError::TooManyRedirects {
                path: "/console".into(),
                limit: MAX_REDIRECTS
            }
        );
        assert!(nav.current().is_none());
    }

    #[test]
    fn test_page_title() {
        let guard = RouteGuard::new("IntelliHub");
        assert_eq!(guard.page_title(Some("控制台")), "控制台 - IntelliHub");
        assert_eq!(guard.page_title(Some("")), "IntelliHub");
        assert_eq!(guard.page_title(None), "IntelliHub");
    }
}
