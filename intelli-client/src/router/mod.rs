//! Console routing
//!
//! A route tree with per-route metadata, a matcher that resolves a
//! [`Location`] to the chain of records it hits, and the authorization guard
//! that runs before every navigation.

mod guard;
mod routes;

pub use guard::{AccessPolicy, MAX_REDIRECTS, Navigation, NavigationDecision, Navigator, RouteGuard};
pub use routes::{
    CONSOLE_HOME, HOME, LOGIN_REQUIRED_QUERY, REDIRECT_QUERY, console_routes, login_required,
};

use std::cmp::Ordering;
use std::collections::BTreeMap;

use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum RouterError {
    #[error("Path must be absolute: {0}")]
    RelativePath(String),

    #[error("Too many redirects navigating to {path} (limit {limit})")]
    TooManyRedirects { path: String, limit: usize },
}

// =============================================================================
// Location
// =============================================================================

/// Path plus ordered query parameters
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Location {
    pub path: String,
    pub query: Vec<(String, String)>,
}

impl Location {
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            query: Vec::new(),
        }
    }

    pub fn with_query(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.push((key.into(), value.into()));
        self
    }

    /// Parse `"/path?key=value"`; any `#fragment` is dropped
    pub fn parse(input: &str) -> Result<Self, RouterError> {
        let input = input.split('#').next().unwrap_or_default();
        let (path, query) = match input.split_once('?') {
            Some((path, query)) => (path, query),
            None => (input, ""),
        };
        if !path.starts_with('/') {
            return Err(RouterError::RelativePath(input.to_string()));
        }

        let query = query
            .split('&')
            .filter(|pair| !pair.is_empty())
            .map(|pair| {
                let (key, value) = pair.split_once('=').unwrap_or((pair, ""));
                (decode(key), decode(value))
            })
            .collect();

        Ok(Self {
            path: path.to_string(),
            query,
        })
    }

    /// First value of a query parameter
    pub fn query_value(&self, key: &str) -> Option<&str> {
        self.query
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Path and encoded query
    pub fn full_path(&self) -> String {
        if self.query.is_empty() {
            return self.path.clone();
        }
        let query = self
            .query
            .iter()
            .map(|(k, v)| format!("{}={}", urlencoding::encode(k), urlencoding::encode(v)))
            .collect::<Vec<_>>()
            .join("&");
        format!("{}?{}", self.path, query)
    }

    fn segments(&self) -> Vec<&str> {
        split_segments(&self.path)
    }
}

impl std::fmt::Display for Location {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.full_path())
    }
}

fn decode(raw: &str) -> String {
    urlencoding::decode(raw)
        .map(|s| s.into_owned())
        .unwrap_or_else(|_| raw.to_string())
}

fn split_segments(path: &str) -> Vec<&str> {
    path.split('/').filter(|s| !s.is_empty()).collect()
}

// =============================================================================
// Route records
// =============================================================================

/// Per-route metadata
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RouteMeta {
    pub title: Option<String>,
    /// `Some(true)` marks the route and its descendants as protected
    pub requires_auth: Option<bool>,
    /// Single permission code required
    pub permission: Option<String>,
    /// Any one of these codes suffices
    pub permissions: Vec<String>,
    pub layout: Option<String>,
    pub icon: Option<String>,
    pub hidden: bool,
}

/// One node of the route tree
#[derive(Debug, Clone, Default)]
pub struct RouteRecord {
    pub path: String,
    pub name: Option<String>,
    pub meta: RouteMeta,
    pub children: Vec<RouteRecord>,
}

impl RouteRecord {
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            ..Default::default()
        }
    }

    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.meta.title = Some(title.into());
        self
    }

    pub fn requires_auth(mut self, requires_auth: bool) -> Self {
        self.meta.requires_auth = Some(requires_auth);
        self
    }

    pub fn permission(mut self, code: impl Into<String>) -> Self {
        self.meta.permission = Some(code.into());
        self
    }

    pub fn any_permission<I, S>(mut self, codes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.meta.permissions = codes.into_iter().map(Into::into).collect();
        self
    }

    pub fn layout(mut self, layout: impl Into<String>) -> Self {
        self.meta.layout = Some(layout.into());
        self
    }

    pub fn children(mut self, children: Vec<RouteRecord>) -> Self {
        self.children = children;
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Static(String),
    Param(String),
    CatchAll(String),
}

impl Segment {
    fn parse(raw: &str) -> Self {
        match raw.strip_prefix(':') {
            Some(name) if name.ends_with(")*") || name.ends_with("(.*)") => {
                let name = name.split('(').next().unwrap_or(name);
                Segment::CatchAll(name.to_string())
            }
            Some(name) => Segment::Param(name.to_string()),
            None => Segment::Static(raw.to_string()),
        }
    }

    /// Matching priority; static beats dynamic
    fn score(&self) -> u8 {
        match self {
            Segment::Static(_) => 3,
            Segment::Param(_) => 2,
            Segment::CatchAll(_) => 0,
        }
    }
}

/// A route flattened together with its ancestors
#[derive(Debug, Clone)]
struct CompiledRoute {
    segments: Vec<Segment>,
    name: Option<String>,
    /// Metadata from the root record down to this one
    chain: Vec<RouteMeta>,
}

impl CompiledRoute {
    fn matches(&self, path: &[&str]) -> Option<BTreeMap<String, String>> {
        let mut params = BTreeMap::new();
        let mut i = 0;
        for segment in &self.segments {
            match segment {
                Segment::Static(s) => {
                    if path.get(i) != Some(&s.as_str()) {
                        return None;
                    }
                }
                Segment::Param(name) => {
                    let value = path.get(i)?;
                    params.insert(name.clone(), decode(value));
                }
                Segment::CatchAll(name) => {
                    params.insert(name.clone(), path[i..].join("/"));
                    return Some(params);
                }
            }
            i += 1;
        }
        (i == path.len()).then_some(params)
    }

    fn is_catch_all(&self) -> bool {
        self.segments
            .iter()
            .any(|s| matches!(s, Segment::CatchAll(_)))
    }

    fn score(&self) -> Vec<u8> {
        self.segments.iter().map(Segment::score).collect()
    }

    /// Catch-alls lose to everything; then per-segment priority; then depth
    fn rank(&self, other: &Self) -> Ordering {
        other
            .is_catch_all()
            .cmp(&self.is_catch_all())
            .then_with(|| self.score().cmp(&other.score()))
            .then(self.chain.len().cmp(&other.chain.len()))
    }
}

/// Outcome of matching a location
#[derive(Debug, Clone)]
pub struct ResolvedRoute {
    pub location: Location,
    pub name: Option<String>,
    pub params: BTreeMap<String, String>,
    /// Metadata of every matched record, root first
    pub matched: Vec<RouteMeta>,
}

impl ResolvedRoute {
    /// True if any matched record asks for authentication
    pub fn requires_auth(&self) -> bool {
        self.matched.iter().any(|m| m.requires_auth == Some(true))
    }

    /// Metadata merged from root to leaf, the leaf winning
    pub fn meta(&self) -> RouteMeta {
        let mut merged = RouteMeta::default();
        for meta in &self.matched {
            if meta.title.is_some() {
                merged.title = meta.title.clone();
            }
            if meta.permission.is_some() {
                merged.permission = meta.permission.clone();
            }
            if !meta.permissions.is_empty() {
                merged.permissions = meta.permissions.clone();
            }
            if meta.layout.is_some() {
                merged.layout = meta.layout.clone();
            }
            if meta.icon.is_some() {
                merged.icon = meta.icon.clone();
            }
            merged.hidden = meta.hidden;
        }
        merged.requires_auth = Some(self.requires_auth());
        merged
    }
}

/// Flattened, matchable route tree
#[derive(Debug, Clone)]
pub struct RouteTable {
    routes: Vec<CompiledRoute>,
}

impl RouteTable {
    pub fn new(records: Vec<RouteRecord>) -> Self {
        let mut routes = Vec::new();
        for record in &records {
            compile(record, &[], &[], &mut routes);
        }
        tracing::debug!(routes = routes.len(), "Route table compiled");
        Self { routes }
    }

    pub fn len(&self) -> usize {
        self.routes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }

    /// Best match for `location`
    pub fn resolve(&self, location: &Location) -> Option<ResolvedRoute> {
        let path = location.segments();
        let (route, params) = self
            .routes
            .iter()
            .filter_map(|route| route.matches(&path).map(|params| (route, params)))
            .max_by(|(a, _), (b, _)| a.rank(b))?;

        Some(ResolvedRoute {
            location: location.clone(),
            name: route.name.clone(),
            params,
            matched: route.chain.clone(),
        })
    }

    /// Path of a named route without parameters
    pub fn path_of(&self, name: &str) -> Option<String> {
        let route = self
            .routes
            .iter()
            .find(|r| r.name.as_deref() == Some(name))?;
        let mut path = String::new();
        for segment in &route.segments {
            match segment {
                Segment::Static(s) => {
                    path.push('/');
                    path.push_str(s);
                }
                _ => return None,
            }
        }
        Some(if path.is_empty() { "/".to_string() } else { path })
    }
}

fn compile(
    record: &RouteRecord,
    parent_segments: &[Segment],
    parent_chain: &[RouteMeta],
    out: &mut Vec<CompiledRoute>,
) {
    let mut segments = if record.path.starts_with('/') {
        Vec::new()
    } else {
        parent_segments.to_vec()
    };
    segments.extend(split_segments(&record.path).into_iter().map(Segment::parse));

    let mut chain = parent_chain.to_vec();
    chain.push(record.meta.clone());

    for child in &record.children {
        compile(child, &segments, &chain, out);
    }
    out.push(CompiledRoute {
        segments,
        name: record.name.clone(),
        chain,
    });
}
