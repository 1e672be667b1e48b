//! Route table: a flat map from normalized path to [`RouteDescriptor`].
//!
//! There is no pattern or parameter matching; a path either has a descriptor
//! or it does not. Four paths are designated when the table is built:
//!
//! | Role        | Served when                                  | Default        |
//! |-------------|----------------------------------------------|----------------|
//! | default     | the requested path is `/` or empty           | `/`            |
//! | not-found   | no descriptor matches, or a view fails to load | `/404`       |
//! | logged-in   | a logged-in session requests a public route  | default route  |
//! | logged-out  | a logged-out session requests a private route | default route |
//!
//! # Example
//!
//! ```
//! use spa_navigator::{impl_view, RouteDescriptor, RouteTable, View};
//!
//! #[derive(Default)]
//! struct Page;
//! impl View for Page {
//!     impl_view!();
//! }
//!
//! let table = RouteTable::builder()
//!     .route(RouteDescriptor::view::<Page>("/login", "Login"))
//!     .route(RouteDescriptor::view::<Page>("/home", "Home").requires_authentication())
//!     .route(RouteDescriptor::view::<Page>("/404", "Page Not Found"))
//!     .default_route("/home")
//!     .logged_out_route("/login")
//!     .build()
//!     .unwrap();
//!
//! assert_eq!(table.lookup("/home/").unwrap().title(), "Home");
//! assert!(table.lookup("/missing").is_none());
//! ```

use crate::error::RouteTableError;
use crate::view::{ready_loader, View, ViewLoader, ViewModule};
use crate::{trace_log, warn_log};
use std::borrow::Cow;
use std::collections::HashMap;
use std::fmt;

/// Default path served for `/`.
pub const DEFAULT_ROUTE: &str = "/";

/// Default path of the not-found route.
pub const NOT_FOUND_ROUTE: &str = "/404";

// ============================================================================
// Path normalization
// ============================================================================

/// Normalize a path for table lookup.
///
/// Adds a leading `/`, removes trailing slashes, collapses repeated slashes,
/// and maps the empty path to `/`. Already-normalized input is borrowed.
///
/// ```
/// use spa_navigator::normalize_path;
///
/// assert_eq!(normalize_path(""), "/");
/// assert_eq!(normalize_path("login/"), "/login");
/// assert_eq!(normalize_path("/admin//users"), "/admin/users");
/// ```
pub fn normalize_path(path: &str) -> Cow<'_, str> {
    if path.is_empty() {
        return Cow::Borrowed("/");
    }
    if path == "/" {
        return Cow::Borrowed(path);
    }

    let has_leading = path.starts_with('/');
    let has_trailing = path.ends_with('/');
    if has_leading && !has_trailing && !path.contains("//") {
        return Cow::Borrowed(path);
    }

    let segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();
    if segments.is_empty() {
        Cow::Borrowed("/")
    } else {
        Cow::Owned(format!("/{}", segments.join("/")))
    }
}

// ============================================================================
// RouteDescriptor
// ============================================================================

/// How one path maps to a title and a loadable view.
#[derive(Clone)]
pub struct RouteDescriptor {
    path: String,
    title: String,
    loader: ViewLoader,
    requires_authentication: bool,
    requires_admin: bool,
}

impl RouteDescriptor {
    /// Create a public route with an async loader.
    pub fn new(path: impl AsRef<str>, title: impl Into<String>, loader: ViewLoader) -> Self {
        Self {
            path: normalize_path(path.as_ref()).into_owned(),
            title: title.into(),
            loader,
            requires_authentication: false,
            requires_admin: false,
        }
    }

    /// Create a public route whose view is built with [`Default`].
    pub fn view<V: View + Default>(path: impl AsRef<str>, title: impl Into<String>) -> Self {
        Self::new(path, title, ready_loader(ViewModule::of::<V>()))
    }

    /// Only logged-in sessions may stay on this route.
    pub fn requires_authentication(mut self) -> Self {
        self.requires_authentication = true;
        self
    }

    /// Only admin sessions may stay on this route. Implies authentication.
    pub fn requires_admin(mut self) -> Self {
        self.requires_authentication = true;
        self.requires_admin = true;
        self
    }

    /// Normalized path key
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Document title for this route
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Async loader producing this route's module
    pub fn loader(&self) -> &ViewLoader {
        &self.loader
    }

    /// Whether a logged-in session is required
    pub fn needs_authentication(&self) -> bool {
        self.requires_authentication
    }

    /// Whether an admin session is required
    pub fn needs_admin(&self) -> bool {
        self.requires_admin
    }
}

impl fmt::Debug for RouteDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RouteDescriptor")
            .field("path", &self.path)
            .field("title", &self.title)
            .field("requires_authentication", &self.requires_authentication)
            .field("requires_admin", &self.requires_admin)
            .finish_non_exhaustive()
    }
}

// ============================================================================
// RouteTable
// ============================================================================

/// Immutable set of routes plus the designated fallback paths.
#[derive(Clone, Debug)]
pub struct RouteTable {
    routes: HashMap<String, RouteDescriptor>,
    default_route: String,
    not_found_route: String,
    logged_in_route: String,
    logged_out_route: String,
}

impl RouteTable {
    /// Start building a route table.
    pub fn builder() -> RouteTableBuilder {
        RouteTableBuilder::new()
    }

    /// Find the descriptor for `path`, normalizing it first.
    pub fn lookup(&self, path: &str) -> Option<&RouteDescriptor> {
        let normalized = normalize_path(path);
        let found = self.routes.get(normalized.as_ref());
        trace_log!("Lookup '{}' → {}", normalized, found.is_some());
        found
    }

    /// Whether `path` has a descriptor
    pub fn contains(&self, path: &str) -> bool {
        self.lookup(path).is_some()
    }

    /// Descriptor of the not-found route. Always present.
    pub fn not_found(&self) -> &RouteDescriptor {
        &self.routes[&self.not_found_route]
    }

    /// Path served for `/` and empty requests
    pub fn default_route(&self) -> &str {
        &self.default_route
    }

    /// Path of the not-found route
    pub fn not_found_route(&self) -> &str {
        &self.not_found_route
    }

    /// Where logged-in sessions land when a route is public
    pub fn logged_in_route(&self) -> &str {
        &self.logged_in_route
    }

    /// Where logged-out sessions land when a route needs login
    pub fn logged_out_route(&self) -> &str {
        &self.logged_out_route
    }

    /// Number of registered routes
    pub fn len(&self) -> usize {
        self.routes.len()
    }

    /// Whether no routes are registered
    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }

    /// Iterate over all descriptors in unspecified order
    pub fn iter(&self) -> impl Iterator<Item = &RouteDescriptor> {
        self.routes.values()
    }
}

/// Builder for [`RouteTable`].
#[derive(Debug, Default)]
pub struct RouteTableBuilder {
    routes: HashMap<String, RouteDescriptor>,
    default_route: Option<String>,
    not_found_route: Option<String>,
    logged_in_route: Option<String>,
    logged_out_route: Option<String>,
}

impl RouteTableBuilder {
    /// Create an empty builder
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a route. A later route with the same path replaces the earlier one.
    pub fn route(mut self, route: RouteDescriptor) -> Self {
        if let Some(previous) = self.routes.insert(route.path.clone(), route) {
            warn_log!("Route '{}' registered twice; keeping the last one", previous.path);
        }
        self
    }

    /// Register several routes in order
    pub fn routes(self, routes: impl IntoIterator<Item = RouteDescriptor>) -> Self {
        routes.into_iter().fold(self, Self::route)
    }

    /// Path served for `/` and empty requests
    pub fn default_route(mut self, path: impl AsRef<str>) -> Self {
        self.default_route = Some(normalize_path(path.as_ref()).into_owned());
        self
    }

    /// Path of the not-found route
    pub fn not_found_route(mut self, path: impl AsRef<str>) -> Self {
        self.not_found_route = Some(normalize_path(path.as_ref()).into_owned());
        self
    }

    /// Landing path for logged-in sessions on public routes
    pub fn logged_in_route(mut self, path: impl AsRef<str>) -> Self {
        self.logged_in_route = Some(normalize_path(path.as_ref()).into_owned());
        self
    }

    /// Landing path for logged-out sessions on private routes
    pub fn logged_out_route(mut self, path: impl AsRef<str>) -> Self {
        self.logged_out_route = Some(normalize_path(path.as_ref()).into_owned());
        self
    }

    /// Validate the designated routes and freeze the table.
    pub fn build(self) -> Result<RouteTable, RouteTableError> {
        let default_route = self.default_route.unwrap_or_else(|| DEFAULT_ROUTE.to_string());
        let not_found_route = self
            .not_found_route
            .unwrap_or_else(|| NOT_FOUND_ROUTE.to_string());
        let logged_in_route = self
            .logged_in_route
            .unwrap_or_else(|| default_route.clone());
        let logged_out_route = self
            .logged_out_route
            .unwrap_or_else(|| default_route.clone());

        for (role, path) in [
            ("default", &default_route),
            ("not-found", &not_found_route),
            ("logged-in", &logged_in_route),
            ("logged-out", &logged_out_route),
        ] {
            if !self.routes.contains_key(path) {
                return Err(RouteTableError::MissingDesignatedRoute {
                    role,
                    path: path.clone(),
                });
            }
        }

        Ok(RouteTable {
            routes: self.routes,
            default_route,
            not_found_route,
            logged_in_route,
            logged_out_route,
        })
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct Page;

    impl View for Page {
        crate::impl_view!();
    }

    fn table() -> RouteTableBuilder {
        RouteTable::builder()
            .route(RouteDescriptor::view::<Page>("/", "Home"))
            .route(RouteDescriptor::view::<Page>("/404", "Page Not Found"))
    }

    #[test]
    fn test_normalize_already_normalized() {
        assert!(matches!(normalize_path("/dashboard"), Cow::Borrowed(_)));
        assert_eq!(normalize_path("/users/profile"), "/users/profile");
        assert_eq!(normalize_path("/"), "/");
    }

    #[test]
    fn test_normalize_variations() {
        assert_eq!(normalize_path(""), "/");
        assert_eq!(normalize_path("//"), "/");
        assert_eq!(normalize_path("dashboard/"), "/dashboard");
        assert_eq!(normalize_path("/a//b/"), "/a/b");
    }

    #[test]
    fn test_defaults_apply() {
        let table = table().build().unwrap();
        assert_eq!(table.default_route(), "/");
        assert_eq!(table.not_found_route(), "/404");
        assert_eq!(table.logged_in_route(), "/");
        assert_eq!(table.logged_out_route(), "/");
        assert_eq!(table.not_found().title(), "Page Not Found");
    }

    #[test]
    fn test_missing_not_found_route_is_rejected() {
        let err = RouteTable::builder()
            .route(RouteDescriptor::view::<Page>("/", "Home"))
            .build()
            .unwrap_err();
        assert_eq!(
            err,
            RouteTableError::MissingDesignatedRoute {
                role: "not-found",
                path: "/404".to_string(),
            }
        );
    }

    #[test]
    fn test_missing_logged_out_route_is_rejected() {
        let err = table().logged_out_route("/login").build().unwrap_err();
        assert!(matches!(
            err,
            RouteTableError::MissingDesignatedRoute { role: "logged-out", .. }
        ));
    }

    #[test]
    fn test_last_registration_wins() {
        let table = table()
            .route(RouteDescriptor::view::<Page>("/about", "About"))
            .route(RouteDescriptor::view::<Page>("about/", "About Us"))
            .build()
            .unwrap();
        assert_eq!(table.len(), 3);
        assert_eq!(table.lookup("/about").unwrap().title(), "About Us");
    }

    #[test]
    fn test_lookup_is_exact() {
        let table = table()
            .route(RouteDescriptor::view::<Page>("/users", "Users"))
            .build()
            .unwrap();
        assert!(table.contains("/users"));
        assert!(table.contains("users/"));
        assert!(!table.contains("/users/1"));
        assert!(!table.contains("/Users"));
    }

    #[test]
    fn test_admin_implies_authentication() {
        let route = RouteDescriptor::view::<Page>("/admin", "Admin").requires_admin();
        assert!(route.needs_admin());
        assert!(route.needs_authentication());
    }
}
