//! The navigation engine.
//!
//! [`Router`] is the context object the rest of the application navigates
//! through. It owns the route table, the history and document backends, the
//! current view and the subscriber list. Create one at startup and clone the
//! handle wherever navigation is needed; clones share all state.
//!
//! # Navigation pipeline
//!
//! [`navigate`](Router::navigate) writes history first and then runs
//! resolve-and-render, which is also what back/forward and the initial page
//! load trigger (see [`HistoryBridge`](crate::HistoryBridge)):
//!
//! 1. Strip the URL token, if present
//! 2. Resolve the live path against the session; redirect (bounded) if needed
//! 3. Dispose the previous view
//! 4. Await the loader and construct the view, falling back to not-found
//! 5. Set the document title
//! 6. Notify subscribers
//!
//! The loader call is the only suspension point. Each resolution takes a new
//! navigation ID; a load that finishes after a newer navigation started is
//! dropped instead of becoming current.
//!
//! # Example
//!
//! ```
//! use spa_navigator::{
//!     impl_view, MemoryDocument, MemoryHistory, RouteDescriptor, RouteTable, Router, View,
//! };
//!
//! #[derive(Default)]
//! struct Page;
//! impl View for Page {
//!     impl_view!();
//! }
//!
//! let table = RouteTable::builder()
//!     .route(RouteDescriptor::view::<Page>("/", "Home"))
//!     .route(RouteDescriptor::view::<Page>("/about", "About"))
//!     .route(RouteDescriptor::view::<Page>("/404", "Page Not Found"))
//!     .build()
//!     .unwrap();
//!
//! let history = MemoryHistory::default();
//! let router = Router::new(table, history.clone(), MemoryDocument::new());
//!
//! let result = pollster::block_on(router.push("/about"));
//! assert_eq!(result.title(), Some("About"));
//! assert_eq!(history.location(), "/about");
//! ```

use crate::config::RouterConfig;
use crate::error::{LoadError, NavigationError, NavigationResult};
use crate::history::{default_state, strip_query_param, Document, HistoryProvider, HistoryState};
use crate::resolve::{resolve_target, Resolution, Session};
use crate::route::{RouteDescriptor, RouteTable};
use crate::state::{NavigationState, RouteOptions};
use crate::subscribers::{Subscriber, SubscriberRegistry, SubscriberResult, Subscription};
use crate::view::{ViewHandle, ViewModule};
use crate::{debug_log, error_log, info_log, trace_log, warn_log};
use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;
use url::Url;

/// Text of the hard-error surface.
pub const FATAL_ERROR_MESSAGE: &str = "Error loading page";

struct RouterInner {
    table: RouteTable,
    config: RouterConfig,
    history: RefCell<Box<dyn HistoryProvider>>,
    document: RefCell<Box<dyn Document>>,
    state: RefCell<NavigationState>,
    subscribers: SubscriberRegistry,
}

/// Outcome of loading one route, before anything is published.
enum Loaded {
    View(ViewHandle),
    Stale,
}

/// Client-side router handle.
#[derive(Clone)]
pub struct Router {
    inner: Rc<RouterInner>,
}

impl Router {
    /// Create a router with the default [`RouterConfig`].
    pub fn new(
        table: RouteTable,
        history: impl HistoryProvider + 'static,
        document: impl Document + 'static,
    ) -> Self {
        Self::with_config(table, history, document, RouterConfig::default())
    }

    /// Create a router with an explicit configuration.
    pub fn with_config(
        table: RouteTable,
        history: impl HistoryProvider + 'static,
        document: impl Document + 'static,
        config: RouterConfig,
    ) -> Self {
        info_log!(
            "Router created with {} routes (default '{}', not-found '{}')",
            table.len(),
            table.default_route(),
            table.not_found_route()
        );
        let session = config.session;
        Self {
            inner: Rc::new(RouterInner {
                table,
                config,
                history: RefCell::new(Box::new(history)),
                document: RefCell::new(Box::new(document)),
                state: RefCell::new(NavigationState::new(session)),
                subscribers: SubscriberRegistry::new(),
            }),
        }
    }

    // ========================================================================
    // Accessors
    // ========================================================================

    /// The route table
    pub fn routes(&self) -> &RouteTable {
        &self.inner.table
    }

    /// The configuration
    pub fn config(&self) -> &RouterConfig {
        &self.inner.config
    }

    /// The view currently shown, if any
    pub fn current_view(&self) -> Option<ViewHandle> {
        self.inner.state.borrow().current_view().cloned()
    }

    /// The live address
    pub fn current_url(&self) -> Url {
        self.inner.history.borrow().current_url()
    }

    /// Payload of the current history entry
    pub fn current_state(&self) -> Option<HistoryState> {
        self.inner.history.borrow().state()
    }

    /// The live path
    pub fn current_path(&self) -> String {
        self.current_url().path().to_string()
    }

    /// The session consulted during resolution
    pub fn session(&self) -> Session {
        self.inner.state.borrow().session()
    }

    /// Whether the session is logged in
    pub fn is_authenticated(&self) -> bool {
        self.session().authenticated
    }

    /// Update the login flag. Takes effect on the next resolution.
    ///
    /// Logging out also clears the admin flag.
    pub fn set_authenticated(&self, authenticated: bool) {
        let mut state = self.inner.state.borrow_mut();
        let session = state.session_mut();
        session.authenticated = authenticated;
        if !authenticated {
            session.admin = false;
        }
        debug_log!("Session authenticated = {}", authenticated);
    }

    /// Update the admin flag. Takes effect on the next resolution.
    pub fn set_admin(&self, admin: bool) {
        self.inner.state.borrow_mut().session_mut().admin = admin;
        debug_log!("Session admin = {}", admin);
    }

    /// Replace the whole session. Takes effect on the next resolution.
    pub fn set_session(&self, session: Session) {
        *self.inner.state.borrow_mut().session_mut() = session;
    }

    // ========================================================================
    // Subscribers
    // ========================================================================

    /// Register a callback for completed navigations.
    pub fn subscribe<F>(&self, callback: F) -> Subscription
    where
        F: Fn(Option<&ViewHandle>, &str) -> SubscriberResult + 'static,
    {
        self.inner.subscribers.subscribe(Rc::new(callback))
    }

    /// Register a shared callback. The same `Rc` may be registered more than once.
    pub fn subscribe_shared(&self, callback: Subscriber) -> Subscription {
        self.inner.subscribers.subscribe(callback)
    }

    /// Number of active registrations
    pub fn subscriber_count(&self) -> usize {
        self.inner.subscribers.len()
    }

    // ========================================================================
    // Navigation
    // ========================================================================

    /// Navigate to `url` with a new history entry.
    pub async fn push(&self, url: &str) -> NavigationResult {
        self.navigate(url, RouteOptions::new()).await
    }

    /// Navigate to `url`, overwriting the current history entry.
    pub async fn replace(&self, url: &str) -> NavigationResult {
        self.navigate(url, RouteOptions::new().replace()).await
    }

    /// Navigate to `url`, which may be a path, a path with query, or an absolute URL.
    ///
    /// Always completes; failures are logged and reported in the result.
    pub async fn navigate(&self, url: &str, options: RouteOptions) -> NavigationResult {
        let current = self.current_url();
        let target = match current.join(url) {
            Ok(target) => target,
            Err(err) => {
                error_log!("Cannot navigate to '{}': {}", url, err);
                return NavigationResult::Error(NavigationError::InvalidUrl {
                    url: url.to_string(),
                    message: err.to_string(),
                });
            }
        };

        if !options.replace && target.path() == current.path() && target.query() == current.query()
        {
            debug_log!("Navigation skipped, URL is the same: '{}'", url);
            return NavigationResult::Skipped {
                path: target.path().to_string(),
            };
        }

        let state = options
            .state
            .unwrap_or_else(|| default_state(target.path()));
        self.write_history(options.replace, state, &target);

        self.resolve_and_render().await
    }

    /// Re-run resolution against the live address.
    ///
    /// This is what back/forward and the initial page load trigger.
    pub async fn resolve_and_render(&self) -> NavigationResult {
        let nav_id = self.inner.state.borrow_mut().start_navigation();

        let path = match self.settle_address() {
            Ok(path) => path,
            Err(err) => return self.render_fatal(err),
        };
        info_log!("Navigation #{} rendering '{}'", nav_id, path);

        self.dispose_current_view();

        // Serve resolutions always name a registered route.
        let route = self
            .inner
            .table
            .lookup(&path)
            .unwrap_or_else(|| self.inner.table.not_found());

        let (view, title, load_error) = match self.load_route(route, nav_id).await {
            Ok(Loaded::View(view)) => (view, route.title().to_string(), None),
            Ok(Loaded::Stale) => return self.superseded(nav_id, path),
            Err(err) => {
                error_log!("Failed to load page component for '{}': {}", path, err);
                if !self.is_current(nav_id) {
                    return self.superseded(nav_id, path);
                }

                let not_found = self.inner.table.not_found();
                match self.load_route(not_found, nav_id).await {
                    Ok(Loaded::View(view)) => (view, not_found.title().to_string(), Some(err)),
                    Ok(Loaded::Stale) => return self.superseded(nav_id, path),
                    Err(fallback_err) => {
                        if !self.is_current(nav_id) {
                            return self.superseded(nav_id, path);
                        }
                        return self.render_fatal(NavigationError::FallbackFailed {
                            path: not_found.path().to_string(),
                            error: fallback_err,
                        });
                    }
                }
            }
        };

        self.inner
            .state
            .borrow_mut()
            .set_current_view(view.clone());
        self.inner.document.borrow_mut().set_title(&title);
        self.inner.subscribers.notify(Some(&view), &title);

        info_log!(
            "Navigation #{} complete: '{}' ({})",
            nav_id,
            path,
            view.type_name()
        );
        match load_error {
            None => NavigationResult::Rendered { path, title },
            Some(error) => NavigationResult::Fallback { path, title, error },
        }
    }

    // ========================================================================
    // Pipeline steps
    // ========================================================================

    /// Strip the token and follow redirects until the address resolves to itself.
    fn settle_address(&self) -> Result<String, NavigationError> {
        let max_redirects = self.inner.config.max_redirects;
        let mut hops = 0;
        loop {
            self.strip_url_token();

            let current = self.current_url();
            let session = self.session();
            match resolve_target(&self.inner.table, session, current.path()) {
                Resolution::Serve(path) => return Ok(path),
                Resolution::Redirect { to, reason } => {
                    if hops >= max_redirects {
                        return Err(NavigationError::RedirectLoop {
                            path: current.path().to_string(),
                            hops,
                        });
                    }
                    hops += 1;
                    debug_log!(
                        "Redirecting from '{}' to '{}' ({}, hop {})",
                        current.path(),
                        to,
                        reason,
                        hops
                    );
                    match current.join(&to) {
                        Ok(target) => self.write_history(true, default_state(&to), &target),
                        Err(err) => {
                            return Err(NavigationError::InvalidUrl {
                                url: to,
                                message: err.to_string(),
                            })
                        }
                    }
                }
            }
        }
    }

    fn strip_url_token(&self) {
        let param = self.inner.config.token_param.as_str();
        let current = self.current_url();
        let Some((cleaned, token)) = strip_query_param(&current, param) else {
            return;
        };

        trace_log!("Stripping '{}' from the address", param);
        let state = self.inner.history.borrow().state();
        if let Err(err) = self.inner.history.borrow_mut().replace_state(
            state.unwrap_or(HistoryState::Null),
            &cleaned,
        ) {
            warn_log!("Failed to strip URL token: {}", err);
        }
        if let Some(on_token) = &self.inner.config.on_token {
            on_token(&token);
        }
    }

    fn write_history(&self, replace: bool, state: HistoryState, url: &Url) {
        let mut history = self.inner.history.borrow_mut();
        let written = if replace {
            history.replace_state(state, url)
        } else {
            history.push_state(state, url)
        };
        if let Err(err) = written {
            warn_log!("History write for '{}' failed: {}", url, err);
        }
    }

    /// Dispose the previous view. Failures are logged; the view is dropped either way.
    fn dispose_current_view(&self) {
        let previous = self.inner.state.borrow_mut().take_current_view();
        if let Some(view) = previous {
            trace_log!("Disposing {}", view.type_name());
            if let Err(err) = view.dispose() {
                error_log!("Error disposing previous page: {}", err);
            }
        }
    }

    async fn load_route(&self, route: &RouteDescriptor, nav_id: u64) -> Result<Loaded, LoadError> {
        let loader = route.loader().clone();
        let module: ViewModule = loader().await?;

        if !self.is_current(nav_id) {
            return Ok(Loaded::Stale);
        }
        module.construct().map(Loaded::View)
    }

    fn is_current(&self, nav_id: u64) -> bool {
        self.inner.state.borrow().is_navigation_current(nav_id)
    }

    fn superseded(&self, nav_id: u64, path: String) -> NavigationResult {
        debug_log!(
            "Navigation #{} to '{}' superseded by a newer navigation",
            nav_id,
            path
        );
        NavigationResult::Superseded { path }
    }

    /// Render the hard-error surface. No view stays current, no title, no notification.
    fn render_fatal(&self, error: NavigationError) -> NavigationResult {
        error_log!("Critical error: {}", error);
        self.dispose_current_view();
        self.inner
            .document
            .borrow_mut()
            .render_fatal_error(FATAL_ERROR_MESSAGE);
        NavigationResult::Fatal(error)
    }
}

impl fmt::Debug for Router {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Router")
            .field("routes", &self.inner.table.len())
            .field("session", &self.session())
            .field("subscribers", &self.inner.subscribers)
            .finish_non_exhaustive()
    }
}
