//! Authorization resolution: which path is actually served.
//!
//! Given the live path and the session, [`resolve_target`] decides whether the
//! path can be served as-is or whether the router must redirect. The checks
//! run in this order, first match wins:
//!
//! 1. `/` or empty → the default route stands in for the request.
//! 2. The not-found route is always served as-is.
//! 3. No descriptor → not-found route.
//! 4. Route needs login, session logged out → logged-out route.
//! 5. Route needs admin, session is not admin → logged-in route.
//! 6. Route is public, session logged in → logged-in route.
//! 7. Otherwise the requested path.
//!
//! Rule 6 means a logged-in session can never stay on a public route, the
//! login page included.
//!
//! If the resulting target differs from the live path the outcome is a
//! [`Resolution::Redirect`], otherwise [`Resolution::Serve`].

use crate::route::{normalize_path, RouteTable};
use crate::trace_log;

/// Authentication state the router consults. It never acquires tokens itself.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Session {
    /// A user is logged in.
    pub authenticated: bool,
    /// The logged-in user has admin rights.
    pub admin: bool,
}

impl Session {
    /// Logged-out session
    pub const fn anonymous() -> Self {
        Self {
            authenticated: false,
            admin: false,
        }
    }

    /// Logged-in session without admin rights
    pub const fn authenticated() -> Self {
        Self {
            authenticated: true,
            admin: false,
        }
    }

    /// Logged-in admin session
    pub const fn admin() -> Self {
        Self {
            authenticated: true,
            admin: true,
        }
    }
}

/// Outcome of resolving one path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    /// Serve this path; it equals the normalized live path.
    Serve(String),

    /// Replace the address with `to` and resolve again.
    Redirect {
        /// Path to redirect to.
        to: String,
        /// Human-readable reason, for logs.
        reason: &'static str,
    },
}

impl Resolution {
    /// Check if the path is served as-is.
    pub fn is_serve(&self) -> bool {
        matches!(self, Self::Serve(_))
    }

    /// Get the redirect path, if this is a redirect.
    pub fn redirect_path(&self) -> Option<&str> {
        match self {
            Self::Redirect { to, .. } => Some(to.as_str()),
            Self::Serve(_) => None,
        }
    }
}

/// Compute the effective target for `path` without touching any state.
pub fn resolve_target(table: &RouteTable, session: Session, path: &str) -> Resolution {
    let live = normalize_path(path);
    let (target, reason) = effective_target(table, session, &live);
    trace_log!("Resolved '{}' → '{}' ({})", path, target, reason);

    // Compare against the raw path so that '/login/' canonicalizes to '/login'.
    if target == path {
        Resolution::Serve(target.to_string())
    } else {
        Resolution::Redirect {
            to: target.to_string(),
            reason,
        }
    }
}

fn effective_target<'a>(
    table: &'a RouteTable,
    session: Session,
    live: &'a str,
) -> (&'a str, &'static str) {
    let requested = if live == "/" {
        table.default_route()
    } else {
        live
    };

    if requested == table.not_found_route() {
        return (table.not_found_route(), "not-found route");
    }

    let Some(route) = table.lookup(requested) else {
        return (table.not_found_route(), "no matching route");
    };

    if route.needs_authentication() && !session.authenticated {
        return (table.logged_out_route(), "authentication required");
    }
    if route.needs_admin() && !session.admin {
        return (table.logged_in_route(), "admin rights required");
    }
    if !route.needs_authentication() && session.authenticated {
        return (table.logged_in_route(), "already logged in");
    }

    (route.path(), "allowed")
}

// ============================================================================
// Tests
// ============================================================================
