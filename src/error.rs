//! Error handling for the router.
//!
//! Navigation never fails from the caller's point of view: every failure the
//! router can recover from is logged and folded into a [`NavigationResult`].
//! The types in this module describe those outcomes:
//!
//! - [`NavigationResult`]: what a call to
//!   [`Router::navigate`](crate::Router::navigate) ended up doing.
//! - [`NavigationError`]: the unrecoverable or rejected cases (invalid URL,
//!   redirect loop, failed not-found fallback).
//! - [`LoadError`]: a view loader rejected or produced an unusable module.
//! - [`DisposeError`]: a view failed to release its resources.
//! - [`HistoryError`]: the history backend refused a write.
//! - [`RouteTableError`]: a route table was built without its designated routes.
//!
//! # Examples
//!
//! ```
//! use spa_navigator::NavigationResult;
//!
//! let result = NavigationResult::Rendered {
//!     path: "/home".into(),
//!     title: "Home".into(),
//! };
//! assert!(result.is_rendered());
//! assert_eq!(result.title(), Some("Home"));
//! ```

use std::fmt;

// ============================================================================
// Navigation Result Types
// ============================================================================

/// Outcome of a navigation.
#[derive(Debug, Clone, PartialEq)]
pub enum NavigationResult {
    /// The requested (or redirected-to) route was loaded and is now current.
    Rendered {
        /// Path the address settled on
        path: String,
        /// Title published to the document
        title: String,
    },

    /// The route at `path` failed to load; the not-found view is current instead.
    Fallback {
        /// Path whose view failed to load
        path: String,
        /// Title of the not-found route
        title: String,
        /// Why the original load failed
        error: LoadError,
    },

    /// The target address equals the current one; nothing happened.
    Skipped {
        /// The unchanged path
        path: String,
    },

    /// A newer navigation started while this one was loading; its result was dropped.
    Superseded {
        /// Path this navigation was loading
        path: String,
    },

    /// The request was rejected before touching history.
    Error(NavigationError),

    /// The hard-error surface was rendered; no view is current.
    Fatal(NavigationError),
}

impl NavigationResult {
    /// Check if the requested route was rendered normally
    pub fn is_rendered(&self) -> bool {
        matches!(self, NavigationResult::Rendered { .. })
    }

    /// Check if the not-found view was rendered after a load failure
    pub fn is_fallback(&self) -> bool {
        matches!(self, NavigationResult::Fallback { .. })
    }

    /// Check if navigation was a no-op
    pub fn is_skipped(&self) -> bool {
        matches!(self, NavigationResult::Skipped { .. })
    }

    /// Check if a newer navigation won the race
    pub fn is_superseded(&self) -> bool {
        matches!(self, NavigationResult::Superseded { .. })
    }

    /// Check if the request was rejected
    pub fn is_error(&self) -> bool {
        matches!(self, NavigationResult::Error(_))
    }

    /// Check if the hard-error surface was rendered
    pub fn is_fatal(&self) -> bool {
        matches!(self, NavigationResult::Fatal(_))
    }

    /// Title published for this navigation, if any.
    pub fn title(&self) -> Option<&str> {
        match self {
            NavigationResult::Rendered { title, .. } | NavigationResult::Fallback { title, .. } => {
                Some(title)
            }
            _ => None,
        }
    }

    /// Path the navigation settled on, if it got that far.
    pub fn path(&self) -> Option<&str> {
        match self {
            NavigationResult::Rendered { path, .. }
            | NavigationResult::Fallback { path, .. }
            | NavigationResult::Skipped { path }
            | NavigationResult::Superseded { path } => Some(path),
            NavigationResult::Error(_) | NavigationResult::Fatal(_) => None,
        }
    }
}

// ============================================================================
// NavigationError
// ============================================================================

/// Errors that stop a navigation from producing a view.
#[derive(Debug, Clone, PartialEq)]
pub enum NavigationError {
    /// The navigation target could not be parsed as a URL.
    InvalidUrl { url: String, message: String },

    /// Resolution kept redirecting past the configured hop limit.
    RedirectLoop { path: String, hops: usize },

    /// The not-found view could not be loaded either.
    FallbackFailed { path: String, error: LoadError },
}

impl fmt::Display for NavigationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NavigationError::InvalidUrl { url, message } => {
                write!(f, "Invalid navigation target '{}': {}", url, message)
            }
            NavigationError::RedirectLoop { path, hops } => {
                write!(f, "Redirect loop detected after {} hops at '{}'", hops, path)
            }
            NavigationError::FallbackFailed { path, error } => {
                write!(f, "Failed to load not-found view '{}': {}", path, error)
            }
        }
    }
}

impl std::error::Error for NavigationError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            NavigationError::FallbackFailed { error, .. } => Some(error),
            _ => None,
        }
    }
}

// ============================================================================
// LoadError
// ============================================================================

/// Failure to turn a route's loader into a constructed view.
#[derive(Debug, Clone, PartialEq)]
pub enum LoadError {
    /// The loader itself failed.
    Rejected(String),

    /// The loaded module has no default view factory.
    MissingFactory,

    /// The view factory failed to build the view.
    Construction(String),
}

impl LoadError {
    /// Create a [`LoadError::Rejected`] from any message.
    pub fn rejected(message: impl Into<String>) -> Self {
        Self::Rejected(message.into())
    }

    /// Create a [`LoadError::Construction`] from any message.
    pub fn construction(message: impl Into<String>) -> Self {
        Self::Construction(message.into())
    }
}

impl fmt::Display for LoadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LoadError::Rejected(message) => write!(f, "Loader rejected: {}", message),
            LoadError::MissingFactory => write!(f, "Module has no default view factory"),
            LoadError::Construction(message) => write!(f, "View construction failed: {}", message),
        }
    }
}

impl std::error::Error for LoadError {}

// ============================================================================
// DisposeError / HistoryError
// ============================================================================

/// Raised by [`View::dispose`](crate::View::dispose).
#[derive(Debug, Clone, PartialEq)]
pub struct DisposeError {
    message: String,
}

impl DisposeError {
    /// Create a new disposal error
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    /// Error message
    pub fn message(&self) -> &str {
        &self.message
    }
}

impl fmt::Display for DisposeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Dispose failed: {}", self.message)
    }
}

impl std::error::Error for DisposeError {}

/// Raised by a [`HistoryProvider`](crate::HistoryProvider) that could not write an entry.
#[derive(Debug, Clone, PartialEq)]
pub struct HistoryError {
    message: String,
}

impl HistoryError {
    /// Create a new history error
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl fmt::Display for HistoryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "History write failed: {}", self.message)
    }
}

impl std::error::Error for HistoryError {}

// ============================================================================
// RouteTableError
// ============================================================================

/// Route table configuration errors, reported by
/// [`RouteTableBuilder::build`](crate::RouteTableBuilder::build).
#[derive(Debug, Clone, PartialEq)]
pub enum RouteTableError {
    /// A designated route (default, not-found, logged-in, logged-out) has no descriptor.
    MissingDesignatedRoute { role: &'static str, path: String },
}

impl fmt::Display for RouteTableError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RouteTableError::MissingDesignatedRoute { role, path } => {
                write!(f, "The {} route '{}' is not registered", role, path)
            }
        }
    }
}

impl std::error::Error for RouteTableError {}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_navigation_result_rendered() {
        let result = NavigationResult::Rendered {
            path: "/home".to_string(),
            title: "Home".to_string(),
        };
        assert!(result.is_rendered());
        assert!(!result.is_fallback());
        assert!(!result.is_fatal());
        assert_eq!(result.path(), Some("/home"));
        assert_eq!(result.title(), Some("Home"));
    }

    #[test]
    fn test_navigation_result_fallback_carries_not_found_title() {
        let result = NavigationResult::Fallback {
            path: "/404".to_string(),
            title: "Page Not Found".to_string(),
            error: LoadError::MissingFactory,
        };
        assert!(result.is_fallback());
        assert_eq!(result.title(), Some("Page Not Found"));
    }

    #[test]
    fn test_skipped_and_fatal_have_no_title() {
        let skipped = NavigationResult::Skipped {
            path: "/a".to_string(),
        };
        assert!(skipped.is_skipped());
        assert_eq!(skipped.title(), None);

        let fatal = NavigationResult::Fatal(NavigationError::RedirectLoop {
            path: "/a".to_string(),
            hops: 3,
        });
        assert!(fatal.is_fatal());
        assert_eq!(fatal.title(), None);
        assert_eq!(fatal.path(), None);
    }

    #[test]
    fn test_navigation_error_display() {
        let error = NavigationError::FallbackFailed {
            path: "/404".to_string(),
            error: LoadError::rejected("network down"),
        };
        assert_eq!(
            error.to_string(),
            "Failed to load not-found view '/404': Loader rejected: network down"
        );
        assert!(std::error::Error::source(&error).is_some());
    }

    #[test]
    fn test_route_table_error_display() {
        let error = RouteTableError::MissingDesignatedRoute {
            role: "not-found",
            path: "/404".to_string(),
        };
        assert_eq!(error.to_string(), "The not-found route '/404' is not registered");
    }
}
