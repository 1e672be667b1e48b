//! Router state management

use crate::history::HistoryState;
use crate::resolve::Session;
use crate::view::ViewHandle;

/// Per-call navigation options.
///
/// ```
/// use spa_navigator::RouteOptions;
/// use serde_json::json;
///
/// let options = RouteOptions::new().replace().state(json!({ "from": "menu" }));
/// assert!(options.replace);
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RouteOptions {
    /// Overwrite the current history entry instead of adding one.
    pub replace: bool,
    /// Payload for the history entry. Defaults to `{"route": <path>}`.
    pub state: Option<HistoryState>,
}

impl RouteOptions {
    /// Push with the default state
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the current entry
    pub fn replace(mut self) -> Self {
        self.replace = true;
        self
    }

    /// Attach a history payload
    pub fn state(mut self, state: HistoryState) -> Self {
        self.state = Some(state);
        self
    }
}

/// Mutable navigation state owned by one router.
#[derive(Debug, Default)]
pub(crate) struct NavigationState {
    /// The view currently shown. At most one exists at a time.
    current_view: Option<ViewHandle>,
    session: Session,
    /// Navigation ID counter; each resolution increments it so a slow load can
    /// tell it has been superseded.
    navigation_id: u64,
}

impl NavigationState {
    pub(crate) fn new(session: Session) -> Self {
        Self {
            current_view: None,
            session,
            navigation_id: 0,
        }
    }

    /// Start a new navigation and return its ID.
    pub(crate) fn start_navigation(&mut self) -> u64 {
        self.navigation_id += 1;
        self.navigation_id
    }

    /// Check if a navigation is still the latest one.
    pub(crate) fn is_navigation_current(&self, nav_id: u64) -> bool {
        self.navigation_id == nav_id
    }

    pub(crate) fn current_view(&self) -> Option<&ViewHandle> {
        self.current_view.as_ref()
    }

    /// Clear the current view, handing it to the caller for disposal.
    pub(crate) fn take_current_view(&mut self) -> Option<ViewHandle> {
        self.current_view.take()
    }

    pub(crate) fn set_current_view(&mut self, view: ViewHandle) {
        self.current_view = Some(view);
    }

    pub(crate) fn session(&self) -> Session {
        self.session
    }

    pub(crate) fn session_mut(&mut self) -> &mut Session {
        &mut self.session
    }
}
