//! Binding between external history events and the router.
//!
//! Two events re-run resolution against the live address: the browser's
//! back/forward (`popstate`) and the initial document-ready. Neither carries a
//! path; the router reads the location itself.
//!
//! In a browser, [`web::install`](crate::web::install) wires both events once
//! for the whole session. Elsewhere, drive the bridge by hand:
//!
//! ```
//! use spa_navigator::{
//!     impl_view, HistoryBridge, MemoryDocument, MemoryHistory, RouteDescriptor, RouteTable,
//!     Router, View,
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
//! let history = MemoryHistory::new("/about");
//! let bridge = HistoryBridge::new(Router::new(table, history, MemoryDocument::new()));
//!
//! let result = pollster::block_on(bridge.document_ready());
//! assert_eq!(result.title(), Some("About"));
//! ```

use crate::error::NavigationResult;
use crate::history::HistoryState;
use crate::router::Router;
use crate::{debug_log, info_log};

/// Forwards history events to a [`Router`].
#[derive(Debug, Clone)]
pub struct HistoryBridge {
    router: Router,
}

impl HistoryBridge {
    /// Bridge events into `router`
    pub fn new(router: Router) -> Self {
        Self { router }
    }

    /// The router events are forwarded to
    pub fn router(&self) -> &Router {
        &self.router
    }

    /// Handle a back/forward event. `state` is only logged.
    pub async fn popstate(&self, state: Option<&HistoryState>) -> NavigationResult {
        debug_log!("popstate event triggered (state: {:?})", state);
        self.router.resolve_and_render().await
    }

    /// Handle the initial document-ready event.
    pub async fn document_ready(&self) -> NavigationResult {
        info_log!("Document ready, running initial resolution");
        self.router.resolve_and_render().await
    }
}
