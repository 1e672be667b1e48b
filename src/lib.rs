//! # spa-navigator
//!
//! Client-side navigation core for single-page applications. It maps the
//! address to a current [`View`], manages that view's lifecycle, and tells the
//! rest of the application when navigation completes.
//!
//! # Pieces
//!
//! | Type | Role |
//! |------|------|
//! | [`RouteTable`] | Flat path → [`RouteDescriptor`] map with designated default/not-found routes |
//! | [`ViewModule`], [`ViewLoader`] | Async boundary producing the view for a route |
//! | [`Router`] | Resolution, teardown, loading, fallback, title, notification |
//! | [`Subscription`] | Handle for a navigation subscriber |
//! | [`HistoryProvider`], [`Document`] | Browser surface; in-memory versions included |
//! | [`HistoryBridge`] | Back/forward and document-ready events |
//!
//! Everything is single-threaded: handles are `Rc`-based and futures are
//! `!Send`, matching the browser's event loop.
//!
//! # Quick start
//!
//! ```
//! use spa_navigator::{
//!     impl_view, MemoryDocument, MemoryHistory, RouteDescriptor, RouteTable, Router, View,
//! };
//!
//! #[derive(Default)]
//! struct Login;
//! impl View for Login {
//!     impl_view!();
//! }
//!
//! #[derive(Default)]
//! struct Home;
//! impl View for Home {
//!     impl_view!();
//! }
//!
//! let table = RouteTable::builder()
//!     .route(RouteDescriptor::view::<Login>("/login", "Login"))
//!     .route(RouteDescriptor::view::<Home>("/home", "Home").requires_authentication())
//!     .route(RouteDescriptor::view::<Home>("/404", "Page Not Found"))
//!     .default_route("/home")
//!     .logged_out_route("/login")
//!     .build()
//!     .unwrap();
//!
//! let history = MemoryHistory::default();
//! let document = MemoryDocument::new();
//! let router = Router::new(table, history.clone(), document.clone());
//!
//! let _subscription = router.subscribe(|view, title| {
//!     println!("{title}: {:?}", view.map(|v| v.type_name()));
//!     Ok(())
//! });
//!
//! // Logged out: the private home page redirects to the login page.
//! pollster::block_on(router.push("/home"));
//! assert_eq!(history.location(), "/login");
//! assert_eq!(document.title().as_deref(), Some("Login"));
//! ```
//!
//! # Feature flags
//!
//! | Feature | Default | Purpose |
//! |---------|---------|---------|
//! | `log` | yes | Log through the `log` crate |
//! | `tracing` | no | Log through the `tracing` crate |
//! | `web` | no | Browser history/document backend and event binding |

#![cfg_attr(docsrs, feature(doc_cfg))]

#[cfg(all(feature = "log", feature = "tracing"))]
compile_error!("Features `log` and `tracing` are mutually exclusive. Enable only one.");

pub mod logging;

pub mod bridge;
pub mod config;
pub mod error;
pub mod history;
pub mod resolve;
pub mod route;
pub mod router;
pub mod state;
pub mod subscribers;
pub mod view;

#[cfg(feature = "web")]
#[cfg_attr(docsrs, doc(cfg(feature = "web")))]
pub mod web;

pub use bridge::HistoryBridge;
pub use config::{RouterConfig, TokenHandler, DEFAULT_TOKEN_PARAM, MAX_REDIRECT_DEPTH};
pub use error::{
    DisposeError, HistoryError, LoadError, NavigationError, NavigationResult, RouteTableError,
};
pub use history::{
    default_state, strip_query_param, Document, HistoryProvider, HistoryState, MemoryDocument,
    MemoryHistory,
};
pub use resolve::{resolve_target, Resolution, Session};
pub use route::{normalize_path, RouteDescriptor, RouteTable, RouteTableBuilder};
pub use router::{Router, FATAL_ERROR_MESSAGE};
pub use state::RouteOptions;
pub use subscribers::{subscriber_fn, Subscriber, SubscriberResult, Subscription};
pub use view::{
    loader_fn, ready_loader, LoadFuture, View, ViewFactory, ViewHandle, ViewLoader, ViewModule,
};
