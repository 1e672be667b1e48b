//! Test utilities for router integration tests
//!
//! Provides a standard route table, views that record their lifecycle, and a
//! fixture bundling a router with inspectable history and document handles.

#![allow(dead_code)]

use spa_navigator::*;
use std::cell::RefCell;
use std::rc::Rc;

/// Shared log of lifecycle events such as `construct:home` or `dispose:home`.
pub type Events = Rc<RefCell<Vec<String>>>;

/// One subscriber call: the view label (if any) and the title.
pub type Notifications = Rc<RefCell<Vec<(Option<&'static str>, String)>>>;

/// View that records construction and disposal.
pub struct TrackedView {
    pub label: &'static str,
    events: Events,
    fail_dispose: bool,
}

impl View for TrackedView {
    fn dispose(&mut self) -> Result<(), DisposeError> {
        self.events
            .borrow_mut()
            .push(format!("dispose:{}", self.label));
        if self.fail_dispose {
            Err(DisposeError::new(format!("{} leaked a listener", self.label)))
        } else {
            Ok(())
        }
    }

    impl_view!();
}

/// Module constructing a [`TrackedView`] labelled `label`.
pub fn tracked_module(label: &'static str, events: &Events) -> ViewModule {
    tracked_module_with(label, events, false)
}

/// Module constructing a [`TrackedView`] whose `dispose` may fail.
pub fn tracked_module_with(label: &'static str, events: &Events, fail_dispose: bool) -> ViewModule {
    let events = events.clone();
    ViewModule::new(move || {
        events.borrow_mut().push(format!("construct:{label}"));
        TrackedView {
            label,
            events: events.clone(),
            fail_dispose,
        }
    })
}

/// Route whose view is a [`TrackedView`].
pub fn tracked_route(path: &str, title: &str, label: &'static str, events: &Events) -> RouteDescriptor {
    RouteDescriptor::new(path, title, ready_loader(tracked_module(label, events)))
}

/// Loader that always rejects.
pub fn rejecting_loader(message: &'static str) -> ViewLoader {
    loader_fn(move || async move { Err(LoadError::rejected(message)) })
}

/// Standard table:
///
/// | Path         | Title          | Access    |
/// |--------------|----------------|-----------|
/// | `/login`     | Login          | public    |
/// | `/about`     | About          | public    |
/// | `/home`      | Home           | login     |
/// | `/admin`     | Admin          | admin     |
/// | `/sticky`    | Sticky         | public, dispose fails |
/// | `/broken`    | Broken         | public, loader rejects |
/// | `/malformed` | Malformed      | public, no factory |
/// | `/404`       | Page Not Found | public    |
///
/// Default and logged-in route `/home`, logged-out route `/login`.
pub fn standard_table(events: &Events) -> RouteTableBuilder {
    RouteTable::builder()
        .route(tracked_route("/login", "Login", "login", events))
        .route(tracked_route("/about", "About", "about", events))
        .route(tracked_route("/home", "Home", "home", events).requires_authentication())
        .route(tracked_route("/admin", "Admin", "admin", events).requires_admin())
        .route(RouteDescriptor::new(
            "/sticky",
            "Sticky",
            ready_loader(tracked_module_with("sticky", events, true)),
        ))
        .route(RouteDescriptor::new(
            "/broken",
            "Broken",
            rejecting_loader("chunk failed to load"),
        ))
        .route(RouteDescriptor::new(
            "/malformed",
            "Malformed",
            ready_loader(ViewModule::empty()),
        ))
        .route(tracked_route("/404", "Page Not Found", "not-found", events))
        .default_route("/home")
        .logged_in_route("/home")
        .logged_out_route("/login")
}

/// A router plus handles to everything it touches.
pub struct Fixture {
    pub router: Router,
    pub history: MemoryHistory,
    pub document: MemoryDocument,
    pub events: Events,
    pub notifications: Notifications,
    pub subscription: Subscription,
}

impl Fixture {
    /// Router over the standard table, starting at `/`.
    pub fn new(session: Session) -> Self {
        Self::at("/", session)
    }

    /// Router over the standard table, starting at `start`.
    pub fn at(start: &str, session: Session) -> Self {
        Self::build(start, RouterConfig::new().session(session), standard_table)
    }

    /// Router with a custom table and configuration.
    pub fn build(
        start: &str,
        config: RouterConfig,
        table: impl FnOnce(&Events) -> RouteTableBuilder,
    ) -> Self {
        init_logging();
        let events: Events = Rc::default();
        let notifications: Notifications = Rc::default();
        let history = MemoryHistory::new(start);
        let document = MemoryDocument::new();
        let router = Router::with_config(
            table(&events).build().expect("fixture table is valid"),
            history.clone(),
            document.clone(),
            config,
        );
        let subscription = router.subscribe(record_into(&notifications));
        Self {
            router,
            history,
            document,
            events,
            notifications,
            subscription,
        }
    }

    /// Lifecycle events so far
    pub fn events(&self) -> Vec<String> {
        self.events.borrow().clone()
    }

    /// Forget recorded events and notifications
    pub fn clear(&self) {
        self.events.borrow_mut().clear();
        self.notifications.borrow_mut().clear();
    }

    /// Subscriber calls so far
    pub fn notifications(&self) -> Vec<(Option<&'static str>, String)> {
        self.notifications.borrow().clone()
    }

    /// Label of the router's current view
    pub fn current_label(&self) -> Option<&'static str> {
        self.router
            .current_view()
            .and_then(|view| view.with::<TrackedView, _>(|v| v.label))
    }
}

/// Subscriber closure appending `(label, title)` to `log`.
pub fn record_into(
    log: &Notifications,
) -> impl Fn(Option<&ViewHandle>, &str) -> SubscriberResult + 'static {
    let log = log.clone();
    move |view: Option<&ViewHandle>, title: &str| {
        let label = view.and_then(|v| v.with::<TrackedView, _>(|t| t.label));
        log.borrow_mut().push((label, title.to_string()));
        Ok(())
    }
}

/// Route test logs through env_logger once.
pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}
