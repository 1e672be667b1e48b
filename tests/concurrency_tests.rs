//! Overlapping navigations: only the most recent one may become current.

mod common;

use common::*;
use futures::channel::oneshot;
use spa_navigator::*;
use std::cell::{Cell, RefCell};
use std::rc::Rc;

/// Table whose `/slow` loader waits until `gate` fires.
fn gated_table(events: &Events, gate: oneshot::Receiver<()>) -> RouteTableBuilder {
    let gate = Rc::new(RefCell::new(Some(gate)));
    let slow_events = events.clone();
    let slow = loader_fn(move || {
        let gate = gate.clone();
        let events = slow_events.clone();
        async move {
            let pending = gate.borrow_mut().take();
            if let Some(pending) = pending {
                let _ = pending.await;
            }
            Ok(tracked_module("slow", &events))
        }
    });

    RouteTable::builder()
        .route(tracked_route("/", "Home", "home", events))
        .route(RouteDescriptor::new("/slow", "Slow", slow))
        .route(tracked_route("/fast", "Fast", "fast", events))
        .route(tracked_route("/404", "Page Not Found", "not-found", events))
}

#[test]
fn test_slow_load_superseded_by_newer_navigation() {
    let (release, gate) = oneshot::channel::<()>();
    let fx = Fixture::build("/", RouterConfig::new(), move |events| {
        gated_table(events, gate)
    });

    let (slow, fast, ()) = pollster::block_on(async {
        futures::join!(fx.router.push("/slow"), fx.router.push("/fast"), async move {
            let _ = release.send(());
        })
    });

    assert_eq!(
        slow,
        NavigationResult::Superseded {
            path: "/slow".to_string()
        }
    );
    assert_eq!(fast.title(), Some("Fast"));
    assert_eq!(fx.current_label(), Some("fast"));
    assert_eq!(fx.history.location(), "/fast");
    assert_eq!(fx.document.titles(), vec!["Fast"]);
    assert_eq!(fx.notifications(), vec![(Some("fast"), "Fast".to_string())]);
    assert_eq!(fx.events(), vec!["construct:fast"]);
}

#[tokio::test]
async fn test_later_navigation_still_disposes_prior_view() {
    let (release, gate) = oneshot::channel::<()>();
    let fx = Fixture::build("/", RouterConfig::new(), move |events| {
        gated_table(events, gate)
    });
    fx.router.push("/fast").await;

    let (slow, home, ()) = futures::join!(
        fx.router.push("/slow"),
        fx.router.replace("/"),
        async move {
            let _ = release.send(());
        }
    );

    assert!(slow.is_superseded());
    assert_eq!(home.title(), Some("Home"));
    // '/fast' was disposed once by the slow navigation; nothing disposed 'home'.
    assert_eq!(
        fx.events(),
        vec!["construct:fast", "dispose:fast", "construct:home"]
    );
    assert_eq!(fx.notifications().len(), 2);
}

#[tokio::test]
async fn test_sequential_navigations_are_never_superseded() {
    let (release, gate) = oneshot::channel::<()>();
    let _ = release.send(());
    let fx = Fixture::build("/", RouterConfig::new(), move |events| {
        gated_table(events, gate)
    });

    let slow = fx.router.push("/slow").await;
    let fast = fx.router.push("/fast").await;

    assert!(slow.is_rendered());
    assert!(fast.is_rendered());
    assert_eq!(
        fx.events(),
        vec!["construct:slow", "dispose:slow", "construct:fast"]
    );
}

/// Loader that waits for `gate` and then rejects, counting its calls.
fn gated_rejecting_loader(gate: oneshot::Receiver<()>, calls: Rc<Cell<u32>>) -> ViewLoader {
    let gate = Rc::new(RefCell::new(Some(gate)));
    loader_fn(move || {
        calls.set(calls.get() + 1);
        let gate = gate.clone();
        async move {
            let pending = gate.borrow_mut().take();
            if let Some(pending) = pending {
                let _ = pending.await;
            }
            Err(LoadError::rejected("chunk failed to load"))
        }
    })
}

#[tokio::test]
async fn test_late_not_found_failure_leaves_newer_view_alone() {
    let (release, gate) = oneshot::channel::<()>();
    let calls = Rc::new(Cell::new(0));
    let not_found_calls = calls.clone();
    let fx = Fixture::build("/", RouterConfig::new(), move |events| {
        RouteTable::builder()
            .route(tracked_route("/", "Home", "home", events))
            .route(tracked_route("/fast", "Fast", "fast", events))
            .route(RouteDescriptor::new(
                "/404",
                "Page Not Found",
                gated_rejecting_loader(gate, not_found_calls),
            ))
    });

    let (stale, fast, ()) = futures::join!(
        fx.router.push("/404"),
        fx.router.push("/fast"),
        async move {
            let _ = release.send(());
        }
    );

    assert_eq!(
        stale,
        NavigationResult::Superseded {
            path: "/404".to_string()
        }
    );
    assert_eq!(fast.title(), Some("Fast"));
    assert_eq!(fx.current_label(), Some("fast"));
    assert_eq!(fx.events(), vec!["construct:fast"]);
    assert!(fx.document.fatal_error().is_none());
    assert_eq!(fx.notifications(), vec![(Some("fast"), "Fast".to_string())]);
    assert_eq!(calls.get(), 1);
}

#[tokio::test]
async fn test_stale_load_failure_skips_not_found_fallback() {
    let (release, gate) = oneshot::channel::<()>();
    let not_found_calls = Rc::new(Cell::new(0));
    let counter = not_found_calls.clone();
    let fx = Fixture::build("/", RouterConfig::new(), move |events| {
        let not_found_events = events.clone();
        let not_found = loader_fn(move || {
            counter.set(counter.get() + 1);
            let module = tracked_module("not-found", &not_found_events);
            async move { Ok(module) }
        });
        RouteTable::builder()
            .route(tracked_route("/", "Home", "home", events))
            .route(RouteDescriptor::new(
                "/gated",
                "Gated",
                gated_rejecting_loader(gate, Rc::new(Cell::new(0))),
            ))
            .route(tracked_route("/fast", "Fast", "fast", events))
            .route(RouteDescriptor::new("/404", "Page Not Found", not_found))
    });

    let (stale, _, ()) = futures::join!(
        fx.router.push("/gated"),
        fx.router.push("/fast"),
        async move {
            let _ = release.send(());
        }
    );

    assert!(stale.is_superseded());
    assert_eq!(not_found_calls.get(), 0);
    assert_eq!(fx.events(), vec!["construct:fast"]);
    assert_eq!(fx.document.titles(), vec!["Fast"]);
}
