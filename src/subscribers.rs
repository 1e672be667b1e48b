//! Navigation subscribers.
//!
//! A subscriber is called after every completed navigation with the new view
//! and its title. Subscribers run in registration order; one that returns an
//! error is logged and skipped without affecting the others.
//!
//! Registrations are identified by the `Rc` they were made with. Registering
//! the same callback twice yields two calls per navigation, and each
//! [`Subscription`] removes one of them.

use crate::view::ViewHandle;
use crate::{debug_log, error_log};
use std::cell::{Cell, RefCell};
use std::error::Error;
use std::fmt;
use std::rc::{Rc, Weak};

/// Return type of a subscriber callback.
pub type SubscriberResult = Result<(), Box<dyn Error>>;

/// Callback invoked with the current view (if any) and its title.
///
/// Failures are reported by returning `Err`. A panicking subscriber is not
/// isolated: the panic unwinds through the navigation and later subscribers
/// are not called.
pub type Subscriber = Rc<dyn Fn(Option<&ViewHandle>, &str) -> SubscriberResult>;

type Slots = RefCell<Vec<Subscriber>>;

/// Create a [`Subscriber`] from a closure.
///
/// ```
/// use spa_navigator::subscriber_fn;
///
/// let subscriber = subscriber_fn(|view, title| {
///     println!("now showing {title} ({:?})", view.map(|v| v.type_name()));
///     Ok(())
/// });
/// # let _ = subscriber;
/// ```
pub fn subscriber_fn<F>(f: F) -> Subscriber
where
    F: Fn(Option<&ViewHandle>, &str) -> SubscriberResult + 'static,
{
    Rc::new(f)
}

fn same_callback(a: &Subscriber, b: &Subscriber) -> bool {
    std::ptr::eq(Rc::as_ptr(a).cast::<()>(), Rc::as_ptr(b).cast::<()>())
}

/// Ordered list of subscribers.
#[derive(Default)]
pub(crate) struct SubscriberRegistry {
    slots: Rc<Slots>,
}

impl SubscriberRegistry {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn subscribe(&self, callback: Subscriber) -> Subscription {
        self.slots.borrow_mut().push(callback.clone());
        debug_log!("Subscriber added ({} total)", self.len());
        Subscription {
            slots: Rc::downgrade(&self.slots),
            callback,
            active: Cell::new(true),
        }
    }

    pub(crate) fn len(&self) -> usize {
        self.slots.borrow().len()
    }

    /// Call every subscriber registered at this moment.
    ///
    /// Works on a snapshot, so callbacks may subscribe or unsubscribe freely;
    /// the change applies from the next notification on.
    pub(crate) fn notify(&self, view: Option<&ViewHandle>, title: &str) {
        let snapshot: Vec<Subscriber> = self.slots.borrow().clone();
        for (index, subscriber) in snapshot.iter().enumerate() {
            if let Err(err) = subscriber(view, title) {
                error_log!("Router subscriber #{} failed: {}", index, err);
            }
        }
    }
}

impl fmt::Debug for SubscriberRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SubscriberRegistry")
            .field("len", &self.len())
            .finish()
    }
}

/// Handle returned by [`Router::subscribe`](crate::Router::subscribe).
///
/// Dropping it keeps the subscriber registered; call
/// [`unsubscribe`](Self::unsubscribe) to remove it.
pub struct Subscription {
    slots: Weak<Slots>,
    callback: Subscriber,
    active: Cell<bool>,
}

impl Subscription {
    /// Remove this registration. Later calls do nothing.
    pub fn unsubscribe(&self) {
        if !self.active.replace(false) {
            return;
        }
        let Some(slots) = self.slots.upgrade() else {
            return;
        };
        let mut slots = slots.borrow_mut();
        if let Some(index) = slots.iter().position(|s| same_callback(s, &self.callback)) {
            slots.remove(index);
            debug_log!("Subscriber removed ({} left)", slots.len());
        }
    }

    /// Whether [`unsubscribe`](Self::unsubscribe) has not been called yet
    pub fn is_active(&self) -> bool {
        self.active.get()
    }
}

impl fmt::Debug for Subscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription")
            .field("active", &self.active.get())
            .finish_non_exhaustive()
    }
}
