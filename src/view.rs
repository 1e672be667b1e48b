//! Views and the loader boundary.
//!
//! A route does not hold a view; it holds a [`ViewLoader`], an async function
//! producing a [`ViewModule`]. The module exposes one default [`ViewFactory`]
//! which the router calls to construct the [`View`] that becomes current.
//!
//! ```
//! use spa_navigator::{DisposeError, View, ViewModule};
//!
//! #[derive(Default)]
//! struct LoginPage {
//!     listeners: usize,
//! }
//!
//! impl View for LoginPage {
//!     fn dispose(&mut self) -> Result<(), DisposeError> {
//!         self.listeners = 0;
//!         Ok(())
//!     }
//!
//!     spa_navigator::impl_view!();
//! }
//!
//! let module = ViewModule::of::<LoginPage>();
//! let view = module.construct().unwrap();
//! assert!(view.is::<LoginPage>());
//! ```

use crate::error::{DisposeError, LoadError};
use futures_util::future::LocalBoxFuture;
use futures_util::FutureExt;
use std::any::Any;
use std::cell::{Ref, RefCell, RefMut};
use std::fmt;
use std::future::Future;
use std::rc::Rc;

// ============================================================================
// View trait
// ============================================================================

/// The active visual component for a route.
///
/// Implementors only need [`dispose`](View::dispose) when they hold resources
/// (listeners, timers, DOM nodes) that must be released before the next view
/// is constructed. The default does nothing.
pub trait View: Any {
    /// Release everything this view acquired.
    ///
    /// Called at most once, right before the next view is loaded. An error is
    /// logged by the router and does not stop the navigation.
    fn dispose(&mut self) -> Result<(), DisposeError> {
        Ok(())
    }

    /// Type name used in log messages.
    fn type_name(&self) -> &'static str {
        std::any::type_name::<Self>()
    }

    #[doc(hidden)]
    fn as_any(&self) -> &dyn Any;

    #[doc(hidden)]
    fn as_any_mut(&mut self) -> &mut dyn Any;
}

// ============================================================================
// ViewFactory / ViewModule
// ============================================================================

/// Constructor for a boxed [`View`].
pub type ViewFactory = Rc<dyn Fn() -> Result<Box<dyn View>, LoadError>>;

/// Future returned by a [`ViewLoader`].
pub type LoadFuture = LocalBoxFuture<'static, Result<ViewModule, LoadError>>;

/// Async function producing the module for a route.
pub type ViewLoader = Rc<dyn Fn() -> LoadFuture>;

/// A loaded unit exposing one default view factory.
#[derive(Clone, Default)]
pub struct ViewModule {
    default: Option<ViewFactory>,
}

impl ViewModule {
    /// Module whose factory always succeeds.
    pub fn new<V, F>(factory: F) -> Self
    where
        V: View,
        F: Fn() -> V + 'static,
    {
        Self {
            default: Some(Rc::new(move || Ok(Box::new(factory()) as Box<dyn View>))),
        }
    }

    /// Module whose factory may fail.
    pub fn try_new<F>(factory: F) -> Self
    where
        F: Fn() -> Result<Box<dyn View>, LoadError> + 'static,
    {
        Self {
            default: Some(Rc::new(factory)),
        }
    }

    /// Module constructing `V` through [`Default`].
    pub fn of<V: View + Default>() -> Self {
        Self::new(V::default)
    }

    /// Malformed module without a default factory.
    pub fn empty() -> Self {
        Self { default: None }
    }

    /// Whether the module exposes a default factory.
    pub fn has_factory(&self) -> bool {
        self.default.is_some()
    }

    /// Build the view through the default factory.
    pub fn construct(&self) -> Result<ViewHandle, LoadError> {
        let factory = self.default.as_ref().ok_or(LoadError::MissingFactory)?;
        factory().map(ViewHandle::from_box)
    }
}

impl fmt::Debug for ViewModule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ViewModule")
            .field("has_factory", &self.has_factory())
            .finish()
    }
}

/// Wrap an async function into a [`ViewLoader`].
///
/// ```
/// use spa_navigator::{loader_fn, LoadError, ViewModule};
/// # #[derive(Default)] struct Home;
/// # impl spa_navigator::View for Home {
/// #     fn as_any(&self) -> &dyn std::any::Any { self }
/// #     fn as_any_mut(&mut self) -> &mut dyn std::any::Any { self }
/// # }
///
/// let loader = loader_fn(|| async { Ok::<_, LoadError>(ViewModule::of::<Home>()) });
/// let module = pollster::block_on(loader()).unwrap();
/// assert!(module.has_factory());
/// ```
pub fn loader_fn<F, Fut>(f: F) -> ViewLoader
where
    F: Fn() -> Fut + 'static,
    Fut: Future<Output = Result<ViewModule, LoadError>> + 'static,
{
    Rc::new(move || f().boxed_local())
}

/// Loader that resolves immediately to `module`.
pub fn ready_loader(module: ViewModule) -> ViewLoader {
    Rc::new(move || {
        let module = module.clone();
        async move { Ok(module) }.boxed_local()
    })
}

// ============================================================================
// ViewHandle
// ============================================================================

/// Shared handle to a constructed view.
///
/// The router owns the current view through one handle and passes it to
/// subscribers by reference. Subscribers may clone it, but only the router
/// disposes it.
#[derive(Clone)]
pub struct ViewHandle {
    inner: Rc<RefCell<Box<dyn View>>>,
}

impl ViewHandle {
    fn from_box(view: Box<dyn View>) -> Self {
        Self {
            inner: Rc::new(RefCell::new(view)),
        }
    }

    /// Wrap a view that was built outside a loader.
    pub fn new<V: View>(view: V) -> Self {
        Self::from_box(Box::new(view))
    }

    /// Whether both handles point to the same view instance.
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.inner, &other.inner)
    }

    /// Type name of the concrete view.
    pub fn type_name(&self) -> &'static str {
        self.inner.borrow().type_name()
    }

    /// Whether the concrete view is a `V`.
    pub fn is<V: View>(&self) -> bool {
        self.inner.borrow().as_any().is::<V>()
    }

    /// Run `f` against the concrete view if it is a `V`.
    pub fn with<V: View, R>(&self, f: impl FnOnce(&V) -> R) -> Option<R> {
        let view = self.inner.borrow();
        view.as_any().downcast_ref::<V>().map(f)
    }

    /// Run `f` against the concrete view mutably if it is a `V`.
    pub fn with_mut<V: View, R>(&self, f: impl FnOnce(&mut V) -> R) -> Option<R> {
        let mut view = self.inner.borrow_mut();
        view.as_any_mut().downcast_mut::<V>().map(f)
    }

    /// Borrow the view as a trait object.
    pub fn borrow(&self) -> Ref<'_, Box<dyn View>> {
        self.inner.borrow()
    }

    /// Borrow the view mutably as a trait object.
    pub fn borrow_mut(&self) -> RefMut<'_, Box<dyn View>> {
        self.inner.borrow_mut()
    }

    pub(crate) fn dispose(&self) -> Result<(), DisposeError> {
        self.inner.borrow_mut().dispose()
    }
}

impl fmt::Debug for ViewHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("ViewHandle").field(&self.type_name()).finish()
    }
}

/// Implement the hidden [`View`] plumbing for a type.
///
/// ```
/// use spa_navigator::{impl_view, View};
///
/// #[derive(Default)]
/// struct AboutPage;
///
/// impl View for AboutPage {
///     impl_view!();
/// }
/// ```
#[macro_export]
macro_rules! impl_view {
    () => {
        fn as_any(&self) -> &dyn ::std::any::Any {
            self
        }

        fn as_any_mut(&mut self) -> &mut dyn ::std::any::Any {
            self
        }
    };
}

// ============================================================================
// Tests
// ============================================================================
