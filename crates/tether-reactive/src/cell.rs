#![forbid(unsafe_code)]

//! Observable cells: the writable root of every reactive graph.
//!
//! # Invariants
//!
//! 1. `get()` returns the value passed to the most recent `set()` (or the
//!    initial value).
//! 2. Every `set()` bumps the version by exactly one and notifies every
//!    subscriber exactly once, in registration order.
//! 3. Setting a value equal to the current one still notifies. Callers such
//!    as a "toggle all" checkbox rely on one notification per call.
//! 4. The new value is stored before the first callback runs, so callbacks
//!    always read the new value.

use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::Rc;

use crate::observable::{Notifier, Observable, ObservableId, Source, Subscription};

struct CellInner<T> {
    value: RefCell<T>,
    version: Cell<u64>,
    notifier: Notifier,
}

impl<T: Clone + 'static> Source<T> for CellInner<T> {
    fn id(&self) -> ObservableId {
        self.notifier.id()
    }

    fn get(&self) -> T {
        self.value.borrow().clone()
    }

    fn with_value(&self, f: &mut dyn FnMut(&T)) {
        f(&self.value.borrow());
    }

    fn subscribe(&self, callback: Box<dyn Fn()>) -> Subscription {
        self.notifier.subscribe(callback)
    }

    fn subscriber_count(&self) -> usize {
        self.notifier.subscriber_count()
    }
}

/// A mutable, observable container holding one value.
///
/// Cloning a `Publisher` creates a new handle to the **same** cell.
pub struct Publisher<T> {
    inner: Rc<CellInner<T>>,
}

impl<T> Clone for Publisher<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Rc::clone(&self.inner),
        }
    }
}

impl<T: fmt::Debug> fmt::Debug for Publisher<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Publisher")
            .field("id", &self.inner.notifier.id())
            .field("value", &*self.inner.value.borrow())
            .field("version", &self.inner.version.get())
            .finish()
    }
}

impl<T: Clone + Default + 'static> Default for Publisher<T> {
    fn default() -> Self {
        Self::new(T::default())
    }
}

/// Create an observable cell holding `initial`.
pub fn publisher<T: Clone + 'static>(initial: T) -> Publisher<T> {
    Publisher::new(initial)
}

impl<T: Clone + 'static> Publisher<T> {
    /// Create a cell holding `initial`.
    #[must_use]
    pub fn new(initial: T) -> Self {
        Self {
            inner: Rc::new(CellInner {
                value: RefCell::new(initial),
                version: Cell::new(0),
                notifier: Notifier::new(),
            }),
        }
    }

    /// Identity of this cell.
    #[must_use]
    pub fn id(&self) -> ObservableId {
        self.inner.notifier.id()
    }

    /// Current value (cloned).
    #[must_use]
    pub fn get(&self) -> T {
        self.inner.value.borrow().clone()
    }

    /// Borrow the current value without cloning it.
    ///
    /// # Panics
    ///
    /// Panics if `f` calls `set` on this cell.
    pub fn with<R>(&self, f: impl FnOnce(&T) -> R) -> R {
        f(&self.inner.value.borrow())
    }

    /// Store `value` and notify every subscriber.
    ///
    /// # Panics
    ///
    /// Panics if called while the value is borrowed through [`with`](Self::with)
    /// on this cell. A panic raised by a subscriber propagates to the caller
    /// after the value has been stored.
    pub fn set(&self, value: T) {
        let previous = self.inner.value.replace(value);
        drop(previous);
        let version = self.inner.version.get() + 1;
        self.inner.version.set(version);
        tracing::trace!(
            message = "publisher.set",
            observable = self.id().get(),
            version
        );
        self.inner.notifier.notify();
    }

    /// Edit the value in place, then notify as [`set`](Self::set) does.
    pub fn update(&self, f: impl FnOnce(&mut T)) {
        let mut value = self.get();
        f(&mut value);
        self.set(value);
    }

    /// Register a change callback.
    pub fn subscribe(&self, callback: impl Fn() + 'static) -> Subscription {
        self.inner.notifier.subscribe(Box::new(callback))
    }

    /// Number of live subscriptions.
    #[must_use]
    pub fn subscriber_count(&self) -> usize {
        self.inner.notifier.subscriber_count()
    }

    /// Number of completed `set` calls.
    #[must_use]
    pub fn version(&self) -> u64 {
        self.inner.version.get()
    }

    /// Read-only handle to this cell.
    #[must_use]
    pub fn observe(&self) -> Observable<T> {
        let source: Rc<dyn Source<T>> = self.inner.clone();
        Observable::from_source(source)
    }

    /// Derived view over this cell.
    pub fn map<B: 'static>(&self, transform: impl Fn(&T) -> B + 'static) -> Observable<B> {
        self.observe().map(transform)
    }

    /// Whether both handles point at the same cell.
    #[must_use]
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.inner, &other.inner)
    }
}

impl<T: Clone + 'static> From<&Publisher<T>> for Observable<T> {
    fn from(cell: &Publisher<T>) -> Self {
        cell.observe()
    }
}

impl<T: Clone + 'static> From<Publisher<T>> for Observable<T> {
    fn from(cell: Publisher<T>) -> Self {
        cell.observe()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
