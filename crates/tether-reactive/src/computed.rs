#![forbid(unsafe_code)]

//! Memoized views.
//!
//! A [`Computed`] sits between a derived view (recomputes on every read) and
//! a [`Subscriber`](crate::Subscriber) (recomputes on every notification):
//! a notification only marks it stale and forwards the notification; the
//! next read recomputes once.
//!
//! Dependencies are the same [`Dependency`] values a subscriber takes, so a
//! memoized view can follow an observable list of observables too.
//!
//! # Invariants
//!
//! 1. A read after a dependency notification never sees the old value.
//! 2. Any number of notifications between two reads cost one recompute.
//! 3. `version` counts recomputes.
//! 4. A panicking compute leaves the view stale; the next read retries.

use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::Rc;

use crate::observable::{Notifier, Observable, ObservableId, Source, Subscription};
use crate::subscriber::{Dependency, Tracker};

struct Memo<T> {
    compute: Box<dyn Fn() -> T>,
    slot: RefCell<Option<T>>,
    stale: Cell<bool>,
    recomputes: Cell<u64>,
    notifier: Notifier,
    // Held for its subscriptions only.
    tracker: RefCell<Option<Tracker>>,
}

impl<T> Memo<T> {
    fn ensure_fresh(&self) {
        if !self.stale.get() && self.slot.borrow().is_some() {
            return;
        }
        let fresh = (self.compute)();
        let old = self.slot.replace(Some(fresh));
        drop(old);
        self.stale.set(false);
        self.recomputes.set(self.recomputes.get() + 1);
        tracing::trace!(
            message = "computed.recompute",
            observable = self.notifier.id().get(),
            version = self.recomputes.get()
        );
    }

    fn read<R>(&self, f: impl FnOnce(&T) -> R) -> R {
        self.ensure_fresh();
        let slot = self.slot.borrow();
        match slot.as_ref() {
            Some(value) => f(value),
            None => unreachable!("memo slot filled by ensure_fresh"),
        }
    }
}

impl<T: Clone + 'static> Source<T> for Memo<T> {
    fn id(&self) -> ObservableId {
        self.notifier.id()
    }

    fn get(&self) -> T {
        self.read(T::clone)
    }

    fn with_value(&self, f: &mut dyn FnMut(&T)) {
        self.read(|value| f(value));
    }

    fn subscribe(&self, callback: Box<dyn Fn()>) -> Subscription {
        self.notifier.subscribe(callback)
    }

    fn subscriber_count(&self) -> usize {
        self.notifier.subscriber_count()
    }
}

/// Lazily recomputed, cached value.
///
/// Handles are cheap to clone and share one cache.
pub struct Computed<T> {
    memo: Rc<Memo<T>>,
}

impl<T> Clone for Computed<T> {
    fn clone(&self) -> Self {
        Self {
            memo: Rc::clone(&self.memo),
        }
    }
}

impl<T: fmt::Debug> fmt::Debug for Computed<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Computed")
            .field("id", &self.memo.notifier.id())
            .field("value", &*self.memo.slot.borrow())
            .field("stale", &self.memo.stale.get())
            .finish()
    }
}

impl<T: Clone + 'static> Computed<T> {
    /// Memoize `compute`, marking it stale whenever a dependency fires.
    ///
    /// Nothing is computed until the first read.
    pub fn new(
        dependencies: impl IntoIterator<Item = Dependency>,
        compute: impl Fn() -> T + 'static,
    ) -> Self {
        let memo = Rc::new(Memo {
            compute: Box::new(compute),
            slot: RefCell::new(None),
            stale: Cell::new(true),
            recomputes: Cell::new(0),
            notifier: Notifier::new(),
            tracker: RefCell::new(None),
        });

        let weak = Rc::downgrade(&memo);
        let on_change: Rc<dyn Fn()> = Rc::new(move || {
            let Some(memo) = weak.upgrade() else {
                return;
            };
            memo.stale.set(true);
            memo.notifier.notify();
        });
        let tracker = Tracker::new(dependencies.into_iter().collect(), on_change);
        *memo.tracker.borrow_mut() = Some(tracker);

        Self { memo }
    }

    /// Memoized `transform` of one observable.
    pub fn from_observable<S: 'static>(
        source: &Observable<S>,
        transform: impl Fn(&S) -> T + 'static,
    ) -> Self {
        let reader = source.clone();
        Self::new([Dependency::value(source)], move || reader.with(&transform))
    }

    #[must_use]
    pub fn get(&self) -> T {
        self.memo.read(T::clone)
    }

    /// Borrow the (refreshed) value.
    ///
    /// # Panics
    ///
    /// Panics if `f` re-enters this view after invalidating it.
    pub fn with<R>(&self, f: impl FnOnce(&T) -> R) -> R {
        self.memo.read(f)
    }

    /// Whether the next read will recompute.
    #[must_use]
    pub fn is_dirty(&self) -> bool {
        self.memo.stale.get() || self.memo.slot.borrow().is_none()
    }

    /// Mark the value stale without notifying.
    pub fn invalidate(&self) {
        self.memo.stale.set(true);
    }

    /// Number of recomputes so far.
    #[must_use]
    pub fn version(&self) -> u64 {
        self.memo.recomputes.get()
    }

    /// Run `callback` whenever the value goes stale.
    pub fn subscribe(&self, callback: impl Fn() + 'static) -> Subscription {
        self.memo.notifier.subscribe(Box::new(callback))
    }

    #[must_use]
    pub fn observe(&self) -> Observable<T> {
        let source: Rc<dyn Source<T>> = self.memo.clone();
        Observable::from_source(source)
    }

    pub fn map<B: 'static>(&self, transform: impl Fn(&T) -> B + 'static) -> Observable<B> {
        self.observe().map(transform)
    }
}
