#![forbid(unsafe_code)]

//! Read handles, subscriber lists and RAII subscriptions.
//!
//! Every reactive value in this crate ([`Publisher`](crate::Publisher),
//! derived views, [`Subscriber`](crate::Subscriber) and
//! [`Computed`](crate::Computed)) can be viewed through the same type-erased
//! [`Observable<T>`] handle. Element props and dependency lists only ever
//! hold `Observable<T>`.
//!
//! # Dispatch
//!
//! A [`Notifier`] keeps its callbacks as `Weak` pointers; the strong pointer
//! lives in the [`Subscription`] returned to the caller. Dropping (or
//! explicitly unsubscribing) the subscription therefore removes the callback,
//! and dead entries are pruned on the next `subscribe` or dispatch.
//!
//! Dispatch walks a snapshot of the list taken when it starts:
//!
//! 1. Callbacks run in registration order, synchronously.
//! 2. A callback registered during a dispatch first fires on the next one.
//! 3. A callback whose subscription is dropped during a dispatch does not
//!    fire later in that dispatch.
//! 4. No `RefCell` borrow is held while callbacks run, so callbacks may call
//!    `set` re-entrantly. The nested dispatch runs to completion first
//!    (depth-first), then the outer dispatch resumes.

use std::cell::RefCell;
use std::fmt;
use std::rc::{Rc, Weak};
use std::sync::atomic::{AtomicU64, Ordering};

static NEXT_OBSERVABLE_ID: AtomicU64 = AtomicU64::new(1);

/// Process-unique identity of an observable.
///
/// Identifiers are allocated from a monotonic counter and never reused, so a
/// removed item re-added later under a new cell can never be confused with
/// the old one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ObservableId(u64);

impl ObservableId {
    pub(crate) fn next() -> Self {
        Self(NEXT_OBSERVABLE_ID.fetch_add(1, Ordering::Relaxed))
    }

    /// Raw numeric value.
    #[must_use]
    pub fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for ObservableId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "obs#{}", self.0)
    }
}

type Callback = Rc<dyn Fn()>;

/// Ordered list of change callbacks owned by one observable.
pub(crate) struct Notifier {
    id: ObservableId,
    slots: RefCell<Vec<Weak<dyn Fn()>>>,
}

impl Notifier {
    pub(crate) fn new() -> Self {
        Self {
            id: ObservableId::next(),
            slots: RefCell::new(Vec::new()),
        }
    }

    pub(crate) fn id(&self) -> ObservableId {
        self.id
    }

    /// Register a callback. Each call allocates its own slot, so registering
    /// the same logic twice fires it twice per notification.
    ///
    /// Slots of released subscriptions are pruned here as well as on
    /// dispatch, so the list stays bounded by the live count.
    pub(crate) fn subscribe(&self, callback: Box<dyn Fn()>) -> Subscription {
        let strong: Callback = Rc::from(callback);
        let mut slots = self.slots.borrow_mut();
        slots.retain(|slot| slot.strong_count() > 0);
        slots.push(Rc::downgrade(&strong));
        drop(slots);
        Subscription {
            callback: Some(strong),
            source: self.id,
        }
    }

    pub(crate) fn subscriber_count(&self) -> usize {
        self.slots
            .borrow()
            .iter()
            .filter(|slot| slot.strong_count() > 0)
            .count()
    }

    pub(crate) fn notify(&self) {
        let snapshot: Vec<Weak<dyn Fn()>> = {
            let mut slots = self.slots.borrow_mut();
            slots.retain(|slot| slot.strong_count() > 0);
            slots.clone()
        };
        tracing::trace!(
            message = "observable.notify",
            observable = self.id.get(),
            subscribers = snapshot.len()
        );
        for slot in snapshot {
            if let Some(callback) = slot.upgrade() {
                callback();
            }
        }
    }
}

/// RAII guard for one registered callback.
///
/// Dropping the guard unsubscribes. [`unsubscribe`](Self::unsubscribe) does
/// the same eagerly and is idempotent.
#[must_use = "dropping a Subscription unsubscribes immediately"]
pub struct Subscription {
    callback: Option<Callback>,
    source: ObservableId,
}

impl Subscription {
    /// Remove the callback. Calling this more than once is a no-op.
    pub fn unsubscribe(&mut self) {
        self.callback = None;
    }

    /// Whether the callback is still registered.
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.callback.is_some()
    }

    /// Identity of the observable whose notifier holds this callback.
    ///
    /// For a derived view this is the id of the cell it forwards to.
    #[must_use]
    pub fn source(&self) -> ObservableId {
        self.source
    }
}

impl fmt::Debug for Subscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription")
            .field("source", &self.source)
            .field("active", &self.is_active())
            .finish()
    }
}

/// Implemented by every concrete reactive node.
pub(crate) trait Source<T> {
    fn id(&self) -> ObservableId;
    fn get(&self) -> T;
    /// Lend the current value to `f` for the duration of the call.
    fn with_value(&self, f: &mut dyn FnMut(&T));
    fn subscribe(&self, callback: Box<dyn Fn()>) -> Subscription;
    fn subscriber_count(&self) -> usize;
}

/// Type-erased, read-only handle to a reactive value.
///
/// Cloning the handle shares the underlying node.
pub struct Observable<T> {
    source: Rc<dyn Source<T>>,
}

impl<T> Clone for Observable<T> {
    fn clone(&self) -> Self {
        Self {
            source: Rc::clone(&self.source),
        }
    }
}

impl<T: fmt::Debug + 'static> fmt::Debug for Observable<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut out = f.debug_struct("Observable");
        out.field("id", &self.id());
        self.source.with_value(&mut |value| {
            out.field("value", value);
        });
        out.finish()
    }
}

impl<T: 'static> Observable<T> {
    pub(crate) fn from_source(source: Rc<dyn Source<T>>) -> Self {
        Self { source }
    }

    /// Identity of the underlying node.
    #[must_use]
    pub fn id(&self) -> ObservableId {
        self.source.id()
    }

    /// Current value.
    ///
    /// For derived views the transform runs on every call. A panicking
    /// transform propagates to the caller.
    #[must_use]
    pub fn get(&self) -> T {
        self.source.get()
    }

    /// Borrow the current value without cloning it.
    ///
    /// # Panics
    ///
    /// Panics if `f` sets the cell being borrowed.
    pub fn with<R>(&self, f: impl FnOnce(&T) -> R) -> R {
        let mut f = Some(f);
        let mut out = None;
        self.source.with_value(&mut |value| {
            if let Some(f) = f.take() {
                out = Some(f(value));
            }
        });
        match out {
            Some(out) => out,
            // Every source lends its value exactly once.
            None => unreachable!("observable source did not lend its value"),
        }
    }

    /// Register `callback` to run after every change notification.
    ///
    /// Callbacks take no arguments; read the new value through a handle.
    pub fn subscribe(&self, callback: impl Fn() + 'static) -> Subscription {
        self.source.subscribe(Box::new(callback))
    }

    /// Number of live subscriptions on the underlying notifier.
    #[must_use]
    pub fn subscriber_count(&self) -> usize {
        self.source.subscriber_count()
    }

    /// Derived view applying `transform` to this value.
    ///
    /// See [`crate::map`] for the forwarding rules.
    pub fn map<B: 'static>(&self, transform: impl Fn(&T) -> B + 'static) -> Observable<B> {
        crate::map::map(self, transform)
    }

    /// Whether both handles point at the same node.
    #[must_use]
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.source, &other.source)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
