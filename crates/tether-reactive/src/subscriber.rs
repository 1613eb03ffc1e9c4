#![forbid(unsafe_code)]

//! Multi-source subscribers and nested-collection tracking.
//!
//! A [`Subscriber<T>`] caches the result of a recompute closure and refreshes
//! it whenever one of its [`Dependency`] sources fires. A dependency is
//! either a plain observable or an observable whose value is a list of
//! observables (`Observable<Vec<Observable<U>>>`), e.g. the completion flags
//! of every item in a todo list.
//!
//! # Two-level tracking
//!
//! For a collection dependency the tracker keeps one subscription on the
//! outer observable plus a table from [`ObservableId`] to the subscription on
//! each inner observable. When the outer observable fires:
//!
//! 1. The table is diffed against the new member list: subscriptions for ids
//!    that disappeared are released, ids that appeared are subscribed.
//! 2. Only then does the owner recompute and notify.
//!
//! The whole sequence runs inside one callback, so no reader can observe a
//! half-rebuilt table. An inner observable listed twice is tracked once, so
//! one change triggers one recompute.
//!
//! # Invariants
//!
//! 1. `get()` returns the result of the latest recompute.
//! 2. The value is computed eagerly at construction and once per dependency
//!    notification.
//! 3. A removed item's observable never triggers a recompute after the
//!    outer change that removed it.

use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::{Rc, Weak};

use ahash::{AHashMap, AHashSet};

use crate::cell::Publisher;
use crate::observable::{Notifier, Observable, ObservableId, Source, Subscription};

// ---------------------------------------------------------------------------
// Dependency
// ---------------------------------------------------------------------------

trait Watch {
    fn id(&self) -> ObservableId;
    fn watch(&self, callback: Box<dyn Fn()>) -> Subscription;
}

impl<T: 'static> Watch for Observable<T> {
    fn id(&self) -> ObservableId {
        Observable::id(self)
    }

    fn watch(&self, callback: Box<dyn Fn()>) -> Subscription {
        self.subscribe(callback)
    }
}

trait Collection {
    fn watch(&self, callback: Box<dyn Fn()>) -> Subscription;
    fn members(&self) -> Vec<Rc<dyn Watch>>;
}

impl<T: 'static> Collection for Observable<Vec<Observable<T>>> {
    fn watch(&self, callback: Box<dyn Fn()>) -> Subscription {
        self.subscribe(callback)
    }

    fn members(&self) -> Vec<Rc<dyn Watch>> {
        self.with(|items| {
            items
                .iter()
                .map(|item| Rc::new(item.clone()) as Rc<dyn Watch>)
                .collect()
        })
    }
}

#[derive(Clone)]
enum DependencyKind {
    Value(Rc<dyn Watch>),
    Each(Rc<dyn Collection>),
}

/// One source tracked by a [`Subscriber`] or [`Computed`](crate::Computed).
#[derive(Clone)]
pub struct Dependency {
    kind: DependencyKind,
}

impl Dependency {
    /// Track a single observable.
    pub fn value<T: 'static>(source: &Observable<T>) -> Self {
        Self {
            kind: DependencyKind::Value(Rc::new(source.clone())),
        }
    }

    /// Track an observable list of observables: the list itself and every
    /// observable currently in it.
    pub fn each<T: 'static>(source: &Observable<Vec<Observable<T>>>) -> Self {
        Self {
            kind: DependencyKind::Each(Rc::new(source.clone())),
        }
    }

    /// Whether this dependency tracks a nested collection.
    #[must_use]
    pub fn is_collection(&self) -> bool {
        matches!(self.kind, DependencyKind::Each(_))
    }
}

impl fmt::Debug for Dependency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            DependencyKind::Value(source) => f.debug_tuple("Value").field(&source.id()).finish(),
            DependencyKind::Each(_) => f.debug_tuple("Each").finish(),
        }
    }
}

impl<T: 'static> From<&Observable<T>> for Dependency {
    fn from(source: &Observable<T>) -> Self {
        Self::value(source)
    }
}

impl<T: Clone + 'static> From<&Publisher<T>> for Dependency {
    fn from(cell: &Publisher<T>) -> Self {
        Self::value(&cell.observe())
    }
}

// ---------------------------------------------------------------------------
// Tracker: the two-level subscription manager
// ---------------------------------------------------------------------------

type InnerTable = RefCell<AHashMap<ObservableId, Subscription>>;

/// Holds every subscription an owner needs to stay up to date.
pub(crate) struct Tracker {
    direct: Vec<Subscription>,
    tables: Vec<Rc<InnerTable>>,
}

impl Tracker {
    /// Subscribe to `dependencies`; `on_change` runs after every change,
    /// after any nested rebuild has completed.
    pub(crate) fn new(dependencies: Vec<Dependency>, on_change: Rc<dyn Fn()>) -> Self {
        let mut direct = Vec::with_capacity(dependencies.len());
        let mut tables = Vec::new();

        for dependency in dependencies {
            match dependency.kind {
                DependencyKind::Value(source) => {
                    let cb = Rc::clone(&on_change);
                    direct.push(source.watch(Box::new(move || cb())));
                }
                DependencyKind::Each(collection) => {
                    let table: Rc<InnerTable> = Rc::new(RefCell::new(AHashMap::new()));
                    rebuild(&table, collection.as_ref(), &on_change);

                    let weak_table = Rc::downgrade(&table);
                    let watched = Rc::clone(&collection);
                    let cb = Rc::clone(&on_change);
                    direct.push(collection.watch(Box::new(move || {
                        if let Some(table) = weak_table.upgrade() {
                            rebuild(&table, watched.as_ref(), &cb);
                        }
                        cb();
                    })));
                    tables.push(table);
                }
            }
        }

        Self { direct, tables }
    }

    /// Number of live inner subscriptions across all collections.
    pub(crate) fn tracked_count(&self) -> usize {
        self.tables.iter().map(|table| table.borrow().len()).sum()
    }

    pub(crate) fn direct_count(&self) -> usize {
        self.direct.len()
    }
}

/// Bring `table` in line with the collection's current members.
fn rebuild(table: &InnerTable, collection: &dyn Collection, on_change: &Rc<dyn Fn()>) {
    // Read members before borrowing the table: reading may run transforms.
    let members = collection.members();
    let present: AHashSet<ObservableId> = members.iter().map(|m| m.id()).collect();

    let mut released = Vec::new();
    let mut added = 0usize;
    {
        let mut table = table.borrow_mut();
        let stale: Vec<ObservableId> = table
            .keys()
            .filter(|id| !present.contains(*id))
            .copied()
            .collect();
        for id in stale {
            if let Some(sub) = table.remove(&id) {
                released.push(sub);
            }
        }
        for member in &members {
            let id = member.id();
            if table.contains_key(&id) {
                continue;
            }
            let cb = Rc::clone(on_change);
            table.insert(id, member.watch(Box::new(move || cb())));
            added += 1;
        }
        tracing::debug!(
            message = "subscriber.rebuild",
            added,
            removed = released.len(),
            tracked = table.len()
        );
    }
    // Released subscriptions drop here, outside the borrow.
    drop(released);
}

// ---------------------------------------------------------------------------
// Subscriber<T>
// ---------------------------------------------------------------------------

struct SubscriberInner<T> {
    notifier: Notifier,
    recompute: Box<dyn Fn() -> T>,
    cached: RefCell<T>,
    version: Cell<u64>,
    tracker: RefCell<Option<Tracker>>,
}

impl<T> SubscriberInner<T> {
    fn refresh(&self) {
        let value = (self.recompute)();
        let previous = self.cached.replace(value);
        drop(previous);
        self.version.set(self.version.get() + 1);
    }
}

impl<T: Clone + 'static> Source<T> for SubscriberInner<T> {
    fn id(&self) -> ObservableId {
        self.notifier.id()
    }

    fn get(&self) -> T {
        self.cached.borrow().clone()
    }

    fn with_value(&self, f: &mut dyn FnMut(&T)) {
        f(&self.cached.borrow());
    }

    fn subscribe(&self, callback: Box<dyn Fn()>) -> Subscription {
        self.notifier.subscribe(callback)
    }

    fn subscriber_count(&self) -> usize {
        self.notifier.subscriber_count()
    }
}

/// An observable recomputed from several sources, including dynamic
/// collections of sources.
///
/// Cloning a `Subscriber` creates a new handle to the same node.
pub struct Subscriber<T> {
    inner: Rc<SubscriberInner<T>>,
}

impl<T> Clone for Subscriber<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Rc::clone(&self.inner),
        }
    }
}

impl<T: fmt::Debug> fmt::Debug for Subscriber<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscriber")
            .field("id", &self.inner.notifier.id())
            .field("cached", &*self.inner.cached.borrow())
            .field("version", &self.inner.version.get())
            .finish()
    }
}

/// Build a [`Subscriber`] over `sources`.
pub fn subscriber<T: Clone + 'static>(
    sources: impl IntoIterator<Item = Dependency>,
    recompute: impl Fn() -> T + 'static,
) -> Subscriber<T> {
    Subscriber::new(sources, recompute)
}

impl<T: Clone + 'static> Subscriber<T> {
    /// Compute the initial value and subscribe to every source.
    pub fn new(
        sources: impl IntoIterator<Item = Dependency>,
        recompute: impl Fn() -> T + 'static,
    ) -> Self {
        let initial = recompute();
        let inner = Rc::new(SubscriberInner {
            notifier: Notifier::new(),
            recompute: Box::new(recompute),
            cached: RefCell::new(initial),
            version: Cell::new(1),
            tracker: RefCell::new(None),
        });

        let weak: Weak<SubscriberInner<T>> = Rc::downgrade(&inner);
        let on_change: Rc<dyn Fn()> = Rc::new(move || {
            if let Some(inner) = weak.upgrade() {
                inner.refresh();
                tracing::trace!(
                    message = "subscriber.recompute",
                    observable = inner.notifier.id().get(),
                    version = inner.version.get()
                );
                inner.notifier.notify();
            }
        });
        let tracker = Tracker::new(sources.into_iter().collect(), on_change);
        *inner.tracker.borrow_mut() = Some(tracker);

        Self { inner }
    }

    /// Identity of this node.
    #[must_use]
    pub fn id(&self) -> ObservableId {
        self.inner.notifier.id()
    }

    /// Result of the latest recompute.
    #[must_use]
    pub fn get(&self) -> T {
        self.inner.cached.borrow().clone()
    }

    /// Borrow the cached value.
    pub fn with<R>(&self, f: impl FnOnce(&T) -> R) -> R {
        f(&self.inner.cached.borrow())
    }

    /// Register a callback that runs after every recompute.
    pub fn subscribe(&self, callback: impl Fn() + 'static) -> Subscription {
        self.inner.notifier.subscribe(Box::new(callback))
    }

    /// Number of recomputes so far, including the initial one.
    #[must_use]
    pub fn version(&self) -> u64 {
        self.inner.version.get()
    }

    /// Number of live inner subscriptions held for collection dependencies.
    #[must_use]
    pub fn tracked_count(&self) -> usize {
        self.inner
            .tracker
            .borrow()
            .as_ref()
            .map_or(0, Tracker::tracked_count)
    }

    /// Number of top-level dependencies.
    #[must_use]
    pub fn source_count(&self) -> usize {
        self.inner
            .tracker
            .borrow()
            .as_ref()
            .map_or(0, Tracker::direct_count)
    }

    /// Read-only handle to this node.
    #[must_use]
    pub fn observe(&self) -> Observable<T> {
        let source: Rc<dyn Source<T>> = self.inner.clone();
        Observable::from_source(source)
    }

    /// Derived view over the cached value.
    pub fn map<B: 'static>(&self, transform: impl Fn(&T) -> B + 'static) -> Observable<B> {
        self.observe().map(transform)
    }
}

impl<T: Clone + 'static> From<&Subscriber<T>> for Observable<T> {
    fn from(node: &Subscriber<T>) -> Self {
        node.observe()
    }
}

impl<T: Clone + 'static> From<Subscriber<T>> for Observable<T> {
    fn from(node: Subscriber<T>) -> Self {
        node.observe()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
