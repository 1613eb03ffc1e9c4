#![forbid(unsafe_code)]

//! Derived views: `source.map(f)`.
//!
//! A derived view stores no value. `get()` applies the transform to the
//! source's current value on every call, and subscribing to the view
//! subscribes to the source. A view subscriber therefore runs inside the
//! source's own dispatch, after the source value has been stored, and reads
//! the new value through the view.
//!
//! Chained views (`o.map(f).map(g)`) re-run each stage on every read. Use
//! [`Computed`](crate::Computed) when a stage is expensive, or a
//! [`Subscriber`](crate::Subscriber) to cache a value recomputed from many
//! sources.

use std::rc::Rc;

use crate::observable::{Notifier, Observable, ObservableId, Source, Subscription};

struct MapSource<A, B> {
    // Only the id is used; views never notify on their own.
    notifier: Notifier,
    source: Observable<A>,
    transform: Box<dyn Fn(&A) -> B>,
}

impl<A: 'static, B: 'static> Source<B> for MapSource<A, B> {
    fn id(&self) -> ObservableId {
        self.notifier.id()
    }

    fn get(&self) -> B {
        self.source.with(|value| (self.transform)(value))
    }

    fn with_value(&self, f: &mut dyn FnMut(&B)) {
        let value = self.get();
        f(&value);
    }

    fn subscribe(&self, callback: Box<dyn Fn()>) -> Subscription {
        self.source.subscribe(callback)
    }

    fn subscriber_count(&self) -> usize {
        self.source.subscriber_count()
    }
}

pub(crate) fn map<A: 'static, B: 'static>(
    source: &Observable<A>,
    transform: impl Fn(&A) -> B + 'static,
) -> Observable<B> {
    let node: Rc<dyn Source<B>> = Rc::new(MapSource {
        notifier: Notifier::new(),
        source: source.clone(),
        transform: Box::new(transform),
    });
    Observable::from_source(node)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
