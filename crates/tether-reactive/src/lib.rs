#![forbid(unsafe_code)]

//! Reactive primitives for Tether.
//!
//! - [`Publisher`]: an observable cell. `set` stores a value and notifies
//!   every subscriber synchronously, in registration order, on every call.
//! - [`Observable`]: the type-erased read handle shared by every node kind.
//! - [`Observable::map`]: a derived view recomputed on every read.
//! - [`Subscriber`]: a cached value recomputed eagerly from several
//!   [`Dependency`] sources, including observable lists of observables.
//! - [`Computed`]: a lazily recomputed, memoized value.
//! - [`Subscription`]: RAII guard that unsubscribes on drop.
//!
//! # Architecture
//!
//! Everything is single-threaded (`Rc<RefCell<..>>`); handles are `!Send`.
//! Notifiers store `Weak` callbacks and the matching strong pointer lives in
//! the returned [`Subscription`], so releasing the guard releases the
//! callback. Data flows one way: derived nodes read their sources and never
//! write to them.
//!
//! # Example
//!
//! ```
//! use tether_reactive::{Dependency, publisher, subscriber};
//!
//! let done = publisher(false);
//! let items = publisher(vec![done.observe()]);
//! let outer = items.observe();
//! let reader = outer.clone();
//! let left = subscriber([Dependency::each(&outer)], move || {
//!     reader.with(|flags| flags.iter().filter(|f| !f.get()).count())
//! });
//! assert_eq!(left.get(), 1);
//!
//! done.set(true);
//! assert_eq!(left.get(), 0);
//! ```

pub mod cell;
pub mod computed;
pub mod map;
pub mod observable;
pub mod subscriber;

pub use cell::{Publisher, publisher};
pub use computed::Computed;
pub use observable::{Observable, ObservableId, Subscription};
pub use subscriber::{Dependency, Subscriber, subscriber};
