#![forbid(unsafe_code)]

//! Per-node subscription ownership.

use std::fmt;

use tether_reactive::Subscription;

/// Owns every subscription a rendered node registered while binding.
///
/// Dropping the node drops its scope, which detaches the node from its
/// sources, newest binding first.
#[derive(Default)]
pub struct BindingScope {
    held: Vec<Subscription>,
}

impl BindingScope {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn keep(&mut self, subscription: Subscription) {
        self.held.push(subscription);
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.held.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.held.is_empty()
    }

    /// Detach everything now; the scope can take new bindings afterwards.
    pub fn release_all(&mut self) {
        for mut subscription in self.held.drain(..).rev() {
            subscription.unsubscribe();
        }
    }
}

impl Drop for BindingScope {
    fn drop(&mut self) {
        self.release_all();
    }
}

impl fmt::Debug for BindingScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "BindingScope({} held)", self.held.len())
    }
}
