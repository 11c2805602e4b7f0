//! Property system for Horizon Annotate.
//!
//! Reactive properties with change detection. Tags keep their mutable state
//! (selection, resolved values, colors) in properties so that state can be
//! updated through a shared reference while the tag tree is borrowed, and
//! pair each property with a [`Signal`](crate::Signal) for notification.
//!
//! # Example
//!
//! ```
//! use horizon_annotate_core::{Property, Signal};
//!
//! struct Toggle {
//!     on: Property<bool>,
//!     on_changed: Signal<bool>,
//! }
//!
//! impl Toggle {
//!     fn set_on(&self, on: bool) {
//!         if self.on.set(on) {
//!             self.on_changed.emit(on);
//!         }
//!     }
//! }
//!
//! let toggle = Toggle { on: Property::new(false), on_changed: Signal::new() };
//! toggle.set_on(true);
//! assert!(toggle.on.get());
//! ```

use std::fmt;

use parking_lot::RwLock;

/// A reactive property that tracks changes.
///
/// `Property<T>` wraps a value and provides change detection. When `set()` is
/// called, it compares the new value with the current one and returns whether
/// the value actually changed.
///
/// # Thread Safety
///
/// `Property<T>` uses interior mutability with `RwLock` and is `Send + Sync`
/// whenever `T` is.
pub struct Property<T> {
    value: RwLock<T>,
}

impl<T: Clone> Property<T> {
    /// Create a new property with an initial value.
    pub fn new(value: T) -> Self {
        Self {
            value: RwLock::new(value),
        }
    }

    /// Get the current value.
    ///
    /// This clones the value. For strings and other heap types, consider `with()`.
    pub fn get(&self) -> T {
        self.value.read().clone()
    }

    /// Access the value through a closure without cloning.
    pub fn with<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&T) -> R,
    {
        f(&self.value.read())
    }

    /// Set the value without change detection.
    pub fn set_silent(&self, value: T) {
        *self.value.write() = value;
    }

    /// Replace the value only when `predicate` accepts the current one.
    ///
    /// The check and the write happen under the same lock. Returns `true`
    /// if the value was replaced.
    pub fn set_if<P>(&self, predicate: P, value: T) -> bool
    where
        P: FnOnce(&T) -> bool,
    {
        let mut current = self.value.write();
        if predicate(&current) {
            *current = value;
            true
        } else {
            false
        }
    }
}

impl<T: Clone + PartialEq> Property<T> {
    /// Set the value, returning `true` if the value changed.
    ///
    /// The caller should emit the associated notification signal when this
    /// returns `true`.
    pub fn set(&self, value: T) -> bool {
        let mut current = self.value.write();
        if *current != value {
            *current = value;
            true
        } else {
            false
        }
    }

    /// Set the value, returning the old value if it changed.
    pub fn replace(&self, value: T) -> Option<T> {
        let mut current = self.value.write();
        if *current != value {
            Some(std::mem::replace(&mut *current, value))
        } else {
            None
        }
    }
}

impl<T: Clone> Clone for Property<T> {
    fn clone(&self) -> Self {
        Self::new(self.get())
    }
}

impl<T: Clone + Default> Default for Property<T> {
    fn default() -> Self {
        Self::new(T::default())
    }
}

impl<T: Clone + fmt::Debug> fmt::Debug for Property<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Property")
            .field("value", &self.get())
            .finish()
    }
}
