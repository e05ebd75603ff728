//! Fixed-capacity callback handles.
//!
//! A [`Callback`] is bound once, at construction, to a free function or to a method
//! on an object, and can be called any number of times afterwards. It is
//! `Copy`, never allocates and keeps its caller inline in [`INLINE_CAPACITY`] bytes.
//!
//! ```
//! use core::cell::Cell;
//! use inline_callback::{callback, method_callback};
//!
//! struct Counter {
//!     hits: Cell<u32>,
//! }
//!
//! impl Counter {
//!     fn hit(&self, by: u32) -> u32 {
//!         self.hits.set(self.hits.get() + by);
//!         self.hits.get()
//!     }
//! }
//!
//! fn twice(n: u32) -> u32 {
//!     n * 2
//! }
//!
//! let counter = Counter { hits: Cell::new(0) };
//! let on_tick = method_callback::<fn(u32) -> u32, _>(&counter, Counter::hit);
//! let scale = callback(twice as fn(u32) -> u32);
//!
//! assert_eq!(on_tick.call(scale.call(3)), 6);
//! assert_eq!(counter.hits.get(), 6);
//! ```
//!
//! With the default `identity` feature, callbacks can be compared for "same
//! destination", including across signatures through [`CallbackIdentity`].
#![cfg_attr(not(test), no_std)]

mod callback;
mod error;
mod identity;

pub use crate::callback::{Callback, Signature, INLINE_CAPACITY};
pub use crate::error::BindError;
pub use crate::identity::CallbackIdentity;
#[cfg(feature = "identity")]
pub use crate::identity::{position_of, Destination, SignatureTag};

/// Shorthand for [`Callback::from_fn`].
pub fn callback<S: Signature>(func: S) -> Callback<'static, S> {
    Callback::from_fn(func)
}

/// Shorthand for [`Callback::from_method`].
pub fn method_callback<'a, S: Signature, T>(
    object: &'a T,
    method: S::Method<T>,
) -> Callback<'a, S> {
    Callback::from_method(object, method)
}

/// Shorthand for [`Callback::from_raw_method`].
///
/// # Safety
///
/// Same contract as [`Callback::from_raw_method`].
pub unsafe fn raw_method_callback<'a, S: Signature, T>(
    object: *const T,
    method: S::Method<T>,
) -> Callback<'a, S> {
    unsafe { Callback::from_raw_method(object, Some(method)) }
}

/// Shorthand for [`Callback::from_raw_method_mut`].
///
/// # Safety
///
/// Same contract as [`Callback::from_raw_method_mut`].
pub unsafe fn raw_method_mut_callback<'a, S: Signature, T>(
    object: *mut T,
    method: S::MethodMut<T>,
) -> Callback<'a, S> {
    unsafe { Callback::from_raw_method_mut(object, Some(method)) }
}
