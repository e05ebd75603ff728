use core::ptr::NonNull;

use super::capacity;
use super::signature::{MethodThunk, Signature};
#[cfg(feature = "identity")]
use crate::identity::Destination;

/// Invocation contract shared by every concrete caller.
pub(crate) trait Erasure<S: Signature> {
    fn invoke(&self, args: S::Args) -> S::Output;

    #[cfg(feature = "identity")]
    fn destination(&self) -> Destination;

    #[cfg(feature = "identity")]
    fn same_destination(&self, other: &Self) -> bool
    where
        Self: Sized,
    {
        self.destination() == other.destination()
    }
}

/// Calls a plain function pointer.
#[derive(Clone, Copy)]
pub(crate) struct FunctionCaller<S: Signature> {
    func: S,
}

impl<S: Signature> FunctionCaller<S> {
    pub(crate) const FITS: () = assert!(
        capacity::fits::<Self>(),
        "inline callback storage is too small for a function caller"
    );

    pub(crate) const fn new(func: S) -> Self {
        Self { func }
    }
}

impl<S: Signature> Erasure<S> for FunctionCaller<S> {
    #[inline]
    fn invoke(&self, args: S::Args) -> S::Output {
        S::call_fn(self.func, args)
    }

    #[cfg(feature = "identity")]
    fn destination(&self) -> Destination {
        Destination::Function {
            function: S::fn_addr(self.func),
        }
    }
}

/// Calls a method on a borrowed object whose type has been erased.
///
/// `thunk` is monomorphized for the object type at construction, so `object` and
/// `method` never have to be cast back by anyone else.
#[derive(Clone, Copy)]
pub(crate) struct MethodCaller<S: Signature> {
    object: NonNull<()>,
    method: *const (),
    thunk: MethodThunk<S>,
}

impl<S: Signature> MethodCaller<S> {
    pub(crate) const FILLS: () = assert!(
        capacity::fills::<Self>(),
        "inline callback storage must match the size of a method caller"
    );

    /// # Safety
    ///
    /// `object` must stay valid for shared access for as long as this caller, or any
    /// copy of it, can be invoked.
    pub(crate) unsafe fn new<T>(object: NonNull<T>, method: S::Method<T>) -> Self {
        Self {
            object: object.cast(),
            method: S::method_addr::<T>(method),
            thunk: S::call_method::<T>,
        }
    }

    /// # Safety
    ///
    /// `object` must stay valid for as long as this caller, or any copy of it, can be
    /// invoked, and nothing else may access it while a call is running.
    pub(crate) unsafe fn new_mut<T>(object: NonNull<T>, method: S::MethodMut<T>) -> Self {
        Self {
            object: object.cast(),
            method: S::method_mut_addr::<T>(method),
            thunk: S::call_method_mut::<T>,
        }
    }
}

impl<S: Signature> Erasure<S> for MethodCaller<S> {
    #[inline]
    fn invoke(&self, args: S::Args) -> S::Output {
        // SAFETY: `new` ties `object` to the target type of `thunk` and its caller
        // keeps the object alive.
        unsafe { (self.thunk)(self.object, self.method, args) }
    }

    #[cfg(feature = "identity")]
    fn destination(&self) -> Destination {
        Destination::Method {
            object: self.object.as_ptr().cast_const(),
            method: self.method,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum CallerKind {
    Function,
    Method,
}

/// The single caller a bound [`Callback`](super::Callback) holds inline.
#[derive(Clone, Copy)]
pub(crate) enum Caller<S: Signature> {
    Function(FunctionCaller<S>),
    Method(MethodCaller<S>),
}

impl<S: Signature> Caller<S> {
    pub(crate) fn kind(&self) -> CallerKind {
        match self {
            Caller::Function(_) => CallerKind::Function,
            Caller::Method(_) => CallerKind::Method,
        }
    }
}

impl<S: Signature> Erasure<S> for Caller<S> {
    #[inline]
    fn invoke(&self, args: S::Args) -> S::Output {
        match self {
            Caller::Function(caller) => caller.invoke(args),
            Caller::Method(caller) => caller.invoke(args),
        }
    }

    #[cfg(feature = "identity")]
    fn destination(&self) -> Destination {
        match self {
            Caller::Function(caller) => caller.destination(),
            Caller::Method(caller) => caller.destination(),
        }
    }

    // A function never points to the same place as a method, whatever the addresses.
    #[cfg(feature = "identity")]
    fn same_destination(&self, other: &Self) -> bool {
        match (self, other) {
            (Caller::Function(a), Caller::Function(b)) => a.same_destination(b),
            (Caller::Method(a), Caller::Method(b)) => a.same_destination(b),
            _ => false,
        }
    }
}
