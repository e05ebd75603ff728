mod capacity;
mod erasure;
mod signature;

use core::fmt;
use core::marker::PhantomData;
use core::ptr::NonNull;

use log::{debug, trace};

use self::erasure::{Caller, Erasure, FunctionCaller, MethodCaller};
use crate::error::BindError;
#[cfg(feature = "identity")]
use crate::identity::Destination;

pub use self::capacity::INLINE_CAPACITY;
pub use self::signature::Signature;

/// A handle to a free function or a method bound to an object, called later
/// without allocating.
///
/// The binding is chosen once, at construction, and never changes. The handle does
/// not own its target: `'a` is the borrow of the bound object, and a handle bound
/// only to a function can be `'static`.
///
/// Calling an unbound handle is not an error. It returns the signature's default
/// value (`0`, `false`, `None`, null, `()`, ...) and has no other effect.
///
/// A handle holds raw addresses, so it is neither `Send` nor `Sync`, even when it is
/// unbound or bound only to a function. A handler table shared between contexts,
/// such as one reached from an interrupt, has to sit behind whatever lock or
/// critical section guards the rest of that state. A plain `static` is rejected:
///
/// ```compile_fail
/// use inline_callback::Callback;
///
/// static HANDLERS: [Callback<'static, fn(u8)>; 2] = [Callback::unbound(); 2];
/// ```
///
/// ```
/// use inline_callback::Callback;
///
/// fn add(a: i32, b: i32) -> i32 {
///     a + b
/// }
///
/// let bound = Callback::<fn(i32, i32) -> i32>::from_fn(add);
/// let unbound = Callback::<fn(i32, i32) -> i32>::unbound();
/// assert_eq!(bound.call(2, 3), 5);
/// assert_eq!(unbound.call(2, 3), 0);
/// ```
#[derive(Clone, Copy)]
pub struct Callback<'a, S: Signature> {
    caller: Option<Caller<S>>,
    _target: PhantomData<&'a ()>,
}

impl<'a, S: Signature> Callback<'a, S> {
    pub const fn unbound() -> Self {
        Self {
            caller: None,
            _target: PhantomData,
        }
    }

    const fn bound(caller: Caller<S>) -> Self {
        Self {
            caller: Some(caller),
            _target: PhantomData,
        }
    }

    pub fn from_fn(func: S) -> Self {
        let () = FunctionCaller::<S>::FITS;
        trace!("binding callback to function {:p}", S::fn_addr(func));
        Self::bound(Caller::Function(FunctionCaller::new(func)))
    }

    /// Binds to `func`, or stays unbound when it is `None`.
    pub fn from_fn_opt(func: Option<S>) -> Self {
        match func {
            Some(func) => Self::from_fn(func),
            None => {
                debug!("null function pointer, callback left unbound");
                Self::unbound()
            }
        }
    }

    /// Binds `method` to `object`. The borrow keeps the object alive for as long as
    /// the callback.
    pub fn from_method<T>(object: &'a T, method: S::Method<T>) -> Self {
        // SAFETY: `object` is borrowed for `'a`, which bounds every copy of the handle.
        unsafe { Self::bind_method(NonNull::from(object), method) }
    }

    /// Binds `method` to the object behind `object`. A null object or a missing
    /// method leaves the callback unbound.
    ///
    /// # Safety
    ///
    /// When non-null, `object` must point to a `T` that stays valid for shared access
    /// across every call through this callback and its copies.
    pub unsafe fn from_raw_method<T>(object: *const T, method: Option<S::Method<T>>) -> Self {
        match unsafe { Self::try_from_raw_method(object, method) } {
            Ok(callback) => callback,
            Err(err) => {
                debug!("{err}, callback left unbound");
                Self::unbound()
            }
        }
    }

    /// Binds a method that takes its object mutably. A null object or a missing
    /// method leaves the callback unbound.
    ///
    /// # Safety
    ///
    /// When non-null, `object` must point to a `T` that stays valid across every call
    /// through this callback and its copies. No other reference to the object may be
    /// used while a call is running, and the method must not call back into a handle
    /// bound to the same object.
    pub unsafe fn from_raw_method_mut<T>(
        object: *mut T,
        method: Option<S::MethodMut<T>>,
    ) -> Self {
        match unsafe { Self::try_from_raw_method_mut(object, method) } {
            Ok(callback) => callback,
            Err(err) => {
                debug!("{err}, callback left unbound");
                Self::unbound()
            }
        }
    }

    /// Like [`from_fn_opt`](Self::from_fn_opt), but reports a null function.
    pub fn try_from_fn(func: Option<S>) -> Result<Self, BindError> {
        func.map(Self::from_fn).ok_or(BindError::NullFunction)
    }

    /// Like [`from_raw_method`](Self::from_raw_method), but reports what was null.
    ///
    /// # Safety
    ///
    /// Same contract as [`from_raw_method`](Self::from_raw_method).
    pub unsafe fn try_from_raw_method<T>(
        object: *const T,
        method: Option<S::Method<T>>,
    ) -> Result<Self, BindError> {
        let object = NonNull::new(object.cast_mut()).ok_or(BindError::NullObject)?;
        let method = method.ok_or(BindError::NullMethod)?;
        // SAFETY: forwarded from the caller.
        Ok(unsafe { Self::bind_method(object, method) })
    }

    /// Like [`from_raw_method_mut`](Self::from_raw_method_mut), but reports what was
    /// null.
    ///
    /// # Safety
    ///
    /// Same contract as [`from_raw_method_mut`](Self::from_raw_method_mut).
    pub unsafe fn try_from_raw_method_mut<T>(
        object: *mut T,
        method: Option<S::MethodMut<T>>,
    ) -> Result<Self, BindError> {
        let object = NonNull::new(object).ok_or(BindError::NullObject)?;
        let method = method.ok_or(BindError::NullMethod)?;
        let () = MethodCaller::<S>::FILLS;
        trace!(
            "binding callback to mutable method {:p} on {:p}",
            S::method_mut_addr::<T>(method),
            object
        );
        // SAFETY: forwarded from the caller.
        Ok(Self::bound(Caller::Method(unsafe {
            MethodCaller::<S>::new_mut(object, method)
        })))
    }

    unsafe fn bind_method<T>(object: NonNull<T>, method: S::Method<T>) -> Self {
        let () = MethodCaller::<S>::FILLS;
        trace!(
            "binding callback to method {:p} on {:p}",
            S::method_addr::<T>(method),
            object
        );
        Self::bound(Caller::Method(unsafe {
            MethodCaller::<S>::new(object, method)
        }))
    }

    /// Whether a function or method was bound at construction.
    pub const fn is_bound(&self) -> bool {
        self.caller.is_some()
    }

    /// Calls through the handle with the arguments packed as a tuple.
    ///
    /// Each arity also has a `call(a0, a1, ..)` shorthand.
    #[inline]
    pub fn invoke(&self, args: S::Args) -> S::Output
    where
        S::Output: Default,
    {
        match &self.caller {
            Some(caller) => caller.invoke(args),
            None => {
                trace!("unbound callback invoked, returning default");
                S::Output::default()
            }
        }
    }

    /// Whether both handles lead to the same function, or to the same method on the
    /// same object. Two unbound handles match.
    #[cfg(feature = "identity")]
    pub fn points_to_same(&self, other: &Self) -> bool {
        match (&self.caller, &other.caller) {
            (None, None) => true,
            (Some(a), Some(b)) => a.same_destination(b),
            _ => false,
        }
    }

    #[cfg(feature = "identity")]
    pub fn destination(&self) -> Option<Destination> {
        self.caller.as_ref().map(|caller| caller.destination())
    }
}

impl<S: Signature> Default for Callback<'_, S> {
    fn default() -> Self {
        Self::unbound()
    }
}

impl<S: Signature> From<S> for Callback<'_, S> {
    fn from(func: S) -> Self {
        Self::from_fn(func)
    }
}

impl<S: Signature> From<Option<S>> for Callback<'_, S> {
    fn from(func: Option<S>) -> Self {
        Self::from_fn_opt(func)
    }
}

#[cfg(feature = "identity")]
impl<S: Signature> PartialEq for Callback<'_, S> {
    fn eq(&self, other: &Self) -> bool {
        self.points_to_same(other)
    }
}

#[cfg(feature = "identity")]
impl<S: Signature> Eq for Callback<'_, S> {}

#[cfg(feature = "identity")]
impl<'b, S: Signature> PartialEq<dyn crate::CallbackIdentity + 'b> for Callback<'_, S> {
    fn eq(&self, other: &(dyn crate::CallbackIdentity + 'b)) -> bool {
        crate::CallbackIdentity::points_to_same(self, other)
    }
}

impl<S: Signature> fmt::Debug for Callback<'_, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut out = f.debug_struct("Callback");
        match &self.caller {
            Some(caller) => out.field("bound", &caller.kind()),
            None => out.field("bound", &false),
        };
        out.finish()
    }
}
