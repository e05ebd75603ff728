use core::mem;
use core::ptr::NonNull;

use super::Callback;

mod private {
    pub trait Sealed {}
}

/// The call shape of a [`Callback`], spelled as a function-pointer type.
///
/// `fn(i32, i32) -> i32` names a callback taking two `i32`s and returning one;
/// `fn(u8)` names one returning `()`. Implemented for up to six parameters.
///
/// A bound method for target type `T` has the shape [`Signature::Method<T>`],
/// i.e. `fn(&T, A0, ..) -> R`, or [`Signature::MethodMut<T>`], i.e.
/// `fn(&mut T, A0, ..) -> R`, when it changes its object.
///
/// Every parameter and the result must be `'static`. A borrowed argument has to be
/// spelled with a `'static` lifetime (`fn(&'static [u8])`) or passed as a raw
/// pointer (`fn(*const [u8])`). Higher-ranked signatures such as `fn(&[u8])` are
/// not supported:
///
/// ```compile_fail
/// use inline_callback::Callback;
///
/// fn receive(buf: &[u8]) -> usize {
///     buf.len()
/// }
///
/// let _ = Callback::<fn(&[u8]) -> usize>::from_fn(receive);
/// ```
pub trait Signature: private::Sealed + Copy + 'static {
    /// Argument list as a tuple.
    type Args;
    type Output;
    /// Bound-method form of this signature.
    type Method<T>: Copy;
    /// Bound-method form taking the object mutably.
    type MethodMut<T>: Copy;

    #[doc(hidden)]
    fn call_fn(func: Self, args: Self::Args) -> Self::Output;

    #[doc(hidden)]
    fn fn_addr(func: Self) -> *const ();

    #[doc(hidden)]
    fn method_addr<T>(method: Self::Method<T>) -> *const ();

    #[doc(hidden)]
    fn method_mut_addr<T>(method: Self::MethodMut<T>) -> *const ();

    /// # Safety
    ///
    /// `method` must come from `method_addr::<T>` for this signature and `object`
    /// must point to a live `T`.
    #[doc(hidden)]
    unsafe fn call_method<T>(
        object: NonNull<()>,
        method: *const (),
        args: Self::Args,
    ) -> Self::Output;

    /// # Safety
    ///
    /// `method` must come from `method_mut_addr::<T>` for this signature and
    /// `object` must point to a live `T` that nothing else accesses during the call.
    #[doc(hidden)]
    unsafe fn call_method_mut<T>(
        object: NonNull<()>,
        method: *const (),
        args: Self::Args,
    ) -> Self::Output;
}

/// Per-target-type trampoline stored next to an erased method address.
pub(crate) type MethodThunk<S> =
    unsafe fn(NonNull<()>, *const (), <S as Signature>::Args) -> <S as Signature>::Output;

macro_rules! impl_signature {
    ($($arg:ident: $ty:ident),*) => {
        impl<R: 'static, $($ty: 'static),*> private::Sealed for fn($($ty),*) -> R {}

        impl<R: 'static, $($ty: 'static),*> Signature for fn($($ty),*) -> R {
            type Args = ($($ty,)*);
            type Output = R;
            type Method<T> = fn(&T, $($ty),*) -> R;
            type MethodMut<T> = fn(&mut T, $($ty),*) -> R;

            #[inline]
            fn call_fn(func: Self, ($($arg,)*): Self::Args) -> R {
                func($($arg),*)
            }

            #[inline]
            fn fn_addr(func: Self) -> *const () {
                func as *const ()
            }

            #[inline]
            fn method_addr<T>(method: Self::Method<T>) -> *const () {
                method as *const ()
            }

            #[inline]
            fn method_mut_addr<T>(method: Self::MethodMut<T>) -> *const () {
                method as *const ()
            }

            #[inline]
            unsafe fn call_method<T>(
                object: NonNull<()>,
                method: *const (),
                ($($arg,)*): Self::Args,
            ) -> R {
                // SAFETY: `method` was erased from exactly this function-pointer type.
                let method = unsafe { mem::transmute::<*const (), fn(&T, $($ty),*) -> R>(method) };
                // SAFETY: the caller guarantees `object` is a live `T`.
                method(unsafe { object.cast::<T>().as_ref() }, $($arg),*)
            }

            #[inline]
            unsafe fn call_method_mut<T>(
                object: NonNull<()>,
                method: *const (),
                ($($arg,)*): Self::Args,
            ) -> R {
                // SAFETY: `method` was erased from exactly this function-pointer type.
                let method =
                    unsafe { mem::transmute::<*const (), fn(&mut T, $($ty),*) -> R>(method) };
                // SAFETY: the caller guarantees `object` is a live `T` with no other access.
                method(unsafe { &mut *object.cast::<T>().as_ptr() }, $($arg),*)
            }
        }

        impl<'a, R: Default + 'static, $($ty: 'static),*> Callback<'a, fn($($ty),*) -> R> {
            /// Calls the bound function or method. An unbound callback returns
            /// `R::default()` and does nothing else.
            #[inline]
            pub fn call(&self, $($arg: $ty),*) -> R {
                self.invoke(($($arg,)*))
            }
        }
    };
}

impl_signature!();
impl_signature!(a0: A0);
impl_signature!(a0: A0, a1: A1);
impl_signature!(a0: A0, a1: A1, a2: A2);
impl_signature!(a0: A0, a1: A1, a2: A2, a3: A3);
impl_signature!(a0: A0, a1: A1, a2: A2, a3: A3, a4: A4);
impl_signature!(a0: A0, a1: A1, a2: A2, a3: A3, a4: A4, a5: A5);

#[cfg(test)]
mod tests {
    use super::*;

    struct Scale(i64);

    impl Scale {
        fn apply(&self, x: i64, y: i64) -> i64 {
            self.0 * (x + y)
        }

        fn grow(&mut self, x: i64, y: i64) -> i64 {
            self.0 += x * y;
            self.0
        }
    }

    fn concat(a: u8, b: u8) -> u16 {
        (u16::from(a) << 8) | u16::from(b)
    }

    #[test]
    fn test_call_fn_spreads_tuple() {
        let f: fn(u8, u8) -> u16 = concat;
        assert_eq!(<fn(u8, u8) -> u16>::call_fn(f, (0x12, 0x34)), 0x1234);
    }

    #[test]
    fn test_call_method_through_erased_address() {
        type Sig = fn(i64, i64) -> i64;

        let scale = Scale(3);
        let method: <Sig as Signature>::Method<Scale> = Scale::apply;
        let erased = <Sig as Signature>::method_addr::<Scale>(method);
        let object = NonNull::from(&scale).cast::<()>();
        let result = unsafe { <Sig as Signature>::call_method::<Scale>(object, erased, (4, 5)) };
        assert_eq!(result, 27);
    }

    #[test]
    fn test_call_method_mut_through_erased_address() {
        type Sig = fn(i64, i64) -> i64;

        let mut scale = Scale(1);
        let method: <Sig as Signature>::MethodMut<Scale> = Scale::grow;
        let erased = <Sig as Signature>::method_mut_addr::<Scale>(method);
        let object = NonNull::from(&mut scale).cast::<()>();
        let result =
            unsafe { <Sig as Signature>::call_method_mut::<Scale>(object, erased, (2, 3)) };
        assert_eq!(result, 7);
        assert_eq!(scale.0, 7);
    }

    #[test]
    fn test_static_borrowed_argument() {
        static FRAME: [u8; 4] = [0xde, 0xad, 0xbe, 0xef];

        fn checksum(buf: &'static [u8]) -> u8 {
            buf.iter().fold(0, |sum, b| sum.wrapping_add(*b))
        }

        let f: fn(&'static [u8]) -> u8 = checksum;
        assert_eq!(<fn(&'static [u8]) -> u8>::call_fn(f, (&FRAME[..],)), checksum(&FRAME));
    }

    #[test]
    fn test_zero_arity() {
        fn answer() -> u32 {
            42
        }
        let f: fn() -> u32 = answer;
        assert_eq!(<fn() -> u32>::call_fn(f, ()), 42);
    }
}
