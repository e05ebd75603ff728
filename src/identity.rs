//! Signature-independent view of a callback.
//!
//! [`CallbackIdentity`] lets callbacks of different signatures sit side by side as
//! `&dyn CallbackIdentity` and still be asked whether they are bound and, with the
//! `identity` feature, whether two of them lead to the same function or method.

#[cfg(feature = "identity")]
use core::any::TypeId;

use crate::callback::{Callback, Signature};

mod private {
    pub trait Sealed {}
}

impl<S: Signature> private::Sealed for Callback<'_, S> {}

/// Where a bound callback goes, stripped of its signature.
#[cfg(feature = "identity")]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Destination {
    Function {
        function: *const (),
    },
    Method {
        object: *const (),
        method: *const (),
    },
}

/// Discriminant telling signatures apart. Checked before any destination is compared.
#[cfg(feature = "identity")]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct SignatureTag(TypeId);

#[cfg(feature = "identity")]
impl SignatureTag {
    pub fn of<S: Signature>() -> Self {
        Self(TypeId::of::<S>())
    }
}

/// Object-safe capability shared by every [`Callback`], whatever its signature.
pub trait CallbackIdentity: private::Sealed {
    fn is_bound(&self) -> bool;

    #[cfg(feature = "identity")]
    fn signature_tag(&self) -> SignatureTag;

    #[cfg(feature = "identity")]
    fn destination(&self) -> Option<Destination>;

    /// True when `other` has exactly this signature and leads to the same place.
    /// Two unbound callbacks of one signature match; different signatures never do.
    #[cfg(feature = "identity")]
    fn points_to_same(&self, other: &dyn CallbackIdentity) -> bool {
        self.signature_tag() == other.signature_tag() && self.destination() == other.destination()
    }
}

impl<S: Signature> CallbackIdentity for Callback<'_, S> {
    fn is_bound(&self) -> bool {
        Callback::is_bound(self)
    }

    #[cfg(feature = "identity")]
    fn signature_tag(&self) -> SignatureTag {
        SignatureTag::of::<S>()
    }

    #[cfg(feature = "identity")]
    fn destination(&self) -> Option<Destination> {
        Callback::destination(self)
    }
}

#[cfg(feature = "identity")]
impl PartialEq for dyn CallbackIdentity + '_ {
    fn eq(&self, other: &Self) -> bool {
        self.points_to_same(other)
    }
}

/// Index of the first entry in `haystack` that points to the same place as `needle`.
#[cfg(feature = "identity")]
pub fn position_of(
    haystack: &[&dyn CallbackIdentity],
    needle: &dyn CallbackIdentity,
) -> Option<usize> {
    haystack
        .iter()
        .position(|candidate| candidate.points_to_same(needle))
}
