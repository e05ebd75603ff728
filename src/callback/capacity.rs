//! Inline storage capacity, selected per target.
//!
//! A bound-method caller is three machine words (object, method, thunk), so the
//! capacity scales with the pointer width: 24 bytes on 64-bit hosts, 12 on 32-bit
//! microcontrollers and 6 on 16-bit parts.

#[cfg(target_pointer_width = "64")]
pub const INLINE_CAPACITY: usize = 24;

#[cfg(target_pointer_width = "32")]
pub const INLINE_CAPACITY: usize = 12;

#[cfg(target_pointer_width = "16")]
pub const INLINE_CAPACITY: usize = 6;

pub(crate) const fn fits<E>() -> bool {
    core::mem::size_of::<E>() <= INLINE_CAPACITY
}

pub(crate) const fn fills<E>() -> bool {
    core::mem::size_of::<E>() == INLINE_CAPACITY
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_capacity_is_three_words() {
        assert_eq!(INLINE_CAPACITY, 3 * core::mem::size_of::<usize>());
        assert!(fits::<usize>());
        assert!(fills::<[usize; 3]>());
        assert!(!fits::<[usize; 4]>());
        assert!(!fills::<[usize; 2]>());
    }
}
