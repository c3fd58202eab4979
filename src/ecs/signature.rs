use std::any::TypeId;
use std::collections::HashMap;

/// Maximum number of distinct component types that can participate in
/// signature matching. Bumping this requires widening [`Signature`]'s
/// backing storage.
pub const MAX_COMPONENT_TYPES: usize = 128;

/// Fixed-width bitset describing which components an entity carries, or
/// which components a system requires. Backed by two `u64` words so the
/// "is R a subset of this signature" test is a single AND + compare, with
/// no per-insert hashing.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct Signature {
    lo: u64,
    hi: u64,
}

impl Signature {
    pub const EMPTY: Signature = Signature { lo: 0, hi: 0 };

    pub fn set(&mut self, bit: usize) {
        debug_assert!(bit < MAX_COMPONENT_TYPES, "component bit {bit} exceeds signature width");
        if bit < 64 {
            self.lo |= 1u64 << bit;
        } else {
            self.hi |= 1u64 << (bit - 64);
        }
    }

    pub fn clear(&mut self, bit: usize) {
        if bit < 64 {
            self.lo &= !(1u64 << bit);
        } else {
            self.hi &= !(1u64 << (bit - 64));
        }
    }

    pub fn has(&self, bit: usize) -> bool {
        if bit < 64 {
            self.lo & (1u64 << bit) != 0
        } else {
            self.hi & (1u64 << (bit - 64)) != 0
        }
    }

    /// Returns true iff `self` is a superset of `required` — i.e. `self`
    /// carries every bit set in `required`.
    pub fn is_superset_of(&self, required: &Signature) -> bool {
        (self.lo & required.lo) == required.lo && (self.hi & required.hi) == required.hi
    }

    pub fn is_empty(&self) -> bool {
        self.lo == 0 && self.hi == 0
    }
}

/// Assigns a stable bit position to every component type the first time it
/// is seen, so that signatures can be built without the caller knowing bit
/// numbers in advance.
#[derive(Default)]
pub struct ComponentRegistry {
    bits: HashMap<TypeId, usize>,
    next_bit: usize,
}

impl ComponentRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn bit_of<T: 'static>(&mut self) -> usize {
        let ty = TypeId::of::<T>();
        if let Some(&bit) = self.bits.get(&ty) {
            return bit;
        }
        let bit = self.next_bit;
        assert!(
            bit < MAX_COMPONENT_TYPES,
            "exceeded MAX_COMPONENT_TYPES ({MAX_COMPONENT_TYPES}) distinct component types"
        );
        self.bits.insert(ty, bit);
        self.next_bit += 1;
        bit
    }

    pub fn signature_of<T: 'static>(&mut self) -> Signature {
        let mut sig = Signature::EMPTY;
        sig.set(self.bit_of::<T>());
        sig
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn superset_matches_exact_and_extra_bits() {
        let mut required = Signature::EMPTY;
        required.set(2);
        required.set(5);

        let mut exact = Signature::EMPTY;
        exact.set(2);
        exact.set(5);
        assert!(exact.is_superset_of(&required));

        let mut extra = exact;
        extra.set(9);
        assert!(extra.is_superset_of(&required));

        let mut missing = Signature::EMPTY;
        missing.set(2);
        assert!(!missing.is_superset_of(&required));
    }

    #[test]
    fn bits_above_64_use_high_word() {
        let mut sig = Signature::EMPTY;
        sig.set(70);
        assert!(sig.has(70));
        assert!(!sig.has(6));
    }

    #[test]
    fn registry_assigns_stable_bits() {
        struct A;
        struct B;
        let mut reg = ComponentRegistry::new();
        let a1 = reg.bit_of::<A>();
        let b = reg.bit_of::<B>();
        let a2 = reg.bit_of::<A>();
        assert_eq!(a1, a2);
        assert_ne!(a1, b);
    }
}
