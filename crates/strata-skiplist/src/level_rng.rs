use oorandom::Rand32;


/// A simple PRNG trait, used for drawing random target levels for nodes.
pub(crate) trait Prng32 {
    /// Produces a random `u32` in the range `[0, u32::MAX]`.
    ///
    /// (See [`oorandom::Rand32::rand_u32`]; this function is the same
    /// interface.)
    #[must_use]
    fn rand_u32(&mut self) -> u32;
}

impl Prng32 for Rand32 {
    #[inline]
    fn rand_u32(&mut self) -> u32 {
        // Inherent impls take priority over traits, so this is the inherent
        // method of `Rand32` a.k.a. `Self`
        Self::rand_u32(self)
    }
}

/// Return a random target level in `1..=max_level`, in a geometric
/// distribution: `P(level = h) = 2^-(h-1)`, truncated at `max_level`.
///
/// Every node occupies level 0, so the minimum is 1. The level is raised by
/// one fair coin flip at a time, stopping at the first failed flip or at the
/// configured cap. The cap is what keeps a structure's memory bounded; there
/// is no level growth after construction.
///
/// The `prng` is the structure-wide generator, seeded once. Repeated flips
/// take one bit of each draw.
pub(crate) fn random_target_level<P: Prng32>(prng: &mut P, max_level: usize) -> usize {
    let mut level = 1;
    while level < max_level && prng.rand_u32() % 2 == 1 {
        level += 1;
    }
    level
}


#[cfg(test)]
mod tests {
    use super::*;


    /// Replays a fixed flip sequence; odd values raise the level.
    struct ScriptedPrng(Vec<u32>);

    impl Prng32 for ScriptedPrng {
        fn rand_u32(&mut self) -> u32 {
            self.0.remove(0)
        }
    }

    #[test]
    fn stops_at_first_failed_flip() {
        let mut prng = ScriptedPrng(vec![1, 1, 0, 1]);
        assert_eq!(random_target_level(&mut prng, 12), 3);
        // The draw after the failed flip was never consumed.
        assert_eq!(prng.0, [1]);
    }

    #[test]
    fn minimum_is_one() {
        let mut prng = ScriptedPrng(vec![0]);
        assert_eq!(random_target_level(&mut prng, 12), 1);

        // A cap of one never consumes a flip at all.
        let mut prng = ScriptedPrng(Vec::new());
        assert_eq!(random_target_level(&mut prng, 1), 1);
    }

    #[test]
    fn capped_at_max_level() {
        let mut prng = ScriptedPrng(vec![1; 64]);
        assert_eq!(random_target_level(&mut prng, 4), 4);
        // Only `max_level - 1` successful flips are ever drawn.
        assert_eq!(prng.0.len(), 64 - 3);
    }

    #[test]
    fn real_prng_stays_in_bounds() {
        let mut prng = Rand32::new(0x_1234_5678);

        for _ in 0..4096 {
            let level = random_target_level(&mut prng, 12);
            assert!(1 <= level && level <= 12);
        }
    }
}
