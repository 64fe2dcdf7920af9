//! Combination enumeration
//!
//! Combinations are dialed on a grid of zones: every digit is
//! `first_zone + k * zone_offset`. The enumerator walks that grid like a
//! three-digit odometer, skipping triples where a digit repeats its
//! neighbour (the lock cannot open on those).

use crate::config::DialGeometry;

/// A three-number lock combination, in dial positions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Combination {
    pub first: u8,
    pub second: u8,
    pub third: u8,
}

impl Combination {
    /// Create a combination
    pub const fn new(first: u8, second: u8, third: u8) -> Self {
        Self {
            first,
            second,
            third,
        }
    }

    /// Starting triple: every digit on the first zone
    pub const fn seed(first_zone: u8) -> Self {
        Self::new(first_zone, first_zone, first_zone)
    }

    /// Last legal triple of the enumeration
    pub fn last_legal(dial: &DialGeometry, first_zone: u8) -> Self {
        let top = dial.grid_point(first_zone, dial.zones - 1);
        let below = dial.grid_point(first_zone, dial.zones - 2);
        Self::new(top, below, top)
    }

    /// Check that adjacent digits differ
    pub fn is_legal(&self) -> bool {
        self.first != self.second && self.second != self.third
    }
}

/// Result of advancing the enumeration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Advance {
    /// A new legal combination was set
    Advanced,
    /// Every legal combination has been produced
    Exhausted,
}

/// Advance `slot` to the next legal combination
///
/// `None` is the unassigned state before the first attempt. Once the grid is
/// exhausted the slot is frozen on [`Combination::last_legal`] and every
/// further call reports [`Advance::Exhausted`] again.
pub fn advance(slot: &mut Option<Combination>, dial: &DialGeometry, first_zone: u8) -> Advance {
    let positions = dial.positions as u16;
    let step = dial.zone_offset as u16;
    let mut combo = slot.unwrap_or(Combination::seed(first_zone));

    loop {
        let mut third = combo.third as u16 + step;
        if third >= positions {
            third = first_zone as u16;
            let mut second = combo.second as u16 + step;
            if second >= positions {
                second = first_zone as u16;
                let first = combo.first as u16 + step;
                if first >= positions {
                    *slot = Some(Combination::last_legal(dial, first_zone));
                    return Advance::Exhausted;
                }
                combo.first = first as u8;
            }
            combo.second = second as u8;
        }
        combo.third = third as u8;

        if combo.is_legal() {
            *slot = Some(combo);
            return Advance::Advanced;
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use proptest::prelude::*;

    use super::*;

    fn run_to_exhaustion(first_zone: u8) -> Vec<Combination> {
        let dial = DialGeometry::default();
        let mut slot = None;
        let mut out = Vec::new();
        while advance(&mut slot, &dial, first_zone) == Advance::Advanced {
            out.push(slot.unwrap());
        }
        out
    }

    #[test]
    fn test_first_advance_skips_seed() {
        let dial = DialGeometry::default();
        let mut slot = None;

        assert_eq!(advance(&mut slot, &dial, 2), Advance::Advanced);
        // (2,2,x) is never legal, so the first carry into second wins
        assert_eq!(slot, Some(Combination::new(2, 8, 2)));
    }

    #[test]
    fn test_third_skips_second() {
        let dial = DialGeometry::default();
        let mut slot = Some(Combination::new(2, 8, 2));

        assert_eq!(advance(&mut slot, &dial, 2), Advance::Advanced);
        // (2,8,8) repeats the second digit
        assert_eq!(slot, Some(Combination::new(2, 8, 14)));
    }

    #[test]
    fn test_carry_skips_repeated_first() {
        let dial = DialGeometry::default();
        let mut slot = Some(Combination::new(8, 2, 56));

        assert_eq!(advance(&mut slot, &dial, 2), Advance::Advanced);
        // Every (8,8,x) is illegal, so the carry runs on into second
        assert_eq!(slot, Some(Combination::new(8, 14, 2)));
    }

    #[test]
    fn test_exhaustion_count_and_order() {
        let combos = run_to_exhaustion(2);
        assert_eq!(combos.len(), 810);

        let unique: HashSet<_> = combos.iter().copied().collect();
        assert_eq!(unique.len(), 810);

        // Strictly increasing in odometer order
        for pair in combos.windows(2) {
            let a = (pair[0].first, pair[0].second, pair[0].third);
            let b = (pair[1].first, pair[1].second, pair[1].third);
            assert!(a < b);
        }
    }

    #[test]
    fn test_exhausted_is_frozen() {
        let dial = DialGeometry::default();
        let mut slot = None;
        while advance(&mut slot, &dial, 2) == Advance::Advanced {}

        let frozen = Combination::new(56, 50, 56);
        assert_eq!(slot, Some(frozen));

        for _ in 0..3 {
            assert_eq!(advance(&mut slot, &dial, 2), Advance::Exhausted);
            assert_eq!(slot, Some(frozen));
        }
    }

    proptest! {
        #[test]
        fn prop_every_combination_is_legal_and_on_grid(first_zone in 0u8..6) {
            let dial = DialGeometry::default();
            let combos = run_to_exhaustion(first_zone);
            prop_assert_eq!(combos.len() as u32, dial.legal_combinations());

            for c in combos {
                prop_assert!(c.is_legal());
                for digit in [c.first, c.second, c.third] {
                    prop_assert!(digit < dial.positions);
                    prop_assert_eq!((digit - first_zone) % dial.zone_offset, 0);
                }
            }
        }

        #[test]
        fn prop_last_produced_matches_frozen(first_zone in 0u8..6) {
            let dial = DialGeometry::default();
            let combos = run_to_exhaustion(first_zone);
            prop_assert_eq!(
                combos.last().copied(),
                Some(Combination::last_legal(&dial, first_zone))
            );
        }
    }
}
