//! Slot arrangement and scoring.
//!
//! The arrangement is the player-visible mapping from slot index to cup.
//! Scoring compares it against the hidden correct order by id and is a pure
//! query; the session mutates the arrangement, never the scorer.

use crate::puzzle::Cup;

/// Slot index -> cup mapping for the scored slots of one level attempt.
#[derive(Clone, Debug, Default)]
pub struct Arrangement {
    slots: Vec<Option<Cup>>,
}

impl Arrangement {
    pub fn new(slot_count: usize) -> Self {
        Self {
            slots: vec![None; slot_count],
        }
    }

    pub fn slot_count(&self) -> usize {
        self.slots.len()
    }

    pub fn cup_at(&self, slot: usize) -> Option<&Cup> {
        self.slots.get(slot).and_then(|s| s.as_ref())
    }

    pub fn is_valid_slot(&self, slot: usize) -> bool {
        slot < self.slots.len()
    }

    /// Slot currently holding `cup_id`, if any.
    pub fn position_of(&self, cup_id: u32) -> Option<usize> {
        self.slots
            .iter()
            .position(|s| s.map(|c| c.id) == Some(cup_id))
    }

    /// Puts `cup` into an empty slot. Returns `false` (cup untouched) if the
    /// slot is occupied or out of range.
    pub fn place(&mut self, slot: usize, cup: Cup) -> bool {
        match self.slots.get_mut(slot) {
            Some(s @ None) => {
                *s = Some(cup);
                true
            }
            _ => false,
        }
    }

    pub fn take(&mut self, slot: usize) -> Option<Cup> {
        self.slots.get_mut(slot).and_then(|s| s.take())
    }

    /// Exchanges the contents of two slots (either may be empty).
    pub fn swap(&mut self, a: usize, b: usize) {
        if a != b && a < self.slots.len() && b < self.slots.len() {
            self.slots.swap(a, b);
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (usize, Option<&Cup>)> {
        self.slots.iter().enumerate().map(|(i, s)| (i, s.as_ref()))
    }
}

/// Result of comparing an arrangement against the correct order.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Score {
    pub correct_count: usize,
    pub solved: bool,
}

/// Counts slots whose cup id matches `correct_order` at the same index.
///
/// Empty slots count as non-matching, never as an error; decoy cups can only
/// ever mismatch because they appear in no correct order.
pub fn score(arrangement: &Arrangement, correct_order: &[Cup]) -> Score {
    let correct_count = correct_order
        .iter()
        .enumerate()
        .filter(|(i, want)| arrangement.cup_at(*i).map(|c| c.id) == Some(want.id))
        .count();
    Score {
        correct_count,
        solved: correct_count == correct_order.len(),
    }
}
