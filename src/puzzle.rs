//! Cup model and puzzle generation.
//!
//! One puzzle instance is built per level attempt: the visible stack order
//! and the hidden correct order are shuffled independently, so the stack
//! leaks nothing about where a cup belongs.

use rand::Rng;
use rand::seq::SliceRandom;

use crate::levels::LevelSpec;
use crate::{CUP_COLORS, KILLER_COLOR};

/// Opaque color label; equality is the only operation the game needs.
pub type Color = &'static str;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum CupRole {
    /// Part of the hidden correct order.
    Normal,
    /// Stack padding; belongs to no slot.
    Decoy,
    /// Ends the attempt the moment it enters a slot.
    Killer,
}

/// A single placeable piece. Ids are unique within one puzzle instance and
/// assigned at generation time; matching is always by id, never by color
/// (duplicate-color levels make color equality ambiguous).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Cup {
    pub id: u32,
    pub color: Color,
    pub role: CupRole,
}

impl Cup {
    pub fn is_killer(&self) -> bool {
        self.role == CupRole::Killer
    }
}

/// One generated level attempt: the shuffled visible stack plus the hidden
/// target permutation of the Normal cups.
#[derive(Clone, Debug)]
pub struct PuzzleInstance {
    /// Display order of the staging stack; length = cup_count + decoys
    /// (+1 when the level carries a killer cup).
    pub cups: Vec<Cup>,
    /// Target sequence for slots 0..cup_count; never shown to the player.
    pub correct_order: Vec<Cup>,
}

/// Builds the cup set for one attempt at `spec`.
///
/// Cannot fail for a table-validated spec. Degenerate knob combinations
/// degrade instead of erroring: `duplicate_colors >= cup_count` still leaves
/// a one-color base set, and a decoy request larger than the unused palette
/// yields fewer decoys.
pub fn generate(spec: &LevelSpec, rng: &mut impl Rng) -> PuzzleInstance {
    debug_assert!(spec.cup_count >= 1, "spec must come from a validated table");
    debug_assert!(spec.time_limit_seconds >= 1, "spec must come from a validated table");

    // Base color set, then duplicates sampled with replacement from it.
    let base_len = spec.cup_count.saturating_sub(spec.duplicate_colors).max(1);
    debug_assert!(base_len <= CUP_COLORS.len(), "spec must come from a validated table");
    let mut selected: Vec<Color> = CUP_COLORS[..base_len].to_vec();
    for _ in 0..spec.duplicate_colors {
        selected.push(selected[rng.gen_range(0..selected.len())]);
    }

    let mut cups: Vec<Cup> = (0..spec.cup_count)
        .map(|i| Cup {
            id: i as u32,
            color: selected[i % selected.len()],
            role: CupRole::Normal,
        })
        .collect();

    // Decoys take unused palette colors in order; stop early if the palette
    // runs dry (fewer decoys than requested is fine).
    let mut next_id = spec.cup_count as u32;
    if spec.extra_cups > 0 {
        let mut taken: Vec<Color> = Vec::with_capacity(spec.extra_cups);
        for &color in CUP_COLORS {
            if taken.len() == spec.extra_cups {
                break;
            }
            if selected.contains(&color) || taken.contains(&color) {
                continue;
            }
            taken.push(color);
            cups.push(Cup {
                id: next_id,
                color,
                role: CupRole::Decoy,
            });
            next_id += 1;
        }
    }

    if spec.has_killer_cup {
        cups.push(Cup {
            id: next_id,
            color: KILLER_COLOR,
            role: CupRole::Killer,
        });
    }

    // Two independent uniform shuffles: stack order must carry no information
    // about slot order.
    let mut correct_order: Vec<Cup> = cups
        .iter()
        .copied()
        .filter(|c| c.role == CupRole::Normal)
        .collect();
    cups.shuffle(rng);
    correct_order.shuffle(rng);

    PuzzleInstance { cups, correct_order }
}
