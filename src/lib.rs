//! Cup Stack core crate.
//!
//! A shuffled stack of colored cups must be placed into slots to match a
//! hidden correct order before the countdown runs out. Levels escalate with
//! more cups, duplicated colors, decoy cups that belong to no slot, and
//! killer cups that end the attempt the moment they touch a slot.
//!
//! The game logic (level table, puzzle generation, scoring, session state
//! machine) is pure Rust and testable on the host; `dom` is the thin browser
//! collaborator wired up through `start_game()`.

use wasm_bindgen::prelude::*;

pub mod arrangement;
pub mod levels;
pub mod puzzle;
pub mod session;

mod dom;

// Optional small allocator for size (feature gated)
#[cfg(feature = "wee_alloc")]
#[global_allocator]
static ALLOC: wee_alloc::WeeAlloc = wee_alloc::WeeAlloc::INIT;

#[wasm_bindgen(start)]
pub fn wasm_start() {
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();
}

// -----------------------------------------------------------------------------
// Shared color palette
// Cups are labelled with hex colors taken in order from this list; string
// equality is the only operation the game needs. The list intentionally
// repeats "#FF5733" (decoy selection filters by value, so the repeat can
// never yield a second decoy of an in-play color).
// -----------------------------------------------------------------------------

pub const CUP_COLORS: &[&str] = &[
    "#FF5733", "#33FF57", "#3357FF", "#FF33A6", "#FFFF33", "#33FFF5",
    "#A633FF", "#FF8C33", "#FF3333", "#8CFF33", "#33FFA2", "#3339FF",
    "#FFC733", "#33D1FF", "#FF33D6", "#FF5733", "#B833FF", "#33FF8F",
    "#FF33F6", "#FF9633",
];

/// Reserved color for killer cups; never appears in [`CUP_COLORS`].
pub const KILLER_COLOR: &str = "#111111";

// -----------------------------------------------------------------------------
// Unified entrypoint
// -----------------------------------------------------------------------------

#[wasm_bindgen]
pub fn start_game() -> Result<(), JsValue> {
    dom::start()
}
