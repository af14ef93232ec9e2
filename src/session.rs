//! Game session: level progression, countdown, pause, and outcomes.
//!
//! The session is the single owner of all mutable game state. Everything the
//! presentation layer does funnels through the operations here, and every
//! operation is synchronous and runs to completion, so there is no locking
//! anywhere. Game outcomes (time up, killer cup, wrong arrangement, level
//! complete) are values, not errors.

use rand::thread_rng;

use crate::arrangement::{self, Arrangement, Score};
use crate::levels::{LevelSpec, LevelTableError, validate_table};
use crate::puzzle::{self, Cup};

/// Where the session is in its lifecycle. `LevelWon`, `LevelLost` and
/// `KillerTriggered` wait for [`GameSession::acknowledge`] before moving on.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Phase {
    Idle,
    InLevel,
    LevelWon,
    LevelLost,
    KillerTriggered,
    GameOver { victory: bool },
}

/// What one 1-second timer tick did.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TickOutcome {
    /// The tick came from an attempt that is no longer running; ignored.
    Stale,
    /// Paused: the countdown is frozen, nothing changed.
    Suspended,
    Running { remaining: u32 },
    /// The countdown hit zero; the phase is now `LevelLost`.
    Expired,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PlaceOutcome {
    Placed,
    /// The cup came from another slot and traded places with the occupant.
    Swapped,
    /// A killer cup entered a slot; the attempt is over.
    KillerTriggered,
}

/// Rejected placement interactions. These leave the board untouched.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PlaceError {
    NotInLevel,
    Paused,
    UnknownCup,
    BadSlot,
    SlotOccupied,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CheckOutcome {
    Solved { last_level: bool },
    /// Board kept as-is; the player continues editing.
    Incorrect { correct_count: usize },
}

/// One controller object owning level index, timer, pause flag, puzzle and
/// board; no ambient globals. The `attempt` counter invalidates timer ticks
/// scheduled for an attempt that has since ended, so a stale interval can
/// never touch a newer level's countdown.
pub struct GameSession {
    levels: &'static [LevelSpec],
    level_index: usize,
    phase: Phase,
    paused: bool,
    remaining_seconds: u32,
    attempt: u64,
    correct_order: Vec<Cup>,
    stack: Vec<Cup>,
    arrangement: Arrangement,
}

impl GameSession {
    /// Validates the level table up front; a bad table never reaches the
    /// generator.
    pub fn new(levels: &'static [LevelSpec]) -> Result<Self, LevelTableError> {
        validate_table(levels)?;
        Ok(Self {
            levels,
            level_index: 0,
            phase: Phase::Idle,
            paused: false,
            remaining_seconds: 0,
            attempt: 0,
            correct_order: Vec::new(),
            stack: Vec::new(),
            arrangement: Arrangement::default(),
        })
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn level_index(&self) -> usize {
        self.level_index
    }

    pub fn level_count(&self) -> usize {
        self.levels.len()
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    pub fn remaining_seconds(&self) -> u32 {
        self.remaining_seconds
    }

    /// Token identifying the current level attempt; ticks carry it back.
    pub fn attempt(&self) -> u64 {
        self.attempt
    }

    pub fn current_spec(&self) -> Option<&LevelSpec> {
        match self.phase {
            Phase::Idle | Phase::GameOver { .. } => None,
            _ => self.levels.get(self.level_index),
        }
    }

    /// Cups still in the staging stack, in display order.
    pub fn stack(&self) -> &[Cup] {
        &self.stack
    }

    pub fn arrangement(&self) -> &Arrangement {
        &self.arrangement
    }

    /// The hidden target order. The presentation layer must never render
    /// this; it exists for the scorer and for tests.
    pub fn correct_order(&self) -> &[Cup] {
        &self.correct_order
    }

    /// Begins a new game from the first level. Ignored unless the session is
    /// idle or a previous game finished.
    pub fn start(&mut self) -> bool {
        match self.phase {
            Phase::Idle | Phase::GameOver { .. } => {
                self.level_index = 0;
                self.begin_level();
                true
            }
            _ => false,
        }
    }

    fn begin_level(&mut self) {
        let spec = self.levels[self.level_index];
        let instance = puzzle::generate(&spec, &mut thread_rng());
        self.correct_order = instance.correct_order;
        self.stack = instance.cups;
        self.arrangement = Arrangement::new(spec.cup_count);
        self.remaining_seconds = spec.time_limit_seconds;
        self.paused = false;
        self.attempt += 1;
        self.phase = Phase::InLevel;
    }

    /// Ends the current attempt; any tick still carrying the old token
    /// becomes stale.
    fn leave_level(&mut self, phase: Phase) {
        self.attempt += 1;
        self.phase = phase;
    }

    /// Processes one 1-second tick for the attempt identified by `token`.
    /// Pause is checked at tick time; the underlying clock keeps firing and
    /// the countdown simply freezes.
    pub fn tick(&mut self, token: u64) -> TickOutcome {
        if token != self.attempt || self.phase != Phase::InLevel {
            return TickOutcome::Stale;
        }
        if self.paused {
            return TickOutcome::Suspended;
        }
        self.remaining_seconds = self.remaining_seconds.saturating_sub(1);
        if self.remaining_seconds == 0 {
            self.leave_level(Phase::LevelLost);
            TickOutcome::Expired
        } else {
            TickOutcome::Running {
                remaining: self.remaining_seconds,
            }
        }
    }

    /// Toggles the pause flag while in a level; returns the new flag.
    pub fn toggle_pause(&mut self) -> bool {
        if self.phase == Phase::InLevel {
            self.paused = !self.paused;
        }
        self.paused
    }

    /// Moves `cup_id` into `slot`, from the stack (empty slots only) or from
    /// another slot (occupied targets swap). A killer cup entering a slot
    /// ends the attempt immediately, before any scoring.
    pub fn place_cup(&mut self, cup_id: u32, slot: usize) -> Result<PlaceOutcome, PlaceError> {
        if self.phase != Phase::InLevel {
            return Err(PlaceError::NotInLevel);
        }
        if self.paused {
            return Err(PlaceError::Paused);
        }
        if !self.arrangement.is_valid_slot(slot) {
            return Err(PlaceError::BadSlot);
        }

        if let Some(from) = self.arrangement.position_of(cup_id) {
            if from == slot {
                return Ok(PlaceOutcome::Placed);
            }
            let swapped = self.arrangement.cup_at(slot).is_some();
            self.arrangement.swap(from, slot);
            return Ok(if swapped {
                PlaceOutcome::Swapped
            } else {
                PlaceOutcome::Placed
            });
        }

        let stack_pos = self
            .stack
            .iter()
            .position(|c| c.id == cup_id)
            .ok_or(PlaceError::UnknownCup)?;
        if self.arrangement.cup_at(slot).is_some() {
            return Err(PlaceError::SlotOccupied);
        }
        let cup = self.stack.remove(stack_pos);
        if cup.is_killer() {
            // The placement itself is the terminal event; the cup stays
            // wherever the presentation dropped it until acknowledge().
            self.arrangement.place(slot, cup);
            self.leave_level(Phase::KillerTriggered);
            return Ok(PlaceOutcome::KillerTriggered);
        }
        self.arrangement.place(slot, cup);
        Ok(PlaceOutcome::Placed)
    }

    /// Returns a placed cup to the staging stack.
    pub fn return_cup(&mut self, cup_id: u32) -> bool {
        if self.phase != Phase::InLevel || self.paused {
            return false;
        }
        match self.arrangement.position_of(cup_id) {
            Some(slot) => {
                if let Some(cup) = self.arrangement.take(slot) {
                    self.stack.push(cup);
                }
                true
            }
            None => false,
        }
    }

    /// Current score without any state change.
    pub fn score(&self) -> Score {
        arrangement::score(&self.arrangement, &self.correct_order)
    }

    /// Scores the board. A solve stops the timer and moves to `LevelWon`;
    /// a miss reports the match count and leaves the board editable.
    pub fn check_arrangement(&mut self) -> Option<CheckOutcome> {
        if self.phase != Phase::InLevel || self.paused {
            return None;
        }
        let score = self.score();
        if score.solved {
            self.leave_level(Phase::LevelWon);
            Some(CheckOutcome::Solved {
                last_level: self.level_index + 1 >= self.levels.len(),
            })
        } else {
            Some(CheckOutcome::Incorrect {
                correct_count: score.correct_count,
            })
        }
    }

    /// Resolves a finished level: a win advances (or ends the game in
    /// victory), a loss or killer retries the same level with a fresh puzzle.
    pub fn acknowledge(&mut self) -> Phase {
        match self.phase {
            Phase::LevelWon => {
                if self.level_index + 1 < self.levels.len() {
                    self.level_index += 1;
                    self.begin_level();
                } else {
                    self.phase = Phase::GameOver { victory: true };
                }
            }
            Phase::LevelLost | Phase::KillerTriggered => {
                self.begin_level();
            }
            Phase::Idle | Phase::InLevel | Phase::GameOver { .. } => {}
        }
        self.phase
    }

    /// Explicit abort back to the idle state; valid mid-level.
    pub fn end(&mut self) {
        self.level_index = 0;
        self.paused = false;
        self.remaining_seconds = 0;
        self.stack.clear();
        self.correct_order.clear();
        self.arrangement = Arrangement::default();
        self.leave_level(Phase::Idle);
    }
}
