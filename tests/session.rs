// State-machine scenarios: level progression, countdown and pause semantics,
// killer cups, stale ticks, and the non-destructive wrong-check policy.
// Native tests; the DOM layer is not involved.

use cup_stack::arrangement::score;
use cup_stack::levels::{LEVELS, LevelSpec};
use cup_stack::puzzle::{Cup, CupRole};
use cup_stack::session::{CheckOutcome, GameSession, Phase, PlaceError, PlaceOutcome, TickOutcome};

static TWO_LEVELS: [LevelSpec; 2] = [LevelSpec::plain(3, 5), LevelSpec::plain(2, 60)];
static KILLER_LEVEL: [LevelSpec; 1] = [LevelSpec::plain(2, 30).with_killer()];
static DECOY_LEVEL: [LevelSpec; 1] = [LevelSpec::with_extras(2, 60, 3)];
static DUPLICATE_LEVEL: [LevelSpec; 1] = [LevelSpec::with_duplicates(4, 60, 2)];

fn started(levels: &'static [LevelSpec]) -> GameSession {
    let mut session = GameSession::new(levels).expect("test table must validate");
    assert!(session.start());
    session
}

/// Places every cup of the hidden order into its matching slot.
fn place_correctly(session: &mut GameSession) {
    let order: Vec<Cup> = session.correct_order().to_vec();
    for (slot, cup) in order.iter().enumerate() {
        assert_eq!(session.place_cup(cup.id, slot), Ok(PlaceOutcome::Placed));
    }
}

#[test]
fn start_enters_the_first_level_with_a_fresh_countdown() {
    let session = started(&TWO_LEVELS);
    assert_eq!(session.phase(), Phase::InLevel);
    assert_eq!(session.level_index(), 0);
    assert_eq!(session.remaining_seconds(), 5);
    assert_eq!(session.stack().len(), 3);
    assert_eq!(session.arrangement().slot_count(), 3);
    assert!(!session.is_paused());
}

#[test]
fn shipped_table_builds_a_session() {
    let session = GameSession::new(&LEVELS).unwrap();
    assert_eq!(session.phase(), Phase::Idle);
    assert_eq!(session.level_count(), LEVELS.len());
}

#[test]
fn empty_board_scores_zero() {
    let session = started(&TWO_LEVELS);
    let s = score(session.arrangement(), session.correct_order());
    assert_eq!(s.correct_count, 0);
    assert!(!s.solved);
}

#[test]
fn scoring_is_a_pure_query() {
    let mut session = started(&TWO_LEVELS);
    place_correctly(&mut session);
    let first = score(session.arrangement(), session.correct_order());
    let second = score(session.arrangement(), session.correct_order());
    assert_eq!(first, second);
    assert!(first.solved);
    assert_eq!(session.phase(), Phase::InLevel, "score() must not transition");
}

#[test]
fn solving_advances_to_the_next_level() {
    let mut session = started(&TWO_LEVELS);
    place_correctly(&mut session);
    assert_eq!(
        session.check_arrangement(),
        Some(CheckOutcome::Solved { last_level: false })
    );
    assert_eq!(session.phase(), Phase::LevelWon);

    assert_eq!(session.acknowledge(), Phase::InLevel);
    assert_eq!(session.level_index(), 1);
    assert_eq!(session.remaining_seconds(), 60);
    assert_eq!(session.arrangement().slot_count(), 2);
}

#[test]
fn completing_the_last_level_wins_the_game() {
    let mut session = started(&TWO_LEVELS);
    place_correctly(&mut session);
    session.check_arrangement();
    session.acknowledge();

    place_correctly(&mut session);
    assert_eq!(
        session.check_arrangement(),
        Some(CheckOutcome::Solved { last_level: true })
    );
    assert_eq!(session.acknowledge(), Phase::GameOver { victory: true });

    // A finished game can be started again from level 0.
    assert!(session.start());
    assert_eq!(session.level_index(), 0);
    assert_eq!(session.phase(), Phase::InLevel);
}

#[test]
fn wrong_check_reports_the_count_and_keeps_the_board() {
    let mut session = started(&TWO_LEVELS);
    let order: Vec<Cup> = session.correct_order().to_vec();
    // Rotate every cup one slot over; a 3-cycle leaves none in place.
    for (slot, cup) in order.iter().enumerate() {
        session.place_cup(cup.id, (slot + 1) % order.len()).unwrap();
    }
    let outcome = session.check_arrangement().unwrap();
    let CheckOutcome::Incorrect { correct_count } = outcome else {
        panic!("rotated arrangement must not solve");
    };
    assert_eq!(correct_count, 0);
    assert_eq!(session.phase(), Phase::InLevel);
    // Board untouched: every slot still holds its cup.
    for slot in 0..order.len() {
        assert!(session.arrangement().cup_at(slot).is_some());
    }
}

#[test]
fn countdown_expires_exactly_at_the_limit() {
    let mut session = started(&TWO_LEVELS);
    let token = session.attempt();
    for expected in (1..5).rev() {
        assert_eq!(session.tick(token), TickOutcome::Running { remaining: expected });
    }
    assert_eq!(session.tick(token), TickOutcome::Expired);
    assert_eq!(session.phase(), Phase::LevelLost);
    // A 6th tick from the dead attempt is a no-op.
    assert_eq!(session.tick(token), TickOutcome::Stale);
}

#[test]
fn losing_retries_the_same_level() {
    let mut session = started(&TWO_LEVELS);
    let token = session.attempt();
    for _ in 0..5 {
        session.tick(token);
    }
    assert_eq!(session.phase(), Phase::LevelLost);
    assert_eq!(session.acknowledge(), Phase::InLevel);
    assert_eq!(session.level_index(), 0);
    assert_eq!(session.remaining_seconds(), 5);
    assert_ne!(session.attempt(), token, "retry must own a fresh timer");
}

#[test]
fn pause_freezes_the_countdown_and_rejects_placement() {
    let mut session = started(&TWO_LEVELS);
    let token = session.attempt();
    session.tick(token);
    let frozen = session.remaining_seconds();

    assert!(session.toggle_pause());
    assert_eq!(session.tick(token), TickOutcome::Suspended);
    assert_eq!(session.tick(token), TickOutcome::Suspended);
    assert_eq!(session.remaining_seconds(), frozen);

    let cup = session.stack()[0];
    assert_eq!(session.place_cup(cup.id, 0), Err(PlaceError::Paused));
    assert_eq!(session.check_arrangement(), None);

    // Resume: the value at pause time is exactly where ticking restarts.
    assert!(!session.toggle_pause());
    assert_eq!(session.remaining_seconds(), frozen);
    assert_eq!(session.tick(token), TickOutcome::Running { remaining: frozen - 1 });
}

#[test]
fn stale_tick_from_a_previous_level_cannot_touch_the_next() {
    let mut session = started(&TWO_LEVELS);
    let old_token = session.attempt();
    place_correctly(&mut session);
    session.check_arrangement();
    session.acknowledge();

    let remaining = session.remaining_seconds();
    assert_eq!(session.tick(old_token), TickOutcome::Stale);
    assert_eq!(session.remaining_seconds(), remaining);
}

#[test]
fn killer_cup_ends_the_attempt_at_placement_time() {
    let mut session = started(&KILLER_LEVEL);
    assert_eq!(session.stack().len(), 3);
    let killer = *session
        .stack()
        .iter()
        .find(|c| c.role == CupRole::Killer)
        .expect("killer level must stack a killer cup");

    assert_eq!(session.place_cup(killer.id, 1), Ok(PlaceOutcome::KillerTriggered));
    assert_eq!(session.phase(), Phase::KillerTriggered);
    // Terminal regardless of the rest of the board; no scoring happens.
    assert_eq!(session.check_arrangement(), None);

    assert_eq!(session.acknowledge(), Phase::InLevel);
    assert_eq!(session.level_index(), 0);
    assert_eq!(session.stack().len(), 3, "retry regenerates the full stack");
}

#[test]
fn decoy_in_a_scored_slot_never_counts() {
    let mut session = started(&DECOY_LEVEL);
    let decoy = *session
        .stack()
        .iter()
        .find(|c| c.role == CupRole::Decoy)
        .expect("decoy level must stack decoys");
    let order: Vec<Cup> = session.correct_order().to_vec();

    session.place_cup(decoy.id, 0).unwrap();
    session.place_cup(order[1].id, 1).unwrap();
    let outcome = session.check_arrangement().unwrap();
    assert_eq!(outcome, CheckOutcome::Incorrect { correct_count: 1 });
}

#[test]
fn duplicate_color_level_solves_by_id() {
    let mut session = started(&DUPLICATE_LEVEL);
    place_correctly(&mut session);
    let s = score(session.arrangement(), session.correct_order());
    assert_eq!(s.correct_count, 4);
    assert_eq!(
        session.check_arrangement(),
        Some(CheckOutcome::Solved { last_level: true })
    );
}

#[test]
fn placed_cups_can_return_to_the_stack() {
    let mut session = started(&TWO_LEVELS);
    let cup = session.stack()[0];
    session.place_cup(cup.id, 2).unwrap();
    assert_eq!(session.stack().len(), 2);

    assert!(session.return_cup(cup.id));
    assert_eq!(session.stack().len(), 3);
    assert!(session.arrangement().cup_at(2).is_none());
    assert!(!session.return_cup(cup.id), "already back in the stack");
}

#[test]
fn slot_to_slot_moves_swap_occupants() {
    let mut session = started(&TWO_LEVELS);
    let a = session.stack()[0];
    let b = session.stack()[1];
    session.place_cup(a.id, 0).unwrap();
    session.place_cup(b.id, 1).unwrap();

    assert_eq!(session.place_cup(a.id, 1), Ok(PlaceOutcome::Swapped));
    assert_eq!(session.arrangement().cup_at(1).map(|c| c.id), Some(a.id));
    assert_eq!(session.arrangement().cup_at(0).map(|c| c.id), Some(b.id));

    // From the stack, an occupied slot is a rejected drop, not a swap.
    let c = session.stack()[0];
    assert_eq!(session.place_cup(c.id, 0), Err(PlaceError::SlotOccupied));
}

#[test]
fn placement_rejects_unknown_cups_and_bad_slots() {
    let mut session = started(&TWO_LEVELS);
    let cup = session.stack()[0];
    assert_eq!(session.place_cup(999, 0), Err(PlaceError::UnknownCup));
    assert_eq!(session.place_cup(cup.id, 7), Err(PlaceError::BadSlot));
}

#[test]
fn end_aborts_to_idle_from_anywhere_in_a_level() {
    let mut session = started(&TWO_LEVELS);
    let cup = session.stack()[0];
    session.place_cup(cup.id, 0).unwrap();
    session.toggle_pause();

    session.end();
    assert_eq!(session.phase(), Phase::Idle);
    assert_eq!(session.level_index(), 0);
    assert!(!session.is_paused());
    assert!(session.stack().is_empty());
    assert_eq!(session.place_cup(cup.id, 0), Err(PlaceError::NotInLevel));
}
