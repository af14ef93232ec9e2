// Invariant sweep over the shipped level table and color palette.
// These tests are native-friendly and avoid wasm/browser APIs.

use cup_stack::levels::{LEVELS, LevelSpec, LevelTableError, validate_table};
use cup_stack::{CUP_COLORS, KILLER_COLOR};

#[test]
fn shipped_table_is_valid() {
    validate_table(&LEVELS).expect("shipped LEVELS must validate");
}

#[test]
fn shipped_table_entries_are_sane() {
    for (i, spec) in LEVELS.iter().enumerate() {
        assert!(spec.cup_count >= 1, "level {i}: no cups");
        assert!(spec.time_limit_seconds >= 1, "level {i}: no time");
        assert!(
            spec.duplicate_colors <= spec.cup_count,
            "level {i}: more duplicates than cups"
        );
        assert!(
            spec.cup_count - spec.duplicate_colors <= CUP_COLORS.len(),
            "level {i}: base color set exceeds the palette"
        );
    }
}

#[test]
fn progression_exercises_every_difficulty_knob() {
    assert!(LEVELS.iter().any(|s| s.duplicate_colors > 0));
    assert!(LEVELS.iter().any(|s| s.extra_cups > 0));
    assert!(LEVELS.iter().any(|s| s.has_killer_cup));
    // Killer cups belong to the late game only.
    let first_killer = LEVELS.iter().position(|s| s.has_killer_cup).unwrap();
    assert!(first_killer > LEVELS.len() / 2);
}

#[test]
fn palette_entries_are_hex_colors() {
    for color in CUP_COLORS {
        assert_eq!(color.len(), 7, "palette entry '{color}' is not #RRGGBB");
        assert!(color.starts_with('#'));
        assert!(color[1..].chars().all(|c| c.is_ascii_hexdigit()));
    }
}

#[test]
fn killer_color_is_reserved() {
    assert!(!CUP_COLORS.contains(&KILLER_COLOR));
}

#[test]
fn validation_rejects_bad_tables() {
    assert_eq!(validate_table(&[]), Err(LevelTableError::EmptyTable));
    assert_eq!(
        validate_table(&[LevelSpec::plain(0, 60)]),
        Err(LevelTableError::ZeroCupCount { level: 0 })
    );
    assert_eq!(
        validate_table(&[LevelSpec::plain(3, 0)]),
        Err(LevelTableError::ZeroTimeLimit { level: 0 })
    );
    assert_eq!(
        validate_table(&[LevelSpec::plain(2, 60), LevelSpec::with_duplicates(3, 60, 4)]),
        Err(LevelTableError::TooManyDuplicates { level: 1 })
    );
    assert_eq!(
        validate_table(&[LevelSpec::plain(CUP_COLORS.len() + 1, 60)]),
        Err(LevelTableError::PaletteExhausted { level: 0 })
    );
}

#[test]
fn table_errors_render_the_offending_level() {
    let err = validate_table(&[LevelSpec::plain(2, 60), LevelSpec::plain(0, 60)]).unwrap_err();
    assert!(err.to_string().contains("level 1"));
}
