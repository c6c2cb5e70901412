//! Types Module Tests
//!
//! Tests for domain types (Waveform, LevelUnit, DigitPlace, etc.)
//! Run with: cargo test --test types_tests

use dds_funcgen::types::{
    ButtonEvent, DigitPlace, EditPolicy, LeadingZeros, LevelUnit, Rotation, StepSize, Waveform,
};

// =============================================================================
// Waveform Tests
// =============================================================================

#[test]
fn test_waveform_left_cycle() {
    let mut waveform = Waveform::Sine;
    let mut seen = Vec::new();
    for _ in 0..3 {
        waveform = waveform.rotate(Rotation::Left);
        seen.push(waveform);
    }
    assert_eq!(seen, [Waveform::Square, Waveform::Triangle, Waveform::Sine]);
}

#[test]
fn test_waveform_right_cycle() {
    let mut waveform = Waveform::Sine;
    let mut seen = Vec::new();
    for _ in 0..3 {
        waveform = waveform.rotate(Rotation::Right);
        seen.push(waveform);
    }
    assert_eq!(seen, [Waveform::Triangle, Waveform::Square, Waveform::Sine]);
}

#[test]
fn test_waveform_cycle_has_period_three() {
    // Any mix of detents stays within the three shapes and returns home
    // after three steps in one direction.
    let pattern = [
        Rotation::Left,
        Rotation::Right,
        Rotation::Right,
        Rotation::Left,
        Rotation::Left,
        Rotation::Right,
        Rotation::Left,
    ];
    for start in [Waveform::Sine, Waveform::Square, Waveform::Triangle] {
        let mut waveform = start;
        for rotation in pattern {
            waveform = waveform.rotate(rotation);
            assert!(Waveform::from_code(waveform.code()).is_some());
        }
        for rotation in [Rotation::Left, Rotation::Right] {
            let cycled = (0..3).fold(start, |w, _| w.rotate(rotation));
            assert_eq!(cycled, start);
        }
    }
}

#[test]
fn test_waveform_left_and_right_are_inverse() {
    for waveform in [Waveform::Sine, Waveform::Square, Waveform::Triangle] {
        assert_eq!(waveform.next_left().next_right(), waveform);
        assert_eq!(waveform.next_right().next_left(), waveform);
    }
}

#[test]
fn test_waveform_frequency_limits() {
    assert_eq!(Waveform::Sine.max_frequency_hz(), 500_000);
    assert_eq!(Waveform::Triangle.max_frequency_hz(), 500_000);
    assert_eq!(Waveform::Square.max_frequency_hz(), 5_000_000);
}

#[test]
fn test_only_square_is_ttl() {
    assert!(Waveform::Square.is_ttl());
    assert!(!Waveform::Sine.is_ttl());
    assert!(!Waveform::Triangle.is_ttl());
}

#[test]
fn test_waveform_codes() {
    for waveform in [Waveform::Sine, Waveform::Square, Waveform::Triangle] {
        assert_eq!(Waveform::from_code(waveform.code()), Some(waveform));
    }
    assert_eq!(Waveform::from_code(0), None);
    assert_eq!(Waveform::from_code(4), None);
    assert_eq!(Waveform::from_code(0xFF), None);
}

// =============================================================================
// LevelUnit Tests
// =============================================================================

#[test]
fn test_level_unit_toggle() {
    assert_eq!(LevelUnit::Rms.toggle(), LevelUnit::PeakToPeak);
    assert_eq!(LevelUnit::PeakToPeak.toggle(), LevelUnit::Rms);
}

#[test]
fn test_level_unit_suffix() {
    assert_eq!(LevelUnit::Rms.suffix(), "Vrm");
    assert_eq!(LevelUnit::PeakToPeak.suffix(), "Vpp");
}

#[test]
fn test_level_unit_codes() {
    assert_eq!(LevelUnit::from_code(0), Some(LevelUnit::Rms));
    assert_eq!(LevelUnit::from_code(1), Some(LevelUnit::PeakToPeak));
    assert_eq!(LevelUnit::from_code(2), None);
}

// =============================================================================
// EditPolicy / ButtonEvent Tests
// =============================================================================

#[test]
fn test_policy_from_power_up_button() {
    assert_eq!(EditPolicy::at_power_up(true), EditPolicy::Confirm);
    assert_eq!(EditPolicy::at_power_up(false), EditPolicy::Immediate);
    assert!(EditPolicy::Confirm.needs_confirmation());
    assert!(!EditPolicy::Immediate.needs_confirmation());
}

#[test]
fn test_button_event_is_press() {
    assert!(!ButtonEvent::Idle.is_press());
    assert!(ButtonEvent::ShortPress.is_press());
    assert!(ButtonEvent::LongPress.is_press());
}

// =============================================================================
// StepSize Tests
// =============================================================================

#[test]
fn test_step_size() {
    assert_eq!(StepSize::Large.centivolts(), 10);
    assert_eq!(StepSize::Small.centivolts(), 1);
    assert_eq!(StepSize::Large.toggle(), StepSize::Small);
    assert_eq!(StepSize::Large.cursor_column(), 11);
    assert_eq!(StepSize::Small.cursor_column(), 12);
}

// =============================================================================
// DigitPlace Tests
// =============================================================================

#[test]
fn test_digit_place_values_and_columns() {
    let places = [
        (DigitPlace::Hz1, 1, 12),
        (DigitPlace::Hz10, 10, 11),
        (DigitPlace::Hz100, 100, 10),
        (DigitPlace::KHz1, 1_000, 8),
        (DigitPlace::KHz10, 10_000, 7),
        (DigitPlace::KHz100, 100_000, 6),
    ];
    for (place, hz, column) in places {
        assert_eq!(place.as_hz(), hz);
        assert_eq!(place.cursor_column(), column);
    }
}

#[test]
fn test_digit_place_clamps_without_wrapping() {
    assert_eq!(DigitPlace::KHz100.rotate(Rotation::Left), DigitPlace::KHz100);
    assert_eq!(DigitPlace::Hz1.rotate(Rotation::Right), DigitPlace::Hz1);

    let top = (0..10).fold(DigitPlace::Hz1, |d, _| d.rotate(Rotation::Left));
    assert_eq!(top, DigitPlace::KHz100);
    let bottom = (0..10).fold(DigitPlace::KHz100, |d, _| d.rotate(Rotation::Right));
    assert_eq!(bottom, DigitPlace::Hz1);
}

#[test]
fn test_digit_place_initial() {
    assert_eq!(DigitPlace::initial_for(1_000), DigitPlace::KHz1);
    assert_eq!(DigitPlace::initial_for(999_999), DigitPlace::KHz1);
    assert_eq!(DigitPlace::initial_for(1_000_000), DigitPlace::KHz100);
    assert_eq!(DigitPlace::initial_for(5_000_000), DigitPlace::KHz100);
}

#[test]
fn test_digit_place_leading_zeros() {
    assert_eq!(DigitPlace::KHz100.leading_zeros(), LeadingZeros::HundredKilo);
    assert_eq!(DigitPlace::KHz10.leading_zeros(), LeadingZeros::TenKilo);
    assert_eq!(DigitPlace::KHz1.leading_zeros(), LeadingZeros::Suppress);
    assert_eq!(DigitPlace::Hz1.leading_zeros(), LeadingZeros::Suppress);
}
