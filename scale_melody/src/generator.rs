// Random melody generation under an exact duration budget.
//
// Rejection-sampling bin fill: each round draws a pitch uniformly from the
// scale's degree list and, independently, a duration uniformly from the five
// allowed values. The pair is kept only if the duration still fits in the
// remaining budget; otherwise both draws are discarded and the loop goes
// again. Generation stops when the budget is exactly used up.
//
// Termination: budget and durations are whole numbers of sixteenth-bar
// units, so `remaining` is always a whole number of sixteenths and, while it
// is positive, at least a sixteenth note fits. No residual slack is possible.
//
// The degree list is passed through as-is. A scale's eight entries repeat the
// root at the octave, which makes the root twice as likely as other degrees.

use crate::duration::{Duration, SIXTEENTHS_PER_BAR};
use crate::error::{MelodyError, Result};
use crate::melody::{Melody, MelodyEvent};
use crate::pitch::PitchClass;
use rand::Rng;

/// Phrase length used when nothing else is configured.
pub const DEFAULT_BUDGET_BARS: u32 = 4;

/// Convert a bar count into the generator's budget unit.
pub fn bars_to_sixteenths(bars: u32) -> Result<u32> {
    bars.checked_mul(SIXTEENTHS_PER_BAR)
        .ok_or_else(|| MelodyError::InvalidArgument(format!("{bars} bars is too long")))
}

/// Fill `budget_sixteenths` with events drawn from `degrees`.
///
/// `degrees` must be non-empty and the budget positive; both are rejected
/// with `InvalidArgument` before any randomness is consumed.
pub fn generate_melody(
    degrees: &[PitchClass],
    budget_sixteenths: u32,
    rng: &mut impl Rng,
) -> Result<Melody> {
    if degrees.is_empty() {
        return Err(MelodyError::InvalidArgument(
            "cannot generate a melody from an empty scale".into(),
        ));
    }
    if budget_sixteenths == 0 {
        return Err(MelodyError::InvalidArgument(
            "melody budget must be positive".into(),
        ));
    }

    let mut events = Vec::new();
    let mut remaining = budget_sixteenths;

    while remaining > 0 {
        let pitch = degrees[rng.random_range(0..degrees.len())];
        let duration = Duration::ALL[rng.random_range(0..Duration::ALL.len())];
        if duration.sixteenths() <= remaining {
            events.push(MelodyEvent::new(pitch, duration));
            remaining -= duration.sixteenths();
        }
    }

    let melody = Melody::from_events(events);
    melody.validate(budget_sixteenths)?;
    Ok(melody)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scale::{Mode, Scale};
    use proptest::prelude::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn test_fills_default_budget_exactly() {
        let scale = Scale::build(0, Mode::Major).unwrap();
        let mut rng = StdRng::seed_from_u64(42);
        let budget = bars_to_sixteenths(DEFAULT_BUDGET_BARS).unwrap();
        let melody = generate_melody(scale.degrees(), budget, &mut rng).unwrap();

        assert_eq!(melody.total_sixteenths(), 64);
        for event in melody.events() {
            assert!(scale.contains(event.pitch), "{} not in C major", event.pitch);
            assert!(Duration::ALL.contains(&event.duration));
        }
    }

    #[test]
    fn test_same_seed_same_melody() {
        let scale = Scale::build(5, Mode::Minor).unwrap();
        let budget = bars_to_sixteenths(4).unwrap();
        let a = generate_melody(scale.degrees(), budget, &mut StdRng::seed_from_u64(9)).unwrap();
        let b = generate_melody(scale.degrees(), budget, &mut StdRng::seed_from_u64(9)).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_bars_to_sixteenths_overflow() {
        assert_eq!(bars_to_sixteenths(4).unwrap(), 64);
        assert_eq!(bars_to_sixteenths(u32::MAX / 16).unwrap(), u32::MAX / 16 * 16);
        assert!(matches!(
            bars_to_sixteenths(u32::MAX / 16 + 1),
            Err(MelodyError::InvalidArgument(_))
        ));
        assert!(matches!(bars_to_sixteenths(u32::MAX), Err(MelodyError::InvalidArgument(_))));
    }

    #[test]
    fn test_single_sixteenth_budget() {
        let degrees = [PitchClass::C];
        let mut rng = StdRng::seed_from_u64(3);
        let melody = generate_melody(&degrees, 1, &mut rng).unwrap();
        assert_eq!(melody.events(), &[MelodyEvent::new(PitchClass::C, Duration::Sixteenth)]);
    }

    #[test]
    fn test_rejects_empty_scale_and_zero_budget() {
        let mut rng = StdRng::seed_from_u64(0);
        assert!(matches!(
            generate_melody(&[], 64, &mut rng),
            Err(MelodyError::InvalidArgument(_))
        ));
        assert!(matches!(
            generate_melody(&[PitchClass::C], 0, &mut rng),
            Err(MelodyError::InvalidArgument(_))
        ));
    }

    #[test]
    fn test_root_drawn_about_twice_as_often() {
        // C major: C appears twice in the eight degrees, so over many notes
        // its share should sit near 2/8 while each other degree sits near 1/8.
        let scale = Scale::build(0, Mode::Major).unwrap();
        let mut rng = StdRng::seed_from_u64(2024);
        let mut counts = [0usize; 12];
        let mut total = 0usize;
        for _ in 0..400 {
            let melody = generate_melody(scale.degrees(), 64, &mut rng).unwrap();
            for event in melody.events() {
                counts[event.pitch.value() as usize] += 1;
                total += 1;
            }
        }
        let root_share = counts[0] as f64 / total as f64;
        let third_share = counts[4] as f64 / total as f64;
        assert!((0.21..0.29).contains(&root_share), "root share {root_share:.3}");
        assert!((0.09..0.16).contains(&third_share), "third share {third_share:.3}");
    }

    proptest! {
        #[test]
        fn prop_every_melody_fills_budget(
            seed in any::<u64>(),
            root in 0u8..12,
            minor in any::<bool>(),
            bars in 1u32..9,
        ) {
            let mode = if minor { Mode::Minor } else { Mode::Major };
            let scale = Scale::build(root, mode).unwrap();
            let budget = bars_to_sixteenths(bars).unwrap();
            let mut rng = StdRng::seed_from_u64(seed);
            let melody = generate_melody(scale.degrees(), budget, &mut rng).unwrap();

            prop_assert_eq!(melody.total_sixteenths(), budget);
            prop_assert!(!melody.is_empty());
            let allowed = scale.pitch_classes();
            for event in melody.events() {
                prop_assert!(allowed.contains(&event.pitch));
                prop_assert!(Duration::ALL.contains(&event.duration));
            }
        }
    }
}
