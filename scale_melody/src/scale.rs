// Major and minor scales, and the catalog of the 24 named scales.
//
// A scale is built by walking the mode's seven step intervals up from the
// root and reducing each degree modulo 12. The result has eight entries: the
// seven degrees plus the octave, which wraps back to the root. The melody
// generator samples from all eight entries, so the root is drawn twice as
// often as any other degree.
//
// The catalog is a lazily-built static table keyed by canonical names like
// "C# minor". User input is canonicalized before lookup (trimmed, whitespace
// collapsed, first letter upper-case and the rest lower-case) and flat
// spellings resolve to their sharp enharmonic, so "db MAJOR" finds "C# major".

use crate::error::{MelodyError, Result};
use crate::pitch::PitchClass;
use rand::Rng;
use serde::Serialize;
use std::collections::BTreeSet;
use std::fmt;
use std::sync::LazyLock;

/// Number of entries in a built scale: seven degrees plus the octave.
pub const SCALE_LEN: usize = 8;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Mode {
    Major,
    Minor,
}

impl Mode {
    pub const ALL: [Mode; 2] = [Mode::Major, Mode::Minor];

    /// Semitone steps between consecutive degrees. Always sums to 12.
    pub fn steps(self) -> [u8; 7] {
        match self {
            Mode::Major => [2, 2, 1, 2, 2, 2, 1],
            Mode::Minor => [2, 1, 2, 2, 1, 2, 2],
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Mode::Major => "major",
            Mode::Minor => "minor",
        }
    }

    fn from_name(name: &str) -> Option<Self> {
        Mode::ALL.into_iter().find(|m| m.name() == name)
    }
}

/// The eight pitch classes of a scale, root first and octave last.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Scale {
    pub root: PitchClass,
    pub mode: Mode,
    degrees: [PitchClass; SCALE_LEN],
}

impl Scale {
    /// Build the scale for a root given as a raw pitch-class number.
    ///
    /// Roots outside 0..=11 are rejected with `InvalidArgument`.
    pub fn build(root: u8, mode: Mode) -> Result<Self> {
        Ok(Self::from_root(PitchClass::new(root)?, mode))
    }

    pub fn from_root(root: PitchClass, mode: Mode) -> Self {
        let mut degrees = [root; SCALE_LEN];
        let mut semitones = root.value() as u32;
        for (i, step) in mode.steps().iter().enumerate() {
            semitones += *step as u32;
            degrees[i + 1] = PitchClass::wrapping(semitones);
        }
        Scale {
            root,
            mode,
            degrees,
        }
    }

    /// All eight entries in order, including the repeated root at the octave.
    pub fn degrees(&self) -> &[PitchClass; SCALE_LEN] {
        &self.degrees
    }

    /// The distinct pitch classes of the scale.
    pub fn pitch_classes(&self) -> BTreeSet<PitchClass> {
        self.degrees.iter().copied().collect()
    }

    pub fn contains(&self, pc: PitchClass) -> bool {
        self.degrees.contains(&pc)
    }

    /// Canonical name, e.g. "F# minor".
    pub fn name(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for Scale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.root.name(), self.mode.name())
    }
}

/// 12 roots x 2 modes, built on first use and never mutated.
static CATALOG: LazyLock<Vec<Scale>> = LazyLock::new(|| {
    PitchClass::all()
        .flat_map(|root| Mode::ALL.map(|mode| Scale::from_root(root, mode)))
        .collect()
});

/// Every named scale in catalog order (C major, C minor, C# major, ...).
pub fn catalog() -> &'static [Scale] {
    &CATALOG
}

/// Apply the input canonicalization: trim, collapse internal whitespace,
/// upper-case the first character and lower-case the rest.
pub fn canonicalize(name: &str) -> String {
    let collapsed = name.split_whitespace().collect::<Vec<_>>().join(" ");
    let mut chars = collapsed.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect(),
        None => String::new(),
    }
}

/// Look up a scale by name ("C major", "eb minor", "Gb Major").
pub fn lookup(name: &str) -> Result<Scale> {
    let canonical = canonicalize(name);
    let invalid = || MelodyError::InvalidScaleName(name.trim().to_string());

    let (root_name, mode_name) = canonical.split_once(' ').ok_or_else(invalid)?;
    let root = PitchClass::from_name(root_name).ok_or_else(invalid)?;
    let mode = Mode::from_name(mode_name).ok_or_else(invalid)?;

    catalog()
        .iter()
        .find(|s| s.root == root && s.mode == mode)
        .copied()
        .ok_or_else(invalid)
}

/// Pick one of the 24 scales uniformly at random.
pub fn choose(rng: &mut impl Rng) -> Scale {
    let all = catalog();
    all[rng.random_range(0..all.len())]
}

/// An empty (or all-whitespace) name picks a random scale, anything else is
/// looked up.
pub fn resolve(name: &str, rng: &mut impl Rng) -> Result<Scale> {
    if name.trim().is_empty() {
        Ok(choose(rng))
    } else {
        lookup(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn pcs(values: &[u8]) -> Vec<PitchClass> {
        values.iter().map(|&v| PitchClass::new(v).unwrap()).collect()
    }

    #[test]
    fn test_c_major() {
        let scale = Scale::build(0, Mode::Major).unwrap();
        assert_eq!(scale.degrees().to_vec(), pcs(&[0, 2, 4, 5, 7, 9, 11, 0]));
        assert_eq!(
            scale.pitch_classes().into_iter().collect::<Vec<_>>(),
            pcs(&[0, 2, 4, 5, 7, 9, 11])
        );
    }

    #[test]
    fn test_a_minor_matches_c_major_set() {
        let a_minor = Scale::build(9, Mode::Minor).unwrap();
        let c_major = Scale::build(0, Mode::Major).unwrap();
        assert_eq!(a_minor.degrees().to_vec(), pcs(&[9, 11, 0, 2, 4, 5, 7, 9]));
        assert_eq!(a_minor.pitch_classes(), c_major.pitch_classes());
    }

    #[test]
    fn test_out_of_range_root() {
        assert!(matches!(
            Scale::build(12, Mode::Major),
            Err(MelodyError::InvalidArgument(_))
        ));
    }

    #[test]
    fn test_steps_sum_to_octave() {
        for mode in Mode::ALL {
            assert_eq!(mode.steps().iter().map(|&s| s as u32).sum::<u32>(), 12);
        }
    }

    proptest! {
        #[test]
        fn prop_scale_closes_on_octave(root in 0u8..12, minor in any::<bool>()) {
            let mode = if minor { Mode::Minor } else { Mode::Major };
            let scale = Scale::build(root, mode).unwrap();
            let degrees = scale.degrees();
            prop_assert_eq!(degrees.len(), SCALE_LEN);
            prop_assert_eq!(degrees[0], degrees[7]);
            prop_assert_eq!(degrees[0].value(), root);
            // Only the octave repeats.
            prop_assert_eq!(scale.pitch_classes().len(), 7);
        }
    }

    #[test]
    fn test_catalog_has_24_distinct_names() {
        let names: BTreeSet<String> = catalog().iter().map(Scale::name).collect();
        assert_eq!(catalog().len(), 24);
        assert_eq!(names.len(), 24);
        assert!(names.contains("C# minor"));
    }

    #[test]
    fn test_lookup_canonicalizes() {
        let expected = Scale::build(3, Mode::Minor).unwrap();
        for name in ["D# minor", "d# MINOR", "  eb   minor ", "Eb minor"] {
            assert_eq!(lookup(name).unwrap(), expected, "lookup({name:?})");
        }
        assert_eq!(lookup("db major").unwrap().name(), "C# major");
    }

    #[test]
    fn test_lookup_rejects_unknown() {
        for name in ["Z# major", "C dorian", "C", "major", "C major extra", "C#major"] {
            assert!(
                matches!(lookup(name), Err(MelodyError::InvalidScaleName(_))),
                "{name:?} should be rejected"
            );
        }
    }

    #[test]
    fn test_resolve_empty_is_random() {
        let mut rng = StdRng::seed_from_u64(7);
        let scale = resolve("   ", &mut rng).unwrap();
        assert!(catalog().contains(&scale));
        assert_eq!(resolve("G major", &mut rng).unwrap().name(), "G major");
    }

    #[test]
    fn test_choose_covers_catalog() {
        let mut rng = StdRng::seed_from_u64(1);
        let seen: BTreeSet<String> = (0..2000).map(|_| choose(&mut rng).name()).collect();
        assert_eq!(seen.len(), 24);
    }
}
