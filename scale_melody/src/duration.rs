// Note durations as exact fractions of a bar.
//
// Durations are stored as whole numbers of sixteenth-bar units, never as
// floats. A whole bar is 16 units and the shortest allowed note is 1, so any
// total built from these values is itself a whole number of sixteenths. The
// generator relies on that to fill its budget exactly.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Sixteenth-bar units in one bar.
pub const SIXTEENTHS_PER_BAR: u32 = 16;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Duration {
    Bar,
    Half,
    Quarter,
    Eighth,
    Sixteenth,
}

impl Duration {
    /// Longest first.
    pub const ALL: [Duration; 5] = [
        Duration::Bar,
        Duration::Half,
        Duration::Quarter,
        Duration::Eighth,
        Duration::Sixteenth,
    ];

    /// Length in sixteenth-bar units.
    pub fn sixteenths(self) -> u32 {
        match self {
            Duration::Bar => 16,
            Duration::Half => 8,
            Duration::Quarter => 4,
            Duration::Eighth => 2,
            Duration::Sixteenth => 1,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Duration::Bar => "1 bar",
            Duration::Half => "1/2 bar",
            Duration::Quarter => "1/4 bar",
            Duration::Eighth => "1/8 bar",
            Duration::Sixteenth => "1/16 bar",
        }
    }

    /// Ticks for this duration given the file's resolution, assuming four
    /// beats per bar. Exact only when `ticks_per_beat` is a multiple of 4;
    /// the MIDI writer refuses other resolutions.
    pub fn ticks(self, ticks_per_beat: u32) -> u32 {
        self.sixteenths() * ticks_per_beat * 4 / SIXTEENTHS_PER_BAR
    }
}

impl fmt::Display for Duration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_duration_is_a_whole_number_of_sixteenths() {
        for d in Duration::ALL {
            assert_eq!(SIXTEENTHS_PER_BAR % d.sixteenths(), 0);
        }
        assert_eq!(Duration::Bar.sixteenths(), SIXTEENTHS_PER_BAR);
    }

    #[test]
    fn test_ticks_at_480_per_beat() {
        assert_eq!(Duration::Bar.ticks(480), 1920);
        assert_eq!(Duration::Half.ticks(480), 960);
        assert_eq!(Duration::Quarter.ticks(480), 480);
        assert_eq!(Duration::Sixteenth.ticks(480), 120);
    }

    #[test]
    fn test_ticks_scale_linearly_with_resolution() {
        for tpb in [96, 120, 480, 960] {
            for d in Duration::ALL {
                assert_eq!(d.ticks(tpb * 2), d.ticks(tpb) * 2, "{d} at {tpb}");
            }
        }
    }

    #[test]
    fn test_labels() {
        assert_eq!(Duration::Half.to_string(), "1/2 bar");
        assert_eq!(Duration::Sixteenth.label(), "1/16 bar");
    }
}
