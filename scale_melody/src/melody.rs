// The generated melody: an ordered list of (pitch class, duration) events.
//
// Events are in playback order. A well-formed melody is non-empty and its
// durations add up to the phrase budget exactly; `validate()` checks both and
// the MIDI writer calls `validate_shape()` before emitting anything.
//
// Also provides the two views the CLI hands to the outside world: the
// textual listing ("E (1/4 bar)" per line, via `Display`) and the
// note-frequency histogram used for the pie-chart style summary.

use crate::duration::{Duration, SIXTEENTHS_PER_BAR};
use crate::error::{MelodyError, Result};
use crate::pitch::PitchClass;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// One note of the melody.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MelodyEvent {
    pub pitch: PitchClass,
    pub duration: Duration,
}

impl MelodyEvent {
    pub fn new(pitch: PitchClass, duration: Duration) -> Self {
        MelodyEvent { pitch, duration }
    }
}

impl fmt::Display for MelodyEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.pitch, self.duration)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Melody {
    events: Vec<MelodyEvent>,
}

impl Melody {
    pub fn from_events(events: Vec<MelodyEvent>) -> Self {
        Melody { events }
    }

    pub fn events(&self) -> &[MelodyEvent] {
        &self.events
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Sum of all event durations, in sixteenth-bar units.
    pub fn total_sixteenths(&self) -> u32 {
        self.events.iter().map(|e| e.duration.sixteenths()).sum()
    }

    /// Checks that hold for any melody worth writing out: at least one event
    /// and no zero-length event.
    pub fn validate_shape(&self) -> Result<()> {
        if self.events.is_empty() {
            return Err(MelodyError::InvalidMelody("melody has no events".into()));
        }
        if let Some(i) = self.events.iter().position(|e| e.duration.sixteenths() == 0) {
            return Err(MelodyError::InvalidMelody(format!(
                "event {i} has a non-positive duration"
            )));
        }
        Ok(())
    }

    /// Full check against a phrase budget given in sixteenth-bar units.
    pub fn validate(&self, budget_sixteenths: u32) -> Result<()> {
        self.validate_shape()?;
        let total = self.total_sixteenths();
        if total != budget_sixteenths {
            return Err(MelodyError::InvalidMelody(format!(
                "durations sum to {total}/{SIXTEENTHS_PER_BAR} bars, expected {budget_sixteenths}/{SIXTEENTHS_PER_BAR}"
            )));
        }
        Ok(())
    }

    /// Occurrence count per pitch class. Pitch classes that never occur are
    /// absent.
    pub fn note_histogram(&self) -> NoteHistogram {
        let mut counts = BTreeMap::new();
        for event in &self.events {
            *counts.entry(event.pitch).or_insert(0) += 1;
        }
        NoteHistogram { counts }
    }
}

impl fmt::Display for Melody {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for event in &self.events {
            writeln!(f, "{event}")?;
        }
        Ok(())
    }
}

/// Pitch class → number of events, the input for a frequency chart.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NoteHistogram {
    counts: BTreeMap<PitchClass, usize>,
}

impl NoteHistogram {
    pub fn counts(&self) -> &BTreeMap<PitchClass, usize> {
        &self.counts
    }

    pub fn total(&self) -> usize {
        self.counts.values().sum()
    }

    pub fn count(&self, pc: PitchClass) -> usize {
        self.counts.get(&pc).copied().unwrap_or(0)
    }

    /// Share of each pitch class in percent.
    pub fn percentages(&self) -> Vec<(PitchClass, f64)> {
        let total = self.total();
        if total == 0 {
            return Vec::new();
        }
        self.counts
            .iter()
            .map(|(&pc, &n)| (pc, n as f64 * 100.0 / total as f64))
            .collect()
    }

    /// JSON object keyed by note name, e.g. `{"C": 3, "E": 1}`.
    pub fn to_json(&self) -> Result<String> {
        let by_name: BTreeMap<&str, usize> =
            self.counts.iter().map(|(pc, &n)| (pc.name(), n)).collect();
        Ok(serde_json::to_string_pretty(&by_name)?)
    }
}

impl fmt::Display for NoteHistogram {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (pc, pct) in self.percentages() {
            writeln!(f, "{:<3}{:>4}  {:5.1}%", pc.name(), self.count(pc), pct)?;
        }
        Ok(())
    }
}
