// Generator configuration.
//
// Every tunable parameter of a generation run lives in `GeneratorConfig`.
// Defaults reproduce the classic behavior: 120 BPM, octave offset 3 (C on
// middle C), a 4-bar phrase, 480 ticks per beat, velocity 100, channel 0,
// output to `output.mid`. A JSON file may override any subset of fields; the
// CLI then applies its own flags on top.

use crate::error::{MelodyError, Result};
use crate::generator::{DEFAULT_BUDGET_BARS, bars_to_sixteenths};
use crate::midi::MidiSettings;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneratorConfig {
    /// Scale name such as "D minor". Empty picks one of the 24 at random.
    pub scale: String,
    /// Phrase length in 4/4 bars.
    pub bars: u32,
    pub tempo_bpm: u32,
    /// Octave shift; 3 maps pitch class 0 to MIDI 60.
    pub octave_offset: i32,
    pub ticks_per_beat: u16,
    pub velocity: u8,
    pub channel: u8,
    /// Fixed RNG seed for reproducible output. `None` seeds from the OS.
    pub seed: Option<u64>,
    pub output: PathBuf,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        GeneratorConfig {
            scale: String::new(),
            bars: DEFAULT_BUDGET_BARS,
            tempo_bpm: 120,
            octave_offset: 3,
            ticks_per_beat: 480,
            velocity: 100,
            channel: 0,
            seed: None,
            output: PathBuf::from("output.mid"),
        }
    }
}

impl GeneratorConfig {
    /// Load from a JSON file. Missing fields take their defaults.
    pub fn load(path: &Path) -> Result<Self> {
        let data = std::fs::read_to_string(path)?;
        let config: GeneratorConfig = serde_json::from_str(&data)?;
        config.validate()?;
        Ok(config)
    }

    /// Range checks that don't need a melody. MIDI-specific limits are
    /// checked again by the writer.
    pub fn validate(&self) -> Result<()> {
        if self.bars == 0 {
            return Err(MelodyError::InvalidArgument("bars must be at least 1".into()));
        }
        bars_to_sixteenths(self.bars)?;
        if self.tempo_bpm == 0 {
            return Err(MelodyError::InvalidArgument("tempo must be positive".into()));
        }
        if self.ticks_per_beat == 0 || self.ticks_per_beat % 4 != 0 {
            return Err(MelodyError::InvalidArgument(format!(
                "ticks per beat {} must be a positive multiple of 4",
                self.ticks_per_beat
            )));
        }
        Ok(())
    }

    pub fn budget_sixteenths(&self) -> Result<u32> {
        bars_to_sixteenths(self.bars)
    }

    /// MIDI parameters for this run, with the scale name as the track name.
    pub fn midi_settings(&self, track_name: Option<String>) -> MidiSettings {
        MidiSettings {
            tempo_bpm: self.tempo_bpm,
            octave_offset: self.octave_offset,
            ticks_per_beat: self.ticks_per_beat,
            velocity: self.velocity,
            channel: self.channel,
            track_name,
        }
    }
}
