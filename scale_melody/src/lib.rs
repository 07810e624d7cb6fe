// Scale Melody Generator
//
// Generates a short random melody confined to one major or minor scale and
// to an exact phrase length (4 bars by default), then writes it out as a
// format-0 Standard MIDI File.
//
// Architecture:
// - pitch.rs: Pitch classes (0-11) with canonical and enharmonic names
// - scale.rs: Major/minor scale construction and the 24-scale catalog
//   (name canonicalization, lookup, random choice)
// - duration.rs: The five note lengths as exact sixteenth-bar counts
// - melody.rs: Melody/event model, validation, text listing, note histogram
// - generator.rs: Rejection-sampling fill of the duration budget
// - midi.rs: `MidiSerializer` strategy trait and the `midly`-backed SMF writer
// - config.rs: JSON-loadable run configuration with documented defaults
// - error.rs: `MelodyError` and the crate `Result` alias
//
// The generator is deterministic given a seeded RNG, supporting reproducible
// output.

pub mod config;
pub mod duration;
pub mod error;
pub mod generator;
pub mod melody;
pub mod midi;
pub mod pitch;
pub mod scale;

pub use error::{MelodyError, Result};
