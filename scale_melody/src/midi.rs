// MIDI output for generated melodies.
//
// `MidiSerializer` is the seam between the generator and a file format: it
// turns a finished `Melody` into the bytes of a file. `SmfWriter` is the
// Standard MIDI File implementation (format 0, a single track) built on the
// `midly` crate.
//
// Track layout:
//   tick 0: track name (optional), 4/4 time signature, tempo
//   per event: note-on at delta 0, note-off after the event's duration
//   end of track
//
// Pitch mapping: pitch class 0 at octave offset 3 lands on MIDI 60 (middle
// C). In general `note = pitch_class + 12 * (MIDDLE_OCTAVE_ANCHOR + offset)`.
//
// Timing: one bar is four beats, so an event lasting `d` sixteenth-bar units
// spans `d * 4 * ticks_per_beat / 16` ticks. That is exact only when the
// resolution is a multiple of 4, so other resolutions are rejected.

use crate::error::{MelodyError, Result};
use crate::melody::Melody;
use crate::pitch::PitchClass;
use midly::{
    Format, Header, MetaMessage, MidiMessage, Smf, Timing, Track, TrackEvent, TrackEventKind,
    num::{u4, u7, u15, u24, u28},
};
use std::fs::File;
use std::io::{self, Write};
use std::path::Path;

/// Octaves added to every note before the configured offset. With the
/// default offset of 3 this puts C on MIDI 60.
pub const MIDDLE_OCTAVE_ANCHOR: i32 = 2;

/// Parameters that shape the MIDI rendering of a melody.
#[derive(Debug, Clone, PartialEq)]
pub struct MidiSettings {
    /// Quarter-note beats per minute.
    pub tempo_bpm: u32,
    /// Octave shift applied on top of `MIDDLE_OCTAVE_ANCHOR`.
    pub octave_offset: i32,
    /// File resolution.
    pub ticks_per_beat: u16,
    pub velocity: u8,
    pub channel: u8,
    /// Written as the track-name meta event when present.
    pub track_name: Option<String>,
}

impl Default for MidiSettings {
    fn default() -> Self {
        MidiSettings {
            tempo_bpm: 120,
            octave_offset: 3,
            ticks_per_beat: 480,
            velocity: 100,
            channel: 0,
            track_name: None,
        }
    }
}

impl MidiSettings {
    /// Microseconds per quarter note for the tempo meta event.
    pub fn micros_per_beat(&self) -> u32 {
        60_000_000 / self.tempo_bpm
    }

    pub fn ticks_per_bar(&self) -> u32 {
        self.ticks_per_beat as u32 * 4
    }

    fn validate(&self) -> Result<()> {
        if self.tempo_bpm == 0 || self.tempo_bpm > 60_000_000 {
            return Err(MelodyError::InvalidArgument(format!(
                "tempo {} BPM is out of range",
                self.tempo_bpm
            )));
        }
        // Tempo meta events hold 24 bits.
        if self.micros_per_beat() >= 1 << 24 {
            return Err(MelodyError::InvalidArgument(format!(
                "tempo {} BPM is too slow for a MIDI tempo event",
                self.tempo_bpm
            )));
        }
        if self.ticks_per_beat == 0 || self.ticks_per_beat > 0x7FFF {
            return Err(MelodyError::InvalidArgument(format!(
                "ticks per beat {} must be in 1..=32767",
                self.ticks_per_beat
            )));
        }
        // A sixteenth-bar note lasts ticks_per_beat / 4 ticks.
        if self.ticks_per_beat % 4 != 0 {
            return Err(MelodyError::InvalidArgument(format!(
                "ticks per beat {} must be a multiple of 4",
                self.ticks_per_beat
            )));
        }
        if self.velocity > 127 {
            return Err(MelodyError::InvalidArgument(format!(
                "velocity {} must be in 0..=127",
                self.velocity
            )));
        }
        if self.channel > 15 {
            return Err(MelodyError::InvalidArgument(format!(
                "channel {} must be in 0..=15",
                self.channel
            )));
        }
        Ok(())
    }
}

/// MIDI note number for a pitch class at the given octave offset.
pub fn note_number(pc: PitchClass, octave_offset: i32) -> Result<u8> {
    let note = pc.value() as i32 + 12 * (MIDDLE_OCTAVE_ANCHOR + octave_offset);
    u8::try_from(note)
        .ok()
        .filter(|n| *n <= 127)
        .ok_or_else(|| {
            MelodyError::InvalidArgument(format!(
                "{pc} at octave offset {octave_offset} gives MIDI note {note}, outside 0..=127"
            ))
        })
}

/// Turns a melody into the bytes of a playable file.
pub trait MidiSerializer {
    fn serialize(&self, melody: &Melody, settings: &MidiSettings) -> Result<Vec<u8>>;
}

/// Format-0 Standard MIDI File writer.
#[derive(Debug, Clone, Copy, Default)]
pub struct SmfWriter;

impl MidiSerializer for SmfWriter {
    fn serialize(&self, melody: &Melody, settings: &MidiSettings) -> Result<Vec<u8>> {
        let smf = melody_to_smf(melody, settings)?;
        let mut buf = Vec::new();
        smf.write_std(&mut buf)?;
        Ok(buf)
    }
}

/// Build the in-memory SMF. Fails before building anything if the melody or
/// settings are unusable.
fn melody_to_smf<'a>(melody: &Melody, settings: &'a MidiSettings) -> Result<Smf<'a>> {
    melody.validate_shape()?;
    settings.validate()?;

    let channel = u4::new(settings.channel);
    let velocity = u7::new(settings.velocity);
    let ticks_per_beat = settings.ticks_per_beat as u32;

    let mut track: Track<'a> = Vec::with_capacity(melody.len() * 2 + 4);

    if let Some(name) = &settings.track_name {
        track.push(TrackEvent {
            delta: u28::new(0),
            kind: TrackEventKind::Meta(MetaMessage::TrackName(name.as_bytes())),
        });
    }
    // 4/4, 24 MIDI clocks per click, 8 thirty-seconds per quarter.
    track.push(TrackEvent {
        delta: u28::new(0),
        kind: TrackEventKind::Meta(MetaMessage::TimeSignature(4, 2, 24, 8)),
    });
    track.push(TrackEvent {
        delta: u28::new(0),
        kind: TrackEventKind::Meta(MetaMessage::Tempo(u24::new(settings.micros_per_beat()))),
    });

    for event in melody.events() {
        let key = u7::new(note_number(event.pitch, settings.octave_offset)?);
        track.push(TrackEvent {
            delta: u28::new(0),
            kind: TrackEventKind::Midi {
                channel,
                message: MidiMessage::NoteOn { key, vel: velocity },
            },
        });
        track.push(TrackEvent {
            delta: u28::new(event.duration.ticks(ticks_per_beat)),
            kind: TrackEventKind::Midi {
                channel,
                message: MidiMessage::NoteOff { key, vel: u7::new(0) },
            },
        });
    }

    track.push(TrackEvent {
        delta: u28::new(0),
        kind: TrackEventKind::Meta(MetaMessage::EndOfTrack),
    });

    let mut smf = Smf::new(Header::new(
        Format::SingleTrack,
        Timing::Metrical(u15::new(settings.ticks_per_beat)),
    ));
    smf.tracks.push(track);
    Ok(smf)
}

/// Write an already-serialized file.
///
/// If the file cannot be opened, nothing on disk is touched. If it was opened
/// but writing or syncing fails, the truncated file is removed so an error
/// never leaves behind a file that looks complete.
pub fn write_midi(path: &Path, bytes: &[u8]) -> Result<()> {
    let mut file = File::create(path)?;
    let written = file.write_all(bytes).and_then(|()| file.sync_all());
    drop(file);
    discard_on_error(path, written)
}

/// Remove `path` if writing it failed. Only called for a file this process
/// just created.
fn discard_on_error(path: &Path, written: io::Result<()>) -> Result<()> {
    let Err(e) = written else {
        return Ok(());
    };
    if let Err(cleanup) = std::fs::remove_file(path) {
        return Err(io::Error::new(
            e.kind(),
            format!("{e}; removing the partial file also failed: {cleanup}"),
        )
        .into());
    }
    Err(e.into())
}
