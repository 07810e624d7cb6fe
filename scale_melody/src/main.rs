// Scale Melody Generator — CLI entry point.
//
// Picks a scale, fills a fixed number of bars with random in-scale notes and
// writes the result as a MIDI file. The pipeline: config → scale → melody →
// MIDI bytes → file.
//
// Usage:
//   cargo run -p scale_melody -- [output.mid] [--scale "Eb minor"] [--seed N]
//     [--tempo BPM] [--octave N] [--bars N] [--config FILE]
//     [--histogram-json FILE] [--quiet]
//
// Leaving out --scale (or passing an empty string) picks one of the 24
// major/minor scales at random.

use clap::Parser;
use rand::SeedableRng;
use rand::rngs::StdRng;
use scale_melody::config::GeneratorConfig;
use scale_melody::generator::generate_melody;
use scale_melody::midi::{MidiSerializer, SmfWriter, write_midi};
use scale_melody::scale;
use std::path::PathBuf;

/// Generate a random melody in a major or minor scale and save it as MIDI.
#[derive(Parser)]
#[command(name = "generate")]
#[command(version = env!("CARGO_PKG_VERSION"))]
struct Cli {
    /// Output MIDI file (default: output.mid)
    output: Option<PathBuf>,

    /// Scale such as "C major" or "f# minor"; empty for a random scale
    #[arg(short, long)]
    scale: Option<String>,

    /// RNG seed for reproducible output
    #[arg(long)]
    seed: Option<u64>,

    /// Tempo in beats per minute
    #[arg(long)]
    tempo: Option<u32>,

    /// Octave offset (3 puts C on middle C)
    #[arg(long, allow_negative_numbers = true)]
    octave: Option<i32>,

    /// Phrase length in 4/4 bars
    #[arg(long)]
    bars: Option<u32>,

    /// JSON configuration file; flags override its values
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Also write the note-frequency histogram as JSON
    #[arg(long)]
    histogram_json: Option<PathBuf>,

    /// Only report errors
    #[arg(short, long)]
    quiet: bool,
}

fn main() {
    let cli = Cli::parse();
    if let Err(e) = run(cli) {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> scale_melody::Result<()> {
    let mut config = match &cli.config {
        Some(path) => GeneratorConfig::load(path)?,
        None => GeneratorConfig::default(),
    };
    apply_overrides(&mut config, &cli);
    config.validate()?;

    let mut rng = match config.seed {
        Some(s) => StdRng::seed_from_u64(s),
        None => StdRng::from_os_rng(),
    };

    let scale = scale::resolve(&config.scale, &mut rng)?;
    let melody = generate_melody(scale.degrees(), config.budget_sixteenths()?, &mut rng)?;
    let settings = config.midi_settings(Some(scale.name()));
    let bytes = SmfWriter.serialize(&melody, &settings)?;
    write_midi(&config.output, &bytes)?;

    let histogram = melody.note_histogram();
    if let Some(path) = &cli.histogram_json {
        std::fs::write(path, histogram.to_json()?)?;
    }

    if !cli.quiet {
        println!("Selected Scale: {scale}");
        if let Some(s) = config.seed {
            println!("Seed: {s}");
        }
        println!();
        println!("Generated Melody ({} notes, {} bars):", melody.len(), config.bars);
        print!("{melody}");
        println!();
        println!("Note Frequency:");
        print!("{histogram}");
        println!();
        println!("Melody exported to {}", config.output.display());
    }
    Ok(())
}

fn apply_overrides(config: &mut GeneratorConfig, cli: &Cli) {
    if let Some(output) = &cli.output {
        config.output = output.clone();
    }
    if let Some(scale) = &cli.scale {
        config.scale = scale.clone();
    }
    if cli.seed.is_some() {
        config.seed = cli.seed;
    }
    if let Some(tempo) = cli.tempo {
        config.tempo_bpm = tempo;
    }
    if let Some(octave) = cli.octave {
        config.octave_offset = octave;
    }
    if let Some(bars) = cli.bars {
        config.bars = bars;
    }
}
