// Sentakki Convert command line
// Loads a beatmap, converts it and writes the notes as JSON

use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;

use sentakki_convert::beatmap::load_beatmap;
use sentakki_convert::convert::{BeatmapConverter, ConversionConfig, ConversionExperiments};
use sentakki_convert::pipeline::{summarize_notes, ConversionStage, TraceBuilder, TraceWriter};

#[derive(Debug, Parser)]
#[command(name = "sentakki-convert", version, about = "Convert a beatmap to 8-lane ring notes")]
struct Args {
    /// Source beatmap (JSON)
    beatmap: PathBuf,

    /// Conversion config (JSON); defaults are used when omitted
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Comma separated experiments, overriding the config (twin_notes, twin_slides, touch)
    #[arg(short, long)]
    experiments: Option<String>,

    /// Output file for the converted notes; stdout when omitted
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Append a JSONL trace of the run, including per-event decisions
    #[arg(long)]
    trace: Option<PathBuf>,
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => ConversionConfig::load(path)
            .with_context(|| format!("Failed to load config {}", path.display()))?,
        None => ConversionConfig::default(),
    };
    if let Some(list) = &args.experiments {
        config.experiments = ConversionExperiments::from_list(list)?;
    }
    if args.trace.is_some() {
        config.record_decisions = true;
    }

    let trace = args.trace.clone().map(TraceWriter::new);

    if let Some(writer) = &trace {
        writer.write(&TraceBuilder::stage(ConversionStage::Load).start(args.beatmap.display().to_string()))?;
    }
    let beatmap = load_beatmap(&args.beatmap)
        .with_context(|| format!("Failed to load beatmap {}", args.beatmap.display()))?;
    if let Some(writer) = &trace {
        writer.write(
            &TraceBuilder::stage(ConversionStage::Load)
                .complete(format!("{} hit events", beatmap.hit_events.len())),
        )?;
        writer.write(&TraceBuilder::stage(ConversionStage::Convert).start("Converting"))?;
    }

    let mut converter = BeatmapConverter::new(&beatmap, config);
    let notes = converter.convert();

    if let Some(writer) = &trace {
        writer.write_decisions(converter.decisions())?;
        writer.write(
            &TraceBuilder::stage(ConversionStage::Convert)
                .complete(format!("{} notes", notes.len()))
                .with_data(summarize_notes(&notes)),
        )?;
    }

    let json = serde_json::to_string_pretty(&notes)?;
    match &args.output {
        Some(path) => {
            fs::write(path, json).with_context(|| format!("Failed to write {}", path.display()))?;
            log::info!("Wrote {} notes to {}", notes.len(), path.display());
        }
        None => println!("{}", json),
    }

    if let Some(writer) = &trace {
        writer.write(&TraceBuilder::stage(ConversionStage::Write).complete("Notes written"))?;
        log::info!("Trace appended to {}", writer.path().display());
    }

    Ok(())
}
