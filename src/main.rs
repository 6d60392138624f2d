//! albumsplit
//!
//! Command-line front end:
//! - `split <MANIFEST>` cuts an album into tagged track files
//! - `tags <FILE>` prints what got embedded into one of them
//!
//! Logging goes through `env_logger`; set `RUST_LOG=info` to see each track
//! as it is written.

use std::path::{Path, PathBuf};

use anyhow::{Context, bail};
use clap::{Parser, Subcommand, ValueEnum};

use albumsplit::core::tags::{picture_count, read_track_tags};
use albumsplit::core::{
    AlbumManifest, AlbumSplitter, Mp3Exporter, SplitOptions, WavExporter, format_time,
};

#[derive(Parser)]
#[command(name = "albumsplit")]
#[command(about = "Split an album recording into tagged tracks", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Split the album described by a TOML manifest
    Split {
        manifest: PathBuf,

        /// Output directory (overrides the manifest)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Replace files that already exist
        #[arg(long)]
        overwrite: bool,

        /// Validate and print the plan without writing anything
        #[arg(long)]
        dry_run: bool,

        /// Container for the exported tracks
        #[arg(short, long, value_enum, default_value_t = Format::Mp3)]
        format: Format,

        /// MP3 bitrate in kbps (128, 160, 192, 256 or 320)
        #[arg(long, default_value_t = 192)]
        bitrate: u32,
    },

    /// Print the tags embedded in a track file
    Tags { file: PathBuf },
}

#[derive(Clone, Copy, ValueEnum)]
enum Format {
    Mp3,
    Wav,
}

struct SplitArgs {
    output: Option<PathBuf>,
    overwrite: bool,
    dry_run: bool,
    format: Format,
    bitrate: u32,
}

fn main() -> anyhow::Result<()> {
    env_logger::init();

    match Cli::parse().command {
        Commands::Split {
            manifest,
            output,
            overwrite,
            dry_run,
            format,
            bitrate,
        } => handle_split(
            &manifest,
            SplitArgs {
                output,
                overwrite,
                dry_run,
                format,
                bitrate,
            },
        ),
        Commands::Tags { file } => handle_tags(&file),
    }
}

fn handle_split(manifest_path: &Path, args: SplitArgs) -> anyhow::Result<()> {
    let manifest = AlbumManifest::load(manifest_path)?;
    let tracks = manifest
        .track_list()
        .freeze()
        .with_context(|| format!("invalid track list in '{}'", manifest_path.display()))?;

    let output_dir = args
        .output
        .or_else(|| manifest.output_dir.clone())
        .unwrap_or_else(|| PathBuf::from("."));

    let options = SplitOptions {
        output_dir,
        overwrite: args.overwrite,
        ..SplitOptions::default()
    };
    let mut splitter = match args.format {
        Format::Mp3 => AlbumSplitter::new(options).with_exporter(Mp3Exporter::new(args.bitrate)),
        Format::Wav => AlbumSplitter::new(options).with_exporter(WavExporter),
    };
    splitter.set_cover(manifest.cover.clone());
    splitter
        .load_album(&manifest.album_file)
        .with_context(|| format!("failed to load album '{}'", manifest.album_file.display()))?;

    if args.dry_run {
        let plan = splitter.plan(&tracks)?;
        println!("Dry run: would write {} track(s):", plan.paths.len());
        for (segment, path) in plan.segments.iter().zip(&plan.paths) {
            println!(
                "  {:>2}. [{} - {}] {}",
                segment.index + 1,
                format_time(segment.start_secs as u64),
                format_time(segment.end_secs.ceil() as u64),
                path.display()
            );
        }
        return Ok(());
    }

    let written = splitter.split(&tracks)?;
    if written.is_empty() {
        bail!("no tracks were written");
    }
    for track in &written {
        println!("{}", track.path.display());
    }
    Ok(())
}

fn handle_tags(file: &Path) -> anyhow::Result<()> {
    let tags = read_track_tags(file)
        .with_context(|| format!("failed to read tags from '{}'", file.display()))?;
    let covers = picture_count(file)?;

    println!("Title:        {}", tags.title);
    println!("Album:        {}", tags.album);
    println!("Artist:       {}", tags.artist);
    println!("Track number: {}", tags.track_number);
    println!("Covers:       {covers}");
    Ok(())
}
