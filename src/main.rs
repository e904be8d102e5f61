use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use tracing::{info, warn};

use holocast::holo_pipeline::{
    CastFilter, CastTable, CollectorConfig, DepthSegmenter, FilePattern, FrameDecoder,
    FrameGeometry, HoloError, LisstFrameDecoder, MetadataCollector, MetadataRecord, SegmentationConfig,
    default_overview_path, read_cast_table, read_text_echo,
};
use holocast::logger;

#[derive(Parser)]
#[command(name = "holocast")]
#[command(about = "Extract LISST-Holo frame metadata and keep the downcast/upcast frames of a cast")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Decode every frame in a directory into a metadata table.
    Collect(CollectArgs),

    /// Label a metadata table with cast phases and keep usable frames.
    Filter {
        /// Metadata table written by `collect`.
        input: PathBuf,

        #[command(flatten)]
        segmentation: SegmentationArgs,

        /// Filtered table path (default: filtered_metadata.csv next to the input).
        #[arg(long)]
        output: Option<PathBuf>,
    },

    /// Run collect and filter in one pass.
    Process {
        #[command(flatten)]
        collect: CollectArgs,

        #[command(flatten)]
        segmentation: SegmentationArgs,

        /// Filtered table path (default: filtered_metadata.csv next to the metadata table).
        #[arg(long)]
        filtered_output: Option<PathBuf>,
    },

    /// Print the decoded metadata of a single frame.
    Echo {
        /// Raw frame file.
        frame: PathBuf,

        #[command(flatten)]
        geometry: GeometryArgs,
    },
}

#[derive(Debug, Clone, Args)]
struct GeometryArgs {
    /// Image width in pixels.
    #[arg(long, default_value = "1600")]
    width: u64,

    /// Image height in pixels.
    #[arg(long, default_value = "1200")]
    height: u64,
}

#[derive(Debug, Clone, Args)]
struct CollectArgs {
    /// Directory holding the raw frames.
    dir: PathBuf,

    /// Cruise label, e.g. DY086.
    #[arg(long)]
    cruise: Option<String>,

    /// Event (deployment) label, e.g. 034.
    #[arg(long)]
    event: Option<String>,

    /// Raw frame file extension.
    #[arg(long, default_value = "pgm")]
    extension: String,

    /// Match the extension regardless of case (PGM and pgm).
    #[arg(long)]
    case_insensitive: bool,

    #[command(flatten)]
    geometry: GeometryArgs,

    /// Metadata table path (default depends on cruise/event).
    #[arg(long)]
    output: Option<PathBuf>,

    /// Also write each frame's text echo to this directory.
    #[arg(long)]
    export_text: Option<PathBuf>,

    /// Decode frames one at a time.
    #[arg(long)]
    sequential: bool,
}

#[derive(Debug, Clone, Args)]
struct SegmentationArgs {
    /// Depth smoothing window in frames.
    #[arg(long, default_value = "5")]
    window: usize,

    /// Smoothed depth change (m) treated as sensor noise.
    #[arg(long, default_value = "0.15")]
    tolerance: f64,

    /// Average over preceding frames only instead of a centred window.
    #[arg(long)]
    trailing: bool,

    /// Shallowest smoothed depth (m) to keep.
    #[arg(long, default_value = "5.0")]
    min_depth: f64,

    /// Keep only every n-th frame before segmenting.
    #[arg(long)]
    every: Option<usize>,
}

impl GeometryArgs {
    fn geometry(&self) -> Result<FrameGeometry> {
        Ok(FrameGeometry::try_new(self.width, self.height)?)
    }
}

impl SegmentationArgs {
    fn config(&self) -> SegmentationConfig {
        SegmentationConfig::builder()
            .window(self.window)
            .tolerance(self.tolerance)
            .centered(!self.trailing)
            .min_depth(self.min_depth)
            .build()
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    logger::init(cli.verbose);

    match cli.command {
        Commands::Collect(args) => {
            run_collect(&args)?;
        }
        Commands::Filter {
            input,
            segmentation,
            output,
        } => {
            let table = read_cast_table(&input)
                .with_context(|| format!("failed to load metadata table {}", input.display()))?;
            let output = output.unwrap_or_else(|| input.with_file_name("filtered_metadata.csv"));
            run_filter(table, &segmentation, &output)?;
        }
        Commands::Process {
            collect,
            segmentation,
            filtered_output,
        } => {
            if let Some((table, metadata_path)) = run_collect(&collect)? {
                let output = filtered_output
                    .unwrap_or_else(|| metadata_path.with_file_name("filtered_metadata.csv"));
                run_filter(table, &segmentation, &output)?;
            }
        }
        Commands::Echo { frame, geometry } => run_echo(&frame, geometry.geometry()?)?,
    }

    Ok(())
}

/// Returns the collected table and where it was saved, or `None` when the
/// directory held no decodable frame.
fn run_collect(args: &CollectArgs) -> Result<Option<(CastTable, PathBuf)>> {
    let mut builder = CollectorConfig::builder()
        .pattern(FilePattern::new(args.extension.as_str(), !args.case_insensitive))
        .geometry(args.geometry.geometry()?)
        .parallel(!args.sequential);
    if let Some(cruise) = &args.cruise {
        builder = builder.cruise(cruise.as_str());
    }
    if let Some(event) = &args.event {
        builder = builder.event(event.as_str());
    }
    let collector = MetadataCollector::new(builder.build());

    let output = args.output.clone().unwrap_or_else(|| {
        default_overview_path(&args.dir, args.cruise.as_deref(), args.event.as_deref())
    });
    info!(output = %output.display(), "Metadata will be saved");

    match collector.collect(&args.dir, &output) {
        Ok(report) => {
            if let Some(text_dir) = &args.export_text {
                collector
                    .export_text_echoes(&args.dir, text_dir)
                    .with_context(|| format!("failed to export text echoes to {}", text_dir.display()))?;
            }
            println!(
                "Metadata saved to: {} ({} frames, {} skipped)",
                report.path.display(),
                report.table.len(),
                report.failures.len()
            );
            Ok(Some((report.table, report.path)))
        }
        Err(HoloError::EmptyBatch { directory, failures }) => {
            warn!(dir = %directory.display(), failures, "No table written");
            println!("No valid hologram files found in {}.", directory.display());
            Ok(None)
        }
        Err(e) => Err(e).with_context(|| format!("failed to collect metadata from {}", args.dir.display())),
    }
}

fn run_filter(table: CastTable, args: &SegmentationArgs, output: &Path) -> Result<()> {
    let config = args.config();
    let table = match args.every {
        Some(n) => table.every_nth(n)?,
        None => table,
    };

    let segmenter = DepthSegmenter::new(config.clone())?;
    let cast = segmenter.segment(table)?;
    let report = CastFilter::new(config.min_depth)?
        .filter_to_file(&cast, output)
        .with_context(|| format!("failed to write filtered table {}", output.display()))?;

    println!(
        "Filtered data saved to: {} ({} of {} frames)",
        report.path.display(),
        report.rows,
        cast.len()
    );
    Ok(())
}

fn run_echo(frame: &Path, geometry: FrameGeometry) -> Result<()> {
    let record = LisstFrameDecoder::new(geometry)
        .decode(frame)
        .with_context(|| format!("failed to decode {}", frame.display()))?;

    for (column, cell) in MetadataRecord::columns()
        .into_iter()
        .zip(record.cells())
    {
        println!("{:<36} {}", column, cell);
    }

    match read_text_echo(frame, geometry) {
        Ok(echo) => match echo.depth() {
            Some(depth) => println!("{:<36} {}", "Text echo depth", depth),
            None => println!("{:<36} (not found)", "Text echo depth"),
        },
        Err(e) => warn!("Text echo unavailable: {}", e),
    }
    Ok(())
}
