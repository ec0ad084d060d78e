use std::path::PathBuf;
use std::process;

use clap::{Parser, ValueEnum};
use dicom_frames::{
    FormatClassifier, FrameNaming, FrameRenderer, RenderOptions, TrimScope, VolumeLoader,
};
use log::{error, info};

/// Convert a DICOM file into one JPEG per frame
#[derive(Parser, Debug)]
#[command(name = "dicom-frames")]
#[command(about = "Convert a DICOM file into one JPEG image per frame")]
#[command(version)]
struct Cli {
    /// DICOM file to convert
    #[arg(value_name = "INPUT")]
    input: PathBuf,

    /// Directory the JPEG files are written to
    #[arg(value_name = "OUTPUT_DIR")]
    output_dir: PathBuf,

    /// How output files are numbered
    #[arg(short, long, default_value = "sequential")]
    naming: NamingArg,

    /// Samples used to estimate the display range when no window is stored
    #[arg(short, long, default_value = "first-frame")]
    trim_scope: TrimScopeArg,

    /// Verbose logging
    #[arg(short, long)]
    verbose: bool,
}

#[derive(Debug, Clone, ValueEnum)]
enum NamingArg {
    /// One file per frame, numbered from zero
    Sequential,
    /// Every frame overwrites 0.jpg
    Overwrite,
}

impl From<NamingArg> for FrameNaming {
    fn from(arg: NamingArg) -> Self {
        match arg {
            NamingArg::Sequential => FrameNaming::Sequential,
            NamingArg::Overwrite => FrameNaming::Overwrite,
        }
    }
}

#[derive(Debug, Clone, ValueEnum)]
enum TrimScopeArg {
    /// Estimate once from the first frame
    FirstFrame,
    /// Estimate from every frame separately
    CurrentFrame,
}

impl From<TrimScopeArg> for TrimScope {
    fn from(arg: TrimScopeArg) -> Self {
        match arg {
            TrimScopeArg::FirstFrame => TrimScope::FirstFrame,
            TrimScopeArg::CurrentFrame => TrimScope::CurrentFrame,
        }
    }
}

fn main() {
    let cli = Cli::parse();
    setup_logging(cli.verbose);

    if let Err(e) = run(cli) {
        error!("Conversion failed: {}", e);
        process::exit(1);
    }
}

fn run(cli: Cli) -> dicom_frames::Result<()> {
    info!("Reading {}", cli.input.display());
    let volume = VolumeLoader::load_from_file(&cli.input)?;
    let format = FormatClassifier::classify(&volume)?;
    info!("Photometric format: {:?}", format);

    let options = RenderOptions {
        naming: cli.naming.into(),
        trim_scope: cli.trim_scope.into(),
    };
    let mut written = 0;
    for frame in FrameRenderer::render_with_options(&volume, format, &cli.output_dir, options) {
        frame?;
        written += 1;
    }

    info!(
        "Converted {} frames into {}",
        written,
        cli.output_dir.display()
    );
    Ok(())
}

fn setup_logging(verbose: bool) {
    let level = if verbose {
        log::LevelFilter::Debug
    } else {
        log::LevelFilter::Info
    };
    env_logger::Builder::from_default_env()
        .filter_level(level)
        .init();
}
