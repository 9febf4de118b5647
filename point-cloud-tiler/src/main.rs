/// Point cloud to 3D Tiles converter main entry point
use anyhow::Result;
use clap::Parser;
use constants::converter::{CONVERTER_ENV, DEFAULT_SRS_OUT};
use point_cloud_tiler::{ConversionRequest, PointCloudTiler, TilerSettings};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "point-cloud-tiler")]
#[command(about = "Convert LAS/LAZ point clouds to Cesium 3D Tiles format", long_about = None)]
#[command(version)]
struct Args {
    /// Input LAS or LAZ point cloud file
    #[arg(long = "input", visible_alias = "dataset-path")]
    input_path: PathBuf,

    /// Output directory for 3D tiles
    #[arg(long)]
    output_dir: PathBuf,

    /// Comma-separated list of extra fields to include (e.g. 'PredInstance')
    #[arg(long)]
    extra_fields: Option<String>,

    /// Output CRS EPSG code. Empty string preserves the original coordinates
    #[arg(long, default_value = DEFAULT_SRS_OUT)]
    srs_out: String,

    /// Clear the output directory before converting
    #[arg(long)]
    overwrite: bool,

    /// Converter executable (defaults to py3dtiles next to this binary or in PATH)
    #[arg(long, env = CONVERTER_ENV)]
    converter: Option<PathBuf>,
}

impl Args {
    fn request(&self) -> ConversionRequest {
        ConversionRequest::new(&self.input_path, &self.output_dir)
            .with_extra_fields(self.extra_fields.clone())
            .with_srs_out(Some(self.srs_out.clone()))
            .with_overwrite(self.overwrite)
    }
}

fn main() -> ExitCode {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stdout)
        .init();

    match run(Args::parse()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("Conversion failed: {e:#}");
            ExitCode::FAILURE
        }
    }
}

fn run(args: Args) -> Result<()> {
    let request = args.request();
    let settings = TilerSettings {
        converter: args.converter,
    };

    let outcome = PointCloudTiler::new(settings).convert(&request)?;

    info!("Tileset written to: {}", outcome.tileset_path.display());
    info!("Output directory: {}", request.output_dir.display());
    info!("Generated {} files in output directory", outcome.file_count);
    Ok(())
}
