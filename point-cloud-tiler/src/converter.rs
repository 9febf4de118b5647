/// Point cloud to 3D Tiles conversion pipeline.
use crate::crs::{CrsProbeResult, probe_crs};
use crate::error::{Result, TilerError};
use crate::invocation::{ConverterInvocation, ConverterRunner, SubprocessRunner, resolve_converter};
use crate::laz::prepare_working_copy;
use crate::request::ConversionRequest;
use crate::tileset::{PostFixReport, post_fix_tileset_uris};
use crate::validate::validate_input;
use constants::converter::CONVERTER_ENV;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Settings that stay the same across conversions.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TilerSettings {
    /// Converter executable path or name. Resolved from the default name when unset.
    pub converter: Option<PathBuf>,
}

impl TilerSettings {
    /// Reads the converter override from the environment.
    pub fn from_env() -> Self {
        Self {
            converter: std::env::var_os(CONVERTER_ENV)
                .filter(|v| !v.is_empty())
                .map(PathBuf::from),
        }
    }
}

/// Result of a successful conversion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConversionOutcome {
    /// Root tileset written by the converter.
    pub tileset_path: PathBuf,
    /// File the converter actually read.
    pub working_input: PathBuf,
    pub crs: CrsProbeResult,
    pub post_fix: PostFixReport,
    /// Files found in the output directory after post-processing.
    pub file_count: usize,
}

/// Runs validation, decompression, CRS probing, the converter and the URI
/// post-fix, in that order. Any failure aborts the run.
pub struct PointCloudTiler<R = SubprocessRunner> {
    settings: TilerSettings,
    runner: R,
}

impl PointCloudTiler<SubprocessRunner> {
    pub fn new(settings: TilerSettings) -> Self {
        Self::with_runner(settings, SubprocessRunner)
    }
}

impl<R: ConverterRunner> PointCloudTiler<R> {
    pub fn with_runner(settings: TilerSettings, runner: R) -> Self {
        Self { settings, runner }
    }

    pub fn convert(&self, request: &ConversionRequest) -> Result<ConversionOutcome> {
        info!(%request, "Starting conversion");

        let format = validate_input(&request.input_path)?;
        let executable = resolve_converter(self.settings.converter.as_deref())?;

        prepare_output_dir(request)?;

        let working_input = prepare_working_copy(&request.input_path, format)?;
        let crs = probe_crs(&working_input);

        let invocation = ConverterInvocation::new(executable, request, &working_input, &crs);
        if crs.has_crs() && !invocation.transforms_crs() {
            info!("Target CRS disabled, keeping source coordinates");
        }

        let output = self.runner.run(&invocation)?;

        let log_path = request.log_path();
        fs::write(&log_path, &output.log)
            .map_err(|e| TilerError::io(format!("writing {}", log_path.display()), e))?;

        if !output.success {
            return Err(TilerError::Conversion {
                code: output.exit_code,
                log_path,
                tail: output.tail(),
            });
        }

        let tileset_path = request.tileset_path();
        if !tileset_path.is_file() {
            return Err(TilerError::OutputNotFound(tileset_path));
        }

        let post_fix = post_fix_tileset_uris(&request.output_dir)?;
        let file_count = count_files(&request.output_dir);

        info!(
            tileset = %tileset_path.display(),
            file_count,
            "Conversion completed"
        );

        Ok(ConversionOutcome {
            tileset_path,
            working_input,
            crs,
            post_fix,
            file_count,
        })
    }
}

/// Creates the output directory, clearing it first when `overwrite` is set.
/// An output directory holding the input is never cleared.
fn prepare_output_dir(request: &ConversionRequest) -> Result<()> {
    let output_dir = request.output_dir.as_path();
    if request.overwrite && output_dir.exists() {
        let canonical = |path: &Path| {
            fs::canonicalize(path)
                .map_err(|e| TilerError::io(format!("resolving {}", path.display()), e))
        };
        if canonical(&request.input_path)?.starts_with(canonical(output_dir)?) {
            return Err(TilerError::InputInsideOutput {
                input: request.input_path.clone(),
                output_dir: output_dir.to_path_buf(),
            });
        }

        info!(path = %output_dir.display(), "Clearing output directory");
        fs::remove_dir_all(output_dir)
            .map_err(|e| TilerError::io(format!("clearing {}", output_dir.display()), e))?;
    }

    fs::create_dir_all(output_dir)
        .map_err(|e| TilerError::io(format!("creating {}", output_dir.display()), e))
}

/// Regular files below `dir`, recursively. Unreadable entries are skipped.
fn count_files(dir: &Path) -> usize {
    let entries = match fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(e) => {
            warn!(path = %dir.display(), error = %e, "Could not list output directory");
            return 0;
        }
    };

    entries
        .filter_map(|entry| entry.ok())
        .map(|entry| {
            let path = entry.path();
            if path.is_dir() {
                count_files(&path)
            } else {
                1
            }
        })
        .sum()
}
