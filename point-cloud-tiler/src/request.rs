/// Conversion parameters shared by the CLI and library entry points.
use constants::converter::DEFAULT_SRS_OUT;
use std::fmt;
use std::path::PathBuf;

/// Everything one conversion run needs. Built once and not mutated afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConversionRequest {
    /// Input LAS or LAZ point cloud file.
    pub input_path: PathBuf,
    /// Directory where tiles will be written.
    pub output_dir: PathBuf,
    /// Comma-separated extra dimensions forwarded verbatim to the converter.
    pub extra_fields: Option<String>,
    /// Target CRS code. `None` keeps the source coordinates untouched.
    pub srs_out: Option<String>,
    /// Clear the output directory before converting.
    pub overwrite: bool,
}

impl ConversionRequest {
    /// Request with the default ECEF target and no extra fields.
    pub fn new(input_path: impl Into<PathBuf>, output_dir: impl Into<PathBuf>) -> Self {
        Self {
            input_path: input_path.into(),
            output_dir: output_dir.into(),
            extra_fields: None,
            srs_out: Some(DEFAULT_SRS_OUT.to_string()),
            overwrite: false,
        }
    }

    pub fn with_extra_fields(mut self, extra_fields: Option<String>) -> Self {
        self.extra_fields = extra_fields.filter(|f| !f.is_empty());
        self
    }

    /// Empty codes are treated as "no transformation".
    pub fn with_srs_out(mut self, srs_out: Option<String>) -> Self {
        self.srs_out = srs_out.filter(|s| !s.trim().is_empty());
        self
    }

    pub fn with_overwrite(mut self, overwrite: bool) -> Self {
        self.overwrite = overwrite;
        self
    }

    pub fn tileset_path(&self) -> PathBuf {
        self.output_dir.join(constants::tileset::TILESET_FILE)
    }

    pub fn log_path(&self) -> PathBuf {
        self.output_dir.join(constants::tileset::TILES_LOG_FILE)
    }
}

impl fmt::Display for ConversionRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "ConversionRequest(input_path={}, output_dir={}, extra_fields={:?}, srs_out={:?}, overwrite={})",
            self.input_path.display(),
            self.output_dir.display(),
            self.extra_fields,
            self.srs_out,
            self.overwrite
        )
    }
}
