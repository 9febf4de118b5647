//! Converts LAS/LAZ point clouds to Cesium 3D Tiles by driving an external
//! converter, then patches the URIs of the tilesets it writes.
pub mod converter;
pub mod crs;
pub mod error;
pub mod invocation;
pub mod laz;
pub mod request;
pub mod tileset;
pub mod validate;

#[cfg(test)]
mod test_util;

pub use converter::{ConversionOutcome, PointCloudTiler, TilerSettings};
pub use crs::{CrsProbeResult, CrsSource, probe_crs};
pub use error::{Result, TilerError};
pub use invocation::{ConverterInvocation, ConverterOutput, ConverterRunner, SubprocessRunner};
pub use request::ConversionRequest;
pub use tileset::{PostFixReport, post_fix_tileset_uris};

use std::path::{Path, PathBuf};

/// Library entry point for workflow orchestrators.
///
/// `srs_out` of `None` or `Some("")` keeps the source coordinates. The
/// converter is located through `POINT_CLOUD_TILER_CONVERTER`, then next to
/// the current executable, then on `PATH`. Returns the path of the root
/// `tileset.json`.
pub fn convert_las_to_3dtiles(
    input_path: &Path,
    output_dir: &Path,
    extra_fields: Option<&str>,
    srs_out: Option<&str>,
    overwrite: bool,
) -> Result<PathBuf> {
    let request = ConversionRequest::new(input_path, output_dir)
        .with_extra_fields(extra_fields.map(str::to_string))
        .with_srs_out(srs_out.map(str::to_string))
        .with_overwrite(overwrite);

    PointCloudTiler::new(TilerSettings::from_env())
        .convert(&request)
        .map(|outcome| outcome.tileset_path)
}
