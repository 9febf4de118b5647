/// Name of the external point cloud to 3D Tiles converter executable.
pub const CONVERTER_EXECUTABLE: &str = "py3dtiles";

/// Environment variable overriding converter executable resolution.
pub const CONVERTER_ENV: &str = "POINT_CLOUD_TILER_CONVERTER";

/// Default output CRS: EPSG:4978 (ECEF), required by Cesium camera controls.
pub const DEFAULT_SRS_OUT: &str = "4978";

/// Converter subcommand.
pub const CONVERT_SUBCOMMAND: &str = "convert";

pub const FLAG_OUT: &str = "--out";
pub const FLAG_SRS_OUT: &str = "--srs_out";
/// Keeps axis order X,Y (East,North) regardless of the CRS definition.
pub const FLAG_ALWAYS_XY: &str = "--pyproj-always-xy";
pub const FLAG_EXTRA_FIELDS: &str = "--extra-fields";

/// Number of trailing converter output lines carried in error messages.
pub const LOG_TAIL_LINES: usize = 20;
