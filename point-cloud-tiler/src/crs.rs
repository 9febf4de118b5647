/// Detection of coordinate reference system metadata in LAS headers.
use crate::laz::create_reader;
use constants::projection::USER_DEFINED_GEO_KEY_VALUE;
use las::Header;
use las::crs::GeoTiffCrs;
use std::path::Path;
use tracing::{info, warn};

/// Where the CRS metadata was found.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CrsSource {
    /// OGC WKT record.
    Wkt,
    /// GeoTIFF key directory with a usable EPSG code.
    GeoTiff { epsg: u16 },
}

/// Outcome of probing a point cloud header for CRS metadata.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CrsProbeResult {
    pub source: Option<CrsSource>,
}

impl CrsProbeResult {
    pub fn has_crs(&self) -> bool {
        self.source.is_some()
    }
}

/// Probes the header of `path`. An unreadable header counts as absent metadata.
pub fn probe_crs(path: &Path) -> CrsProbeResult {
    let reader = match create_reader(path) {
        Ok(reader) => reader,
        Err(e) => {
            warn!(path = %path.display(), error = %e, "Could not read header, assuming no CRS");
            return CrsProbeResult::default();
        }
    };

    let result = probe_header(reader.header());
    match result.source {
        Some(source) => info!(?source, "CRS metadata detected"),
        None => info!("No CRS metadata, keeping original coordinates"),
    }
    result
}

/// Looks at both VLRs and EVLRs. WKT wins over GeoTIFF keys when both are present.
pub fn probe_header(header: &Header) -> CrsProbeResult {
    if header.get_wkt_crs_bytes().is_some_and(has_wkt_text) {
        return CrsProbeResult {
            source: Some(CrsSource::Wkt),
        };
    }

    let source = match header.get_geotiff_crs() {
        Ok(Some(crs)) => epsg_code(&crs).map(|epsg| CrsSource::GeoTiff { epsg }),
        Ok(None) => None,
        Err(e) => {
            warn!(error = %e, "Unreadable GeoTIFF keys, ignoring them");
            None
        }
    };
    CrsProbeResult { source }
}

fn has_wkt_text(data: &[u8]) -> bool {
    !String::from_utf8_lossy(data)
        .trim_matches(|c: char| c == '\0' || c.is_whitespace())
        .is_empty()
}

/// Projected codes take precedence over geographic ones.
fn epsg_code(crs: &GeoTiffCrs) -> Option<u16> {
    let usable = |code: u16| (code != 0 && code != USER_DEFINED_GEO_KEY_VALUE).then_some(code);
    crs.get_projected_crs_geo_key_value()
        .and_then(usable)
        .or_else(|| crs.get_geodetic_crs_geo_key_value().and_then(usable))
}
