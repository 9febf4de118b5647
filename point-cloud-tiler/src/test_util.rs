//! LAS fixtures shared by the unit tests and, through `tests/common`, the
//! integration tests.
use las::point::Format;
use las::{Builder, Header, Point, Transform, Vector, Vlr, Writer};
use std::path::Path;

const ORIGIN_X: f64 = 690_000.0;
const ORIGIN_Y: f64 = 5_330_000.0;

const PROJECTION_USER_ID: &str = "LASF_Projection";
const GEOGRAPHIC_TYPE_GEO_KEY: u16 = 2048;
const PROJECTED_CS_TYPE_GEO_KEY: u16 = 3072;

/// Offsets sit at the fixture origin so UTM-sized coordinates fit the i32
/// record fields at millimetre scale.
fn builder(version: (u8, u8)) -> Builder {
    let mut builder = Builder::from(version);
    builder.point_format = Format::new(0).unwrap();
    builder.transforms = Vector {
        x: Transform {
            scale: 0.001,
            offset: ORIGIN_X,
        },
        y: Transform {
            scale: 0.001,
            offset: ORIGIN_Y,
        },
        z: Transform {
            scale: 0.001,
            offset: 0.0,
        },
    };
    builder
}

fn write_points(path: &Path, header: Header, count: usize) {
    let mut writer = Writer::from_path(path, header).unwrap();
    for i in 0..count {
        let mut point = Point::default();
        point.x = ORIGIN_X + (i % 1000) as f64 * 0.25;
        point.y = ORIGIN_Y + (i / 1000) as f64 * 0.25;
        point.z = 420.0 + (i % 7) as f64;
        writer.write_point(point).unwrap();
    }
    writer.close().unwrap();
}

/// Writes a small point cloud; a `.laz` path produces a compressed file.
pub fn write_cloud(path: &Path, vlrs: &[Vlr], count: usize) {
    let mut builder = builder((1, 2));
    builder.vlrs = vlrs.to_vec();
    write_points(path, builder.into_header().unwrap(), count);
}

/// Writes a LAS 1.4 cloud whose CRS lives in an extended VLR.
pub fn write_cloud_with_evlrs(path: &Path, evlrs: &[Vlr], count: usize) {
    let mut builder = builder((1, 4));
    builder.has_wkt_crs = true;
    builder.evlrs = evlrs.to_vec();
    write_points(path, builder.into_header().unwrap(), count);
}

/// Header only, for probing records without touching the disk.
pub fn header_with(vlrs: &[Vlr]) -> Header {
    let mut builder = builder((1, 2));
    builder.vlrs = vlrs.to_vec();
    builder.into_header().unwrap()
}

pub fn wkt_vlr(wkt: &str) -> Vlr {
    Vlr {
        user_id: PROJECTION_USER_ID.to_string(),
        record_id: 2112,
        description: "OGC WKT".to_string(),
        data: wkt.as_bytes().to_vec(),
    }
}

pub fn geo_key_vlr(keys: &[(u16, u16)]) -> Vlr {
    let mut words = vec![1, 1, 0, keys.len() as u16];
    for &(key, value) in keys {
        words.extend_from_slice(&[key, 0, 1, value]);
    }
    Vlr {
        user_id: PROJECTION_USER_ID.to_string(),
        record_id: 34735,
        description: "GeoKeyDirectoryTag".to_string(),
        data: words.iter().flat_map(|w| w.to_le_bytes()).collect(),
    }
}

/// GeoKey directory declaring a projected EPSG code.
pub fn projected_vlr(epsg: u16) -> Vlr {
    geo_key_vlr(&[(PROJECTED_CS_TYPE_GEO_KEY, epsg)])
}

/// GeoKey directory declaring a geographic EPSG code only.
pub fn geographic_vlr(epsg: u16) -> Vlr {
    geo_key_vlr(&[(1024, 2), (GEOGRAPHIC_TYPE_GEO_KEY, epsg)])
}
