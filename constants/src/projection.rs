/// GeoTIFF code meaning "user-defined", which carries no EPSG code.
pub const USER_DEFINED_GEO_KEY_VALUE: u16 = 32767;
