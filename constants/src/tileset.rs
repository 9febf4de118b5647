/// Root tileset written by the converter.
pub const TILESET_FILE: &str = "tileset.json";

/// Directory holding tiles and nested tilesets.
pub const POINTS_DIR: &str = "points";

/// Prefix that nested tilesets wrongly carry on their content URIs.
pub const POINTS_PREFIX: &str = "points/";

pub const SUB_TILESET_PREFIX: &str = "tileset.";
pub const SUB_TILESET_SUFFIX: &str = ".json";

/// Converter output captured for diagnostics.
pub const TILES_LOG_FILE: &str = "tiles_log.txt";
