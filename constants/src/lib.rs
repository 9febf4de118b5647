pub mod converter;
pub mod format;
pub mod projection;
pub mod tileset;
