/// Point cloud file formats accepted as converter input.
#[derive(Debug)]
pub struct FormatInfo {
    pub extension: &'static str,
    pub name: &'static str,
    pub compressed: bool,
}

pub const FORMAT_MAP: &[FormatInfo] = &[
    FormatInfo {
        extension: "las",
        name: "LAS",
        compressed: false,
    },
    FormatInfo {
        extension: "laz",
        name: "LAZ",
        compressed: true,
    },
];

/// Extension used for the uncompressed working copy of a compressed input.
pub const UNCOMPRESSED_EXTENSION: &str = "las";

/// Looks up a format by file extension, ignoring ASCII case.
pub fn find_format(extension: &str) -> Option<&'static FormatInfo> {
    FORMAT_MAP
        .iter()
        .find(|f| f.extension.eq_ignore_ascii_case(extension))
}
