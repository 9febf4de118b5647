#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

#[path = "../../src/test_util.rs"]
mod test_util;

pub use test_util::{projected_vlr, write_cloud};

/// Mimics a converter that writes nested tilesets under `points/` with the
/// URI layout the post-fix has to repair. Arguments are recorded in
/// `converter_args.txt` inside the output directory.
const FAKE_CONVERTER: &str = r#"#!/bin/sh
out=""
prev=""
for arg in "$@"; do
    if [ "$prev" = "--out" ]; then out="$arg"; fi
    prev="$arg"
done
printf '%s\n' "$@" > "$out/converter_args.txt"
mkdir -p "$out/points"
printf 'pnts' > "$out/points/r.pnts"
printf 'pnts' > "$out/points/r0.pnts"
printf '%s' '{"asset":{"version":"1.0"},"root":{"content":{"uri":"points/r0.pnts"}}}' > "$out/points/tileset.1.json"
printf '%s' '{"asset":{"version":"1.0"},"geometricError":50,"root":{"content":{"uri":"points/r.pnts"},"children":[{"content":{"uri":"tileset.1.json"}}]}}' > "$out/tileset.json"
echo "Writing 3dtiles"
"#;

const FAILING_CONVERTER: &str = r#"#!/bin/sh
echo "reading input"
echo "pyproj.exceptions.CRSError: Invalid projection" >&2
exit 2
"#;

pub struct Converters {
    pub fake: PathBuf,
    pub failing: PathBuf,
}

/// Scripts are written once per test binary so no test spawns an
/// executable another thread still has open for writing.
pub fn converters() -> &'static Converters {
    static CONVERTERS: OnceLock<Converters> = OnceLock::new();
    CONVERTERS.get_or_init(|| {
        let dir = tempfile::tempdir().unwrap().keep();
        Converters {
            fake: write_script(&dir.join("py3dtiles"), FAKE_CONVERTER),
            failing: write_script(&dir.join("py3dtiles-failing"), FAILING_CONVERTER),
        }
    })
}

fn write_script(path: &Path, body: &str) -> PathBuf {
    use std::os::unix::fs::PermissionsExt;

    fs::write(path, body).unwrap();
    fs::set_permissions(path, fs::Permissions::from_mode(0o755)).unwrap();
    path.to_path_buf()
}
