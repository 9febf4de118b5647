use crate::error::{Result, TilerError};
use constants::format::{FormatInfo, UNCOMPRESSED_EXTENSION};
use indicatif::{ProgressBar, ProgressStyle};
use las::{Reader, Writer};
use std::fs::{self, File};
use std::io::BufReader;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Create LAS file reader for point cloud access.
/// Handles both .las and .laz compressed formats.
pub fn create_reader(file_path: &Path) -> std::result::Result<Reader, las::Error> {
    let file = File::open(file_path)?;
    let buf_reader = BufReader::new(file);
    Reader::new(buf_reader)
}

/// Returns the path the converter should read.
/// Compressed inputs are expanded to a `.las` sibling; anything else is
/// returned unchanged.
pub fn prepare_working_copy(input: &Path, format: &FormatInfo) -> Result<PathBuf> {
    if !format.compressed {
        return Ok(input.to_path_buf());
    }

    let las_path = input.with_extension(UNCOMPRESSED_EXTENSION);
    if is_up_to_date(&las_path, input) {
        info!(path = %las_path.display(), "Reusing existing uncompressed copy");
        return Ok(las_path);
    }

    let points = uncompress(input, &las_path).map_err(|source| TilerError::Decompression {
        path: input.to_path_buf(),
        source,
    })?;
    info!(
        from = %input.display(),
        to = %las_path.display(),
        points,
        "Uncompressed {} input",
        format.name
    );

    Ok(las_path)
}

/// True when `derived` exists and is at least as new as `source`.
fn is_up_to_date(derived: &Path, source: &Path) -> bool {
    let modified = |path: &Path| fs::metadata(path).and_then(|m| m.modified());
    match (modified(derived), modified(source)) {
        (Ok(derived_time), Ok(source_time)) => derived_time >= source_time,
        _ => false,
    }
}

/// Streams every point of `laz_path` into an uncompressed file at `las_path`.
///
/// Points go to a hidden `.part` sibling that only replaces `las_path` once
/// the writer has closed cleanly. A failed run leaves nothing behind that a
/// later run could mistake for an up-to-date copy.
fn uncompress(laz_path: &Path, las_path: &Path) -> std::result::Result<u64, las::Error> {
    let mut reader = create_reader(laz_path)?;
    let total_points = reader.header().number_of_points();
    debug!(total_points, "Read LAZ header");

    let dir = las_path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or(Path::new("."));
    // Removed on drop unless persisted.
    let part_path = tempfile::Builder::new()
        .prefix(".")
        .suffix(".las.part")
        .tempfile_in(dir)?
        .into_temp_path();

    // The writer picks compression from the extension, so the header is reused as is.
    let mut writer = Writer::from_path(&part_path, reader.header().clone())?;

    let pb = ProgressBar::new(total_points);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("[{bar:40.cyan/blue}] {pos}/{len} points ({percent}%) {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("▉▊▋▌▍▎▏ "),
    );
    pb.set_message("Uncompressing");

    let mut written = 0u64;
    for point_result in reader.points() {
        writer.write_point(point_result?)?;
        written += 1;

        if written % 50_000 == 0 {
            pb.set_position(written);
        }
    }
    writer.close()?;
    drop(writer);

    part_path
        .persist(las_path)
        .map_err(|e| las::Error::from(e.error))?;

    pb.finish_with_message("Uncompressed");
    Ok(written)
}
