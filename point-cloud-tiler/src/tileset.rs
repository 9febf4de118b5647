//! In-place URI fixes for tilesets written by the converter.
//!
//! Some converter versions write nested `tileset.N.json` files under
//! `points/` while the root tileset references them without the folder, and
//! the nested files prefix their own content URIs with `points/`, which then
//! resolves to `points/points/...`. Both are patched here by pattern; no
//! general relative path resolution is attempted.

use crate::error::{Result, TilerError};
use constants::tileset::{
    POINTS_DIR, POINTS_PREFIX, SUB_TILESET_PREFIX, SUB_TILESET_SUFFIX, TILESET_FILE,
};
use serde_json::Value;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Summary of one post-fix pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PostFixReport {
    /// The root `tileset.json` was rewritten.
    pub main_modified: bool,
    /// Number of nested tilesets under `points/` that were rewritten.
    pub sub_tilesets_modified: usize,
}

impl PostFixReport {
    pub fn is_unchanged(&self) -> bool {
        !self.main_modified && self.sub_tilesets_modified == 0
    }
}

/// Applies both URI fixes under `tiles_dir`. Idempotent.
pub fn post_fix_tileset_uris(tiles_dir: &Path) -> Result<PostFixReport> {
    let main_tileset = tiles_dir.join(TILESET_FILE);
    if !main_tileset.is_file() {
        return Err(TilerError::OutputNotFound(main_tileset));
    }

    let points_dir = tiles_dir.join(POINTS_DIR);
    let report = PostFixReport {
        main_modified: rewrite_child_tileset_uris(&main_tileset, &points_dir)?,
        sub_tilesets_modified: normalize_sub_tileset_uris(&points_dir)?,
    };

    info!(
        main_modified = report.main_modified,
        sub_tilesets_modified = report.sub_tilesets_modified,
        "Tileset URI post-fix complete"
    );
    Ok(report)
}

/// Points bare `tileset.N.json` references in the root tileset at `points/`
/// when the nested file actually lives there.
pub fn rewrite_child_tileset_uris(main_tileset: &Path, points_dir: &Path) -> Result<bool> {
    let Some(mut document) = load_document(main_tileset) else {
        return Ok(false);
    };

    let modified = walk_content_uris(&mut document, &mut |uri: &str| {
        let bare_sub_tileset = uri.starts_with(SUB_TILESET_PREFIX)
            && uri.ends_with(SUB_TILESET_SUFFIX)
            && !uri.contains('/');
        (bare_sub_tileset && points_dir.join(uri).is_file()).then(|| format!("{POINTS_PREFIX}{uri}"))
    });

    if modified {
        save_document(main_tileset, &document)?;
    }
    Ok(modified)
}

/// Strips the redundant `points/` prefix from content URIs of the nested
/// tilesets stored in `points_dir`. Returns the number of files rewritten.
pub fn normalize_sub_tileset_uris(points_dir: &Path) -> Result<usize> {
    let mut modified_count = 0;

    for path in sub_tileset_files(points_dir)? {
        let Some(mut document) = load_document(&path) else {
            continue;
        };

        let modified = walk_content_uris(&mut document, &mut |uri: &str| {
            let trimmed = uri.strip_prefix(POINTS_PREFIX)?;
            points_dir
                .join(trimmed)
                .is_file()
                .then(|| trimmed.to_string())
        });

        if modified {
            save_document(&path, &document)?;
            debug!(path = %path.display(), "Normalized nested tileset URIs");
            modified_count += 1;
        }
    }

    Ok(modified_count)
}

/// `tileset.*.json` files directly inside `points_dir`, sorted by name.
fn sub_tileset_files(points_dir: &Path) -> Result<Vec<PathBuf>> {
    if !points_dir.is_dir() {
        return Ok(Vec::new());
    }

    let entries = fs::read_dir(points_dir)
        .map_err(|e| TilerError::io(format!("listing {}", points_dir.display()), e))?;

    let mut files: Vec<PathBuf> = entries
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|path| {
            path.is_file()
                && path.file_name().is_some_and(|name| {
                    let name = name.to_string_lossy();
                    name.starts_with(SUB_TILESET_PREFIX)
                        && name.ends_with(SUB_TILESET_SUFFIX)
                        && name.len() > SUB_TILESET_PREFIX.len() + SUB_TILESET_SUFFIX.len()
                })
        })
        .collect();
    files.sort();
    Ok(files)
}

/// Visits `content.uri` and every `contents[].uri` of each tile, starting
/// at `root` and descending through `children`. `fix` returns the
/// replacement URI, if any. Returns whether anything changed.
fn walk_content_uris(document: &mut Value, fix: &mut impl FnMut(&str) -> Option<String>) -> bool {
    match document.get_mut("root") {
        Some(root) => walk_tile(root, fix),
        None => false,
    }
}

fn walk_tile(tile: &mut Value, fix: &mut impl FnMut(&str) -> Option<String>) -> bool {
    let Some(tile) = tile.as_object_mut() else {
        return false;
    };
    let mut modified = false;

    if let Some(content) = tile.get_mut("content") {
        modified |= fix_uri(content, fix);
    }
    if let Some(Value::Array(contents)) = tile.get_mut("contents") {
        for content in contents {
            modified |= fix_uri(content, fix);
        }
    }
    if let Some(Value::Array(children)) = tile.get_mut("children") {
        for child in children {
            modified |= walk_tile(child, fix);
        }
    }

    modified
}

fn fix_uri(content: &mut Value, fix: &mut impl FnMut(&str) -> Option<String>) -> bool {
    let Some(Value::String(uri)) = content.get_mut("uri") else {
        return false;
    };
    match fix(uri.as_str()) {
        Some(fixed) if fixed != *uri => {
            *uri = fixed;
            true
        }
        _ => false,
    }
}

/// Unreadable or invalid documents are skipped, not fatal.
fn load_document(path: &Path) -> Option<Value> {
    let bytes = match fs::read(path) {
        Ok(bytes) => bytes,
        Err(e) => {
            warn!(path = %path.display(), error = %e, "Could not read tileset, skipping");
            return None;
        }
    };
    match serde_json::from_slice(&bytes) {
        Ok(document) => Some(document),
        Err(e) => {
            warn!(path = %path.display(), error = %e, "Invalid tileset JSON, skipping");
            None
        }
    }
}

/// Writes compact JSON, matching the converter's own output.
fn save_document(path: &Path, document: &Value) -> Result<()> {
    let json = serde_json::to_string(document)
        .map_err(|e| TilerError::io(format!("serializing {}", path.display()), e.into()))?;
    fs::write(path, json).map_err(|e| TilerError::io(format!("writing {}", path.display()), e))
}
