// src/export/archive.rs

use crate::errors::{AppError, AppResult};
use crate::models::AttendanceRecord;
use crate::photos::{PhotoStore, original_name};
use std::collections::HashSet;
use std::io::{self, Cursor, Write};
use std::path::Path;
use zip::write::FileOptions;
use zip::{CompressionMethod, ZipWriter};

/// Zip every photo of `subset` that still exists, named by its original
/// base file name. Unresolvable paths are skipped; an empty selection gives
/// an empty (but valid) archive.
pub(crate) fn bundle_photos(subset: &[AttendanceRecord], photos: &PhotoStore) -> AppResult<Vec<u8>> {
    let mut zip = ZipWriter::new(Cursor::new(Vec::new()));

    let options: FileOptions<'_, ()> =
        FileOptions::default().compression_method(CompressionMethod::Deflated);

    let mut used: HashSet<String> = HashSet::new();

    for rec in subset {
        let Some(stored) = rec.photo_path.as_deref() else {
            continue;
        };
        let path = Path::new(stored);

        let bytes = match photos.read(path) {
            Ok(b) => b,
            Err(AppError::PhotoNotFound(_)) => continue,
            Err(e) => return Err(e),
        };

        let name = unique_entry_name(&original_name(path), &mut used);

        zip.start_file(name, options).map_err(io::Error::other)?;
        zip.write_all(&bytes)?;
    }

    let cursor = zip.finish().map_err(io::Error::other)?;
    Ok(cursor.into_inner())
}

/// `photo.jpg`, `photo (2).jpg`, `photo (3).jpg`, ...
fn unique_entry_name(name: &str, used: &mut HashSet<String>) -> String {
    if used.insert(name.to_string()) {
        return name.to_string();
    }

    let (stem, ext) = match name.rsplit_once('.') {
        Some((s, e)) if !s.is_empty() => (s, format!(".{e}")),
        _ => (name, String::new()),
    };

    let mut n = 2;
    loop {
        let candidate = format!("{stem} ({n}){ext}");
        if used.insert(candidate.clone()) {
            return candidate;
        }
        n += 1;
    }
}
