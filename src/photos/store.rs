//! File area for uploaded attendance photos.
//!
//! Files are named `{random-id}_{original-name}`; the store keeps no index and
//! knows nothing about which record points at which file.

use crate::errors::{AppError, AppResult};
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use uuid::Uuid;

/// Length of the hex id prefix produced by `Uuid::simple()`.
const ID_LEN: usize = 32;

#[derive(Debug, Clone)]
pub struct PhotoStore {
    root: PathBuf,
}

impl PhotoStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn ensure_dir(&self) -> AppResult<()> {
        fs::create_dir_all(&self.root)?;
        Ok(())
    }

    /// Persist `bytes` under a fresh unique name and return its path.
    ///
    /// Bytes go to a `.part` file that is renamed into place only after a
    /// successful flush, so a failed write never leaves a file under the
    /// returned name.
    pub fn save(&self, bytes: &[u8], original_name: &str) -> AppResult<PathBuf> {
        let base = sanitize_name(original_name);
        let name = format!("{}_{}", Uuid::new_v4().simple(), base);
        let final_path = self.root.join(&name);
        let part_path = self.root.join(format!("{name}.part"));

        let write = || -> io::Result<()> {
            fs::create_dir_all(&self.root)?;
            let mut file = fs::File::create(&part_path)?;
            file.write_all(bytes)?;
            file.sync_all()?;
            fs::rename(&part_path, &final_path)
        };

        if let Err(e) = write() {
            let _ = fs::remove_file(&part_path);
            return Err(AppError::PhotoWrite(format!("{}: {}", final_path.display(), e)));
        }

        Ok(final_path)
    }

    /// Idempotent: a file that is already gone is not an error.
    pub fn delete(&self, path: &Path) -> AppResult<()> {
        match fs::remove_file(path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }

    pub fn read(&self, path: &Path) -> AppResult<Vec<u8>> {
        match fs::read(path) {
            Ok(bytes) => Ok(bytes),
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                Err(AppError::PhotoNotFound(path.to_path_buf()))
            }
            Err(e) => Err(e.into()),
        }
    }

    pub fn exists(&self, path: &Path) -> bool {
        path.is_file()
    }
}

/// Keep only the final path component so a crafted name cannot escape the
/// photo directory.
fn sanitize_name(original: &str) -> String {
    let base = original
        .rsplit(['/', '\\'])
        .next()
        .unwrap_or_default()
        .trim();

    match base {
        "" | "." | ".." => "photo".to_string(),
        b => b.to_string(),
    }
}

/// Original base file name of a stored photo (the part after the random id).
pub fn original_name(path: &Path) -> String {
    let file = path
        .file_name()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_default();

    match file.split_once('_') {
        Some((id, rest))
            if id.len() == ID_LEN && id.chars().all(|c| c.is_ascii_hexdigit()) && !rest.is_empty() =>
        {
            rest.to_string()
        }
        _ => file,
    }
}

/// MIME tag guessed from the file extension.
pub fn image_mime(path: &Path) -> &'static str {
    let ext = path
        .extension()
        .map(|e| e.to_string_lossy().to_ascii_lowercase())
        .unwrap_or_default();

    match ext.as_str() {
        "jpg" | "jpeg" => "image/jpeg",
        "png" => "image/png",
        "gif" => "image/gif",
        "webp" => "image/webp",
        "heic" => "image/heic",
        _ => "application/octet-stream",
    }
}
