// src/file.rs

use std::{
    fs::{ self, File, OpenOptions },
    io::{ ErrorKind, Read, Seek, SeekFrom, Write },
    path::{ Path, PathBuf },
};

use crate::config::consts::BACKUP_INFIX;
use crate::error::{ Result, SyncError };
use crate::model::UpdatePayload;

/// Fail with `MissingTarget` unless `path` is an existing regular file.
pub fn ensure_target(path: &Path) -> Result<()> {
    if path.is_file() { Ok(()) } else { Err(SyncError::MissingTarget(path.to_path_buf())) }
}

/// `<path>.backup.<unix seconds>`, with `.<n>` appended on collision.
pub fn backup_path(path: &Path, stamp: i64, attempt: u32) -> PathBuf {
    let mut name = path.as_os_str().to_os_string();
    name.push(format!("{BACKUP_INFIX}{stamp}"));
    if attempt > 0 {
        name.push(format!(".{attempt}"));
    }
    PathBuf::from(name)
}

/// Write `contents` to a fresh sibling backup of `path`. Never overwrites.
pub fn create_backup(path: &Path, contents: &[u8]) -> Result<PathBuf> {
    let stamp = chrono::Utc::now().timestamp();
    let mut attempt = 0u32;
    loop {
        let candidate = backup_path(path, stamp, attempt);
        match OpenOptions::new().write(true).create_new(true).open(&candidate) {
            Ok(mut f) => {
                f.write_all(contents).map_err(|e| SyncError::io(&candidate, e))?;
                logd!("backup written to {}", candidate.display());
                return Ok(candidate);
            }
            Err(e) if e.kind() == ErrorKind::AlreadyExists => attempt += 1,
            Err(e) => return Err(SyncError::io(&candidate, e)),
        }
    }
}

/// Outcome of a read-modify-write.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rewritten {
    pub backup: PathBuf,
}

/// Read `path`, hand its text to `edit`, and write back what it returns.
///
/// - The file is held under an exclusive advisory lock for the whole cycle
///   when `lock` is set.
/// - `edit` returning `Ok(None)` (or identical text) leaves the file and
///   the backup directory untouched.
/// - A backup of the original bytes is made before the first byte is written.
pub fn rewrite_locked<F>(path: &Path, lock: bool, edit: F) -> Result<Option<Rewritten>>
where
    F: FnOnce(&str) -> Result<Option<String>>,
{
    ensure_target(path)?;
    let io = |e| SyncError::io(path, e);

    let mut file = OpenOptions::new().read(true).write(true).open(path).map_err(io)?;
    if lock {
        file.lock().map_err(io)?;
    }

    let mut original = String::new();
    file.read_to_string(&mut original).map_err(io)?;

    let updated = match edit(&original)? {
        Some(text) if text != original => text,
        _ => return Ok(None),
    };

    let backup = create_backup(path, original.as_bytes())?;
    write_all_from_start(&mut file, updated.as_bytes()).map_err(io)?;
    // lock released on drop
    Ok(Some(Rewritten { backup }))
}

fn write_all_from_start(file: &mut File, bytes: &[u8]) -> std::io::Result<()> {
    file.set_len(0)?;
    file.seek(SeekFrom::Start(0))?;
    file.write_all(bytes)?;
    file.flush()
}

/// Load an update payload, distinguishing missing, empty and malformed input.
pub fn load_payload(path: &Path) -> Result<UpdatePayload> {
    let text = match fs::read_to_string(path) {
        Ok(t) => t,
        Err(e) if e.kind() == ErrorKind::NotFound => {
            return Err(SyncError::MissingInput(path.to_path_buf()));
        }
        Err(e) => return Err(SyncError::io(path, e)),
    };
    if text.trim().is_empty() {
        return Err(SyncError::EmptyInput(path.to_path_buf()));
    }
    serde_json::from_str(&text).map_err(|source| SyncError::Json { path: path.to_path_buf(), source })
}
