//! Session file storage.
//!
//! Each operation is a complete read-then-close or write-then-close; no
//! handle is held across request execution. Saves go through a temp file
//! and a rename so a crashed invocation never leaves a torn file.
//! Concurrent invocations against the same file race last-writer-wins.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde_json::Value;

use crate::base::error::SessionError;

/// Read and parse a session file.
pub fn load(path: &Path) -> Result<Value, SessionError> {
    let contents = match fs::read_to_string(path) {
        Ok(contents) => contents,
        Err(err) if err.kind() == io::ErrorKind::NotFound => {
            return Err(SessionError::StorageNotFound {
                path: path.display().to_string(),
            });
        }
        Err(err) => return Err(err.into()),
    };

    serde_json::from_str(&contents).map_err(|err| SessionError::StorageParse {
        path: path.display().to_string(),
        message: err.to_string(),
    })
}

/// Serialize and atomically replace a session file, creating parent
/// directories as needed.
pub fn save(path: &Path, data: &Value) -> Result<(), SessionError> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }

    let mut json = serde_json::to_string_pretty(data)
        .map_err(|err| io::Error::new(io::ErrorKind::InvalidData, err))?;
    json.push('\n');

    let mut tmp = path.as_os_str().to_owned();
    tmp.push(".tmp");
    let tmp = PathBuf::from(tmp);
    fs::write(&tmp, json)?;
    fs::rename(&tmp, path)?;
    Ok(())
}
