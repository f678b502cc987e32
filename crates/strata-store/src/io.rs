//! JSON file I/O and atomic file operations

use crate::{Result, StoreError};
use serde::de::DeserializeOwned;
use std::io::{ErrorKind, Write};
use std::path::Path;

/// Read and decode a JSON document, separating "absent" from "unreadable"
pub fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let bytes = match std::fs::read(path) {
        Ok(bytes) => bytes,
        Err(e) if e.kind() == ErrorKind::NotFound => {
            let name = path
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_else(|| path.display().to_string());
            return Err(StoreError::NotFound(name));
        }
        Err(e) => return Err(StoreError::io(path, e)),
    };

    serde_json::from_slice(&bytes).map_err(|e| StoreError::malformed(path, e))
}

/// Write data atomically using temp file + rename
pub fn atomic_write(path: &Path, data: &[u8]) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(|e| StoreError::io(parent, e))?;
    }

    let temp_path = path.with_extension("tmp");
    let mut file = std::fs::File::create(&temp_path).map_err(|e| StoreError::io(&temp_path, e))?;
    file.write_all(data)
        .and_then(|_| file.sync_all())
        .map_err(|e| StoreError::io(&temp_path, e))?;
    drop(file);

    std::fs::rename(&temp_path, path).map_err(|e| StoreError::io(path, e))?;
    Ok(())
}
