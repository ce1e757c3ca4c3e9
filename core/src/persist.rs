use std::fs::{create_dir_all, File};
use std::io::{Read, Write};
use std::path::Path;

use crate::error::EngineError;
use crate::index::Index;

/// Serialize the whole index to a single opaque blob.
pub fn save_index(path: &Path, index: &Index) -> Result<(), EngineError> {
    if let Some(dir) = path.parent() {
        create_dir_all(dir).map_err(|e| EngineError::Persistence(e.to_string()))?;
    }
    let bytes = bincode::serialize(index).map_err(|e| EngineError::Persistence(e.to_string()))?;
    let mut f = File::create(path).map_err(|e| EngineError::Persistence(e.to_string()))?;
    f.write_all(&bytes).map_err(|e| EngineError::Persistence(e.to_string()))?;
    tracing::info!(path = %path.display(), bytes = bytes.len(), "index exported");
    Ok(())
}

/// Deserialize an index blob. On failure the caller's in-memory index is
/// untouched; the error is reported and nothing is partially overwritten.
pub fn load_index(path: &Path) -> Result<Index, EngineError> {
    let mut f = File::open(path)
        .map_err(|e| EngineError::Persistence(format!("{}: {e}", path.display())))?;
    let mut buf = Vec::new();
    f.read_to_end(&mut buf).map_err(|e| EngineError::Persistence(e.to_string()))?;
    let index = bincode::deserialize(&buf)
        .map_err(|e| EngineError::Persistence(format!("{}: {e}", path.display())))?;
    Ok(index)
}
