use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use bincode::Options;
use tracing::info;

use crate::forest::Forest;

/// Leading bytes of every forest snapshot file.
pub const SNAPSHOT_MAGIC: [u8; 4] = *b"FRST";
pub const SNAPSHOT_FORMAT_VERSION: u32 = 1;
const HEADER_LEN: usize = SNAPSHOT_MAGIC.len() + 4;

/// Errors that can occur during snapshot operations.
#[derive(Debug)]
pub enum SnapshotError {
    Io(io::Error),
    Serialize(String),
    Deserialize(String),
    BadMagic(PathBuf),
    UnsupportedVersion { found: u32, expected: u32 },
    Unnamed,
}

impl std::fmt::Display for SnapshotError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SnapshotError::Io(e) => write!(f, "I/O error: {}", e),
            SnapshotError::Serialize(e) => write!(f, "Serialization error: {}", e),
            SnapshotError::Deserialize(e) => write!(f, "Deserialization error: {}", e),
            SnapshotError::BadMagic(path) => {
                write!(f, "Not a forest snapshot: {}", path.display())
            }
            SnapshotError::UnsupportedVersion { found, expected } => write!(
                f,
                "Unsupported snapshot version {} (expected {})",
                found, expected
            ),
            SnapshotError::Unnamed => write!(f, "Forest has no name to save under"),
        }
    }
}

impl std::error::Error for SnapshotError {}

impl From<io::Error> for SnapshotError {
    fn from(e: io::Error) -> Self {
        SnapshotError::Io(e)
    }
}

/// Fixed-width little-endian body that must span the rest of the file.
fn body_options() -> impl Options {
    bincode::DefaultOptions::new()
        .with_fixint_encoding()
        .reject_trailing_bytes()
}

/// Build the `.db` path for a forest base name.
pub fn snapshot_path(data_dir: &Path, name: &str) -> PathBuf {
    data_dir.join(format!("{}.db", name))
}

fn encode(forest: &Forest) -> Result<Vec<u8>, SnapshotError> {
    let body = body_options()
        .serialize(forest)
        .map_err(|e| SnapshotError::Serialize(e.to_string()))?;
    let mut encoded = Vec::with_capacity(HEADER_LEN + body.len());
    encoded.extend_from_slice(&SNAPSHOT_MAGIC);
    encoded.extend_from_slice(&SNAPSHOT_FORMAT_VERSION.to_le_bytes());
    encoded.extend_from_slice(&body);
    Ok(encoded)
}

fn decode(data: &[u8], path: &Path) -> Result<Forest, SnapshotError> {
    if data.len() < HEADER_LEN || data[..SNAPSHOT_MAGIC.len()] != SNAPSHOT_MAGIC {
        return Err(SnapshotError::BadMagic(path.to_path_buf()));
    }
    let mut version = [0u8; 4];
    version.copy_from_slice(&data[SNAPSHOT_MAGIC.len()..HEADER_LEN]);
    let found = u32::from_le_bytes(version);
    if found != SNAPSHOT_FORMAT_VERSION {
        return Err(SnapshotError::UnsupportedVersion {
            found,
            expected: SNAPSHOT_FORMAT_VERSION,
        });
    }
    body_options()
        .deserialize(&data[HEADER_LEN..])
        .map_err(|e| SnapshotError::Deserialize(e.to_string()))
}

/// Save a forest to `<data_dir>/<forest name>.db`, replacing any existing file.
///
/// Writes to a temporary file first, then atomically renames to the final path.
/// This ensures a partial write never corrupts an existing snapshot.
pub fn save_forest(forest: &Forest, data_dir: &Path) -> Result<PathBuf, SnapshotError> {
    let name = forest.name().ok_or(SnapshotError::Unnamed)?;
    let target = snapshot_path(data_dir, name);
    // Temp file sits beside the target; the name may carry a subdirectory.
    let file_name = target
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| format!("{}.db", name));
    let tmp = target.with_file_name(format!(".{}.tmp", file_name));

    let encoded = encode(forest)?;

    // Write to temp file, then atomic rename
    if let Err(e) = fs::write(&tmp, &encoded) {
        let _ = fs::remove_file(&tmp);
        return Err(SnapshotError::Io(e));
    }

    if let Err(e) = fs::rename(&tmp, &target) {
        let _ = fs::remove_file(&tmp);
        return Err(SnapshotError::Io(e));
    }

    info!(path = %target.display(), trees = forest.len(), "Saved forest snapshot");
    Ok(target)
}

/// Load a forest from a snapshot file.
pub fn load_forest(path: &Path) -> Result<Forest, SnapshotError> {
    let data = fs::read(path)?;
    let forest = decode(&data, path)?;
    info!(path = %path.display(), trees = forest.len(), "Loaded forest snapshot");
    Ok(forest)
}
