use std::{
    fs,
    io::ErrorKind,
    path::{Path, PathBuf},
};

use tracing::debug;

use crate::{
    key_value_store::Snapshot,
    rdb::{rdb_writer::encode_snapshot, Persistence, PersistenceError, RdbParser},
};

/// Snapshot persistence in the RDB file format.
#[derive(Debug, Clone)]
pub struct RdbFile {
    path: PathBuf,
}

impl RdbFile {
    pub fn new(rdb_directory: impl AsRef<Path>, rdb_filename: impl AsRef<Path>) -> Self {
        Self {
            path: rdb_directory.as_ref().join(rdb_filename),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Persistence for RdbFile {
    /// Writes to a sibling temporary file first and renames it into place, so
    /// a failed save leaves the previous snapshot intact.
    fn persist(&self, snapshot: &Snapshot) -> Result<(), PersistenceError> {
        let bytes = encode_snapshot(snapshot);
        let temporary_path = self.path.with_extension("rdb.tmp");

        fs::write(&temporary_path, &bytes)?;
        fs::rename(&temporary_path, &self.path)?;

        debug!(path = %self.path.display(), bytes = bytes.len(), "rdb file written");
        Ok(())
    }

    fn load(&self) -> Result<Snapshot, PersistenceError> {
        let bytes = match fs::read(&self.path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!(path = %self.path.display(), "no rdb file to load");
                return Ok(Snapshot::default());
            }
            Err(e) => return Err(e.into()),
        };

        let mut parser = RdbParser::new();
        parser.parse(&bytes)?;

        Ok(parser.into_snapshot())
    }
}
