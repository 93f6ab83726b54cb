use std::collections::BTreeMap;
use std::fs;
use std::io::{self, ErrorKind};
use std::path::Path;
use tempfile::TempDir;
use tracing::debug;

/// Scratch space for the files of one export.
///
/// Every export acquires its own storage, so concurrent exports never share
/// file names or buffers. Whatever a storage holds is released when it is
/// dropped.
pub trait Storage {
    fn write(&mut self, name: &str, contents: &[u8]) -> io::Result<()>;
    fn read(&self, name: &str) -> io::Result<Vec<u8>>;
}

/// A uniquely named temporary directory, deleted on drop.
pub struct TempDirStorage {
    dir: TempDir,
}

impl TempDirStorage {
    pub fn new() -> io::Result<Self> {
        let dir = tempfile::Builder::new()
            .prefix("parcel-export-")
            .tempdir()?;
        debug!(path = %dir.path().display(), "acquired scratch directory");
        Ok(TempDirStorage { dir })
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }
}

impl Storage for TempDirStorage {
    fn write(&mut self, name: &str, contents: &[u8]) -> io::Result<()> {
        fs::write(self.dir.path().join(checked_name(name)?), contents)
    }

    fn read(&self, name: &str) -> io::Result<Vec<u8>> {
        fs::read(self.dir.path().join(checked_name(name)?))
    }
}

#[derive(Debug, Default)]
pub struct MemoryStorage {
    files: BTreeMap<String, Vec<u8>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        MemoryStorage::default()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.files.keys().map(String::as_str)
    }
}

impl Storage for MemoryStorage {
    fn write(&mut self, name: &str, contents: &[u8]) -> io::Result<()> {
        self.files
            .insert(checked_name(name)?.to_string(), contents.to_vec());
        Ok(())
    }

    fn read(&self, name: &str) -> io::Result<Vec<u8>> {
        self.files.get(name).cloned().ok_or_else(|| {
            io::Error::new(ErrorKind::NotFound, format!("{} not in storage", name))
        })
    }
}

// names are plain file names, never paths
fn checked_name(name: &str) -> io::Result<&str> {
    if name.is_empty() || name.contains(|c: char| c == '/' || c == '\\') || name == ".." {
        return Err(io::Error::new(
            ErrorKind::InvalidInput,
            format!("invalid scratch file name {:?}", name),
        ));
    }
    Ok(name)
}

#[cfg(test)]
mod temp_dir_storage {
    use super::*;

    #[test]
    fn round_trip_and_cleanup() {
        let mut storage = TempDirStorage::new().unwrap();
        let path = storage.path().to_path_buf();
        storage.write("parcels.prj", b"GEOGCS").unwrap();
        assert_eq!(storage.read("parcels.prj").unwrap(), b"GEOGCS");
        assert!(path.join("parcels.prj").exists());
        drop(storage);
        assert!(!path.exists());
    }

    #[test]
    fn each_storage_gets_its_own_directory() {
        let a = TempDirStorage::new().unwrap();
        let b = TempDirStorage::new().unwrap();
        assert_ne!(a.path(), b.path());
    }

    #[test]
    fn rejects_paths() {
        let mut storage = TempDirStorage::new().unwrap();
        assert!(storage.write("../escape.shp", b"").is_err());
        assert!(storage.read("a/b.shp").is_err());
    }
}

#[cfg(test)]
mod memory_storage {
    use super::*;

    #[test]
    fn missing_file() {
        let storage = MemoryStorage::new();
        let err = storage.read("parcels.shp").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound);
    }

    #[test]
    fn lists_names() {
        let mut storage = MemoryStorage::new();
        storage.write("b.dbf", b"1").unwrap();
        storage.write("a.shp", b"2").unwrap();
        assert_eq!(storage.names().collect::<Vec<_>>(), ["a.shp", "b.dbf"]);
    }
}
