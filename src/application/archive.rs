use std::io::{Cursor, Write};

use bytes::Bytes;
use thiserror::Error;
use zip::write::FileOptions;
use zip::{CompressionMethod, ZipWriter};

#[derive(Error, Debug)]
pub enum ArchiveError {
    #[error("Duplicate archive entry: {0}")]
    DuplicateEntry(String),

    #[error("Failed to build archive: {0}")]
    Zip(#[from] zip::result::ZipError),

    #[error("Failed to build archive: {0}")]
    Io(#[from] std::io::Error),
}

/// In-memory zip under construction. Entry names are unique and keep their
/// insertion order. `finalize` consumes the archive, so it runs once.
#[derive(Debug, Default)]
pub struct Archive {
    entries: Vec<(String, Bytes)>,
}

impl Archive {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, name: impl Into<String>, payload: Bytes) -> Result<(), ArchiveError> {
        let name = name.into();
        if self.entries.iter().any(|(existing, _)| *existing == name) {
            return Err(ArchiveError::DuplicateEntry(name));
        }

        self.entries.push((name, payload));
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[cfg(test)]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    #[cfg(test)]
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(name, _)| name.as_str())
    }

    pub fn finalize(self) -> Result<Vec<u8>, ArchiveError> {
        let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
        let options = FileOptions::default().compression_method(CompressionMethod::Deflated);

        for (name, payload) in &self.entries {
            writer.start_file(name.as_str(), options)?;
            writer.write_all(payload)?;
        }

        Ok(writer.finish()?.into_inner())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Read;
    use zip::ZipArchive;

    fn read_entry(bytes: &[u8], name: &str) -> Vec<u8> {
        let mut archive = ZipArchive::new(Cursor::new(bytes)).unwrap();
        let mut file = archive.by_name(name).unwrap();
        let mut content = Vec::new();
        file.read_to_end(&mut content).unwrap();
        content
    }

    #[test]
    fn test_finalize_contains_every_entry() {
        let mut archive = Archive::new();
        archive
            .insert("item-1.png", Bytes::from_static(b"first"))
            .unwrap();
        archive
            .insert("item-3.png", Bytes::from_static(b"third"))
            .unwrap();
        assert_eq!(archive.names().collect::<Vec<_>>(), vec!["item-1.png", "item-3.png"]);

        let bytes = archive.finalize().unwrap();
        assert_eq!(ZipArchive::new(Cursor::new(&bytes[..])).unwrap().len(), 2);
        assert_eq!(read_entry(&bytes, "item-1.png"), b"first");
        assert_eq!(read_entry(&bytes, "item-3.png"), b"third");
    }

    #[test]
    fn test_duplicate_names_are_rejected() {
        let mut archive = Archive::new();
        archive.insert("a.png", Bytes::from_static(b"1")).unwrap();

        let err = archive
            .insert("a.png", Bytes::from_static(b"2"))
            .unwrap_err();
        assert!(matches!(err, ArchiveError::DuplicateEntry(name) if name == "a.png"));
        assert_eq!(archive.len(), 1);
    }

    #[test]
    fn test_empty_archive_is_still_a_zip() {
        let archive = Archive::new();
        assert!(archive.is_empty());

        let bytes = archive.finalize().unwrap();
        assert_eq!(ZipArchive::new(Cursor::new(&bytes[..])).unwrap().len(), 0);
    }
}
