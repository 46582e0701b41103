//! Key-addressable byte-stream archive (§6): an external collaborator from
//! the core's point of view, but exercised here with a small bincode-backed
//! implementation so the index builder has something concrete to write to.

use std::collections::HashMap;
use std::io::Write as _;

use crate::error::ArchiveError;

/// A handle to one section being written. Offsets are observable via
/// `writer.pos()` for downstream indexing.
pub struct SectionWriter {
    tag: String,
    buffer: Vec<u8>,
}

impl SectionWriter {
    #[must_use]
    pub fn pos(&self) -> u64 {
        self.buffer.len() as u64
    }
}

impl std::io::Write for SectionWriter {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.buffer.write(buf)
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

/// A key-addressable archive of sections, each independently readable once
/// finalised. `Archive::open` is the only I/O entry point; writers are
/// finalised on success, discarded on failure (§7: "partial output must not
/// be committed").
pub struct Archive {
    path: std::path::PathBuf,
    sections: HashMap<String, Vec<u8>>,
}

impl Archive {
    /// Opens (or creates) the archive at `path` for writing. Existing
    /// sections, if any, are loaded so callers may extend an archive rather
    /// than always starting empty.
    ///
    /// # Errors
    /// Returns [`ArchiveError::Io`] if the file exists but cannot be read,
    /// or [`ArchiveError::Decode`] if it exists but is not a valid archive.
    pub fn open(path: impl Into<std::path::PathBuf>) -> Result<Self, ArchiveError> {
        let path = path.into();
        let sections = match std::fs::read(&path) {
            Ok(bytes) => bincode::deserialize(&bytes).map_err(|source| ArchiveError::Decode { tag: path.display().to_string(), source })?,
            Err(source) if source.kind() == std::io::ErrorKind::NotFound => HashMap::new(),
            Err(source) => return Err(ArchiveError::Io { tag: path.display().to_string(), source }),
        };
        Ok(Self { path, sections })
    }

    #[must_use]
    pub fn get_writer(&self, tag: &str) -> SectionWriter {
        SectionWriter { tag: tag.to_owned(), buffer: Vec::new() }
    }

    /// # Errors
    /// Returns [`ArchiveError::MissingSection`] if `tag` has not been
    /// written (or loaded) yet.
    pub fn get_reader(&self, tag: &str) -> Result<&[u8], ArchiveError> {
        self.sections.get(tag).map(Vec::as_slice).ok_or_else(|| ArchiveError::MissingSection { tag: tag.to_owned() })
    }

    /// Commits a finished writer's bytes under its tag.
    pub fn commit(&mut self, writer: SectionWriter) {
        self.sections.insert(writer.tag, writer.buffer);
    }

    /// Persists all committed sections to disk.
    ///
    /// # Errors
    /// Returns [`ArchiveError::Io`] on a filesystem failure.
    pub fn finish(&self) -> Result<(), ArchiveError> {
        let encoded = bincode::serialize(&self.sections).expect("HashMap<String, Vec<u8>> is always serialisable");
        std::fs::write(&self.path, encoded).map_err(|source| ArchiveError::Io { tag: self.path.display().to_string(), source })
    }

    #[cfg(test)]
    fn open_in_memory() -> Self {
        Self { path: std::path::PathBuf::from(":memory:"), sections: HashMap::new() }
    }
}
