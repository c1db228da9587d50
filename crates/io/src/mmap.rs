#[derive(Debug)]
pub struct MappedFile {
    _file: std::fs::File,
    /// `None` for zero-length files, which cannot be mapped portably.
    mmap: Option<memmap2::Mmap>,
    path: std::path::PathBuf,
}

impl MappedFile {
    /// # Errors
    ///
    /// - `std::io::Error` if the file cannot be opened, stat'ed or mapped.
    pub fn open(path: impl AsRef<std::path::Path>) -> std::io::Result<Self> {
        let path_buf = path.as_ref().to_path_buf();
        let file = std::fs::File::open(&path_buf)?;
        let len = file.metadata()?.len();

        let mmap = if len == 0 {
            None
        } else {
            // SAFETY:
            // - File is opened read-only
            // - We keep the file handle alive in struct
            // - Caller only gets immutable &[u8]
            Some(unsafe { memmap2::Mmap::map(&file)? })
        };

        tracing::debug!(path = %path_buf.display(), len, "mapped file");

        Ok(Self {
            _file: file,
            mmap,
            path: path_buf,
        })
    }

    #[inline]
    #[must_use]
    pub fn as_slice(&self) -> &[u8] {
        self.mmap.as_deref().unwrap_or(&[])
    }

    /// File length in bytes.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.as_slice().len()
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    #[inline]
    #[must_use]
    pub fn path(&self) -> &std::path::Path {
        &self.path
    }

    /// The final path component, used to derive the language and the
    /// suggested save name.
    #[must_use]
    pub fn file_name(&self) -> Option<&str> {
        self.path.file_name().and_then(|name| name.to_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_maps_file_contents() {
        let mut tmp = tempfile::NamedTempFile::new().unwrap();
        tmp.write_all(b"Sub Main\nEnd Sub\n").unwrap();
        tmp.as_file().sync_all().unwrap();

        let mapped = MappedFile::open(tmp.path()).unwrap();
        assert_eq!(mapped.as_slice(), b"Sub Main\nEnd Sub\n");
        assert_eq!(mapped.len(), 17);
        assert!(!mapped.is_empty());
        assert_eq!(mapped.path(), tmp.path());
    }

    #[test]
    fn test_empty_file_maps_to_empty_slice() {
        let tmp = tempfile::NamedTempFile::new().unwrap();
        let mapped = MappedFile::open(tmp.path()).unwrap();
        assert!(mapped.is_empty());
        assert_eq!(mapped.as_slice(), b"");
    }

    #[test]
    fn test_missing_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = MappedFile::open(dir.path().join("nope.txt")).unwrap_err();
        assert_eq!(err.kind(), std::io::ErrorKind::NotFound);
    }

    #[test]
    fn test_file_name() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("report.sql");
        std::fs::write(&path, "select 1").unwrap();

        let mapped = MappedFile::open(&path).unwrap();
        assert_eq!(mapped.file_name(), Some("report.sql"));
    }
}
