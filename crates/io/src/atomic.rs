use std::io::Write;

/// Writes `bytes` to `path` atomically.
///
/// The bytes land in a temporary file in the *same directory* as the target
/// (a rename across file systems would fail), are flushed to disk, and the
/// temporary file is then renamed over `path`. On error the target is left as
/// it was.
///
/// # Errors
///
/// Returns an error if the temporary file cannot be created or written, or if
/// the final rename fails.
pub fn write_atomic(path: impl AsRef<std::path::Path>, bytes: &[u8]) -> std::io::Result<()> {
    let path = path.as_ref();
    let parent_dir = match path.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => dir,
        _ => std::path::Path::new("."),
    };

    let mut temp_save_file = tempfile::Builder::new()
        .prefix(".save_tmp_")
        .tempfile_in(parent_dir)?;

    temp_save_file.write_all(bytes)?;
    temp_save_file.as_file().sync_all()?;

    // `persist` hands back its own error type; keep the io::Error.
    temp_save_file.persist(path).map_err(|e| e.error)?;

    tracing::info!(path = %path.display(), len = bytes.len(), "saved");
    Ok(())
}
