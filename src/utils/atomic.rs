use std::fs;
use std::io::{self, Write};
use std::path::Path;
use tempfile::NamedTempFile;

/// Replace `path` with `contents` without ever leaving a partial file behind.
///
/// The data goes to a temp file in the destination directory (so the final
/// rename stays on one filesystem), is synced, then renamed over the target.
pub fn write_atomic(path: &Path, contents: &[u8]) -> io::Result<()> {
    let parent = path.parent().filter(|dir| !dir.as_os_str().is_empty());

    if let Some(dir) = parent {
        fs::create_dir_all(dir)?;
    }

    let mut temp_file = match parent {
        Some(dir) => NamedTempFile::new_in(dir)?,
        None => NamedTempFile::new_in(".")?,
    };

    temp_file.write_all(contents)?;
    temp_file.as_file_mut().sync_all()?;
    temp_file.persist(path).map_err(|err| err.error)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn creates_missing_directories() {
        let dir = TempDir::new().unwrap();
        let target = dir.path().join("a").join("b").join("file.txt");
        write_atomic(&target, b"hello").unwrap();
        assert_eq!(fs::read_to_string(&target).unwrap(), "hello");
    }

    #[test]
    fn replaces_existing_file() {
        let dir = TempDir::new().unwrap();
        let target = dir.path().join("file.txt");
        fs::write(&target, "old contents that are longer").unwrap();
        write_atomic(&target, b"new").unwrap();
        assert_eq!(fs::read_to_string(&target).unwrap(), "new");
        assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 1);
    }
}
