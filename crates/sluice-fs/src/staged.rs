use std::io::Write;
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;
use tracing::debug;

use crate::{Error, Result};

/// Naming of the staging file and mode of the committed file.
///
/// The staging file is named `{prefix}{file name}{random}{suffix}`.
#[derive(Clone, Copy, Debug)]
pub struct StageOptions {
    prefix: &'static str,
    suffix: &'static str,
    /// Unix mode applied before the rename. Ignored elsewhere.
    mode:   u32,
}

impl Default for StageOptions {
    fn default() -> Self {
        Self {
            prefix: ".",
            suffix: ".tmp",
            mode:   0o644,
        }
    }
}

impl StageOptions {
    pub fn new() -> Self { Self::default() }

    pub fn prefix(self, prefix: &'static str) -> Self { Self { prefix, ..self } }

    pub fn suffix(self, suffix: &'static str) -> Self { Self { suffix, ..self } }

    pub fn mode(self, mode: u32) -> Self { Self { mode, ..self } }
}

/// A temporary file in the destination's directory, renamed over the
/// destination on commit.
///
/// Staging in the same directory keeps the final rename on one filesystem.
pub struct StagedFile {
    file:        NamedTempFile,
    destination: PathBuf,
    options:     StageOptions,
}

impl StagedFile {
    /// Create the staging file, creating the destination's parent directory
    /// if it does not exist yet.
    pub fn new(destination: impl AsRef<Path>, options: StageOptions) -> Result<Self> {
        let destination = destination.as_ref().to_path_buf();
        let parent = match destination.parent() {
            Some(p) if !p.as_os_str().is_empty() => p.to_path_buf(),
            _ => PathBuf::from("."),
        };

        if !parent.exists() {
            std::fs::create_dir_all(&parent).map_err(|source| Error::Create {
                path: parent.clone(),
                source,
            })?;
        }

        let file_name = destination
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        let prefix = format!("{}{}", options.prefix, file_name);

        let file = tempfile::Builder::new()
            .prefix(&prefix)
            .suffix(options.suffix)
            .tempfile_in(&parent)
            .map_err(|source| Error::Create {
                path: parent.clone(),
                source,
            })?;

        Ok(Self {
            file,
            destination,
            options,
        })
    }

    /// Path of the staging file.
    pub fn path(&self) -> &Path { self.file.path() }

    pub fn write_all(&mut self, data: &[u8]) -> Result<()> {
        self.file.write_all(data).map_err(|source| Error::Write {
            path: self.file.path().to_path_buf(),
            source,
        })
    }

    /// Sync the staged content and rename it over the destination.
    pub fn commit(self) -> Result<PathBuf> {
        let Self {
            file,
            destination,
            options,
        } = self;

        file.as_file().sync_all().map_err(|source| Error::Write {
            path: file.path().to_path_buf(),
            source,
        })?;

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;

            let perms = std::fs::Permissions::from_mode(options.mode);
            std::fs::set_permissions(file.path(), perms).map_err(|source| Error::Write {
                path: file.path().to_path_buf(),
                source,
            })?;
        }

        file.persist(&destination).map_err(|e| Error::Persist {
            path:   destination.clone(),
            source: e.error,
        })?;

        debug!(destination = %destination.display(), "committed staged file");
        Ok(destination)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_staged_file_commit() {
        let dir = tempdir().unwrap();
        let dest = dir.path().join("file.txt");

        let mut staged = StagedFile::new(&dest, StageOptions::new()).unwrap();
        staged.write_all(b"data").unwrap();
        assert_eq!(staged.path().parent(), Some(dir.path()));
        assert!(!dest.exists());

        let committed = staged.commit().unwrap();
        assert_eq!(committed, dest);
        assert_eq!(std::fs::read(&dest).unwrap(), b"data");
    }

    #[test]
    fn test_staged_file_cleanup_on_drop() {
        let dir = tempdir().unwrap();
        let dest = dir.path().join("file.txt");

        let staging_path = {
            let mut staged = StagedFile::new(&dest, StageOptions::new()).unwrap();
            staged.write_all(b"partial").unwrap();
            let path = staged.path().to_path_buf();
            assert!(path.exists());
            path
        };

        assert!(!staging_path.exists());
        assert!(!dest.exists());
    }

    #[test]
    fn test_staging_name_uses_prefix_and_suffix() {
        let dir = tempdir().unwrap();
        let staged =
            StagedFile::new(dir.path().join("data.bin"), StageOptions::new().prefix("~").suffix(".part"))
                .unwrap();

        let name = staged.path().file_name().unwrap().to_string_lossy().into_owned();
        assert!(name.starts_with("~data.bin"));
        assert!(name.ends_with(".part"));
    }

    #[cfg(unix)]
    #[test]
    fn test_commit_applies_permissions() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempdir().unwrap();
        let dest = dir.path().join("file.txt");

        let staged = StagedFile::new(&dest, StageOptions::new().mode(0o640)).unwrap();
        staged.commit().unwrap();

        let mode = std::fs::metadata(&dest).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o640);
    }

    #[cfg(unix)]
    #[test]
    fn test_commit_defaults_to_world_readable() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempdir().unwrap();
        let dest = dir.path().join("file.txt");
        StagedFile::new(&dest, StageOptions::default()).unwrap().commit().unwrap();

        let mode = std::fs::metadata(&dest).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o644);
    }
}
