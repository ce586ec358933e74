use serde::{de::DeserializeOwned, Serialize};
use std::fs;
use std::io::{self, Write};
use std::path::Path;

pub trait Serializer {
    fn serialize<T: Serialize>(&self, data: &T) -> serde_json::Result<Vec<u8>>;
    fn deserialize<T: DeserializeOwned>(&self, data: &[u8]) -> serde_json::Result<T>;
}

/// JSON with two-space indentation and no trailing newline, the layout
/// catalog records have always been written in.
pub struct JsonSerializer;

impl Serializer for JsonSerializer {
    fn serialize<T: Serialize>(&self, data: &T) -> serde_json::Result<Vec<u8>> {
        serde_json::to_vec_pretty(data)
    }

    fn deserialize<T: DeserializeOwned>(&self, data: &[u8]) -> serde_json::Result<T> {
        serde_json::from_slice(data)
    }
}

pub struct FileUtils;

impl FileUtils {
    /// Replace `path` with `content` in one rename.
    ///
    /// The bytes land in a temporary sibling first, so readers observe either
    /// the old file or the complete new one. The replaced file's permissions
    /// carry over; a new file is created world-readable.
    pub fn write_atomic(path: &Path, content: &[u8]) -> io::Result<()> {
        let parent = match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        let mut staged = tempfile::NamedTempFile::new_in(parent)?;
        staged.write_all(content)?;
        match fs::metadata(path) {
            Ok(existing) => staged.as_file().set_permissions(existing.permissions())?,
            Err(err) if err.kind() == io::ErrorKind::NotFound => set_new_file_mode(staged.as_file())?,
            Err(err) => return Err(err),
        }
        staged.as_file().sync_all()?;
        staged.persist(path).map_err(|err| err.error)?;
        Ok(())
    }

    pub fn read(path: &Path) -> io::Result<Vec<u8>> {
        fs::read(path)
    }
}

#[cfg(unix)]
fn set_new_file_mode(file: &fs::File) -> io::Result<()> {
    use std::os::unix::fs::PermissionsExt;
    file.set_permissions(fs::Permissions::from_mode(0o644))
}

#[cfg(not(unix))]
fn set_new_file_mode(_file: &fs::File) -> io::Result<()> {
    Ok(())
}
