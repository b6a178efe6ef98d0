//! A filesystem-backed blob store for attachment files.

use std::{
    fs,
    path::{Path, PathBuf},
};

use crate::{Error, database_id::DatabaseId, session::UserId};

use super::domain::NewAttachmentFile;

/// Stores attachment bytes under a root directory, keyed by the convention
/// `{owner}/{record}/{unique-suffix}.{ext}`.
///
/// The unique suffix is the MD5 digest of the file contents, so re-uploading
/// the same file to the same record overwrites rather than duplicates it.
#[derive(Debug, Clone)]
pub struct AttachmentStore {
    root: PathBuf,
}

impl AttachmentStore {
    /// Create a blob store rooted at `root`. The directory is created lazily
    /// on the first write.
    pub fn new(root: PathBuf) -> Self {
        Self { root }
    }

    /// Write `file` for the given owner and record, returning the store key.
    ///
    /// # Errors
    /// Returns an [Error::AttachmentStorageError] if the directory or file
    /// cannot be written.
    pub fn save(
        &self,
        user_id: &UserId,
        record_id: DatabaseId,
        file: &NewAttachmentFile,
    ) -> Result<String, Error> {
        let key = storage_key(user_id, record_id, &file.file_name, &file.bytes);
        let full_path = self.root.join(&key);

        if let Some(parent) = full_path.parent() {
            fs::create_dir_all(parent)
                .map_err(|error| Error::AttachmentStorageError(error.to_string()))?;
        }

        fs::write(&full_path, &file.bytes)
            .map_err(|error| Error::AttachmentStorageError(error.to_string()))?;

        Ok(key)
    }

    /// Read the bytes stored under `key`.
    ///
    /// # Errors
    /// Returns an [Error::AttachmentStorageError] if the key is malformed or
    /// the file cannot be read.
    pub fn read(&self, key: &str) -> Result<Vec<u8>, Error> {
        // Keys come from the database, but never follow one that could walk
        // out of the store's root directory.
        if Path::new(key).is_absolute() || key.split('/').any(|part| part == "..") {
            return Err(Error::AttachmentStorageError(format!(
                "invalid storage key: {key}"
            )));
        }

        fs::read(self.root.join(key))
            .map_err(|error| Error::AttachmentStorageError(error.to_string()))
    }
}

/// Build the storage key `{owner}/{record}/{md5-hex}.{ext}` for a file.
fn storage_key(user_id: &UserId, record_id: DatabaseId, file_name: &str, bytes: &[u8]) -> String {
    let digest = format!("{:x}", md5::compute(bytes));

    match file_name.rsplit_once('.') {
        Some((_, extension)) if !extension.is_empty() => {
            format!("{user_id}/{record_id}/{digest}.{extension}")
        }
        _ => format!("{user_id}/{record_id}/{digest}"),
    }
}

#[cfg(test)]
mod blob_tests {
    use crate::{Error, attachment::NewAttachmentFile, session::UserId};

    use super::{AttachmentStore, storage_key};

    fn png_file() -> NewAttachmentFile {
        NewAttachmentFile {
            file_name: "receipt.png".to_owned(),
            content_type: "image/png".to_owned(),
            bytes: vec![0x89, 0x50, 0x4e, 0x47],
        }
    }

    #[test]
    fn storage_key_follows_convention() {
        let user_id = UserId::new("user-1");
        let file = png_file();

        let key = storage_key(&user_id, 42, &file.file_name, &file.bytes);

        let parts: Vec<&str> = key.split('/').collect();
        assert_eq!(parts.len(), 3);
        assert_eq!(parts[0], "user-1");
        assert_eq!(parts[1], "42");
        assert!(parts[2].ends_with(".png"));
    }

    #[test]
    fn storage_key_without_extension() {
        let user_id = UserId::new("user-1");

        let key = storage_key(&user_id, 42, "receipt", b"bytes");

        assert!(!key.contains('.'));
    }

    #[test]
    fn save_then_read_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let store = AttachmentStore::new(dir.path().to_path_buf());
        let user_id = UserId::new("user-1");
        let file = png_file();

        let key = store.save(&user_id, 1, &file).expect("Could not save file");
        let got = store.read(&key).expect("Could not read file");

        assert_eq!(got, file.bytes);
    }

    #[test]
    fn read_rejects_traversal_keys() {
        let dir = tempfile::tempdir().unwrap();
        let store = AttachmentStore::new(dir.path().to_path_buf());

        let result = store.read("../../etc/passwd");

        assert!(matches!(result, Err(Error::AttachmentStorageError(_))));
    }

    #[test]
    fn read_missing_key_fails() {
        let dir = tempfile::tempdir().unwrap();
        let store = AttachmentStore::new(dir.path().to_path_buf());

        let result = store.read("user-1/1/missing.png");

        assert!(matches!(result, Err(Error::AttachmentStorageError(_))));
    }
}
