pub mod upload {
    //! Loading a local file into the editor. Reads happen on the tokio runtime
    //! and report back through a channel, so the UI keeps drawing meanwhile.
    use crate::util::error::error::TransferError;
    use std::path::{Path, PathBuf};
    use tokio::runtime::Handle;
    use tokio::sync::mpsc::UnboundedSender;
    use tracing::{debug, info, warn};

    /// Extensions offered by the upload picker. Content is always read as
    /// plain text whatever the extension.
    pub const ACCEPTED_EXTENSIONS: [&str; 5] = [".js", ".java", ".py", ".ts", ".tsx"];

    #[derive(Debug)]
    pub struct UploadEvent {
        pub path: PathBuf,
        pub result: Result<String, TransferError>,
    }

    #[derive(Clone, Debug, PartialEq, Eq)]
    pub struct PickerEntry {
        pub path: PathBuf,
        pub is_dir: bool,
        pub name: String,
    }

    pub fn is_accepted(path: &Path) -> bool {
        let Some(ext) = path.extension().and_then(|e| e.to_str()) else {
            return false;
        };
        let ext = format!(".{}", ext.to_lowercase());
        ACCEPTED_EXTENSIONS.contains(&ext.as_str())
    }

    /// Read the whole file as UTF-8 text. A leading byte-order mark is
    /// dropped. Bytes that are not UTF-8 fail the read as a whole.
    pub async fn read_text(path: &Path) -> Result<String, TransferError> {
        let bytes = tokio::fs::read(path).await.map_err(|source| TransferError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let mut text = String::from_utf8(bytes).map_err(|_| TransferError::Decode {
            path: path.to_path_buf(),
        })?;
        if let Some(stripped) = text.strip_prefix('\u{feff}') {
            text = stripped.to_string();
        }
        Ok(text)
    }

    /// Start reading `path` in the background. `None` means the picker was
    /// dismissed without a choice: nothing is read and `false` is returned.
    pub fn spawn_upload(handle: &Handle, path: Option<PathBuf>, tx: UnboundedSender<UploadEvent>) -> bool {
        let Some(path) = path else {
            debug!("upload cancelled: no file selected");
            return false;
        };
        info!(path = %path.display(), "upload started");
        handle.spawn(async move {
            let result = read_text(&path).await;
            if let Err(e) = &result {
                warn!(path = %path.display(), error = %e, "upload failed");
            }
            let _ = tx.send(UploadEvent { path, result });
        });
        true
    }

    /// Entries shown by the upload picker for `dir`: a `..` entry when there
    /// is a parent, then directories, then accepted files, each sorted by
    /// name. Unreadable directories list as empty.
    pub fn list_dir(dir: &Path) -> Vec<PickerEntry> {
        let mut entries = Vec::new();
        if let Some(parent) = dir.parent() {
            entries.push(PickerEntry {
                path: parent.to_path_buf(),
                is_dir: true,
                name: "..".to_string(),
            });
        }

        let Ok(read_dir) = std::fs::read_dir(dir) else {
            return entries;
        };
        let mut dirs = Vec::new();
        let mut files = Vec::new();
        for entry in read_dir.flatten() {
            let Ok(metadata) = entry.metadata() else {
                continue;
            };
            let path = entry.path();
            let name = path
                .file_name()
                .and_then(|n| n.to_str())
                .unwrap_or("?")
                .to_string();
            if metadata.is_dir() {
                dirs.push(PickerEntry { path, is_dir: true, name });
            } else if is_accepted(&path) {
                files.push(PickerEntry { path, is_dir: false, name });
            }
        }
        dirs.sort_by(|a, b| a.name.cmp(&b.name));
        files.sort_by(|a, b| a.name.cmp(&b.name));
        entries.extend(dirs);
        entries.extend(files);
        entries
    }
}

#[cfg(test)]
mod tests {
    use super::upload::{is_accepted, list_dir, read_text, spawn_upload};
    use crate::util::error::error::TransferError;
    use std::fs;
    use std::path::Path;
    use tempfile::TempDir;

    #[test]
    fn accepts_only_source_extensions() {
        for name in ["a.js", "A.JAVA", "b.py", "c.ts", "d.tsx"] {
            assert!(is_accepted(Path::new(name)), "{} should be accepted", name);
        }
        for name in ["a.txt", "Makefile", "b.pyc"] {
            assert!(!is_accepted(Path::new(name)), "{} should be rejected", name);
        }
    }

    #[tokio::test]
    async fn reads_text_content() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("input.py");
        fs::write(&path, "test-content").unwrap();
        assert_eq!(read_text(&path).await.unwrap(), "test-content");
    }

    #[tokio::test]
    async fn strips_byte_order_mark() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("bom.js");
        fs::write(&path, "\u{feff}console.log(1)").unwrap();
        assert_eq!(read_text(&path).await.unwrap(), "console.log(1)");
    }

    #[tokio::test]
    async fn binary_content_is_a_decode_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("blob.js");
        fs::write(&path, [0x66u8, 0x6f, 0xff, 0xfe, 0x00]).unwrap();
        assert!(matches!(read_text(&path).await, Err(TransferError::Decode { .. })));
    }

    #[tokio::test]
    async fn missing_file_is_an_io_error() {
        let dir = TempDir::new().unwrap();
        let result = read_text(&dir.path().join("gone.js")).await;
        assert!(matches!(result, Err(TransferError::Io { .. })));
    }

    #[tokio::test]
    async fn spawned_upload_reports_through_channel() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("up.java");
        fs::write(&path, "class A {}").unwrap();
        let (tx, mut rx) = tokio::sync::mpsc::unbounded_channel();
        let handle = tokio::runtime::Handle::current();

        assert!(!spawn_upload(&handle, None, tx.clone()));
        assert!(spawn_upload(&handle, Some(path.clone()), tx));

        let event = rx.recv().await.unwrap();
        assert_eq!(event.path, path);
        assert_eq!(event.result.unwrap(), "class A {}");
    }

    #[test]
    fn picker_lists_dirs_then_accepted_files() {
        let dir = TempDir::new().unwrap();
        fs::create_dir(dir.path().join("src")).unwrap();
        fs::write(dir.path().join("z.py"), "").unwrap();
        fs::write(dir.path().join("a.js"), "").unwrap();
        fs::write(dir.path().join("notes.txt"), "").unwrap();

        let names: Vec<String> = list_dir(dir.path()).into_iter().map(|e| e.name).collect();
        assert_eq!(names, vec!["..", "src", "a.js", "z.py"]);
    }
}
