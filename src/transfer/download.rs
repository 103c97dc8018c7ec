pub mod download {
    //! Saving the document as `code<ext>`.
    use crate::document::document::document::Document;
    use crate::util::error::error::TransferError;
    use std::fs;
    use std::path::{Path, PathBuf};
    use tracing::info;

    /// The bytes of a download and the name they are offered under.
    #[derive(Debug, Clone, PartialEq, Eq)]
    pub struct DownloadBlob {
        file_name: String,
        bytes: Vec<u8>,
    }

    impl DownloadBlob {
        pub fn new(text: &str, file_name: impl Into<String>) -> Self {
            Self {
                file_name: file_name.into(),
                bytes: text.as_bytes().to_vec(),
            }
        }

        pub fn from_document(document: &Document) -> Self {
            Self::new(document.text(), document.file_name())
        }

        pub fn file_name(&self) -> &str {
            &self.file_name
        }

        pub fn bytes(&self) -> &[u8] {
            &self.bytes
        }

        /// Write the blob into `dir`. An existing file is never overwritten;
        /// like a browser download, `code (1).js`, `code (2).js`, ... are
        /// tried instead. Returns the path written.
        pub fn save_to(&self, dir: &Path) -> Result<PathBuf, TransferError> {
            let path = free_path(dir, &self.file_name);
            fs::write(&path, &self.bytes).map_err(|source| TransferError::Io {
                path: path.clone(),
                source,
            })?;
            info!(path = %path.display(), bytes = self.bytes.len(), "downloaded source");
            Ok(path)
        }
    }

    fn free_path(dir: &Path, file_name: &str) -> PathBuf {
        let candidate = dir.join(file_name);
        if !candidate.exists() {
            return candidate;
        }
        let (stem, ext) = match file_name.rfind('.') {
            Some(idx) => file_name.split_at(idx),
            None => (file_name, ""),
        };
        (1..)
            .map(|n| dir.join(format!("{} ({}){}", stem, n, ext)))
            .find(|p| !p.exists())
            .unwrap_or(candidate)
    }
}
