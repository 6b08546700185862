use std::path::{Path, PathBuf};

use tokio::{fs, io::AsyncWriteExt};
use uuid::Uuid;

use crate::prelude::Result;

/// An uploaded file staged on disk for the duration of one request. The
/// file is removed when the value drops, whichever way the request ends.
#[derive(Debug)]
pub struct TempUpload {
    path: PathBuf,
    filename: String,
}

impl TempUpload {
    /// Writes `data` under a uuid name in `dir`, keeping the original
    /// filename for display and the content-type guess.
    pub async fn persist(dir: &Path, original_filename: &str, data: &[u8]) -> Result<Self> {
        fs::create_dir_all(dir).await?;
        let extension = Path::new(original_filename)
            .extension()
            .and_then(|ext| ext.to_str())
            .unwrap_or("bin");
        let path = dir.join(format!("{}.{}", Uuid::new_v4(), extension));
        let mut file = fs::File::create(&path).await?;
        file.write_all(data).await?;
        file.flush().await?;
        Ok(TempUpload {
            path,
            filename: original_filename.to_string(),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn filename(&self) -> &str {
        &self.filename
    }

    pub fn mime_type(&self) -> &'static str {
        let extension = self
            .path
            .extension()
            .and_then(|ext| ext.to_str())
            .unwrap_or("");
        match extension {
            "pdf" => "application/pdf",
            _ => "application/octet-stream",
        }
    }
}

impl Drop for TempUpload {
    fn drop(&mut self) {
        match std::fs::remove_file(&self.path) {
            Ok(()) => {}
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => tracing::warn!(
                "failed to remove temp upload {}: {}",
                self.path.display(),
                e
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn stages_the_bytes_and_removes_them_on_drop() {
        let upload = TempUpload::persist(&std::env::temp_dir(), "resume.pdf", b"%PDF-1.5")
            .await
            .unwrap();
        let path = upload.path().to_path_buf();
        assert!(path.exists());
        assert_eq!(std::fs::read(&path).unwrap(), b"%PDF-1.5");
        assert_eq!(upload.filename(), "resume.pdf");
        assert_eq!(upload.mime_type(), "application/pdf");

        drop(upload);
        assert!(!path.exists());
    }

    #[tokio::test]
    async fn unknown_extensions_fall_back_to_octet_stream() {
        let upload = TempUpload::persist(&std::env::temp_dir(), "resume", b"data")
            .await
            .unwrap();
        assert_eq!(upload.mime_type(), "application/octet-stream");
    }
}
