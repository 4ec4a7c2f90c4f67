use std::path::Path;

use bytes::Bytes;

use super::AppError;

/// A single image fetched and ready to be written to disk.
#[derive(Debug, Clone)]
pub struct DownloadPlan {
    pub suggested_filename: String,
    pub bytes: Bytes,
}

/// One source URL of a bulk download. `index` is zero-based and only used to
/// name the archive entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownloadRequest {
    pub index: usize,
    pub url: String,
}

impl DownloadRequest {
    pub fn from_urls<S: AsRef<str>>(urls: &[S]) -> Vec<Self> {
        urls.iter()
            .enumerate()
            .map(|(index, url)| Self {
                index,
                url: url.as_ref().to_string(),
            })
            .collect()
    }

    /// `<prefix>-<n>.png`, numbered from 1.
    pub fn entry_name(&self, prefix: &str) -> String {
        format!("{}-{}.png", prefix, self.index + 1)
    }
}

#[derive(Debug, Clone)]
pub enum RetrievalOutcome {
    Retrieved {
        request: DownloadRequest,
        payload: Bytes,
    },
    Failed {
        request: DownloadRequest,
        error: String,
    },
}

/// An image file picked by the user, sniffed by content rather than extension.
#[derive(Debug, Clone, PartialEq)]
pub struct ImageUpload {
    pub file_name: String,
    pub mime: &'static str,
    pub bytes: Bytes,
}

impl ImageUpload {
    pub fn from_bytes(file_name: impl Into<String>, bytes: Bytes) -> Result<Self, AppError> {
        let file_name = file_name.into();
        let format = image::guess_format(&bytes)
            .map_err(|_| AppError::InvalidImage(file_name.clone()))?;

        Ok(Self {
            file_name,
            mime: format.to_mime_type(),
            bytes,
        })
    }

    pub async fn load(path: &Path) -> Result<Self, AppError> {
        let bytes = tokio::fs::read(path)
            .await
            .map_err(|e| AppError::Io(format!("Failed to read {}: {}", path.display(), e)))?;

        let file_name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| "image".to_string());

        Self::from_bytes(file_name, Bytes::from(bytes))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PNG_MAGIC: &[u8] = &[0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A, 0, 0, 0, 0];

    #[test]
    fn test_entry_names_are_one_based() {
        let requests = DownloadRequest::from_urls(&["a", "b", "c"]);
        assert_eq!(requests.len(), 3);
        assert_eq!(requests[0].entry_name("item"), "item-1.png");
        assert_eq!(requests[2].entry_name("mockup"), "mockup-3.png");
        assert_eq!(requests[1].url, "b");
    }

    #[test]
    fn test_upload_detects_png() {
        let upload = ImageUpload::from_bytes("shirt.png", Bytes::from_static(PNG_MAGIC)).unwrap();
        assert_eq!(upload.mime, "image/png");
        assert_eq!(upload.file_name, "shirt.png");
    }

    #[test]
    fn test_upload_rejects_non_images() {
        let err = ImageUpload::from_bytes("notes.txt", Bytes::from_static(b"hello world"))
            .unwrap_err();
        assert_eq!(err, AppError::InvalidImage("notes.txt".to_string()));
    }

    #[tokio::test]
    async fn test_load_missing_file_is_io_error() {
        let err = ImageUpload::load(Path::new("/definitely/not/here.png"))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Io(_)));
    }
}
