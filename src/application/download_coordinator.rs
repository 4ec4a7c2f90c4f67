use std::path::{Path, PathBuf};

use bytes::Bytes;

use crate::{
    api::ApiClient,
    domain::{AppError, DownloadPlan, DownloadRequest, ImageUpload},
    utils::{archive_file_name, timestamp_millis},
};

use super::bulk_download::{BulkDownloadReport, BulkDownloader};

const IMAGE_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "webp", "gif", "bmp"];

/// Where a bulk download ended up and how much of it made it in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SavedArchive {
    pub path: PathBuf,
    pub requested: usize,
    pub archived: usize,
}

/// Glue between the API client, the file dialogs and the disk.
#[derive(Clone)]
pub struct DownloadCoordinator {
    api_client: ApiClient,
}

impl DownloadCoordinator {
    pub fn new(api_client: ApiClient) -> Self {
        Self { api_client }
    }

    pub fn api(&self) -> &ApiClient {
        &self.api_client
    }

    /// Fetch one generated image (single attempt) and name it after its
    /// position in the result list.
    pub async fn prepare_download(
        &self,
        url: &str,
        index: usize,
        prefix: &str,
    ) -> Result<DownloadPlan, AppError> {
        let request = DownloadRequest {
            index,
            url: url.to_string(),
        };
        let bytes = self.api_client.fetch_bytes(&request.url).await?;

        Ok(DownloadPlan {
            suggested_filename: request.entry_name(prefix),
            bytes,
        })
    }

    pub async fn assemble_archive(
        &self,
        urls: &[String],
        prefix: &str,
    ) -> Result<BulkDownloadReport, AppError> {
        BulkDownloader::new(self.api_client.clone())
            .with_entry_prefix(prefix)
            .assemble(urls)
            .await
            .map_err(|e| AppError::Archive(e.to_string()))
    }

    /// Returns `Ok(None)` when the user cancels the save dialog.
    pub async fn download_single(
        &self,
        url: String,
        index: usize,
        prefix: &str,
    ) -> Result<Option<PathBuf>, AppError> {
        let plan = self.prepare_download(&url, index, prefix).await?;

        match self.choose_save_path(plan.suggested_filename).await {
            Some(path) => save_bytes(&path, &plan.bytes).await.map(Some),
            None => Ok(None),
        }
    }

    /// Returns `Ok(None)` when the user cancels the save dialog.
    pub async fn download_archive(
        &self,
        urls: Vec<String>,
        prefix: &str,
    ) -> Result<Option<SavedArchive>, AppError> {
        let report = self.assemble_archive(&urls, prefix).await?;

        let Some(path) = self
            .choose_save_path(archive_file_name(timestamp_millis()))
            .await
        else {
            return Ok(None);
        };

        if !report.failed.is_empty() {
            tracing::warn!(items = ?report.failed, "some images were left out of the archive");
        }

        let path = save_bytes(&path, &report.archive).await?;
        tracing::info!(path = %path.display(), archived = report.archived, "archive saved");
        Ok(Some(SavedArchive {
            path,
            requested: report.requested,
            archived: report.archived,
        }))
    }

    /// Single attempt; previews are best effort.
    pub async fn fetch_preview(&self, url: &str) -> Result<Bytes, AppError> {
        Ok(self.api_client.fetch_bytes(url).await?)
    }

    pub async fn choose_save_path(&self, suggested_filename: String) -> Option<PathBuf> {
        rfd::AsyncFileDialog::new()
            .set_file_name(&suggested_filename)
            .save_file()
            .await
            .map(|handle| handle.path().to_path_buf())
    }

    pub async fn pick_image(&self) -> Option<Result<ImageUpload, AppError>> {
        let handle = rfd::AsyncFileDialog::new()
            .add_filter("Images", IMAGE_EXTENSIONS)
            .pick_file()
            .await?;

        Some(ImageUpload::load(handle.path()).await)
    }

    pub async fn pick_images(&self) -> Vec<Result<ImageUpload, AppError>> {
        let handles = rfd::AsyncFileDialog::new()
            .add_filter("Images", IMAGE_EXTENSIONS)
            .pick_files()
            .await
            .unwrap_or_default();

        let mut uploads = Vec::with_capacity(handles.len());
        for handle in handles {
            uploads.push(ImageUpload::load(handle.path()).await);
        }
        uploads
    }
}

async fn save_bytes(path: &Path, bytes: &[u8]) -> Result<PathBuf, AppError> {
    tokio::fs::write(path, bytes)
        .await
        .map_err(|e| AppError::Io(format!("Failed to write {}: {}", path.display(), e)))?;

    tracing::info!(path = %path.display(), bytes = bytes.len(), "saved download");
    Ok(path.to_path_buf())
}
