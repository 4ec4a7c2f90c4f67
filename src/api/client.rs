use bytes::Bytes;
use reqwest::multipart::{Form, Part};
use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;
use thiserror::Error;

use crate::domain::ImageUpload;

use super::models::{
    ApiConfig, GenerateMockupsResponse, GeneratedIdea, ImageAnalysis, RetryPolicy,
};

const GENERATE_MOCKUPS_PATH: &str = "/api/mockups/generate-mockups";
const GENERATE_PROMPTS_PATH: &str = "/api/mockups/generate-prompts";
const ANALYZE_PRODUCT_PATH: &str = "/api/ideas/analyze-product";
const GENERATE_IDEAS_PATH: &str = "/api/ideas/generate-ideas";
const GENERATE_FROM_REFERENCES_PATH: &str = "/ai/generate-from-references";

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("HTTP request failed: {0}")]
    RequestError(#[from] reqwest::Error),

    #[error("Server returned HTTP {0}")]
    Status(StatusCode),

    #[error("Invalid response format: {0}")]
    InvalidResponse(String),

    #[error("Invalid request: {0}")]
    InvalidRequest(String),
}

pub type Result<T> = std::result::Result<T, ApiError>;

#[derive(Clone)]
pub struct ApiClient {
    config: ApiConfig,
    http: Client,
}

impl ApiClient {
    pub fn new(config: ApiConfig) -> Self {
        let http = Client::builder()
            .user_agent(concat!("mockup-studio/", env!("CARGO_PKG_VERSION")))
            .build()
            .unwrap_or_else(|_| Client::new());

        Self { config, http }
    }

    pub fn retry_policy(&self) -> RetryPolicy {
        self.config.retry
    }

    fn endpoint(&self, path: &str) -> String {
        format!(
            "{}{}",
            self.config.base_url.as_str().trim_end_matches('/'),
            path
        )
    }

    fn image_part(upload: &ImageUpload) -> Result<Part> {
        Ok(Part::bytes(upload.bytes.to_vec())
            .file_name(upload.file_name.clone())
            .mime_str(upload.mime)?)
    }

    async fn post_form<T: DeserializeOwned>(&self, path: &str, form: Form) -> Result<T> {
        let url = self.endpoint(path);
        tracing::debug!(url = %url, "submitting form");

        let response = self.http.post(&url).multipart(form).send().await?;

        // The backend answers 200 or 201 on success; anything else is an error
        let status = response.status();
        if status != StatusCode::OK && status != StatusCode::CREATED {
            tracing::warn!(url = %url, status = %status, "request rejected");
            return Err(ApiError::Status(status));
        }

        let body = response.bytes().await?;
        serde_json::from_slice(&body)
            .map_err(|e| ApiError::InvalidResponse(format!("JSON decode error: {}", e)))
    }

    /// Render one mockup per prompt from the sample image.
    pub async fn generate_mockups(
        &self,
        image: &ImageUpload,
        prompts: &[String],
    ) -> Result<GenerateMockupsResponse> {
        let prompts = serde_json::to_string(prompts)
            .map_err(|e| ApiError::InvalidRequest(format!("Cannot encode prompts: {}", e)))?;

        let form = Form::new()
            .part("image", Self::image_part(image)?)
            .text("prompts", prompts);

        self.post_form(GENERATE_MOCKUPS_PATH, form).await
    }

    /// Ask the backend to suggest `count` mockup prompts for the image.
    pub async fn generate_prompts(&self, image: &ImageUpload, count: u32) -> Result<Vec<String>> {
        let form = Form::new()
            .part("image", Self::image_part(image)?)
            .text("count", count.to_string());

        self.post_form(GENERATE_PROMPTS_PATH, form).await
    }

    pub async fn analyze_product(&self, image: &ImageUpload) -> Result<ImageAnalysis> {
        let form = Form::new().part("image", Self::image_part(image)?);

        self.post_form(ANALYZE_PRODUCT_PATH, form).await
    }

    pub async fn generate_ideas(
        &self,
        image: &ImageUpload,
        base_prompt: &str,
    ) -> Result<Vec<GeneratedIdea>> {
        let form = Form::new()
            .part("image", Self::image_part(image)?)
            .text("basePrompt", base_prompt.to_string());

        self.post_form(GENERATE_IDEAS_PATH, form).await
    }

    /// Compose the product image with the reference images. `variations` is
    /// only sent when set.
    pub async fn generate_from_references(
        &self,
        product: &ImageUpload,
        references: &[ImageUpload],
        variations: Option<u32>,
    ) -> Result<Vec<String>> {
        let mut form = Form::new().part("productImage", Self::image_part(product)?);

        for reference in references {
            form = form.part("referenceImages", Self::image_part(reference)?);
        }

        if let Some(variations) = variations {
            form = form.text("variations", variations.to_string());
        }

        self.post_form(GENERATE_FROM_REFERENCES_PATH, form).await
    }

    /// Single GET of a generated image. Any non-2xx status is an error.
    pub async fn fetch_bytes(&self, url: &str) -> Result<Bytes> {
        let response = self.http.get(url).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(ApiError::Status(status));
        }

        Ok(response.bytes().await?)
    }
}
