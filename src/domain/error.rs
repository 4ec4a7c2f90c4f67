use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AppError {
    #[error("Please upload a product image first")]
    MissingImage,

    #[error("Please upload a product image and at least one reference image")]
    MissingReferenceImages,

    #[error("Please enter prompts or generate them automatically")]
    EmptyPrompts,

    #[error("Please analyze the image first")]
    AnalysisRequired,

    #[error("Not a supported image file: {0}")]
    InvalidImage(String),

    #[error("API error: {0}")]
    Api(String),

    #[error("I/O error: {0}")]
    Io(String),

    #[error("Archive error: {0}")]
    Archive(String),
}

impl From<crate::api::ApiError> for AppError {
    fn from(err: crate::api::ApiError) -> Self {
        AppError::Api(err.to_string())
    }
}
