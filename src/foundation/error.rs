use std::path::{Path, PathBuf};

pub type SplashResult<T> = Result<T, SplashError>;

#[derive(thiserror::Error, Debug)]
pub enum SplashError {
    #[error("asset not found: '{}'", path.display())]
    AssetNotFound { path: PathBuf },

    #[error("unsupported image format: '{}': {reason}", path.display())]
    UnsupportedImageFormat { path: PathBuf, reason: String },

    #[error("invalid crop: {0}")]
    InvalidCrop(String),

    #[error("invalid configuration: {0}")]
    InvalidConfiguration(String),

    #[error("unsupported output format '{extension}' for '{}' (use .jpg, .jpeg or .webp)", path.display())]
    UnsupportedOutputFormat { path: PathBuf, extension: String },

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl SplashError {
    pub fn asset_not_found(path: impl AsRef<Path>) -> Self {
        Self::AssetNotFound {
            path: path.as_ref().to_path_buf(),
        }
    }

    pub fn unsupported_image_format(path: impl AsRef<Path>, reason: impl Into<String>) -> Self {
        Self::UnsupportedImageFormat {
            path: path.as_ref().to_path_buf(),
            reason: reason.into(),
        }
    }

    pub fn invalid_crop(msg: impl Into<String>) -> Self {
        Self::InvalidCrop(msg.into())
    }

    pub fn invalid_configuration(msg: impl Into<String>) -> Self {
        Self::InvalidConfiguration(msg.into())
    }

    pub fn unsupported_output_format(path: impl AsRef<Path>, extension: impl Into<String>) -> Self {
        Self::UnsupportedOutputFormat {
            path: path.as_ref().to_path_buf(),
            extension: extension.into(),
        }
    }
}
