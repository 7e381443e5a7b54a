use thiserror::Error;

#[derive(Error, Debug)]
pub enum CatalogError {
    #[error("asset not found: {0}")]
    AssetNotFound(String),
    #[error("asset '{asset}' does not match its record schema: {reason}")]
    SchemaMismatch { asset: String, reason: String },
    #[error("asset '{asset}' is not valid JSON: {reason}")]
    ParseError { asset: String, reason: String },
    #[error("asset '{asset}' is malformed: {reason}")]
    MalformedAsset { asset: String, reason: String },
    #[error("I/O error reading '{asset}': {source}")]
    Io {
        asset: String,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

impl CatalogError {
    pub fn malformed(asset: impl Into<String>, reason: impl Into<String>) -> Self {
        CatalogError::MalformedAsset {
            asset: asset.into(),
            reason: reason.into(),
        }
    }

    /// Name of the asset the error refers to, if any.
    pub fn asset(&self) -> Option<&str> {
        match self {
            CatalogError::AssetNotFound(asset) => Some(asset),
            CatalogError::SchemaMismatch { asset, .. }
            | CatalogError::ParseError { asset, .. }
            | CatalogError::MalformedAsset { asset, .. }
            | CatalogError::Io { asset, .. } => Some(asset),
            CatalogError::InvalidConfig(_) => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, CatalogError>;
