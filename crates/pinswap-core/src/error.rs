use thiserror::Error;

#[derive(Debug, Error)]
pub enum ManifestError {
    #[error("manifest is not valid UTF-8")]
    Encoding(#[source] std::str::Utf8Error),

    #[error("manifest is not valid JSON")]
    Parse(#[source] serde_json::Error),

    #[error("failed to serialize manifest")]
    Serialize(#[source] serde_json::Error),

    #[error("manifest schema violation: {0}")]
    Schema(String),
}

impl ManifestError {
    pub(crate) fn schema(detail: impl Into<String>) -> Self {
        Self::Schema(detail.into())
    }

    /// True for errors caused by the manifest's text rather than its shape.
    pub fn is_parse(&self) -> bool {
        matches!(self, Self::Encoding(_) | Self::Parse(_) | Self::Serialize(_))
    }
}
