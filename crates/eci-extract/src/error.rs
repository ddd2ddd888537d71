use thiserror::Error;

#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("{registration_number}: section not found: {heading}")]
    MissingSection {
        registration_number: String,
        heading: String,
    },

    #[error("{registration_number}: no outcome rule matched answer text: {preview}")]
    ClassificationExhausted {
        registration_number: String,
        preview: String,
    },

    #[error("invalid extractor config: {0}")]
    Config(#[from] serde_json::Error),

    #[error("{registration_number}: worker failed: {detail}")]
    Worker {
        registration_number: String,
        detail: String,
    },
}

impl ExtractError {
    /// Registration number of the failing document, when the error is per-document.
    pub fn registration_number(&self) -> Option<&str> {
        match self {
            Self::MissingSection {
                registration_number,
                ..
            }
            | Self::ClassificationExhausted {
                registration_number,
                ..
            }
            | Self::Worker {
                registration_number,
                ..
            } => Some(registration_number),
            Self::Config(_) => None,
        }
    }
}
