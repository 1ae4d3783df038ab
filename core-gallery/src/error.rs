use thiserror::Error;

#[derive(Error, Debug)]
pub enum GalleryError {
    /// A response arrived but its status was not 2xx.
    #[error("HTTP error! status: {status}")]
    Http { status: u16 },

    /// No usable response (connection, TLS, timeout). Carries the transport's
    /// own description, which may be empty.
    #[error("{0}")]
    Transport(String),

    #[error("Failed to decode image list: {0}")]
    Decode(String),

    #[error(transparent)]
    Config(#[from] core_runtime::Error),
}

impl GalleryError {
    /// HTTP status of the failed response, if one was received.
    pub fn status(&self) -> Option<u16> {
        match self {
            GalleryError::Http { status } => Some(*status),
            _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, GalleryError>;
