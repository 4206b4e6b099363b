// shared/src/lib.rs

#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("places api returned status {status}")]
    UpstreamStatus { status: u16, body: String },
    #[error("transport: {0}")]
    Transport(String),
    #[error("decode: {0}")]
    Decode(String),
    #[error("invalid places base url: {0}")]
    InvalidBaseUrl(String),
}

impl Error {
    /// Upstream HTTP status, when the upstream actually answered
    pub fn status_code(&self) -> Option<u16> {
        match self {
            Error::UpstreamStatus { status, .. } => Some(*status),
            _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;

pub mod config;
