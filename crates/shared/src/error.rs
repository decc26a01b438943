use serde::Serialize;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("{0}")]
    Validate(#[from] validator::ValidationErrors),

    #[error("no active session")]
    Auth,

    #[error("Free plan allows {limit} plans per month. Upgrade for unlimited.")]
    QuotaExceeded { used: u32, limit: u32 },

    #[error("{0} not found")]
    NotFound(String),

    #[error("{0}")]
    Upstream(String),

    #[error(transparent)]
    Unknown(#[from] anyhow::Error),
}

pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    pub fn code(&self) -> &'static str {
        match self {
            Error::Validate(_) => "validation_failed",
            Error::Auth => "unauthorized",
            Error::QuotaExceeded { .. } => "quota_exceeded",
            Error::NotFound(_) => "not_found",
            Error::Upstream(_) => "upstream_failed",
            Error::Unknown(_) => "internal",
        }
    }

    pub fn body(&self) -> ErrorBody {
        ErrorBody {
            error: self.code(),
            details: self.to_string(),
        }
    }
}

/// Wire shape of a failed operation.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: &'static str,
    pub details: String,
}
