use thiserror::Error;

#[derive(Debug, Error)]
pub enum DomainError {
    #[error("Invalid history entry at position {index}: unsupported role '{role}'")]
    InvalidHistoryEntry { index: usize, role: String },

    #[error("Unsupported vendor family: {0}")]
    UnsupportedFamily(String),

    #[error("Unknown model: {0}")]
    UnknownModel(String),

    #[error("Vendor call failed: {message}")]
    VendorCallFailed { message: String, cancelled: bool },

    #[error("Unsupported document: {0}")]
    UnsupportedDocument(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl DomainError {
    pub fn vendor(msg: impl Into<String>) -> Self {
        Self::VendorCallFailed {
            message: msg.into(),
            cancelled: false,
        }
    }

    pub fn cancelled(msg: impl Into<String>) -> Self {
        Self::VendorCallFailed {
            message: msg.into(),
            cancelled: true,
        }
    }

    pub fn unsupported_family(msg: impl Into<String>) -> Self {
        Self::UnsupportedFamily(msg.into())
    }

    pub fn unknown_model(msg: impl Into<String>) -> Self {
        Self::UnknownModel(msg.into())
    }

    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }

    /// True when the error came from a vendor call that was cancelled by the caller.
    pub fn is_cancelled(&self) -> bool {
        matches!(self, Self::VendorCallFailed { cancelled: true, .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn vendor_errors_track_cancellation() {
        let err = DomainError::cancelled("request aborted");
        assert!(err.is_cancelled());
        assert_eq!(err.to_string(), "Vendor call failed: request aborted");

        let err = DomainError::vendor("HTTP 429");
        assert!(!err.is_cancelled());
        assert_eq!(err.to_string(), "Vendor call failed: HTTP 429");
    }
}
