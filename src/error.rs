use thiserror::Error;

/// Failures of a single lookup against one of the third-party services.
#[derive(Debug, Error)]
pub enum LookupError {
    #[error("could not find coordinate for {0:?}")]
    CoordinateNotFound(String),

    #[error("could not find restaurant {0:?}")]
    RestaurantNotFound(String),

    #[error("failed to parse {what}: {reason}")]
    ParseFailure { what: &'static str, reason: String },

    #[error("network failure: {0}")]
    NetworkFailure(String),
}

impl LookupError {
    pub fn parse(what: &'static str, reason: impl ToString) -> Self {
        Self::ParseFailure {
            what,
            reason: reason.to_string(),
        }
    }

    /// The service answered, it just had nothing for us.
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            Self::CoordinateNotFound(_) | Self::RestaurantNotFound(_)
        )
    }
}

impl From<ureq::Error> for LookupError {
    fn from(e: ureq::Error) -> Self {
        Self::NetworkFailure(e.to_string())
    }
}

// reading a response body can still fail mid-stream
impl From<std::io::Error> for LookupError {
    fn from(e: std::io::Error) -> Self {
        Self::NetworkFailure(e.to_string())
    }
}
