/// Convenience result type used across Signplay.
pub type SignplayResult<T> = Result<T, SignplayError>;

/// Top-level error taxonomy used by engine APIs.
#[derive(thiserror::Error, Debug)]
pub enum SignplayError {
    /// Top-level translation reply is missing or malformed; fails the whole response.
    #[error("parse error: {0}")]
    Parse(String),

    /// Network failure, non-200 status, or unreadable landmark body.
    #[error("fetch error: {0}")]
    Fetch(String),

    /// Frame length mismatch or unrecognized landmark document shape.
    #[error("decode error: {0}")]
    Decode(String),

    /// Video delegate failed to initialize (bad URI, codec, network).
    #[error("video init error: {0}")]
    VideoInit(String),

    /// No content kind could be determined for a sign entry.
    #[error("unresolvable content: {0}")]
    UnresolvableContent(String),

    /// Invalid user-provided configuration or input data.
    #[error("validation error: {0}")]
    Validation(String),

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl SignplayError {
    /// Build a [`SignplayError::Parse`] value.
    pub fn parse(msg: impl Into<String>) -> Self {
        Self::Parse(msg.into())
    }

    /// Build a [`SignplayError::Fetch`] value.
    pub fn fetch(msg: impl Into<String>) -> Self {
        Self::Fetch(msg.into())
    }

    /// Build a [`SignplayError::Decode`] value.
    pub fn decode(msg: impl Into<String>) -> Self {
        Self::Decode(msg.into())
    }

    /// Build a [`SignplayError::VideoInit`] value.
    pub fn video_init(msg: impl Into<String>) -> Self {
        Self::VideoInit(msg.into())
    }

    /// Build a [`SignplayError::UnresolvableContent`] value.
    pub fn unresolvable(msg: impl Into<String>) -> Self {
        Self::UnresolvableContent(msg.into())
    }

    /// Build a [`SignplayError::Validation`] value.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// User-facing description shown when a sign stalls.
    pub fn stall_message(&self) -> String {
        match self {
            Self::Fetch(m) => format!("could not load sign data ({m})"),
            Self::Decode(m) => format!("sign data is unreadable ({m})"),
            Self::VideoInit(m) => format!("video could not be played ({m})"),
            Self::UnresolvableContent(m) => format!("no playable content ({m})"),
            other => other.to_string(),
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
