/// Every failure the converter can surface, grouped by where it stops.
#[derive(Debug, thiserror::Error)]
pub enum ConvertError {
    #[error("Please enter a valid YouTube URL")]
    InvalidUrl,

    #[error("Clipboard access denied: {0}")]
    Clipboard(#[from] arboard::Error),

    #[error("{0}")]
    Backend(String),

    #[error("{0}")]
    Transport(#[from] reqwest::Error),

    #[error("missing `{0}` in conversion response")]
    Malformed(&'static str),

    #[error("{0}")]
    Io(#[from] std::io::Error),
}

impl ConvertError {
    /// Backend errors arrive without a message when the server gave none.
    pub fn backend(message: Option<String>) -> Self {
        Self::Backend(message.unwrap_or_else(|| "Conversion failed".to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_backend_message_fallback() {
        assert_eq!(ConvertError::backend(None).to_string(), "Conversion failed");
        assert_eq!(
            ConvertError::backend(Some("quota exceeded".into())).to_string(),
            "quota exceeded"
        );
    }

    #[test]
    fn test_io_message_is_passed_through() {
        let err: ConvertError =
            std::io::Error::new(std::io::ErrorKind::ConnectionRefused, "connection refused").into();
        assert_eq!(err.to_string(), "connection refused");
    }
}
