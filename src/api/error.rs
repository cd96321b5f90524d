#[derive(Debug, Clone, thiserror::Error, PartialEq, Eq)]
pub enum ApiError {
    #[error("request to {url} failed: {message}")]
    Transport { url: String, message: String },
    #[error("response from {url} is not valid JSON: {message}")]
    Decode { url: String, message: String },
    #[error("unexpected response from {url}: {message}")]
    Shape { url: String, message: String },
}

impl ApiError {
    pub fn transport(url: &str, message: impl Into<String>) -> Self {
        Self::Transport {
            url: url.to_string(),
            message: message.into(),
        }
    }

    pub fn decode(url: &str, message: impl Into<String>) -> Self {
        Self::Decode {
            url: url.to_string(),
            message: message.into(),
        }
    }

    pub fn shape(url: &str, message: impl Into<String>) -> Self {
        Self::Shape {
            url: url.to_string(),
            message: message.into(),
        }
    }
}
