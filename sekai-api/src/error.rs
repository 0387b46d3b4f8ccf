use serde::{Serialize, Deserialize};

/// message portion of a cms error.
///
/// the cms returns either a plain string or a list of structured validation
/// messages depending on where the request failed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ErrorMessage {
    Text(String),
    Detail(serde_json::Value),
}

impl std::fmt::Display for ErrorMessage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ErrorMessage::Text(v) => f.write_str(v),
            ErrorMessage::Detail(v) => write!(f, "{}", v),
        }
    }
}

/// error body returned by the cms
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiError {
    #[serde(rename = "statusCode", default)]
    status_code: Option<u16>,
    #[serde(default)]
    error: Option<String>,
    #[serde(default)]
    message: Option<ErrorMessage>,
}

impl ApiError {
    pub fn new() -> Self {
        ApiError {
            status_code: None,
            error: None,
            message: None,
        }
    }

    pub fn with_status(mut self, status: u16) -> Self {
        self.status_code = Some(status);
        self
    }

    pub fn with_error<E>(mut self, error: E) -> Self
    where
        E: Into<String>
    {
        self.error = Some(error.into());
        self
    }

    pub fn status_code(&self) -> Option<u16> {
        self.status_code
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn message(&self) -> Option<&ErrorMessage> {
        self.message.as_ref()
    }
}

impl std::default::Default for ApiError {
    fn default() -> Self {
        ApiError::new()
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if let Some(status) = &self.status_code {
            write!(f, "{} ", status)?;
        }

        write!(f, "{}", self.error.as_deref().unwrap_or("ApiError"))?;

        if let Some(msg) = &self.message {
            write!(f, ": {}", msg)?;
        }

        Ok(())
    }
}

impl std::error::Error for ApiError {}

/// error document returned by the object storage
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename = "Error")]
pub struct StorageError {
    #[serde(rename = "Code")]
    pub code: String,
    #[serde(rename = "Message", default)]
    pub message: Option<String>,
    #[serde(rename = "Resource", default)]
    pub resource: Option<String>,
    #[serde(rename = "RequestId", default)]
    pub request_id: Option<String>,
}

impl StorageError {
    pub fn from_xml(given: &str) -> Result<Self, quick_xml::DeError> {
        quick_xml::de::from_str(given)
    }

    /// fallback for responses that do not carry an error document
    pub fn from_status(status: u16) -> Self {
        StorageError {
            code: format!("Http{}", status),
            message: None,
            resource: None,
            request_id: None,
        }
    }
}

impl std::fmt::Display for StorageError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.code)?;

        if let Some(msg) = &self.message {
            write!(f, ": {}", msg)?;
        }

        Ok(())
    }
}

impl std::error::Error for StorageError {}
