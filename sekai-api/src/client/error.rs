use std::error::Error;
use std::fmt;

use reqwest::blocking::Response;

use crate::{ApiError, StorageError};

#[derive(Debug)]
pub enum ApiClientError {
    InvalidUrl(&'static str),
    SessionFile(serde_json::Error),
    Reqwest(reqwest::Error),
    StdIo(std::io::Error),
}

impl fmt::Display for ApiClientError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiClientError::InvalidUrl(name) => write!(f, "ApiClientError::InvalidUrl {}", name),
            ApiClientError::SessionFile(_) => write!(f, "ApiClientError::SessionFile"),
            ApiClientError::Reqwest(_) => write!(f, "ApiClientError::Reqwest"),
            ApiClientError::StdIo(_) => write!(f, "ApiClientError::StdIo"),
        }
    }
}

impl Error for ApiClientError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            ApiClientError::SessionFile(v) => Some(v),
            ApiClientError::Reqwest(v) => Some(v),
            ApiClientError::StdIo(v) => Some(v),
            _ => None
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum RequestError {
    #[error(transparent)]
    Api(#[from] ApiError),

    #[error(transparent)]
    Storage(#[from] StorageError),

    #[error(transparent)]
    Reqwest(#[from] reqwest::Error),

    #[error("invalid listing document: {0}")]
    Xml(#[from] quick_xml::DeError),

    #[error("invalid json document: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid request url: {0}")]
    Url(#[from] url::ParseError),

    #[error("not authenticated")]
    Unauthenticated,
}

impl RequestError {
    /// error for a failed cms response. a body that is not a cms error
    /// document still keeps the status of the response
    pub fn from_api_body(status: reqwest::StatusCode, body: &str) -> Self {
        match serde_json::from_str::<ApiError>(body) {
            Ok(err) => RequestError::Api(err),
            Err(_) => {
                let mut err = ApiError::new().with_status(status.as_u16());

                if let Some(reason) = status.canonical_reason() {
                    err = err.with_error(reason);
                }

                RequestError::Api(err)
            }
        }
    }

    /// error for a failed storage response, preferring the error document
    /// in the body over the bare status
    pub fn from_storage_body(status: reqwest::StatusCode, body: &str) -> Self {
        match StorageError::from_xml(body) {
            Ok(err) => RequestError::Storage(err),
            Err(_) => RequestError::Storage(StorageError::from_status(status.as_u16())),
        }
    }

    pub fn is_timeout(&self) -> bool {
        match self {
            RequestError::Reqwest(err) => err.is_timeout(),
            _ => false
        }
    }
}

pub(crate) fn api_error(res: Response) -> RequestError {
    let status = res.status();

    match res.text() {
        Ok(body) => RequestError::from_api_body(status, &body),
        Err(err) => RequestError::Reqwest(err),
    }
}

pub(crate) fn storage_error(res: Response) -> RequestError {
    let status = res.status();

    match res.text() {
        Ok(body) => RequestError::from_storage_body(status, &body),
        Err(err) => RequestError::Reqwest(err),
    }
}

#[cfg(test)]
mod test {
    use reqwest::StatusCode;

    use super::*;

    #[test]
    fn storage_error_document_is_parsed() {
        let body = r#"<?xml version="1.0" encoding="UTF-8"?>
<Error><Code>NoSuchKey</Code><Message>The specified key does not exist.</Message><Resource>/sekai-assets/music/missing.mp3</Resource></Error>"#;

        let RequestError::Storage(err) = RequestError::from_storage_body(StatusCode::NOT_FOUND, body) else {
            panic!("expected a storage error");
        };

        assert_eq!(err.code, "NoSuchKey");
        assert_eq!(err.message.as_deref(), Some("The specified key does not exist."));
    }

    #[test]
    fn storage_error_falls_back_to_status() {
        let given = RequestError::from_storage_body(StatusCode::BAD_GATEWAY, "<html>bad gateway</html>");

        let RequestError::Storage(err) = given else {
            panic!("expected a storage error");
        };

        assert_eq!(err.code, "Http502");
        assert_eq!(err.message, None);

        let RequestError::Storage(err) = RequestError::from_storage_body(StatusCode::FORBIDDEN, "") else {
            panic!("expected a storage error");
        };

        assert_eq!(err.to_string(), "Http403");
    }

    #[test]
    fn api_error_body_is_parsed() {
        let body = r#"{"statusCode":401,"error":"Unauthorized","message":"Invalid token."}"#;

        let RequestError::Api(err) = RequestError::from_api_body(StatusCode::UNAUTHORIZED, body) else {
            panic!("expected an api error");
        };

        assert_eq!(err.to_string(), "401 Unauthorized: Invalid token.");
    }

    #[test]
    fn api_error_falls_back_to_status() {
        let RequestError::Api(err) = RequestError::from_api_body(StatusCode::BAD_GATEWAY, "upstream down") else {
            panic!("expected an api error");
        };

        assert_eq!(err.status_code(), Some(502));
        assert_eq!(err.error(), Some("Bad Gateway"));
        assert_eq!(err.to_string(), "502 Bad Gateway");
    }
}
