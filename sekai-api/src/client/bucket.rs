use reqwest::blocking::Response;
use sekai_lib::query::{PAGE_SIZE, DELIMITER, LIST_TYPE};

use crate::client::error::{storage_error, RequestError};
use crate::client::ApiClient;
use crate::bucket::{ListBucketResult, BucketListing};

/// a single ListObjectsV2 request against the bucket
pub struct ListObjects {
    prefix: String,
    continuation_token: Option<String>,
}

impl ListObjects {
    pub fn prefix<P>(prefix: P) -> Self
    where
        P: Into<String>
    {
        ListObjects {
            prefix: prefix.into(),
            continuation_token: None,
        }
    }

    pub fn continuation_token<T>(&mut self, token: T) -> &mut Self
    where
        T: Into<Option<String>>
    {
        self.continuation_token = token.into();
        self
    }

    pub fn query(&self) -> Vec<(&'static str, String)> {
        let mut rtn = vec![
            ("list-type", LIST_TYPE.to_owned()),
            ("delimiter", DELIMITER.to_owned()),
            ("prefix", self.prefix.clone()),
            ("max-keys", PAGE_SIZE.to_string()),
        ];

        if let Some(token) = &self.continuation_token {
            rtn.push(("continuation-token", token.clone()));
        }

        rtn
    }

    pub fn send(&self, client: &ApiClient) -> Result<ListBucketResult, RequestError> {
        tracing::debug!(
            prefix = %self.prefix,
            token = ?self.continuation_token,
            "listing bucket"
        );

        let res = client.bucket_get()
            .query(&self.query())
            .send()?;

        if !res.status().is_success() {
            return Err(storage_error(res));
        }

        let body = res.text()?;

        Ok(ListBucketResult::from_xml(&body)?)
    }

    pub fn send_listing(&self, client: &ApiClient) -> Result<BucketListing, RequestError> {
        self.send(client).map(BucketListing::from)
    }
}

/// direct retrieval of an object from the bucket
pub struct RetrieveObject {
    key: String,
}

impl RetrieveObject {
    pub fn key<K>(key: K) -> Self
    where
        K: Into<String>
    {
        RetrieveObject { key: key.into() }
    }

    pub fn send(self, client: &ApiClient) -> Result<Response, RequestError> {
        tracing::debug!(key = %self.key, "retrieving object");

        let res = client.object_get(&self.key).send()?;

        if !res.status().is_success() {
            return Err(storage_error(res));
        }

        Ok(res)
    }

    /// retrieves the object for streaming to disk. the total request
    /// timeout does not apply so large media files are not cut off while
    /// the body is read.
    pub fn download(self, client: &ApiClient) -> Result<Response, RequestError> {
        tracing::debug!(key = %self.key, "downloading object");

        let res = client.object_transfer(&self.key).send()?;

        if !res.status().is_success() {
            return Err(storage_error(res));
        }

        Ok(res)
    }

    /// retrieves the object and parses the body as generic json
    pub fn send_json(self, client: &ApiClient) -> Result<serde_json::Value, RequestError> {
        let res = self.send(client)?;
        let bytes = res.bytes()?;

        Ok(serde_json::from_slice(&bytes)?)
    }
}
