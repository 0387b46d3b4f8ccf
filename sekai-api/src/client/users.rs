use reqwest::blocking::multipart::{Form, Part};

use crate::client::error::{api_error, RequestError};
use crate::client::ApiClient;
use crate::users::{
    User,
    UserMetadata,
    UpdateUserMetadata as UpdateUserMetadataBody,
    UploadedFile,
    AVATAR_REF,
    AVATAR_FIELD,
};

pub struct RetrieveUserMe {}

impl RetrieveUserMe {
    pub fn new() -> Self {
        RetrieveUserMe {}
    }

    pub fn send(self, client: &ApiClient) -> Result<User, RequestError> {
        client.require_session()?;

        let res = client.get("users/me")?.send()?;

        match res.status() {
            reqwest::StatusCode::OK => Ok(res.json()?),
            _ => Err(api_error(res))
        }
    }
}

pub struct RetrieveUserMetadataMe {}

impl RetrieveUserMetadataMe {
    pub fn new() -> Self {
        RetrieveUserMetadataMe {}
    }

    pub fn send(self, client: &ApiClient) -> Result<UserMetadata, RequestError> {
        client.require_session()?;

        let res = client.get("user-metadata/me")?.send()?;

        match res.status() {
            reqwest::StatusCode::OK => Ok(res.json()?),
            _ => Err(api_error(res))
        }
    }
}

pub struct UpdateUserMetadata {
    id: u64,
    body: UpdateUserMetadataBody,
}

impl UpdateUserMetadata {
    pub fn id(id: u64) -> Self {
        UpdateUserMetadata {
            id,
            body: UpdateUserMetadataBody {
                nickname: None
            }
        }
    }

    pub fn nickname<N>(&mut self, nickname: N) -> &mut Self
    where
        N: Into<String>
    {
        self.body.nickname = Some(nickname.into());
        self
    }

    pub fn send(&self, client: &ApiClient) -> Result<UserMetadata, RequestError> {
        client.require_session()?;

        let res = client.put(format!("user-metadata/{}", self.id))?
            .json(&self.body)
            .send()?;

        match res.status() {
            reqwest::StatusCode::OK => Ok(res.json()?),
            _ => Err(api_error(res))
        }
    }
}

/// attaches a new image to the avatar field of a user metadata record
pub struct UploadAvatar {
    metadata_id: u64,
    file_name: String,
    mime: mime::Mime,
    contents: Vec<u8>,
}

impl UploadAvatar {
    pub fn new<N>(metadata_id: u64, file_name: N, mime: mime::Mime, contents: Vec<u8>) -> Self
    where
        N: Into<String>
    {
        UploadAvatar {
            metadata_id,
            file_name: file_name.into(),
            mime,
            contents,
        }
    }

    pub fn send(self, client: &ApiClient) -> Result<Vec<UploadedFile>, RequestError> {
        client.require_session()?;

        tracing::debug!(
            file = %self.file_name,
            mime = %self.mime,
            size = self.contents.len(),
            "uploading avatar"
        );

        let part = Part::bytes(self.contents)
            .file_name(self.file_name)
            .mime_str(self.mime.essence_str())?;

        let form = Form::new()
            .part("files", part)
            .text("refId", self.metadata_id.to_string())
            .text("ref", AVATAR_REF)
            .text("field", AVATAR_FIELD);

        let res = client.post("upload")?
            .multipart(form)
            .send()?;

        match res.status() {
            reqwest::StatusCode::OK |
            reqwest::StatusCode::CREATED => Ok(res.json()?),
            _ => Err(api_error(res))
        }
    }
}
