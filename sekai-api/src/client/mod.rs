use std::path::{Path, PathBuf};
use std::time::Duration;

use reqwest::Url;
use reqwest::blocking::RequestBuilder;
use serde::{Serialize, Deserialize};

pub mod error;
pub mod bucket;
pub mod users;
pub mod auth;

use error::{ApiClientError, RequestError};

pub const DEFAULT_ASSET_DOMAIN: &str = "http://localhost:9000/";
pub const DEFAULT_CMS_URL: &str = "http://localhost:1337/";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

pub struct Info {
    pub cms_url: Url,
    pub asset_domain: Url,
    pub bucket: String,
    /// `<asset_domain>/<bucket>/`
    pub bucket_url: Url,
}

/// persisted authentication data
#[derive(Debug, Default, Clone, Serialize, Deserialize)]
pub struct Session {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub jwt: Option<String>,
}

pub struct ApiClient {
    pub(crate) session_file: Option<Box<Path>>,
    pub(crate) session: Session,
    pub(crate) client: reqwest::blocking::Client,
    /// same as client but without a total timeout so long bodies can be
    /// streamed. only the connect phase is bounded.
    pub(crate) transfer: reqwest::blocking::Client,
    pub(crate) info: Info,
}

impl ApiClient {
    pub fn builder() -> ApiClientBuilder {
        ApiClientBuilder {
            cms_url: DEFAULT_CMS_URL.into(),
            asset_domain: DEFAULT_ASSET_DOMAIN.into(),
            bucket: sekai_lib::assets::DEFAULT_BUCKET.into(),
            timeout: Some(DEFAULT_TIMEOUT),
            file: None,
            agent: None,
        }
    }

    pub fn info(&self) -> &Info {
        &self.info
    }

    /// full url of an object in the bucket. every segment of the key is
    /// percent encoded.
    pub fn object_url(&self, key: &str) -> Url {
        let mut url = self.info.bucket_url.clone();

        if let Ok(mut segments) = url.path_segments_mut() {
            segments.pop_if_empty()
                .extend(key.trim_start_matches('/').split('/'));
        }

        url
    }

    pub(crate) fn bucket_get(&self) -> RequestBuilder {
        self.client.get(self.info.bucket_url.clone())
    }

    pub(crate) fn object_get(&self, key: &str) -> RequestBuilder {
        self.client.get(self.object_url(key))
    }

    pub(crate) fn object_transfer(&self, key: &str) -> RequestBuilder {
        self.transfer.get(self.object_url(key))
    }

    fn cms_url<U>(&self, path: U) -> Result<Url, RequestError>
    where
        U: AsRef<str>
    {
        Ok(self.info.cms_url.join(path.as_ref().trim_start_matches('/'))?)
    }

    fn authorize(&self, builder: RequestBuilder) -> RequestBuilder {
        if let Some(jwt) = &self.session.jwt {
            builder.bearer_auth(jwt)
        } else {
            builder
        }
    }

    pub(crate) fn get<U>(&self, path: U) -> Result<RequestBuilder, RequestError>
    where
        U: AsRef<str>,
    {
        let url = self.cms_url(path)?;

        Ok(self.authorize(self.client.get(url)))
    }

    pub(crate) fn post<U>(&self, path: U) -> Result<RequestBuilder, RequestError>
    where
        U: AsRef<str>
    {
        let url = self.cms_url(path)?;

        Ok(self.authorize(self.client.post(url)))
    }

    pub(crate) fn put<U>(&self, path: U) -> Result<RequestBuilder, RequestError>
    where
        U: AsRef<str>
    {
        let url = self.cms_url(path)?;

        Ok(self.authorize(self.client.put(url)))
    }

    pub(crate) fn require_session(&self) -> Result<(), RequestError> {
        if self.session.jwt.is_some() {
            Ok(())
        } else {
            Err(RequestError::Unauthenticated)
        }
    }

    pub fn is_authenticated(&self) -> bool {
        self.session.jwt.is_some()
    }

    pub fn set_token(&mut self, jwt: Option<String>) {
        self.session.jwt = jwt;
    }

    pub fn save_session(&self) -> Result<bool, ApiClientError> {
        let Some(session_file) = &self.session_file else {
            return Ok(false);
        };

        save_session_file(session_file, &self.session)?;

        Ok(true)
    }

    /// drops the current token and removes the session file if one exists
    pub fn clear_session(&mut self) -> Result<(), ApiClientError> {
        self.session.jwt = None;

        let Some(session_file) = &self.session_file else {
            return Ok(());
        };

        match std::fs::remove_file(session_file) {
            Ok(()) => Ok(()),
            Err(err) => match err.kind() {
                std::io::ErrorKind::NotFound => Ok(()),
                _ => Err(ApiClientError::StdIo(err))
            }
        }
    }
}

pub fn load_session_file(path: &Path, exists: bool) -> Result<Session, ApiClientError> {
    match std::fs::OpenOptions::new()
        .read(true)
        .open(path) {
        Ok(file) => {
            let reader = std::io::BufReader::new(file);

            serde_json::from_reader(reader)
                .map_err(|e| ApiClientError::SessionFile(e))
        },
        Err(err) => match err.kind() {
            std::io::ErrorKind::NotFound => {
                if exists {
                    Err(ApiClientError::StdIo(err))
                } else {
                    Ok(Session::default())
                }
            },
            _ => Err(ApiClientError::StdIo(err))
        }
    }
}

pub fn save_session_file(path: &Path, session: &Session) -> Result<(), ApiClientError> {
    let file = std::fs::OpenOptions::new()
        .write(true)
        .truncate(true)
        .create(true)
        .open(path)
        .map_err(|e| ApiClientError::StdIo(e))?;
    let writer = std::io::BufWriter::new(file);

    serde_json::to_writer(writer, session)
        .map_err(|e| ApiClientError::SessionFile(e))
}

fn parse_base(given: &str, name: &'static str) -> Result<Url, ApiClientError> {
    let mut url = Url::parse(given)
        .map_err(|_e| ApiClientError::InvalidUrl(name))?;

    if url.cannot_be_a_base() {
        return Err(ApiClientError::InvalidUrl(name));
    }

    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }

    Ok(url)
}

pub struct ApiClientBuilder {
    cms_url: String,
    asset_domain: String,
    bucket: String,
    timeout: Option<Duration>,
    file: Option<PathBuf>,
    agent: Option<String>,
}

impl ApiClientBuilder {
    pub fn cms_url<U>(&mut self, url: U)
    where
        U: Into<String>
    {
        self.cms_url = url.into();
    }

    pub fn asset_domain<U>(&mut self, url: U)
    where
        U: Into<String>
    {
        self.asset_domain = url.into();
    }

    pub fn bucket<B>(&mut self, bucket: B)
    where
        B: Into<String>
    {
        self.bucket = bucket.into();
    }

    /// None disables the request timeout
    pub fn timeout(&mut self, timeout: Option<Duration>) {
        self.timeout = timeout;
    }

    pub fn session_file(&mut self, path: PathBuf) {
        self.file = Some(path);
    }

    pub fn user_agent<U>(&mut self, user_agent: U)
    where
        U: Into<String>
    {
        self.agent = Some(user_agent.into());
    }

    pub fn build(self) -> Result<ApiClient, ApiClientError> {
        let user_agent = self.agent.unwrap_or("sekai-viewer/0.1.0".into());
        let cms_url = parse_base(&self.cms_url, "cms_url")?;
        let asset_domain = parse_base(&self.asset_domain, "asset_domain")?;

        let bucket = self.bucket.trim_matches('/').to_owned();

        if bucket.is_empty() {
            return Err(ApiClientError::InvalidUrl("bucket"));
        }

        let bucket_url = asset_domain.join(&format!("{}/", bucket))
            .map_err(|_e| ApiClientError::InvalidUrl("bucket"))?;

        let session = if let Some(path) = &self.file {
            load_session_file(path, false)?
        } else {
            Session::default()
        };

        // the blocking client applies a default timeout unless explicitly
        // cleared
        let client = reqwest::blocking::Client::builder()
            .user_agent(user_agent.clone())
            .timeout(self.timeout)
            .build()
            .map_err(|e| ApiClientError::Reqwest(e))?;

        let transfer = reqwest::blocking::Client::builder()
            .user_agent(user_agent)
            .timeout(Option::<Duration>::None)
            .connect_timeout(self.timeout)
            .build()
            .map_err(|e| ApiClientError::Reqwest(e))?;

        tracing::debug!(
            cms = %cms_url,
            bucket = %bucket_url,
            timeout = ?self.timeout,
            "created api client"
        );

        Ok(ApiClient {
            session_file: self.file.map(|v| v.into_boxed_path()),
            session,
            client,
            transfer,
            info: Info {
                cms_url,
                asset_domain,
                bucket,
                bucket_url,
            }
        })
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn client() -> ApiClient {
        let mut builder = ApiClient::builder();
        builder.asset_domain("http://assets.local:9000");
        builder.cms_url("http://cms.local/api");

        builder.build().unwrap()
    }

    #[test]
    fn base_urls_have_trailing_slash() {
        let client = client();

        assert_eq!(client.info().cms_url.as_str(), "http://cms.local/api/");
        assert_eq!(client.info().bucket_url.as_str(), "http://assets.local:9000/sekai-assets/");
        assert_eq!(
            client.cms_url("users/me").unwrap().as_str(),
            "http://cms.local/api/users/me"
        );
    }

    #[test]
    fn object_urls_are_encoded() {
        let client = client();

        assert_eq!(
            client.object_url("music/long/vs_0001.mp3").as_str(),
            "http://assets.local:9000/sekai-assets/music/long/vs_0001.mp3"
        );
        assert_eq!(
            client.object_url("event/a b#1.png").as_str(),
            "http://assets.local:9000/sekai-assets/event/a%20b%231.png"
        );
    }

    #[test]
    fn transfers_target_the_object_url() {
        let mut builder = ApiClient::builder();
        builder.asset_domain("http://assets.local:9000");
        builder.timeout(Some(Duration::from_secs(1)));

        let client = builder.build().unwrap();

        let request = client.object_transfer("movie/op 01.mp4").build().unwrap();

        assert_eq!(request.url(), &client.object_url("movie/op 01.mp4"));
        assert_eq!(request.timeout(), None);
    }

    #[test]
    fn invalid_urls_are_rejected() {
        let mut builder = ApiClient::builder();
        builder.cms_url("not a url");

        assert!(matches!(builder.build(), Err(ApiClientError::InvalidUrl("cms_url"))));

        let mut builder = ApiClient::builder();
        builder.bucket("/");

        assert!(matches!(builder.build(), Err(ApiClientError::InvalidUrl("bucket"))));
    }

    #[test]
    fn session_round_trip_and_clear() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session.json");

        let mut builder = ApiClient::builder();
        builder.session_file(path.clone());

        let mut client = builder.build().unwrap();

        assert!(!client.is_authenticated());

        client.set_token(Some("token".into()));
        assert!(client.save_session().unwrap());

        let loaded = load_session_file(&path, true).unwrap();
        assert_eq!(loaded.jwt.as_deref(), Some("token"));

        client.clear_session().unwrap();
        assert!(!client.is_authenticated());
        assert!(!path.exists());
    }

    #[test]
    fn missing_session_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing.json");

        assert!(load_session_file(&path, false).unwrap().jwt.is_none());
        assert!(matches!(load_session_file(&path, true), Err(ApiClientError::StdIo(_))));
    }
}
