use std::path::{Path, PathBuf};
use std::time::Duration;

use clap::Args;
use sekai_api::client::{ApiClient, DEFAULT_ASSET_DOMAIN, DEFAULT_CMS_URL, DEFAULT_TIMEOUT};
use sekai_lib::assets::DEFAULT_BUCKET;

use crate::error::{self, Context};
use crate::path::normalize_from;

mod file;

pub const DEFAULT_SESSION_FILE: &str = "sekai_session.json";

#[derive(Debug, Default, Args)]
pub struct ConfigArgs {
    /// a yaml or json file to load settings from
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// base url of the asset storage
    #[arg(long)]
    pub asset_domain: Option<String>,

    /// name of the bucket holding the assets
    #[arg(long)]
    pub bucket: Option<String>,

    /// base url of the cms api
    #[arg(long)]
    pub cms_url: Option<String>,

    /// request timeout in seconds, 0 disables it
    #[arg(long)]
    pub timeout: Option<u64>,

    /// file that stores the session token
    ///
    /// if a file is not specified then it will attempt to load
    /// "sekai_session.json" in the current working directory
    #[arg(long)]
    pub session: Option<PathBuf>,
}

#[derive(Debug)]
pub struct Config {
    pub asset_domain: String,
    pub bucket: String,
    pub cms_url: String,
    pub timeout: Option<Duration>,
    pub session_file: PathBuf,
    pub user_agent: Option<String>,
}

impl Config {
    pub fn build_client(&self) -> error::Result<ApiClient> {
        let mut builder = ApiClient::builder();
        builder.asset_domain(self.asset_domain.clone());
        builder.bucket(self.bucket.clone());
        builder.cms_url(self.cms_url.clone());
        builder.timeout(self.timeout);
        builder.session_file(self.session_file.clone());

        if let Some(agent) = &self.user_agent {
            builder.user_agent(agent.clone());
        }

        builder.build().context("failed to create api client")
    }
}

fn timeout_from_secs(secs: u64) -> Option<Duration> {
    if secs == 0 {
        None
    } else {
        Some(Duration::from_secs(secs))
    }
}

/// merges the config file, if any, with the command line. command line
/// values always win and relative paths in the file resolve against the
/// directory of the file.
pub fn get_config<P>(cwd: P, args: ConfigArgs) -> error::Result<Config>
where
    P: AsRef<Path>
{
    let cwd = cwd.as_ref();

    let (file_dir, root) = if let Some(path) = args.config {
        let (config_path, root) = file::load(cwd, path)?;
        let dir = config_path.parent()
            .map(ToOwned::to_owned)
            .unwrap_or_else(|| cwd.to_owned());

        (dir, root)
    } else {
        (cwd.to_owned(), file::Root::default())
    };

    let session_file = if let Some(path) = args.session {
        normalize_from(cwd, path)
    } else if let Some(path) = root.session_file {
        normalize_from(&file_dir, path)
    } else {
        cwd.join(DEFAULT_SESSION_FILE)
    };

    let timeout = if let Some(secs) = args.timeout {
        timeout_from_secs(secs)
    } else if let Some(secs) = root.request_timeout_secs {
        timeout_from_secs(secs)
    } else {
        Some(DEFAULT_TIMEOUT)
    };

    let config = Config {
        asset_domain: args.asset_domain
            .or(root.asset_domain)
            .unwrap_or(DEFAULT_ASSET_DOMAIN.into()),
        bucket: args.bucket
            .or(root.bucket)
            .unwrap_or(DEFAULT_BUCKET.into()),
        cms_url: args.cms_url
            .or(root.cms_url)
            .unwrap_or(DEFAULT_CMS_URL.into()),
        timeout,
        session_file,
        user_agent: root.user_agent,
    };

    tracing::debug!(?config, "resolved config");

    Ok(config)
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn defaults() {
        let config = get_config("/srv/viewer", ConfigArgs::default()).unwrap();

        assert_eq!(config.asset_domain, DEFAULT_ASSET_DOMAIN);
        assert_eq!(config.bucket, "sekai-assets");
        assert_eq!(config.cms_url, DEFAULT_CMS_URL);
        assert_eq!(config.timeout, Some(Duration::from_secs(30)));
        assert_eq!(config.session_file, PathBuf::from("/srv/viewer/sekai_session.json"));
    }

    #[test]
    fn cli_overrides_file() {
        let dir = tempfile::tempdir().unwrap();
        let config_path = dir.path().join("viewer.yaml");

        std::fs::write(&config_path, concat!(
            "bucket: from-file\n",
            "cms_url: https://cms.example.com/\n",
            "request_timeout_secs: 10\n",
            "session_file: state/session.json\n",
        )).unwrap();

        let args = ConfigArgs {
            config: Some(config_path),
            bucket: Some("from-cli".into()),
            timeout: Some(0),
            ..ConfigArgs::default()
        };

        let config = get_config("/srv/viewer", args).unwrap();

        assert_eq!(config.bucket, "from-cli");
        assert_eq!(config.cms_url, "https://cms.example.com/");
        assert_eq!(config.timeout, None);
        assert_eq!(config.session_file, dir.path().join("state/session.json"));
    }

    #[test]
    fn session_from_cli_is_relative_to_cwd() {
        let args = ConfigArgs {
            session: Some("../other.json".into()),
            ..ConfigArgs::default()
        };

        let config = get_config("/srv/viewer", args).unwrap();

        assert_eq!(config.session_file, PathBuf::from("/srv/other.json"));
    }

    #[test]
    fn builds_client() {
        let dir = tempfile::tempdir().unwrap();
        let args = ConfigArgs {
            asset_domain: Some("https://assets.example.com".into()),
            ..ConfigArgs::default()
        };

        let config = get_config(dir.path(), args).unwrap();
        let client = config.build_client().unwrap();

        assert_eq!(
            client.info().bucket_url.as_str(),
            "https://assets.example.com/sekai-assets/"
        );
        assert!(!client.is_authenticated());
    }
}
