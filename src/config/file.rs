use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::error::{self, Context};
use crate::path::{metadata, normalize_from};

/// shape of the optional config file. every field may be overridden from
/// the command line.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Root {
    pub asset_domain: Option<String>,
    pub bucket: Option<String>,
    pub cms_url: Option<String>,
    pub request_timeout_secs: Option<u64>,
    pub session_file: Option<PathBuf>,
    pub user_agent: Option<String>,
}

pub fn load<B, P>(base: B, path: P) -> error::Result<(PathBuf, Root)>
where
    B: AsRef<Path>,
    P: AsRef<Path>,
{
    let config_path = normalize_from(base, path);

    let meta = metadata(&config_path)
        .context("failed to retrieve metadata for config file")?
        .context(format!("config file not found: \"{}\"", config_path.display()))?;

    if !meta.is_file() {
        return Err(error::Error::new()
            .context(format!("config path is not a file: \"{}\"", config_path.display())));
    }

    let Some(ext) = config_path.extension() else {
        return Err(error::Error::new()
            .context("failed to retrieve the file extension of the config file"));
    };

    let ext = ext.to_ascii_lowercase();
    let file = std::fs::OpenOptions::new()
        .read(true)
        .open(&config_path)
        .context("failed to open the specified config file")?;
    let reader = std::io::BufReader::new(file);

    let root: Root = if ext.eq("yaml") || ext.eq("yml") {
        serde_yaml::from_reader(reader)
            .context("there was an error when attempting to parse the yaml config file")?
    } else if ext.eq("json") {
        serde_json::from_reader(reader)
            .context("there was an error when attempting to parse the json config file")?
    } else {
        return Err(error::Error::new()
            .context("the specified config type is not yaml or json"));
    };

    Ok((config_path, root))
}
