use std::fs::FileType;
use std::path::PathBuf;

use clap::Args;
use sekai_api::client::bucket::RetrieveObject;
use sekai_lib::path::{file_name, FolderPath};

use crate::error::{self, Context};
use crate::formatting::{self, BaseSize, OutputOptions};
use crate::path::{metadata, normalize_from};
use crate::preview::{PreviewBody, PreviewState};
use crate::state::AppState;

#[derive(Debug, Args)]
pub struct LsArgs {
    /// folder to navigate to before listing
    path: Option<String>,

    /// follows continuation tokens until every entry is loaded
    #[arg(long)]
    all: bool,

    #[command(flatten)]
    format_options: OutputOptions,
}

#[derive(Debug, Args)]
pub struct CdArgs {
    /// folder to navigate to
    path: String,
}

#[derive(Debug, Args)]
pub struct PreviewArgs {
    /// key or name of the file in the current folder
    key: String,

    /// how many levels of an asset tree to expand
    #[arg(long, default_value_t = 0)]
    depth: usize,
}

#[derive(Debug, Args)]
pub struct OpenArgs {
    /// key or name of the file in the current folder
    key: String,
}

#[derive(Debug, Args)]
pub struct DownloadArgs {
    /// key or name of the file in the current folder
    key: String,

    /// the output path for the file
    #[arg(short, long)]
    output: Option<PathBuf>,

    #[command(flatten)]
    format_options: OutputOptions,
}

/// resolves a given file reference to an object key. names of loaded files
/// win, absolute values are taken from the bucket root and anything else
/// is relative to the current folder.
fn resolve_key(state: &AppState, given: &str) -> error::Result<String> {
    if let Some(file) = state.browser.find_file(given) {
        return Ok(file.key.clone());
    }

    let key = if let Some(absolute) = given.strip_prefix('/') {
        absolute.to_owned()
    } else {
        format!("{}{}", state.browser.path().prefix(), given)
    };

    if key.is_empty() || key.ends_with('/') {
        return Err(format!("\"{given}\" is not a file").into());
    }

    Ok(key)
}

fn print_listing(state: &AppState, options: &OutputOptions) -> error::Result {
    let mut stdout = std::io::stdout();

    formatting::write_listing(&mut stdout, &state.browser, options)?;

    Ok(())
}

/// a loaded folder given by its name or its prefix relative to the current
/// folder is entered directly, anything else is resolved as a path from the
/// current folder
fn navigate(state: &mut AppState, given: &str) -> error::Result {
    state.preview.close();

    let name = given.strip_suffix('/').unwrap_or(given);
    let relative = format!("{}{}", state.browser.path().prefix(), given);

    let loaded = state.browser.folders()
        .iter()
        .find(|v| v.prefix == relative || (!name.is_empty() && v.name() == name))
        .cloned();

    let result = if let Some(folder) = loaded {
        state.browser.enter(&state.client, &folder)
    } else {
        let path = state.browser.path().resolve(given);

        state.browser.navigate(&state.client, path)
    };

    result.context(format!("failed to list \"{given}\""))
}

pub fn ls(state: &mut AppState, args: LsArgs) -> error::Result {
    if let Some(path) = &args.path {
        navigate(state, path)?;
    } else {
        state.ensure_listing()?;
    }

    if args.all {
        state.browser.load_all(&state.client)
            .context("failed to load remaining entries")?;
    }

    print_listing(state, &args.format_options)
}

pub fn cd(state: &mut AppState, args: CdArgs) -> error::Result {
    navigate(state, &args.path)?;

    print_listing(state, &OutputOptions::default())
}

pub fn up(state: &mut AppState) -> error::Result {
    if !state.browser.up(&state.client).context("failed to list parent folder")? {
        println!("already at the root folder");

        return Ok(());
    }

    print_listing(state, &OutputOptions::default())
}

pub fn more(state: &mut AppState) -> error::Result {
    if !state.browser.is_loaded() {
        state.ensure_listing()?;
    } else if !state.browser.load_more(&state.client).context("failed to load more entries")? {
        println!("no more entries");

        return Ok(());
    }

    print_listing(state, &OutputOptions::default())
}

pub fn refresh(state: &mut AppState) -> error::Result {
    state.browser.refresh(&state.client)
        .context("failed to refresh folder")?;

    print_listing(state, &OutputOptions::default())
}

pub fn pwd(state: &mut AppState) -> error::Result {
    let path: &FolderPath = state.browser.path();

    println!("{path}");
    println!("route: {}", path.route());

    Ok(())
}

pub fn preview(state: &mut AppState, args: PreviewArgs) -> error::Result {
    let key = resolve_key(state, &args.key)?;

    match state.preview.open(&state.client, &key) {
        PreviewState::Ready(preview) => {
            println!("{} ({})", preview.name(), preview.kind);
            println!("url: {}", preview.url);
            println!("mime: {}", preview.mime);

            match &preview.body {
                PreviewBody::Image => println!("image preview: {}", preview.url),
                PreviewBody::Video => println!("video player: {}", preview.url),
                PreviewBody::Audio => println!("audio player: {}", preview.url),
                PreviewBody::Asset(data) => {
                    let mut stdout = std::io::stdout();

                    formatting::write_json_tree(&mut stdout, data, args.depth)?;
                }
                PreviewBody::None => println!("no preview available for this file type"),
            }

            Ok(())
        }
        PreviewState::Failed { key, message } => {
            Err(format!("failed to load \"{key}\": {message}").into())
        }
        PreviewState::Loading { .. } | PreviewState::Idle => Ok(()),
    }
}

pub fn open(state: &mut AppState, args: OpenArgs) -> error::Result {
    let key = resolve_key(state, &args.key)?;

    println!("{}", state.client.object_url(&key));

    Ok(())
}

#[cfg(target_family = "unix")]
fn is_stream(file_type: &FileType) -> bool {
    use std::os::unix::fs::FileTypeExt;

    file_type.is_fifo() || file_type.is_char_device()
}

#[cfg(not(target_family = "unix"))]
fn is_stream(_file_type: &FileType) -> bool {
    false
}

fn resolve_file_path(given: Option<PathBuf>, filename: &str) -> error::Result<PathBuf> {
    let curr_dir = std::env::current_dir()
        .context("failed to retrieve current working directory")?;

    let Some(given) = given else {
        return Ok(curr_dir.join(filename));
    };

    let mut resolved = normalize_from(&curr_dir, given);

    if let Some(metadata) = metadata(&resolved)
        .context("failed to resolve the output path")?
    {
        let file_type = metadata.file_type();

        if file_type.is_dir() {
            resolved.push(filename);

            Ok(resolved)
        } else if file_type.is_file() || is_stream(&file_type) {
            Ok(resolved)
        } else {
            Err("output path is not a file or directory".into())
        }
    } else {
        let parent = resolved.parent()
            .context("output path does not exist")?;

        let metadata = metadata(parent)
            .context("failed to resolve output_path")?
            .context("output path does not exist")?;

        if !metadata.is_dir() {
            return Err("output path is not a directory".into());
        }

        Ok(resolved)
    }
}

pub fn download(state: &mut AppState, mut args: DownloadArgs) -> error::Result {
    let key = resolve_key(state, &args.key)?;
    let output_path = resolve_file_path(args.output.take(), file_name(&key))?;

    let mut response = RetrieveObject::key(key.clone())
        .download(&state.client)
        .context(format!("failed to download \"{key}\""))?;

    let mut output = std::fs::OpenOptions::new()
        .write(true)
        .truncate(true)
        .create(true)
        .open(&output_path)
        .context("failed to open output file")?;

    let start = std::time::Instant::now();

    let bytes_read = response.copy_to(&mut output)
        .context("error when reading response")?;

    let duration = start.elapsed();

    let bits_read = (bytes_read as u128) * 8;
    let millis = duration.as_millis().max(1);
    let bits_per_sec = (bits_read * 1000) / millis;

    tracing::info!(%key, path = %output_path.display(), bytes = bytes_read, "downloaded object");

    println!(
        "{} {} {duration:#?} {}",
        output_path.display(),
        formatting::bytes_to_unit(bytes_read, &args.format_options.size_format),
        formatting::value_to_unit(bits_per_sec as u64, &BaseSize::Base10, "b/s"),
    );

    Ok(())
}

#[cfg(test)]
mod test {
    use sekai_api::client::ApiClient;

    use super::*;

    fn state() -> AppState {
        AppState::new(ApiClient::builder().build().unwrap())
    }

    #[test]
    fn relative_key_uses_current_folder() {
        let mut state = state();
        let path = FolderPath::parse("music/bgm");

        // the fetch fails but the folder is still entered
        let _ = state.browser.navigate(&Unreachable, path);

        assert_eq!(resolve_key(&state, "op.mp3").unwrap(), "music/bgm/op.mp3");
        assert_eq!(resolve_key(&state, "/card/a.png").unwrap(), "card/a.png");
        assert!(resolve_key(&state, "/").is_err());
        assert!(resolve_key(&state, "nested/").is_err());
    }

    struct Unreachable;

    impl crate::browser::ListingSource for Unreachable {
        type Error = String;

        fn list(&self, _prefix: &str, _token: Option<&str>) -> Result<sekai_api::bucket::BucketListing, Self::Error> {
            Err("offline".to_owned())
        }
    }

    #[test]
    fn output_into_directory() {
        let dir = tempfile::tempdir().unwrap();

        let resolved = resolve_file_path(Some(dir.path().to_owned()), "card.png").unwrap();
        assert_eq!(resolved, dir.path().join("card.png"));

        let resolved = resolve_file_path(Some(dir.path().join("renamed.png")), "card.png").unwrap();
        assert_eq!(resolved, dir.path().join("renamed.png"));

        assert!(resolve_file_path(Some(dir.path().join("missing/card.png")), "card.png").is_err());
    }
}
