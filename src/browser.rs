use sekai_api::bucket::{BucketListing, CommonPrefix, Content};
use sekai_api::client::ApiClient;
use sekai_api::client::bucket::ListObjects;
use sekai_api::client::error::RequestError;
use sekai_lib::path::FolderPath;

/// anything that can produce one page of a folder listing
pub trait ListingSource {
    type Error: std::fmt::Display;

    fn list(&self, prefix: &str, token: Option<&str>) -> Result<BucketListing, Self::Error>;
}

impl ListingSource for ApiClient {
    type Error = RequestError;

    fn list(&self, prefix: &str, token: Option<&str>) -> Result<BucketListing, Self::Error> {
        ListObjects::prefix(prefix)
            .continuation_token(token.map(|v| v.to_owned()))
            .send_listing(self)
    }
}

/// folder navigation and "load more" pagination over a bucket listing.
///
/// pages are appended in the order they are requested without reordering
/// or removing duplicates. a missing continuation token marks the listing
/// as exhausted.
#[derive(Debug, Default)]
pub struct ListingController {
    path: FolderPath,
    folders: Vec<CommonPrefix>,
    files: Vec<Content>,
    token: Option<String>,
    pages: usize,
}

impl ListingController {
    pub fn new() -> Self {
        ListingController::default()
    }

    pub fn path(&self) -> &FolderPath {
        &self.path
    }

    pub fn folders(&self) -> &[CommonPrefix] {
        &self.folders
    }

    pub fn files(&self) -> &[Content] {
        &self.files
    }

    pub fn has_more(&self) -> bool {
        self.token.is_some()
    }

    pub fn pages_loaded(&self) -> usize {
        self.pages
    }

    pub fn is_loaded(&self) -> bool {
        self.pages > 0
    }

    /// moves to the given folder, dropping everything accumulated for the
    /// previous one, and fetches the first page.
    ///
    /// on failure the controller stays on the new folder with nothing
    /// loaded.
    pub fn navigate<S>(&mut self, source: &S, path: FolderPath) -> Result<(), S::Error>
    where
        S: ListingSource
    {
        tracing::info!(path = %path, "navigating");

        self.path = path;
        self.folders.clear();
        self.files.clear();
        self.token = None;
        self.pages = 0;

        let prefix = self.path.prefix();

        let listing = source.list(&prefix, None).map_err(|err| {
            tracing::error!(path = %self.path, "failed to list folder: {err}");
            err
        })?;

        self.append(listing);

        Ok(())
    }

    /// re-fetches the first page of the current folder
    pub fn refresh<S>(&mut self, source: &S) -> Result<(), S::Error>
    where
        S: ListingSource
    {
        let path = self.path.clone();

        self.navigate(source, path)
    }

    /// moves to the parent folder. returns false when already at the root.
    pub fn up<S>(&mut self, source: &S) -> Result<bool, S::Error>
    where
        S: ListingSource
    {
        let Some(parent) = self.path.parent() else {
            return Ok(false);
        };

        self.navigate(source, parent)?;

        Ok(true)
    }

    /// moves into a folder from the loaded listing. the prefix is listed
    /// exactly as the bucket returned it.
    pub fn enter<S>(&mut self, source: &S, folder: &CommonPrefix) -> Result<(), S::Error>
    where
        S: ListingSource
    {
        self.navigate(source, FolderPath::from_prefix(&folder.prefix))
    }

    /// fetches the next page with the stored continuation token and
    /// appends it.
    ///
    /// returns false without issuing a request when the listing is
    /// exhausted. on failure the accumulated entries and the token are kept
    /// so the page can be requested again.
    pub fn load_more<S>(&mut self, source: &S) -> Result<bool, S::Error>
    where
        S: ListingSource
    {
        let Some(token) = self.token.clone() else {
            return Ok(false);
        };

        let prefix = self.path.prefix();

        let listing = source.list(&prefix, Some(&token)).map_err(|err| {
            tracing::error!(path = %self.path, page = self.pages + 1, "failed to load more entries: {err}");
            err
        })?;

        self.append(listing);

        Ok(true)
    }

    /// follows continuation tokens until the listing is exhausted. returns
    /// the number of additional pages loaded.
    pub fn load_all<S>(&mut self, source: &S) -> Result<usize, S::Error>
    where
        S: ListingSource
    {
        let mut count = 0;

        while self.load_more(source)? {
            count += 1;
        }

        Ok(count)
    }

    fn append(&mut self, listing: BucketListing) {
        self.pages += 1;

        tracing::info!(
            path = %self.path,
            page = self.pages,
            folders = listing.folders.len(),
            files = listing.files.len(),
            more = listing.next_token.is_some(),
            "loaded page"
        );

        self.folders.extend(listing.folders);
        self.files.extend(listing.files);
        self.token = listing.next_token;
    }

    /// finds a file in the loaded entries by its key or display name
    pub fn find_file(&self, given: &str) -> Option<&Content> {
        self.files.iter()
            .find(|v| v.key == given)
            .or_else(|| self.files.iter().find(|v| v.name() == given))
    }
}
