use std::fmt::{Display, Formatter, Result as FmtResult};

/// route prefix that the asset viewer lives under
pub const ROUTE_PREFIX: &str = "/asset_viewer/";

/// the current folder of the asset viewer as a list of path segments.
///
/// the root of the bucket is the empty list. segments never contain the
/// delimiter. paths typed by a user never have empty segments but a prefix
/// returned by a listing may, for example `a//`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct FolderPath {
    segments: Vec<String>,
}

impl FolderPath {
    pub fn root() -> Self {
        FolderPath {
            segments: Vec::new()
        }
    }

    /// splits a delimited path into segments, dropping any empty segments
    /// from leading, trailing or repeated slashes.
    pub fn parse<P>(given: P) -> Self
    where
        P: AsRef<str>
    {
        let segments = given.as_ref()
            .split('/')
            .filter(|v| !v.is_empty())
            .map(|v| v.to_owned())
            .collect();

        FolderPath { segments }
    }

    /// parses a viewer route such as `/asset_viewer/music/long/`.
    ///
    /// the route prefix is optional so `asset_viewer/music` and `music`
    /// resolve to the same folder.
    pub fn from_route<P>(route: P) -> Self
    where
        P: AsRef<str>
    {
        let route_ref = route.as_ref();
        let trimmed = route_ref.trim_start_matches('/');

        let without = if let Some(rest) = trimmed.strip_prefix(ROUTE_PREFIX.trim_start_matches('/')) {
            rest
        } else if trimmed == ROUTE_PREFIX.trim_matches('/') {
            ""
        } else {
            trimmed
        };

        Self::parse(without)
    }

    /// a folder path from a common prefix returned by a listing, for
    /// example `music/long/`.
    ///
    /// only the trailing delimiter is removed so that `prefix()` gives back
    /// the exact prefix, empty segments included.
    pub fn from_prefix<P>(prefix: P) -> Self
    where
        P: AsRef<str>
    {
        let prefix_ref = prefix.as_ref();

        if prefix_ref.is_empty() {
            return FolderPath::root();
        }

        let trimmed = prefix_ref.strip_suffix('/').unwrap_or(prefix_ref);

        FolderPath {
            segments: trimmed.split('/').map(|v| v.to_owned()).collect()
        }
    }

    /// resolves a path given relative to this one.
    ///
    /// a leading `/` starts from the root, `..` moves to the parent and
    /// `.` is ignored. a viewer route is also accepted.
    pub fn resolve<P>(&self, given: P) -> Self
    where
        P: AsRef<str>
    {
        let given_ref = given.as_ref();

        if given_ref.starts_with(ROUTE_PREFIX) || given_ref == ROUTE_PREFIX.trim_end_matches('/') {
            return Self::from_route(given_ref);
        }

        let mut rtn = if given_ref.starts_with('/') {
            FolderPath::root()
        } else {
            self.clone()
        };

        for segment in given_ref.split('/') {
            match segment {
                "" | "." => {},
                ".." => {
                    rtn.segments.pop();
                },
                name => rtn.segments.push(name.to_owned()),
            }
        }

        rtn
    }

    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    pub fn is_root(&self) -> bool {
        self.segments.is_empty()
    }

    /// the prefix used when listing this folder.
    ///
    /// always ends with the delimiter unless it is the root, in which case
    /// it is empty.
    pub fn prefix(&self) -> String {
        if self.segments.is_empty() {
            return String::new();
        }

        let mut rtn = self.segments.join("/");
        rtn.push('/');
        rtn
    }

    /// the viewer route for this folder
    pub fn route(&self) -> String {
        format!("{}{}", ROUTE_PREFIX, self.prefix())
    }

    pub fn parent(&self) -> Option<Self> {
        if self.segments.is_empty() {
            return None;
        }

        let mut segments = self.segments.clone();
        segments.pop();

        Some(FolderPath { segments })
    }

    /// navigation trail from the root to this folder.
    ///
    /// the first crumb is always the root and the last crumb is the current
    /// folder, which is the only one that is not navigable.
    pub fn breadcrumbs(&self) -> Vec<Breadcrumb> {
        let mut rtn = Vec::with_capacity(self.segments.len() + 1);

        rtn.push(Breadcrumb {
            name: None,
            path: FolderPath::root(),
            current: self.segments.is_empty(),
        });

        for index in 0..self.segments.len() {
            rtn.push(Breadcrumb {
                name: Some(self.segments[index].clone()),
                path: FolderPath {
                    segments: self.segments[..=index].to_vec()
                },
                current: index == self.segments.len() - 1,
            });
        }

        rtn
    }
}

impl Display for FolderPath {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(f, "/")?;

        for segment in &self.segments {
            write!(f, "{segment}/")?;
        }

        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Breadcrumb {
    /// None for the root crumb
    pub name: Option<String>,
    pub path: FolderPath,
    pub current: bool,
}

/// display name of a common prefix, `music/long/` becomes `long`. the name
/// of `a//` is empty.
pub fn folder_name(prefix: &str) -> &str {
    prefix.strip_suffix('/')
        .unwrap_or(prefix)
        .rsplit('/')
        .next()
        .unwrap_or(prefix)
}

/// display name of an object key, `music/long/se_0001.mp3` becomes
/// `se_0001.mp3`.
pub fn file_name(key: &str) -> &str {
    key.rsplit('/')
        .next()
        .unwrap_or(key)
}

#[cfg(test)]
mod test {
    use super::*;

    fn segs(path: &FolderPath) -> Vec<&str> {
        path.segments().iter().map(|v| v.as_str()).collect()
    }

    #[test]
    fn parse_drops_empty_segments() {
        assert!(FolderPath::parse("").is_root());
        assert!(FolderPath::parse("/").is_root());
        assert_eq!(segs(&FolderPath::parse("music/long/")), vec!["music", "long"]);
        assert_eq!(segs(&FolderPath::parse("//music///long")), vec!["music", "long"]);
    }

    #[test]
    fn from_route() {
        assert!(FolderPath::from_route("/asset_viewer/").is_root());
        assert!(FolderPath::from_route("/asset_viewer").is_root());
        assert_eq!(
            segs(&FolderPath::from_route("/asset_viewer/music/long/")),
            vec!["music", "long"]
        );
        assert_eq!(segs(&FolderPath::from_route("music/long")), vec!["music", "long"]);
    }

    #[test]
    fn prefix_has_trailing_delimiter() {
        assert_eq!(FolderPath::root().prefix(), "");
        assert_eq!(FolderPath::parse("music").prefix(), "music/");
        assert_eq!(FolderPath::parse("music/long").prefix(), "music/long/");
        assert_eq!(FolderPath::parse("music/long").route(), "/asset_viewer/music/long/");
    }

    #[test]
    fn parent_of_nested_and_root() {
        let path = FolderPath::from_prefix("music/long/");

        assert_eq!(path.parent(), Some(FolderPath::parse("music")));
        assert_eq!(FolderPath::parse("music").parent(), Some(FolderPath::root()));
        assert_eq!(FolderPath::root().parent(), None);
    }

    #[test]
    fn resolve_relative_and_absolute() {
        let current = FolderPath::parse("music/long");

        assert_eq!(current.resolve(".."), FolderPath::parse("music"));
        assert_eq!(current.resolve("../../.."), FolderPath::root());
        assert_eq!(current.resolve("vs_0001"), FolderPath::parse("music/long/vs_0001"));
        assert_eq!(current.resolve("/character"), FolderPath::parse("character"));
        assert_eq!(current.resolve("/"), FolderPath::root());
        assert_eq!(current.resolve("./"), current);
        assert_eq!(current.resolve("/asset_viewer/bonds"), FolderPath::parse("bonds"));
    }

    #[test]
    fn breadcrumbs_trail() {
        let crumbs = FolderPath::parse("music/long/vs_0001").breadcrumbs();

        assert_eq!(crumbs.len(), 4);
        assert_eq!(crumbs[0].name, None);
        assert!(crumbs[0].path.is_root());
        assert!(!crumbs[0].current);

        assert_eq!(crumbs[2].name.as_deref(), Some("long"));
        assert_eq!(crumbs[2].path, FolderPath::parse("music/long"));
        assert!(!crumbs[2].current);

        assert!(crumbs[3].current);

        let root = FolderPath::root().breadcrumbs();

        assert_eq!(root.len(), 1);
        assert!(root[0].current);
    }

    #[test]
    fn from_prefix_keeps_empty_segments() {
        assert!(FolderPath::from_prefix("").is_root());

        let slash = FolderPath::from_prefix("/");
        assert!(!slash.is_root());
        assert_eq!(slash.prefix(), "/");

        let nested = FolderPath::from_prefix("a//");
        assert_eq!(segs(&nested), vec!["a", ""]);
        assert_eq!(nested.prefix(), "a//");
        assert_eq!(nested.parent(), Some(FolderPath::parse("a")));

        assert_eq!(FolderPath::from_prefix("music/long/").prefix(), "music/long/");
        assert_eq!(FolderPath::from_prefix("music/long/"), FolderPath::parse("music/long"));
    }

    #[test]
    fn display_names() {
        assert_eq!(folder_name("music/long/"), "long");
        assert_eq!(folder_name("music/"), "music");
        assert_eq!(folder_name("a//"), "");
        assert_eq!(folder_name("/"), "");
        assert_eq!(file_name("music/long/vs_0001/se.mp3"), "se.mp3");
        assert_eq!(file_name("readme.txt"), "readme.txt");
    }

    #[test]
    fn display_format() {
        assert_eq!(FolderPath::root().to_string(), "/");
        assert_eq!(FolderPath::parse("music/long").to_string(), "/music/long/");
    }
}
