use strum::AsRefStr as StrumAsRefStr;

use crate::path::file_name;

/// name of the bucket the viewer browses
pub const DEFAULT_BUCKET: &str = "sekai-assets";

/// how a file is previewed, decided by its extension alone.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq,
    StrumAsRefStr
)]
#[strum(serialize_all = "lowercase")]
pub enum FileKind {
    Image,
    /// structured data that is rendered as a tree
    Asset,
    Video,
    Audio,
    /// no preview body is available
    Unsupported,
}

impl FileKind {
    pub fn from_key<K>(key: K) -> Self
    where
        K: AsRef<str>
    {
        match extension(key.as_ref()) {
            Some(ext) => Self::from_ext(ext),
            None => FileKind::Unsupported
        }
    }

    pub fn from_ext(ext: &str) -> Self {
        match ext {
            "png" | "webp" | "jpg" => FileKind::Image,
            "asset" => FileKind::Asset,
            "mp4" => FileKind::Video,
            "mp3" | "flac" => FileKind::Audio,
            _ => FileKind::Unsupported,
        }
    }

    /// icon shown next to a file in a listing. assets and unsupported files
    /// share the generic code icon.
    pub fn icon(&self) -> &'static str {
        match self {
            FileKind::Image => "file-image",
            FileKind::Video => "file-video",
            FileKind::Audio => "file-music",
            FileKind::Asset |
            FileKind::Unsupported => "file-code",
        }
    }
}

impl std::fmt::Display for FileKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        std::fmt::Display::fmt(self.as_ref(), f)
    }
}

/// extension of the final segment of a key, without the dot.
///
/// a file name with no dot has no extension. matching is case sensitive.
pub fn extension(key: &str) -> Option<&str> {
    let name = file_name(key);

    name.rsplit_once('.')
        .map(|(_, ext)| ext)
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn classify_by_extension() {
        let cases = [
            ("character/member/res001_no001/card_normal.png", FileKind::Image),
            ("thumbnail/chara/res001_no001.webp", FileKind::Image),
            ("home/banner/banner_gacha001.jpg", FileKind::Image),
            ("live/2dmode/music_score/0001_01/expert.asset", FileKind::Asset),
            ("virtual_live/mv/mv_0001.mp4", FileKind::Video),
            ("music/long/vs_0001_01/vs_0001_01.mp3", FileKind::Audio),
            ("music/long/vs_0001_01/vs_0001_01.flac", FileKind::Audio),
            ("music/long/vs_0001_01/vs_0001_01.acb", FileKind::Unsupported),
            ("live/readme", FileKind::Unsupported),
        ];

        for (key, expected) in cases {
            assert_eq!(FileKind::from_key(key), expected, "key: {key}");
        }
    }

    #[test]
    fn classify_is_case_sensitive() {
        assert_eq!(FileKind::from_key("banner.PNG"), FileKind::Unsupported);
    }

    #[test]
    fn extension_of_final_segment() {
        assert_eq!(extension("a.b/c"), None);
        assert_eq!(extension("a/b.tar.gz"), Some("gz"));
        assert_eq!(extension("a/.hidden"), Some("hidden"));
        assert_eq!(extension("a/plain"), None);
    }

    #[test]
    fn icons_and_labels() {
        assert_eq!(FileKind::Asset.icon(), FileKind::Unsupported.icon());
        assert_eq!(FileKind::Audio.to_string(), "audio");
    }
}
