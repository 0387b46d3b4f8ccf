use chrono::{DateTime, Utc};
use serde::{Serialize, Deserialize};

/// a virtual folder inside a listing
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommonPrefix {
    #[serde(rename = "Prefix")]
    pub prefix: String,
}

impl CommonPrefix {
    pub fn name(&self) -> &str {
        sekai_lib::path::folder_name(&self.prefix)
    }
}

/// a single object inside a listing
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Content {
    #[serde(rename = "Key")]
    pub key: String,
    #[serde(rename = "LastModified")]
    pub last_modified: DateTime<Utc>,
    #[serde(rename = "Size", default)]
    pub size: u64,
    #[serde(rename = "ETag", default)]
    pub etag: Option<String>,
    #[serde(rename = "StorageClass", default)]
    pub storage_class: Option<String>,
}

impl Content {
    pub fn name(&self) -> &str {
        sekai_lib::path::file_name(&self.key)
    }
}

/// response document of a ListObjectsV2 request.
///
/// `Contents` and `CommonPrefixes` always deserialize as lists regardless
/// of how many elements are present.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename = "ListBucketResult")]
pub struct ListBucketResult {
    #[serde(rename = "Name", default)]
    pub name: Option<String>,
    #[serde(rename = "Prefix", default)]
    pub prefix: Option<String>,
    #[serde(rename = "Delimiter", default)]
    pub delimiter: Option<String>,
    #[serde(rename = "KeyCount", default)]
    pub key_count: Option<u32>,
    #[serde(rename = "MaxKeys", default)]
    pub max_keys: Option<u32>,
    #[serde(rename = "IsTruncated", default)]
    pub is_truncated: Option<bool>,
    #[serde(rename = "ContinuationToken", default)]
    pub continuation_token: Option<String>,
    #[serde(rename = "NextContinuationToken", default)]
    pub next_continuation_token: Option<String>,
    #[serde(rename = "Contents", default)]
    pub contents: Vec<Content>,
    #[serde(rename = "CommonPrefixes", default)]
    pub common_prefixes: Vec<CommonPrefix>,
}

impl ListBucketResult {
    pub fn from_xml(given: &str) -> Result<Self, quick_xml::DeError> {
        quick_xml::de::from_str(given)
    }
}

/// one page of a folder listing
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BucketListing {
    pub folders: Vec<CommonPrefix>,
    pub files: Vec<Content>,
    /// present only when more pages exist
    pub next_token: Option<String>,
}

impl From<ListBucketResult> for BucketListing {
    fn from(result: ListBucketResult) -> Self {
        // an empty token cannot be continued from
        let next_token = result.next_continuation_token
            .filter(|v| !v.is_empty());

        BucketListing {
            folders: result.common_prefixes,
            files: result.contents,
            next_token,
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    const TRUNCATED: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<ListBucketResult xmlns="http://s3.amazonaws.com/doc/2006-03-01/">
    <Name>sekai-assets</Name>
    <Prefix>music/</Prefix>
    <KeyCount>3</KeyCount>
    <MaxKeys>100</MaxKeys>
    <Delimiter>/</Delimiter>
    <IsTruncated>true</IsTruncated>
    <NextContinuationToken>MXJfbGF0ZXN0</NextContinuationToken>
    <Contents>
        <Key>music/jacket.png</Key>
        <LastModified>2021-03-04T05:06:07.000Z</LastModified>
        <ETag>&quot;a1b2&quot;</ETag>
        <Size>2048</Size>
        <StorageClass>STANDARD</StorageClass>
    </Contents>
    <CommonPrefixes><Prefix>music/long/</Prefix></CommonPrefixes>
    <CommonPrefixes><Prefix>music/short/</Prefix></CommonPrefixes>
</ListBucketResult>"#;

    const SINGLE: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<ListBucketResult xmlns="http://s3.amazonaws.com/doc/2006-03-01/">
    <Name>sekai-assets</Name>
    <Prefix>music/long/</Prefix>
    <KeyCount>1</KeyCount>
    <MaxKeys>100</MaxKeys>
    <IsTruncated>false</IsTruncated>
    <CommonPrefixes><Prefix>music/long/vs_0001_01/</Prefix></CommonPrefixes>
</ListBucketResult>"#;

    const EMPTY: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<ListBucketResult xmlns="http://s3.amazonaws.com/doc/2006-03-01/">
    <Name>sekai-assets</Name>
    <Prefix>nothing/</Prefix>
    <KeyCount>0</KeyCount>
    <MaxKeys>100</MaxKeys>
    <IsTruncated>false</IsTruncated>
</ListBucketResult>"#;

    #[test]
    fn parse_truncated_page() {
        let result = ListBucketResult::from_xml(TRUNCATED).unwrap();

        assert_eq!(result.name.as_deref(), Some("sekai-assets"));
        assert_eq!(result.is_truncated, Some(true));
        assert_eq!(result.contents.len(), 1);
        assert_eq!(result.contents[0].key, "music/jacket.png");
        assert_eq!(result.contents[0].size, 2048);
        assert_eq!(result.contents[0].etag.as_deref(), Some("\"a1b2\""));
        assert_eq!(result.contents[0].last_modified.timestamp(), 1614834367);
        assert_eq!(result.common_prefixes.len(), 2);
        assert_eq!(result.common_prefixes[1].name(), "short");

        let listing = BucketListing::from(result);

        assert_eq!(listing.next_token.as_deref(), Some("MXJfbGF0ZXN0"));
        assert!(listing.next_token.is_some());
    }

    #[test]
    fn single_element_is_still_a_list() {
        let listing = BucketListing::from(ListBucketResult::from_xml(SINGLE).unwrap());

        assert_eq!(listing.folders.len(), 1);
        assert_eq!(listing.folders[0].prefix, "music/long/vs_0001_01/");
        assert!(listing.files.is_empty());
        assert!(listing.next_token.is_none());
    }

    #[test]
    fn missing_elements_are_empty_lists() {
        let listing = BucketListing::from(ListBucketResult::from_xml(EMPTY).unwrap());

        assert!(listing.folders.is_empty());
        assert!(listing.files.is_empty());
        assert!(listing.next_token.is_none());
    }

    #[test]
    fn empty_token_is_dropped() {
        let result = ListBucketResult {
            name: None,
            prefix: None,
            delimiter: None,
            key_count: None,
            max_keys: None,
            is_truncated: Some(true),
            continuation_token: None,
            next_continuation_token: Some(String::new()),
            contents: Vec::new(),
            common_prefixes: Vec::new(),
        };

        assert_eq!(BucketListing::from(result).next_token, None);
    }
}
