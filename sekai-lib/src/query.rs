/// number of keys requested for each page of a bucket listing
pub const PAGE_SIZE: u16 = 100;

/// the only delimiter the viewer lists with
pub const DELIMITER: &str = "/";

/// version of the listing api (ListObjectsV2)
pub const LIST_TYPE: &str = "2";
