//! Listing - discovery 応答の JSON 形状
//!
//! どちらも 1 ページ分のスナップショットです（continuation token は見ない）。

use serde::Deserialize;

#[derive(Debug, Deserialize)]
struct ContainerEntry {
    #[serde(rename = "Name")]
    name: String,
}

/// `list-buckets` の応答。`Buckets` が無ければデコード失敗。
#[derive(Debug, Deserialize)]
pub struct ContainerPage {
    #[serde(rename = "Buckets")]
    containers: Vec<ContainerEntry>,
}

impl ContainerPage {
    pub fn from_slice(bytes: &[u8]) -> Result<Self, serde_json::Error> {
        serde_json::from_slice(bytes)
    }

    pub fn into_names(self) -> Vec<String> {
        self.containers.into_iter().map(|c| c.name).collect()
    }
}

#[derive(Debug, Deserialize)]
struct KeyEntry {
    #[serde(rename = "Key")]
    key: String,
}

/// `list-objects-v2` の応答。空の container では `Contents` 自体が省略される。
#[derive(Debug, Deserialize)]
pub struct KeyPage {
    #[serde(rename = "Contents", default)]
    keys: Vec<KeyEntry>,
}

impl KeyPage {
    /// 空の応答（0 バイト）も空ページとして扱う
    pub fn from_slice(bytes: &[u8]) -> Result<Self, serde_json::Error> {
        if bytes.iter().all(u8::is_ascii_whitespace) {
            return Ok(Self { keys: Vec::new() });
        }
        serde_json::from_slice(bytes)
    }

    pub fn into_keys(self) -> Vec<String> {
        self.keys.into_iter().map(|k| k.key).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn container_names_keep_response_order() {
        let json = br#"{"Buckets":[{"Name":"b","CreationDate":"2024-01-01T00:00:00Z"},{"Name":"a"}],"Owner":{"ID":"x"}}"#;
        let names = ContainerPage::from_slice(json).unwrap().into_names();
        assert_eq!(names, vec!["b", "a"]);
    }

    #[rstest]
    #[case(br#"{}"#.as_slice())]
    #[case(br#"{"Buckets":"nope"}"#.as_slice())]
    #[case(b"not json".as_slice())]
    fn container_page_requires_buckets(#[case] body: &[u8]) {
        assert!(ContainerPage::from_slice(body).is_err());
    }

    #[rstest]
    #[case(br#"{"KeyCount":0}"#.as_slice())]
    #[case(br#"{"Contents":[]}"#.as_slice())]
    #[case(b"".as_slice())]
    #[case(b"\n".as_slice())]
    fn empty_container_yields_no_keys(#[case] body: &[u8]) {
        assert!(KeyPage::from_slice(body).unwrap().into_keys().is_empty());
    }

    #[test]
    fn keys_are_extracted() {
        let json = br#"{"Contents":[{"Key":"x.csv","Size":12},{"Key":"dir/y.csv","Size":3}],"IsTruncated":true,"NextContinuationToken":"t"}"#;
        let keys = KeyPage::from_slice(json).unwrap().into_keys();
        assert_eq!(keys, vec!["x.csv", "dir/y.csv"]);
    }

    #[test]
    fn malformed_key_entry_is_an_error() {
        assert!(KeyPage::from_slice(br#"{"Contents":[{"Size":1}]}"#).is_err());
    }
}
