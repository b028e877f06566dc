use serde::Deserialize;
use serde_aux::field_attributes::deserialize_number_from_string;
use serde_with::{DefaultOnNull, serde_as};

pub type ImageId = u64;
pub type PageNum = u32;

/// One image of a result page, as returned by the API.
///
/// Every field is optional on the wire; absent or null values fall back to
/// an empty string or zero so a partial hit still renders as a card.
#[serde_as]
#[derive(Debug, Deserialize, Clone, Default, PartialEq, Eq)]
#[serde(default)]
pub struct Hit {
    pub id: ImageId,
    #[serde(rename = "pageURL")]
    #[serde_as(as = "DefaultOnNull")]
    pub page_url: String,
    #[serde(rename = "previewURL")]
    #[serde_as(as = "DefaultOnNull")]
    pub preview_url: String,
    #[serde(rename = "webformatURL")]
    #[serde_as(as = "DefaultOnNull")]
    pub webformat_url: String,
    #[serde(rename = "largeImageURL")]
    #[serde_as(as = "DefaultOnNull")]
    pub large_image_url: String,
    #[serde_as(as = "DefaultOnNull")]
    pub tags: String,
    #[serde_as(as = "DefaultOnNull")]
    pub user: String,
    // Counters are numbers in practice, but tolerate numeric strings too.
    #[serde(deserialize_with = "deserialize_number_from_string")]
    pub likes: u64,
    #[serde(deserialize_with = "deserialize_number_from_string")]
    pub views: u64,
    #[serde(deserialize_with = "deserialize_number_from_string")]
    pub comments: u64,
    #[serde(deserialize_with = "deserialize_number_from_string")]
    pub downloads: u64,
}

#[derive(Deserialize, Debug, Clone, Default)]
#[serde(default)]
pub struct SearchResponse {
    pub total: u64,
    #[serde(rename = "totalHits")]
    pub total_hits: u64,
    pub hits: Vec<Hit>,
}

impl SearchResponse {
    pub fn is_empty(&self) -> bool {
        self.total_hits == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_search_response() {
        let body = r#"{
            "total": 4692,
            "totalHits": 500,
            "hits": [{
                "id": 195893,
                "pageURL": "https://pixabay.com/en/blossom-bloom-flower-195893/",
                "type": "photo",
                "tags": "blossom, bloom, flower",
                "previewURL": "https://cdn.pixabay.com/photo/2013/10/15/09/12/flower-195893_150.jpg",
                "webformatURL": "https://pixabay.com/get/35bbf209e13e39d2_640.jpg",
                "largeImageURL": "https://pixabay.com/get/ed6a99fd0a76647_1280.jpg",
                "views": 7671,
                "downloads": 6439,
                "likes": 5,
                "comments": 2,
                "user": "Josch13"
            }]
        }"#;
        let r: SearchResponse = serde_json::from_str(body).unwrap();
        assert_eq!(r.total_hits, 500);
        assert_eq!(r.hits.len(), 1);
        let hit = &r.hits[0];
        assert_eq!(hit.id, 195893);
        assert_eq!(hit.tags, "blossom, bloom, flower");
        assert_eq!(hit.likes, 5);
        assert_eq!(hit.downloads, 6439);
        assert!(hit.large_image_url.ends_with("_1280.jpg"));
    }

    #[test]
    fn missing_and_null_fields_default() {
        let body = r#"{"totalHits": 1, "hits": [{"tags": null, "likes": "12"}]}"#;
        let r: SearchResponse = serde_json::from_str(body).unwrap();
        let hit = &r.hits[0];
        assert_eq!(hit.tags, "");
        assert_eq!(hit.webformat_url, "");
        assert_eq!(hit.likes, 12);
        assert_eq!(hit.views, 0);
    }

    #[test]
    fn empty_response() {
        let r: SearchResponse = serde_json::from_str(r#"{"total": 0, "totalHits": 0, "hits": []}"#).unwrap();
        assert!(r.is_empty());
        assert!(r.hits.is_empty());
    }
}
