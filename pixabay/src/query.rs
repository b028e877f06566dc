use crate::model::PageNum;
use strum_macros::IntoStaticStr;

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, IntoStaticStr)]
#[strum(serialize_all = "snake_case")]
pub enum Orientation {
    All,
    #[default]
    Horizontal,
    Vertical,
}

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, IntoStaticStr)]
#[strum(serialize_all = "snake_case")]
pub enum ImageType {
    All,
    #[default]
    Photo,
    Illustration,
    Vector,
}

/// Fixed filter parameters sent with every search.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Filters {
    pub orientation: Orientation,
    pub image_type: ImageType,
    pub safesearch: bool,
}

impl Default for Filters {
    fn default() -> Self {
        Self {
            orientation: Orientation::default(),
            image_type: ImageType::default(),
            safesearch: true,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SearchQuery {
    pub q: String,
    pub page: PageNum,
    pub per_page: u32,
}

impl SearchQuery {
    pub fn new<T: Into<String>>(q: T, page: PageNum, per_page: u32) -> Self {
        Self {
            q: q.into(),
            page,
            per_page,
        }
    }
}
