#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]

pub mod client;
mod endpoint;
mod error;
pub mod model;
pub mod query;

pub use client::Client;
pub use endpoint::{ApiEndpoint, DEFAULT_HOST};
pub use error::{Error, Result};
pub use model::{Hit, ImageId, PageNum, SearchResponse};
pub use query::{Filters, ImageType, Orientation, SearchQuery};
pub use reqwest;
