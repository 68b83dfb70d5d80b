//! External service adapters
//!
//! The pipeline talks to the outside world only through the traits below, so
//! tests can drive it with in-memory fakes.
//!
//! - [`CollectionSource`]: collection object metadata by object number
//! - [`MediaProbe`]: declared content type of a media URL
//! - [`MediaRepository`]: login, upload, page read and page edit on the wiki

pub mod commons_client;
pub mod rijksmuseum_client;

pub use commons_client::{render_file_page, CommonsClient, WikiError};
pub use rijksmuseum_client::{RijksError, RijksmuseumClient};

use crate::metadata::UploadDescriptor;
use crate::models::CollectionResponse;
use async_trait::async_trait;

/// Source of collection object metadata
#[async_trait]
pub trait CollectionSource: Send + Sync {
    async fn fetch_object(&self, collection_id: &str) -> Result<CollectionResponse, RijksError>;
}

/// Reads the declared content type of a media URL
#[async_trait]
pub trait MediaProbe: Send + Sync {
    /// `Ok(None)` when the response carries no content type
    async fn content_type(&self, media_url: &str) -> Result<Option<String>, RijksError>;
}

/// Wiki-based media repository
#[async_trait]
pub trait MediaRepository: Send + Sync {
    async fn login(&self, username: &str, password: &str) -> Result<(), WikiError>;

    async fn upload(&self, descriptor: &UploadDescriptor) -> Result<(), WikiError>;

    /// Current wikitext of a page (empty when the page has no content)
    async fn page(&self, title: &str) -> Result<String, WikiError>;

    async fn edit_page(&self, title: &str, content: &str, summary: &str) -> Result<(), WikiError>;
}
