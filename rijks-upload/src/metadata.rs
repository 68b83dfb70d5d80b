//! Metadata derivation for uploads
//!
//! Computes the file title, description and date template from collection
//! metadata, and the filename from the media's declared content type.

use crate::models::{CollectionMetadata, Dating};
use serde::Serialize;

/// Suffix naming the holding institution in every title
const TITLE_SUFFIX: &str = "Rijksmuseum";

/// Upload request handed to the media repository
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UploadDescriptor {
    pub media_url: String,
    pub comment: String,
    pub filename: String,
    pub text: UploadText,
}

/// Fields of the file description page
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UploadText {
    pub author: String,
    pub date: String,
    pub description: String,
    pub source: String,
}

/// Derived text fields for one object
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DerivedFields {
    pub title: String,
    pub description: String,
    pub date: String,
}

pub fn derive_fields(metadata: &CollectionMetadata, collection_id: &str) -> DerivedFields {
    DerivedFields {
        title: derive_title(metadata, collection_id),
        description: derive_description(metadata, collection_id),
        date: derive_date(metadata.dating.as_ref()),
    }
}

/// `<long title or title> <id> - Rijksmuseum` without square brackets
pub fn derive_title(metadata: &CollectionMetadata, collection_id: &str) -> String {
    let base = non_empty(&metadata.long_title)
        .or_else(|| non_empty(&metadata.title))
        .unwrap_or_default();

    let mut title = String::from(base);
    if !title.is_empty() {
        title.push(' ');
    }
    title.push_str(&format!("{} - {}", collection_id, TITLE_SUFFIX));
    title.retain(|c| c != '[' && c != ']');
    title
}

/// Fixed prefix plus language-tagged description templates
pub fn derive_description(metadata: &CollectionMetadata, collection_id: &str) -> String {
    let mut description = format!("{} of {}.\n", collection_id, TITLE_SUFFIX);
    if let Some(dutch) = non_empty(&metadata.description) {
        description.push_str(&format!("{{{{nl|{}}}}}", dutch));
    }
    if let Some(english) = non_empty(&metadata.plaque_description_english) {
        description.push_str(&format!("{{{{en|{}}}}}", english));
    }
    description
}

/// Circa date template: single year when early and late match, else a range
pub fn derive_date(dating: Option<&Dating>) -> String {
    let early = dating.and_then(|d| d.year_early);
    let late = dating.and_then(|d| d.year_late);

    if early == late {
        format!("{{{{other date|~|{}}}}}", year(early))
    } else {
        format!("{{{{other date|~|{}|{}}}}}", year(early), year(late))
    }
}

/// Subtype of a `type/subtype` content type (`image/jpeg` → `jpeg`)
pub fn extension_from_content_type(content_type: &str) -> Option<String> {
    let (_, subtype) = content_type.split_once('/')?;
    let subtype = subtype.split(';').next().unwrap_or_default().trim();
    if subtype.is_empty() {
        return None;
    }
    Some(subtype.to_ascii_lowercase())
}

pub fn derive_filename(title: &str, extension: &str) -> String {
    format!("{}.{}", title, extension)
}

/// Title of the file description page on the wiki
pub fn file_page_title(filename: &str) -> String {
    format!("File:{}", filename)
}

pub fn build_upload_descriptor(
    fields: &DerivedFields,
    filename: String,
    media_url: &str,
    source: &str,
    author: &str,
    comment: &str,
) -> UploadDescriptor {
    UploadDescriptor {
        media_url: media_url.to_string(),
        comment: comment.to_string(),
        filename,
        text: UploadText {
            author: author.to_string(),
            date: fields.date.clone(),
            description: fields.description.clone(),
            source: source.to_string(),
        },
    }
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|s| !s.is_empty())
}

fn year(value: Option<i64>) -> String {
    value.map(|y| y.to_string()).unwrap_or_default()
}
