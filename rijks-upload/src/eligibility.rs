//! License/eligibility filter
//!
//! An object may be uploaded only when it is not copyrighted and has a web
//! image with a URL. Checks run in a fixed order and stop at the first
//! failing one.

use crate::models::{is_truthy, CollectionMetadata};
use thiserror::Error;

/// Why an object was rejected
#[derive(Debug, Clone, Copy, Error, PartialEq, Eq)]
pub enum Ineligibility {
    #[error("object is copyrighted")]
    Copyrighted,
    #[error("object has no image")]
    NoImage,
    #[error("web image missing")]
    MissingWebImage,
    #[error("web image URL missing")]
    MissingImageUrl,
}

/// Check eligibility, reporting the first failing condition
pub fn check_eligibility(metadata: &CollectionMetadata) -> Result<(), Ineligibility> {
    if metadata.copyright_holder.as_ref().is_some_and(is_truthy) {
        return Err(Ineligibility::Copyrighted);
    }
    if !metadata.has_image {
        return Err(Ineligibility::NoImage);
    }
    let Some(web_image) = &metadata.web_image else {
        return Err(Ineligibility::MissingWebImage);
    };
    if web_image.url.as_deref().map_or(true, str::is_empty) {
        return Err(Ineligibility::MissingImageUrl);
    }
    Ok(())
}

pub fn is_eligible(metadata: &CollectionMetadata) -> bool {
    check_eligibility(metadata).is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::WebImage;
    use serde_json::json;

    fn eligible() -> CollectionMetadata {
        CollectionMetadata {
            has_image: true,
            web_image: Some(WebImage {
                url: Some("https://example.org/image".to_string()),
            }),
            ..Default::default()
        }
    }

    #[test]
    fn test_eligible_object() {
        assert_eq!(check_eligibility(&eligible()), Ok(()));
        assert!(is_eligible(&eligible()));
    }

    #[test]
    fn test_copyright_wins_over_everything() {
        let mut metadata = eligible();
        metadata.copyright_holder = Some(json!("© Estate of the artist"));
        assert_eq!(check_eligibility(&metadata), Err(Ineligibility::Copyrighted));

        metadata.has_image = false;
        metadata.web_image = None;
        assert_eq!(check_eligibility(&metadata), Err(Ineligibility::Copyrighted));
    }

    #[test]
    fn test_falsy_copyright_holder_is_not_copyrighted() {
        let mut metadata = eligible();
        metadata.copyright_holder = Some(json!(null));
        assert!(is_eligible(&metadata));
        metadata.copyright_holder = Some(json!(""));
        assert!(is_eligible(&metadata));
    }

    #[test]
    fn test_no_image() {
        let mut metadata = eligible();
        metadata.has_image = false;
        assert_eq!(check_eligibility(&metadata), Err(Ineligibility::NoImage));
    }

    #[test]
    fn test_missing_web_image() {
        let mut metadata = eligible();
        metadata.web_image = None;
        assert_eq!(check_eligibility(&metadata), Err(Ineligibility::MissingWebImage));
    }

    #[test]
    fn test_missing_or_empty_url() {
        let mut metadata = eligible();
        metadata.web_image = Some(WebImage { url: None });
        assert_eq!(check_eligibility(&metadata), Err(Ineligibility::MissingImageUrl));

        metadata.web_image = Some(WebImage { url: Some(String::new()) });
        assert_eq!(check_eligibility(&metadata), Err(Ineligibility::MissingImageUrl));
    }
}
