//! Category composition and license annotation of file pages
//!
//! Categories come from object types, collections and makers, plus derived
//! "<collection> from <place>" and "<collection> by <maker>" combinations.
//! The set keeps first-seen order and never holds the same name twice.

use crate::models::CollectionMetadata;
use indexmap::IndexSet;

/// Category every uploaded file receives
pub const DEFAULT_ATTRIBUTION_CATEGORY: &str = "Media from Rijksmuseum";

/// License template placed under the license header
pub const DEFAULT_LICENSE_TEMPLATE: &str = "{{cc-zero|Rijksmuseum}}";

const LICENSE_HEADER: &str = "== {{int:license-header}} ==";
const LICENSE_REVIEW_TEMPLATE: &str = "{{LicenseReview}}";

/// Deduplicated, insertion-ordered category names
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CategorySet {
    names: IndexSet<String>,
}

impl CategorySet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a category; returns false if it was already present
    pub fn insert(&mut self, name: impl Into<String>) -> bool {
        self.names.insert(name.into())
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.names.contains(name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.names.iter().map(String::as_str)
    }
}

impl<S: Into<String>> Extend<S> for CategorySet {
    fn extend<I: IntoIterator<Item = S>>(&mut self, iter: I) {
        for name in iter {
            self.insert(name);
        }
    }
}

/// License section appended to a file page
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LicenseSection {
    pub template: String,
    pub review: bool,
}

impl Default for LicenseSection {
    fn default() -> Self {
        Self {
            template: DEFAULT_LICENSE_TEMPLATE.to_string(),
            review: false,
        }
    }
}

/// Build the category set for one object
pub fn compose_categories(metadata: &CollectionMetadata, attribution_category: &str) -> CategorySet {
    let collections = &metadata.object_collection;
    let makers: Vec<&str> = metadata.maker_names().collect();

    let places: IndexSet<&str> = metadata
        .principal_makers
        .iter()
        .flat_map(|maker| maker.production_places.iter().map(String::as_str))
        .collect();

    let mut categories = CategorySet::new();
    categories.extend(metadata.object_types.iter().cloned());
    categories.extend(collections.iter().cloned());
    categories.extend(makers.iter().copied());

    for collection in collections {
        categories.extend(places.iter().map(|place| format!("{} from {}", collection, place)));
    }
    for collection in collections {
        categories.extend(makers.iter().map(|maker| format!("{} by {}", collection, maker)));
    }

    categories.insert(attribution_category);
    categories
}

/// One `[[Category:<name>]]` line per category
pub fn render_category_block(categories: &CategorySet) -> String {
    categories
        .iter()
        .map(|name| format!("[[Category:{}]]\n", name))
        .collect()
}

/// Existing page text followed by the license section and the categories
pub fn annotate_page(existing: &str, categories: &CategorySet, license: &LicenseSection) -> String {
    let mut content = String::with_capacity(existing.len() + 256);
    content.push_str(existing);
    content.push('\n');
    content.push_str(LICENSE_HEADER);
    content.push('\n');
    content.push_str(&license.template);
    content.push('\n');
    if license.review {
        content.push_str(LICENSE_REVIEW_TEMPLATE);
        content.push('\n');
    }
    content.push('\n');
    content.push_str(&render_category_block(categories));
    content
}
