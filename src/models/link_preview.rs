use super::LinkMetadata;

/// Open Graph tags scraped from a linked page. Any of them may be missing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LinkPreview {
    pub title: Option<String>,
    pub description: Option<String>,
    pub image: Option<String>,
}

impl LinkPreview {
    /// The parts of the preview that can be copied onto the content item.
    pub fn metadata(&self) -> LinkMetadata {
        LinkMetadata {
            display_name: self.title.clone(),
            description: self.description.clone(),
        }
    }
}
