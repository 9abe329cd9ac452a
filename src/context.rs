use std::collections::BTreeMap;

use crate::models::{Actor, Content, ContentMetadataField};

/// Per-job state for generating the previews of one content item.
///
/// Metadata changes are only staged here; persisting them is up to whoever
/// drives the job once the processors are done.
#[derive(Debug, Clone)]
pub struct PreviewContext {
    actor: Actor,
    content: Content,
    content_metadata: BTreeMap<ContentMetadataField, String>,
}

impl PreviewContext {
    pub fn new(actor: Actor, content: Content) -> Self {
        PreviewContext {
            actor,
            content,
            content_metadata: BTreeMap::new(),
        }
    }

    pub fn actor(&self) -> &Actor {
        &self.actor
    }

    pub fn content(&self) -> &Content {
        &self.content
    }

    pub fn content_id(&self) -> &str {
        &self.content.id
    }

    /// Stage a metadata change. Staging the same field again replaces the value.
    pub fn add_content_metadata(&mut self, field: ContentMetadataField, value: impl Into<String>) {
        self.content_metadata.insert(field, value.into());
    }

    pub fn content_metadata(&self) -> &BTreeMap<ContentMetadataField, String> {
        &self.content_metadata
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ctx() -> PreviewContext {
        PreviewContext::new(
            Actor {
                user_id: "u:cam:alice".into(),
                tenant_alias: "cam".into(),
            },
            Content::new_link("c:cam:link1", "http://example.com"),
        )
    }

    #[test]
    fn starts_with_nothing_staged() {
        let ctx = ctx();
        assert_eq!(ctx.content_id(), "c:cam:link1");
        assert_eq!(ctx.actor().tenant_alias, "cam");
        assert!(ctx.content_metadata().is_empty());
    }

    #[test]
    fn staging_does_not_touch_content_view() {
        let mut ctx = ctx();
        ctx.add_content_metadata(ContentMetadataField::DisplayName, "Example");
        assert_eq!(ctx.content().display_name, "http://example.com");
        assert_eq!(
            ctx.content_metadata().get(&ContentMetadataField::DisplayName),
            Some(&"Example".to_string())
        );
    }

    #[test]
    fn restaging_replaces_previous_value() {
        let mut ctx = ctx();
        ctx.add_content_metadata(ContentMetadataField::Description, "first");
        ctx.add_content_metadata(ContentMetadataField::Description, "second");
        assert_eq!(ctx.content_metadata().len(), 1);
        assert_eq!(
            ctx.content_metadata()[&ContentMetadataField::Description],
            "second"
        );
    }
}
