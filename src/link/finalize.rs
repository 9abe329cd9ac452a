use std::path::Path;

use crate::context::PreviewContext;
use crate::error::PreviewResult;
use crate::models::{ContentMetadataField, LinkMetadata};
use crate::preview::{PreviewConfig, PreviewGenerator};
use crate::text::decode_entities;

/// Generate the previews of a link from an image produced for it, then copy
/// the supplied metadata onto the content item where it has none of its own.
///
/// - `displayName` is staged only while the content's display name still
///   equals its link.
/// - `description` is staged only while the content has no description.
///
/// Both values are entity-decoded before staging. When the generator fails its
/// error is returned unchanged and nothing is staged.
pub async fn generate_previews_from_image<G>(
    generator: &G,
    ctx: &mut PreviewContext,
    path: &Path,
    opts: Option<&LinkMetadata>,
) -> PreviewResult<()>
where
    G: PreviewGenerator + ?Sized,
{
    generator
        .generate_previews_from_image(ctx, path, &PreviewConfig::new())
        .await?;

    let Some(opts) = opts else {
        return Ok(());
    };

    if let Some(display_name) = non_empty(opts.display_name.as_deref()) {
        if !ctx.content().has_custom_display_name() {
            ctx.add_content_metadata(
                ContentMetadataField::DisplayName,
                decode_entities(display_name),
            );
            tracing::trace!(content_id = %ctx.content_id(), "Updating the content displayName");
        }
    }

    if let Some(description) = non_empty(opts.description.as_deref()) {
        if !ctx.content().has_description() {
            ctx.add_content_metadata(
                ContentMetadataField::Description,
                decode_entities(description),
            );
            tracing::trace!(content_id = %ctx.content_id(), "Updating the content description");
        }
    }

    Ok(())
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.is_empty())
}
