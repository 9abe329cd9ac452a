use std::path::Path;

use async_trait::async_trait;

use crate::context::PreviewContext;
use crate::error::PreviewResult;

/// Options handed to a [`PreviewGenerator`] untouched.
pub type PreviewConfig = serde_json::Map<String, serde_json::Value>;

/// Turns a local image into the resized preview variants of a content item.
///
/// Implementations own resizing and storage of the generated files and report
/// failure through the returned error.
#[async_trait]
pub trait PreviewGenerator: Send + Sync {
    async fn generate_previews_from_image(
        &self,
        ctx: &mut PreviewContext,
        path: &Path,
        config: &PreviewConfig,
    ) -> PreviewResult<()>;
}
