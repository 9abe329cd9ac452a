use std::path::{Path, PathBuf};
use std::sync::Arc;

use reqwest::{header, redirect, Client as ReqwestClient, Response};
use url::Url;
use uuid::Uuid;

use crate::config::Config;
use crate::context::PreviewContext;
use crate::error::{PreviewError, PreviewResult};
use crate::models::Content;
use crate::preview::PreviewGenerator;

use super::finalize::generate_previews_from_image;
use super::open_graph::{ensure_public_host, extract_og_data, parse_link};

pub const MAX_REDIRECTS: usize = 10;

/// Builds link previews from the `og:image` a page advertises, and takes the
/// page's title and description as candidate content metadata.
pub struct OpenGraphProcessor {
    client: ReqwestClient,
    generator: Arc<dyn PreviewGenerator>,
    tmp_dir: PathBuf,
    max_image_bytes: usize,
    max_page_bytes: usize,
    allow_private_hosts: bool,
}

impl OpenGraphProcessor {
    pub fn new(config: &Config, generator: Arc<dyn PreviewGenerator>) -> PreviewResult<Self> {
        // Redirects are followed in `get` so every hop passes the host check.
        let client = ReqwestClient::builder()
            .timeout(config.fetch_timeout)
            .user_agent(config.user_agent.as_str())
            .redirect(redirect::Policy::none())
            .build()?;

        Ok(OpenGraphProcessor {
            client,
            generator,
            tmp_dir: config.tmp_dir.clone(),
            max_image_bytes: config.max_image_bytes,
            max_page_bytes: config.max_page_bytes,
            allow_private_hosts: config.allow_private_hosts,
        })
    }

    /// Whether this processor can handle `content` at all.
    pub fn accepts(content: &Content) -> bool {
        parse_link(&content.link).is_ok()
    }

    /// Returns `Ok(false)` when the page has no `og:image`; nothing is
    /// generated or staged in that case.
    pub async fn generate_previews(&self, ctx: &mut PreviewContext) -> PreviewResult<bool> {
        let page_url = parse_link(&ctx.content().link)?;
        self.check_host(&page_url).await?;

        let response = self.get(page_url).await?;
        let page_url = response.url().clone();
        let body = read_capped(response, self.max_page_bytes, "page").await?;
        let preview = extract_og_data(&String::from_utf8_lossy(&body));

        let Some(image) = preview.image.as_deref() else {
            tracing::debug!(content_id = %ctx.content_id(), "Page has no og:image, skipping");
            return Ok(false);
        };

        let image_url = page_url
            .join(image)
            .map_err(|_| PreviewError::Validation("Invalid og:image URL".into()))?;
        let image_url = parse_link(image_url.as_str())?;
        self.check_host(&image_url).await?;

        let path = self.download_image(image_url).await?;
        tracing::debug!(
            content_id = %ctx.content_id(),
            path = ?path,
            "Downloaded og:image"
        );

        let result = generate_previews_from_image(
            self.generator.as_ref(),
            ctx,
            &path,
            Some(&preview.metadata()),
        )
        .await;

        remove_temp_file(&path).await;

        result.map(|()| true)
    }

    async fn check_host(&self, url: &Url) -> PreviewResult<()> {
        if self.allow_private_hosts {
            return Ok(());
        }
        ensure_public_host(url).await
    }

    /// GET `url`, following up to [`MAX_REDIRECTS`] redirects. `url` must
    /// already have passed `check_host`; every redirect target is checked here
    /// before it is requested.
    async fn get(&self, mut url: Url) -> PreviewResult<Response> {
        for _ in 0..=MAX_REDIRECTS {
            let response = self.client.get(url.clone()).send().await?;
            if !response.status().is_redirection() {
                return Ok(response.error_for_status()?);
            }

            let location = response
                .headers()
                .get(header::LOCATION)
                .and_then(|v| v.to_str().ok())
                .ok_or_else(|| {
                    PreviewError::Validation("Redirect without a Location header".into())
                })?;
            let next = url
                .join(location)
                .map_err(|_| PreviewError::Validation("Invalid redirect target".into()))?;
            let next = parse_link(next.as_str())?;
            self.check_host(&next).await?;

            tracing::debug!(from = %url, to = %next, "Following redirect");
            url = next;
        }

        Err(PreviewError::Validation(format!(
            "More than {MAX_REDIRECTS} redirects"
        )))
    }

    async fn download_image(&self, url: Url) -> PreviewResult<PathBuf> {
        let response = self.get(url).await?;
        let data = read_capped(response, self.max_image_bytes, "og:image").await?;

        // Trust the magic bytes, not the remote Content-Type header.
        let kind = infer::get(&data)
            .filter(|t| t.matcher_type() == infer::MatcherType::Image)
            .ok_or_else(|| PreviewError::Validation("og:image is not an image".into()))?;

        tokio::fs::create_dir_all(&self.tmp_dir).await.map_err(|e| {
            tracing::error!(error = ?e, path = ?self.tmp_dir, "Failed to create download directory");
            PreviewError::Storage(format!("Could not create {}: {e}", self.tmp_dir.display()))
        })?;

        let path = self
            .tmp_dir
            .join(format!("{}.{}", Uuid::new_v4().simple(), kind.extension()));
        write_temp_file(&path, &data).await?;

        Ok(path)
    }
}

/// Read the body of `response`, giving up as soon as it grows past `limit`.
async fn read_capped(mut response: Response, limit: usize, what: &str) -> PreviewResult<Vec<u8>> {
    let too_large = || PreviewError::Validation(format!("{what} exceeds the {limit} byte limit"));

    if response
        .content_length()
        .is_some_and(|len| len > limit as u64)
    {
        return Err(too_large());
    }

    let mut body = Vec::new();
    while let Some(chunk) = response.chunk().await? {
        if body.len() + chunk.len() > limit {
            return Err(too_large());
        }
        body.extend_from_slice(&chunk);
    }

    Ok(body)
}

/// Write `data` to `path`; a failed write leaves no partial file behind.
async fn write_temp_file(path: &Path, data: &[u8]) -> PreviewResult<()> {
    if let Err(e) = tokio::fs::write(path, data).await {
        tracing::error!(error = ?e, path = ?path, "Failed to write downloaded image");
        remove_temp_file(path).await;
        return Err(PreviewError::Storage(format!(
            "Could not write {}: {e}",
            path.display()
        )));
    }
    Ok(())
}

async fn remove_temp_file(path: &Path) {
    match tokio::fs::remove_file(path).await {
        Ok(()) => {}
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
        Err(e) => {
            tracing::warn!(error = ?e, path = ?path, "Failed to clean up downloaded image");
        }
    }
}
