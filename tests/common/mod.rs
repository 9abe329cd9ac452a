// Each integration test file is a separate binary; helpers not used in every
// binary would otherwise trigger dead_code warnings from clippy.
#![allow(dead_code)]

use std::io;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::Router;
use tracing::subscriber::DefaultGuard;

use link_preview_processor::{
    context::PreviewContext,
    error::{PreviewError, PreviewResult},
    models::{Actor, Content},
    preview::{PreviewConfig, PreviewGenerator},
};

/// Smallest byte string `infer` recognises as a PNG.
pub const PNG_BYTES: &[u8] = &[
    0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A, 0x00, 0x00, 0x00, 0x0D, 0x49, 0x48, 0x44,
    0x52,
];

pub fn actor() -> Actor {
    Actor {
        user_id: "u:cam:alice".into(),
        tenant_alias: "cam".into(),
    }
}

pub fn content(display_name: &str, link: &str, description: Option<&str>) -> Content {
    Content {
        id: "c:cam:link1".into(),
        display_name: display_name.into(),
        link: link.into(),
        description: description.map(str::to_string),
    }
}

/// Context for a link nobody has titled or described yet.
pub fn fresh_ctx(link: &str) -> PreviewContext {
    PreviewContext::new(actor(), content(link, link, None))
}

// ── Preview generator double ───────────────────────────────────────────────

#[derive(Debug, Clone)]
pub struct RecordedCall {
    pub path: PathBuf,
    pub config: PreviewConfig,
    /// How many metadata fields were already staged when the generator ran.
    pub staged_before: usize,
    /// The image file as it was on disk during the call, if it existed.
    pub image: Option<Vec<u8>>,
}

/// Records every call; fails with an image processing error when configured to.
#[derive(Default)]
pub struct RecordingGenerator {
    calls: Mutex<Vec<RecordedCall>>,
    failure: Option<String>,
}

impl RecordingGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing(message: &str) -> Self {
        RecordingGenerator {
            calls: Mutex::new(Vec::new()),
            failure: Some(message.to_string()),
        }
    }

    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl PreviewGenerator for RecordingGenerator {
    async fn generate_previews_from_image(
        &self,
        ctx: &mut PreviewContext,
        path: &Path,
        config: &PreviewConfig,
    ) -> PreviewResult<()> {
        let image = tokio::fs::read(path).await.ok();
        self.calls.lock().unwrap().push(RecordedCall {
            path: path.to_path_buf(),
            config: config.clone(),
            staged_before: ctx.content_metadata().len(),
            image,
        });

        match &self.failure {
            Some(message) => Err(PreviewError::ImageProcessing(message.clone())),
            None => Ok(()),
        }
    }
}

// ── Log capture ────────────────────────────────────────────────────────────

#[derive(Clone, Default)]
pub struct LogBuffer(Arc<Mutex<Vec<u8>>>);

impl LogBuffer {
    pub fn contents(&self) -> String {
        String::from_utf8_lossy(&self.0.lock().unwrap()).into_owned()
    }
}

impl io::Write for LogBuffer {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// Capture every event emitted on this thread, down to trace level, until the
/// guard is dropped.
pub fn capture_logs() -> (LogBuffer, DefaultGuard) {
    let buffer = LogBuffer::default();
    let writer = buffer.clone();
    let subscriber = tracing_subscriber::fmt()
        .with_max_level(tracing::Level::TRACE)
        .with_ansi(false)
        .with_writer(move || writer.clone())
        .finish();
    (buffer, tracing::subscriber::set_default(subscriber))
}

// ── Fixture HTTP server ────────────────────────────────────────────────────

/// Serve `router` on an ephemeral loopback port.
pub async fn serve(router: Router) -> SocketAddr {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind fixture server");
    let addr = listener.local_addr().expect("Fixture server has no address");
    tokio::spawn(async move {
        axum::serve(listener, router)
            .await
            .expect("Fixture server failed");
    });
    addr
}
