use tracing_subscriber::EnvFilter;

use crate::config::Config;
use crate::error::{PreviewError, PreviewResult};

pub const DEFAULT_FILTER: &str = "link_preview_processor=info,reqwest=warn";

/// Install the global tracing subscriber: JSON in production, human-readable
/// in dev. `RUST_LOG` overrides the default filter.
pub fn init_tracing(config: &Config) -> PreviewResult<()> {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

    let result = if config.is_production() {
        tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .try_init()
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).try_init()
    };

    result.map_err(|e| PreviewError::Config(format!("tracing already initialised: {e}")))
}
