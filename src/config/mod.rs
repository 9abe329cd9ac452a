use std::env;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use crate::error::{PreviewError, PreviewResult};

pub const DEFAULT_USER_AGENT: &str =
    "Mozilla/5.0 (compatible; LinkPreviewBot/1.0; +https://github.com/jtjenkins/Together)";
pub const DEFAULT_FETCH_TIMEOUT: Duration = Duration::from_secs(5);
pub const DEFAULT_MAX_IMAGE_BYTES: usize = 10 * 1024 * 1024;
pub const DEFAULT_MAX_PAGE_BYTES: usize = 2 * 1024 * 1024;

#[derive(Clone, Debug)]
pub struct Config {
    pub app_env: String,
    /// Where downloaded link images are kept until their previews are generated.
    pub tmp_dir: PathBuf,
    pub fetch_timeout: Duration,
    pub user_agent: String,
    pub max_image_bytes: usize,
    pub max_page_bytes: usize,
    /// Skip the private/loopback address check. Only for local fixtures.
    pub allow_private_hosts: bool,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            app_env: "development".to_string(),
            tmp_dir: env::temp_dir().join("link_previews"),
            fetch_timeout: DEFAULT_FETCH_TIMEOUT,
            user_agent: DEFAULT_USER_AGENT.to_string(),
            max_image_bytes: DEFAULT_MAX_IMAGE_BYTES,
            max_page_bytes: DEFAULT_MAX_PAGE_BYTES,
            allow_private_hosts: false,
        }
    }
}

impl Config {
    pub fn from_env() -> PreviewResult<Self> {
        dotenvy::dotenv().ok();

        let defaults = Config::default();

        Ok(Config {
            app_env: env::var("APP_ENV").unwrap_or(defaults.app_env),
            tmp_dir: env::var("PREVIEW_TMP_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.tmp_dir),
            fetch_timeout: parse_var::<u64>("LINK_FETCH_TIMEOUT_SECS")?
                .map(Duration::from_secs)
                .unwrap_or(defaults.fetch_timeout),
            user_agent: env::var("LINK_USER_AGENT").unwrap_or(defaults.user_agent),
            max_image_bytes: parse_var("LINK_MAX_IMAGE_BYTES")?
                .unwrap_or(defaults.max_image_bytes),
            max_page_bytes: parse_var("LINK_MAX_PAGE_BYTES")?
                .unwrap_or(defaults.max_page_bytes),
            allow_private_hosts: parse_var("LINK_ALLOW_PRIVATE_HOSTS")?
                .unwrap_or(defaults.allow_private_hosts),
        })
    }

    pub fn is_production(&self) -> bool {
        self.app_env == "production"
    }
}

fn parse_var<T: FromStr>(name: &str) -> PreviewResult<Option<T>> {
    match env::var(name) {
        Ok(raw) => raw
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| PreviewError::Config(format!("{name} has an invalid value: {raw:?}"))),
        Err(_) => Ok(None),
    }
}
