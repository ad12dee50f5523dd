use std::time::Duration;

/// Where photos land when no output directory is given
pub const DEFAULT_OUTPUT_DIR: &str = "public/assets/founders/photos";

/// Browser-like agent; some image CDNs refuse unknown clients
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 \
     (KHTML, like Gecko) Chrome/124.0.0.0 Safari/537.36";

/// Settings for downloading and encoding photos
#[derive(Debug, Clone)]
pub struct StoreConfig {
    pub user_agent: String,
    pub request_timeout: Duration,
    /// JPEG quality, 1-100
    pub jpeg_quality: u8,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            user_agent: DEFAULT_USER_AGENT.to_string(),
            request_timeout: Duration::from_secs(30),
            jpeg_quality: 95,
        }
    }
}

/// Settings for a batch run over the registry
#[derive(Debug, Clone)]
pub struct BatchConfig {
    /// Pause between consecutive entries
    pub delay: Duration,
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            delay: Duration::from_secs(2),
        }
    }
}
