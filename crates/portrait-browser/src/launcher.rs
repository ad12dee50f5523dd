use crate::{Error, Result};
use chromiumoxide::browser::{Browser, BrowserConfig};
use futures::StreamExt;
use std::path::PathBuf;
use tokio::task::JoinHandle;

/// Starts a Chrome process controlled over CDP
pub struct ChromeLauncher {
    chrome_path: PathBuf,
    profile_path: PathBuf,
    headless: bool,
}

impl ChromeLauncher {
    /// Create a new ChromeLauncher; headless unless told otherwise
    pub fn new(chrome_path: PathBuf, profile_path: PathBuf) -> Self {
        Self {
            chrome_path,
            profile_path,
            headless: true,
        }
    }

    pub fn headless(mut self, headless: bool) -> Self {
        self.headless = headless;
        self
    }

    /// Launch Chrome and spawn the task that drives the CDP connection.
    ///
    /// The handler task must keep running for any page command to complete.
    pub async fn launch(&self) -> Result<(Browser, JoinHandle<()>)> {
        tracing::info!(
            "Launching Chrome from {} ({})",
            self.chrome_path.display(),
            if self.headless { "headless" } else { "headful" }
        );

        let (browser, mut handler) = Browser::launch(self.build_config()?)
            .await
            .map_err(|e| Error::Browser(format!("Failed to launch Chrome: {}", e)))?;

        let handler_task = tokio::spawn(async move {
            while let Some(event) = handler.next().await {
                if let Err(e) = event {
                    // Some CDP events are not fully parseable; keep going
                    tracing::debug!("CDP handler event error (continuing): {}", e);
                }
            }
        });

        Ok((browser, handler_task))
    }

    fn build_config(&self) -> Result<BrowserConfig> {
        let mut builder = BrowserConfig::builder()
            .chrome_executable(&self.chrome_path)
            .user_data_dir(&self.profile_path)
            .args(self.build_args());

        if !self.headless {
            builder = builder.with_head();
        }

        builder.build().map_err(Error::Browser)
    }

    /// Extra Chrome command-line arguments
    fn build_args(&self) -> Vec<String> {
        vec![
            "--no-first-run".to_string(),
            "--no-default-browser-check".to_string(),
            "--no-sandbox".to_string(),
            "--disable-dev-shm-usage".to_string(),
        ]
    }
}
