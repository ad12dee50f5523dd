use crate::locator::{LocatorConfig, PhotoLocator};
use crate::login::{LoginConfig, login};
use crate::page::CdpPage;
use crate::{ChromeLauncher, ProfileManager, Result};
use async_trait::async_trait;
use chromiumoxide::browser::Browser;
use portrait_core::registry::ProfileEntry;
use portrait_core::{Credentials, PhotoSession, SessionOpener};
use std::path::PathBuf;
use tokio::task::JoinHandle;

#[derive(Debug, Clone)]
pub struct SessionConfig {
    pub headless: bool,
    pub login: LoginConfig,
    pub locator: LocatorConfig,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            headless: true,
            login: LoginConfig::default(),
            locator: LocatorConfig::default(),
        }
    }
}

/// Opens authenticated browser sessions
///
/// Owns the browser profile, so a temporary profile outlives every session
/// opened from this manager.
pub struct SessionManager {
    chrome_path: PathBuf,
    profile: ProfileManager,
    config: SessionConfig,
}

impl SessionManager {
    pub fn new(chrome_path: PathBuf, profile: ProfileManager, config: SessionConfig) -> Self {
        Self {
            chrome_path,
            profile,
            config,
        }
    }

    /// Start the browser with a blank tab, without signing in
    pub async fn launch(&self) -> Result<BrowserSession> {
        let launcher = ChromeLauncher::new(self.chrome_path.clone(), self.profile.path().to_path_buf())
            .headless(self.config.headless);
        let (browser, handler) = launcher.launch().await?;

        let page = match browser.new_page("about:blank").await {
            Ok(page) => page,
            Err(e) => {
                shutdown(browser, handler).await;
                return Err(e.into());
            }
        };

        Ok(BrowserSession {
            browser,
            handler,
            page: CdpPage::new(page),
            locator: PhotoLocator::new(self.config.locator.clone()),
        })
    }
}

#[async_trait]
impl SessionOpener for SessionManager {
    type Session = BrowserSession;

    async fn open(&self, credentials: &Credentials) -> portrait_core::Result<BrowserSession> {
        let session = self.launch().await?;

        if let Err(e) = login(&session.page, credentials, &self.config.login).await {
            tracing::error!("Login failed: {}", e);
            session.close().await;
            return Err(e.into());
        }

        Ok(session)
    }
}

/// A signed-in browser, consumed by [`PhotoSession::close`]
pub struct BrowserSession {
    browser: Browser,
    handler: JoinHandle<()>,
    page: CdpPage,
    locator: PhotoLocator,
}

#[async_trait]
impl PhotoSession for BrowserSession {
    async fn locate_photo(&self, entry: &ProfileEntry) -> Option<String> {
        self.locator.locate_photo(&self.page, entry).await
    }

    async fn close(self) {
        tracing::info!("Closing browser session");
        shutdown(self.browser, self.handler).await;
    }
}

/// Close the browser, reap the process and stop the handler. Never fails.
async fn shutdown(mut browser: Browser, handler: JoinHandle<()>) {
    if let Err(e) = browser.close().await {
        tracing::warn!("Browser did not close cleanly: {}", e);
    }
    match browser.wait().await {
        Ok(Some(status)) => tracing::debug!("Chrome exited with {}", status),
        Ok(None) => {}
        Err(e) => tracing::warn!("Failed to wait for Chrome to exit: {}", e),
    }
    handler.abort();
}
