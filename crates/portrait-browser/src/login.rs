use crate::page::{PageDriver, PageElement, first_visible, wait_for_element};
use crate::{Error, Result};
use portrait_core::Credentials;
use std::time::Duration;

/// Login page location, form selectors and the signals that end the wait
#[derive(Debug, Clone)]
pub struct LoginConfig {
    pub login_url: String,
    pub identity_selector: String,
    pub secret_selector: String,
    pub submit_selector: String,
    /// Present only once signed in
    pub success_selector: String,
    /// Rendered when the service rejects the credentials. The login page
    /// keeps these containers in the DOM, hidden, until then.
    pub error_selector: String,
    /// How long to wait for the form to render
    pub form_timeout: Duration,
    /// How long to wait for success or rejection after submitting
    pub confirm_timeout: Duration,
}

impl Default for LoginConfig {
    fn default() -> Self {
        Self {
            login_url: "https://www.linkedin.com/login".to_string(),
            identity_selector: "#username".to_string(),
            secret_selector: "#password".to_string(),
            submit_selector: "[type=\"submit\"]".to_string(),
            success_selector: "#global-nav".to_string(),
            error_selector: "#error-for-username, #error-for-password".to_string(),
            form_timeout: Duration::from_secs(10),
            confirm_timeout: Duration::from_secs(30),
        }
    }
}

/// Sign in on `page`. A single attempt, no retries.
pub async fn login<P: PageDriver>(page: &P, credentials: &Credentials, config: &LoginConfig) -> Result<()> {
    tracing::info!("Logging in as {}", credentials.identity());
    page.navigate(&config.login_url).await?;

    // A persistent profile may still carry a valid session cookie
    if page.query(&config.success_selector).await?.is_some() {
        tracing::info!("Already signed in, reusing existing session");
        return Ok(());
    }

    let identity = wait_for_element(page, &config.identity_selector, config.form_timeout)
        .await?
        .ok_or_else(|| Error::Authentication("login form did not appear".to_string()))?;
    identity.type_text(credentials.identity()).await?;

    let secret = page
        .query(&config.secret_selector)
        .await?
        .ok_or_else(|| Error::Authentication("password field not found".to_string()))?;
    secret.type_text(credentials.secret()).await?;

    let submit = page
        .query(&config.submit_selector)
        .await?
        .ok_or_else(|| Error::Authentication("submit button not found".to_string()))?;
    submit.click().await?;

    let signals = [config.success_selector.as_str(), config.error_selector.as_str()];
    match first_visible(page, &signals, config.confirm_timeout).await? {
        Some((0, _)) => {
            tracing::info!("Login successful");
            Ok(())
        }
        Some(_) => Err(Error::Authentication("credentials rejected".to_string())),
        None => Err(Error::Authentication(format!(
            "no login confirmation within {}s",
            config.confirm_timeout.as_secs()
        ))),
    }
}
