use crate::page::{PageDriver, PageElement, wait_for_element};
use crate::{Error, Result};
use portrait_core::registry::ProfileEntry;
use std::time::Duration;
use url::Url;

/// Where profiles live and how their photo is recognized
#[derive(Debug, Clone)]
pub struct LocatorConfig {
    /// Profile URLs are `<base><external_handle>/`
    pub profile_base_url: String,
    pub photo_selector: String,
    pub element_timeout: Duration,
    /// Pause after navigation before looking for the photo
    pub settle_delay: Duration,
}

impl Default for LocatorConfig {
    fn default() -> Self {
        Self {
            profile_base_url: "https://www.linkedin.com/in/".to_string(),
            photo_selector: ".pv-top-card-profile-picture__image".to_string(),
            element_timeout: Duration::from_secs(10),
            settle_delay: Duration::from_secs(3),
        }
    }
}

/// Resolves profile photo URLs on an authenticated page
pub struct PhotoLocator {
    config: LocatorConfig,
}

impl PhotoLocator {
    pub fn new(config: LocatorConfig) -> Self {
        Self { config }
    }

    /// Profile page of `entry`: exactly one path segment below the base URL
    pub fn profile_url(&self, entry: &ProfileEntry) -> Result<Url> {
        let base = Url::parse(&self.config.profile_base_url)?;
        let url = base.join(&format!("{}/", entry.external_handle.trim()))?;

        let single_segment = url
            .path()
            .strip_prefix(base.path())
            .map(|rest| {
                let segment = rest.trim_end_matches('/');
                !segment.is_empty() && !segment.contains('/')
            })
            .unwrap_or(false);
        if url.origin() != base.origin()
            || !single_segment
            || url.query().is_some()
            || url.fragment().is_some()
        {
            return Err(Error::Browser(format!(
                "handle '{}' does not name a profile under {}",
                entry.external_handle, base
            )));
        }

        Ok(url)
    }

    /// Photo URL of `entry`'s profile, or `None` when it cannot be determined.
    ///
    /// A missing element, a missing `src`, and navigation faults all yield `None`.
    pub async fn locate_photo<P: PageDriver>(&self, page: &P, entry: &ProfileEntry) -> Option<String> {
        match self.try_locate(page, entry).await {
            Ok(Some(url)) => {
                tracing::debug!("Photo for {}: {}", entry.local_id, url);
                Some(url)
            }
            Ok(None) => None,
            Err(e) => {
                tracing::warn!("Error fetching photo for {}: {}", entry.display_name, e);
                None
            }
        }
    }

    async fn try_locate<P: PageDriver>(&self, page: &P, entry: &ProfileEntry) -> Result<Option<String>> {
        let url = self.profile_url(entry)?;
        tracing::info!("Fetching: {}", url);
        page.navigate(url.as_str()).await?;

        if !self.config.settle_delay.is_zero() {
            tokio::time::sleep(self.config.settle_delay).await;
        }

        let Some(photo) =
            wait_for_element(page, &self.config.photo_selector, self.config.element_timeout).await?
        else {
            tracing::info!(
                "Photo element did not appear within {}s for {}",
                self.config.element_timeout.as_secs(),
                entry.display_name
            );
            return Ok(None);
        };

        let src = photo.attribute("src").await?;
        let usable = src.as_deref().and_then(usable_photo_url);
        if usable.is_none() {
            tracing::info!("Photo element for {} has no usable source", entry.display_name);
        }
        Ok(usable)
    }
}

/// Placeholders are often inlined as `data:` URIs; only real remote images count
fn usable_photo_url(src: &str) -> Option<String> {
    let src = src.trim();
    match Url::parse(src) {
        Ok(url) if matches!(url.scheme(), "http" | "https") => Some(src.to_string()),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::page::fake::FakePage;

    const PHOTO: &str = ".pv-top-card-profile-picture__image";

    fn locator() -> PhotoLocator {
        PhotoLocator::new(LocatorConfig::default())
    }

    fn entry() -> ProfileEntry {
        ProfileEntry::new("Ada LOVELACE", "ada-lovelace-1815", "ada-lovelace")
    }

    #[test]
    fn test_profile_url_from_handle() {
        let url = locator().profile_url(&entry()).unwrap();
        assert_eq!(url.as_str(), "https://www.linkedin.com/in/ada-lovelace-1815/");
    }

    #[test]
    fn test_profile_url_stays_under_base() {
        for handle in ["//evil.example", "../../feed", "a/b", "a?b", "a#b", "%2e%2e"] {
            let entry = ProfileEntry::new("Mallory", handle, "mallory");
            assert!(
                locator().profile_url(&entry).is_err(),
                "expected handle '{}' to be refused",
                handle
            );
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_locate_does_not_navigate_outside_profiles() {
        let page = FakePage::new().with_element(PHOTO, &[("src", "https://media.example.com/x.jpg")]);
        let entry = ProfileEntry::new("Mallory", "../../feed", "mallory");

        assert_eq!(locator().locate_photo(&page, &entry).await, None);
        assert!(page.navigations().is_empty());
    }

    #[test]
    fn test_usable_photo_url() {
        assert_eq!(
            usable_photo_url(" https://media.example.com/p.jpg?e=1&t=x "),
            Some("https://media.example.com/p.jpg?e=1&t=x".to_string())
        );
        assert_eq!(usable_photo_url("data:image/gif;base64,R0lGODlhAQABAAAAACw="), None);
        assert_eq!(usable_photo_url(""), None);
        assert_eq!(usable_photo_url("/relative/path.jpg"), None);
    }

    #[tokio::test(start_paused = true)]
    async fn test_locate_returns_src_of_photo_element() {
        let page = FakePage::new().with_delayed_element(
            PHOTO,
            &[("src", "https://media.example.com/ada.jpg")],
            Duration::from_secs(5),
        );

        let url = locator().locate_photo(&page, &entry()).await;

        assert_eq!(url.as_deref(), Some("https://media.example.com/ada.jpg"));
        assert_eq!(
            page.navigations(),
            vec!["https://www.linkedin.com/in/ada-lovelace-1815/".to_string()]
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_locate_returns_none_when_element_never_appears() {
        let page = FakePage::new();

        assert_eq!(locator().locate_photo(&page, &entry()).await, None);
    }

    #[tokio::test(start_paused = true)]
    async fn test_locate_returns_none_without_src() {
        let page = FakePage::new().with_element(PHOTO, &[("alt", "Ada")]);

        assert_eq!(locator().locate_photo(&page, &entry()).await, None);
    }

    #[tokio::test(start_paused = true)]
    async fn test_locate_returns_none_on_navigation_fault() {
        let page = FakePage::new()
            .with_element(PHOTO, &[("src", "https://media.example.com/ada.jpg")])
            .failing_navigation();

        assert_eq!(locator().locate_photo(&page, &entry()).await, None);
    }

    #[tokio::test(start_paused = true)]
    async fn test_locate_uses_configured_selector() {
        let page = FakePage::new().with_element("img.avatar", &[("src", "https://cdn/a.png")]);
        let locator = PhotoLocator::new(LocatorConfig {
            photo_selector: "img.avatar".to_string(),
            settle_delay: Duration::ZERO,
            ..LocatorConfig::default()
        });

        assert_eq!(
            locator.locate_photo(&page, &entry()).await.as_deref(),
            Some("https://cdn/a.png")
        );
    }
}
