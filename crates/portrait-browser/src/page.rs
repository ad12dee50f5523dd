//! Minimal page capabilities needed to sign in and read profile photos.
//!
//! Login and photo lookup are written against [`PageDriver`] and
//! [`PageElement`] so they do not depend on a live browser. [`CdpPage`] is the
//! chromiumoxide-backed implementation used at runtime.

use crate::Result;
use async_trait::async_trait;
use chromiumoxide::element::Element;
use chromiumoxide::page::Page;
use std::time::Duration;
use tokio::time::Instant;

/// Interval between DOM queries while waiting for an element
pub const POLL_INTERVAL: Duration = Duration::from_millis(250);

/// A handle to an element found on the current page
#[async_trait]
pub trait PageElement: Send + Sync {
    /// Value of the attribute `name`, if the element has one
    async fn attribute(&self, name: &str) -> Result<Option<String>>;

    async fn type_text(&self, text: &str) -> Result<()>;

    async fn click(&self) -> Result<()>;

    /// Whether the element is rendered. Hidden and `display: none` elements are not.
    async fn is_visible(&self) -> Result<bool>;
}

/// A browser tab that can navigate and query its DOM
#[async_trait]
pub trait PageDriver: Send + Sync {
    type Element: PageElement;

    /// Navigate and wait for the load to finish
    async fn navigate(&self, url: &str) -> Result<()>;

    /// Every element matching the CSS selector, in document order
    async fn query_all(&self, selector: &str) -> Result<Vec<Self::Element>>;

    /// First element matching the CSS selector, if any
    async fn query(&self, selector: &str) -> Result<Option<Self::Element>> {
        Ok(self.query_all(selector).await?.into_iter().next())
    }
}

/// Poll until one of `selectors` matches or `timeout` elapses.
///
/// Returns the index of the selector that matched together with the element.
/// Selectors are checked in order on every poll, so earlier ones win ties.
pub async fn first_present<P: PageDriver>(
    page: &P,
    selectors: &[&str],
    timeout: Duration,
) -> Result<Option<(usize, P::Element)>> {
    let deadline = Instant::now() + timeout;

    loop {
        for (idx, selector) in selectors.iter().enumerate() {
            if let Some(element) = page.query(selector).await? {
                return Ok(Some((idx, element)));
            }
        }

        let now = Instant::now();
        if now >= deadline {
            return Ok(None);
        }
        tokio::time::sleep(POLL_INTERVAL.min(deadline - now)).await;
    }
}

/// Like [`first_present`], but only rendered elements count.
///
/// Pages often keep error containers in the DOM and hide them until needed,
/// so presence alone is not a signal.
pub async fn first_visible<P: PageDriver>(
    page: &P,
    selectors: &[&str],
    timeout: Duration,
) -> Result<Option<(usize, P::Element)>> {
    let deadline = Instant::now() + timeout;

    loop {
        for (idx, selector) in selectors.iter().enumerate() {
            for element in page.query_all(selector).await? {
                if element.is_visible().await? {
                    return Ok(Some((idx, element)));
                }
            }
        }

        let now = Instant::now();
        if now >= deadline {
            return Ok(None);
        }
        tokio::time::sleep(POLL_INTERVAL.min(deadline - now)).await;
    }
}

/// Poll until `selector` matches or `timeout` elapses
pub async fn wait_for_element<P: PageDriver>(
    page: &P,
    selector: &str,
    timeout: Duration,
) -> Result<Option<P::Element>> {
    Ok(first_present(page, &[selector], timeout)
        .await?
        .map(|(_, element)| element))
}

/// A chromiumoxide tab
pub struct CdpPage {
    page: Page,
}

impl CdpPage {
    pub fn new(page: Page) -> Self {
        Self { page }
    }
}

pub struct CdpElement {
    element: Element,
}

#[async_trait]
impl PageDriver for CdpPage {
    type Element = CdpElement;

    async fn navigate(&self, url: &str) -> Result<()> {
        tracing::debug!("Navigating to {}", url);
        self.page.goto(url).await?;
        Ok(())
    }

    async fn query_all(&self, selector: &str) -> Result<Vec<CdpElement>> {
        // find_elements yields an empty list rather than an error when nothing matches
        let found = self.page.find_elements(selector).await?;
        Ok(found.into_iter().map(|element| CdpElement { element }).collect())
    }
}

#[async_trait]
impl PageElement for CdpElement {
    async fn attribute(&self, name: &str) -> Result<Option<String>> {
        Ok(self.element.attribute(name).await?)
    }

    async fn type_text(&self, text: &str) -> Result<()> {
        self.element.click().await?;
        self.element.type_str(text).await?;
        Ok(())
    }

    async fn click(&self) -> Result<()> {
        self.element.click().await?;
        Ok(())
    }

    async fn is_visible(&self) -> Result<bool> {
        let returns = self
            .element
            .call_js_fn(
                "function() { \
                   const style = window.getComputedStyle(this); \
                   return style.visibility !== 'hidden' && this.getClientRects().length > 0; \
                 }",
                false,
            )
            .await?;
        Ok(returns
            .result
            .value
            .as_ref()
            .and_then(|value| value.as_bool())
            .unwrap_or(false))
    }
}
