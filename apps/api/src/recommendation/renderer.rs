//! HTTP page renderer: fetches a page in a throwaway session and scans its
//! DOM for an "apply" anchor or button.

use std::time::{Duration, Instant};

use async_trait::async_trait;
use reqwest::{redirect, Client, Url};
use scraper::{ElementRef, Html, Selector};
use tracing::debug;

use crate::recommendation::links::{PageRenderer, RenderError};

const USER_AGENT: &str = concat!("scholar-api/", env!("CARGO_PKG_VERSION"));
const MAX_REDIRECTS: usize = 10;
const APPLY_TEXT: &str = "apply";
/// Button attributes that conventionally carry a navigation target.
const BUTTON_LINK_ATTRS: &[&str] = &["data-href", "data-url", "data-link"];

pub struct HttpPageRenderer {
    timeout: Duration,
    max_body_bytes: usize,
}

impl HttpPageRenderer {
    pub fn new(timeout: Duration, max_body_bytes: usize) -> Self {
        Self {
            timeout,
            max_body_bytes,
        }
    }
}

#[async_trait]
impl PageRenderer for HttpPageRenderer {
    async fn find_apply_target(&self, url: &str) -> Result<Option<String>, RenderError> {
        let session = RenderSession::open(url, self.timeout)?;
        let (final_url, html) = session.load(self.max_body_bytes).await?;
        find_apply_target_in_html(&html, &final_url)
    }
}

/// One isolated page load: its own client, cookie jar and deadline.
/// Never shared between candidates.
struct RenderSession {
    client: Client,
    url: Url,
    opened_at: Instant,
}

impl RenderSession {
    fn open(url: &str, timeout: Duration) -> Result<Self, RenderError> {
        let url = Url::parse(url).map_err(|_| RenderError::InvalidUrl(url.to_string()))?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(RenderError::InvalidUrl(url.to_string()));
        }

        let client = Client::builder()
            .cookie_store(true)
            .redirect(redirect::Policy::limited(MAX_REDIRECTS))
            .timeout(timeout)
            .user_agent(USER_AGENT)
            .build()?;

        debug!("Opened render session for {url}");
        Ok(Self {
            client,
            url,
            opened_at: Instant::now(),
        })
    }

    /// Loads the page body, keeping at most `max_bytes` of it.
    /// The whole (capped) document counts as the load-complete condition.
    async fn load(&self, max_bytes: usize) -> Result<(Url, String), RenderError> {
        let mut response = self.client.get(self.url.clone()).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(RenderError::Status(status.as_u16()));
        }
        let final_url = response.url().clone();

        let mut body = Vec::with_capacity(
            response
                .content_length()
                .map_or(0, |len| len as usize)
                .min(max_bytes),
        );
        while let Some(chunk) = response.chunk().await? {
            let room = max_bytes - body.len();
            if chunk.len() >= room {
                body.extend_from_slice(&chunk[..room]);
                debug!("Truncated {} at {max_bytes} bytes", self.url);
                break;
            }
            body.extend_from_slice(&chunk);
        }

        Ok((final_url, String::from_utf8_lossy(&body).into_owned()))
    }
}

impl Drop for RenderSession {
    fn drop(&mut self) {
        debug!(
            "Released render session for {} after {}ms",
            self.url,
            self.opened_at.elapsed().as_millis()
        );
    }
}

/// Scans anchors and buttons in document order for one whose visible text
/// contains "apply" (case-insensitive) and that carries a usable target.
/// Relative anchor targets are resolved against `base`.
pub fn find_apply_target_in_html(html: &str, base: &Url) -> Result<Option<String>, RenderError> {
    let selector = Selector::parse("a, button").map_err(|e| RenderError::Query(e.to_string()))?;
    let document = Html::parse_document(html);

    Ok(document
        .select(&selector)
        .filter(|el| visible_text(el).contains(APPLY_TEXT))
        .find_map(|el| navigation_target(&el, base)))
}

fn visible_text(element: &ElementRef<'_>) -> String {
    element.text().collect::<String>().to_lowercase()
}

fn navigation_target(element: &ElementRef<'_>, base: &Url) -> Option<String> {
    let el = element.value();
    let raw = match el.name() {
        "a" => el.attr("href"),
        _ => BUTTON_LINK_ATTRS.iter().find_map(|attr| el.attr(attr)),
    }?;

    let raw = raw.trim();
    if raw.is_empty() || raw.starts_with('#') {
        return None;
    }

    let resolved = base.join(raw).ok()?;
    matches!(resolved.scheme(), "http" | "https").then(|| resolved.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn base() -> Url {
        Url::parse("https://foundation.org/programs/stem").unwrap()
    }

    #[test]
    fn test_anchor_with_apply_text_is_found_and_resolved() {
        let html = r#"<html><body>
            <a href="/about">About us</a>
            <a href="/apply/stem-2025">  Apply Now </a>
        </body></html>"#;
        assert_eq!(
            find_apply_target_in_html(html, &base()).unwrap(),
            Some("https://foundation.org/apply/stem-2025".to_string())
        );
    }

    #[test]
    fn test_button_data_attribute_is_used() {
        let html = r#"<button data-url="https://portal.foundation.org/start">APPLY</button>"#;
        assert_eq!(
            find_apply_target_in_html(html, &base()).unwrap(),
            Some("https://portal.foundation.org/start".to_string())
        );
    }

    #[test]
    fn test_nested_text_counts_as_visible_text() {
        let html = r#"<a href="https://x.org/go"><span>Apply</span> <b>online</b></a>"#;
        assert_eq!(
            find_apply_target_in_html(html, &base()).unwrap(),
            Some("https://x.org/go".to_string())
        );
    }

    #[test]
    fn test_application_alone_is_not_an_apply_control() {
        let html = r#"<a href="https://x.org/go"><span>Start your</span> <b>application</b></a>"#;
        assert_eq!(find_apply_target_in_html(html, &base()).unwrap(), None);
    }

    #[test]
    fn test_unusable_targets_are_skipped() {
        let html = r##"
            <a href="#">Apply</a>
            <a href="javascript:void(0)">Apply</a>
            <button>Apply</button>
            <a href="https://x.org/real">Apply here</a>"##;
        assert_eq!(
            find_apply_target_in_html(html, &base()).unwrap(),
            Some("https://x.org/real".to_string())
        );
    }

    #[test]
    fn test_no_apply_control_is_none() {
        let html = r#"<a href="/donate">Donate</a><button data-href="/x">Subscribe</button>"#;
        assert_eq!(find_apply_target_in_html(html, &base()).unwrap(), None);
    }

    #[tokio::test]
    async fn test_http_renderer_loads_page() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/scholarship"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_string(r#"<a href="/apply-now">Apply now</a>"#)
                    .insert_header("content-type", "text/html"),
            )
            .mount(&server)
            .await;

        let renderer = HttpPageRenderer::new(Duration::from_secs(5), 64 * 1024);
        let found = renderer
            .find_apply_target(&format!("{}/scholarship", server.uri()))
            .await
            .unwrap();
        assert_eq!(found, Some(format!("{}/apply-now", server.uri())));
    }

    #[tokio::test]
    async fn test_http_renderer_caps_page_body() {
        let server = MockServer::start().await;
        let padding = "<p>about the award</p>".repeat(100);
        Mock::given(method("GET"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_string(format!(r#"{padding}<a href="/apply-now">Apply now</a>"#))
                    .insert_header("content-type", "text/html"),
            )
            .mount(&server)
            .await;
        let url = format!("{}/scholarship", server.uri());

        let capped = HttpPageRenderer::new(Duration::from_secs(5), 512);
        assert_eq!(capped.find_apply_target(&url).await.unwrap(), None);

        let roomy = HttpPageRenderer::new(Duration::from_secs(5), 64 * 1024);
        assert_eq!(
            roomy.find_apply_target(&url).await.unwrap(),
            Some(format!("{}/apply-now", server.uri()))
        );
    }

    #[tokio::test]
    async fn test_http_renderer_reports_error_status() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        let renderer = HttpPageRenderer::new(Duration::from_secs(5), 64 * 1024);
        let err = renderer
            .find_apply_target(&format!("{}/missing", server.uri()))
            .await
            .unwrap_err();
        assert!(matches!(err, RenderError::Status(404)));
    }

    #[tokio::test]
    async fn test_http_renderer_rejects_non_http_urls() {
        let renderer = HttpPageRenderer::new(Duration::from_secs(5), 64 * 1024);
        assert!(matches!(
            renderer.find_apply_target("ftp://files.org/x").await,
            Err(RenderError::InvalidUrl(_))
        ));
        assert!(matches!(
            renderer.find_apply_target("not a url").await,
            Err(RenderError::InvalidUrl(_))
        ));
    }
}
