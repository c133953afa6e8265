//! Link resolution — tries to replace a candidate's landing-page link with a
//! direct application link found on the rendered page.
//!
//! Failures never escape: the worst outcome is keeping the original link.

use std::sync::Arc;

use async_trait::async_trait;
use futures::stream::{self, StreamExt};
use reqwest::Url;
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::config::LinkConfig;
use crate::models::scholarship::{ScholarshipRecommendation, ScholarshipSet};

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("page returned status {0}")]
    Status(u16),

    #[error("invalid URL '{0}'")]
    InvalidUrl(String),

    #[error("DOM query failed: {0}")]
    Query(String),
}

/// Loads a page and reports the navigation target of its first "apply" control.
#[async_trait]
pub trait PageRenderer: Send + Sync {
    async fn find_apply_target(&self, url: &str) -> Result<Option<String>, RenderError>;
}

/// Domain lists that shape when a resolved link is accepted.
#[derive(Debug, Clone, Default)]
pub struct LinkPolicy {
    /// Hosts never sent to the renderer (the original link is kept).
    pub skip_domains: Vec<String>,
    /// Hosts (and their subdomains) marking a scraped link as unusable.
    pub placeholder_domains: Vec<String>,
}

impl From<&LinkConfig> for LinkPolicy {
    fn from(config: &LinkConfig) -> Self {
        Self {
            skip_domains: config.skip_domains.clone(),
            placeholder_domains: config.placeholder_domains.clone(),
        }
    }
}

/// True when the link's host is one of `domains` or a subdomain of one.
/// Unparseable links match nothing.
fn host_in(link: &str, domains: &[String]) -> bool {
    let Some(host) = Url::parse(link)
        .ok()
        .and_then(|u| u.host_str().map(str::to_ascii_lowercase))
    else {
        return false;
    };

    domains.iter().any(|domain| {
        let domain = domain.trim().to_ascii_lowercase();
        !domain.is_empty() && (host == domain || host.ends_with(&format!(".{domain}")))
    })
}

impl LinkPolicy {
    fn should_skip(&self, link: &str) -> bool {
        host_in(link, &self.skip_domains)
    }

    /// True when `found` should replace `original`.
    pub fn improves(&self, original: &str, found: &str) -> bool {
        let found = found.trim();
        !found.is_empty() && found != original && !host_in(found, &self.placeholder_domains)
    }
}

/// True for the "no link known" markers the generator emits.
pub fn is_link_sentinel(link: &str) -> bool {
    let link = link.trim();
    link.is_empty() || link.eq_ignore_ascii_case("not available") || link.eq_ignore_ascii_case("n/a")
}

#[derive(Clone)]
pub struct LinkResolver {
    renderer: Arc<dyn PageRenderer>,
    policy: LinkPolicy,
    concurrency: usize,
}

impl LinkResolver {
    pub fn new(renderer: Arc<dyn PageRenderer>, policy: LinkPolicy, concurrency: usize) -> Self {
        Self {
            renderer,
            policy,
            concurrency: concurrency.max(1),
        }
    }

    /// Returns the best known application link for `link`.
    pub async fn resolve_apply_link(&self, link: &str) -> String {
        if is_link_sentinel(link) {
            return link.to_string();
        }
        if self.policy.should_skip(link) {
            debug!("Skipping link resolution for {link}");
            return link.to_string();
        }

        match self.renderer.find_apply_target(link).await {
            Ok(Some(found)) if self.policy.improves(link, &found) => {
                info!("Resolved direct apply link {found} for {link}");
                found.trim().to_string()
            }
            Ok(_) => link.to_string(),
            Err(e) => {
                warn!("Link resolution failed for {link}: {e}");
                link.to_string()
            }
        }
    }

    /// Resolves every candidate's link with bounded concurrency, preserving order.
    pub async fn resolve_candidates(
        &self,
        candidates: Vec<ScholarshipRecommendation>,
    ) -> Vec<ScholarshipRecommendation> {
        stream::iter(candidates)
            .map(|mut candidate| async move {
                candidate.apply_link = self.resolve_apply_link(&candidate.apply_link).await;
                candidate
            })
            .buffered(self.concurrency)
            .collect()
            .await
    }

    /// Resolves both collections through one stream, so the concurrency bound
    /// holds across the whole set.
    pub async fn resolve_set(&self, set: ScholarshipSet) -> ScholarshipSet {
        let split = set.primary.len();
        let mut primary = self
            .resolve_candidates(set.primary.into_iter().chain(set.overlapping).collect())
            .await;
        let overlapping = primary.split_off(split);
        ScholarshipSet {
            primary,
            overlapping,
        }
    }
}
