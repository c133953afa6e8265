//! Recommendation engine — orchestrates one recommendation call.
//!
//! Flow: build prompt → generate (bounded by a timeout) → extract + parse →
//!       on any failure substitute the fallback set → resolve apply links.
//!
//! `recommend` never fails. Callers that care whether the data is fresh
//! match on `RecommendationOutcome`.

use std::sync::Arc;

use serde::Serialize;
use thiserror::Error;
use tracing::{info, warn};

use crate::config::RecommendationConfig;
use crate::llm_client::{GenerationRequest, TextGenerator};
use crate::models::scholarship::ScholarshipSet;
use crate::recommendation::extract::parse_generated_text;
use crate::recommendation::fallback::fallback_set;
use crate::recommendation::links::LinkResolver;
use crate::recommendation::prompts::build_recommendation_prompt;
use crate::recommendation::query::ScholarshipQuery;

/// Why generated output was replaced by the fallback set.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize)]
#[serde(rename_all = "snake_case", tag = "kind", content = "detail")]
pub enum DegradeReason {
    #[error("text generation failed: {0}")]
    Generation(String),

    #[error("text generation timed out after {0}s")]
    Timeout(u64),

    #[error("no structured block in generated text")]
    NoStructuredBlock,

    #[error("structured block is not valid: {0}")]
    InvalidPayload(String),

    #[error("'overlapping' collection is missing")]
    MissingOverlapping,

    #[error("'overlapping' collection is not an array")]
    OverlappingNotArray,

    #[error("'overlapping' collection is empty")]
    EmptyOverlapping,
}

#[derive(Debug, Clone, PartialEq)]
pub enum RecommendationOutcome {
    /// Parsed from generated text, links resolved.
    Generated(ScholarshipSet),
    /// The fixed fallback set, untouched.
    Degraded {
        set: ScholarshipSet,
        reason: DegradeReason,
    },
}

impl RecommendationOutcome {
    pub fn set(&self) -> &ScholarshipSet {
        match self {
            RecommendationOutcome::Generated(set) => set,
            RecommendationOutcome::Degraded { set, .. } => set,
        }
    }

    pub fn into_set(self) -> ScholarshipSet {
        match self {
            RecommendationOutcome::Generated(set) => set,
            RecommendationOutcome::Degraded { set, .. } => set,
        }
    }

    pub fn is_degraded(&self) -> bool {
        matches!(self, RecommendationOutcome::Degraded { .. })
    }

    /// `"generated"` or `"fallback"`, for API responses.
    pub fn source(&self) -> &'static str {
        if self.is_degraded() {
            "fallback"
        } else {
            "generated"
        }
    }
}

pub struct Recommender {
    generator: Arc<dyn TextGenerator>,
    links: Option<LinkResolver>,
    config: RecommendationConfig,
}

impl Recommender {
    /// `links = None` disables link resolution entirely.
    pub fn new(
        generator: Arc<dyn TextGenerator>,
        links: Option<LinkResolver>,
        config: RecommendationConfig,
    ) -> Self {
        Self {
            generator,
            links,
            config,
        }
    }

    pub fn config(&self) -> &RecommendationConfig {
        &self.config
    }

    pub async fn recommend(&self, query: &ScholarshipQuery) -> RecommendationOutcome {
        let request = GenerationRequest {
            prompt: build_recommendation_prompt(
                query,
                self.config.scholarship_count,
                self.config.target_year,
            ),
            max_tokens: self.config.max_tokens,
            temperature: self.config.temperature,
        };

        let generated = tokio::time::timeout(
            self.config.generation_timeout,
            self.generator.generate(&request),
        )
        .await;

        let text = match generated {
            Ok(Ok(text)) => text,
            Ok(Err(e)) => return degrade(DegradeReason::Generation(e.to_string())),
            Err(_) => {
                return degrade(DegradeReason::Timeout(
                    self.config.generation_timeout.as_secs(),
                ))
            }
        };

        let set = match parse_generated_text(&text) {
            Ok(set) => set,
            Err(reason) => return degrade(reason),
        };

        info!(
            "Generated {} primary and {} overlapping scholarships",
            set.primary.len(),
            set.overlapping.len()
        );

        let set = match &self.links {
            Some(resolver) => resolver.resolve_set(set).await,
            None => set,
        };

        RecommendationOutcome::Generated(set)
    }
}

fn degrade(reason: DegradeReason) -> RecommendationOutcome {
    warn!("Serving fallback scholarships: {reason}");
    RecommendationOutcome::Degraded {
        set: fallback_set(),
        reason,
    }
}
