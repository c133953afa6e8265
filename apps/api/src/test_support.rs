//! Test doubles shared by unit tests across modules.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use crate::auth::token::TokenKeys;
use crate::config::{Config, LinkConfig, RecommendationConfig};
use crate::llm_client::{GenerationRequest, LlmError, TextGenerator};
use crate::models::scholarship::ScholarshipRecommendation;
use crate::profile::store::memory::MemoryUserStore;
use crate::recommendation::engine::Recommender;
use crate::recommendation::links::{PageRenderer, RenderError};
use crate::recommendation::query::ProfileField;
use crate::saved::store::memory::MemorySavedScholarshipStore;
use crate::state::AppState;

pub fn candidate(number: u32, title: &str, link: &str) -> ScholarshipRecommendation {
    ScholarshipRecommendation {
        number: Some(number),
        title: title.to_string(),
        due_date: "March 1".to_string(),
        award_amount: "$1,000".to_string(),
        eligibility: "Anyone".to_string(),
        apply_link: link.to_string(),
        gpa: "3.0".to_string(),
        university: "Any".to_string(),
    }
}

enum Reply {
    Text(String),
    Fail(Mutex<Option<LlmError>>),
    Hang,
}

/// Generator with a fixed reply that records every request.
pub struct ScriptedGenerator {
    reply: Reply,
    calls: AtomicUsize,
    last: Mutex<Option<GenerationRequest>>,
}

impl ScriptedGenerator {
    fn with(reply: Reply) -> Self {
        Self {
            reply,
            calls: AtomicUsize::new(0),
            last: Mutex::new(None),
        }
    }

    pub fn replying(text: &str) -> Self {
        Self::with(Reply::Text(text.to_string()))
    }

    pub fn failing(error: LlmError) -> Self {
        Self::with(Reply::Fail(Mutex::new(Some(error))))
    }

    pub fn hanging() -> Self {
        Self::with(Reply::Hang)
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn last_request(&self) -> Option<GenerationRequest> {
        self.last.lock().unwrap().clone()
    }
}

#[async_trait]
impl TextGenerator for ScriptedGenerator {
    async fn generate(&self, request: &GenerationRequest) -> Result<String, LlmError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        *self.last.lock().unwrap() = Some(request.clone());
        match &self.reply {
            Reply::Text(text) => Ok(text.clone()),
            Reply::Fail(error) => {
                let taken = error.lock().unwrap().take();
                Err(taken.unwrap_or(LlmError::EmptyContent))
            }
            Reply::Hang => std::future::pending().await,
        }
    }
}

type RenderReply = Result<Option<String>, ()>;

/// Renderer answering from a script instead of the network.
pub struct ScriptedRenderer {
    default: RenderReply,
    by_url: HashMap<String, RenderReply>,
    calls: AtomicUsize,
}

impl ScriptedRenderer {
    pub fn always(found: Option<&str>) -> Self {
        Self {
            default: Ok(found.map(str::to_string)),
            by_url: HashMap::new(),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn failing() -> Self {
        Self {
            default: Err(()),
            by_url: HashMap::new(),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn by_url(script: &[(&str, Result<Option<&str>, ()>)]) -> Self {
        Self {
            default: Ok(None),
            by_url: script
                .iter()
                .map(|(url, reply)| (url.to_string(), (*reply).map(|o| o.map(str::to_string))))
                .collect(),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl PageRenderer for ScriptedRenderer {
    async fn find_apply_target(&self, url: &str) -> Result<Option<String>, RenderError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.by_url
            .get(url)
            .unwrap_or(&self.default)
            .clone()
            .map_err(|_| RenderError::Status(500))
    }
}

pub fn test_config() -> Config {
    Config {
        database_url: "postgres://unused".to_string(),
        openai_api_key: "test-key".to_string(),
        openai_base_url: "http://localhost".to_string(),
        openai_model: "gpt-3.5-turbo".to_string(),
        jwt_secret: "test-secret".to_string(),
        jwt_ttl_secs: 3600,
        port: 0,
        rust_log: "debug".to_string(),
        recommendation: RecommendationConfig {
            target_year: 2025,
            ..Default::default()
        },
        links: LinkConfig {
            enabled: false,
            ..Default::default()
        },
        required_profile_fields: ProfileField::default_required().to_vec(),
    }
}

/// App state over in-memory stores and a scripted generator.
pub fn test_state(generator: Arc<ScriptedGenerator>) -> AppState {
    let config = test_config();
    AppState {
        users: Arc::new(MemoryUserStore::default()),
        saved: Arc::new(MemorySavedScholarshipStore::default()),
        recommender: Arc::new(Recommender::new(
            generator,
            None,
            config.recommendation.clone(),
        )),
        tokens: TokenKeys::new(&config.jwt_secret, config.jwt_ttl_secs),
        config,
    }
}
