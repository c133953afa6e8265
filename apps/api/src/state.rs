use std::sync::Arc;

use crate::auth::token::TokenKeys;
use crate::config::Config;
use crate::profile::store::UserStore;
use crate::recommendation::engine::Recommender;
use crate::saved::store::SavedScholarshipStore;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub users: Arc<dyn UserStore>,
    pub saved: Arc<dyn SavedScholarshipStore>,
    /// Scholarship recommendation engine. Never fails; degrades to the static set.
    pub recommender: Arc<Recommender>,
    pub tokens: TokenKeys,
    pub config: Config,
}
