pub mod health;

use axum::{
    routing::{get, post, put},
    Router,
};

use crate::auth::handlers as auth;
use crate::profile::handlers as profile;
use crate::recommendation::handlers as recommendation;
use crate::saved::handlers as saved;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Accounts
        .route("/register", post(auth::handle_register))
        .route("/login", post(auth::handle_login))
        .route(
            "/profile",
            get(profile::handle_get_profile).put(profile::handle_update_profile),
        )
        // Recommendations
        .route(
            "/api/scholarships",
            get(recommendation::handle_personalized_scholarships),
        )
        .route(
            "/api/default-scholarships",
            get(recommendation::handle_default_scholarships),
        )
        // Application tracker
        .route(
            "/api/savedScholarships",
            get(saved::handle_list_saved).post(saved::handle_save),
        )
        .route(
            "/api/savedScholarships/:id",
            put(saved::handle_toggle_success).delete(saved::handle_delete_saved),
        )
        .with_state(state)
}
