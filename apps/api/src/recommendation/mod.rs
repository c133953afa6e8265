// Scholarship recommendations: prompt → LLM → structured result → link resolution.
// All LLM calls go through llm_client — no direct provider calls here.

pub mod engine;
pub mod extract;
pub mod fallback;
pub mod handlers;
pub mod links;
pub mod prompts;
pub mod query;
pub mod renderer;
