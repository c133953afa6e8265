// Cross-cutting prompt fragments.
// Each service that needs LLM calls defines its own prompts.rs alongside it.

/// Appended to every prompt that expects a machine-readable answer.
/// The extractor looks for exactly this fence label.
pub const JSON_BLOCK_INSTRUCTION: &str = "\
    Output the result as JSON inside a single code block that starts with ```json \
    and ends with ```. Do not include any other code blocks.";

/// Appended to prompts that ask for links the model may not know.
pub const LINK_INSTRUCTION: &str = "\
    If an exact direct application link is not known, output the URL of the \
    scholarship's main page. If no URL is known at all, output \"not available\".";
