// Prompt construction for scholarship recommendations.
// Reuses cross-cutting fragments from llm_client::prompts.

use crate::llm_client::prompts::{JSON_BLOCK_INSTRUCTION, LINK_INSTRUCTION};
use crate::recommendation::query::ScholarshipQuery;

const PROMPT_HEADER: &str =
    "I'm building a website to find scholarship opportunities for a student with the following profile:";

const NO_PROFILE_LINE: &str =
    "- No specific profile details were provided; prefer widely available scholarships.";

/// Output contract. `{count}` and `{year}` are substituted before sending.
const OUTPUT_CONTRACT: &str = r#"Find me {count} scholarship opportunities with deadlines in {year} that match this profile.

Return a JSON object with exactly two keys:
- "primary": the {count} best matches, numbered from 1 in ascending order, earliest due date first.
- "overlapping": scholarships from the list that satisfy more than one of the profile's criteria at once, best first.

Every scholarship object must have these fields:
"number", "title", "due_date", "award_amount", "eligibility", "apply_link", "gpa", "university".

Example:
```json
{
  "primary": [
    {"number": 1, "title": "Example Scholarship", "due_date": "March 1, {year}", "award_amount": "$5,000", "eligibility": "Undergraduate women in STEM", "apply_link": "https://scholarship.org/apply", "gpa": "3.0", "university": "Any accredited university"}
  ],
  "overlapping": []
}
```"#;

/// Builds the recommendation prompt for a query.
pub fn build_recommendation_prompt(query: &ScholarshipQuery, count: u32, year: i32) -> String {
    let mut prompt = String::from(PROMPT_HEADER);
    prompt.push('\n');

    let lines = query.attribute_lines();
    if lines.is_empty() {
        prompt.push_str(NO_PROFILE_LINE);
        prompt.push('\n');
    }
    for (label, value) in lines {
        prompt.push_str(&format!("- {label}: {value}\n"));
    }

    prompt.push('\n');
    prompt.push_str(
        &OUTPUT_CONTRACT
            .replace("{count}", &count.to_string())
            .replace("{year}", &year.to_string()),
    );
    prompt.push_str("\n\n");
    prompt.push_str(LINK_INSTRUCTION);
    prompt.push('\n');
    prompt.push_str(JSON_BLOCK_INSTRUCTION);
    prompt
}
