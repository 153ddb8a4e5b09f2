//! Instruction template sent to the completion service.

use super::ExtractionError;
use minijinja::{Environment, context};

/// System message framing the completion request.
pub const SYSTEM_PROMPT: &str = "You are a helpful assistant that extracts action items from \
meeting minutes and answers with JSON only.";

const EXTRACTION_TEMPLATE: &str = r#"You extract actionable tasks from meeting minutes and conversations.

Read the text below and list every task or action item. For each one, identify:
1. A clear description of the task
2. The person the task is assigned to
3. The deadline, kept exactly as it is phrased in the text (for example "tonight", "tomorrow", "Wednesday", "by 5PM Friday")
4. The priority: P1 for urgent or high priority, P2 for medium priority, P3 for low priority
5. When the text does not state a priority, use P3

Answer with a JSON array in which every task object has exactly this shape:
{
  "description": "string",
  "assignee": "string",
  "deadline": "string",
  "priority": "P1" | "P2" | "P3"
}

Meeting minutes:
{{ minutes }}

Answer with the JSON array only, without any other text or formatting.
"#;

/// Renders the extraction instructions around `minutes`.
///
/// The minutes are inserted as a template value, so template syntax inside
/// them is never evaluated.
///
/// # Errors
///
/// Returns [`ExtractionError::Prompt`] when rendering fails.
pub fn render_prompt(minutes: &str) -> Result<String, ExtractionError> {
    let environment = Environment::new();
    environment
        .render_str(EXTRACTION_TEMPLATE, context! { minutes => minutes })
        .map_err(|error| ExtractionError::Prompt(error.to_string()))
}
