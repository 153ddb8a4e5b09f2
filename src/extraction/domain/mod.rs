//! Prompt construction and reply validation for task extraction.

mod error;
mod prompt;
mod reply;

pub use error::{ExtractionError, ReplyError};
pub use prompt::{SYSTEM_PROMPT, render_prompt};
pub use reply::{ParsedReply, RejectedEntry, parse_reply, strip_code_fences};
