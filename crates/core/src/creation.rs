//! Validation rules for creation input.

use crate::error::CoreError;

/// Maximum length of either prompt, in characters.
pub const MAX_PROMPT_CHARS: usize = 500;

/// Validate the monument and scene prompts.
///
/// Both prompts must be non-empty after trimming and no longer than
/// [`MAX_PROMPT_CHARS`].
pub fn validate_prompts(monument_prompt: &str, scene_prompt: &str) -> Result<(), CoreError> {
    validate_prompt("monument prompt", monument_prompt)?;
    validate_prompt("scene prompt", scene_prompt)
}

fn validate_prompt(label: &str, value: &str) -> Result<(), CoreError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(CoreError::Validation(format!("{label} must not be empty")));
    }
    if trimmed.chars().count() > MAX_PROMPT_CHARS {
        return Err(CoreError::Validation(format!(
            "{label} must be at most {MAX_PROMPT_CHARS} characters"
        )));
    }
    Ok(())
}
