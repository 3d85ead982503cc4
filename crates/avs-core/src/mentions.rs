use std::collections::HashSet;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::mention::{Assistant, Category, Mention};
use crate::{ConfigError, CoreError};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MentionsFile {
    pub mentions: Vec<Mention>,
}

/// Load and validate a mentions file (YAML, `mentions:` at the top level).
///
/// # Errors
///
/// Returns `ConfigError` if the file cannot be read, parsed, or fails validation.
pub fn load_mentions(path: &Path) -> Result<MentionsFile, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|e| ConfigError::MentionsFileIo {
        path: path.display().to_string(),
        source: e,
    })?;

    let mentions_file: MentionsFile = serde_yaml::from_str(&content)?;

    validate_mentions(&mentions_file)?;

    Ok(mentions_file)
}

fn validate_mentions(mentions_file: &MentionsFile) -> Result<(), ConfigError> {
    let mut seen_ids = HashSet::new();

    for mention in &mentions_file.mentions {
        if mention.id.trim().is_empty() {
            return Err(ConfigError::Validation(
                "mention id must be non-empty".to_string(),
            ));
        }

        if mention.brand.trim().is_empty() {
            return Err(ConfigError::Validation(format!(
                "mention '{}' has an empty brand",
                mention.id
            )));
        }

        if mention.rank == 0 {
            return Err(ConfigError::Validation(format!(
                "mention '{}' has invalid rank 0; ranks start at 1",
                mention.id
            )));
        }

        if !seen_ids.insert(mention.id.as_str()) {
            return Err(ConfigError::Validation(format!(
                "duplicate mention id: '{}'",
                mention.id
            )));
        }
    }

    Ok(())
}

/// Optional narrowing applied by [`list_mentions`]. `None` fields match everything.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MentionFilter {
    pub brand: Option<String>,
    pub category: Option<Category>,
    pub assistant: Option<Assistant>,
}

impl MentionFilter {
    #[must_use]
    pub fn matches(&self, mention: &Mention) -> bool {
        self.brand.as_deref().is_none_or(|b| mention.brand == b)
            && self.category.is_none_or(|c| mention.category == c)
            && self.assistant.is_none_or(|a| mention.assistant == a)
    }
}

/// Return the mentions matching `filter`, newest first.
///
/// Mentions sharing a date keep their input order. An empty source yields an
/// empty result, never an error.
#[must_use]
pub fn list_mentions(source: &[Mention], filter: &MentionFilter) -> Vec<Mention> {
    let mut out: Vec<Mention> = source
        .iter()
        .filter(|m| filter.matches(m))
        .cloned()
        .collect();
    out.sort_by(|a, b| b.date.cmp(&a.date));
    out
}

/// Reject a caller-supplied identifier that is empty after trimming.
///
/// Returns the trimmed value on success.
///
/// # Errors
///
/// Returns [`CoreError::EmptyIdentifier`] naming `kind`.
pub fn validate_identifier<'a>(kind: &'static str, value: &'a str) -> Result<&'a str, CoreError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(CoreError::EmptyIdentifier { kind });
    }
    Ok(trimmed)
}

#[cfg(test)]
#[path = "mentions_test.rs"]
mod tests;
