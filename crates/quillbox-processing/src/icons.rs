//! Icon selection for non-image uploads.

use quillbox_core::IconRule;
use regex::{Regex, RegexBuilder};

/// Names the catch-all rule must match. A rule that rejects any of these cannot be
/// the fallback at the end of the list.
const CATCH_ALL_PROBES: &[&str] = &["a", "Z", "0", "file.unknown", "archive.tar.gz"];

#[derive(Debug, thiserror::Error)]
pub enum IconRuleError {
    #[error("At least one file icon rule is required")]
    Empty,

    #[error("Invalid icon rule pattern '{pattern}': {source}")]
    InvalidPattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },

    #[error("Last icon rule '{0}' must match every file name")]
    MissingCatchAll(String),
}

/// Ordered, compiled icon rules. First match wins.
#[derive(Debug, Clone)]
pub struct IconClassifier {
    rules: Vec<(Regex, String)>,
}

impl IconClassifier {
    /// Compile `rules` case-insensitively, keeping their order.
    pub fn new(rules: &[IconRule]) -> Result<Self, IconRuleError> {
        let compiled = rules
            .iter()
            .map(|rule| {
                RegexBuilder::new(&rule.pattern)
                    .case_insensitive(true)
                    .build()
                    .map(|regex| (regex, rule.icon_path.clone()))
                    .map_err(|source| IconRuleError::InvalidPattern {
                        pattern: rule.pattern.clone(),
                        source,
                    })
            })
            .collect::<Result<Vec<_>, _>>()?;

        let (last, _) = compiled.last().ok_or(IconRuleError::Empty)?;
        if !CATCH_ALL_PROBES.iter().all(|name| last.is_match(name)) {
            return Err(IconRuleError::MissingCatchAll(last.as_str().to_string()));
        }

        Ok(Self { rules: compiled })
    }

    /// Icon path for `file_name`. Patterns are searched anywhere in the name.
    pub fn icon_for(&self, file_name: &str) -> &str {
        self.rules
            .iter()
            .find(|(regex, _)| regex.is_match(file_name))
            .or_else(|| self.rules.last())
            .map(|(_, icon)| icon.as_str())
            .unwrap_or_default()
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}
