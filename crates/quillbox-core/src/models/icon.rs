use serde::{Deserialize, Serialize};

/// Ordered (pattern, icon) pair used to pick an icon for non-image files.
///
/// Serialized as a two-element array so overrides read like `[["\\.pdf$", "/icons/pdf.png"]]`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "(String, String)", into = "(String, String)")]
pub struct IconRule {
    pub pattern: String,
    pub icon_path: String,
}

impl IconRule {
    pub fn new(pattern: impl Into<String>, icon_path: impl Into<String>) -> Self {
        Self {
            pattern: pattern.into(),
            icon_path: icon_path.into(),
        }
    }

    /// Built-in rule set. `icons_prefix` is the URL directory holding the icon images.
    pub fn default_rules(icons_prefix: &str) -> Vec<IconRule> {
        let icon = |name: &str| format!("{}{}", icons_prefix, name);
        vec![
            IconRule::new(r"\.swf$", icon("swf.png")),
            IconRule::new(r"\.pdf$", icon("pdf.png")),
            IconRule::new(r"\.doc$|\.docx$|\.odt$", icon("doc.png")),
            IconRule::new(r"\.txt$", icon("txt.png")),
            IconRule::new(r"\.zip$|\.rar$|\.tar$|\.tar\..+$", icon("zip.png")),
            IconRule::new(r"\.ppt$", icon("ppt.png")),
            IconRule::new(r"\.xls$", icon("xls.png")),
            IconRule::new(".*", icon("file.png")),
        ]
    }
}

impl From<(String, String)> for IconRule {
    fn from((pattern, icon_path): (String, String)) -> Self {
        IconRule { pattern, icon_path }
    }
}

impl From<IconRule> for (String, String) {
    fn from(rule: IconRule) -> Self {
        (rule.pattern, rule.icon_path)
    }
}
